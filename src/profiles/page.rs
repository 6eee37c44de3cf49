use axum::{debug_handler, Extension, Json};

use crate::{identity::User, Envelope};

#[debug_handler]
pub(crate) async fn profile(Extension(me): Extension<User>) -> Json<Envelope<User>> {
    Envelope::json("Profile fetched", me)
}
