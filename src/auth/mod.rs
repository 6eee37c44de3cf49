mod cookie;
mod gate;
mod login;
mod logout;
mod signup;
mod token;

use axum::{routing::post, Router};

use crate::AppState;

pub use cookie::{read_token, TOKEN_COOKIE};
pub use gate::{require_auth, resolve};
pub use token::{TokenKeys, TOKEN_TTL};

/// Routes reachable without a credential.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup::signup))
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
}
