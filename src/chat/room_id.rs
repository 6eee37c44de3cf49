use std::fmt;

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Realtime room key for a pair of users: SHA-256 over both ids, sorted, so
/// either side derives the same room and nobody can guess it from one id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    pub fn derive(a: Uuid, b: Uuid) -> Self {
        let (a, b) = (a.to_string(), b.to_string());
        let mut pair = [a.as_str(), b.as_str()];
        pair.sort_unstable();

        Self(format!("{:x}", Sha256::digest(pair.join("_"))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
