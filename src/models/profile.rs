use serde::{Deserialize, Serialize};

/// The signed-in user, as reported by the userinfo endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub picture: String,
}
