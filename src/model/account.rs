//! Account types.

use serde::{Deserialize, Serialize};

/// Registration payload handed to the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "Firstname")]
    pub first_name: String,
    #[serde(rename = "Lastname")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password")]
    pub password: String,
}
