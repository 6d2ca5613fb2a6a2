use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Debug)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Default, Debug)]
#[serde(default)]
pub struct SignupRequest {
    /// display name
    pub name: String,
    /// login email, must not be registered yet
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Default, Debug)]
#[serde(default)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Default, Debug)]
#[serde(default)]
pub struct ResetPasswordRequest {
    /// token taken from the reset link
    pub token: String,
    pub new_password: String,
}
