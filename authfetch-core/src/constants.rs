pub const ACCESS_TOKEN_KEY: &'static str = "access_token";

pub const AUTHORIZATION_HEADER: &'static str = "Authorization";
pub const CONTENT_TYPE_HEADER: &'static str = "Content-Type";
pub const JSON_CONTENT_TYPE: &'static str = "application/json";

/// what browser storage hands back for a missing key, once formatted
pub const MISSING_TOKEN_MARKER: &'static str = "null";

pub const AUTHFETCH_DEFAULT_HOST: &'static str = "http://127.0.0.1:8000";
pub const AUTHFETCH_CONFIG_DIR_NAME: &'static str = ".authfetch";
pub const AUTHFETCH_STORAGE_FILE_NAME: &'static str = "storage.json";

pub const AUTH_LOGIN_PATH: &'static str = "/auth/login";
pub const AUTH_SIGNUP_PATH: &'static str = "/auth/signup";
pub const AUTH_REQUEST_RESET_PATH: &'static str = "/auth/request-password-reset";
pub const AUTH_RESET_PASSWORD_PATH: &'static str = "/auth/reset-password";
pub const USERS_ME_PATH: &'static str = "/users/me";
