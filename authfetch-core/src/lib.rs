pub mod api;
pub mod auth;
pub mod client;
pub mod constants;
pub mod fetch;
pub mod options;
pub mod storage;
