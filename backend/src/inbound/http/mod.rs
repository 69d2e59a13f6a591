//! HTTP inbound adapter exposing the record API.

pub mod access_policy;
pub mod animes;
pub mod auth;
pub mod error;
pub mod health;
pub mod login;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
