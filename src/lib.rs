//! `agrimarket-http` is an async HTTP client for the agricultural
//! marketplace REST API.
//!
//! Every call goes through [`AgriClient::send`], which applies a per-attempt
//! timeout, bounded exponential-backoff retry and response classification,
//! and resolves to a uniform [`ApiResponse`] envelope instead of an error.
//! Typed wrappers cover the backend endpoints:
//! - [`AgriClient::login`] / [`AgriClient::logout`]
//! - [`AgriClient::profile`] / [`AgriClient::update_profile`]
//! - [`AgriClient::farmers`]
//! - [`AgriClient::regional_statistics`]

mod client;
mod endpoints;
mod error;
mod options;
mod outcome;
mod request;
mod response;
mod sleep;
mod token;
mod types;

pub mod market;

pub use client::AgriClient;
pub use endpoints::{FARMERS_PATH, LOGIN_PATH, PROFILE_PATH, REGIONAL_STATISTICS_PATH};
pub use error::ApiError;
pub use options::{
    ClientOptions, DEFAULT_BASE_URL, ENV_BACKOFF_MS, ENV_BASE_URL, ENV_MAX_RETRIES, ENV_TIMEOUT_MS,
};
pub use request::ApiRequest;
pub use response::{ApiResponse, NETWORK_ERROR};
pub use sleep::{NoopSleeper, Sleeper};
#[cfg(not(target_arch = "wasm32"))]
pub use sleep::TokioSleeper;
pub use token::{MemoryTokenStore, TokenStore};
pub use types::{
    CropStatistic, Farmer, LoginRequest, LoginResponse, ProfileUpdate, RegionalStatistics,
    UserProfile,
};

pub use reqwest::Method;

pub type Result<T> = std::result::Result<T, ApiError>;
