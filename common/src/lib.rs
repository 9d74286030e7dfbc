pub mod api;
pub mod config;
pub mod context;
pub mod entities;
pub mod error;
pub mod filter;
pub mod id;
pub mod repository;
pub mod verification;

pub fn default_timestamp() -> i64 {
    chrono::Utc::now().timestamp_micros()
}
