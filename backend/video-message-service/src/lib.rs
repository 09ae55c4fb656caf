//! Video Message Service
//!
//! Single-process HTTP service that turns a multi-step form submission
//! into a "video message" request, tracks it through a processing
//! lifecycle, and serves its status to polling clients.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod storage;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
