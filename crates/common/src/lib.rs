//! Common types and utilities for repo-engagement

pub mod config;
pub mod error;
pub mod identity;
pub mod models;


pub use config::Config;
pub use error::{Error, Result};
pub use identity::canonical_name;
