//! Wire types and configuration shared between the photoshare client library
//! and its command-line front end.

pub mod config;
pub mod types;
