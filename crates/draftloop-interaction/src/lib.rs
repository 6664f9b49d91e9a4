//! Remote interaction layer for Draftloop.
//!
//! Provides the HTTP implementation of the generation service and the
//! loading of client configuration.

pub mod config;
pub mod generation_client;

pub use config::load_client_config;
pub use generation_client::HttpGenerationClient;
