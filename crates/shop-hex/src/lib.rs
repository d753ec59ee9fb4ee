//! shop-hex: hexagonal customers / orders APIs (application services + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use shop_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
