// Adapters layer: concrete implementations for external systems (HTTP server, mail relay).

pub mod http;
pub mod mail;
