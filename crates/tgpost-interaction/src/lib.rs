//! HTTP adapter for the message-archive backend.

pub mod http_backend;

pub use http_backend::HttpBackend;
