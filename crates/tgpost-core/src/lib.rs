pub mod activity;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod preset;
pub mod result;
pub mod selection;
pub mod storage;

// Re-export common error type
pub use error::TgPostError;
