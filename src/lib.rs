pub mod chunker;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod formatter;
pub mod handlers;
pub mod session;
pub mod types;
