pub mod app;
pub mod config;
pub mod file_ops;
pub mod orchestration;
pub mod provider;
pub mod search;
pub mod shared;
