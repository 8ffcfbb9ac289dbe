pub mod config;
pub mod errors;
pub mod server;
pub mod storage;
pub mod tour;
