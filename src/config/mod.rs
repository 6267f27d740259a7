//! Configuration models for the pool and its HTTP server.

pub mod pool;

pub use pool::{default_workers, split_workers, PoolConfig, ServerConfig, DEFAULT_PORT};
