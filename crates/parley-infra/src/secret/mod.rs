//! Secret provider implementations.

pub mod chain;
pub mod env;
pub mod file;
