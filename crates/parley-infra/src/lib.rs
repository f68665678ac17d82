//! Infrastructure layer for Parley.
//!
//! Contains implementations of the traits defined in `parley-core`:
//! OpenAI-compatible chat and image backends, JSON-file and in-memory session
//! stores, secret providers, and the configuration loader.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod registry;
pub mod secret;
pub mod storage;
