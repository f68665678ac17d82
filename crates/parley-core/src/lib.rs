//! Chat orchestration and port definitions for Parley.
//!
//! This crate defines the traits the infrastructure layer implements (model
//! providers, session stores, secret providers) and the services built on
//! them. It depends only on `parley-types` -- never on `parley-infra` or any
//! IO crate.

pub mod chat;
pub mod image;
pub mod llm;
pub mod secret;

#[cfg(test)]
pub(crate) mod testing;
