//! Weave: Step-Driven Virtual File Tree Engine
//!
//! Turns prompt-generated build steps into an in-memory virtual file tree,
//! projects that tree into a sandboxed runtime for live preview, and exports
//! it as a downloadable archive.

pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod logging;
pub mod sandbox;
pub mod session;
pub mod step;
pub mod tooling;
pub mod tree;
