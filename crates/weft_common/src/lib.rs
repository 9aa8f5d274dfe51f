//! Shared foundational types for the weft place-and-route core.
//!
//! This crate provides the dense ID-indexed [`Arena`] used by the graph
//! structures, the [`ArenaId`] trait its keys implement, and the common
//! result and internal-error types.

#![warn(missing_docs)]

pub mod arena;
pub mod result;

pub use arena::{Arena, ArenaId};
pub use result::{InternalError, WeftResult};
