//! Core types for the AGF engine: scenes, choices, and the adventure graph.
//!
//! This crate defines the data model the AGF text format compiles into. It is
//! independent of the parser — you can construct an [`Adventure`]
//! programmatically or receive one from `agf-dsl`. An `Adventure` is
//! validated on construction and immutable afterwards, so every consumer can
//! rely on its structural invariants holding.

/// Adventure graph types: scenes, choices, and endings.
pub mod adventure;
/// Error types used throughout the crate.
pub mod error;

/// Re-export adventure graph types.
pub use adventure::{Adventure, Choice, ChoiceTarget, Ending, Scene, SceneId};
/// Re-export error types.
pub use error::{AgfError, AgfResult};
