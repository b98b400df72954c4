//! Error types for assembly construction.
//!
//! Errors are scarce by design: constraint generation and solution
//! application never fail. Only declarative construction mistakes (a mate
//! against an unknown or geometry-less component, an out-of-range corner
//! index, an unsupported rotor count) are rejected, at construction time.

use crate::component::ComponentId;
use thiserror::Error;

/// Result type alias for assembly construction.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while declaring an assembly.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A mate referenced a component ID the assembly does not contain.
    #[error("unknown component id {0}")]
    UnknownComponent(ComponentId),

    /// A mate's first component has no geometry to attach to.
    #[error("component {0} has no geometry to attach a mate to")]
    MissingGeometry(ComponentId),

    /// A smooth join was requested at a corner index outside the four-rotor
    /// layout.
    #[error("smooth join corner index out of range: {0} (expected 0..=3)")]
    InvalidJoinCorner(u8),

    /// The standard layout generator was asked for an unsupported rotor
    /// count.
    #[error("standard quad layout supports 1..=4 rotors, got {0}")]
    InvalidRotorCount(usize),
}
