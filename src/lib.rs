//! # rotorframe
//!
//! A solver-agnostic constraint-model crate that turns declarative multirotor
//! assemblies into algebraic constraint systems for geometric-program solvers.
//!
//! It decouples the *description* (components and the mates relating them)
//! from the *solution* (an external numeric optimizer), producing a flat
//! [`Constraint`] list the solver consumes and applying the returned
//! [`Solution`] back onto the component graph. The resolved graph is then
//! exposed as engine-agnostic scene data (glam / `bevy_math`) that
//! renderers or physics pipelines can ingest directly.
//!
//! The central invariant: comparing symbolic quantities never evaluates
//! anything. `le`/`ge`/`eq` record [`Constraint`] data for the solver, no
//! matter whether the operands are already numerically bound.

pub mod assembly;
pub mod component;
pub mod error;
pub mod geometry;
pub mod mate;
pub mod scene;
pub mod solution;
pub mod variable;

pub use assembly::*;
pub use component::*;
pub use error::*;
pub use geometry::*;
pub use mate::*;
pub use scene::*;
pub use solution::*;
pub use variable::*;
