//! Collision detection for character movement.
//!
//! # Key Types
//!
//! - [`GeometryQuery`]: the query boundary movement code is written against
//! - [`CollisionWorld`]: parry3d-backed world of brushes implementing it
//! - [`SweepRequest`] / [`SweepResult`]: the box sweep primitive
//!
//! # Sweeps
//!
//! A sweep moves a box from a start point to an end point and returns:
//! - How far the box traveled (fraction 0.0-1.0)
//! - The final position
//! - Surface normal at impact (zero if nothing was hit)

mod flags;
mod query;
mod sweep;
mod world;

pub use flags::ContentFlags;
pub use query::{blocking_contacts, ColliderId, GeometryQuery, SurfaceContact};
pub use sweep::{box_sweep, SweepRequest, SweepResult};
pub use world::{CollisionBrush, CollisionWorld, GeometryError};
