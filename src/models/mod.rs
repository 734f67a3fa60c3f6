//! Domain models for techtrack.
//!
//! # Core Concepts
//!
//! - [`Technology`]: a skill or tool being learned. The only persisted entity;
//!   the whole list is stored as one JSON array.
//! - [`Status`]: the three-state learning lifecycle with its click-to-advance cycle.
//! - [`Category`], [`Priority`], [`Difficulty`]: tags attached at creation.
//! - [`NewTechnology`] / [`TechnologyUpdate`]: inputs for creating and editing records.

mod seed;
mod status;
mod technology;
mod timestamp;

pub use seed::*;
pub use status::*;
pub use technology::*;
