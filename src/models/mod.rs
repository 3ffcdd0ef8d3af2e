//! Domain models for gymtrack.
//!
//! # Hierarchy
//!
//! - [`Workout`]: a training session inside one [`Segment`]. Owns its exercises.
//! - [`Exercise`]: a movement inside a workout. Owns its sets.
//! - [`ExerciseSet`]: repetitions and weight for one numbered set.
//!
//! Ownership is a strict tree. Children refer back to their parent by id only.
//!
//! ## Events
//!
//! - [`WorkoutChange`]: emitted by the store after each successful mutation.

mod exercise;
mod segment;
mod workout;

pub use exercise::*;
pub use segment::*;
pub use workout::*;
