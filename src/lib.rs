//! gymtrack: a workout tracker organised by body-part segment.
//!
//! The [`store::WorkoutStore`] owns the Workout → Exercise → ExerciseSet tree
//! and keeps it consistent; [`db::Database`] persists it to SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod render;
pub mod store;
pub mod view_state;

pub use error::{Result, StoreError};
pub use store::WorkoutStore;
