//! Error types for the workout store.
//!
//! Guard refusals (deleting the last workout of a segment, the last exercise
//! of a workout, the last set of an exercise) are not errors. Store methods
//! report them as `Ok(false)`.

use thiserror::Error;
use uuid::Uuid;

/// The kind of entity a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Workout,
    Exercise,
    ExerciseSet,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workout => f.write_str("Workout"),
            Self::Exercise => f.write_str("Exercise"),
            Self::ExerciseSet => f.write_str("Exercise set"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
