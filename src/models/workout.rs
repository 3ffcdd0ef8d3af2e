use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::exercise::Exercise;
use super::segment::Segment;

/// A named training session within one segment.
///
/// A workout exclusively owns its exercises. Removing a workout removes every
/// exercise and set below it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub title: String,
    pub segment: Segment,
    /// Ordered; position in this list is the display order.
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
}

impl Workout {
    pub fn new(title: impl Into<String>, segment: Segment) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            segment,
            exercises: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn exercise(&self, id: Uuid) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }
}

/// What happened to a workout subtree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The workout itself was created.
    Created,
    /// Something inside the workout (title, exercises, sets, view flags) changed.
    Updated,
    /// The workout and everything it owned are gone.
    Deleted,
}

/// Notification sent to store observers after a successful mutation.
///
/// Observers refresh the whole workout subtree named by `workout_id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutChange {
    pub workout_id: Uuid,
    pub segment: Segment,
    pub kind: ChangeKind,
}
