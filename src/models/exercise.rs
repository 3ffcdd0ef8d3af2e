use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A movement performed within a workout, e.g. "Deadlift".
///
/// Every exercise is created with one set. The store never removes the last
/// one, so `sets` is non-empty for the exercise's whole life.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    /// Owning workout. Navigation only; the workout owns the exercise.
    pub workout_id: Uuid,
    pub name: String,
    pub sets: Vec<ExerciseSet>,
}

impl Exercise {
    pub fn new(workout_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout_id,
            name: name.into(),
            sets: Vec::new(),
        }
    }

    pub fn set(&self, id: Uuid) -> Option<&ExerciseSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    /// True if every set's number equals its 1-based position.
    pub fn sets_contiguous(&self) -> bool {
        self.sets
            .iter()
            .enumerate()
            .all(|(i, s)| s.set_number as usize == i + 1)
    }

    /// Rewrite set numbers so they run 1..=len in list order.
    ///
    /// Returns the ids of sets whose number actually changed.
    pub(crate) fn renumber_sets(&mut self) -> Vec<(Uuid, u32)> {
        let mut changed = Vec::new();
        for (i, set) in self.sets.iter_mut().enumerate() {
            let expected = i as u32 + 1;
            if set.set_number != expected {
                set.set_number = expected;
                changed.push((set.id, expected));
            }
        }
        changed
    }
}

/// One set of an exercise.
///
/// `repetitions` and `weight` are free text; users write things like
/// "8-10" or "bodyweight".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSet {
    pub id: Uuid,
    /// Owning exercise. Navigation only.
    pub exercise_id: Uuid,
    /// 1-based position within the exercise.
    pub set_number: u32,
    pub repetitions: String,
    pub weight: String,
}

impl ExerciseSet {
    pub fn new(
        exercise_id: Uuid,
        set_number: u32,
        repetitions: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id,
            set_number,
            repetitions: repetitions.into(),
            weight: weight.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_with_numbers(numbers: &[u32]) -> Exercise {
        let mut exercise = Exercise::new(Uuid::new_v4(), "Row");
        for &n in numbers {
            exercise
                .sets
                .push(ExerciseSet::new(exercise.id, n, "10", "20 kg"));
        }
        exercise
    }

    #[test]
    fn test_renumber_fixes_gaps() {
        let mut exercise = exercise_with_numbers(&[1, 3, 4]);
        assert!(!exercise.sets_contiguous());

        let changed = exercise.renumber_sets();

        assert_eq!(changed.len(), 2);
        assert!(exercise.sets_contiguous());
        let numbers: Vec<u32> = exercise.sets.iter().map(|s| s.set_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_renumber_is_noop_when_contiguous() {
        let mut exercise = exercise_with_numbers(&[1, 2]);
        assert!(exercise.renumber_sets().is_empty());
    }
}
