//! The workout hierarchy store.
//!
//! [`WorkoutStore`] holds the Workout → Exercise → ExerciseSet tree in memory
//! and writes every mutation through to the [`Database`]. The database is
//! written first; the in-memory tree only changes once the write succeeded.
//!
//! # Minimum counts
//!
//! - each segment keeps at least one workout
//! - each workout with exercises keeps at least one
//! - each exercise keeps at least one set
//!
//! Operations that would break one of these are refused and return
//! `Ok(false)`. Callers check `can_delete_workout`, `can_delete_exercise` or
//! `can_remove_set` before offering the action.

use uuid::Uuid;

use crate::config::Defaults;
use crate::db::Database;
use crate::error::{EntityKind, Result, StoreError};
use crate::models::*;
use crate::view_state::ViewState;

/// Callback invoked after each successful mutation.
pub type Observer = Box<dyn FnMut(&WorkoutChange)>;

pub struct WorkoutStore {
    db: Database,
    defaults: Defaults,
    workouts: Vec<Workout>,
    view: ViewState,
    observers: Vec<Observer>,
}

impl WorkoutStore {
    /// Load the tree from a migrated database.
    ///
    /// Segments without any workout get a default one, so the store starts
    /// with every segment populated.
    pub fn open(db: Database, defaults: Defaults) -> Result<Self> {
        let workouts = db.query_all_workouts()?;
        let view = ViewState::from_entries(db.load_view_state()?);
        tracing::debug!(workouts = workouts.len(), "Loaded workouts");

        let mut store = Self {
            db,
            defaults,
            workouts,
            view,
            observers: Vec::new(),
        };

        for segment in Segment::ALL {
            if store.count_in_segment(segment) == 0 {
                store.create_workout(segment)?;
            }
        }

        Ok(store)
    }

    /// A store backed by a fresh in-memory database.
    pub fn open_memory(defaults: Defaults) -> Result<Self> {
        let db = Database::open_memory()?;
        db.migrate()?;
        Self::open(db, defaults)
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&WorkoutChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, workout_id: Uuid, segment: Segment, kind: ChangeKind) {
        let change = WorkoutChange {
            workout_id,
            segment,
            kind,
        };
        for observer in &mut self.observers {
            observer(&change);
        }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    // ============================================================
    // Read accessors
    // ============================================================

    /// All workouts, ordered by title.
    pub fn workouts(&self) -> Vec<&Workout> {
        let mut workouts: Vec<&Workout> = self.workouts.iter().collect();
        workouts.sort_by(|a, b| {
            a.title
                .cmp(&b.title)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        workouts
    }

    /// Workouts of one segment, ordered by title.
    pub fn workouts_for_segment(&self, segment: Segment) -> Vec<&Workout> {
        self.workouts()
            .into_iter()
            .filter(|w| w.segment == segment)
            .collect()
    }

    pub fn workout(&self, id: Uuid) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn exercise(&self, id: Uuid) -> Option<&Exercise> {
        self.workouts
            .iter()
            .flat_map(|w| w.exercises.iter())
            .find(|e| e.id == id)
    }

    pub fn exercise_set(&self, id: Uuid) -> Option<&ExerciseSet> {
        self.workouts
            .iter()
            .flat_map(|w| w.exercises.iter())
            .flat_map(|e| e.sets.iter())
            .find(|s| s.id == id)
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.view.is_expanded(id)
    }

    fn count_in_segment(&self, segment: Segment) -> usize {
        self.workouts.iter().filter(|w| w.segment == segment).count()
    }

    fn workout_index(&self, id: Uuid) -> Result<usize> {
        self.workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Workout, id))
    }

    fn exercise_index(&self, id: Uuid) -> Result<(usize, usize)> {
        self.workouts
            .iter()
            .enumerate()
            .find_map(|(wi, w)| {
                w.exercises
                    .iter()
                    .position(|e| e.id == id)
                    .map(|ei| (wi, ei))
            })
            .ok_or_else(|| StoreError::not_found(EntityKind::Exercise, id))
    }

    fn set_index(&self, id: Uuid) -> Result<(usize, usize, usize)> {
        for (wi, w) in self.workouts.iter().enumerate() {
            for (ei, e) in w.exercises.iter().enumerate() {
                if let Some(si) = e.sets.iter().position(|s| s.id == id) {
                    return Ok((wi, ei, si));
                }
            }
        }
        Err(StoreError::not_found(EntityKind::ExerciseSet, id))
    }

    // ============================================================
    // Guard predicates
    // ============================================================

    /// False for the last workout of its segment, and for unknown ids.
    pub fn can_delete_workout(&self, id: Uuid) -> bool {
        self.workout(id)
            .map(|w| self.count_in_segment(w.segment) > 1)
            .unwrap_or(false)
    }

    /// False for the last exercise of its workout, and for unknown ids.
    pub fn can_delete_exercise(&self, exercise_id: Uuid) -> bool {
        self.workouts
            .iter()
            .find(|w| w.exercise(exercise_id).is_some())
            .map(|w| w.exercises.len() > 1)
            .unwrap_or(false)
    }

    /// False when the exercise has a single set left, and for unknown ids.
    pub fn can_remove_set(&self, exercise_id: Uuid) -> bool {
        self.exercise(exercise_id)
            .map(|e| e.sets.len() > 1)
            .unwrap_or(false)
    }

    // ============================================================
    // Workout operations
    // ============================================================

    pub fn create_workout(&mut self, segment: Segment) -> Result<Workout> {
        let n = self.count_in_segment(segment) + 1;
        let workout = Workout::new(self.defaults.workout_title(n), segment);

        self.db.insert_workout(&workout)?;
        tracing::info!(id = %workout.id, %segment, "Created workout {:?}", workout.title);

        self.workouts.push(workout.clone());
        self.notify(workout.id, segment, ChangeKind::Created);
        Ok(workout)
    }

    /// Delete a workout with all of its exercises and sets.
    ///
    /// Refused for the last workout of a segment.
    pub fn delete_workout(&mut self, id: Uuid) -> Result<bool> {
        let index = self.workout_index(id)?;
        if !self.can_delete_workout(id) {
            tracing::debug!(%id, "Refused to delete last workout of segment");
            return Ok(false);
        }

        self.db.delete_workout(id)?;
        let workout = self.workouts.remove(index);

        let mut forgotten: Vec<Uuid> = workout.exercises.iter().map(|e| e.id).collect();
        forgotten.push(workout.id);
        self.view.forget(&forgotten);

        tracing::info!(%id, "Deleted workout {:?}", workout.title);
        self.notify(id, workout.segment, ChangeKind::Deleted);
        Ok(true)
    }

    /// Flip the workout's expanded flag and return the new value.
    pub fn toggle_workout_expanded(&mut self, id: Uuid) -> Result<bool> {
        let index = self.workout_index(id)?;
        let segment = self.workouts[index].segment;

        let expanded = !self.view.is_expanded(id);
        self.db.set_expanded(id, expanded)?;
        self.view.toggle(id);

        self.notify(id, segment, ChangeKind::Updated);
        Ok(expanded)
    }

    pub fn rename_workout(&mut self, id: Uuid, title: &str) -> Result<()> {
        let index = self.workout_index(id)?;

        self.db.update_workout_title(id, title)?;
        let workout = &mut self.workouts[index];
        workout.title = title.to_string();
        let segment = workout.segment;

        self.notify(id, segment, ChangeKind::Updated);
        Ok(())
    }

    // ============================================================
    // Exercise operations
    // ============================================================

    /// Append a new exercise with a single default set.
    pub fn add_exercise(&mut self, workout_id: Uuid) -> Result<Exercise> {
        let index = self.workout_index(workout_id)?;
        let n = self.workouts[index].exercises.len() + 1;

        let mut exercise = Exercise::new(workout_id, self.defaults.exercise_name(n));
        exercise.sets.push(ExerciseSet::new(
            exercise.id,
            1,
            self.defaults.repetitions.clone(),
            self.defaults.weight.clone(),
        ));

        self.db.insert_exercise(&exercise)?;
        tracing::info!(id = %exercise.id, %workout_id, "Added exercise {:?}", exercise.name);

        let workout = &mut self.workouts[index];
        workout.exercises.push(exercise.clone());
        let segment = workout.segment;

        self.notify(workout_id, segment, ChangeKind::Updated);
        Ok(exercise)
    }

    /// Delete an exercise and its sets from a workout.
    ///
    /// Refused for the last exercise of the workout.
    pub fn delete_exercise(&mut self, workout_id: Uuid, exercise_id: Uuid) -> Result<bool> {
        let wi = self.workout_index(workout_id)?;
        let ei = self.workouts[wi]
            .exercises
            .iter()
            .position(|e| e.id == exercise_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Exercise, exercise_id))?;

        if self.workouts[wi].exercises.len() <= 1 {
            tracing::debug!(%exercise_id, "Refused to delete last exercise of workout");
            return Ok(false);
        }

        self.db.delete_exercise(exercise_id)?;

        let workout = &mut self.workouts[wi];
        let exercise = workout.exercises.remove(ei);
        let segment = workout.segment;
        self.view.forget(&[exercise_id]);

        tracing::info!(id = %exercise_id, %workout_id, "Deleted exercise {:?}", exercise.name);
        self.notify(workout_id, segment, ChangeKind::Updated);
        Ok(true)
    }

    /// Flip the exercise's expanded flag and return the new value.
    pub fn toggle_exercise_expanded(&mut self, exercise_id: Uuid) -> Result<bool> {
        let (wi, _) = self.exercise_index(exercise_id)?;
        let workout_id = self.workouts[wi].id;
        let segment = self.workouts[wi].segment;

        let expanded = !self.view.is_expanded(exercise_id);
        self.db.set_expanded(exercise_id, expanded)?;
        self.view.toggle(exercise_id);

        self.notify(workout_id, segment, ChangeKind::Updated);
        Ok(expanded)
    }

    pub fn rename_exercise(&mut self, exercise_id: Uuid, name: &str) -> Result<()> {
        let (wi, ei) = self.exercise_index(exercise_id)?;

        self.db.update_exercise_name(exercise_id, name)?;
        let workout = &mut self.workouts[wi];
        workout.exercises[ei].name = name.to_string();
        let (workout_id, segment) = (workout.id, workout.segment);

        self.notify(workout_id, segment, ChangeKind::Updated);
        Ok(())
    }

    // ============================================================
    // Set operations
    // ============================================================

    /// Append a set numbered after the current last one.
    pub fn add_set(&mut self, exercise_id: Uuid) -> Result<ExerciseSet> {
        let (wi, ei) = self.exercise_index(exercise_id)?;
        let number = self.workouts[wi].exercises[ei].sets.len() as u32 + 1;

        let set = ExerciseSet::new(
            exercise_id,
            number,
            self.defaults.repetitions.clone(),
            self.defaults.weight.clone(),
        );
        self.db.insert_set(&set)?;

        let workout = &mut self.workouts[wi];
        workout.exercises[ei].sets.push(set.clone());
        debug_assert!(workout.exercises[ei].sets_contiguous());
        let (workout_id, segment) = (workout.id, workout.segment);

        tracing::debug!(%exercise_id, set_number = number, "Added set");
        self.notify(workout_id, segment, ChangeKind::Updated);
        Ok(set)
    }

    /// Remove the last set and renumber the rest from 1.
    ///
    /// No-op when only one set is left.
    pub fn remove_set(&mut self, exercise_id: Uuid) -> Result<bool> {
        let (wi, ei) = self.exercise_index(exercise_id)?;

        let mut exercise = self.workouts[wi].exercises[ei].clone();
        if exercise.sets.len() <= 1 {
            tracing::debug!(%exercise_id, "Refused to remove last set");
            return Ok(false);
        }

        let Some(removed) = exercise.sets.pop() else {
            return Ok(false);
        };
        let renumbered = exercise.renumber_sets();
        debug_assert!(exercise.sets_contiguous());
        self.db.delete_set(removed.id, &renumbered)?;

        let workout = &mut self.workouts[wi];
        workout.exercises[ei] = exercise;
        let (workout_id, segment) = (workout.id, workout.segment);

        tracing::debug!(%exercise_id, set_number = removed.set_number, "Removed set");
        self.notify(workout_id, segment, ChangeKind::Updated);
        Ok(true)
    }

    /// Overwrite repetitions and/or weight. `None` leaves a field untouched.
    pub fn edit_set(
        &mut self,
        set_id: Uuid,
        repetitions: Option<&str>,
        weight: Option<&str>,
    ) -> Result<()> {
        let (wi, ei, si) = self.set_index(set_id)?;

        let mut set = self.workouts[wi].exercises[ei].sets[si].clone();
        if let Some(repetitions) = repetitions {
            set.repetitions = repetitions.to_string();
        }
        if let Some(weight) = weight {
            set.weight = weight.to_string();
        }
        self.db.update_set(&set)?;

        let workout = &mut self.workouts[wi];
        workout.exercises[ei].sets[si] = set;
        let (workout_id, segment) = (workout.id, workout.segment);

        self.notify(workout_id, segment, ChangeKind::Updated);
        Ok(())
    }
}
