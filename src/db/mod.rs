mod schema;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;

/// SQLite-backed object store for the workout hierarchy.
///
/// This layer only reads and writes rows. The cardinality rules (last
/// workout, last exercise, last set) live in [`crate::store::WorkoutStore`].
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        tracing::debug!(path = %path.display(), "Opened database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock();
        schema::run_migrations(&conn)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database lock poisoned")
    }

    // ============================================================
    // Workout operations
    // ============================================================

    /// Load every workout with its exercises and sets, ordered by title.
    ///
    /// Exercises come back in position order and sets in set-number order.
    pub fn query_all_workouts(&self) -> Result<Vec<Workout>> {
        let conn = self.lock();

        let mut sets_by_exercise: HashMap<Uuid, Vec<ExerciseSet>> = HashMap::new();
        {
            let mut stmt = conn.prepare(
                "SELECT id, exercise_id, set_number, repetitions, weight
                 FROM exercise_sets ORDER BY exercise_id, set_number",
            )?;
            let sets = stmt
                .query_map([], |row| {
                    Ok(ExerciseSet {
                        id: parse_uuid(row.get::<_, String>(0)?),
                        exercise_id: parse_uuid(row.get::<_, String>(1)?),
                        set_number: row.get(2)?,
                        repetitions: row.get(3)?,
                        weight: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            for set in sets {
                sets_by_exercise.entry(set.exercise_id).or_default().push(set);
            }
        }

        let mut exercises_by_workout: HashMap<Uuid, Vec<Exercise>> = HashMap::new();
        {
            let mut stmt = conn.prepare(
                "SELECT id, workout_id, name FROM exercises ORDER BY workout_id, position",
            )?;
            let exercises = stmt
                .query_map([], |row| {
                    Ok(Exercise {
                        id: parse_uuid(row.get::<_, String>(0)?),
                        workout_id: parse_uuid(row.get::<_, String>(1)?),
                        name: row.get(2)?,
                        sets: Vec::new(),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            for mut exercise in exercises {
                exercise.sets = sets_by_exercise.remove(&exercise.id).unwrap_or_default();
                exercises_by_workout
                    .entry(exercise.workout_id)
                    .or_default()
                    .push(exercise);
            }
        }

        let mut stmt = conn.prepare(
            "SELECT id, title, segment, created_at
             FROM workouts ORDER BY title, created_at",
        )?;
        let workouts = stmt
            .query_map([], |row| {
                let id = parse_uuid(row.get::<_, String>(0)?);
                let segment = row.get::<_, String>(2)?;
                Ok(Workout {
                    id,
                    title: row.get(1)?,
                    segment: Segment::from_str(&segment).unwrap_or(Segment::Back),
                    exercises: Vec::new(),
                    created_at: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(workouts
            .into_iter()
            .map(|mut w| {
                w.exercises = exercises_by_workout.remove(&w.id).unwrap_or_default();
                w
            })
            .collect())
    }

    /// Insert a workout row together with any exercises and sets it already owns.
    pub fn insert_workout(&self, workout: &Workout) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO workouts (id, title, segment, created_at) VALUES (?, ?, ?, ?)",
            (
                workout.id.to_string(),
                &workout.title,
                workout.segment.as_str(),
                workout.created_at.to_rfc3339(),
            ),
        )?;
        for (position, exercise) in workout.exercises.iter().enumerate() {
            insert_exercise_row(&tx, exercise, position as i64)?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn update_workout_title(&self, id: Uuid, title: &str) -> Result<bool> {
        let conn = self.lock();
        let rows = conn.execute(
            "UPDATE workouts SET title = ? WHERE id = ?",
            (title, id.to_string()),
        )?;
        Ok(rows > 0)
    }

    /// Delete a workout. Exercises and sets go with it via `ON DELETE CASCADE`;
    /// view flags of the workout and its exercises are dropped in the same
    /// transaction.
    pub fn delete_workout(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM view_state
             WHERE entity_id = ?1
                OR entity_id IN (SELECT id FROM exercises WHERE workout_id = ?1)",
            [id.to_string()],
        )?;
        let rows = tx.execute("DELETE FROM workouts WHERE id = ?", [id.to_string()])?;

        tx.commit()?;
        Ok(rows > 0)
    }

    // ============================================================
    // Exercise operations
    // ============================================================

    /// Append an exercise (and its sets) after the workout's current last exercise.
    pub fn insert_exercise(&self, exercise: &Exercise) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM exercises WHERE workout_id = ?",
            [exercise.workout_id.to_string()],
            |row| row.get(0),
        )?;
        insert_exercise_row(&tx, exercise, position)?;

        tx.commit()?;
        Ok(())
    }

    pub fn update_exercise_name(&self, id: Uuid, name: &str) -> Result<bool> {
        let conn = self.lock();
        let rows = conn.execute(
            "UPDATE exercises SET name = ? WHERE id = ?",
            (name, id.to_string()),
        )?;
        Ok(rows > 0)
    }

    /// Delete an exercise, all of its sets and its view flag.
    pub fn delete_exercise(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM view_state WHERE entity_id = ?", [id.to_string()])?;
        tx.execute(
            "DELETE FROM exercise_sets WHERE exercise_id = ?",
            [id.to_string()],
        )?;
        let rows = tx.execute("DELETE FROM exercises WHERE id = ?", [id.to_string()])?;

        tx.commit()?;
        Ok(rows > 0)
    }

    // ============================================================
    // Exercise set operations
    // ============================================================

    pub fn get_sets_by_exercise(&self, exercise_id: Uuid) -> Result<Vec<ExerciseSet>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, exercise_id, set_number, repetitions, weight
             FROM exercise_sets WHERE exercise_id = ? ORDER BY set_number",
        )?;

        let sets = stmt
            .query_map([exercise_id.to_string()], |row| {
                Ok(ExerciseSet {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    exercise_id: parse_uuid(row.get::<_, String>(1)?),
                    set_number: row.get(2)?,
                    repetitions: row.get(3)?,
                    weight: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sets)
    }

    pub fn insert_set(&self, set: &ExerciseSet) -> Result<()> {
        let conn = self.lock();
        insert_set_row(&conn, set)
    }

    /// Write repetitions and weight of an existing set.
    pub fn update_set(&self, set: &ExerciseSet) -> Result<bool> {
        let conn = self.lock();
        let rows = conn.execute(
            "UPDATE exercise_sets SET repetitions = ?, weight = ? WHERE id = ?",
            (&set.repetitions, &set.weight, set.id.to_string()),
        )?;
        Ok(rows > 0)
    }

    /// Delete one set and apply new numbers to the survivors in one transaction.
    pub fn delete_set(&self, id: Uuid, renumbered: &[(Uuid, u32)]) -> Result<bool> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let rows = tx.execute("DELETE FROM exercise_sets WHERE id = ?", [id.to_string()])?;
        for (set_id, number) in renumbered {
            tx.execute(
                "UPDATE exercise_sets SET set_number = ? WHERE id = ?",
                (number, set_id.to_string()),
            )?;
        }

        tx.commit()?;
        Ok(rows > 0)
    }

    // ============================================================
    // View state operations
    // ============================================================

    pub fn load_view_state(&self) -> Result<Vec<(Uuid, bool)>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT entity_id, expanded FROM view_state")?;
        let entries = stmt
            .query_map([], |row| {
                Ok((
                    parse_uuid(row.get::<_, String>(0)?),
                    row.get::<_, i32>(1)? != 0,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn set_expanded(&self, entity_id: Uuid, expanded: bool) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO view_state (entity_id, expanded) VALUES (?, ?)
             ON CONFLICT(entity_id) DO UPDATE SET expanded = excluded.expanded",
            (entity_id.to_string(), if expanded { 1 } else { 0 }),
        )?;
        Ok(())
    }

}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// Location of the database file in the platform data directory.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "gymtrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("gymtrack.db"))
}

fn insert_exercise_row(conn: &Connection, exercise: &Exercise, position: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO exercises (id, workout_id, name, position) VALUES (?, ?, ?, ?)",
        (
            exercise.id.to_string(),
            exercise.workout_id.to_string(),
            &exercise.name,
            position,
        ),
    )?;
    for set in &exercise.sets {
        insert_set_row(conn, set)?;
    }
    Ok(())
}

fn insert_set_row(conn: &Connection, set: &ExerciseSet) -> Result<()> {
    conn.execute(
        "INSERT INTO exercise_sets (id, exercise_id, set_number, repetitions, weight)
         VALUES (?, ?, ?, ?, ?)",
        (
            set.id.to_string(),
            set.exercise_id.to_string(),
            set.set_number,
            &set.repetitions,
            &set.weight,
        ),
    )?;
    Ok(())
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
