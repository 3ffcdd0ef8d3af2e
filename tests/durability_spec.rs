use gymtrack::config::Defaults;
use gymtrack::db::Database;
use gymtrack::models::*;
use gymtrack::WorkoutStore;
use speculate2::speculate;

/// Break the view_state table from a second connection so the next delete
/// fails partway through its transaction.
fn drop_view_state(path: &std::path::Path) {
    let conn = rusqlite::Connection::open(path).expect("Failed to open second connection");
    conn.execute_batch("DROP TABLE view_state")
        .expect("Failed to drop view_state");
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("gymtrack.db");
        let db = Database::open(path.clone()).expect("Failed to open database");
        db.migrate().expect("Failed to run migrations");
        let mut store = WorkoutStore::open(db.clone(), Defaults::default())
            .expect("Failed to open store");
        let workout_id = store.workouts_for_segment(Segment::Back)[0].id;
    }

    describe "failed delete_exercise" {
        it "leaves the exercise in memory and on disk" {
            store.add_exercise(workout_id).expect("Failed to add");
            let doomed = store.add_exercise(workout_id).expect("Failed to add");
            drop_view_state(&path);

            assert!(store.delete_exercise(workout_id, doomed.id).is_err());

            assert!(store.exercise(doomed.id).is_some());
            let rows = db.get_sets_by_exercise(doomed.id).expect("Query failed");
            assert_eq!(rows.len(), 1);
            let added = store.add_set(doomed.id).expect("Exercise should still accept sets");
            assert_eq!(added.set_number, 2);
        }
    }

    describe "failed delete_workout" {
        it "leaves the workout in memory and on disk" {
            let extra = store.create_workout(Segment::Back).expect("Failed to create");
            let exercise = store.add_exercise(extra.id).expect("Failed to add");
            drop_view_state(&path);

            assert!(store.delete_workout(extra.id).is_err());

            assert!(store.workout(extra.id).is_some());
            assert_eq!(store.workouts_for_segment(Segment::Back).len(), 2);
            let stored = db.query_all_workouts().expect("Query failed");
            assert!(stored.iter().any(|w| w.id == extra.id));
            let rows = db.get_sets_by_exercise(exercise.id).expect("Query failed");
            assert_eq!(rows.len(), 1);
            assert!(store.workout(workout_id).is_some());
        }
    }

    describe "successful deletes" {
        it "drop the view flags of everything removed" {
            let extra = store.create_workout(Segment::Back).expect("Failed to create");
            let exercise = store.add_exercise(extra.id).expect("Failed to add");
            let kept = store.add_exercise(workout_id).expect("Failed to add");
            let gone = store.add_exercise(workout_id).expect("Failed to add");
            store.toggle_workout_expanded(extra.id).expect("Toggle failed");
            store.toggle_exercise_expanded(exercise.id).expect("Toggle failed");
            store.toggle_exercise_expanded(kept.id).expect("Toggle failed");
            store.toggle_exercise_expanded(gone.id).expect("Toggle failed");

            assert!(store.delete_workout(extra.id).expect("Delete failed"));
            assert!(store.delete_exercise(workout_id, gone.id).expect("Delete failed"));

            let entries = db.load_view_state().expect("Query failed");
            assert_eq!(entries, vec![(kept.id, false)]);
        }
    }
}
