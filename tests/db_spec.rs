use gymtrack::db::Database;
use gymtrack::models::*;
use speculate2::speculate;
use uuid::Uuid;

fn workout_with_exercise(title: &str, segment: Segment, sets: u32) -> Workout {
    let mut workout = Workout::new(title, segment);
    let mut exercise = Exercise::new(workout.id, "Squat");
    for n in 1..=sets {
        exercise
            .sets
            .push(ExerciseSet::new(exercise.id, n, "5", "100 kg"));
    }
    workout.exercises.push(exercise);
    workout
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "workouts" {
        describe "query_all_workouts" {
            it "returns empty list when no workouts exist" {
                let workouts = db.query_all_workouts().expect("Query failed");
                assert!(workouts.is_empty());
            }

            it "returns workouts ordered by title" {
                db.insert_workout(&Workout::new("Zercher day", Segment::Legs)).expect("Insert failed");
                db.insert_workout(&Workout::new("Arms", Segment::Chest)).expect("Insert failed");

                let workouts = db.query_all_workouts().expect("Query failed");
                assert_eq!(workouts.len(), 2);
                assert_eq!(workouts[0].title, "Arms");
                assert_eq!(workouts[0].segment, Segment::Chest);
                assert_eq!(workouts[1].title, "Zercher day");
            }

            it "loads nested exercises and sets" {
                let workout = workout_with_exercise("Legs A", Segment::Legs, 3);
                db.insert_workout(&workout).expect("Insert failed");

                let loaded = db.query_all_workouts().expect("Query failed");
                assert_eq!(loaded, vec![workout]);
            }

            it "keeps exercises in insertion order" {
                let workout = Workout::new("Pull", Segment::Back);
                db.insert_workout(&workout).expect("Insert failed");
                let names = ["Row", "Deadlift", "Chin-up"];
                for name in names {
                    db.insert_exercise(&Exercise::new(workout.id, name)).expect("Insert failed");
                }

                let loaded = db.query_all_workouts().expect("Query failed");
                let loaded_names: Vec<&str> =
                    loaded[0].exercises.iter().map(|e| e.name.as_str()).collect();
                assert_eq!(loaded_names, names);
            }
        }

        describe "update_workout_title" {
            it "returns false for non-existent workout" {
                let updated = db.update_workout_title(Uuid::new_v4(), "x").expect("Update failed");
                assert!(!updated);
            }
        }

        describe "delete_workout" {
            it "cascades to exercises and sets" {
                let workout = workout_with_exercise("Legs A", Segment::Legs, 2);
                let exercise_id = workout.exercises[0].id;
                db.insert_workout(&workout).expect("Insert failed");

                assert!(db.delete_workout(workout.id).expect("Delete failed"));

                assert!(db.query_all_workouts().expect("Query failed").is_empty());
                assert!(db.get_sets_by_exercise(exercise_id).expect("Query failed").is_empty());
            }
        }
    }

    describe "exercises" {
        describe "insert_exercise" {
            it "appends after gaps left by deletions" {
                let workout = Workout::new("Push", Segment::Chest);
                db.insert_workout(&workout).expect("Insert failed");
                let first = Exercise::new(workout.id, "Bench");
                let second = Exercise::new(workout.id, "Dips");
                db.insert_exercise(&first).expect("Insert failed");
                db.insert_exercise(&second).expect("Insert failed");
                db.delete_exercise(first.id).expect("Delete failed");

                db.insert_exercise(&Exercise::new(workout.id, "Flyes")).expect("Insert failed");

                let loaded = db.query_all_workouts().expect("Query failed");
                let names: Vec<&str> =
                    loaded[0].exercises.iter().map(|e| e.name.as_str()).collect();
                assert_eq!(names, vec!["Dips", "Flyes"]);
            }
        }

        describe "delete_exercise" {
            it "removes its sets" {
                let workout = workout_with_exercise("Legs A", Segment::Legs, 3);
                let exercise_id = workout.exercises[0].id;
                db.insert_workout(&workout).expect("Insert failed");

                assert!(db.delete_exercise(exercise_id).expect("Delete failed"));
                assert!(db.get_sets_by_exercise(exercise_id).expect("Query failed").is_empty());
            }

            it "returns false for non-existent exercise" {
                assert!(!db.delete_exercise(Uuid::new_v4()).expect("Delete failed"));
            }
        }
    }

    describe "exercise_sets" {
        describe "delete_set" {
            it "applies renumbering with the delete" {
                let workout = workout_with_exercise("Legs A", Segment::Legs, 3);
                let sets = workout.exercises[0].sets.clone();
                db.insert_workout(&workout).expect("Insert failed");

                db.delete_set(sets[0].id, &[(sets[1].id, 1), (sets[2].id, 2)])
                    .expect("Delete failed");

                let remaining = db.get_sets_by_exercise(sets[0].exercise_id).expect("Query failed");
                let ids: Vec<Uuid> = remaining.iter().map(|s| s.id).collect();
                let numbers: Vec<u32> = remaining.iter().map(|s| s.set_number).collect();
                assert_eq!(ids, vec![sets[1].id, sets[2].id]);
                assert_eq!(numbers, vec![1, 2]);
            }
        }

        describe "update_set" {
            it "writes repetitions and weight" {
                let workout = workout_with_exercise("Legs A", Segment::Legs, 1);
                let mut set = workout.exercises[0].sets[0].clone();
                db.insert_workout(&workout).expect("Insert failed");

                set.repetitions = "3".to_string();
                set.weight = "120 kg".to_string();
                assert!(db.update_set(&set).expect("Update failed"));

                let stored = db.get_sets_by_exercise(set.exercise_id).expect("Query failed");
                assert_eq!(stored, vec![set]);
            }
        }
    }

    describe "view_state" {
        it "upserts flags" {
            let a = Uuid::new_v4();

            db.set_expanded(a, false).expect("Write failed");
            db.set_expanded(a, true).expect("Write failed");

            let entries = db.load_view_state().expect("Query failed");
            assert_eq!(entries, vec![(a, true)]);
        }

        it "is cleared with the deleted exercise" {
            let workout = workout_with_exercise("Legs A", Segment::Legs, 1);
            let exercise_id = workout.exercises[0].id;
            db.insert_workout(&workout).expect("Insert failed");
            db.set_expanded(exercise_id, false).expect("Write failed");
            db.set_expanded(workout.id, false).expect("Write failed");

            db.delete_exercise(exercise_id).expect("Delete failed");

            assert_eq!(db.load_view_state().expect("Query failed"), vec![(workout.id, false)]);
        }

        it "is cleared with the deleted workout and its exercises" {
            let workout = workout_with_exercise("Legs A", Segment::Legs, 1);
            db.insert_workout(&workout).expect("Insert failed");
            db.set_expanded(workout.exercises[0].id, false).expect("Write failed");
            db.set_expanded(workout.id, false).expect("Write failed");

            db.delete_workout(workout.id).expect("Delete failed");

            assert!(db.load_view_state().expect("Query failed").is_empty());
        }
    }

    describe "on disk" {
        it "persists across connections" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("data").join("gymtrack.db");
            let workout = workout_with_exercise("Legs A", Segment::Legs, 2);

            {
                let db = Database::open(path.clone()).expect("Failed to open");
                db.migrate().expect("Failed to migrate");
                db.insert_workout(&workout).expect("Insert failed");
            }

            let db = Database::open(path).expect("Failed to reopen");
            db.migrate().expect("Failed to migrate");
            assert_eq!(db.query_all_workouts().expect("Query failed"), vec![workout]);
        }
    }
}
