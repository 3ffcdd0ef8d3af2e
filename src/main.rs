use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use gymtrack::config::Defaults;
use gymtrack::db::Database;
use gymtrack::models::Segment;
use gymtrack::{render, WorkoutStore};

#[derive(Parser)]
#[command(name = "gymtrack")]
#[command(about = "Track workouts by segment, with exercises and sets")]
struct Cli {
    /// Path to the database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the workouts of a segment (or all segments)
    List {
        #[arg(value_parser = parse_segment)]
        segment: Option<Segment>,

        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Add a workout to a segment
    AddWorkout {
        #[arg(value_parser = parse_segment)]
        segment: Segment,
    },
    /// Delete a workout with all its exercises and sets
    DeleteWorkout { id: Uuid },
    /// Expand or collapse a workout
    ToggleWorkout { id: Uuid },
    /// Change a workout's title
    RenameWorkout { id: Uuid, title: String },
    /// Add an exercise (with one set) to a workout
    AddExercise { workout_id: Uuid },
    /// Delete an exercise and its sets
    DeleteExercise { workout_id: Uuid, exercise_id: Uuid },
    /// Expand or collapse an exercise
    ToggleExercise { id: Uuid },
    /// Change an exercise's name
    RenameExercise { id: Uuid, name: String },
    /// Append a set to an exercise
    AddSet { exercise_id: Uuid },
    /// Remove the last set of an exercise
    RemoveSet { exercise_id: Uuid },
    /// Write the current defaults to the config file so they can be edited
    InitConfig,
    /// Change repetitions and/or weight of a set
    EditSet {
        id: Uuid,
        #[arg(short, long)]
        repetitions: Option<String>,
        #[arg(short, long)]
        weight: Option<String>,
    },
}

fn parse_segment(s: &str) -> Result<Segment, String> {
    Segment::from_str(s)
        .ok_or_else(|| format!("unknown segment '{}' (expected back, chest or legs)", s))
}

/// Initialize tracing on stderr so stdout only carries command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "gymtrack=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_store(path: Option<PathBuf>) -> anyhow::Result<WorkoutStore> {
    let db = match path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;

    Ok(WorkoutStore::open(db, Defaults::load())?)
}

fn report_refusal(done: bool, reason: &str) {
    if !done {
        println!("Refused: {}", reason);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if let Some(Commands::InitConfig) = cli.command {
        let path = gymtrack::config::get_config_path()?;
        Defaults::load().save_to(&path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut store = open_store(cli.db)?;

    // Segment whose tree is printed after the command ran.
    let mut show: Option<Segment> = None;

    match cli.command {
        None | Some(Commands::InitConfig) => {
            for segment in Segment::ALL {
                print!("{}", render::render_segment(&store, segment));
            }
        }
        Some(Commands::List { segment, json }) => {
            let segments = match segment {
                Some(segment) => vec![segment],
                None => Segment::ALL.to_vec(),
            };
            if json {
                let workouts: Vec<_> = segments
                    .iter()
                    .flat_map(|s| store.workouts_for_segment(*s))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&workouts)?);
            } else {
                for segment in segments {
                    print!("{}", render::render_segment(&store, segment));
                }
            }
        }
        Some(Commands::AddWorkout { segment }) => {
            let workout = store.create_workout(segment)?;
            println!("{}", workout.id);
            show = Some(segment);
        }
        Some(Commands::DeleteWorkout { id }) => {
            let segment = store.workout(id).map(|w| w.segment);
            report_refusal(
                store.delete_workout(id)?,
                "the last workout of a segment cannot be deleted",
            );
            show = segment;
        }
        Some(Commands::ToggleWorkout { id }) => {
            store.toggle_workout_expanded(id)?;
            show = store.workout(id).map(|w| w.segment);
        }
        Some(Commands::RenameWorkout { id, title }) => {
            store.rename_workout(id, &title)?;
            show = store.workout(id).map(|w| w.segment);
        }
        Some(Commands::AddExercise { workout_id }) => {
            let exercise = store.add_exercise(workout_id)?;
            println!("{}", exercise.id);
            show = store.workout(workout_id).map(|w| w.segment);
        }
        Some(Commands::DeleteExercise {
            workout_id,
            exercise_id,
        }) => {
            report_refusal(
                store.delete_exercise(workout_id, exercise_id)?,
                "the last exercise of a workout cannot be deleted",
            );
            show = store.workout(workout_id).map(|w| w.segment);
        }
        Some(Commands::ToggleExercise { id }) => {
            store.toggle_exercise_expanded(id)?;
            show = segment_of_exercise(&store, id);
        }
        Some(Commands::RenameExercise { id, name }) => {
            store.rename_exercise(id, &name)?;
            show = segment_of_exercise(&store, id);
        }
        Some(Commands::AddSet { exercise_id }) => {
            let set = store.add_set(exercise_id)?;
            println!("{}", set.id);
            show = segment_of_exercise(&store, exercise_id);
        }
        Some(Commands::RemoveSet { exercise_id }) => {
            report_refusal(
                store.remove_set(exercise_id)?,
                "the last set of an exercise cannot be removed",
            );
            show = segment_of_exercise(&store, exercise_id);
        }
        Some(Commands::EditSet {
            id,
            repetitions,
            weight,
        }) => {
            store.edit_set(id, repetitions.as_deref(), weight.as_deref())?;
            show = store
                .exercise_set(id)
                .and_then(|s| segment_of_exercise(&store, s.exercise_id));
        }
    }

    if let Some(segment) = show {
        print!("{}", render::render_segment(&store, segment));
    }

    Ok(())
}

fn segment_of_exercise(store: &WorkoutStore, exercise_id: Uuid) -> Option<Segment> {
    store
        .exercise(exercise_id)
        .and_then(|e| store.workout(e.workout_id))
        .map(|w| w.segment)
}
