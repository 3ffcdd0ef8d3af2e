//! ASCII tree rendering for a segment's workouts.

use crate::models::{Exercise, ExerciseSet, Segment};
use crate::store::WorkoutStore;

const EXPANDED: char = '▾';
const COLLAPSED: char = '▸';

struct Node {
    symbol: Option<char>,
    label: String,
    children: Vec<Node>,
}

fn expand_symbol(expanded: bool) -> char {
    if expanded {
        EXPANDED
    } else {
        COLLAPSED
    }
}

/// Render one segment as an ASCII tree.
///
/// Collapsed workouts and exercises are shown without their children.
///
/// Example output:
/// ```text
/// Back
/// ├── ▾ Workout 1
/// │   ├── ▾ Deadlift
/// │   │   ├── 1. 10 × 75 kg
/// │   │   └── 2. 8 × 80 kg
/// │   └── ▸ Row
/// └── ▸ Workout 2
/// ```
pub fn render_segment(store: &WorkoutStore, segment: Segment) -> String {
    let workouts = store
        .workouts_for_segment(segment)
        .into_iter()
        .map(|workout| {
            let expanded = store.is_expanded(workout.id);
            Node {
                symbol: Some(expand_symbol(expanded)),
                label: workout.title.clone(),
                children: if expanded {
                    workout
                        .exercises
                        .iter()
                        .map(|e| exercise_node(store, e))
                        .collect()
                } else {
                    Vec::new()
                },
            }
        })
        .collect();

    let root = Node {
        symbol: None,
        label: store.defaults().segment_labels.label(segment).to_string(),
        children: workouts,
    };

    let mut output = String::new();
    render_node(&mut output, &root, "", true, true);
    output
}

fn exercise_node(store: &WorkoutStore, exercise: &Exercise) -> Node {
    let expanded = store.is_expanded(exercise.id);
    Node {
        symbol: Some(expand_symbol(expanded)),
        label: exercise.name.clone(),
        children: if expanded {
            exercise.sets.iter().map(set_node).collect()
        } else {
            Vec::new()
        },
    }
}

fn set_node(set: &ExerciseSet) -> Node {
    Node {
        symbol: None,
        label: format!("{}. {} × {}", set.set_number, set.repetitions, set.weight),
        children: Vec::new(),
    }
}

fn render_node(output: &mut String, node: &Node, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        output.push_str(&node.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        if let Some(symbol) = node.symbol {
            output.push(symbol);
            output.push(' ');
        }
        output.push_str(&node.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}
