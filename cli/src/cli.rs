//! Implements the command line behavior.
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use scanvm_dsl::ast::Program;
use scanvm_runtime::{initialize_variables, run_scan_cycle, RuntimeState, Store};

/// Loads a JSON-encoded program, runs `scans` scan cycles at
/// `scan_time_ms`, and prints the final scalar store as JSON.
///
/// The AST is read as JSON rather than parsed from source text: the
/// lexer/CST-to-AST transformation is a separate concern this binary
/// does not implement.
pub fn run(program_path: PathBuf, scan_time_ms: i64, scans: u32) -> Result<(), String> {
    let program = load_program(&program_path)?;

    let mut store = Store::new(scan_time_ms);
    initialize_variables(&program, &mut store);
    let mut runtime_state = RuntimeState::create(&program);

    for scan in 0..scans {
        run_scan_cycle(&program, &mut store, &mut runtime_state)
            .map_err(|e| format!("scan {} failed: {}", scan, e))?;
    }

    println!("{}", dump_store(&store));
    Ok(())
}

fn load_program(path: &PathBuf) -> Result<Program, String> {
    let mut file = File::open(path).map_err(|e| format!("failed opening {}: {}", path.display(), e))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| format!("failed reading {}: {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("failed parsing {}: {}", path.display(), e))
}

fn dump_store(store: &Store) -> String {
    let mut map = serde_json::Map::new();
    for (name, v) in &store.booleans {
        map.insert(name.as_str().to_string(), serde_json::json!(v));
    }
    for (name, v) in &store.integers {
        map.insert(name.as_str().to_string(), serde_json::json!(v));
    }
    for (name, v) in &store.reals {
        map.insert(name.as_str().to_string(), serde_json::json!(v));
    }
    for (name, v) in &store.times {
        map.insert(name.as_str().to_string(), serde_json::json!(v));
    }
    for (name, v) in &store.strings {
        map.insert(name.as_str().to_string(), serde_json::json!(v));
    }
    serde_json::to_string_pretty(&serde_json::Value::Object(map)).unwrap_or_default()
}
