#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use algotrace::{StepEvent, Trace};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

/// Compare `actual` with the golden file `tests/snapshots/<name>`
pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("ALGOTRACE_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set ALGOTRACE_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n").trim_end().to_string()
}

/// One `index tag: description` line per step
pub fn render<E: StepEvent>(trace: &Trace<E>) -> String {
    trace
        .iter()
        .enumerate()
        .map(|(index, step)| format!("{} {}\n", index, step))
        .collect()
}

/// Non-empty, exactly one terminal step, and it is the last one
pub fn assert_well_formed<E: StepEvent>(trace: &Trace<E>) {
    assert!(!trace.is_empty(), "{} produced no steps", trace.operation());
    let terminals = trace.iter().filter(|step| step.is_terminal()).count();
    assert_eq!(terminals, 1, "{} has {} terminal steps", trace.operation(), terminals);
    assert!(trace.last().is_terminal());
}

/// Complete binary search tree of height 3
pub const BALANCED_SEVEN: [i64; 7] = [50, 30, 70, 20, 40, 60, 80];
