//! Hygiene: source-level checks run as tests.
//!
//! Scans the gridview sources for panicking calls and silently discarded
//! errors. Budgets are zero and stay there; sibling `*_test.rs` files are
//! exempt.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

// Panics.
const MAX_UNWRAP: usize = 0;
const MAX_EXPECT: usize = 0;
const MAX_PANIC: usize = 0;
const MAX_UNREACHABLE: usize = 0;
const MAX_TODO: usize = 0;
const MAX_UNIMPLEMENTED: usize = 0;

// Errors dropped without inspection.
const MAX_SILENT_DISCARD: usize = 0;
const MAX_DOT_OK: usize = 0;

// Style / structure.
const MAX_ALLOW_DEAD_CODE: usize = 0;

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            if name == "target" || name == "tests" {
                continue;
            }
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

fn count_in_source(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| line.contains(pattern))
                .count();
            if count > 0 {
                Some((file.path.clone(), count))
            } else {
                None
            }
        })
        .collect()
}

fn total(hits: &[(String, usize)]) -> usize {
    hits.iter().map(|(_, c)| c).sum()
}

fn format_hits(hits: &[(String, usize)]) -> String {
    hits.iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// (pattern, budget, label)
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", MAX_UNWRAP, ".unwrap()"),
    (".expect(", MAX_EXPECT, ".expect()"),
    ("panic!(", MAX_PANIC, "panic!()"),
    ("unreachable!(", MAX_UNREACHABLE, "unreachable!()"),
    ("todo!(", MAX_TODO, "todo!()"),
    ("unimplemented!(", MAX_UNIMPLEMENTED, "unimplemented!()"),
    ("let _ =", MAX_SILENT_DISCARD, "let _ ="),
    (".ok()", MAX_DOT_OK, ".ok()"),
    ("#[allow(dead_code)]", MAX_ALLOW_DEAD_CODE, "#[allow(dead_code)]"),
];

fn check(pattern: &str) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found under src/");
    let Some(&(_, max, label)) = BUDGETS.iter().find(|(p, _, _)| *p == pattern) else {
        return;
    };
    let hits = count_in_source(&files, pattern);
    let count = total(&hits);
    assert!(count <= max, "{label} budget exceeded: found {count}, max {max}.\n{}", format_hits(&hits));
}

#[test]
fn unwrap_budget() {
    check(".unwrap()");
}

#[test]
fn expect_budget() {
    check(".expect(");
}

#[test]
fn panic_budget() {
    check("panic!(");
}

#[test]
fn unreachable_budget() {
    check("unreachable!(");
}

#[test]
fn todo_budget() {
    check("todo!(");
}

#[test]
fn unimplemented_budget() {
    check("unimplemented!(");
}

#[test]
fn silent_discard_budget() {
    check("let _ =");
}

#[test]
fn dot_ok_budget() {
    check(".ok()");
}

#[test]
fn allow_dead_code_budget() {
    check("#[allow(dead_code)]");
}

#[test]
fn no_hydrate_only_imports_in_native_modules() {
    // Browser crates stay behind the feature gate in host.rs and logging.rs.
    let files = source_files();
    let offenders: Vec<_> = files
        .iter()
        .filter(|f| !f.path.ends_with("host.rs") && !f.path.ends_with("logging.rs"))
        .filter(|f| {
            f.content
                .lines()
                .any(|l| l.trim_start().starts_with("use web_sys") || l.trim_start().starts_with("use gloo_timers"))
        })
        .map(|f| f.path.clone())
        .collect();
    assert!(offenders.is_empty(), "browser imports outside the host: {offenders:?}");
}
