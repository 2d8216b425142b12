use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

// Static directory prefix before the first glob meta-character
fn static_prefix_dir(pattern: &str) -> PathBuf {
    let idx = pattern
        .find(['*', '?', '[', '{'])
        .unwrap_or(pattern.len());
    let p = Path::new(&pattern[..idx]);
    if p.is_dir() {
        p.to_path_buf()
    } else {
        p.parent()
            .filter(|pp| !pp.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Expand grid file arguments into concrete paths.
///
/// Plain paths are kept as given, even when missing, so the import reports them. Glob
/// patterns are matched with a .gitignore-aware walk; a pattern matching nothing is an
/// error. Matches of one pattern come out sorted, and duplicates are dropped.
pub fn expand_input_globs(inputs: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut results: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    let expanded: Vec<Vec<PathBuf>> = inputs
        .par_iter()
        .map(|input| {
            if has_glob_meta(input) {
                expand_pattern(input)
            } else {
                Ok(vec![PathBuf::from(input)])
            }
        })
        .collect::<Result<_, _>>()?;

    for path in expanded.into_iter().flatten() {
        if seen.insert(path.clone()) {
            results.push(path);
        }
    }
    Ok(results)
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, String> {
    // literal_separator keeps '*' from crossing '/'
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;
    let set = GlobSetBuilder::new()
        .add(glob)
        .build()
        .map_err(|e| format!("Failed to build glob set: {}", e))?;

    let root = static_prefix_dir(pattern);
    let walker = WalkBuilder::new(&root)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .hidden(false)
        .ignore(true)
        .parents(true)
        .build();

    let mut out: Vec<PathBuf> = Vec::new();
    for dent in walker {
        let Ok(dent) = dent else { continue };
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        // Walks from "." yield "./name"; match against the spelling the user typed
        let path = dent.path();
        let candidate = if pattern.starts_with("./") {
            path
        } else {
            path.strip_prefix(".").unwrap_or(path)
        };
        if set.is_match(candidate) {
            out.push(candidate.to_path_buf());
        }
    }

    if out.is_empty() {
        return Err(format!("No file matches '{}'", pattern));
    }
    out.sort();
    Ok(out)
}
