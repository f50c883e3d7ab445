use rayon::prelude::*;

/// Marker git writes at the start of every per-file section.
pub const FILE_MARKER: &str = "diff --git";

/// Machine-generated files that only burn tokens in a description prompt.
pub const LOCKFILES: &[&str] = &[
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "npm-debug.log",
    "yarn-debug.log",
    "yarn-error.log",
    ".pnpm-debug.log",
    "bun.lockb",
    "bun.lock",
    "Cargo.lock",
    "Gemfile.lock",
    "mix.lock",
    "Pipfile.lock",
    "poetry.lock",
    "uv.lock",
    "composer.lock",
    "go.sum",
];

/// Split a unified diff into one chunk per file, in diff order.
///
/// Each chunk starts at its `diff --git` line and is trimmed. Anything before
/// the first marker is dropped. Markers only count at the start of a line so
/// diffs of files that mention the marker in their content stay intact.
pub fn split_into_chunks(diff: &str) -> Vec<&str> {
    let starts: Vec<usize> = diff
        .match_indices(FILE_MARKER)
        .map(|(idx, _)| idx)
        .filter(|&idx| idx == 0 || diff.as_bytes()[idx - 1] == b'\n')
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(diff.len());
            diff[start..end].trim()
        })
        .collect()
}

fn header(chunk: &str) -> &str {
    chunk.lines().next().unwrap_or("")
}

/// Name of the lockfile mentioned in a chunk's header line, if any.
pub fn lockfile_in_header(chunk: &str) -> Option<&'static str> {
    let header = header(chunk);
    LOCKFILES.iter().copied().find(|name| header.contains(name))
}

/// Drop every chunk whose header names a lockfile.
///
/// Decisions are computed in parallel, indexed by position, and then
/// compacted serially so surviving chunks keep their original order.
pub fn remove_lockfiles<'a>(chunks: &[&'a str]) -> Vec<&'a str> {
    let keep: Vec<bool> = chunks
        .par_iter()
        .map(|chunk| match lockfile_in_header(chunk) {
            Some(file) => {
                log::debug!("Ignoring lockfile {file}");
                false
            }
            None => {
                log::debug!("Adding {}", header(chunk));
                true
            }
        })
        .collect();

    chunks
        .iter()
        .zip(keep)
        .filter_map(|(chunk, keep)| keep.then_some(*chunk))
        .collect()
}

/// Split the diff in chunks and remove any lock files to save on tokens.
pub fn prepare_diff(diff: &str) -> String {
    let chunks = split_into_chunks(diff);
    let kept = remove_lockfiles(&chunks);

    log::debug!(
        "Prepared diff: kept {} of {} file chunk(s)",
        kept.len(),
        chunks.len()
    );

    kept.join("\n")
}
