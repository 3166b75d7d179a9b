mod types;

pub use types::ParsedFile;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// S01E02, s1e2, S01E01-E02, S01E01E02
static SEASON_EPISODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)S(\d{1,2})E(\d{1,2})(?:-?E(\d{1,2}))?").unwrap());

// 1x02, 1x01-02, 1x01x02
static CROSS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2})x(\d{1,2})(?:[-x](\d{1,2}))?").unwrap());

// Bare 103 / 103-04; ambiguous without external season context
static TRIPLE_DIGIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)(\d{2})(?:-(\d{2}))?").unwrap());

fn capture_u32(captures: &regex::Captures, index: usize) -> u32 {
    captures
        .get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Extract season/episode tokens from a file basename.
///
/// Patterns are tried in order and the first match wins; the bare
/// 3-digit form only applies when a season hint exists. Returns `None`
/// when nothing matches, which callers treat as "skip this file".
pub fn parse_filename(
    name: &str,
    season_hint: Option<u32>,
    show_hint: Option<&str>,
) -> Option<ParsedFile> {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = name
        .strip_suffix(&format!(".{}", ext))
        .unwrap_or(name)
        .to_string();

    let (season, episode, episode2) = if let Some(m) = SEASON_EPISODE_REGEX.captures(&stem) {
        (capture_u32(&m, 1), capture_u32(&m, 2), capture_u32(&m, 3))
    } else if let Some(m) = CROSS_REGEX.captures(&stem) {
        (capture_u32(&m, 1), capture_u32(&m, 2), capture_u32(&m, 3))
    } else if let (Some(hint), Some(m)) = (season_hint, TRIPLE_DIGIT_REGEX.captures(&stem)) {
        (hint, capture_u32(&m, 2), capture_u32(&m, 3))
    } else {
        return None;
    };

    // A span end at or below the start is not a span
    let episode2 = if episode2 > episode { episode2 } else { 0 };

    let show = match show_hint {
        Some(hint) if !hint.is_empty() => hint.to_string(),
        _ => guess_show_name(&stem),
    };

    Some(ParsedFile {
        show,
        season,
        episode,
        episode2,
        ext,
        raw: name.to_string(),
    })
}

// Legacy heuristic kept from the original tool; the planner derives the
// series name from the directory instead.
fn guess_show_name(stem: &str) -> String {
    stem.replace(['.', '_', '-'], " ").trim().to_string()
}
