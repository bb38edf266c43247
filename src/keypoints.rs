//! Heuristic key-point selection over plain text.
//!
//! Sentences are found by splitting on `.` with no awareness of
//! abbreviations or decimals, so the output is best-effort.

pub const FALLBACK_KEY_POINT: &str = "For more details, visit the original article.";

pub const MIN_KEY_POINT_CHARS: usize = 50;
pub const MIN_KEY_POINTS: usize = 3;
pub const MAX_KEY_POINTS: usize = 5;

/// Returns between one and five key points. Never fails.
pub fn derive_key_points(text: &str) -> Vec<String> {
    let mut key_points: Vec<String> = Vec::with_capacity(MAX_KEY_POINTS);

    for sentence in text.split('.').map(str::trim).filter(|s| !s.is_empty()) {
        if !is_candidate(sentence) {
            continue;
        }

        let lowered = sentence.to_lowercase();
        // Either direction of containment counts as a duplicate.
        let already_covered = key_points.iter().any(|accepted| {
            let accepted = accepted.to_lowercase();
            accepted.contains(&lowered) || lowered.contains(&accepted)
        });
        if !already_covered {
            key_points.push(sentence.to_string());
        }
    }

    if key_points.len() < MIN_KEY_POINTS {
        key_points.push(FALLBACK_KEY_POINT.to_string());
    }

    key_points.truncate(MAX_KEY_POINTS);
    key_points
}

fn is_candidate(sentence: &str) -> bool {
    sentence.chars().count() > MIN_KEY_POINT_CHARS
        && !sentence.contains("advertisement")
        && !sentence.to_lowercase().contains("summary")
}
