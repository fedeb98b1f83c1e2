//! Step-Command Matcher — attaches an extracted command to the most textually
//! similar step, or reports no match so the shaper can fall back to a
//! synthetic catch-all step.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Filler words ignored during token comparison.
const STOPWORDS: &[&str] = &[
    "the", "to", "and", "of", "in", "on", "for", "a", "an", "with", "be", "is", "are", "it",
    "that", "this", "your", "you", "if", "then", "by", "as", "from", "using", "use", "run",
    "running", "check", "open", "ensure", "make", "sure",
];

/// A command must reach this overlap score against some step to be attached.
const MATCH_THRESHOLD: f64 = 0.25;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9_]+").expect("word regex"));

/// Lowercase word tokens with stop-words removed.
fn tokens(s: &str) -> HashSet<String> {
    let lowered = s.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Returns the index of the step most similar to `cmd`, or `None` when no
/// step clears the confidence threshold.
///
/// Score per step: `|intersection| / max(1, min(|cmd|, |step|))` over token
/// sets, plus 0.25 if both sides mention "version" and another 0.25 if both
/// mention "install". Ties keep the earliest step, since a later candidate
/// must strictly exceed the running best.
pub fn best_step_for_command(cmd: &str, steps_texts: &[String]) -> Option<usize> {
    let ctoks = tokens(cmd);
    if ctoks.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, step) in steps_texts.iter().enumerate() {
        let stoks = tokens(step);
        if stoks.is_empty() {
            continue;
        }
        let inter = ctoks.intersection(&stoks).count();
        let denom = ctoks.len().min(stoks.len()).max(1);
        let mut score = inter as f64 / denom as f64;
        if ctoks.contains("version") && stoks.contains("version") {
            score += 0.25;
        }
        if ctoks.contains("install") && stoks.contains("install") {
            score += 0.25;
        }
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((i, score));
        }
    }

    match best {
        Some((i, score)) if score >= MATCH_THRESHOLD => Some(i),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_install_command_matches_install_step() {
        let steps = steps(&[
            "Install the missing package",
            "Import the module and run the script",
        ]);
        assert_eq!(best_step_for_command("pip install requests", &steps), Some(0));
    }

    #[test]
    fn test_empty_step_list_never_matches() {
        assert_eq!(best_step_for_command("pip install requests", &[]), None);
    }

    #[test]
    fn test_command_of_only_stopwords_never_matches() {
        let steps = steps(&["Install the missing package"]);
        assert_eq!(best_step_for_command("run check the", &steps), None);
    }

    #[test]
    fn test_unrelated_command_falls_below_threshold() {
        let steps = steps(&["Restart the IDE", "Reopen the project window"]);
        assert_eq!(
            best_step_for_command("curl https://example.com/data.csv", &steps),
            None
        );
    }

    #[test]
    fn test_version_bonus_lifts_weak_overlap() {
        // Raw overlap is 1/8 = 0.125, below the threshold; the shared
        // "version" token contributes the +0.25 that makes this attach.
        let steps = steps(&["Compare against the release version listed under downloads page notes"]);
        assert_eq!(
            best_step_for_command("wget https://example.com/files/version.tar.gz", &steps),
            Some(0),
            "version bonus should lift the score past the threshold"
        );
    }

    #[test]
    fn test_first_best_step_wins_ties() {
        let steps = steps(&[
            "Install the package dependencies",
            "Install the package dependencies",
        ]);
        assert_eq!(best_step_for_command("pip install numpy", &steps), Some(0));
    }

    #[test]
    fn test_blank_steps_are_skipped() {
        let steps = steps(&["", "   ", "Install the requests package"]);
        assert_eq!(best_step_for_command("pip install requests", &steps), Some(2));
    }

    #[test]
    fn test_returned_index_is_in_bounds() {
        let steps = steps(&["Install something", "Update something"]);
        if let Some(i) = best_step_for_command("pip install something", &steps) {
            assert!(i < steps.len());
        }
    }
}
