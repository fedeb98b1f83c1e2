//! Command Extractor — pulls shell/CLI invocations out of mixed code/prose text.
//!
//! The model is told to put commands under `step.commands`, but it often dumps
//! them into `solution.code` as a markdown-ish blob. This module scans that
//! blob in four overlapping passes (fenced blocks, inline spans, action-phrase
//! patterns over the whole text, raw lines) and keeps the union. The overlap
//! is deliberate: a false positive is an extra suggested command, a false
//! negative is an instruction the student never sees.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered rule tables driving extraction. The shipped default covers the
/// common package-manager / VCS / shell families; callers can supply their
/// own to add new command families without touching the scan logic.
pub struct ExtractorRules {
    /// Matches a line that *starts* like a command (after `$` stripping).
    pub command_line: Regex,
    /// Action-phrase patterns matched anywhere in the text.
    pub phrases: Vec<Regex>,
}

impl Default for ExtractorRules {
    fn default() -> Self {
        let command_line = Regex::new(
            r"(?i)^\s*(?:\$|pip3?\b|python3?\b|python\s+-m\b|conda\b|git\b|npm\b|npx\b|yarn\b|pnpm\b|sudo\b|apt(?:-get)?\b|brew\b|curl\b|wget\b|powershell\b|cmd\s+/c\b|set\s+\w+|export\s+\w+|cd\s+)",
        )
        .expect("command line regex");

        let phrase_sources = [
            r"(?i)pip3?\s+install\s+[A-Za-z0-9_\-\.]+",
            r"(?i)python3?\s+-m\s+\S.+",
            r"(?i)git\s+(?:clone|pull|checkout)\s+\S.+",
            r"(?i)conda\s+(?:create|install|activate|env\s+create)\s+\S.*",
            r"(?i)npm\s+(?:install|i)\s+\S.*",
            r"(?i)yarn\s+(?:add|install)\s+\S.*",
            r"(?i)pnpm\s+(?:add|install)\s+\S.*",
            r"(?i)sudo\s+\S.+",
            r"(?i)apt(?:-get)?\s+install\s+\S.+",
            r"(?i)brew\s+install\s+\S.+",
            r"(?i)curl\s+\S.+",
            r"(?i)wget\s+\S.+",
            r"(?i)powershell\s+-[A-Za-z]\S*\s+\S.+",
            r"(?i)cmd\s+/c\s+\S.+",
        ];
        let phrases = phrase_sources
            .iter()
            .map(|src| Regex::new(src).expect("phrase regex"))
            .collect();

        Self {
            command_line,
            phrases,
        }
    }
}

static DEFAULT_RULES: Lazy<ExtractorRules> = Lazy::new(ExtractorRules::default);

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:[a-zA-Z]+)?\s*([\s\S]*?)```").expect("fenced block regex"));
// Single-line only: a span crossing a newline is a fence interior, not an
// inline code span, and is handled by the fenced-block pass instead.
static INLINE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("inline span regex"));

fn strip_prompt_marker(s: &str) -> &str {
    match s.strip_prefix('$') {
        Some(rest) => rest.trim(),
        None => s,
    }
}

/// Extracts the ordered, deduplicated list of command strings from a mixed
/// code/prose block, using the default rule tables. Never fails; no matches
/// simply yields an empty list.
pub fn extract_commands(code_raw: &str) -> Vec<String> {
    extract_commands_with(&DEFAULT_RULES, code_raw)
}

/// Same as [`extract_commands`] with caller-supplied rules.
///
/// Scan order is load-bearing: fenced-block lines, inline spans, phrase
/// patterns over the whole text, then every raw line. Later passes may
/// rediscover earlier candidates; first occurrence wins at dedup time.
pub fn extract_commands_with(rules: &ExtractorRules, code_raw: &str) -> Vec<String> {
    if code_raw.is_empty() {
        return Vec::new();
    }
    let mut candidates: Vec<String> = Vec::new();

    // (a) lines inside fenced blocks
    for block in FENCED_BLOCK.captures_iter(code_raw) {
        for line in block[1].lines() {
            let s = strip_prompt_marker(line.trim());
            if s.is_empty() {
                continue;
            }
            if rules.command_line.is_match(s) {
                candidates.push(s.to_string());
            }
        }
    }

    // (b) inline code spans
    for span in INLINE_SPAN.captures_iter(code_raw) {
        let s = strip_prompt_marker(span[1].trim());
        if rules.command_line.is_match(s) || rules.phrases.iter().any(|p| p.is_match(s)) {
            candidates.push(s.to_string());
        }
    }

    // (c) phrase patterns anywhere in the raw text
    for pattern in &rules.phrases {
        for m in pattern.find_iter(code_raw) {
            candidates.push(strip_prompt_marker(m.as_str().trim()).to_string());
        }
    }

    // (d) whole lines of the raw text
    for line in code_raw.lines() {
        let s = strip_prompt_marker(line.trim());
        if rules.command_line.is_match(s) {
            candidates.push(s.to_string());
        }
    }

    // dedup preserving first occurrence
    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));
    candidates
}
