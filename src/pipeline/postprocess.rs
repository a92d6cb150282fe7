//! Post-processing: deterministic cleanup of the model's reply.
//!
//! The prompt asks for a bare `<ol><li>…</li></ol>` list, but chat models
//! routinely wrap HTML in a ```` ```html ```` fence or prefix it with a BOM.
//! The page inserts the reply unescaped, so a stray fence shows up as
//! literal backticks around the list. These rules remove such wrappers
//! and never touch the list itself.
//!
//! Rules (applied in order):
//! 1. Trim surrounding whitespace
//! 2. Strip one outer code fence (` ``` `, ` ```html `, ` ```markdown `)
//! 3. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
//! 4. Trim again

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to a successful completion.
pub fn clean_reply(input: &str) -> String {
    let s = strip_outer_fence(input.trim());
    let s = remove_invisible_chars(&s);
    s.trim().to_string()
}

// ── Rule 2: Strip outer code fence ───────────────────────────────────────────

static RE_OUTER_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[ \t]*(?:html|HTML|markdown|md)?[ \t]*\r?\n(.*?)\r?\n```[ \t]*$").unwrap()
});

fn strip_outer_fence(input: &str) -> String {
    match RE_OUTER_FENCE.captures(input) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

// ── Rule 3: Remove invisible characters ──────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
            )
        })
        .collect()
}
