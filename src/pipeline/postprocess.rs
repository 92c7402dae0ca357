//! Post-processing: deterministic cleanup of model-generated HTML.
//!
//! Even when told not to, models sometimes wrap their answer in
//! ```` ```html ```` fences, emit CRLF line endings or pad the answer with
//! blank lines. These rules repair that without touching the markup itself.
//!
//! Rules (applied in order):
//! 1. Normalise line endings (CRLF → LF)
//! 2. Strip outer code fences
//! 3. Trim trailing whitespace per line
//! 4. Collapse 3+ consecutive blank lines down to one
//! 5. Trim leading/trailing blank space

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to a raw model answer.
pub fn clean_html(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = strip_code_fences(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1 ──────────────────────────────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2 ──────────────────────────────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*[ \t]*\n(.*?)\n?```\s*$").expect("fence regex is valid")
});

fn strip_code_fences(input: &str) -> String {
    let trimmed = input.trim();
    match RE_OUTER_FENCES.captures(trimmed) {
        Some(caps) => caps[1].to_string(),
        None => trimmed.to_string(),
    }
}

// ── Rule 3 ──────────────────────────────────────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4 ──────────────────────────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank-line regex is valid"));

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_fence() {
        let raw = "```html\n<section><h2>A</h2></section>\n```";
        assert_eq!(clean_html(raw), "<section><h2>A</h2></section>");
    }

    #[test]
    fn strips_bare_fence_with_surrounding_space() {
        let raw = "\n\n```\n<p>x</p>\n```\n\n";
        assert_eq!(clean_html(raw), "<p>x</p>");
    }

    #[test]
    fn leaves_inner_code_blocks_alone() {
        let raw = "<section><pre>```rust\nfn main() {}\n```</pre></section>";
        assert_eq!(clean_html(raw), raw);
    }

    #[test]
    fn normalises_crlf_and_trailing_spaces() {
        let raw = "<ul>  \r\n<li>a</li>\t\r\n</ul>";
        assert_eq!(clean_html(raw), "<ul>\n<li>a</li>\n</ul>");
    }

    #[test]
    fn collapses_blank_runs() {
        let raw = "<h2>A</h2>\n\n\n\n\n<p>b</p>";
        assert_eq!(clean_html(raw), "<h2>A</h2>\n\n<p>b</p>");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(clean_html("  \n "), "");
    }
}
