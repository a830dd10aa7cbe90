// Context-sensitive escaping for Markdown output.
//
// Escapes only what would trigger formatting where it sits: a small set of
// characters anywhere in phrasing text, the first tilde of each `~~` pair,
// pipes inside tables, and list/heading/rule lookalikes at the start of a
// block line. Never applied inside code or pre content.

use std::sync::LazyLock;

use regex::Regex;

use crate::options::Options;

static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([.)])( |$)").unwrap());
static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6}|-+|\++|=+)( |$)").unwrap());

/// Escape Markdown syntax in a phrasing text run.
pub(crate) fn escape_text(
    text: &str,
    options: &Options,
    in_table: bool,
    at_block_start: bool,
) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let escaped = match c {
            '\\' | '&' | '<' | '>' | '[' | ']' | '`' => options.escape_misc,
            '~' if options.escape_misc && chars.peek() == Some(&'~') => {
                // Strikethrough needs a pair; escaping the first tilde of
                // each pair neutralizes it. A lone tilde is left alone.
                chars.next();
                out.push_str("\\~~");
                continue;
            }
            '*' => options.escape_asterisks,
            '_' => options.escape_underscores,
            '|' => in_table,
            _ => false,
        };
        if escaped {
            out.push('\\');
        }
        out.push(c);
    }

    if at_block_start && options.escape_misc {
        escape_block_start(out)
    } else {
        out
    }
}

/// Neutralize block-construct lookalikes at the start of a line: ordered
/// list markers, ATX hashes, dash/plus/equals runs.
fn escape_block_start(text: String) -> String {
    let pad = text.len() - text.trim_start_matches(' ').len();
    let (ws, rest) = text.split_at(pad);
    let rest = ORDERED_MARKER.replace(rest, r"$1\$2$3");
    let rest = BULLET_MARKER.replace(&rest, r"\$1$2");
    format!("{ws}{rest}")
}

/// Escape image alt text (plain attribute text, bracket-sensitive).
pub(crate) fn escape_alt(alt: &str, options: &Options) -> String {
    escape_text(alt, options, false, false)
}

/// Escape a link or image title for the quoted `"…"` position.
pub(crate) fn escape_title(title: &str) -> String {
    title.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_default(text: &str) -> String {
        escape_text(text, &Options::default(), false, false)
    }

    #[test]
    fn test_asterisks_and_underscores() {
        assert_eq!(escape_default("2 * 2"), "2 \\* 2");
        assert_eq!(escape_default("snake_case"), "snake\\_case");
    }

    #[test]
    fn test_misc_characters() {
        assert_eq!(escape_default("[x]"), "\\[x\\]");
        assert_eq!(escape_default("a & b"), "a \\& b");
        assert_eq!(escape_default("a <b> c"), "a \\<b\\> c");
        assert_eq!(escape_default("back`tick"), "back\\`tick");
        assert_eq!(escape_default(r"back\slash"), "back\\\\slash");
    }

    #[test]
    fn test_tilde_pairs() {
        assert_eq!(escape_default("foo ~~bar~~ baz"), "foo \\~~bar\\~~ baz");
        assert_eq!(escape_default("~/.bashrc"), "~/.bashrc");
    }

    #[test]
    fn test_pipes_only_in_tables() {
        assert_eq!(escape_default("a|b"), "a|b");
        assert_eq!(
            escape_text("a|b", &Options::default(), true, false),
            "a\\|b"
        );
    }

    #[test]
    fn test_block_start_markers() {
        let options = Options::default();
        assert_eq!(
            escape_text("1. not a list", &options, false, true),
            "1\\. not a list"
        );
        assert_eq!(
            escape_text("# not a heading", &options, false, true),
            "\\# not a heading"
        );
        assert_eq!(escape_text("- dash", &options, false, true), "\\- dash");
        assert_eq!(escape_text("+ plus", &options, false, true), "\\+ plus");
        // Not at a block start, nothing to neutralize.
        assert_eq!(escape_text("1. mid", &options, false, false), "1. mid");
        // No trailing space, not a marker.
        assert_eq!(escape_text("#hashtag", &options, false, true), "#hashtag");
    }

    #[test]
    fn test_toggles() {
        let options = Options::default()
            .with_escape_asterisks(false)
            .with_escape_underscores(false)
            .with_escape_misc(false);
        assert_eq!(
            escape_text("*a* _b_ [c] ~~d~~", &options, false, false),
            "*a* _b_ [c] ~~d~~"
        );
    }

    #[test]
    fn test_escape_title() {
        assert_eq!(escape_title(r#"a "quote""#), r#"a \"quote\""#);
    }
}
