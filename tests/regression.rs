// Regression tests — every bug found becomes a test case here.
// Never delete a test from this file.

use html_to_markdown::{convert, convert_with, Options};
use pretty_assertions::assert_eq;

/// Image alt text containing `]` must be escaped to prevent premature bracket
/// close in the `![alt](url)` syntax.
#[test]
fn image_alt_with_bracket() {
    let md = convert(r#"<img src="foo.png" alt="a]b">"#).unwrap();
    assert_eq!(md, "![a\\]b](foo.png)\n");
}

/// Image alt text containing `*` must be escaped to prevent accidental
/// emphasis in the `![alt](url)` syntax context.
#[test]
fn image_alt_with_asterisk() {
    let md = convert(r#"<img src="foo.png" alt="a*b">"#).unwrap();
    assert_eq!(md, "![a\\*b](foo.png)\n");
}

/// Link text containing `]` must be escaped so the bracket pair survives.
#[test]
fn link_text_with_bracket() {
    let md = convert(r#"<a href="http://example.com">foo]bar</a>"#).unwrap();
    assert!(
        md.contains("foo\\]bar"),
        "link text ] should be escaped: {md:?}"
    );
}

/// Double-tilde in text must be escaped to prevent accidental GFM
/// strikethrough. Only the first `~` of each `~~` pair is escaped.
#[test]
fn double_tilde_escape_in_phrasing() {
    let md = convert("<p>foo ~~bar~~ baz</p>").unwrap();
    assert_eq!(md, "foo \\~~bar\\~~ baz\n");
}

/// A single tilde is not strikethrough syntax and stays as-is.
#[test]
fn single_tilde_not_escaped() {
    let md = convert("<p>~/.bashrc</p>").unwrap();
    assert_eq!(md, "~/.bashrc\n");
}

/// Pipe characters in table cells must be escaped to keep the table shape.
#[test]
fn pipe_in_table_cell_escaped() {
    let md = convert("<table><tr><th>Header</th></tr><tr><td>a|b</td></tr></table>").unwrap();
    assert!(
        md.contains("a\\|b"),
        "pipe in table cell should be escaped: {md:?}"
    );
}

/// Pipe escaping does not apply outside of tables.
#[test]
fn pipe_not_escaped_outside_table() {
    let md = convert("<p>a|b</p>").unwrap();
    assert_eq!(md, "a|b\n");
}

/// Asterisks and underscores are escaped by default and honored literally
/// when the corresponding option is off.
#[test]
fn asterisk_and_underscore_escaping() {
    assert_eq!(convert("<p>2 * 2</p>").unwrap(), "2 \\* 2\n");
    assert_eq!(convert("<p>snake_case</p>").unwrap(), "snake\\_case\n");

    let options = Options::new()
        .with_escape_asterisks(false)
        .with_escape_underscores(false);
    assert_eq!(convert_with("<p>2 * 2</p>", &options).unwrap(), "2 * 2\n");
    assert_eq!(
        convert_with("<p>snake_case</p>", &options).unwrap(),
        "snake_case\n"
    );
}

/// Decoded entities must be re-escaped; otherwise `&lt;b&gt;` round-trips
/// back into a live `<b>` tag.
#[test]
fn decoded_angle_brackets_escaped() {
    let md = convert("<p>a &lt;b&gt; c</p>").unwrap();
    assert_eq!(md, "a \\<b\\> c\n");
}

/// Ampersands are escaped so they cannot form entity references.
#[test]
fn ampersand_escaped() {
    let md = convert("<p>AT&amp;T</p>").unwrap();
    assert_eq!(md, "AT\\&T\n");
}

/// Text that would parse as an ordered list marker at the start of a block
/// must be neutralized.
#[test]
fn ordered_marker_lookalike_at_block_start() {
    let md = convert("<p>1. not a list</p>").unwrap();
    assert_eq!(md, "1\\. not a list\n");
}

/// Text that would parse as an ATX heading at the start of a block must be
/// neutralized.
#[test]
fn hash_lookalike_at_block_start() {
    let md = convert("<p># not a heading</p>").unwrap();
    assert_eq!(md, "\\# not a heading\n");
}

/// A leading dash would parse as a bullet; mid-paragraph dashes are fine.
#[test]
fn dash_lookalike_at_block_start() {
    assert_eq!(convert("<p>- dash</p>").unwrap(), "\\- dash\n");
    assert_eq!(convert("<p>a - b</p>").unwrap(), "a - b\n");
}

/// Block-start escapes do not fire when `escape_misc` is off.
#[test]
fn block_start_escapes_respect_toggle() {
    let options = Options::new().with_escape_misc(false);
    assert_eq!(
        convert_with("<p>1. not a list</p>", &options).unwrap(),
        "1. not a list\n"
    );
}

/// Deeply nested HTML must not cause a stack overflow; content past the
/// depth limit degrades to plain text instead of vanishing.
#[test]
fn deep_nesting_no_stack_overflow() {
    let html = "<div>".repeat(3000) + "deep text" + &"</div>".repeat(3000);
    let md = convert(&html).unwrap();
    assert!(
        md.contains("deep text"),
        "deep content should survive flattening: {md:?}"
    );

    let shallow = "<div>".repeat(100) + "shallow text" + &"</div>".repeat(100);
    let md = convert(&shallow).unwrap();
    assert!(
        md.contains("shallow text"),
        "shallow content should convert normally: {md:?}"
    );
}

/// Whitespace-only input produces empty output, not stray blank lines.
#[test]
fn whitespace_only_input_is_empty() {
    assert_eq!(convert("  \n\t \n").unwrap(), "");
}
