// Element handlers — one function per HTML element (or element group).
//
// Handlers render their children first, then wrap the result in Markdown
// syntax. Block handlers pad their output with blank lines; the driver
// collapses the excess afterwards, so adjacent blocks always end up
// separated by exactly one blank line.

use markup5ever_rcdom::{Handle, NodeData};
use url::Url;

use super::{escape, plain_text, wrap, Context, ListKind, MAX_DEPTH};
use crate::options::{HeadingStyle, NewlineStyle, Options};

// ---------------------------------------------------------------------------
// Tree walking
// ---------------------------------------------------------------------------

/// Render all children of a node, handling inter-sibling whitespace.
pub(crate) fn render_children(cx: &mut Context, handle: &Handle) -> String {
    let children = handle.children.borrow();
    let mut parts: Vec<String> = Vec::with_capacity(children.len());

    for i in 0..children.len() {
        let child = &children[i];
        match &child.data {
            NodeData::Text { ref contents } => {
                let raw = contents.borrow().to_string();
                let mut text = collapse_whitespace(&raw);
                // Whitespace that HTML puts around block elements is layout,
                // not content.
                if i > 0 && is_block_element(&children[i - 1]) {
                    text = text.trim_start().to_string();
                }
                if i + 1 < children.len() && is_block_element(&children[i + 1]) {
                    text = text.trim_end().to_string();
                }
                if text.is_empty() {
                    continue;
                }
                parts.push(render_text(cx, &text));
            }
            NodeData::Element { .. } => {
                let part = render_node(cx, child);
                if is_block_element(child) {
                    cx.at_block_start = true;
                }
                parts.push(part);
            }
            // Comments, doctypes, and processing instructions have no
            // Markdown counterpart.
            _ => {}
        }
    }

    join_inline_parts(cx, parts)
}

/// Render a single element.
pub(crate) fn render_node(cx: &mut Context, handle: &Handle) -> String {
    let tag = match tag_name(handle) {
        Some(tag) => tag,
        None => return String::new(),
    };

    if cx.depth >= MAX_DEPTH {
        tracing::warn!(%tag, "nesting depth limit reached, flattening to text");
        return collapse_whitespace(&plain_text(handle));
    }

    cx.depth += 1;
    let out = dispatch(cx, handle, &tag);
    cx.depth -= 1;
    out
}

/// Route an element to its handler based on tag name.
fn dispatch(cx: &mut Context, handle: &Handle, tag: &str) -> String {
    // <base> contributes a URL to resolve against, never content.
    if tag == "base" {
        if cx.base_url.is_none() {
            if let Some(href) = get_attr(handle, "href") {
                cx.base_url = Url::parse(&href).ok();
            }
        }
        return String::new();
    }

    if is_ignored(tag) {
        return String::new();
    }

    // Document scaffolding: recurse, nothing to emit.
    if matches!(tag, "html" | "head" | "body") {
        cx.at_block_start = true;
        return render_children(cx, handle);
    }

    // Tag filters suppress markup but keep content.
    if !markup_enabled(cx.options, tag) {
        return render_children(cx, handle);
    }

    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => heading(cx, handle, tag),
        "p" => paragraph(cx, handle),
        "blockquote" => blockquote(cx, handle),
        "pre" | "listing" | "xmp" => code_block(cx, handle),
        "code" | "kbd" | "samp" | "tt" => inline_code(cx, handle),
        "strong" | "b" => strong(cx, handle),
        "em" | "i" | "cite" | "dfn" | "var" => emphasis(cx, handle),
        "del" | "s" | "strike" => strikethrough(cx, handle),
        "a" => link(cx, handle),
        "img" | "image" => image(cx, handle),
        "br" => line_break(cx),
        "hr" => thematic_break(),
        "ul" | "ol" | "dir" | "menu" => list(cx, handle, tag),
        "li" => list_item(cx, handle),
        "dl" => block_container(cx, handle),
        "dt" => definition_term(cx, handle),
        "dd" => definition_detail(cx, handle),
        "table" => table(cx, handle),
        "sub" => sub_sup(cx, handle, true),
        "sup" => sub_sup(cx, handle, false),
        "address" | "article" | "aside" | "center" | "details" | "div" | "fieldset"
        | "figcaption" | "figure" | "footer" | "form" | "header" | "hgroup" | "main"
        | "nav" | "section" | "summary" => block_container(cx, handle),
        // Unknown and purely presentational elements pass their children
        // through (includes span, small, u, mark, time, ruby, …).
        _ => render_children(cx, handle),
    }
}

/// Elements with no renderable content at all.
fn is_ignored(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "caption"
            | "col"
            | "colgroup"
            | "datalist"
            | "dialog"
            | "embed"
            | "iframe"
            | "input"
            | "link"
            | "map"
            | "math"
            | "meta"
            | "noscript"
            | "object"
            | "optgroup"
            | "option"
            | "param"
            | "script"
            | "select"
            | "source"
            | "style"
            | "svg"
            | "template"
            | "textarea"
            | "title"
            | "track"
    )
}

/// Whether the `strip`/`convert` tag filters allow markup for this tag.
fn markup_enabled(options: &Options, tag: &str) -> bool {
    if options.strip.iter().any(|t| t == tag) {
        return false;
    }
    options.convert.is_empty() || options.convert.iter().any(|t| t == tag)
}

/// Tags rendered as blocks, separated from siblings by line breaks.
fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "address" | "article" | "aside" | "blockquote" | "center" | "dd" | "details"
            | "div" | "dl" | "dt" | "fieldset" | "figcaption" | "figure" | "footer"
            | "form" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "header" | "hgroup"
            | "hr" | "li" | "main" | "nav" | "ol" | "p" | "pre" | "section" | "summary"
            | "table" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr" | "ul"
    )
}

fn is_block_element(handle: &Handle) -> bool {
    tag_name(handle).is_some_and(|t| is_block_tag(&t))
}

fn render_text(cx: &mut Context, text: &str) -> String {
    let escaped = escape::escape_text(text, cx.options, cx.in_table, cx.at_block_start);
    if !text.trim().is_empty() {
        cx.at_block_start = false;
    }
    escaped
}

/// Merge rendered parts, absorbing spaces that sit next to hard breaks.
fn join_inline_parts(cx: &Context, mut parts: Vec<String>) -> String {
    let brk = hard_break(cx.options);
    for i in 0..parts.len() {
        if parts[i] == brk {
            if i > 0 {
                parts[i - 1] = parts[i - 1].trim_end_matches(' ').to_string();
            }
            if i + 1 < parts.len() {
                parts[i + 1] = parts[i + 1].trim_start_matches(' ').to_string();
            }
        }
    }
    parts.concat()
}

/// Collapse whitespace runs to single spaces, preserving edge spaces so
/// inline siblings stay separated.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_ws = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_ws {
                out.push(' ');
            }
            prev_ws = true;
        } else {
            out.push(c);
            prev_ws = false;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Block handlers
// ---------------------------------------------------------------------------

fn heading(cx: &mut Context, handle: &Handle, tag: &str) -> String {
    let depth = (tag.as_bytes()[1] - b'0') as usize;

    cx.at_block_start = false;
    cx.image_context.push(tag.to_string());
    let content = render_children(cx, handle);
    cx.image_context.pop();

    // ATX headings are single-line; interior breaks become spaces.
    let content = collapse_whitespace(&content);
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }

    let line = match cx.options.heading_style {
        HeadingStyle::Underlined if depth <= 2 => {
            let marker = if depth == 1 { '=' } else { '-' };
            let underline = marker.to_string().repeat(content.chars().count().max(3));
            format!("{content}\n{underline}")
        }
        HeadingStyle::AtxClosed => {
            let hashes = "#".repeat(depth);
            format!("{hashes} {content} {hashes}")
        }
        _ => format!("{} {}", "#".repeat(depth), content),
    };
    format!("\n\n{line}\n\n")
}

fn paragraph(cx: &mut Context, handle: &Handle) -> String {
    cx.at_block_start = true;
    let content = render_children(cx, handle);
    cx.at_block_start = false;
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }
    if cx.options.wrap {
        format!("\n\n{}\n\n", wrap::fill(content, cx.options.wrap_width))
    } else {
        format!("\n\n{content}\n\n")
    }
}

fn block_container(cx: &mut Context, handle: &Handle) -> String {
    cx.at_block_start = true;
    let content = render_children(cx, handle);
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }
    format!("\n\n{content}\n\n")
}

fn blockquote(cx: &mut Context, handle: &Handle) -> String {
    // The "> " prefix means content is never at the start of a line.
    cx.at_block_start = false;
    let content = render_children(cx, handle);
    let content = super::collapse_blank_lines(content.trim());
    if content.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = content
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect();
    format!("\n\n{}\n\n", quoted.join("\n"))
}

fn thematic_break() -> String {
    "\n\n---\n\n".to_string()
}

fn code_block(cx: &mut Context, handle: &Handle) -> String {
    let text = plain_text(handle);
    let text = text.strip_suffix('\n').unwrap_or(text.as_str());
    let lang = code_language(cx, handle);

    // The fence must be longer than any fence-like line inside the block.
    let fence_len = text
        .lines()
        .filter_map(|line| {
            let t = line.trim();
            (t.len() >= 3 && t.chars().all(|c| c == '`')).then_some(t.len())
        })
        .max()
        .map_or(3, |n| n + 1);
    let fence = "`".repeat(fence_len);

    if text.is_empty() {
        format!("\n\n{fence}{lang}\n{fence}\n\n")
    } else {
        format!("\n\n{fence}{lang}\n{text}\n{fence}\n\n")
    }
}

/// Info string for a code block: a `language-*`/`lang-*` class on the `<pre>`
/// or its `<code>` child wins over the configured fallback.
fn code_language(cx: &Context, handle: &Handle) -> String {
    let mut candidates = vec![handle.clone()];
    candidates.extend(handle.children.borrow().iter().cloned());
    for node in candidates {
        if let Some(class) = get_attr(&node, "class") {
            for token in class.split_whitespace() {
                if let Some(lang) = token
                    .strip_prefix("language-")
                    .or_else(|| token.strip_prefix("lang-"))
                {
                    return lang.to_string();
                }
            }
        }
    }
    cx.options.code_language.clone()
}

fn list(cx: &mut Context, handle: &Handle, tag: &str) -> String {
    let nested = !cx.list_stack.is_empty();
    let kind = if tag == "ol" {
        let start = get_attr(handle, "start")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);
        ListKind::Ordered { next: start }
    } else {
        ListKind::Unordered
    };

    cx.list_stack.push(kind);
    let items = render_children(cx, handle);
    cx.list_stack.pop();

    let items = items.trim_end();
    if items.is_empty() {
        return String::new();
    }
    if nested {
        // Nested lists attach tightly to their parent item.
        format!("\n{items}\n")
    } else {
        format!("\n\n{items}\n\n")
    }
}

fn list_item(cx: &mut Context, handle: &Handle) -> String {
    let bullets: Vec<char> = cx.options.bullets.chars().collect();
    let depth = cx.list_stack.len().saturating_sub(1);
    let marker = match cx.list_stack.last_mut() {
        Some(ListKind::Ordered { next }) => {
            let n = *next;
            *next += 1;
            format!("{n}.")
        }
        _ => bullets[depth % bullets.len()].to_string(),
    };

    cx.at_block_start = false;
    let content = render_children(cx, handle);
    let content = content.trim();

    let indent = " ".repeat(marker.chars().count() + 1);
    let mut lines = content.lines();
    let first = lines.next().unwrap_or("");
    let mut item = if first.is_empty() {
        marker.clone()
    } else {
        format!("{marker} {first}")
    };
    for line in lines {
        item.push('\n');
        if !line.is_empty() {
            item.push_str(&indent);
            item.push_str(line);
        }
    }
    item.push('\n');
    item
}

fn definition_term(cx: &mut Context, handle: &Handle) -> String {
    cx.at_block_start = false;
    let content = collapse_whitespace(&render_children(cx, handle));
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }
    format!("{content}\n")
}

fn definition_detail(cx: &mut Context, handle: &Handle) -> String {
    cx.at_block_start = false;
    let content = collapse_whitespace(&render_children(cx, handle));
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }
    format!(": {content}\n")
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

struct TableRow {
    cells: Vec<String>,
    header: bool,
}

fn table(cx: &mut Context, handle: &Handle) -> String {
    let was_in_table = cx.in_table;
    cx.in_table = true;
    let rows = collect_rows(cx, handle);
    cx.in_table = was_in_table;

    let cols = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    if cols == 0 {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let mut body = rows.as_slice();
    if rows[0].header {
        lines.push(format_row(&rows[0].cells, cols));
        body = &rows[1..];
    } else {
        // GFM tables require a header row; synthesize an empty one.
        lines.push(format_row(&[], cols));
    }
    lines.push(format!("| {} |", vec!["---"; cols].join(" | ")));
    for row in body {
        lines.push(format_row(&row.cells, cols));
    }

    format!("\n\n{}\n\n", lines.join("\n"))
}

fn collect_rows(cx: &mut Context, handle: &Handle) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for child in handle.children.borrow().iter() {
        match tag_name(child).as_deref() {
            Some("tr") => rows.push(collect_row(cx, child)),
            Some("thead" | "tbody" | "tfoot") => {
                for tr in child.children.borrow().iter() {
                    if tag_name(tr).as_deref() == Some("tr") {
                        rows.push(collect_row(cx, tr));
                    }
                }
            }
            _ => {}
        }
    }
    rows
}

fn collect_row(cx: &mut Context, handle: &Handle) -> TableRow {
    let mut cells = Vec::new();
    let mut header = false;
    for child in handle.children.borrow().iter() {
        if let Some(tag) = tag_name(child).as_deref() {
            if tag == "td" || tag == "th" {
                header |= tag == "th";
                cx.at_block_start = false;
                let content = render_children(cx, child);
                // Cell content must stay on one line.
                cells.push(collapse_whitespace(&content).trim().to_string());
            }
        }
    }
    TableRow { cells, header }
}

fn format_row(cells: &[String], cols: usize) -> String {
    let padded: Vec<&str> = (0..cols)
        .map(|i| cells.get(i).map_or("", |s| s.as_str()))
        .collect();
    format!("| {} |", padded.join(" | "))
}

// ---------------------------------------------------------------------------
// Inline handlers
// ---------------------------------------------------------------------------

fn strong(cx: &mut Context, handle: &Handle) -> String {
    let m = cx.options.strong_em_symbol;
    wrap_inline(cx, handle, &format!("{m}{m}"))
}

fn emphasis(cx: &mut Context, handle: &Handle) -> String {
    let m = cx.options.strong_em_symbol;
    wrap_inline(cx, handle, &m.to_string())
}

fn strikethrough(cx: &mut Context, handle: &Handle) -> String {
    wrap_inline(cx, handle, "~~")
}

fn sub_sup(cx: &mut Context, handle: &Handle, sub: bool) -> String {
    let symbol = if sub {
        cx.options.sub_symbol.clone()
    } else {
        cx.options.sup_symbol.clone()
    };
    if symbol.is_empty() {
        cx.at_block_start = false;
        return render_children(cx, handle);
    }
    wrap_inline(cx, handle, &symbol)
}

fn wrap_inline(cx: &mut Context, handle: &Handle, marker: &str) -> String {
    cx.at_block_start = false;
    let content = render_children(cx, handle);
    let (prefix, core, suffix) = chomp(&content);
    if core.is_empty() {
        // Whitespace-only content: markers would render literally.
        return content;
    }
    format!("{prefix}{marker}{core}{marker}{suffix}")
}

fn inline_code(cx: &mut Context, handle: &Handle) -> String {
    cx.at_block_start = false;
    let value = collapse_whitespace(&plain_text(handle));
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    // Pick a tick run longer than any run inside, pad if the content starts
    // or ends with a backtick.
    let ticks = "`".repeat(longest_backtick_run(value) + 1);
    if value.starts_with('`') || value.ends_with('`') {
        format!("{ticks} {value} {ticks}")
    } else {
        format!("{ticks}{value}{ticks}")
    }
}

fn line_break(cx: &mut Context) -> String {
    cx.at_block_start = true;
    hard_break(cx.options).to_string()
}

pub(crate) fn hard_break(options: &Options) -> &'static str {
    match options.newline_style {
        NewlineStyle::Backslash => "\\\n",
        NewlineStyle::Spaces => "  \n",
    }
}

fn link(cx: &mut Context, handle: &Handle) -> String {
    cx.at_block_start = false;
    cx.image_context.push("a".to_string());
    let content = render_children(cx, handle);
    cx.image_context.pop();

    let href = match get_attr(handle, "href") {
        Some(h) if !h.is_empty() => cx.resolve(&h),
        _ => return content,
    };

    let (prefix, text, suffix) = chomp(&content);
    if text.is_empty() {
        return String::new();
    }

    let title = get_attr(handle, "title").or_else(|| cx.options.default_title.then(|| href.clone()));

    // A bare URL with nothing else to carry can be an autolink.
    if cx.options.autolinks
        && title.is_none()
        && (text == href || format!("mailto:{text}") == href)
        && !href.chars().any(|c| c <= ' ' || c == '<' || c == '>')
    {
        return format!("{prefix}<{text}>{suffix}");
    }

    match title {
        Some(title) => format!(
            "{prefix}[{text}]({href} \"{}\"){suffix}",
            escape::escape_title(&title)
        ),
        None => format!("{prefix}[{text}]({href}){suffix}"),
    }
}

fn image(cx: &mut Context, handle: &Handle) -> String {
    cx.at_block_start = false;
    let alt = escape::escape_alt(
        &collapse_whitespace(&get_attr(handle, "alt").unwrap_or_default()),
        cx.options,
    );

    // Inside headings and links an image degrades to its alt text unless
    // every enclosing tag opts in.
    if !cx.image_context.is_empty()
        && !cx
            .image_context
            .iter()
            .all(|t| cx.options.keep_inline_images_in.iter().any(|k| k == t))
    {
        return alt;
    }

    let src = get_attr(handle, "src")
        .map(|s| cx.resolve(&s))
        .unwrap_or_default();
    match get_attr(handle, "title") {
        Some(title) => format!("![{alt}]({src} \"{}\")", escape::escape_title(&title)),
        None => format!("![{alt}]({src})"),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split surrounding spaces off inline content so they land outside the
/// markers: `<b> x </b>` → ` **x** `.
fn chomp(text: &str) -> (&'static str, &str, &'static str) {
    let prefix = if text.starts_with(' ') { " " } else { "" };
    let suffix = if text.ends_with(' ') { " " } else { "" };
    (prefix, text.trim_matches(' '), suffix)
}

/// Longest consecutive run of backticks in a string.
fn longest_backtick_run(s: &str) -> usize {
    s.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// Value of an attribute on an element node.
pub(crate) fn get_attr(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Tag name of an element node.
pub(crate) fn tag_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a\n  b\tc"), "a b c");
        assert_eq!(collapse_whitespace("  a  "), " a ");
        assert_eq!(collapse_whitespace("\n"), " ");
    }

    #[test]
    fn test_chomp() {
        assert_eq!(chomp(" x "), (" ", "x", " "));
        assert_eq!(chomp("x"), ("", "x", ""));
        assert_eq!(chomp("  "), (" ", "", " "));
    }

    #[test]
    fn test_longest_backtick_run() {
        assert_eq!(longest_backtick_run("no ticks"), 0);
        assert_eq!(longest_backtick_run("a `b` c"), 1);
        assert_eq!(longest_backtick_run("a ``b`` c"), 2);
    }

    #[test]
    fn test_block_tags() {
        assert!(is_block_tag("p"));
        assert!(is_block_tag("table"));
        assert!(!is_block_tag("span"));
        assert!(!is_block_tag("strong"));
    }
}
