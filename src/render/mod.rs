// HTML parse + render driver.
//
// Parses HTML via html5ever and walks the resulting tree once, dispatching
// each element to a handler that emits Markdown directly. Formatting state
// (list nesting, table/heading flags, base URL) is threaded through
// `Context`.

pub(crate) mod escape;
pub(crate) mod handlers;
pub(crate) mod wrap;

use std::sync::LazyLock;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use url::Url;

use crate::options::Options;

/// Recursion guard: content nested deeper than this degrades to plain text
/// instead of overflowing the stack.
const MAX_DEPTH: usize = 512;

/// An open list, tracked for marker selection.
pub(crate) enum ListKind {
    Unordered,
    Ordered { next: u32 },
}

/// Rendering state threaded through all handlers.
pub(crate) struct Context<'a> {
    pub options: &'a Options,
    /// Base URL from the first `<base href>` encountered.
    pub base_url: Option<Url>,
    /// Open lists, innermost last.
    pub list_stack: Vec<ListKind>,
    /// Whether we're inside a table (pipes get escaped).
    pub in_table: bool,
    /// Headings/links currently enclosing us (images degrade to alt text).
    pub image_context: Vec<String>,
    /// Whether the next text starts a line of block content, making
    /// block-start escapes applicable.
    pub at_block_start: bool,
    /// Current element nesting depth.
    pub depth: usize,
}

impl<'a> Context<'a> {
    fn new(options: &'a Options) -> Self {
        Self {
            options,
            base_url: None,
            list_stack: Vec::new(),
            in_table: false,
            image_context: Vec::new(),
            at_block_start: true,
            depth: 0,
        }
    }

    /// Resolve a URL against the frozen base URL.
    pub fn resolve(&self, raw: &str) -> String {
        if let Some(base) = &self.base_url {
            if let Ok(resolved) = base.join(raw) {
                return resolved.to_string();
            }
        }
        raw.to_string()
    }
}

static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Parse an HTML string and render it as Markdown.
pub(crate) fn render(html: &str, options: &Options) -> String {
    tracing::debug!(bytes = html.len(), "converting HTML");
    let dom = parse_html(html);
    let mut cx = Context::new(options);
    let output = handlers::render_children(&mut cx, &dom.document);
    finish(&output)
}

/// Parse an HTML string into an html5ever RcDom.
fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

/// Collapse runs of blank lines to a single blank line.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    EXCESS_BLANK_LINES.replace_all(text, "\n\n").into_owned()
}

/// Collapse runs of blank lines and normalize the document edges: no
/// surrounding whitespace, exactly one trailing newline (or nothing at all
/// for empty output).
fn finish(output: &str) -> String {
    let collapsed = collapse_blank_lines(output);
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

/// Concatenated text of a subtree, collected without recursion so arbitrary
/// nesting depth cannot overflow the stack.
pub(crate) fn plain_text(handle: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Text { ref contents } = node.data {
            out.push_str(&contents.borrow());
        }
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }
    out
}
