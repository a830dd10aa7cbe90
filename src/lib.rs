// html-to-markdown — HTML to Markdown converter.
//
// Architecture:
//   HTML string → html5ever parse → DOM walk (per-tag handlers) → Markdown
//
// The converter is a single pass over the parsed tree: each handler renders
// its children first, then wraps the result in Markdown syntax. Block
// handlers pad their output with blank lines and a final pass collapses the
// excess, so handlers never need to know what their neighbors emitted.

mod error;
mod options;
mod render;

pub mod cli;

pub use error::ConvertError;
pub use options::{HeadingStyle, NewlineStyle, Options};

/// Convert an HTML string to Markdown using default options.
///
/// # Examples
///
/// ```
/// let md = html_to_markdown::convert("<h1>Hello</h1><p>World</p>").unwrap();
/// assert_eq!(md, "# Hello\n\nWorld\n");
/// ```
pub fn convert(html: &str) -> Result<String, ConvertError> {
    convert_with(html, &Options::default())
}

/// Convert an HTML string to Markdown with custom options.
///
/// # Examples
///
/// ```
/// use html_to_markdown::{convert_with, HeadingStyle, Options};
///
/// let options = Options::new().with_heading_style(HeadingStyle::Underlined);
/// let md = convert_with("<h1>Hello</h1>", &options).unwrap();
/// assert_eq!(md, "Hello\n=====\n");
/// ```
pub fn convert_with(html: &str, options: &Options) -> Result<String, ConvertError> {
    options.validate()?;
    Ok(render::render(html, options))
}
