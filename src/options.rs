// Conversion options.
//
// All formatting choices live here. The CLI mirrors this surface one flag
// per field; the library keeps plain enums so consumers don't inherit the
// CLI dependency.

use crate::error::ConvertError;

/// Heading style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// `# Heading` (default).
    #[default]
    Atx,
    /// `# Heading #` with closing hashes.
    AtxClosed,
    /// Setext (`===`/`---`); only for h1/h2, falls back to ATX for h3–h6.
    Underlined,
}

/// Hard line break style for `<br>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineStyle {
    /// Two trailing spaces (default).
    #[default]
    Spaces,
    /// Trailing backslash.
    Backslash,
}

/// Conversion options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Heading style.
    pub heading_style: HeadingStyle,
    /// Bullet characters for unordered lists, cycled by nesting depth.
    pub bullets: String,
    /// Marker character for emphasis (single) and strong emphasis (doubled).
    pub strong_em_symbol: char,
    /// Hard line break style.
    pub newline_style: NewlineStyle,
    /// Emit `<url>` autolinks when the link text equals the destination.
    pub autolinks: bool,
    /// Give title-less links a title equal to their destination.
    pub default_title: bool,
    /// Info string for code blocks without a `language-*` class.
    pub code_language: String,
    /// Escape `*` in text.
    pub escape_asterisks: bool,
    /// Escape `_` in text.
    pub escape_underscores: bool,
    /// Escape other Markdown syntax in text (brackets, backticks, block
    /// markers at line starts, …).
    pub escape_misc: bool,
    /// Tags inside which images stay `![alt](src)` instead of degrading to
    /// their alt text. Relevant for headings and links.
    pub keep_inline_images_in: Vec<String>,
    /// Tags whose markup is suppressed; their content still converts.
    pub strip: Vec<String>,
    /// If non-empty, only these tags produce markup.
    pub convert: Vec<String>,
    /// Marker around `<sub>` content (empty = plain text).
    pub sub_symbol: String,
    /// Marker around `<sup>` content (empty = plain text).
    pub sup_symbol: String,
    /// Re-flow paragraph text at [`wrap_width`](Self::wrap_width) columns.
    pub wrap: bool,
    /// Wrap width in columns.
    pub wrap_width: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            bullets: "*+-".to_string(),
            strong_em_symbol: '*',
            newline_style: NewlineStyle::Spaces,
            autolinks: true,
            default_title: false,
            code_language: String::new(),
            escape_asterisks: true,
            escape_underscores: true,
            escape_misc: true,
            keep_inline_images_in: Vec::new(),
            strip: Vec::new(),
            convert: Vec::new(),
            sub_symbol: String::new(),
            sup_symbol: String::new(),
            wrap: false,
            wrap_width: 80,
        }
    }
}

impl Options {
    /// Create a new Options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading style.
    pub fn with_heading_style(mut self, style: HeadingStyle) -> Self {
        self.heading_style = style;
        self
    }

    /// Set the unordered list bullet characters (cycled by nesting depth).
    pub fn with_bullets(mut self, bullets: impl Into<String>) -> Self {
        self.bullets = bullets.into();
        self
    }

    /// Set the emphasis/strong marker character.
    pub fn with_strong_em_symbol(mut self, symbol: char) -> Self {
        self.strong_em_symbol = symbol;
        self
    }

    /// Set the hard line break style.
    pub fn with_newline_style(mut self, style: NewlineStyle) -> Self {
        self.newline_style = style;
        self
    }

    /// Set whether to emit `<url>` autolinks.
    pub fn with_autolinks(mut self, autolinks: bool) -> Self {
        self.autolinks = autolinks;
        self
    }

    /// Set whether title-less links get a title equal to their destination.
    pub fn with_default_title(mut self, default_title: bool) -> Self {
        self.default_title = default_title;
        self
    }

    /// Set the fallback info string for code blocks.
    pub fn with_code_language(mut self, language: impl Into<String>) -> Self {
        self.code_language = language.into();
        self
    }

    /// Set whether to escape `*` in text.
    pub fn with_escape_asterisks(mut self, escape: bool) -> Self {
        self.escape_asterisks = escape;
        self
    }

    /// Set whether to escape `_` in text.
    pub fn with_escape_underscores(mut self, escape: bool) -> Self {
        self.escape_underscores = escape;
        self
    }

    /// Set whether to escape other Markdown syntax in text.
    pub fn with_escape_misc(mut self, escape: bool) -> Self {
        self.escape_misc = escape;
        self
    }

    /// Set the tags inside which images keep their `![alt](src)` form.
    pub fn with_keep_inline_images_in<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_inline_images_in = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tags whose markup is suppressed.
    pub fn with_strip<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict markup to the given tags.
    pub fn with_convert<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.convert = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the marker around `<sub>` content.
    pub fn with_sub_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.sub_symbol = symbol.into();
        self
    }

    /// Set the marker around `<sup>` content.
    pub fn with_sup_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.sup_symbol = symbol.into();
        self
    }

    /// Set whether to re-flow paragraph text.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set the wrap width.
    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    /// Reject option combinations the converter cannot honor.
    pub(crate) fn validate(&self) -> Result<(), ConvertError> {
        if self.bullets.is_empty() {
            return Err(ConvertError::InvalidOptions(
                "bullets must contain at least one character".to_string(),
            ));
        }
        if self.wrap_width == 0 {
            return Err(ConvertError::InvalidOptions(
                "wrap_width must be at least one column".to_string(),
            ));
        }
        if !self.strip.is_empty() && !self.convert.is_empty() {
            return Err(ConvertError::InvalidOptions(
                "strip and convert are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}
