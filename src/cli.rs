//! Command-line interface.
//!
//! [`main`] is the library-level entry function the binary shim forwards
//! process arguments to: it parses the argument list, runs the conversion,
//! and returns the process exit status.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::Verbosity;
use tracing_subscriber::EnvFilter;

use crate::options::{HeadingStyle, NewlineStyle, Options};

/// Parse an argument list (without the program name) and run the conversion.
///
/// Returns the process exit status: `0` on success (including `--help` and
/// `--version`), `2` on usage errors, `1` on runtime failures.
pub fn main(args: Vec<String>) -> u8 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 2,
            };
            let _ = err.print();
            return code;
        }
    };

    cli.init_logging();

    match cli.run() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    }
}

/// Convert HTML documents or fragments to Markdown.
#[derive(Debug, Parser)]
#[command(name = "html-to-markdown", version, about, no_binary_name = true)]
struct Cli {
    /// HTML file to read; stdin if absent or `-`
    input: Option<PathBuf>,

    /// Write Markdown to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Heading style
    #[arg(long, value_enum, default_value_t = HeadingStyleArg::Atx)]
    heading_style: HeadingStyleArg,

    /// Bullet characters for unordered lists, cycled by nesting depth
    #[arg(long, default_value = "*+-")]
    bullets: String,

    /// Marker for emphasis and strong emphasis
    #[arg(long, value_enum, default_value_t = SymbolArg::Asterisk)]
    strong_em_symbol: SymbolArg,

    /// Hard line break style
    #[arg(long, value_enum, default_value_t = NewlineStyleArg::Spaces)]
    newline_style: NewlineStyleArg,

    /// Never emit <url> autolinks
    #[arg(long)]
    no_autolinks: bool,

    /// Give title-less links a title equal to their destination
    #[arg(long)]
    default_title: bool,

    /// Info string for code blocks without a language class
    #[arg(long, value_name = "LANG", default_value = "", hide_default_value = true)]
    code_language: String,

    /// Leave asterisks in text unescaped
    #[arg(long)]
    no_escape_asterisks: bool,

    /// Leave underscores in text unescaped
    #[arg(long)]
    no_escape_underscores: bool,

    /// Leave miscellaneous Markdown syntax in text unescaped
    #[arg(long)]
    no_escape_misc: bool,

    /// Keep ![alt](src) images inside this tag instead of using alt text
    #[arg(long, value_name = "TAG")]
    keep_inline_images_in: Vec<String>,

    /// Suppress Markdown markup for this tag, keeping its content
    #[arg(long, value_name = "TAG", conflicts_with = "convert")]
    strip: Vec<String>,

    /// Only produce Markdown markup for this tag
    #[arg(long, value_name = "TAG")]
    convert: Vec<String>,

    /// Marker around <sub> content
    #[arg(long, value_name = "S", default_value = "", hide_default_value = true)]
    sub_symbol: String,

    /// Marker around <sup> content
    #[arg(long, value_name = "S", default_value = "", hide_default_value = true)]
    sup_symbol: String,

    /// Re-flow paragraph text
    #[arg(long)]
    wrap: bool,

    /// Wrap width in columns
    #[arg(long, value_name = "N", default_value_t = 80)]
    wrap_width: usize,

    #[command(flatten)]
    verbosity: Verbosity,
}

impl Cli {
    fn init_logging(&self) {
        let default = self.verbosity.log_level_filter().to_string().to_lowercase();
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    }

    fn run(self) -> anyhow::Result<()> {
        let html = self.read_input()?;
        let markdown = crate::convert_with(&html, &self.to_options())?;
        self.write_output(&markdown)
    }

    fn read_input(&self) -> anyhow::Result<String> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                tracing::debug!(path = %path.display(), "reading input file");
                fs::read_to_string(path)
                    .with_context(|| format!("cannot read {}", path.display()))
            }
            _ => {
                tracing::debug!("reading stdin");
                let mut html = String::new();
                io::stdin()
                    .read_to_string(&mut html)
                    .context("cannot read stdin")?;
                Ok(html)
            }
        }
    }

    fn write_output(&self, markdown: &str) -> anyhow::Result<()> {
        match &self.output {
            Some(path) => {
                tracing::debug!(path = %path.display(), "writing output file");
                fs::write(path, markdown)
                    .with_context(|| format!("cannot write {}", path.display()))
            }
            None => io::stdout()
                .write_all(markdown.as_bytes())
                .context("cannot write stdout"),
        }
    }

    fn to_options(&self) -> Options {
        Options::new()
            .with_heading_style(self.heading_style.into())
            .with_bullets(self.bullets.clone())
            .with_strong_em_symbol(self.strong_em_symbol.into())
            .with_newline_style(self.newline_style.into())
            .with_autolinks(!self.no_autolinks)
            .with_default_title(self.default_title)
            .with_code_language(self.code_language.clone())
            .with_escape_asterisks(!self.no_escape_asterisks)
            .with_escape_underscores(!self.no_escape_underscores)
            .with_escape_misc(!self.no_escape_misc)
            .with_keep_inline_images_in(self.keep_inline_images_in.clone())
            .with_strip(self.strip.clone())
            .with_convert(self.convert.clone())
            .with_sub_symbol(self.sub_symbol.clone())
            .with_sup_symbol(self.sup_symbol.clone())
            .with_wrap(self.wrap)
            .with_wrap_width(self.wrap_width)
    }
}

/// CLI mirror of [`HeadingStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeadingStyleArg {
    Atx,
    AtxClosed,
    Underlined,
}

impl From<HeadingStyleArg> for HeadingStyle {
    fn from(value: HeadingStyleArg) -> Self {
        match value {
            HeadingStyleArg::Atx => HeadingStyle::Atx,
            HeadingStyleArg::AtxClosed => HeadingStyle::AtxClosed,
            HeadingStyleArg::Underlined => HeadingStyle::Underlined,
        }
    }
}

/// CLI mirror of the emphasis marker choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SymbolArg {
    Asterisk,
    Underscore,
}

impl From<SymbolArg> for char {
    fn from(value: SymbolArg) -> Self {
        match value {
            SymbolArg::Asterisk => '*',
            SymbolArg::Underscore => '_',
        }
    }
}

/// CLI mirror of [`NewlineStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NewlineStyleArg {
    Spaces,
    Backslash,
}

impl From<NewlineStyleArg> for NewlineStyle {
    fn from(value: NewlineStyleArg) -> Self {
        match value {
            NewlineStyleArg::Spaces => NewlineStyle::Spaces,
            NewlineStyleArg::Backslash => NewlineStyle::Backslash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_reads_stdin() {
        let cli = Cli::try_parse_from(Vec::<String>::new()).unwrap();
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_positional_input_is_first_argument() {
        let cli = Cli::try_parse_from(["input.html"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("input.html")));
    }

    #[test]
    fn test_flags_map_onto_options() {
        let cli = Cli::try_parse_from([
            "--heading-style",
            "underlined",
            "--bullets",
            "-",
            "--strong-em-symbol",
            "underscore",
            "--newline-style",
            "backslash",
            "--no-autolinks",
            "--no-escape-asterisks",
            "--wrap",
            "--wrap-width",
            "72",
        ])
        .unwrap();
        let options = cli.to_options();
        assert_eq!(options.heading_style, HeadingStyle::Underlined);
        assert_eq!(options.bullets, "-");
        assert_eq!(options.strong_em_symbol, '_');
        assert_eq!(options.newline_style, NewlineStyle::Backslash);
        assert!(!options.autolinks);
        assert!(!options.escape_asterisks);
        assert!(options.escape_underscores);
        assert!(options.wrap);
        assert_eq!(options.wrap_width, 72);
    }

    #[test]
    fn test_strip_conflicts_with_convert() {
        let err = Cli::try_parse_from(["--strip", "a", "--convert", "p"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_repeatable_tag_filters() {
        let cli = Cli::try_parse_from(["--strip", "a", "--strip", "img"]).unwrap();
        assert_eq!(cli.strip, vec!["a", "img"]);
    }
}
