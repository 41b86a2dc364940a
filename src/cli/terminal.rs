//! Terminal capability detection and utilities

use owo_colors::{OwoColorize, colors::css};
use supports_color::Stream;

/// Detects whether colored output should be enabled on `stream`
fn supports_color(stream: Stream) -> bool {
    supports_color::on(stream).is_some()
}

/// Extension trait for colorizing status lines.
///
/// Status lines go to stderr so they never mix with text-mode output.
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as error (red)
    fn error(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color(Stream::Stderr) {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn error(&self) -> String {
        if supports_color(Stream::Stderr) {
            self.fg::<css::Red>().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn error(&self) -> String {
        self.as_str().error()
    }
}
