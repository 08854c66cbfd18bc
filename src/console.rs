//! Output side of the prompt: static text and in-place indicator repaints.
//!
//! Animation frames are written with carriage-return overwriting (cursor to
//! column 0, content, no newline, flush). Static text is written as-is and
//! flushed immediately.

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Stdout, Write};

/// Output stream shared by the foreground prompt and the indicator thread
pub trait Console: Send {
    /// Writes static text and flushes
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// Overwrites the current line with `message` followed by `frame`
    fn draw_frame(&mut self, message: &str, frame: &str) -> io::Result<()>;

    /// Overwrites the current line with `width` blanks and returns to column 0
    fn clear_line(&mut self, width: usize) -> io::Result<()>;
}

/// Console backed by a real terminal (or any writer) via crossterm commands
pub struct TerminalConsole<W: Write = Stdout> {
    out: W,
    frame_color: Option<Color>,
}

impl TerminalConsole<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalConsole<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frame_color: None,
        }
    }

    /// Colors the indicator line (message and frame)
    pub fn with_frame_color(mut self, color: Option<Color>) -> Self {
        self.frame_color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Console for TerminalConsole<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))?;
        self.out.flush()
    }

    fn draw_frame(&mut self, message: &str, frame: &str) -> io::Result<()> {
        queue!(self.out, Print('\r'))?;
        if let Some(color) = self.frame_color {
            queue!(
                self.out,
                SetForegroundColor(color),
                Print(message),
                Print(frame),
                ResetColor
            )?;
        } else {
            queue!(self.out, Print(message), Print(frame))?;
        }
        self.out.flush()
    }

    fn clear_line(&mut self, width: usize) -> io::Result<()> {
        queue!(self.out, Print('\r'), Print(" ".repeat(width)), Print('\r'))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(console: TerminalConsole<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn test_draw_frame_overwrites_from_column_zero() {
        let mut console = TerminalConsole::new(Vec::new());
        console.draw_frame("Waiting...", "|").unwrap();
        console.draw_frame("Waiting...", "/").unwrap();
        assert_eq!(written(console), "\rWaiting...|\rWaiting.../");
    }

    #[test]
    fn test_clear_line_writes_blanks() {
        let mut console = TerminalConsole::new(Vec::new());
        console.clear_line(5).unwrap();
        assert_eq!(written(console), "\r     \r");
    }

    #[test]
    fn test_write_text_is_verbatim() {
        let mut console = TerminalConsole::new(Vec::new());
        console.write_text("Name? \n").unwrap();
        assert_eq!(written(console), "Name? \n");
    }

    #[test]
    fn test_colored_frame_contains_content() {
        let mut console =
            TerminalConsole::new(Vec::new()).with_frame_color(Some(Color::AnsiValue(46)));
        console.draw_frame("React now! ", "◐").unwrap();
        let output = written(console);
        assert!(output.starts_with('\r'));
        assert!(output.contains("React now! "));
        assert!(output.contains('◐'));
        assert!(output.contains('\x1b'), "expected ANSI color escape");
    }
}
