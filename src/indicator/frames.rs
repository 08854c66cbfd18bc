//! Frame sets and the cyclic frame sequence shown by the waiting indicator

use crate::constants::RANDOM_STYLE;
use crate::error::AppError;
use rand::seq::IndexedRandom;
use std::sync::Arc;

/// Built-in indicator styles as `(name, frames)` pairs
pub const BUILTIN_STYLES: &[(&str, &[&str])] = &[
    ("classic", &["|", "/", "-", "\\"]),
    ("braille", &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    ("quarter", &["◐", "◓", "◑", "◒"]),
    ("arrows", &["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"]),
    ("bounce", &["▁", "▃", "▄", "▅", "▆", "▇", "▆", "▅", "▄", "▃"]),
    ("dots", &[".  ", ".. ", "...", " ..", "  .", "   "]),
];

/// Returns the names of all built-in styles in display order
pub fn builtin_style_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_STYLES.iter().map(|(name, _)| *name)
}

/// Returns true if `name` is a built-in style or the random selector
pub fn is_known_style(name: &str) -> bool {
    name == RANDOM_STYLE || builtin_style_names().any(|n| n == name)
}

/// Ordered, non-empty set of indicator glyphs.
///
/// Cheap to clone; the glyphs are shared between the foreground prompt and
/// the indicator thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    frames: Arc<[String]>,
}

impl FrameSet {
    /// Creates a frame set, rejecting an empty glyph list
    pub fn new<I, S>(frames: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
        if frames.is_empty() {
            return Err(AppError::EmptyFrameSet);
        }
        Ok(Self {
            frames: frames.into(),
        })
    }

    /// Looks up a built-in style by name
    pub fn builtin(name: &str) -> Option<Self> {
        BUILTIN_STYLES
            .iter()
            .find(|(style, _)| *style == name)
            .map(|(_, frames)| Self {
                frames: frames.iter().map(|f| f.to_string()).collect(),
            })
    }

    /// Picks one of the built-in styles at random
    pub fn random() -> Self {
        let (name, frames) = BUILTIN_STYLES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(BUILTIN_STYLES[0]);
        tracing::debug!("Selected random indicator style: {name}");
        Self {
            frames: frames.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Resolves a configured style name, treating `"random"` as a fresh pick
    pub fn from_style(name: &str) -> Result<Self, AppError> {
        if name == RANDOM_STYLE {
            return Ok(Self::random());
        }
        Self::builtin(name)
            .ok_or_else(|| AppError::config_error(format!("Unknown indicator style '{name}'")))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(String::as_str)
    }

    /// Display width of the widest glyph, in characters
    pub fn max_width(&self) -> usize {
        self.frames
            .iter()
            .map(|f| f.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Starts a fresh cycle at the first frame
    pub fn cycle(&self) -> FrameCycle {
        FrameCycle {
            frames: self.clone(),
            index: 0,
        }
    }
}

/// Infinite wrap-around walk over a [`FrameSet`].
#[derive(Debug, Clone)]
pub struct FrameCycle {
    frames: FrameSet,
    index: usize,
}

impl FrameCycle {
    /// Gets the current animation frame
    pub fn current_frame(&self) -> &str {
        &self.frames.frames[self.index]
    }

    /// Advances to the next animation frame
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.frames.len();
    }

    /// Goes back to the first frame
    pub fn restart(&mut self) {
        self.index = 0;
    }
}

impl Iterator for FrameCycle {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.current_frame().to_string();
        self.advance();
        Some(frame)
    }
}
