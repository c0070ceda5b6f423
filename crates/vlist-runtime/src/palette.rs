#![forbid(unsafe_code)]

//! Cyclic row colours.

use std::borrow::Cow;

/// Pastel colours used when no palette is supplied.
pub const DEFAULT_COLORS: [&str; 10] = [
    "#FFCCCC", "#FFCC99", "#FFFF99", "#CCFFCC", "#CCFFFF", "#CCCCFF", "#FFCCFF", "#FF9999",
    "#99CCFF", "#FF9966",
];

/// A caller-owned list of colours assigned to rows by global index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Cow<'static, str>>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|&c| Cow::Borrowed(c)).collect(),
        }
    }
}

impl Palette {
    /// Build a palette from any list of colour strings.
    pub fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
        }
    }

    /// Colour for a row; `None` only for an empty palette.
    #[must_use]
    pub fn color_for(&self, index: usize) -> Option<&str> {
        if self.colors.is_empty() {
            return None;
        }
        Some(&self.colors[index % self.colors.len()])
    }

    /// Number of colours in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colours.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
