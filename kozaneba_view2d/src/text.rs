// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement and line wrapping for notes and cluster titles.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`
use unicode_width::UnicodeWidthChar;

/// Marker appended to a line that had to be cut short.
pub const ELLIPSIS: char = '…';

/// Generic font family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Proportional UI font.
    #[default]
    SansSerif,
    /// Fixed-pitch font.
    Monospace,
}

/// A font request: size in pixels, weight and family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    /// Size in pixels.
    pub size: f64,
    /// Bold weight.
    pub bold: bool,
    /// Family.
    pub family: FontFamily,
}

impl Font {
    /// Regular sans-serif font of `size` pixels.
    #[must_use]
    pub const fn new(size: f64) -> Self {
        Self {
            size,
            bold: false,
            family: FontFamily::SansSerif,
        }
    }

    /// The same font in bold.
    #[must_use]
    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    /// The same font in the monospace family.
    #[must_use]
    pub const fn monospace(self) -> Self {
        Self {
            family: FontFamily::Monospace,
            ..self
        }
    }
}

/// Measures the advance width of a single line of text.
///
/// Real renderers back this with their font stack. Layout code only depends
/// on this trait, so it can be tested with a fixed-advance fake.
pub trait TextMeasure {
    /// Width of `text` in pixels when set in `font`.
    fn measure(&self, text: &str, font: &Font) -> f64;
}

impl<F: Fn(&str, &Font) -> f64> TextMeasure for F {
    fn measure(&self, text: &str, font: &Font) -> f64 {
        self(text, font)
    }
}

/// Deterministic measurer based on Unicode display columns.
///
/// Narrow characters advance `narrow_em` of the font size, wide (East Asian)
/// characters `wide_em`, and zero-width characters nothing. Bold text is
/// `bold_factor` wider. Monospace text uses `mono_em` per column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnMeasure {
    /// Advance of a narrow character, in ems.
    pub narrow_em: f64,
    /// Advance of a wide character, in ems.
    pub wide_em: f64,
    /// Advance of one monospace column, in ems.
    pub mono_em: f64,
    /// Width multiplier for bold text.
    pub bold_factor: f64,
}

impl Default for ColumnMeasure {
    fn default() -> Self {
        Self {
            narrow_em: 0.55,
            wide_em: 1.0,
            mono_em: 0.6,
            bold_factor: 1.05,
        }
    }
}

impl TextMeasure for ColumnMeasure {
    fn measure(&self, text: &str, font: &Font) -> f64 {
        let ems: f64 = text
            .chars()
            .map(|ch| match (font.family, ch.width().unwrap_or(0)) {
                (_, 0) => 0.0,
                (FontFamily::Monospace, columns) => self.mono_em * columns as f64,
                (FontFamily::SansSerif, 1) => self.narrow_em,
                (FontFamily::SansSerif, _) => self.wide_em,
            })
            .sum();
        let weight = if font.bold { self.bold_factor } else { 1.0 };
        ems * font.size * weight
    }
}

/// Box that wrapped text must fit: a line width, a line budget and a font.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBox {
    /// Maximum line width in pixels.
    pub max_width: f64,
    /// Maximum number of lines.
    pub max_lines: usize,
    /// Font the lines are measured in.
    pub font: Font,
}

/// Layout of text inside a square note, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteTextStyle {
    /// Inset from each note edge.
    pub padding: f64,
    /// Note font.
    pub font: Font,
    /// Distance between baselines.
    pub line_height: f64,
}

impl Default for NoteTextStyle {
    fn default() -> Self {
        Self {
            padding: 8.0,
            font: Font::new(12.0),
            line_height: 12.0 * 1.2,
        }
    }
}

impl NoteTextStyle {
    /// The text box inside a note of edge length `note_size`.
    ///
    /// The line budget is how many whole lines fit in the padded height.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the line count is a small non-negative whole number"
    )]
    pub fn text_box(&self, note_size: f64) -> TextBox {
        let inner = (note_size - 2.0 * self.padding).max(0.0);
        let max_lines = if self.line_height > 0.0 {
            (inner / self.line_height).floor() as usize
        } else {
            0
        };
        TextBox {
            max_width: inner,
            max_lines,
            font: self.font,
        }
    }
}

fn fits<M: TextMeasure + ?Sized>(text: &str, bx: &TextBox, measure: &M) -> bool {
    measure.measure(text, &bx.font) <= bx.max_width
}

/// Trims `line` until `line + …` fits, then appends the ellipsis.
fn ellipsize<M: TextMeasure + ?Sized>(line: &mut String, bx: &TextBox, measure: &M) {
    loop {
        let mut candidate = line.clone();
        candidate.push(ELLIPSIS);
        if line.is_empty() || fits(&candidate, bx, measure) {
            *line = candidate;
            return;
        }
        line.pop();
    }
}

/// Greedy word wrapping with character breaking for over-long words.
///
/// Words are separated by whitespace and packed onto lines while they fit.
/// A word wider than a whole line is split between characters; a single
/// character wider than the line gets a line of its own. Wrapping stops at
/// `max_lines`, and if text was left over the last line is shortened until it
/// fits with a trailing `…`.
///
/// ```
/// use kozaneba_view2d::{Font, TextBox, wrap_words};
///
/// // Every character is 10px wide.
/// let measure = |s: &str, _: &Font| 10.0 * s.chars().count() as f64;
/// let bx = TextBox { max_width: 50.0, max_lines: 2, font: Font::new(12.0) };
/// assert_eq!(wrap_words("ab cd efghijk", &bx, &measure), ["ab cd", "efgh…"]);
/// ```
pub fn wrap_words<M: TextMeasure + ?Sized>(text: &str, bx: &TextBox, measure: &M) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if bx.max_lines == 0 {
        return lines;
    }
    let mut current = String::new();
    let mut truncated = false;
    let mut words = text.split_whitespace().peekable();

    'words: while let Some(word) = words.next() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            alloc::format!("{current} {word}")
        };
        if fits(&candidate, bx, measure) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(core::mem::take(&mut current));
            if lines.len() >= bx.max_lines {
                truncated = true;
                break;
            }
            if fits(word, bx, measure) {
                current = word.to_string();
                continue;
            }
        }
        let mut chars = word.chars().peekable();
        while let Some(ch) = chars.next() {
            current.push(ch);
            if fits(&current, bx, measure) {
                continue;
            }
            current.pop();
            if current.is_empty() {
                lines.push(ch.to_string());
            } else {
                lines.push(core::mem::take(&mut current));
                current.push(ch);
            }
            if lines.len() >= bx.max_lines {
                truncated =
                    !current.is_empty() || chars.peek().is_some() || words.peek().is_some();
                current.clear();
                break 'words;
            }
            if !fits(&current, bx, measure) && !current.is_empty() {
                lines.push(core::mem::take(&mut current));
                if lines.len() >= bx.max_lines {
                    truncated = chars.peek().is_some() || words.peek().is_some();
                    break 'words;
                }
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if truncated && let Some(last) = lines.last_mut() {
        ellipsize(last, bx, measure);
    }
    lines
}

/// Character-by-character wrapping, for text without word spaces.
///
/// Used for cluster titles. Stops at `max_lines` and ends with `…` if text
/// was left over.
///
/// ```
/// use kozaneba_view2d::{Font, TextBox, wrap_chars};
///
/// let measure = |s: &str, _: &Font| 10.0 * s.chars().count() as f64;
/// let bx = TextBox { max_width: 30.0, max_lines: 2, font: Font::new(18.0).bold() };
/// assert_eq!(wrap_chars("駐輪場の不足", &bx, &measure), ["駐輪場", "の不足"]);
/// assert_eq!(wrap_chars("駐輪場の不足です", &bx, &measure), ["駐輪場", "の不…"]);
/// ```
pub fn wrap_chars<M: TextMeasure + ?Sized>(text: &str, bx: &TextBox, measure: &M) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if bx.max_lines == 0 {
        return lines;
    }
    let mut current = String::new();
    let mut truncated = false;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        current.push(ch);
        if fits(&current, bx, measure) {
            continue;
        }
        current.pop();
        if current.is_empty() {
            lines.push(ch.to_string());
        } else {
            lines.push(core::mem::take(&mut current));
            current.push(ch);
        }
        if lines.len() >= bx.max_lines {
            truncated = !current.is_empty() || chars.peek().is_some();
            current.clear();
            break;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if truncated && let Some(last) = lines.last_mut() {
        ellipsize(last, bx, measure);
    }
    lines
}
