//! # Chart Value Types
//!
//! This module defines the values that flow through the chart engine.
//!
//! ## Type Hierarchy
//! ```text
//! song text
//!   └── Vec<ParsedLine>            (one per display line)
//!         ├── lyric: String        (markers stripped)
//!         └── Vec<ChordToken>
//!               ├── name: String   (raw bracket contents)
//!               └── offset: usize  (char index into lyric)
//!
//! layout output
//!   └── Vec<DisplayUnit>
//!         ├── Text { text, style, anchors }   (lyrics / chords lines)
//!         ├── Inline { spans, style }         (inline mode / preamble)
//!         └── Segment(LayoutSegment)          (one over-mode wrap window)
//! ```
//!
//! ## Key Concepts
//!
//! ### Offsets
//! All offsets and columns are counted in `char`s, not bytes, so lyrics with
//! accented letters line up the same way they are displayed in a fixed-width
//! font.
//!
//! ### Chord anchors
//! Every chord that reaches the output carries a [`ChordAnchor`] pointing back
//! at the source chord (`line`, `index`). Presentation layers use it to resolve
//! a tap on a chord glyph without a separate rendering path.
//!
//! ## Related Modules
//! - `parser` - builds `ParsedLine`s from song text
//! - `layout` - turns `ParsedLine`s into `DisplayUnit`s

use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A chord anchored to a position in a lyric line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordToken {
    /// Raw bracket contents, e.g. `G`, `Bm7`, `F#/A#`. May be empty for `[]`.
    pub name: String,
    /// Char index into the lyric of the character the chord sits above.
    pub offset: usize,
}

impl ChordToken {
    pub fn new(name: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }
}

/// One line of song text split into its lyric and chords.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedLine {
    pub lyric: String,
    pub chords: Vec<ChordToken>,
}

impl ParsedLine {
    /// Line with no chords.
    pub fn plain(lyric: impl Into<String>) -> Self {
        Self {
            lyric: lyric.into(),
            chords: Vec::new(),
        }
    }

    /// True if at least one chord name has something besides whitespace,
    /// i.e. the line's chord line would not be blank.
    pub fn has_visible_chords(&self) -> bool {
        self.chords.iter().any(|c| !c.name.trim().is_empty())
    }

    /// Rebuild the annotated source line by reinserting every chord as
    /// `[name]` at its offset. Empty chords come back as `[]`.
    ///
    /// # Example
    /// ```
    /// use chordsheet::parse_line;
    ///
    /// let line = "Amaz[C]ing [G]grace";
    /// assert_eq!(parse_line(line).to_annotated(), line);
    /// ```
    pub fn to_annotated(&self) -> String {
        let mut out = String::with_capacity(self.lyric.len() + self.chords.len() * 4);
        let mut chords = self.chords.iter().peekable();

        for (i, c) in self.lyric.chars().enumerate() {
            while let Some(chord) = chords.next_if(|chord| chord.offset <= i) {
                out.push('[');
                out.push_str(&chord.name);
                out.push(']');
            }
            out.push(c);
        }
        for chord in chords {
            out.push('[');
            out.push_str(&chord.name);
            out.push(']');
        }
        out
    }
}

/// How chords are shown relative to lyrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Chords kept inline in brackets, as written.
    Inline,
    /// Chord line above each lyric line, wrapped to the column width.
    #[default]
    Over,
    /// Lyrics only.
    Lyrics,
    /// Chord lines only.
    Chords,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::Inline,
        DisplayMode::Over,
        DisplayMode::Lyrics,
        DisplayMode::Chords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Inline => "inline",
            DisplayMode::Over => "over",
            DisplayMode::Lyrics => "lyrics",
            DisplayMode::Chords => "chords",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(DisplayMode::Inline),
            "over" => Ok(DisplayMode::Over),
            "lyrics" => Ok(DisplayMode::Lyrics),
            "chords" => Ok(DisplayMode::Chords),
            _ => Err(ChartError::InvalidMode(s.to_string())),
        }
    }
}

/// Points from a rendered chord back to the chord it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordAnchor {
    /// Index of the source line in the slice passed to `layout`.
    pub line: usize,
    /// Index of the chord within that line's `chords`.
    pub index: usize,
    /// Char column of the chord's first glyph within the rendered line.
    pub column: usize,
}

/// One wrapped window of an over-mode chord/lyric pair.
///
/// Both lines cover the same column range, so the chord glyph at column `n`
/// of `chord_line` sits above character `n` of `lyric_line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSegment {
    pub chord_line: String,
    pub lyric_line: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<ChordAnchor>,
}

/// Visual role of a single-line display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Lyric,
    Chords,
}

/// How an inline unit shows its chords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineStyle {
    /// Chords wrapped in brackets (inline mode).
    Bracketed,
    /// Chords shown as bare colored names (lines before the `||` sentinel).
    Preamble,
}

/// A run of lyric text or a chord within an inline unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InlineSpan {
    Text { text: String },
    Chord { name: String, anchor: ChordAnchor },
}

/// One renderable unit of layout output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DisplayUnit {
    Text {
        text: String,
        style: LineStyle,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        anchors: Vec<ChordAnchor>,
    },
    Inline {
        spans: Vec<InlineSpan>,
        style: InlineStyle,
    },
    Segment(LayoutSegment),
}

impl DisplayUnit {
    pub fn lyric(text: impl Into<String>) -> Self {
        DisplayUnit::Text {
            text: text.into(),
            style: LineStyle::Lyric,
            anchors: Vec::new(),
        }
    }

    /// Flatten to printable text. Segments become two lines (chords, lyric).
    pub fn to_text(&self) -> String {
        match self {
            DisplayUnit::Text { text, .. } => text.clone(),
            DisplayUnit::Inline { spans, style } => {
                let mut out = String::new();
                for span in spans {
                    match span {
                        InlineSpan::Text { text } => out.push_str(text),
                        InlineSpan::Chord { name, .. } => match style {
                            InlineStyle::Bracketed => {
                                out.push('[');
                                out.push_str(name);
                                out.push(']');
                            }
                            InlineStyle::Preamble => out.push_str(name),
                        },
                    }
                }
                out
            }
            DisplayUnit::Segment(seg) => format!("{}\n{}", seg.chord_line, seg.lyric_line),
        }
    }
}
