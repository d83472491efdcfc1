//! # Public API
//!
//! Entry points that run the whole chart pipeline in one call.
//!
//! ## Pipeline
//! 1. Extract metadata from the original text (directives, declared key)
//! 2. Transpose every `[Chord]` and the key lines by the requested offset
//! 3. Split the transposed text into display lines
//! 4. Parse each line into lyric and chords
//! 5. Lay the lines out for the display mode and column width
//!
//! Every step is a pure function of its inputs, so callers can re-render on
//! any change of offset, mode or width, or cache results keyed by those
//! parameters.
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordsheet::{render, DisplayMode, RenderOptions};
//!
//! let song = "Amaz[G]ing [C]grace\n{title: Amazing Grace}\n{key: G}\n";
//! let options = RenderOptions::new(DisplayMode::Over).with_transpose(2);
//!
//! let rendered = render(song, &options);
//! assert_eq!(rendered.key.as_deref(), Some("A"));
//! assert_eq!(rendered.key_header(), "Key: G → A");
//! assert_eq!(rendered.text_lines(), vec!["    A   D", "Amazing grace"]);
//! ```

use crate::ast::{DisplayMode, DisplayUnit};
use crate::config::{RenderOptions, SongRecord};
use crate::layout::{layout, render_text};
use crate::metadata::{extract_metadata, SongMetadata};
use crate::parser::{parse_lines, to_display_lines};
use crate::transpose::{transpose_song, transpose_token};
use serde::Serialize;

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSong {
    /// Metadata of the untransposed song.
    pub metadata: SongMetadata,
    /// Declared key after transposition.
    pub key: Option<String>,
    pub transpose: i32,
    pub mode: DisplayMode,
    pub width: Option<usize>,
    pub units: Vec<DisplayUnit>,
}

impl RenderedSong {
    /// Declared key before transposition.
    pub fn original_key(&self) -> Option<&str> {
        self.metadata.declared_key.as_deref()
    }

    /// Header text such as `Key: G → A`, `Key: G`, or `Key: —` when no key
    /// is declared.
    pub fn key_header(&self) -> String {
        match (self.original_key(), self.key.as_deref()) {
            (Some(from), Some(to)) if from != to => format!("Key: {} → {}", from, to),
            (_, Some(key)) => format!("Key: {}", key),
            _ => "Key: —".to_string(),
        }
    }

    /// Display units flattened to printable lines.
    pub fn text_lines(&self) -> Vec<String> {
        render_text(&self.units)
    }
}

/// Render song text with the given options.
pub fn render(song: &str, options: &RenderOptions) -> RenderedSong {
    render_with_metadata(song, extract_metadata(song), options)
}

/// Render a song record, honoring its explicit song-level key.
pub fn render_record(record: &SongRecord, options: &RenderOptions) -> RenderedSong {
    let metadata = extract_metadata(&record.body).with_explicit_key(record.key.as_deref());
    render_with_metadata(&record.body, metadata, options)
}

fn render_with_metadata(song: &str, metadata: SongMetadata, options: &RenderOptions) -> RenderedSong {
    let transposed = transpose_song(song, options.transpose);
    let lines = to_display_lines(&transposed);
    let parsed = parse_lines(&lines);
    let units = layout(&parsed, options.mode, options.width);
    let key = metadata
        .declared_key
        .as_deref()
        .map(|key| transpose_token(key, options.transpose));

    log::debug!(
        "rendered {} lines into {} units (mode {}, transpose {}, width {:?})",
        lines.len(),
        units.len(),
        options.mode,
        options.transpose,
        options.width
    );

    RenderedSong {
        metadata,
        key,
        transpose: options.transpose,
        mode: options.mode,
        width: options.width,
        units,
    }
}
