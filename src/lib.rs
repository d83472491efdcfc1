//! Chord chart engine.
//!
//! Parses lyrics with inline `[Chord]` markers, transposes chords and keys by
//! semitones while keeping their sharp/flat spelling, and lays songs out in
//! inline, chords-over-lyrics, lyrics-only or chords-only form.

pub mod api;
pub mod ast;
pub mod config;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod parser;
pub mod transpose;

pub use api::{render, render_record, RenderedSong};
pub use ast::*;
pub use config::{clamp_transpose, column_width, RenderConfig, RenderOptions, SongRecord};
pub use error::*;
pub use layout::{chord_line, layout, preamble_end, render_text, wrap_segments};
pub use metadata::{extract_metadata, is_directive_line, normalize_key, resolve_declared_key, SongMetadata};
pub use parser::{parse_line, parse_lines, parse_song, to_display_lines};
pub use transpose::{pitch_class, transpose_song, transpose_token};
