//! # Render Configuration
//!
//! Options for one render pass, the YAML file form of those options, and the
//! song record shape handed over by song storage.
//!
//! ## YAML Configuration
//! ```yaml
//! mode: over          # inline | over | lyrics | chords
//! transpose: 2        # semitones, clamped to -11..=11
//! width: 40           # columns; omit for no wrapping
//! pixel-width: 360    # used with font-size when width is omitted
//! font-size: 16
//! ```
//!
//! ## Column Width
//! The layout works in columns, not pixels. A fixed-width glyph is about
//! `0.62` times as wide as the font size is tall, so
//! `columns = floor(pixel_width / (font_size * 0.62))`, never fewer than 8.

use crate::ast::DisplayMode;
use crate::error::ChartError;
use crate::metadata::extract_metadata;
use serde::{Deserialize, Serialize};

/// Width-to-height ratio of the fixed-width font used for chord alignment.
pub const GLYPH_ASPECT: f32 = 0.62;

/// Narrowest column count the estimate returns.
pub const MIN_COLUMNS: usize = 8;

/// Largest transpose step a user can dial in either direction.
pub const MAX_TRANSPOSE: i32 = 11;

/// Estimate how many fixed-width columns fit in `pixel_width`.
///
/// Returns `None` (no wrapping) when the font size is not a positive finite
/// number or the pixel width is not finite.
///
/// # Example
/// ```
/// use chordsheet::column_width;
///
/// assert_eq!(column_width(360.0, 16.0), Some(36));
/// assert_eq!(column_width(20.0, 16.0), Some(8));
/// assert_eq!(column_width(360.0, 0.0), None);
/// ```
pub fn column_width(pixel_width: f32, font_size: f32) -> Option<usize> {
    if !pixel_width.is_finite() || !font_size.is_finite() || font_size <= 0.0 {
        return None;
    }
    let columns = (pixel_width.max(0.0) / (font_size * GLYPH_ASPECT)).floor() as usize;
    Some(columns.max(MIN_COLUMNS))
}

/// Clamp a transpose offset to the range a user can select.
pub fn clamp_transpose(semitones: i32) -> i32 {
    semitones.clamp(-MAX_TRANSPOSE, MAX_TRANSPOSE)
}

/// Parameters of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    pub mode: DisplayMode,
    /// Semitone offset. The engine accepts any value.
    pub transpose: i32,
    /// Column width; `None` or `Some(0)` disables wrapping.
    pub width: Option<usize>,
}

impl RenderOptions {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_transpose(mut self, semitones: i32) -> Self {
        self.transpose = semitones;
        self
    }

    pub fn with_width(mut self, width: Option<usize>) -> Self {
        self.width = width;
        self
    }
}

/// Render options as written in a YAML file.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderConfig {
    pub mode: DisplayMode,
    pub transpose: i32,
    pub width: Option<usize>,
    pub pixel_width: Option<f32>,
    pub font_size: Option<f32>,
}

impl RenderConfig {
    /// Parse a YAML configuration. An empty document gives the defaults.
    ///
    /// # Example
    /// ```
    /// use chordsheet::{DisplayMode, RenderConfig};
    ///
    /// let config = RenderConfig::from_yaml("mode: lyrics\ntranspose: -3\n")?;
    /// assert_eq!(config.mode, DisplayMode::Lyrics);
    /// assert_eq!(config.transpose, -3);
    /// # Ok::<(), chordsheet::ChartError>(())
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, ChartError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ChartError::Config(e.to_string()))
    }

    pub fn clamped_transpose(&self) -> i32 {
        clamp_transpose(self.transpose)
    }

    /// Explicit width, else an estimate from pixel width and font size.
    pub fn effective_width(&self) -> Option<usize> {
        match (self.width, self.pixel_width, self.font_size) {
            (Some(width), _, _) => Some(width),
            (None, Some(px), Some(font)) => column_width(px, font),
            _ => None,
        }
    }

    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            mode: self.mode,
            transpose: self.clamped_transpose(),
            width: self.effective_width(),
        }
    }
}

/// A song as kept by song storage: body text plus record-level fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SongRecord {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Explicit song-level key; outranks any key written in the body.
    pub key: Option<String>,
    pub body: String,
}

impl SongRecord {
    /// A record with only a body, as for a raw chart file.
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ChartError> {
        serde_yaml::from_str(content).map_err(|e| ChartError::SongRecord(e.to_string()))
    }

    /// Declared key: record key, then `{key:}` directive, then `key:` line.
    pub fn declared_key(&self) -> Option<String> {
        extract_metadata(&self.body)
            .with_explicit_key(self.key.as_deref())
            .declared_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_width() {
        // 16 * 0.62 = 9.92 px per column
        assert_eq!(column_width(500.0, 16.0), Some(50));
        assert_eq!(column_width(105.0, 16.0), Some(10));
        assert_eq!(column_width(-50.0, 16.0), Some(MIN_COLUMNS));
        assert_eq!(column_width(f32::INFINITY, 16.0), None);
        assert_eq!(column_width(300.0, -1.0), None);
        assert_eq!(column_width(300.0, f32::NAN), None);
    }

    #[test]
    fn test_clamp_transpose() {
        assert_eq!(clamp_transpose(5), 5);
        assert_eq!(clamp_transpose(14), 11);
        assert_eq!(clamp_transpose(-30), -11);
    }

    #[test]
    fn test_config_defaults() {
        let config = RenderConfig::from_yaml("").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.to_options(), RenderOptions::default());
    }

    #[test]
    fn test_config_pixel_estimate() {
        let config = RenderConfig::from_yaml("mode: chords\npixel-width: 360\nfont-size: 16\ntranspose: 20").unwrap();
        assert_eq!(
            config.to_options(),
            RenderOptions {
                mode: DisplayMode::Chords,
                transpose: 11,
                width: Some(36),
            }
        );
    }

    #[test]
    fn test_config_explicit_width_wins() {
        let config = RenderConfig::from_yaml("width: 12\npixel-width: 360\nfont-size: 16").unwrap();
        assert_eq!(config.effective_width(), Some(12));
    }

    #[test]
    fn test_config_rejects_bad_yaml() {
        assert!(matches!(
            RenderConfig::from_yaml("mode: sideways"),
            Err(ChartError::Config(_))
        ));
        assert!(matches!(
            RenderConfig::from_yaml("colour: red"),
            Err(ChartError::Config(_))
        ));
    }

    #[test]
    fn test_song_record() {
        let record = SongRecord::from_yaml(
            "title: Hymn\nkey: A\nbody: |\n  {key: G}\n  [G]Amazing grace\n",
        )
        .unwrap();
        assert_eq!(record.title.as_deref(), Some("Hymn"));
        assert_eq!(record.declared_key().as_deref(), Some("A"));
        assert_eq!(record.body, "{key: G}\n[G]Amazing grace\n");

        let bare = SongRecord::from_body("{key: G}\n[G]Amazing grace");
        assert_eq!(bare.declared_key().as_deref(), Some("G"));
    }

    #[test]
    fn test_song_record_rejects_non_mapping() {
        assert!(matches!(
            SongRecord::from_yaml("- just\n- a list"),
            Err(ChartError::SongRecord(_))
        ));
    }
}
