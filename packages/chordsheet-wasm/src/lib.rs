use chordsheet::{ChartError, DisplayMode, RenderConfig, RenderOptions, RenderedSong, SongRecord};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, PartialEq, Serialize)]
struct ErrorInfo {
    kind: &'static str,
    message: String,
}

fn error_info(e: ChartError) -> ErrorInfo {
    let kind = match e {
        ChartError::InvalidMode(_) => "mode",
        ChartError::Config(_) => "config",
        ChartError::SongRecord(_) => "song-record",
    };
    ErrorInfo {
        kind,
        message: e.to_string(),
    }
}

fn error_to_js(e: ChartError) -> JsValue {
    let info = error_info(e);
    let json = serde_json::to_string(&info).unwrap_or_else(|_| info.message.clone());
    JsValue::from_str(&json)
}

fn options(mode: &str, transpose: i32, width: Option<usize>) -> Result<RenderOptions, ChartError> {
    let mode: DisplayMode = mode.parse()?;
    Ok(RenderOptions::new(mode).with_transpose(transpose).with_width(width))
}

/// Render through a song record so an explicit key outranks the body.
fn render_song(song: &str, explicit_key: Option<String>, options: &RenderOptions) -> RenderedSong {
    let record = SongRecord {
        key: explicit_key,
        ..SongRecord::from_body(song)
    };
    chordsheet::render_record(&record, options)
}

/// Render a song to display units.
///
/// `mode` is one of `inline`, `over`, `lyrics` or `chords`. A `width` of
/// zero or none disables wrapping. `explicit_key` is the song-level key
/// kept with the record, if any.
#[wasm_bindgen]
pub fn render(
    song: &str,
    mode: &str,
    transpose: i32,
    width: Option<usize>,
    explicit_key: Option<String>,
) -> Result<JsValue, JsValue> {
    let options = options(mode, transpose, width).map_err(error_to_js)?;
    let rendered = render_song(song, explicit_key, &options);
    Ok(serde_wasm_bindgen::to_value(&rendered)?)
}

/// Render a song to plain text lines joined by newlines.
#[wasm_bindgen]
pub fn render_text(song: &str, mode: &str, transpose: i32, width: Option<usize>) -> Result<String, JsValue> {
    let options = options(mode, transpose, width).map_err(error_to_js)?;
    Ok(chordsheet::render(song, &options).text_lines().join("\n"))
}

/// Render a song with a YAML render configuration.
#[wasm_bindgen]
pub fn render_with_config(song: &str, config: &str, explicit_key: Option<String>) -> Result<JsValue, JsValue> {
    let config = RenderConfig::from_yaml(config).map_err(error_to_js)?;
    let rendered = render_song(song, explicit_key, &config.to_options());
    Ok(serde_wasm_bindgen::to_value(&rendered)?)
}

/// Directives and declared key of a song
#[wasm_bindgen]
pub fn extract_metadata(song: &str) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(&chordsheet::extract_metadata(song))?)
}

/// Declared key, with an explicit song-level key taking precedence.
#[wasm_bindgen]
pub fn declared_key(explicit: Option<String>, song: &str) -> Option<String> {
    chordsheet::resolve_declared_key(explicit.as_deref(), song)
}

#[wasm_bindgen]
pub fn transpose(song: &str, semitones: i32) -> String {
    chordsheet::transpose_song(song, semitones)
}

#[wasm_bindgen]
pub fn transpose_key(token: &str, semitones: i32) -> String {
    chordsheet::transpose_token(token, semitones)
}

/// Display lines of a song as a JSON array of strings.
#[wasm_bindgen]
pub fn display_lines(song: &str) -> String {
    serde_json::to_string(&chordsheet::to_display_lines(song)).unwrap_or_else(|_| "[]".to_string())
}

/// Columns that fit in a pixel width at a font size.
#[wasm_bindgen]
pub fn column_width(pixel_width: f32, font_size: f32) -> Option<usize> {
    chordsheet::column_width(pixel_width, font_size)
}

/// Clamp a transpose offset to the selectable range.
#[wasm_bindgen]
pub fn clamp_transpose(semitones: i32) -> i32 {
    chordsheet::clamp_transpose(semitones)
}
