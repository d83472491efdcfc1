//! # Error Types
//!
//! The chart engine itself never fails: malformed song text degrades to
//! literal text, unknown chord roots pass through, and a missing key is simply
//! `None`. Errors only exist at the boundaries where outside input is decoded
//! into engine values.
//!
//! ## Error Types
//! - `InvalidMode` - an unknown display mode name
//! - `Config` - a render configuration file that is not valid YAML
//! - `SongRecord` - a song record file that is not valid YAML
//!
//! ## Usage
//! ```rust
//! use chordsheet::{ChartError, DisplayMode};
//!
//! match "sideways".parse::<DisplayMode>() {
//!     Ok(mode) => println!("rendering in {} mode", mode),
//!     Err(ChartError::InvalidMode(name)) => eprintln!("no such mode: {}", name),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Unknown display mode name.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChartError;
    /// let err = ChartError::InvalidMode("sideways".to_string());
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid display mode 'sideways' (expected inline, over, lyrics or chords)"
    /// );
    /// ```
    #[error("Invalid display mode '{0}' (expected inline, over, lyrics or chords)")]
    InvalidMode(String),

    /// Render configuration could not be decoded.
    #[error("Invalid render configuration: {0}")]
    Config(String),

    /// Song record could not be decoded.
    #[error("Invalid song record: {0}")]
    SongRecord(String),
}
