//! # Annotation Parser
//!
//! Splits song text into display lines and each line into a lyric plus the
//! chords anchored in it.
//!
//! ## Marker Syntax
//! - `[Name]` anchors chord `Name` above the lyric character that follows it
//! - A marker ends at the first `]` after its `[`; brackets do not nest
//! - `[]` yields a chord with an empty name
//! - An unterminated `[` is literal text through the end of the line
//!
//! Parsing never fails. Anything that is not a well-formed marker is lyric.
//!
//! ## Example
//! ```rust
//! use chordsheet::parse_line;
//!
//! let line = parse_line("Amaz[C]ing [G]grace");
//! assert_eq!(line.lyric, "Amazing grace");
//! assert_eq!(line.chords[0].offset, 4);
//! assert_eq!(line.chords[1].offset, 8);
//! ```

use crate::ast::{ChordToken, ParsedLine};
use crate::metadata::is_directive_line;

/// Parse one raw line into its lyric and chord tokens.
pub fn parse_line(raw: &str) -> ParsedLine {
    let mut lyric = String::with_capacity(raw.len());
    let mut lyric_chars = 0usize;
    let mut chords = Vec::new();
    let mut rest = raw;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open + 1..].find(']') else {
            log::trace!("unterminated chord marker in {:?}", raw);
            break;
        };
        let text = &rest[..open];
        lyric.push_str(text);
        lyric_chars += text.chars().count();

        let name = &rest[open + 1..open + 1 + close];
        chords.push(ChordToken::new(name, lyric_chars));
        rest = &rest[open + 1 + close + 1..];
    }
    lyric.push_str(rest);

    ParsedLine { lyric, chords }
}

/// Parse every line of an already split document.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedLine> {
    lines.iter().map(|line| parse_line(line.as_ref())).collect()
}

/// Split song text into the lines that get displayed.
///
/// Lines are split on `\n` (a trailing `\r` is dropped). Lines that consist
/// only of a `{name:value}` directive are metadata and never displayed.
/// Blank lines left at the end are removed.
///
/// # Example
/// ```
/// use chordsheet::to_display_lines;
///
/// let lines = to_display_lines("{title: Hello}\n[G]Hello\nworld\n\n{key: G}\n");
/// assert_eq!(lines, vec!["[G]Hello", "world"]);
/// ```
pub fn to_display_lines(song: &str) -> Vec<String> {
    let mut lines: Vec<&str> = song
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !is_directive_line(line))
        .collect();

    while lines.last().is_some_and(|last| last.trim().is_empty()) {
        lines.pop();
    }

    lines.into_iter().map(str::to_string).collect()
}

/// Split and parse a whole song.
pub fn parse_song(song: &str) -> Vec<ParsedLine> {
    parse_lines(&to_display_lines(song))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_markers() {
        let line = parse_line("Just words here");
        assert_eq!(line, ParsedLine::plain("Just words here"));
    }

    #[test]
    fn test_markers_and_offsets() {
        let line = parse_line("[G]Amazing [D/F#]grace how [Em7]sweet");
        assert_eq!(line.lyric, "Amazing grace how sweet");
        assert_eq!(
            line.chords,
            vec![
                ChordToken::new("G", 0),
                ChordToken::new("D/F#", 8),
                ChordToken::new("Em7", 18),
            ]
        );
    }

    #[test]
    fn test_trailing_chord() {
        let line = parse_line("last word[C]");
        assert_eq!(line.lyric, "last word");
        assert_eq!(line.chords, vec![ChordToken::new("C", 9)]);
    }

    #[test]
    fn test_adjacent_markers_share_offset() {
        let line = parse_line("[C][G]x");
        assert_eq!(line.lyric, "x");
        assert_eq!(line.chords, vec![ChordToken::new("C", 0), ChordToken::new("G", 0)]);
    }

    #[test]
    fn test_empty_marker() {
        let line = parse_line("a[]b");
        assert_eq!(line.lyric, "ab");
        assert_eq!(line.chords, vec![ChordToken::new("", 1)]);
    }

    #[test]
    fn test_unterminated_marker_is_literal() {
        let line = parse_line("[C]one [two");
        assert_eq!(line.lyric, "one [two");
        assert_eq!(line.chords, vec![ChordToken::new("C", 0)]);
    }

    #[test]
    fn test_stray_closing_bracket_is_literal() {
        let line = parse_line("a] [G]b");
        assert_eq!(line.lyric, "a] b");
        assert_eq!(line.chords, vec![ChordToken::new("G", 3)]);
    }

    #[test]
    fn test_offsets_count_chars_not_bytes() {
        let line = parse_line("Café [Am]olé");
        assert_eq!(line.lyric, "Café olé");
        assert_eq!(line.chords, vec![ChordToken::new("Am", 5)]);
    }

    #[test]
    fn test_round_trip() {
        for raw in [
            "Amaz[C]ing [G]grace",
            "[C][G]",
            "a[]b[F]",
            "no chords",
            "[Capo 2]",
            "",
            "open [bracket",
        ] {
            assert_eq!(parse_line(raw).to_annotated(), raw);
        }
    }

    #[test]
    fn test_display_lines_drop_directives() {
        let song = "{title: Hymn}\n[G]Line one\r\n{comment: [C] here}\nLine two\n{key: G}\n  \n{capo: 2}";
        assert_eq!(to_display_lines(song), vec!["[G]Line one", "Line two"]);
    }

    #[test]
    fn test_display_lines_keep_text_around_braces() {
        assert_eq!(
            to_display_lines("see {title: x} here\n{soc}"),
            vec!["see {title: x} here", "{soc}"]
        );
    }

    #[test]
    fn test_display_lines_keeps_inner_blank_lines() {
        assert_eq!(to_display_lines("a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_display_lines_empty_song() {
        assert!(to_display_lines("").is_empty());
        assert!(to_display_lines("{title: Only}\n").is_empty());
    }

    #[test]
    fn test_parse_song() {
        let parsed = parse_song("[C]Hi\nthere\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].chords[0].name, "C");
        assert_eq!(parsed[1].lyric, "there");
    }
}
