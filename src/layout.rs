//! # Mode Layout
//!
//! Turns parsed lines into display units for one display mode and column
//! width.
//!
//! ## Modes
//! - `Lyrics` - the lyric alone; chords are dropped
//! - `Chords` - a chord line alone, each chord starting at its lyric offset
//! - `Inline` - lyric with `[Chord]` markers reinserted
//! - `Over` - chord line above lyric line, sliced into windows of the column
//!   width so long lines wrap without losing vertical alignment
//!
//! ## Preamble
//! If any line is exactly `||` (after trimming), every line before the first
//! such line is a preamble: it is shown inline with bare chord names whatever
//! the mode, and the `||` line itself is dropped. Without a `||` line every
//! line follows the selected mode.
//!
//! ## Chord Lines
//! A chord is written at its lyric offset, padded with spaces on the left.
//! When the previous chord already reaches past that offset, the next chord
//! follows it directly. Chords with empty names take no space.
//!
//! ## Example
//! ```rust
//! use chordsheet::{layout, parse_line, DisplayMode, DisplayUnit};
//!
//! let lines = vec![parse_line("Amaz[C]ing [G]grace")];
//! let units = layout(&lines, DisplayMode::Over, None);
//! match &units[0] {
//!     DisplayUnit::Segment(seg) => {
//!         assert_eq!(seg.chord_line, "    C   G");
//!         assert_eq!(seg.lyric_line, "Amazing grace");
//!     }
//!     other => panic!("expected a segment, got {:?}", other),
//! }
//! ```

use crate::ast::{
    ChordAnchor, DisplayMode, DisplayUnit, InlineSpan, InlineStyle, LayoutSegment, LineStyle,
    ParsedLine,
};

/// The line that ends the preamble.
pub const PREAMBLE_SENTINEL: &str = "||";

fn is_sentinel(line: &ParsedLine) -> bool {
    line.chords.is_empty() && line.lyric.trim() == PREAMBLE_SENTINEL
}

/// Index of the first `||` line, if the document has one.
pub fn preamble_end(lines: &[ParsedLine]) -> Option<usize> {
    lines.iter().position(is_sentinel)
}

/// Build the chord line for one parsed line.
///
/// Returns the line and one anchor per visible chord.
pub fn chord_line(line: &ParsedLine, line_index: usize) -> (String, Vec<ChordAnchor>) {
    let mut out = String::new();
    let mut width = 0usize;
    let mut anchors = Vec::with_capacity(line.chords.len());

    for (index, chord) in line.chords.iter().enumerate() {
        if chord.name.is_empty() {
            continue;
        }
        if width < chord.offset {
            out.extend(std::iter::repeat(' ').take(chord.offset - width));
            width = chord.offset;
        }
        anchors.push(ChordAnchor {
            line: line_index,
            index,
            column: width,
        });
        out.push_str(&chord.name);
        width += chord.name.chars().count();
    }

    (out, anchors)
}

/// Accumulates inline spans while tracking the rendered column.
struct InlineBuilder {
    spans: Vec<InlineSpan>,
    text: String,
    column: usize,
    line_index: usize,
    style: InlineStyle,
}

impl InlineBuilder {
    fn new(line_index: usize, style: InlineStyle) -> Self {
        Self {
            spans: Vec::new(),
            text: String::new(),
            column: 0,
            line_index,
            style,
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.spans.push(InlineSpan::Text {
                text: std::mem::take(&mut self.text),
            });
        }
    }

    fn push_char(&mut self, c: char) {
        self.text.push(c);
        self.column += 1;
    }

    fn push_chord(&mut self, index: usize, name: &str) {
        self.flush_text();
        let brackets = self.style == InlineStyle::Bracketed;
        if brackets {
            self.column += 1;
        }
        self.spans.push(InlineSpan::Chord {
            name: name.to_string(),
            anchor: ChordAnchor {
                line: self.line_index,
                index,
                column: self.column,
            },
        });
        self.column += name.chars().count();
        if brackets {
            self.column += 1;
        }
    }

    fn finish(mut self) -> Vec<InlineSpan> {
        self.flush_text();
        self.spans
    }
}

/// Split a lyric into text and chord spans for inline display.
fn inline_spans(line: &ParsedLine, line_index: usize, style: InlineStyle) -> Vec<InlineSpan> {
    let mut builder = InlineBuilder::new(line_index, style);
    let mut chords = line
        .chords
        .iter()
        .enumerate()
        .filter(|(_, chord)| !chord.name.is_empty())
        .peekable();

    for (i, c) in line.lyric.chars().enumerate() {
        while let Some((index, chord)) = chords.next_if(|(_, chord)| chord.offset <= i) {
            builder.push_chord(index, &chord.name);
        }
        builder.push_char(c);
    }
    for (index, chord) in chords {
        builder.push_chord(index, &chord.name);
    }
    builder.finish()
}

fn char_window(chars: &[char], start: usize, width: usize) -> String {
    if start >= chars.len() {
        return String::new();
    }
    let end = (start + width).min(chars.len());
    chars[start..end].iter().collect()
}

/// Slice a chord/lyric pair into windows of `width` columns.
///
/// `None` or `Some(0)` means unbounded and yields a single segment.
pub fn wrap_segments(
    chord_line: &str,
    lyric: &str,
    anchors: &[ChordAnchor],
    width: Option<usize>,
) -> Vec<LayoutSegment> {
    let width = match width {
        Some(w) if w > 0 => w,
        _ => {
            return vec![LayoutSegment {
                chord_line: chord_line.to_string(),
                lyric_line: lyric.to_string(),
                anchors: anchors.to_vec(),
            }]
        }
    };

    let chord_chars: Vec<char> = chord_line.chars().collect();
    let lyric_chars: Vec<char> = lyric.chars().collect();
    let total = chord_chars.len().max(lyric_chars.len());
    let count = total.div_ceil(width).max(1);

    (0..count)
        .map(|i| {
            let start = i * width;
            LayoutSegment {
                chord_line: char_window(&chord_chars, start, width),
                lyric_line: char_window(&lyric_chars, start, width),
                anchors: anchors
                    .iter()
                    .filter(|a| a.column >= start && a.column < start + width)
                    .map(|a| ChordAnchor {
                        column: a.column - start,
                        ..a.clone()
                    })
                    .collect(),
            }
        })
        .collect()
}

fn layout_line(
    line: &ParsedLine,
    line_index: usize,
    mode: DisplayMode,
    width: Option<usize>,
    out: &mut Vec<DisplayUnit>,
) {
    match mode {
        DisplayMode::Lyrics => out.push(DisplayUnit::lyric(line.lyric.clone())),
        DisplayMode::Chords => {
            let (text, anchors) = chord_line(line, line_index);
            out.push(DisplayUnit::Text {
                text,
                style: LineStyle::Chords,
                anchors,
            });
        }
        DisplayMode::Inline => out.push(DisplayUnit::Inline {
            spans: inline_spans(line, line_index, InlineStyle::Bracketed),
            style: InlineStyle::Bracketed,
        }),
        DisplayMode::Over => {
            if !line.has_visible_chords() {
                out.push(DisplayUnit::lyric(line.lyric.clone()));
            } else {
                let (chords, anchors) = chord_line(line, line_index);
                out.extend(
                    wrap_segments(&chords, &line.lyric, &anchors, width)
                        .into_iter()
                        .map(DisplayUnit::Segment),
                );
            }
        }
    }
}

/// Lay out parsed lines for a display mode and column width.
///
/// `width` is the number of fixed-width columns available; `None` or
/// `Some(0)` disables wrapping.
pub fn layout(lines: &[ParsedLine], mode: DisplayMode, width: Option<usize>) -> Vec<DisplayUnit> {
    let preamble = preamble_end(lines);
    let mut out = Vec::with_capacity(lines.len());

    if let Some(end) = preamble {
        log::debug!("preamble covers {} lines", end);
    }

    for (index, line) in lines.iter().enumerate() {
        match preamble {
            Some(end) if index < end => out.push(DisplayUnit::Inline {
                spans: inline_spans(line, index, InlineStyle::Preamble),
                style: InlineStyle::Preamble,
            }),
            Some(end) if index == end => {}
            _ => layout_line(line, index, mode, width, &mut out),
        }
    }

    log::debug!(
        "laid out {} lines as {} units in {} mode",
        lines.len(),
        out.len(),
        mode
    );
    out
}

/// Flatten display units into printable lines.
pub fn render_text(units: &[DisplayUnit]) -> Vec<String> {
    units
        .iter()
        .flat_map(|unit| match unit {
            DisplayUnit::Segment(seg) => vec![seg.chord_line.clone(), seg.lyric_line.clone()],
            other => vec![other.to_text()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ChordToken;
    use crate::parser::{parse_line, parse_song};
    use pretty_assertions::assert_eq;

    fn texts(units: &[DisplayUnit]) -> Vec<String> {
        render_text(units)
    }

    #[test]
    fn test_chord_line_offsets() {
        let (line, anchors) = chord_line(&parse_line("Amaz[C]ing [G]grace"), 0);
        assert_eq!(line, "    C   G");
        assert_eq!(anchors.iter().map(|a| a.column).collect::<Vec<_>>(), vec![4, 8]);
    }

    #[test]
    fn test_chord_line_collisions_concatenate() {
        let (line, anchors) = chord_line(&parse_line("[Cmaj7]a[G]b"), 3);
        assert_eq!(line, "Cmaj7G");
        assert_eq!(
            anchors,
            vec![
                ChordAnchor { line: 3, index: 0, column: 0 },
                ChordAnchor { line: 3, index: 1, column: 5 },
            ]
        );
    }

    #[test]
    fn test_chord_line_skips_empty_names() {
        let (line, anchors) = chord_line(&parse_line("a[]b[D]c"), 0);
        assert_eq!(line, "  D");
        assert_eq!(anchors, vec![ChordAnchor { line: 0, index: 1, column: 2 }]);
    }

    #[test]
    fn test_lyrics_mode() {
        let lines = vec![parse_line("Amaz[C]ing [G]grace")];
        assert_eq!(texts(&layout(&lines, DisplayMode::Lyrics, Some(5))), vec!["Amazing grace"]);
    }

    #[test]
    fn test_chords_mode() {
        let lines = vec![parse_line("Amaz[C]ing [G]grace"), parse_line("no chords")];
        assert_eq!(
            texts(&layout(&lines, DisplayMode::Chords, None)),
            vec!["    C   G", ""]
        );
    }

    #[test]
    fn test_inline_mode_reproduces_markers() {
        let raw = "Amaz[C]ing [G]grace[D]";
        let units = layout(&[parse_line(raw)], DisplayMode::Inline, Some(4));
        assert_eq!(texts(&units), vec![raw]);
    }

    #[test]
    fn test_inline_spans_and_anchor_columns() {
        let units = layout(&[parse_line("ab[C]cd[]e")], DisplayMode::Inline, None);
        let DisplayUnit::Inline { spans, style } = &units[0] else {
            panic!("expected inline unit");
        };
        assert_eq!(*style, InlineStyle::Bracketed);
        assert_eq!(
            spans,
            &vec![
                InlineSpan::Text { text: "ab".to_string() },
                InlineSpan::Chord {
                    name: "C".to_string(),
                    anchor: ChordAnchor { line: 0, index: 0, column: 3 },
                },
                InlineSpan::Text { text: "cde".to_string() },
            ]
        );
    }

    #[test]
    fn test_over_mode_unbounded() {
        let units = layout(&[parse_line("Amaz[C]ing [G]grace")], DisplayMode::Over, None);
        assert_eq!(units.len(), 1);
        assert_eq!(texts(&units), vec!["    C   G", "Amazing grace"]);
    }

    #[test]
    fn test_over_mode_without_chords_is_lyric_only() {
        let lines = vec![
            parse_line("plain words"),
            parse_line("[]empty"),
            parse_line("[ ]blank"),
        ];
        assert_eq!(
            layout(&lines, DisplayMode::Over, Some(4)),
            vec![
                DisplayUnit::lyric("plain words"),
                DisplayUnit::lyric("empty"),
                DisplayUnit::lyric("blank"),
            ]
        );
    }

    #[test]
    fn test_over_mode_wraps_to_width() {
        let units = layout(&[parse_line("Amaz[C]ing [G]grace")], DisplayMode::Over, Some(5));
        assert_eq!(
            texts(&units),
            vec!["    C", "Amazi", "   G", "ng gr", "", "ace"]
        );
    }

    #[test]
    fn test_wrap_keeps_anchors_in_their_window() {
        let (chords, anchors) = chord_line(&parse_line("Amaz[C]ing [G]grace"), 7);
        let segments = wrap_segments(&chords, "Amazing grace", &anchors, Some(5));
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].anchors, vec![ChordAnchor { line: 7, index: 0, column: 4 }]);
        assert_eq!(segments[1].anchors, vec![ChordAnchor { line: 7, index: 1, column: 3 }]);
        assert!(segments[2].anchors.is_empty());
    }

    #[test]
    fn test_wrap_zero_width_is_unbounded() {
        let segments = wrap_segments("C", "long lyric line", &[], Some(0));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].lyric_line, "long lyric line");
    }

    #[test]
    fn test_chord_line_longer_than_lyric() {
        let line = ParsedLine {
            lyric: "hi".to_string(),
            chords: vec![ChordToken::new("Cmaj7", 0), ChordToken::new("G7sus4", 2)],
        };
        let units = layout(&[line], DisplayMode::Over, Some(4));
        assert_eq!(texts(&units), vec!["Cmaj", "hi", "7G7s", "", "us4", ""]);
    }

    #[test]
    fn test_preamble_ignores_mode() {
        let lines = parse_song("[C]Intro\n||\n[G]Verse");
        for mode in DisplayMode::ALL {
            let units = layout(&lines, mode, Some(3));
            assert_eq!(units[0].to_text(), "CIntro", "mode {}", mode);
            assert!(matches!(
                units[0],
                DisplayUnit::Inline { style: InlineStyle::Preamble, .. }
            ));
        }

        assert_eq!(texts(&layout(&lines, DisplayMode::Lyrics, None)), vec!["CIntro", "Verse"]);
        assert_eq!(texts(&layout(&lines, DisplayMode::Inline, None)), vec!["CIntro", "[G]Verse"]);
        assert_eq!(
            texts(&layout(&lines, DisplayMode::Over, None)),
            vec!["CIntro", "G", "Verse"]
        );
    }

    #[test]
    fn test_only_first_sentinel_is_consumed() {
        let lines = parse_song("one\n ||\ntwo\n||\nthree");
        assert_eq!(preamble_end(&lines), Some(1));
        assert_eq!(
            texts(&layout(&lines, DisplayMode::Lyrics, None)),
            vec!["one", "two", "||", "three"]
        );
    }

    #[test]
    fn test_no_sentinel_means_no_preamble() {
        let lines = parse_song("[C]a\n|| not alone\n[C]||");
        assert_eq!(preamble_end(&lines), None);
        assert_eq!(
            texts(&layout(&lines, DisplayMode::Lyrics, None)),
            vec!["a", "|| not alone", "||"]
        );
    }

    #[test]
    fn test_sentinel_on_first_line() {
        let lines = parse_song("||\n[C]go");
        assert_eq!(texts(&layout(&lines, DisplayMode::Inline, None)), vec!["[C]go"]);
    }
}
