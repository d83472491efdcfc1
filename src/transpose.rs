//! Chord and key transposition by semitones.
//!
//! The root of a chord is shifted and re-spelled with the accidental style it
//! was written in; the quality/extension suffix is kept verbatim. Slash chords
//! transpose each side on its own.

use crate::metadata::{parse_directive, parse_plain_key_line};

const SHARP_SCALE: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_SCALE: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Starts of suffixes that can follow a chord root.
/// Longer entries first where they share a prefix with shorter ones.
const QUALITY_PREFIXES: [&str; 18] = [
    "maj", "min", "m", "M", "dim", "aug", "sus", "add", "alt", "no", "+", "-", "(", "°", "ø",
    "^", "Δ", "*",
];

/// Accidental style of a written root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spelling {
    Sharp,
    Flat,
    Natural,
}

/// A recognized root at the start of a token
struct Root {
    pitch_class: u8,
    spelling: Spelling,
    len: usize,
}

/// Note name to pitch class (0 = C)
fn natural_pitch_class(letter: char) -> Option<u8> {
    match letter {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Longest note-name prefix of `token`.
///
/// `Cb`, `Fb`, `E#` and `B#` are not note names here, so `Cb` reads as root
/// `C` followed by `b`, which then fails the quality check.
fn match_root(token: &str) -> Option<Root> {
    let mut chars = token.chars();
    let letter = chars.next()?;
    let base = natural_pitch_class(letter)?;

    let (pitch_class, spelling, len) = match chars.next() {
        Some('#') if !matches!(letter, 'E' | 'B') => ((base + 1) % 12, Spelling::Sharp, 2),
        Some('b') if !matches!(letter, 'C' | 'F') => ((base + 11) % 12, Spelling::Flat, 2),
        _ => (base, Spelling::Natural, 1),
    };

    Some(Root {
        pitch_class,
        spelling,
        len,
    })
}

/// Whether `suffix` can follow a chord root.
fn is_chord_suffix(suffix: &str) -> bool {
    match suffix.chars().next() {
        None => true,
        Some(c) if c.is_ascii_digit() => true,
        Some(_) => QUALITY_PREFIXES.iter().any(|q| suffix.starts_with(q)),
    }
}

/// Recognized root of a single (non-slash) chord part.
fn chord_root(part: &str) -> Option<Root> {
    let root = match_root(part)?;
    if is_chord_suffix(&part[root.len..]) {
        Some(root)
    } else {
        None
    }
}

fn spell(pitch_class: u8, spelling: Spelling) -> &'static str {
    let idx = usize::from(pitch_class % 12);
    match spelling {
        Spelling::Flat => FLAT_SCALE[idx],
        Spelling::Sharp | Spelling::Natural => SHARP_SCALE[idx],
    }
}

fn shift(pitch_class: u8, semitones: i32) -> u8 {
    // rem_euclid keeps the result in 0..12 for any offset
    (i32::from(pitch_class) + semitones.rem_euclid(12)).rem_euclid(12) as u8
}

/// Transpose one side of a slash chord. Unrecognized parts pass through.
fn transpose_part(part: &str, semitones: i32) -> String {
    match chord_root(part) {
        Some(root) => {
            let new_root = spell(shift(root.pitch_class, semitones), root.spelling);
            format!("{}{}", new_root, &part[root.len..])
        }
        None => {
            if !part.is_empty() {
                log::trace!("leaving unrecognized chord part {:?} as written", part);
            }
            part.to_string()
        }
    }
}

/// Transpose a chord or key token by `semitones`.
///
/// Any integer offset is accepted; it is reduced modulo 12. Tokens without a
/// recognized root (`N.C.`, `Capo 2`, `Chorus`) come back unchanged.
///
/// # Example
/// ```
/// use chordsheet::transpose_token;
///
/// assert_eq!(transpose_token("C/E", 2), "D/F#");
/// assert_eq!(transpose_token("Bbm7", 2), "Cm7");
/// assert_eq!(transpose_token("Eb", 1), "E");
/// assert_eq!(transpose_token("Capo 2", 5), "Capo 2");
/// ```
pub fn transpose_token(token: &str, semitones: i32) -> String {
    match token.split_once('/') {
        Some((upper, bass)) => format!(
            "{}/{}",
            transpose_part(upper, semitones),
            transpose_part(bass, semitones)
        ),
        None => transpose_part(token, semitones),
    }
}

/// Pitch class (0 = C .. 11 = B) of a token's root, if it has one.
///
/// For slash chords this is the upper chord's root.
pub fn pitch_class(token: &str) -> Option<u8> {
    let upper = token.split_once('/').map_or(token, |(upper, _)| upper);
    chord_root(upper).map(|root| root.pitch_class)
}

/// Rewrite every `[Chord]` marker in one line.
fn transpose_markers(line: &str, semitones: i32) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open + 1..].find(']') else {
            break;
        };
        out.push_str(&rest[..=open]);
        out.push_str(&transpose_token(&rest[open + 1..open + 1 + close], semitones));
        out.push(']');
        rest = &rest[open + 1 + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Transpose a key line whose value starts at byte `start` of `line`.
///
/// A value that opens with a complete `[...]` marker is an ordinary chord
/// marker. Otherwise the bare key token (up to whitespace, a bracket or a
/// closing brace) is rewritten. Every marker on the line is transposed.
fn transpose_key_value(line: &str, start: usize, semitones: i32) -> String {
    let value = &line[start..];
    let value = value.trim_start();
    if value.starts_with('[') && value.contains(']') {
        return transpose_markers(line, semitones);
    }

    let unopened = value.trim_start_matches(|c: char| matches!(c, '[' | '{' | '('));
    let token_len = unopened
        .find(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '}' | ')'))
        .unwrap_or(unopened.len());
    if token_len == 0 {
        return transpose_markers(line, semitones);
    }
    let token_start = line.len() - unopened.len();
    let token_end = token_start + token_len;

    format!(
        "{}{}{}",
        transpose_markers(&line[..token_start], semitones),
        transpose_token(&line[token_start..token_end], semitones),
        transpose_markers(&line[token_end..], semitones)
    )
}

fn transpose_line(line: &str, semitones: i32) -> String {
    if let Some(directive) = parse_directive(line) {
        if directive.name == "key" {
            return transpose_key_value(line, directive.value_start, semitones);
        }
        return transpose_markers(line, semitones);
    }
    if let Some((_, start)) = parse_plain_key_line(line) {
        return transpose_key_value(line, start, semitones);
    }
    transpose_markers(line, semitones)
}

/// Transpose a whole song: every `[Chord]` marker, every `{key:}` directive
/// and every plain `key:` line. All other text is left byte-for-byte intact.
///
/// # Example
/// ```
/// use chordsheet::transpose_song;
///
/// let song = "{key: G}\nAmaz[G]ing [D/F#]grace";
/// assert_eq!(transpose_song(song, 2), "{key: A}\nAmaz[A]ing [E/G#]grace");
/// ```
pub fn transpose_song(song: &str, semitones: i32) -> String {
    if semitones.rem_euclid(12) == 0 {
        return song.to_string();
    }
    log::debug!("transposing song by {} semitones", semitones);

    song.split('\n')
        .map(|line| transpose_line(line, semitones))
        .collect::<Vec<_>>()
        .join("\n")
}
