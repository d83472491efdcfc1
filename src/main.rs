use anyhow::{Context, Result};
use chordsheet::{
    extract_metadata, render_record, transpose_song, transpose_token, DisplayMode, RenderConfig,
    SongRecord,
};
use clap::{Parser, Subcommand};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Chord chart renderer and transposer
#[derive(Parser)]
#[command(name = "chordsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a chart for display
    Render {
        /// Chart text file, or a .yaml/.yml song record
        input: PathBuf,

        /// YAML render configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Display mode (inline, over, lyrics, chords)
        #[arg(short, long)]
        mode: Option<DisplayMode>,

        /// Semitones to transpose by (clamped to -11..=11)
        #[arg(short, long, allow_hyphen_values = true)]
        transpose: Option<i32>,

        /// Column width to wrap over-mode lines at
        #[arg(short, long)]
        width: Option<usize>,

        /// Output display units as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print directives and the declared key
    Meta {
        /// Chart text file, or a .yaml/.yml song record
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a chart transposed by some semitones
    Transpose {
        /// Chart text file
        input: PathBuf,

        /// Semitones to transpose by
        #[arg(allow_hyphen_values = true)]
        semitones: i32,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transpose a single chord or key name
    Key {
        token: String,

        #[arg(allow_hyphen_values = true)]
        semitones: i32,
    },
}

/// Writes log records to stderr.
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn load_song(path: &Path) -> Result<SongRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Error reading file '{}'", path.display()))?;
    if is_yaml(path) {
        SongRecord::from_yaml(&content)
            .with_context(|| format!("Error loading song record '{}'", path.display()))
    } else {
        Ok(SongRecord::from_body(content))
    }
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Error reading config '{}'", path.display()))?;
    Ok(RenderConfig::from_yaml(&content)?)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Render {
            input,
            config,
            mode,
            transpose,
            width,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if let Some(transpose) = transpose {
                config.transpose = transpose;
            }
            if width.is_some() {
                config.width = width;
            }

            let song = load_song(&input)?;
            let rendered = render_record(&song, &config.to_options());

            if json {
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            } else {
                if let Some(title) = song.title.as_deref().or(rendered.metadata.title()) {
                    println!("{}", title);
                }
                println!("{}", rendered.key_header());
                println!();
                for line in rendered.text_lines() {
                    println!("{}", line);
                }
            }
        }
        Commands::Meta { input, json } => {
            let song = load_song(&input)?;
            let metadata = extract_metadata(&song.body).with_explicit_key(song.key.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                for (name, value) in &metadata.directives {
                    println!("{}: {}", name, value);
                }
                println!(
                    "declared key: {}",
                    metadata.declared_key.as_deref().unwrap_or("—")
                );
            }
        }
        Commands::Transpose {
            input,
            semitones,
            output,
        } => {
            let song = load_song(&input)?;
            let transposed = transpose_song(&song.body, semitones);
            match output {
                Some(path) => {
                    fs::write(&path, &transposed)
                        .with_context(|| format!("Error writing to '{}'", path.display()))?;
                    eprintln!("Wrote transposed chart to {}", path.display());
                }
                None => print!("{}", transposed),
            }
        }
        Commands::Key { token, semitones } => {
            println!("{}", transpose_token(&token, semitones));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
