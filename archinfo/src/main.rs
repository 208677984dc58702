mod analyzer;
mod output;

use anyhow::{Context, Result};
use archsig::{DEFAULT_WINDOW, MAX_WINDOW, VERSION};
use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, ArgGroup, Parser};
use output::OutputOptions;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const GIT_HASH: &str = env!("GIT_HASH");

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Report the archive format of a file from its leading bytes."
)]
#[command(group(
    ArgGroup::new("hex_visibility")
        .args(["show_hex", "suppress_hex"])
        .multiple(false),
))]
struct Cli {
    /// Path to the file to inspect (use '-' for stdin)
    #[arg(value_name = "INPUT", default_value = "-")]
    input: String,

    /// Filename used for MIME resolution (defaults to the input's file name)
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Number of leading bytes to inspect
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_WINDOW,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WINDOW)
    )]
    window: usize,

    /// Show a hex/ASCII preview of the leading bytes
    #[arg(long)]
    show_hex: bool,
    /// Hide the hex preview (default)
    #[arg(long)]
    suppress_hex: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            show_hex: self.show_hex && !self.suppress_hex,
        }
    }

    fn mime_name(&self) -> Option<String> {
        if self.name.is_some() {
            return self.name.clone();
        }
        if self.input == "-" {
            return None;
        }
        Path::new(&self.input)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    // Banner goes out before argument parsing so it shows on usage errors too
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    println!("========================");
    println!("archinfo v{} / {}", VERSION, GIT_HASH);
    println!("Timestamp: {}", timestamp);

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input_path = if cli.input == "-" {
        "stdin".to_string()
    } else {
        std::fs::canonicalize(&cli.input)
            .unwrap_or_else(|_| Path::new(&cli.input).to_path_buf())
            .display()
            .to_string()
    };

    println!("Input: {}", input_path);
    println!("========================");
    println!();

    // Only the leading window is ever read, even for stdin
    let window = cli.window;
    let data = read_window(&cli.input, window).context("failed to read input data")?;
    info!(bytes = data.len(), window, "read leading window");

    let name = cli.mime_name();
    debug!(name = ?name, "resolving MIME by name");

    let analysis = analyzer::analyze_window(&data, name.as_deref());
    let report = output::format_analysis(&analysis, &cli.output_options());

    println!("{report}");

    Ok(())
}

fn read_window(path: &str, window: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if path == "-" {
        io::stdin()
            .lock()
            .take(window as u64)
            .read_to_end(&mut buffer)
            .context("stdin read failed")?;
    } else {
        File::open(path)
            .with_context(|| format!("failed to open file {path}"))?
            .take(window as u64)
            .read_to_end(&mut buffer)
            .with_context(|| format!("failed to read file {path}"))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_at_most_the_window() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x42; 2048]).unwrap();
        let path = file.path().to_str().unwrap();

        assert_eq!(read_window(path, 512).unwrap().len(), 512);
        assert_eq!(read_window(path, 4096).unwrap().len(), 2048);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_window("/nonexistent/archinfo-test.bin", 16).unwrap_err();
        assert!(err.to_string().contains("failed to open file"));
    }

    #[test]
    fn mime_name_defaults_to_file_name() {
        let cli = Cli::parse_from(["archinfo", "/tmp/uploads/backup.tar.gz"]);
        assert_eq!(cli.mime_name().as_deref(), Some("backup.tar.gz"));

        let cli = Cli::parse_from(["archinfo", "-"]);
        assert_eq!(cli.mime_name(), None);

        let cli = Cli::parse_from(["archinfo", "--name", "x.zip", "-"]);
        assert_eq!(cli.mime_name().as_deref(), Some("x.zip"));
    }

    #[test]
    fn window_must_be_in_range() {
        let cli = Cli::parse_from(["archinfo", "--window", "1", "-"]);
        assert_eq!(cli.window, 1);
        let cli = Cli::parse_from(["archinfo", "--window", "1048576", "-"]);
        assert_eq!(cli.window, 1 << 20);

        for value in ["0", "1048577", "18446744073709551615", "-3"] {
            assert!(
                Cli::try_parse_from(["archinfo", "--window", value, "-"]).is_err(),
                "--window {value} should be rejected"
            );
        }
    }

    #[test]
    fn hex_toggles_are_exclusive() {
        assert!(Cli::try_parse_from(["archinfo", "--show-hex", "--suppress-hex"]).is_err());
        let cli = Cli::parse_from(["archinfo", "--show-hex"]);
        assert!(cli.output_options().show_hex);
        let cli = Cli::parse_from(["archinfo"]);
        assert!(!cli.output_options().show_hex);
    }
}
