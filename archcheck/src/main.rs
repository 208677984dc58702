mod check;
mod utils;
mod worker;

use crate::check::{FileReport, Policy, Verdict};
use crate::utils::{collect_paths, default_jobs};
use crate::worker::{WorkerConfig, start_dispatcher, start_workers};
use anyhow::{Context, Result, bail};
use archsig::{DEFAULT_WINDOW, FormatTag, MAX_WINDOW, VERSION};
use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser};
use crossbeam_channel::{bounded, unbounded};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const GIT_HASH: &str = env!("GIT_HASH");
const MAX_JOBS: u64 = 256;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Validate uploaded files by archive signature and extension.",
    long_about = "archcheck reads the leading bytes of each file, identifies its archive format from magic bytes and checks it against the MIME type implied by the file name.\nDirectories are expanded one level.",
    after_help = "EXAMPLES:\n  \
                  archcheck incoming/\n  \
                  archcheck --allow zip --allow 7z upload1.zip upload2.7z\n  \
                  archcheck --jobs 2 --window 64 /srv/uploads"
)]
struct Args {
    /// Files or directories to check.
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,

    /// Number of worker threads (defaults to available parallelism).
    #[arg(
        long,
        value_name = "N",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_JOBS)
    )]
    jobs: Option<usize>,

    /// Number of leading bytes read from each file.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_WINDOW,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WINDOW)
    )]
    window: usize,

    /// Accepted format (zip, rar, 7z, tar, gz, bz2). Repeatable; default is all.
    #[arg(long = "allow", value_name = "FORMAT")]
    allow: Vec<FormatTag>,

    /// Stop dispatching after the first file that is not accepted.
    #[arg(long)]
    fail_fast: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
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

#[derive(Debug, Default)]
struct Totals {
    accepted: usize,
    mismatch: usize,
    rejected: usize,
    errors: usize,
}

impl Totals {
    fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Accepted => self.accepted += 1,
            Verdict::Mismatch => self.mismatch += 1,
            Verdict::Rejected => self.rejected += 1,
            Verdict::Error => self.errors += 1,
        }
    }

    fn failures(&self) -> usize {
        self.mismatch + self.rejected + self.errors
    }
}

fn main() -> Result<()> {
    // Banner goes out before argument parsing so it shows on usage errors too
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    println!("========================");
    println!("archcheck v{} / {}", VERSION, GIT_HASH);

    let args = Args::parse();
    init_logging(args.verbose);

    let policy = Policy::new(&args.allow);
    let jobs = args.jobs.unwrap_or_else(default_jobs);
    let window = args.window;
    let paths = collect_paths(&args.paths)?;

    println!("Timestamp: {}", timestamp);
    println!("Files: {}", paths.len());
    println!("Allowed: {}", policy.describe());
    println!("Workers: {} / window {} bytes", jobs, window);
    println!("========================");
    println!();

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("failed to install Ctrl-C handler")?;
    }

    // At most two queued jobs per worker
    let total = paths.len();
    let (job_tx, job_rx) = bounded(jobs.saturating_mul(2));
    let (report_tx, report_rx) = unbounded();

    let dispatcher = start_dispatcher(paths, job_tx, Arc::clone(&stop));
    let workers = start_workers(
        jobs,
        job_rx,
        report_tx,
        WorkerConfig {
            window,
            policy: Arc::new(policy),
        },
    )
    .context("failed to start worker threads")?;

    let mut reports: Vec<FileReport> = Vec::with_capacity(total);
    for report in report_rx {
        if report.verdict != Verdict::Accepted {
            warn!(path = %report.path.display(), verdict = %report.verdict, "{}", report.detail);
            if args.fail_fast {
                stop.store(true, Ordering::SeqCst);
            }
        }
        reports.push(report);
    }

    for handle in workers {
        if handle.join().is_err() {
            bail!("worker thread panicked");
        }
    }
    let queued = match dispatcher.join() {
        Ok(queued) => queued,
        Err(_) => bail!("dispatcher thread panicked"),
    };
    info!(queued, total, "all workers finished");

    // Workers finish out of order; print in command-line order
    reports.sort_by_key(|report| report.index);
    let mut totals = Totals::default();
    for report in &reports {
        totals.add(report.verdict);
        println!("{}", report.line());
    }

    println!();
    println!(
        "Checked {} of {} files: {} accepted, {} mismatch, {} rejected, {} errors.",
        reports.len(),
        total,
        totals.accepted,
        totals.mismatch,
        totals.rejected,
        totals.errors
    );

    if queued < total {
        println!("Stopped early; {} files were not checked.", total - queued);
    }

    if totals.failures() > 0 {
        bail!("{} of {} files failed validation", totals.failures(), reports.len());
    }

    Ok(())
}
