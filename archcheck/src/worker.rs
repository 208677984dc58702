use crate::check::{FileReport, Policy, check_window};
use crate::utils::{read_window, upload_name};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, trace};

pub struct Job {
    pub index: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub window: usize,
    pub policy: Arc<Policy>,
}

/// Feed jobs until the list is exhausted or `stop` is raised. Dropping the
/// sender on return closes the queue for the workers.
pub fn start_dispatcher(
    paths: Vec<PathBuf>,
    sender: Sender<Job>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<usize> {
    thread::spawn(move || {
        let mut queued = 0;
        for (index, path) in paths.into_iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                debug!(queued, "stop requested, dispatcher exiting");
                break;
            }
            if sender.send(Job { index, path }).is_err() {
                break;
            }
            queued += 1;
        }
        queued
    })
}

pub fn start_workers(
    jobs: usize,
    receiver: Receiver<Job>,
    sender: Sender<FileReport>,
    config: WorkerConfig,
) -> io::Result<Vec<thread::JoinHandle<()>>> {
    (0..jobs.max(1))
        .map(|worker| {
            let receiver = receiver.clone();
            let sender = sender.clone();
            let config = config.clone();
            thread::Builder::new()
                .name(format!("archcheck-{worker}"))
                .spawn(move || run_worker(receiver, sender, config))
        })
        .collect()
}

fn run_worker(receiver: Receiver<Job>, sender: Sender<FileReport>, config: WorkerConfig) {
    for job in receiver {
        let report = check_job(job, &config);
        trace!(path = %report.path.display(), verdict = %report.verdict, "checked");
        if sender.send(report).is_err() {
            break;
        }
    }
}

pub fn check_job(job: Job, config: &WorkerConfig) -> FileReport {
    let Job { index, path } = job;
    match read_window(&path, config.window) {
        Ok(window) => {
            let name = upload_name(&path);
            check_window(index, path, &window, name.as_deref(), &config.policy)
        }
        Err(err) => FileReport::error(index, path, err.to_string()),
    }
}
