//! The build dispatcher: plans jobs and runs them on a bounded worker pool.
//!
//! Concurrency is bounded by the pool size. Each worker pulls one job at a
//! time from a shared queue, so at most `jobs` commands run at once. A worker
//! whose job fails raises the cancel flag; every worker checks it before
//! taking another job, so nothing new starts after the first failure while
//! already-running jobs finish normally.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use crossdist_targets::Platform;

use crate::config::RunConfig;
use crate::error::{BuildFailure, DispatchError, Result};
use crate::job::{BuildJob, HostShell};
use crate::report::{BuiltArtifact, DispatchReport};
use crate::runner::{JobRunner, SystemRunner};

/// Jobs to run and platforms skipped, before anything executes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// One job per non-excluded platform, in catalog order.
    pub jobs: Vec<BuildJob>,
    /// Platforms matched by the exclusion filter, in catalog order.
    pub skipped: Vec<Platform>,
}

/// Result sent back from a worker thread.
enum JobOutcome {
    Built(BuiltArtifact),
    Failed(DispatchError),
}

/// Runs build jobs with at most `jobs` of them in flight.
#[derive(Debug)]
pub struct Dispatcher<R = SystemRunner> {
    runner: R,
    jobs: NonZeroUsize,
    shell: HostShell,
}

impl Dispatcher<SystemRunner> {
    /// A dispatcher running real subprocesses.
    pub fn new(jobs: NonZeroUsize) -> Self {
        Self::with_runner(SystemRunner, jobs)
    }
}

impl<R: JobRunner> Dispatcher<R> {
    /// A dispatcher running commands through `runner`.
    pub fn with_runner(runner: R, jobs: NonZeroUsize) -> Self {
        Self {
            runner,
            jobs,
            shell: HostShell::detect(),
        }
    }

    /// Override the shell used for plain-mode commands.
    pub fn with_shell(mut self, shell: HostShell) -> Self {
        self.shell = shell;
        self
    }

    /// Split `platforms` into jobs to run and platforms to skip.
    pub fn plan(&self, platforms: &[Platform], config: &RunConfig) -> Plan {
        let mut plan = Plan::default();
        for platform in platforms {
            if config.exclude.should_skip(platform) {
                log::info!(
                    "skipping {platform} (platform matched the provided regex '{}')",
                    config.exclude.pattern()
                );
                plan.skipped.push(platform.clone());
                continue;
            }
            plan.jobs.push(BuildJob::new(platform, config, &self.shell));
        }
        plan
    }

    /// Build every non-excluded platform.
    ///
    /// Returns after every started job has finished. On failure, the error
    /// of the first failed job is returned and no further jobs are started.
    pub fn dispatch(&self, platforms: &[Platform], config: &RunConfig) -> Result<DispatchReport> {
        let plan = self.plan(platforms, config);
        let mut built = self.execute(plan.jobs)?;
        built.sort_by(|a, b| a.output_path.cmp(&b.output_path));
        Ok(DispatchReport {
            built,
            skipped: plan.skipped,
        })
    }

    /// Run `jobs` on the worker pool.
    pub fn execute(&self, jobs: Vec<BuildJob>) -> Result<Vec<BuiltArtifact>> {
        let total = jobs.len();
        if total == 0 {
            return Ok(Vec::new());
        }
        let num_workers = self.jobs.get().min(total);
        log::debug!("dispatching {total} job(s) on {num_workers} worker(s)");

        let (job_tx, job_rx) = mpsc::channel::<BuildJob>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<JobOutcome>();
        for job in jobs {
            job_tx.send(job).map_err(|_| DispatchError::WorkerLost)?;
        }
        // Workers stop once the queue is drained.
        drop(job_tx);

        let job_rx = Mutex::new(job_rx);
        let cancelled = AtomicBool::new(false);
        let runner = &self.runner;
        let job_rx_ref = &job_rx;
        let cancelled_ref = &cancelled;

        thread::scope(|s| {
            for _ in 0..num_workers {
                let tx = outcome_tx.clone();
                s.spawn(move || worker_loop(runner, job_rx_ref, cancelled_ref, tx));
            }
            // The outcome channel closes when the last worker exits.
            drop(outcome_tx);

            let mut built = Vec::with_capacity(total);
            let mut first_failure = None;
            for outcome in outcome_rx {
                match outcome {
                    JobOutcome::Built(artifact) => built.push(artifact),
                    JobOutcome::Failed(err) => {
                        if first_failure.is_none() {
                            first_failure = Some(err);
                        }
                    }
                }
            }

            if let Some(err) = first_failure {
                return Err(err);
            }
            if built.len() != total {
                return Err(DispatchError::WorkerLost);
            }
            Ok(built)
        })
    }
}

fn worker_loop<R: JobRunner>(
    runner: &R,
    queue: &Mutex<Receiver<BuildJob>>,
    cancelled: &AtomicBool,
    outcomes: Sender<JobOutcome>,
) {
    loop {
        if cancelled.load(Ordering::SeqCst) {
            break;
        }
        let job = match queue.lock() {
            Ok(rx) => match rx.recv() {
                Ok(job) => job,
                Err(_) => break,
            },
            Err(_) => break,
        };

        let outcome = run_job(runner, job);
        if matches!(outcome, JobOutcome::Failed(_)) {
            cancelled.store(true, Ordering::SeqCst);
        }
        if outcomes.send(outcome).is_err() {
            break;
        }
    }
}

fn run_job<R: JobRunner>(runner: &R, job: BuildJob) -> JobOutcome {
    log::info!("building {} ({})", job.platform, job.output_path.display());
    log::debug!("{}: {}", job.platform, job.command);

    let start = Instant::now();
    let result = runner.run(&job.command);
    log::debug!("{}: finished in {:.2?}", job.platform, start.elapsed());

    match result {
        Ok(output) if output.success => JobOutcome::Built(BuiltArtifact {
            platform: job.platform,
            output_path: job.output_path,
        }),
        Ok(output) => JobOutcome::Failed(DispatchError::Build {
            platform: job.platform,
            cause: BuildFailure::Exited { code: output.code },
            stdout: output.stdout,
            stderr: output.stderr,
        }),
        Err(source) => JobOutcome::Failed(DispatchError::Build {
            platform: job.platform,
            cause: BuildFailure::Spawn {
                program: job.command.program,
                source,
            },
            stdout: String::new(),
            stderr: String::new(),
        }),
    }
}
