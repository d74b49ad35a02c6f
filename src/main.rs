use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use clap::Parser;

use mxstar::config::Config;
use mxstar::dispatch::{collate, label_jobs, verify, JobEvent, WorkerPool, XstarRunner};
use mxstar::log::RunLog;
use mxstar::summary::RunSummary;
use mxstar::toolkit::Toolkit;
use mxstar::{joblist, rundir, Result};

/// mxstar - manages parallel execution of multiple XSTAR jobs
#[derive(Parser, Debug)]
#[command(name = "mxstar")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "Normally xstinitable is launched to prompt for XSTAR physical parameters\n\
and generate a list of XSTAR jobs to run in parallel. This can be customized\n\
by supplying xstinitable parameters on the command line (such as mode=h) OR\n\
by supplying the name of an existing joblist file."
)]
pub struct Cli {
    /// Work directory to save results of the run
    #[arg(short = 'w', long = "workdir")]
    pub workdir: Option<PathBuf>,

    /// Keep the combined log file after a successful collation
    #[arg(short = 'k')]
    pub keeplog: bool,

    /// File to save the combined run log to
    #[arg(short = 'l', long = "logfile")]
    pub logfile: Option<String>,

    /// Max number of worker processes
    #[arg(short = 'n', long = "nproc")]
    pub nproc: Option<usize>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// xstinitable parameters, or the path of an existing joblist file
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(workdir) = cli.workdir {
        config.work_dir = workdir;
    }
    if cli.keeplog {
        config.keep_log = true;
    }
    if let Some(logfile) = cli.logfile {
        config.log_file = logfile;
    }
    if let Some(nproc) = cli.nproc {
        config.max_processes = nproc;
    }
    config.validate()?;

    if !cli.yes && !confirm(&config)? {
        println!("\nRun cancelled.");
        return Ok(());
    }

    run(config, cli.args)
}

/// Show the effective settings and ask before touching anything.
///
/// Loops until the answer is a clear yes or no. This is the only
/// user-facing gate: once the batch is dispatched there is no way to
/// cancel it.
fn confirm(config: &Config) -> Result<bool> {
    loop {
        println!("These values are being used:");
        println!("  Work directory: {}", config.work_dir.display());
        println!("  Keep log file:  {}", config.keep_log);
        println!("  Log file:       {}", config.log_file);
        println!("  Max processes:  {}", config.max_processes);
        println!();
        print!("Would you like to continue? (y/n): ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}

fn run(config: Config, args: Vec<String>) -> Result<()> {
    // Pre-flight: everything here must fail before any job is dispatched.
    let toolkit = Toolkit::from_env()?;
    toolkit.check()?;
    rundir::check_work_dir(&config.work_dir)?;

    let work_dir = config.work_dir.canonicalize()?;
    let run_dir = rundir::create_run_dir(&work_dir)?;

    let joblist_path = joblist::acquire(&args, &toolkit, &run_dir)?;
    let commands = joblist::read_commands(&joblist_path)?;

    let model = rundir::model_name(&commands[0])?;
    let model_dir = run_dir.join(&model);
    if !model_dir.exists() {
        std::fs::create_dir(&model_dir)?;
    }

    let jobs = label_jobs(&commands, &model_dir)?;

    let log = RunLog::create(&log_path(&config, &model_dir))?;
    log.info(&format!("Using Dir {}", model_dir.display()));
    let started_at = Utc::now();
    log.info(&format!("Start time: {}", Local::now()));

    let runtime = tokio::runtime::Runtime::new()?;
    let mut results = runtime.block_on(async {
        let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(256);
        let pool = WorkerPool::new(config.max_processes, event_tx);

        let progress_log = log.clone();
        let progress = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                match event {
                    JobEvent::Started { id } => progress_log.info(&format!("job {} started", id)),
                    JobEvent::Finished { id } => {
                        progress_log.info(&format!("job {} finished", id))
                    }
                }
            }
        });

        let runner = XstarRunner::new(&toolkit);
        let results = pool
            .dispatch(jobs.clone(), move |spec| {
                let runner = runner.clone();
                async move { runner.run(spec).await }
            })
            .await;

        // Dropping the pool closes the event channel and lets the
        // progress task drain and exit.
        drop(pool);
        let _ = progress.await;
        results
    })?;

    results.sort_by(|a, b| a.id.cmp(&b.id));
    for result in &results {
        log.info(&clean_trace(&result.output));
    }

    let finished_at = Utc::now();
    log.info(&format!("End time: {}", Local::now()));

    let outcome = verify(&jobs);

    RunSummary {
        started_at,
        finished_at,
        per_job_logs: results.iter().map(|r| r.output.clone()).collect(),
        failed_ids: outcome.failed_ids.clone(),
    }
    .save(&run_dir)?;

    if outcome.all_succeeded() {
        runtime.block_on(collate(&toolkit, &run_dir, &model_dir, &jobs))?;
        if !config.keep_log {
            log.remove()?;
        }
    } else {
        log.info(&format!(
            "jobs failed verification: {}",
            outcome.failed_ids.join(",")
        ));
    }

    Ok(())
}

/// Resolve the configured log file against the model directory.
fn log_path(config: &Config, model_dir: &Path) -> PathBuf {
    let path = Path::new(&config.log_file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        model_dir.join(path)
    }
}

/// Collapse blank lines out of a job trace before logging it.
fn clean_trace(output: &str) -> String {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
