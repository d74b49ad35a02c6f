//! Single-job execution.
//!
//! The runner executes exactly one labeled job to completion inside its
//! working directory and reports what happened as text. It is a dumb
//! runner: a nonzero exit code, a crash, even a
//! missing working directory never surface as errors; they are recorded
//! in the returned trace and the verifier alone decides success from the
//! artifact the job did or did not leave behind. This keeps one bad job
//! from ever aborting siblings already in flight.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::dispatch::job::{JobResult, JobSpec};
use crate::toolkit::Toolkit;

/// Name the shared parameter template takes inside each job directory.
pub const TEMPLATE_PAR_FILE: &str = "xstar.par";

/// Executes one XSTAR job inside its working directory.
#[derive(Debug, Clone)]
pub struct XstarRunner {
    bin_dir: PathBuf,
    template_par: PathBuf,
    shell: String,
}

impl XstarRunner {
    pub fn new(toolkit: &Toolkit) -> Self {
        Self {
            bin_dir: toolkit.bin_dir(),
            template_par: toolkit.template_par(),
            shell: "sh".to_string(),
        }
    }

    /// Use a different shell for the command line (default `sh`).
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Execute the job and return its result unconditionally.
    ///
    /// The command line runs through the shell with its first token
    /// resolved against the toolkit bin directory. The working directory
    /// and the `PFILES` search path are set on the spawned process only,
    /// so concurrent workers never observe each other's value.
    pub async fn run(&self, spec: JobSpec) -> JobResult {
        let mut trace: Vec<String> = vec![format!("Running: {}", spec.work_dir.display())];

        // Seed the job directory with the shared parameter template. A
        // failed copy is recorded but is not a job failure by itself.
        if let Err(e) = tokio::fs::copy(
            &self.template_par,
            spec.work_dir.join(TEMPLATE_PAR_FILE),
        )
        .await
        {
            trace.push(format!(
                "warning: could not copy {}: {}",
                self.template_par.display(),
                e
            ));
        }

        let command_line = format!("{}/{}", self.bin_dir.display(), spec.command_line);
        let mut child = match Command::new(&self.shell)
            .arg("-c")
            .arg(&command_line)
            .current_dir(&spec.work_dir)
            .env("PFILES", &spec.work_dir)
            .stdout(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                trace.push(format!("failed to spawn: {}", e));
                return JobResult {
                    id: spec.id,
                    output: trace.join("\n"),
                    exit: None,
                };
            }
        };

        if let Some(pid) = child.id() {
            trace.push(pid.to_string());
        }

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => trace.push(line),
                    Ok(None) => break,
                    Err(e) => {
                        trace.push(format!("output not readable as UTF-8: {}", e));
                        break;
                    }
                }
            }
        }

        let exit = match child.wait().await {
            Ok(status) => Some(status),
            Err(e) => {
                trace.push(format!("failed to collect exit status: {}", e));
                None
            }
        };

        JobResult {
            id: spec.id,
            output: trace.join("\n"),
            exit,
        }
    }
}
