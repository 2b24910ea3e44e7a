//! Job translator
//!
//! Turns a runner launch request plus the repository's config entry into the
//! batch job submitted to the scheduler. Pure: no I/O, no shared state.
//!
//! The repository identity and the launcher token are put into the script
//! unquoted. Both must come from a trusted caller; only the runner name and
//! labels are treated as hostile and shell-quoted.

pub mod partition;
pub mod shell;
pub mod template;

use slurmgate_core::domain::job::{
    JOB_NAME, JobDescriptor, JobProperties, Partition, STDERR_PATH, STDOUT_PATH, WORKING_DIRECTORY,
};
use slurmgate_core::dto::launch::LaunchRequest;
use thiserror::Error;

use crate::config::GatewayConfig;
use partition::select_partition;
use shell::escape_shell_arg;
use template::{Substitutions, render};

/// Shell variable the job script exports the launcher token as
const TOKEN_VARIABLE: &str = "$GHTOKEN";

/// Runner work directory, relative to the runner install
const RUNNER_WORK_DIR: &str = "gha_work";

/// Errors raised while translating a request
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("No configuration found for repository {0}")]
    ConfigNotFound(String),
}

/// A translated request: who to submit as and what to submit
#[derive(Debug, Clone)]
pub struct Translation {
    pub slurm_user: String,
    pub partition: Partition,
    pub descriptor: JobDescriptor,
}

/// Builds the batch job for `req` from the active config snapshot
pub fn translate(config: &GatewayConfig, req: &LaunchRequest) -> Result<Translation, TranslateError> {
    let repository = config
        .repository(&req.git_hub_url)
        .ok_or_else(|| TranslateError::ConfigNotFound(req.git_hub_url.clone()))?;

    let partition = select_partition(req.runner_labels());

    if let Some(hint) = req.partition.as_deref() {
        tracing::debug!("Ignoring partition hint {:?}, using {}", hint, partition);
    }

    let config_line = runner_config_line(req);
    let script = render(
        &config.job_template,
        &Substitutions {
            user: &repository.slurm_user,
            runner_config_line: &config_line,
            launch_token: &req.launcher_token,
            log_file: STDOUT_PATH,
        },
    );

    let job = JobProperties {
        comment: format!("GitHub Actions Builder for {}", req.git_hub_url),
        name: JOB_NAME.to_string(),
        ntasks: 1,
        partition: partition.name().to_string(),
        cpus_per_task: req.cpus.clone(),
        exclusive: req.exclusive.clone(),
        memory_per_node: req.memory.clone(),
        standard_output: STDOUT_PATH.to_string(),
        standard_error: STDERR_PATH.to_string(),
        current_working_directory: WORKING_DIRECTORY.to_string(),
    };

    Ok(Translation {
        slurm_user: repository.slurm_user.clone(),
        partition,
        descriptor: JobDescriptor { script, job },
    })
}

/// Arguments for the runner's registration command
///
/// Name and labels are each quoted as one shell word.
pub fn runner_config_line(req: &LaunchRequest) -> String {
    let mut args: Vec<String> = [
        "--unattended",
        "--replace",
        "--url",
        req.git_hub_url.as_str(),
        "--token",
        TOKEN_VARIABLE,
        "--ephemeral",
        "--work",
        RUNNER_WORK_DIR,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if let Some(name) = req.runner_name() {
        args.push("--name".to_string());
        args.push(escape_shell_arg(name));
    }

    if let Some(labels) = req.runner_labels() {
        args.push("--labels".to_string());
        args.push(escape_shell_arg(labels));
    }

    args.join(" ")
}
