//! Batch job domain model
//!
//! The descriptor submitted to the scheduler for one ephemeral runner.
//! Field names follow the scheduler REST API so the descriptor serializes
//! straight into the submission body.

use serde::{Deserialize, Serialize};

/// Job name given to every runner job
pub const JOB_NAME: &str = "GitHubActions";

/// Path the runner's stdout is written to; also substituted into the job script
pub const STDOUT_PATH: &str = "/tmp/gha-stdout";

/// Path the runner's stderr is written to
pub const STDERR_PATH: &str = "/tmp/gha-stderr";

/// Working directory of the batch job
pub const WORKING_DIRECTORY: &str = "/tmp";

/// A rendered batch job, ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Rendered job script text
    pub script: String,

    /// Resource and metadata fields
    pub job: JobProperties,
}

/// Resource and metadata fields of a batch job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProperties {
    pub comment: String,
    pub name: String,
    pub ntasks: u32,
    pub partition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus_per_task: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_per_node: Option<String>,

    pub standard_output: String,
    pub standard_error: String,
    pub current_working_directory: String,
}

/// Scheduler partitions a runner can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// General runner pool
    Default,

    /// Nodes with the large memory tier
    HighMemory,
}

impl Partition {
    /// Scheduler name of the partition
    pub fn name(&self) -> &'static str {
        match self {
            Partition::Default => "gha",
            Partition::HighMemory => "32GBRAM",
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties() -> JobProperties {
        JobProperties {
            comment: "GitHub Actions Builder for https://github.com/org/r".to_string(),
            name: JOB_NAME.to_string(),
            ntasks: 1,
            partition: Partition::Default.name().to_string(),
            cpus_per_task: None,
            exclusive: None,
            memory_per_node: None,
            standard_output: STDOUT_PATH.to_string(),
            standard_error: STDERR_PATH.to_string(),
            current_working_directory: WORKING_DIRECTORY.to_string(),
        }
    }

    #[test]
    fn test_absent_resources_are_omitted() {
        let value = serde_json::to_value(properties()).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("cpus_per_task"));
        assert!(!object.contains_key("exclusive"));
        assert!(!object.contains_key("memory_per_node"));
        assert_eq!(object["ntasks"], 1);
        assert_eq!(object["partition"], "gha");
    }

    #[test]
    fn test_present_resources_are_passed_verbatim() {
        let mut props = properties();
        props.cpus_per_task = Some("8".to_string());
        props.memory_per_node = Some("16000".to_string());

        let value = serde_json::to_value(JobDescriptor {
            script: "#!/bin/bash".to_string(),
            job: props,
        })
        .unwrap();

        assert_eq!(value["script"], "#!/bin/bash");
        assert_eq!(value["job"]["cpus_per_task"], "8");
        assert_eq!(value["job"]["memory_per_node"], "16000");
        assert_eq!(value["job"]["current_working_directory"], "/tmp");
    }

    #[test]
    fn test_partition_names() {
        assert_eq!(Partition::Default.to_string(), "gha");
        assert_eq!(Partition::HighMemory.to_string(), "32GBRAM");
    }
}
