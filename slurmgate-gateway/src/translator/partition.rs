//! Partition selection
//!
//! A closed two-way policy: runners asking for the large memory tier through
//! their labels go to the high-memory partition, everything else to the
//! default one. The request's own `partition` hint is never consulted.

use slurmgate_core::domain::job::Partition;

/// Label substring requesting the high-memory partition
pub const HIGH_MEMORY_MARKER: &str = "32gb";

/// Picks the partition for a runner with the given label string
pub fn select_partition(labels: Option<&str>) -> Partition {
    match labels {
        Some(labels) if labels.contains(HIGH_MEMORY_MARKER) => Partition::HighMemory,
        _ => Partition::Default,
    }
}
