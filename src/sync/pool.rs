//! Bounded fetch-and-extract worker pool

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use crate::error::ExtractError;
use crate::extract::{self, Extraction};
use crate::source::ArchiveSource;
use crate::types::SnapshotDescriptor;

/// The self-contained result of one task.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub descriptor: SnapshotDescriptor,
    pub result: Result<Extraction, ExtractError>,
}

async fn fetch_and_extract(
    source: &dyn ArchiveSource,
    descriptor: &SnapshotDescriptor,
) -> Result<Extraction, ExtractError> {
    let payload = source
        .fetch_archive(&descriptor.download_url)
        .await
        .ok_or(ExtractError::ArchiveFetch)?;

    // Decompression and XML parsing are CPU-bound
    let task_descriptor = descriptor.clone();
    tokio::task::spawn_blocking(move || extract::extract(&task_descriptor, &payload))
        .await
        .map_err(|e| ExtractError::TaskFailed(e.to_string()))?
}

/// Fetch and extract every descriptor with at most `workers` in flight.
///
/// Waits for every task. Outcomes are returned in the order of
/// `descriptors`, whatever order the tasks finished in. A failing task
/// yields a failed outcome and never cancels its siblings.
pub async fn run_pool(
    source: Arc<dyn ArchiveSource>,
    descriptors: Vec<SnapshotDescriptor>,
    workers: usize,
) -> Vec<TaskOutcome> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let sem = semaphore.clone();
        let source = source.clone();
        let task_descriptor = descriptor.clone();

        let handle = tokio::spawn(async move {
            let _permit = sem.acquire().await;
            debug!(date = %task_descriptor.real_data_date, name = %task_descriptor.remote_name, "Processing snapshot");
            fetch_and_extract(source.as_ref(), &task_descriptor).await
        });
        handles.push((descriptor, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (descriptor, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!(date = %descriptor.real_data_date, error = %e, "Extraction task aborted");
                Err(ExtractError::TaskFailed(e.to_string()))
            }
        };

        if let Err(e) = &result {
            warn!(
                date = %descriptor.real_data_date,
                name = %descriptor.remote_name,
                error = %e,
                "Snapshot unavailable, date left empty"
            );
        }
        outcomes.push(TaskOutcome { descriptor, result });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{document, folder, kmz, placemark_point};
    use crate::source::{descriptor_from_entry, MemorySource};
    use crate::config::RemoteConfig;

    async fn descriptors(source: &MemorySource) -> Vec<SnapshotDescriptor> {
        let remote = RemoteConfig::default();
        source
            .list_entries()
            .await
            .unwrap()
            .iter()
            .filter_map(|e| descriptor_from_entry(e, &remote))
            .collect()
    }

    #[tokio::test]
    async fn test_failures_are_isolated_and_order_kept() {
        let good = kmz(&document(&folder(
            "Ukrainian Unit Positions",
            &placemark_point("Azov", 37.0, 47.1),
        )));
        let source = MemorySource::new()
            .with_archive("240102_a.kmz", good.clone())
            .with_archive("240103_b.kmz", b"garbage".to_vec())
            .with_unavailable("240104_c.kmz")
            .with_archive("240105_d.kmz", good);
        let list = descriptors(&source).await;

        let outcomes = run_pool(Arc::new(source.clone()), list, 2).await;

        assert_eq!(outcomes.len(), 4);
        let dates: Vec<String> = outcomes
            .iter()
            .map(|o| o.descriptor.real_data_date.to_string())
            .collect();
        assert_eq!(dates, vec!["20240101", "20240102", "20240103", "20240104"]);

        assert_eq!(outcomes[0].result.as_ref().unwrap().units.ua.len(), 1);
        assert!(matches!(outcomes[1].result, Err(ExtractError::BadArchive(_))));
        assert_eq!(outcomes[2].result, Err(ExtractError::ArchiveFetch));
        assert!(outcomes[3].result.is_ok());
        assert_eq!(source.fetch_count(), 4);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let outcomes = run_pool(Arc::new(MemorySource::new()), Vec::new(), 5).await;
        assert!(outcomes.is_empty());
    }
}
