use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::dns::RecordLookup;
use crate::model::{CompareConfig, ComparisonRow, RecordSet, RecordType};

/// Compare every (hostname, record type) pair between two nameservers.
///
/// Each pair is queried once against each side. Up to `max_inflight` pairs
/// run at once; rows come back in hostname order, then record type order,
/// regardless of completion order.
pub async fn compare(
	hostnames: &[String],
	record_types: &[RecordType],
	current: Arc<dyn RecordLookup>,
	new: Arc<dyn RecordLookup>,
	config: &CompareConfig,
) -> Vec<ComparisonRow> {
	let semaphore = Arc::new(Semaphore::new(config.max_inflight.max(1)));

	// Spawn in canonical order; awaiting in the same order reassembles it
	let mut handles = Vec::with_capacity(hostnames.len() * record_types.len());
	for hostname in hostnames {
		for &record_type in record_types {
			let sem = semaphore.clone();
			let current = current.clone();
			let new = new.clone();
			let hostname = hostname.clone();

			handles.push(tokio::spawn(async move {
				let _permit = sem.acquire().await.ok();
				let (current_set, new_set) = tokio::join!(
					current.resolve(&hostname, record_type),
					new.resolve(&hostname, record_type),
				);
				(current_set, new_set)
			}));
		}
	}

	let pairs = hostnames.iter()
		.flat_map(|hostname| record_types.iter().map(move |&rt| (hostname, rt)));

	let mut rows = Vec::with_capacity(handles.len());
	for ((hostname, record_type), handle) in pairs.zip(handles) {
		let (current_set, new_set) = match handle.await {
			Ok(sets) => sets,
			Err(e) => {
				tracing::warn!(hostname = %hostname, %record_type, "lookup task failed: {}", e);
				let message = format!("lookup task failed: {}", e);
				(RecordSet::Failure(message.clone()), RecordSet::Failure(message))
			}
		};
		rows.push(ComparisonRow::new(hostname.clone(), record_type, current_set, new_set));
	}
	rows
}
