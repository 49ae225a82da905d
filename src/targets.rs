use anyhow::{anyhow, Result};

use crate::error::InputError;

/// Clean up the user-supplied domain: surrounding whitespace and the
/// trailing root dot are dropped.
pub fn normalize_domain(input: &str) -> Result<String, InputError> {
	let domain = input.trim().trim_end_matches('.');
	if domain.is_empty() {
		return Err(InputError::EmptyDomain);
	}
	Ok(domain.to_string())
}

/// Split a comma-separated subdomain list into labels.
///
/// Entries are trimmed and empty entries dropped; order and duplicates are kept.
pub fn parse_subdomain_list(input: &str) -> Vec<String> {
	input.split(',')
		.map(|label| label.trim().to_string())
		.filter(|label| !label.is_empty())
		.collect()
}

/// Read subdomain labels from a file, one per line.
///
/// Blank lines and lines starting with '#' are skipped.
pub fn read_label_file(path: &str) -> Result<Vec<String>> {
	let content = std::fs::read_to_string(path)
		.map_err(|e| anyhow!("failed to read subdomain file '{}': {}", path, e))?;
	let labels: Vec<String> = content.lines()
		.map(|line| line.trim().to_string())
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.collect();
	Ok(labels)
}

/// Build the ordered list of hostnames to check: the bare domain first,
/// then `<label>.<domain>` for each label in input order.
pub fn enumerate(domain: &str, labels: &[String]) -> Vec<String> {
	std::iter::once(domain.to_string())
		.chain(labels.iter().map(|label| format!("{}.{}", label, domain)))
		.collect()
}
