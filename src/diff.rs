use std::collections::BTreeSet;

use crate::model::{RecordSet, RecordType, Status};

/// Normalize a record value for comparison.
///
/// Name-valued types (MX, CNAME, NS) are compared case-insensitively and
/// without the trailing root dot. A and TXT values are compared exactly.
pub fn normalize(record_type: RecordType, value: &str) -> String {
	let trimmed = value.trim();
	if record_type.holds_names() {
		trimmed.trim_end_matches('.').to_ascii_lowercase()
	} else {
		trimmed.to_string()
	}
}

/// Compare two value lists as unordered sets of normalized strings.
pub fn same_records(record_type: RecordType, current: &[String], new: &[String]) -> bool {
	let lhs: BTreeSet<String> = current.iter()
		.map(|v| normalize(record_type, v))
		.collect();
	let rhs: BTreeSet<String> = new.iter()
		.map(|v| normalize(record_type, v))
		.collect();
	lhs == rhs
}

/// Derive the status of a row from its two record sets.
///
/// Failures take priority over any data comparison; two empty sets are
/// identical.
pub fn derive_status(record_type: RecordType, current: &RecordSet, new: &RecordSet) -> Status {
	match (current, new) {
		(RecordSet::Failure(_), RecordSet::Failure(_)) => Status::ErrorBoth,
		(RecordSet::Failure(_), _) => Status::ErrorCurrent,
		(_, RecordSet::Failure(_)) => Status::ErrorNew,
		(RecordSet::Values(cur), RecordSet::Values(new)) => {
			if same_records(record_type, cur, new) {
				Status::Identical
			} else {
				Status::Different
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn values(items: &[&str]) -> RecordSet {
		RecordSet::Values(items.iter().map(|s| s.to_string()).collect())
	}

	fn failure() -> RecordSet {
		RecordSet::Failure("timed out".to_string())
	}

	#[test]
	fn test_normalize_names() {
		assert_eq!(normalize(RecordType::CNAME, "WWW.Example.COM."), "www.example.com");
		assert_eq!(normalize(RecordType::MX, "10 Mail.Example.com."), "10 mail.example.com");
	}

	#[test]
	fn test_normalize_txt_is_exact() {
		assert_eq!(normalize(RecordType::TXT, "\"V=spf1 -all\""), "\"V=spf1 -all\"");
	}

	#[test]
	fn test_empty_sets_identical() {
		let status = derive_status(RecordType::MX, &RecordSet::empty(), &RecordSet::empty());
		assert_eq!(status, Status::Identical);
	}

	#[test]
	fn test_order_does_not_matter() {
		let a = values(&["192.0.2.1", "192.0.2.2"]);
		let b = values(&["192.0.2.2", "192.0.2.1"]);
		assert_eq!(derive_status(RecordType::A, &a, &b), Status::Identical);
		assert_eq!(derive_status(RecordType::A, &b, &a), Status::Identical);
	}

	#[test]
	fn test_different_values() {
		let a = values(&["192.0.2.2"]);
		let b = values(&["198.51.100.1"]);
		assert_eq!(derive_status(RecordType::A, &a, &b), Status::Different);
	}

	#[test]
	fn test_mx_priority_is_significant() {
		let a = values(&["10 mail.example.com."]);
		let b = values(&["20 mail.example.com."]);
		assert_eq!(derive_status(RecordType::MX, &a, &b), Status::Different);
	}

	#[test]
	fn test_cname_case_insensitive() {
		let a = values(&["Target.Example.net."]);
		let b = values(&["target.example.net"]);
		assert_eq!(derive_status(RecordType::CNAME, &a, &b), Status::Identical);
	}

	#[test]
	fn test_txt_case_sensitive() {
		let a = values(&["\"token=ABC\""]);
		let b = values(&["\"token=abc\""]);
		assert_eq!(derive_status(RecordType::TXT, &a, &b), Status::Different);
	}

	#[test]
	fn test_empty_vs_values_differs() {
		let a = RecordSet::empty();
		let b = values(&["ns1.example.com."]);
		assert_eq!(derive_status(RecordType::NS, &a, &b), Status::Different);
	}

	#[test]
	fn test_failure_dominates() {
		let data = values(&["192.0.2.1"]);
		assert_eq!(derive_status(RecordType::A, &failure(), &data), Status::ErrorCurrent);
		assert_eq!(derive_status(RecordType::A, &data, &failure()), Status::ErrorNew);
		assert_eq!(derive_status(RecordType::A, &failure(), &failure()), Status::ErrorBoth);
		assert_eq!(
			derive_status(RecordType::A, &RecordSet::empty(), &failure()),
			Status::ErrorNew,
		);
	}
}
