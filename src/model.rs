use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::diff::derive_status;

/// DNS record types compared between the two nameservers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
	A,
	MX,
	CNAME,
	TXT,
	NS,
}

impl RecordType {
	/// Every supported type, in display order.
	pub const ALL: [RecordType; 5] = [
		RecordType::A,
		RecordType::MX,
		RecordType::CNAME,
		RecordType::TXT,
		RecordType::NS,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			RecordType::A => "A",
			RecordType::MX => "MX",
			RecordType::CNAME => "CNAME",
			RecordType::TXT => "TXT",
			RecordType::NS => "NS",
		}
	}

	/// True when values of this type are domain names (compared case-insensitively).
	pub fn holds_names(&self) -> bool {
		matches!(self, RecordType::MX | RecordType::CNAME | RecordType::NS)
	}
}

impl fmt::Display for RecordType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RecordType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		RecordType::ALL.iter()
			.copied()
			.find(|rt| rt.as_str().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| format!("unsupported record type '{}'", s))
	}
}

/// Outcome of one lookup against one nameserver.
///
/// An empty `Values` means the server answered and has no such records;
/// `Failure` means the query itself did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSet {
	Values(Vec<String>),
	Failure(String),
}

impl RecordSet {
	pub fn empty() -> Self {
		RecordSet::Values(Vec::new())
	}
}

/// Comparison verdict for one (hostname, record type) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
	Identical,
	Different,
	ErrorCurrent,
	ErrorNew,
	ErrorBoth,
}

impl Status {
	pub const ALL: [Status; 5] = [
		Status::Identical,
		Status::Different,
		Status::ErrorCurrent,
		Status::ErrorNew,
		Status::ErrorBoth,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Status::Identical => "Identical",
			Status::Different => "Different",
			Status::ErrorCurrent => "Error (current)",
			Status::ErrorNew => "Error (new)",
			Status::ErrorBoth => "Error (both)",
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Status {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Status::ALL.iter()
			.copied()
			.find(|st| st.as_str() == s.trim())
			.ok_or_else(|| format!("unknown status '{}'", s))
	}
}

/// One line of the report.
///
/// The status is computed from the two record sets on construction and
/// cannot be set independently.
#[derive(Debug, Clone)]
pub struct ComparisonRow {
	pub hostname: String,
	pub record_type: RecordType,
	pub current: RecordSet,
	pub new: RecordSet,
	status: Status,
}

impl ComparisonRow {
	pub fn new(
		hostname: String,
		record_type: RecordType,
		current: RecordSet,
		new: RecordSet,
	) -> Self {
		let status = derive_status(record_type, &current, &new);
		ComparisonRow { hostname, record_type, current, new, status }
	}

	pub fn status(&self) -> Status {
		self.status
	}
}

/// Comparison run configuration
#[derive(Debug, Clone)]
pub struct CompareConfig {
	pub timeout: Duration,
	/// Maximum (hostname, record type) pairs queried at once
	pub max_inflight: usize,
}
