use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::model::{CompareConfig, ComparisonRow, RecordSet, Status};
use crate::nameserver::Nameserver;

/// Column headers shared by the table and the CSV file.
pub const HEADERS: [&str; 5] = [
	"Subdomain", "Record Type", "Current Records", "New Records", "Status",
];

/// Joins the values of a multi-valued record set inside one cell.
pub const VALUE_SEPARATOR: &str = "\n";

/// Shown for a record set that was answered but holds no records.
pub const EMPTY_MARKER: &str = "-";

/// Print a summary of what is about to be compared.
pub fn print_run_summary(
	domain: &str,
	hostnames: &[String],
	current: &Nameserver,
	new: &Nameserver,
	config: &CompareConfig,
) {
	println!("DNS Comparison");
	println!("==============");
	println!("Domain:         {}", domain);
	println!("Hostnames:      {}", hostnames.len());
	for h in hostnames {
		println!("  - {}", h);
	}
	println!("Current NS:     {} ({})", current.label, current.addr);
	println!("New NS:         {} ({})", new.label, new.addr);
	println!("Timeout:        {} ms", config.timeout.as_millis());
	println!("Concurrency:    {}", config.max_inflight);
	println!();
}

/// Cell text for one side of a row.
pub fn format_record_set(set: &RecordSet) -> String {
	match set {
		RecordSet::Values(values) if values.is_empty() => EMPTY_MARKER.to_string(),
		RecordSet::Values(values) => values.join(VALUE_SEPARATOR),
		RecordSet::Failure(message) => format!("error: {}", message),
	}
}

fn status_color(status: Status) -> Color {
	match status {
		Status::Identical => Color::Green,
		Status::Different => Color::Red,
		Status::ErrorCurrent | Status::ErrorNew | Status::ErrorBoth => Color::Yellow,
	}
}

/// Render the comparison as a bordered table.
pub fn render_table(rows: &[ComparisonRow]) -> String {
	let mut table = Table::new();
	table.load_preset(UTF8_FULL);
	table.set_content_arrangement(ContentArrangement::Dynamic);
	table.set_header(HEADERS.to_vec());

	for row in rows {
		let status = row.status();
		table.add_row(vec![
			Cell::new(&row.hostname),
			Cell::new(row.record_type),
			Cell::new(format_record_set(&row.current)),
			Cell::new(format_record_set(&row.new)),
			Cell::new(status).fg(status_color(status)),
		]);
	}

	table.to_string()
}

/// One-line count of rows per status.
pub fn status_tally(rows: &[ComparisonRow]) -> String {
	let counts: Vec<String> = Status::ALL.iter()
		.map(|&status| {
			let n = rows.iter().filter(|r| r.status() == status).count();
			format!("{}: {}", status, n)
		})
		.collect();
	format!("{} rows ({})", rows.len(), counts.join(", "))
}

/// Print the results table and the tally.
pub fn print_results(rows: &[ComparisonRow], current: &Nameserver, new: &Nameserver) {
	println!("\nComparison Results ({} vs {})", current.label, new.label);
	println!("==================\n");
	println!("{}", render_table(rows));
	println!("\n{}", status_tally(rows));
}

/// CSV file name for a run started at `timestamp`.
pub fn csv_file_name(prefix: &str, timestamp: &NaiveDateTime) -> String {
	format!("{}_{}.csv", prefix, timestamp.format("%d-%m-%Y-%H%M%S"))
}

/// Write the comparison rows to `dir/file_name`, creating `dir` if needed.
///
/// Returns the path of the written file.
pub fn write_csv(dir: &Path, file_name: &str, rows: &[ComparisonRow]) -> Result<PathBuf> {
	std::fs::create_dir_all(dir)
		.with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
	let path = dir.join(file_name);

	let mut writer = csv::Writer::from_path(&path)
		.with_context(|| format!("failed to create CSV file '{}'", path.display()))?;
	writer.write_record(HEADERS)?;
	for row in rows {
		writer.write_record([
			row.hostname.clone(),
			row.record_type.to_string(),
			format_record_set(&row.current),
			format_record_set(&row.new),
			row.status().to_string(),
		])?;
	}
	writer.flush()?;

	Ok(path)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	use crate::model::RecordType;

	fn values(items: &[&str]) -> RecordSet {
		RecordSet::Values(items.iter().map(|s| s.to_string()).collect())
	}

	fn sample_rows() -> Vec<ComparisonRow> {
		vec![
			ComparisonRow::new(
				"example.com".to_string(), RecordType::A,
				values(&["192.0.2.1"]), values(&["192.0.2.1"]),
			),
			ComparisonRow::new(
				"example.com".to_string(), RecordType::TXT,
				values(&["\"v=spf1 a, mx -all\"", "\"google-site-verification=x\""]),
				values(&["\"v=spf1 -all\""]),
			),
			ComparisonRow::new(
				"www.example.com".to_string(), RecordType::MX,
				RecordSet::empty(), RecordSet::Failure("timed out".to_string()),
			),
		]
	}

	#[test]
	fn test_format_record_set() {
		assert_eq!(format_record_set(&RecordSet::empty()), "-");
		assert_eq!(format_record_set(&values(&["a", "b"])), "a\nb");
		assert_eq!(
			format_record_set(&RecordSet::Failure("SERVFAIL".to_string())),
			"error: SERVFAIL",
		);
	}

	#[test]
	fn test_csv_file_name() {
		let ts = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
			.and_hms_opt(9, 5, 42).unwrap();
		assert_eq!(
			csv_file_name("dns_comparison", &ts),
			"dns_comparison_07-03-2026-090542.csv",
		);
	}

	#[test]
	fn test_render_table_has_all_rows() {
		let text = render_table(&sample_rows());
		for header in HEADERS {
			assert!(text.contains(header), "missing header {}", header);
		}
		assert!(text.contains("www.example.com"));
		assert!(text.contains("error: timed out"));
		assert!(text.contains("Different"));
		assert!(text.contains("Error (new)"));
		assert!(!text.contains("None"));
	}

	#[test]
	fn test_status_tally() {
		let tally = status_tally(&sample_rows());
		assert!(tally.starts_with("3 rows"));
		assert!(tally.contains("Identical: 1"));
		assert!(tally.contains("Different: 1"));
		assert!(tally.contains("Error (new): 1"));
		assert!(tally.contains("Error (both): 0"));
	}

	#[test]
	fn test_csv_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let out = dir.path().join("logs");
		let rows = sample_rows();
		let path = write_csv(&out, "dns_comparison_test.csv", &rows).unwrap();
		assert!(path.starts_with(&out));

		let mut reader = csv::Reader::from_path(&path).unwrap();
		let headers: Vec<String> = reader.headers().unwrap()
			.iter().map(String::from).collect();
		assert_eq!(headers, HEADERS.to_vec());

		let parsed: Vec<(String, RecordType, Status)> = reader.records()
			.map(|rec| {
				let rec = rec.unwrap();
				(
					rec[0].to_string(),
					rec[1].parse().unwrap(),
					rec[4].parse().unwrap(),
				)
			})
			.collect();
		let expected: Vec<(String, RecordType, Status)> = rows.iter()
			.map(|r| (r.hostname.clone(), r.record_type, r.status()))
			.collect();
		assert_eq!(parsed, expected);
	}

	#[test]
	fn test_csv_quotes_separators() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_csv(dir.path(), "out.csv", &sample_rows()).unwrap();
		let mut reader = csv::Reader::from_path(&path).unwrap();
		let second = reader.records().nth(1).unwrap().unwrap();
		assert_eq!(
			&second[2],
			"\"v=spf1 a, mx -all\"\n\"google-site-verification=x\"",
		);
	}

	#[test]
	fn test_write_csv_bad_directory() {
		let file = tempfile::NamedTempFile::new().unwrap();
		// A regular file cannot be used as the output directory
		let err = write_csv(file.path(), "out.csv", &sample_rows()).unwrap_err();
		assert!(err.to_string().contains("failed to create"));
	}
}
