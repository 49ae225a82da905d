mod cli;
mod compare;
mod diff;
mod dns;
mod error;
mod model;
mod nameserver;
mod output;
mod targets;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::dns::{NameserverLookup, RecordLookup};
use crate::model::{CompareConfig, RecordType};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();

	let cli = Cli::parse();

	// Validate all input before sending any query
	let domain = targets::normalize_domain(&cli.domain)?;
	let mut labels = targets::parse_subdomain_list(&cli.subdomains);
	if let Some(path) = &cli.subdomain_file {
		labels.extend(targets::read_label_file(path)?);
	}
	let current_ns = nameserver::resolve_nameserver(&cli.current_ns, "current").await?;
	let new_ns = nameserver::resolve_nameserver(&cli.new_ns, "new").await?;

	let hostnames = targets::enumerate(&domain, &labels);
	let config = CompareConfig {
		timeout: Duration::from_millis(cli.timeout),
		max_inflight: cli.concurrency,
	};

	output::print_run_summary(&domain, &hostnames, &current_ns, &new_ns, &config);

	// Timestamp the export by when the run started
	let started = chrono::Local::now().naive_local();

	let current: Arc<dyn RecordLookup> = Arc::new(NameserverLookup::new(&current_ns, config.timeout));
	let new: Arc<dyn RecordLookup> = Arc::new(NameserverLookup::new(&new_ns, config.timeout));

	println!(
		"Comparing DNS records for {} and its subdomains between {} and {}...",
		domain, current.label(), new.label(),
	);
	let rows = compare::compare(&hostnames, &RecordType::ALL, current, new, &config).await;

	output::print_results(&rows, &current_ns, &new_ns);

	if cli.no_csv {
		return Ok(());
	}

	let file_name = output::csv_file_name(&cli.prefix, &started);
	match output::write_csv(Path::new(&cli.output_dir), &file_name, &rows) {
		Ok(path) => {
			println!("\nComparison results exported to {}", path.display());
			Ok(())
		}
		Err(e) => {
			tracing::error!("CSV export failed: {:#}", e);
			Err(e.context("exporting comparison results"))
		}
	}
}
