use clap::Parser;

/// Compare DNS records between a current and a new nameserver
#[derive(Parser, Debug)]
#[command(name = "dns-compare")]
#[command(about = "Compare A, MX, CNAME, TXT and NS records served by two nameservers")]
pub struct Cli {
	/// Domain to check (e.g. example.com)
	#[arg(short = 'd', long = "domain")]
	pub domain: String,

	/// Comma-separated subdomain labels (e.g. "www,mail")
	#[arg(short = 's', long = "subdomains", default_value = "")]
	pub subdomains: String,

	/// File containing subdomain labels (one per line)
	#[arg(long = "subdomain-file")]
	pub subdomain_file: Option<String>,

	/// Current nameserver (IP, ip:port, hostname or hostname:port)
	#[arg(short = 'c', long = "current-ns")]
	pub current_ns: String,

	/// New nameserver (IP, ip:port, hostname or hostname:port)
	#[arg(short = 'n', long = "new-ns")]
	pub new_ns: String,

	/// Query timeout in milliseconds
	#[arg(short = 't', long = "timeout", default_value = "3000")]
	pub timeout: u64,

	/// Maximum (hostname, record type) pairs queried at once
	#[arg(short = 'j', long = "concurrency", default_value = "8")]
	pub concurrency: usize,

	/// Directory for the CSV export
	#[arg(short = 'o', long = "output-dir", default_value = "logs")]
	pub output_dir: String,

	/// CSV file name prefix
	#[arg(long = "prefix", default_value = "dns_comparison")]
	pub prefix: String,

	/// Skip the CSV export
	#[arg(long = "no-csv")]
	pub no_csv: bool,
}
