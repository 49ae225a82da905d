use std::net::{IpAddr, SocketAddr};

use crate::error::InputError;

const DNS_PORT: u16 = 53;

/// A nameserver to compare, as typed by the user and as resolved
#[derive(Debug, Clone)]
pub struct Nameserver {
	pub label: String,
	pub addr: SocketAddr,
}

/// Parse a literal nameserver address.
///
/// Supports formats:
///   "192.0.2.53"           -- IPv4, default port 53
///   "192.0.2.53:5353"      -- IPv4 with explicit port
///   "2001:db8::53"         -- bare IPv6, default port 53
///   "[2001:db8::53]:53"    -- bracketed IPv6 with port
///
/// Returns `Ok(None)` when the input looks like a hostname instead.
pub fn parse_literal(input: &str) -> Result<Option<SocketAddr>, InputError> {
	let invalid = |e: std::net::AddrParseError| InputError::InvalidNameserver {
		input: input.to_string(),
		reason: e.to_string(),
	};

	if input.starts_with('[') {
		// Bracketed IPv6 with port: [::1]:53
		return input.parse().map(Some).map_err(invalid);
	}
	if input.contains("::") || input.matches(':').count() > 1 {
		// Bare IPv6 address without port
		let ip: IpAddr = input.parse().map_err(invalid)?;
		return Ok(Some(SocketAddr::new(ip, DNS_PORT)));
	}
	if let Ok(addr) = input.parse::<SocketAddr>() {
		return Ok(Some(addr));
	}
	if let Ok(ip) = input.parse::<IpAddr>() {
		return Ok(Some(SocketAddr::new(ip, DNS_PORT)));
	}
	Ok(None)
}

/// Split "host" or "host:port" into its parts.
pub fn split_host_port(input: &str) -> Result<(&str, u16), InputError> {
	match input.rsplit_once(':') {
		Some((host, port)) => {
			let port = port.parse::<u16>().map_err(|e| InputError::InvalidNameserver {
				input: input.to_string(),
				reason: format!("bad port: {}", e),
			})?;
			Ok((host, port))
		}
		None => Ok((input, DNS_PORT)),
	}
}

/// Turn user input into a nameserver socket address.
///
/// Literal addresses are used as-is; hostnames are looked up once through
/// the system resolver and the first address wins. `role` names the
/// nameserver ("current" or "new") in error messages.
pub async fn resolve_nameserver(input: &str, role: &'static str) -> Result<Nameserver, InputError> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Err(InputError::EmptyNameserver(role));
	}

	if let Some(addr) = parse_literal(trimmed)? {
		return Ok(Nameserver { label: trimmed.to_string(), addr });
	}

	let (host, port) = split_host_port(trimmed)?;
	if host.is_empty() {
		return Err(InputError::EmptyNameserver(role));
	}
	let unresolvable = |reason: String| InputError::UnresolvableNameserver {
		host: host.to_string(),
		reason,
	};
	let mut addrs = tokio::net::lookup_host((host, port)).await
		.map_err(|e| unresolvable(e.to_string()))?;
	let addr = addrs.next()
		.ok_or_else(|| unresolvable("no addresses returned".to_string()))?;
	tracing::debug!(host, %addr, "resolved {} nameserver", role);

	Ok(Nameserver { label: trimmed.to_string(), addr })
}
