//! Record lookups against a single, explicitly chosen nameserver.
//!
//! The comparison engine only sees the `RecordLookup` trait, so tests can
//! swap the network-backed implementation for an in-memory one.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hickory_proto::op::{Edns, Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType as DnsRecordType};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

use crate::model::{RecordSet, RecordType};
use crate::nameserver::Nameserver;

/// Advertised EDNS payload size, also the UDP receive buffer size
const MAX_PAYLOAD: u16 = 4096;

/// One nameserver's view of DNS.
#[async_trait]
pub trait RecordLookup: Send + Sync {
	/// Display label of the nameserver this lookup talks to.
	fn label(&self) -> &str;

	/// Issue a single query for `hostname`/`record_type`.
	///
	/// Never fails: errors are folded into `RecordSet::Failure`.
	async fn resolve(&self, hostname: &str, record_type: RecordType) -> RecordSet;
}

/// Map our record type onto the wire type.
pub fn wire_type(record_type: RecordType) -> DnsRecordType {
	match record_type {
		RecordType::A => DnsRecordType::A,
		RecordType::MX => DnsRecordType::MX,
		RecordType::CNAME => DnsRecordType::CNAME,
		RecordType::TXT => DnsRecordType::TXT,
		RecordType::NS => DnsRecordType::NS,
	}
}

/// Render one TXT character-string the way dig presents it.
///
/// Quotes and backslashes are backslash-escaped, bytes outside printable
/// ASCII become `\DDD`, so distinct byte strings never render alike.
pub fn escape_txt(data: &[u8]) -> String {
	let mut out = String::with_capacity(data.len() + 2);
	out.push('"');
	for &b in data {
		match b {
			b'"' => out.push_str("\\\""),
			b'\\' => out.push_str("\\\\"),
			0x20..=0x7e => out.push(b as char),
			_ => out.push_str(&format!("\\{:03}", b)),
		}
	}
	out.push('"');
	out
}

/// Render RDATA the way `dig +short` shows it.
///
/// Returns None for record data outside the compared types.
pub fn format_rdata(rdata: &RData) -> Option<String> {
	match rdata {
		RData::A(a) => Some(a.to_string()),
		RData::MX(mx) => Some(format!("{} {}", mx.preference(), mx.exchange())),
		RData::CNAME(cname) => Some(cname.to_string()),
		RData::NS(ns) => Some(ns.to_string()),
		RData::TXT(txt) => {
			let parts: Vec<String> = txt.txt_data().iter()
				.map(|data| escape_txt(data))
				.collect();
			Some(parts.join(" "))
		}
		_ => None,
	}
}

/// Short diagnostic for an error response code.
fn rcode_message(rcode: ResponseCode) -> String {
	match rcode {
		ResponseCode::NXDomain => "NXDOMAIN".to_string(),
		ResponseCode::ServFail => "SERVFAIL".to_string(),
		ResponseCode::Refused => "REFUSED".to_string(),
		ResponseCode::FormErr => "FORMERR".to_string(),
		ResponseCode::NotImp => "NOTIMP".to_string(),
		other => format!("rcode {:?}", other),
	}
}

/// Build a recursive query for `hostname`/`record_type` with an EDNS OPT
/// record advertising a large UDP payload.
pub fn build_query(hostname: &str, record_type: DnsRecordType, txid: u16) -> Result<Vec<u8>> {
	let mut name = Name::from_ascii(hostname)
		.map_err(|e| anyhow!("invalid hostname '{}': {}", hostname, e))?;
	name.set_fqdn(true);

	let mut message = Message::new();
	message.set_id(txid);
	message.set_recursion_desired(true);
	message.add_query(Query::query(name, record_type));
	message.extensions_mut()
		.get_or_insert_with(Edns::new)
		.set_max_payload(MAX_PAYLOAD);

	message.to_vec()
		.map_err(|e| anyhow!("failed to serialize DNS query: {}", e))
}

/// Parse a DNS response, validating the transaction ID and message type.
pub fn parse_response(bytes: &[u8], expected_txid: u16) -> Result<Message> {
	let message = Message::from_vec(bytes)
		.map_err(|e| anyhow!("failed to parse DNS response: {}", e))?;

	if message.id() != expected_txid {
		return Err(anyhow!(
			"txid mismatch: expected {}, got {}",
			expected_txid, message.id()
		));
	}
	if message.message_type() != MessageType::Response {
		return Err(anyhow!("received a query instead of a response"));
	}
	Ok(message)
}

/// Turn a response into a record set.
///
/// NOERROR keeps the answers of the requested type, so a reply holding only
/// a CNAME is an empty set. Any other rcode is a failure.
pub fn answers_to_record_set(message: &Message, wanted: DnsRecordType) -> RecordSet {
	let rcode = message.response_code();
	if rcode != ResponseCode::NoError {
		return RecordSet::Failure(rcode_message(rcode));
	}
	RecordSet::Values(
		message.answers().iter()
			.filter(|record| record.record_type() == wanted)
			.filter_map(|record| format_rdata(record.data()))
			.collect(),
	)
}

/// Send one query over UDP and wait for the matching response.
///
/// Replies that fail to parse or carry another txid are skipped until the
/// deadline passes.
async fn exchange_udp(
	server: SocketAddr,
	query: &[u8],
	txid: u16,
	timeout: Duration,
) -> Result<Message> {
	let bind_addr = if server.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
	let socket = UdpSocket::bind(bind_addr).await
		.map_err(|e| anyhow!("socket error: {}", e))?;
	// Connected so ICMP errors surface as recv errors
	socket.connect(server).await
		.map_err(|e| anyhow!("{}", e))?;

	let start = Instant::now();
	socket.send(query).await
		.map_err(|e| anyhow!("send failed: {}", e))?;

	let mut buf = vec![0u8; MAX_PAYLOAD as usize];
	loop {
		let remaining = timeout.checked_sub(start.elapsed())
			.ok_or_else(|| anyhow!("timed out"))?;
		match tokio::time::timeout(remaining, socket.recv(&mut buf)).await {
			Ok(Ok(len)) => match parse_response(&buf[..len], txid) {
				Ok(message) => return Ok(message),
				Err(e) => tracing::debug!(%server, "ignoring reply: {}", e),
			},
			Ok(Err(e)) => return Err(anyhow!("{}", e)),
			Err(_) => return Err(anyhow!("timed out")),
		}
	}
}

/// Repeat a truncated query over TCP.
async fn exchange_tcp(
	server: SocketAddr,
	query: &[u8],
	txid: u16,
	timeout: Duration,
) -> Result<Message> {
	let exchange = async {
		let mut stream = TcpStream::connect(server).await?;
		stream.write_all(&(query.len() as u16).to_be_bytes()).await?;
		stream.write_all(query).await?;

		let mut len_buf = [0u8; 2];
		stream.read_exact(&mut len_buf).await?;
		let mut buf = vec![0u8; u16::from_be_bytes(len_buf) as usize];
		stream.read_exact(&mut buf).await?;
		Ok::<_, std::io::Error>(buf)
	};

	let bytes = tokio::time::timeout(timeout, exchange).await
		.map_err(|_| anyhow!("timed out"))?
		.map_err(|e| anyhow!("tcp: {}", e))?;
	parse_response(&bytes, txid)
}

/// Lookups sent straight to one nameserver.
///
/// Every call is one question with no retries and no CNAME chasing; only a
/// truncated UDP reply is repeated over TCP.
pub struct NameserverLookup {
	label: String,
	addr: SocketAddr,
	timeout: Duration,
}

impl NameserverLookup {
	pub fn new(nameserver: &Nameserver, timeout: Duration) -> Self {
		NameserverLookup {
			label: nameserver.label.clone(),
			addr: nameserver.addr,
			timeout,
		}
	}

	async fn query(&self, hostname: &str, wanted: DnsRecordType) -> Result<Message> {
		let txid: u16 = rand::random();
		let query = build_query(hostname, wanted, txid)?;

		let message = exchange_udp(self.addr, &query, txid, self.timeout).await?;
		if message.header().truncated() {
			tracing::debug!(nameserver = %self.label, hostname, "truncated reply, retrying over TCP");
			return exchange_tcp(self.addr, &query, txid, self.timeout).await;
		}
		Ok(message)
	}
}

#[async_trait]
impl RecordLookup for NameserverLookup {
	fn label(&self) -> &str {
		&self.label
	}

	async fn resolve(&self, hostname: &str, record_type: RecordType) -> RecordSet {
		let wanted = wire_type(record_type);
		let result = match self.query(hostname, wanted).await {
			Ok(message) => answers_to_record_set(&message, wanted),
			Err(e) => RecordSet::Failure(e.to_string()),
		};

		match &result {
			RecordSet::Values(values) => tracing::debug!(
				nameserver = %self.label, hostname, %record_type,
				count = values.len(), "lookup answered",
			),
			RecordSet::Failure(message) => tracing::debug!(
				nameserver = %self.label, hostname, %record_type,
				error = %message, "lookup failed",
			),
		}
		result
	}
}
