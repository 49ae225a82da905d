use thiserror::Error;

/// Input problems detected before any comparison query is sent
#[derive(Debug, Error)]
pub enum InputError {
	#[error("domain must not be empty")]
	EmptyDomain,

	#[error("{0} nameserver must not be empty")]
	EmptyNameserver(&'static str),

	#[error("invalid nameserver address '{input}': {reason}")]
	InvalidNameserver { input: String, reason: String },

	#[error("could not resolve nameserver host '{host}': {reason}")]
	UnresolvableNameserver { host: String, reason: String },
}
