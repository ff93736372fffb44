// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the token exchange.

use confidant_kms::KmsError;
use thiserror::Error;

/// Errors a transport can report. None of them are retried.
#[derive(Debug, Error)]
pub enum TransportError {
	#[error("request timed out: {0}")]
	Timeout(String),

	#[error("connection failed: {0}")]
	Connect(String),

	#[error("request failed: {0}")]
	Request(String),

	#[error("failed to read response body: {0}")]
	Body(String),
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			TransportError::Timeout(err.to_string())
		} else if err.is_connect() {
			TransportError::Connect(err.to_string())
		} else if err.is_body() || err.is_decode() {
			TransportError::Body(err.to_string())
		} else {
			TransportError::Request(err.to_string())
		}
	}
}

/// Every way an exchange can end without a payload.
///
/// All variants are terminal for the call; retrying is the caller's decision.
#[derive(Debug, Error)]
pub enum ExchangeError {
	#[error("key management client has not been initialized")]
	Uninitialized,

	#[error("failed to build token payload: {0}")]
	PayloadSerialization(String),

	#[error("failed to encrypt token payload: {0}")]
	Crypto(#[source] KmsError),

	#[error("failed to build request to {base_url}: {reason}")]
	RequestConstruction { base_url: String, reason: String },

	#[error("failed to make the request to confidant: {0}")]
	Transport(#[from] TransportError),

	#[error("service not found in confidant: {0}")]
	NotFound(String),

	#[error("authentication or authorization failed")]
	AuthFailure,

	#[error("failed to decode response from confidant: {0}")]
	Decode(String),

	#[error("received unexpected response from confidant (status: {0})")]
	UnexpectedStatus(u16),
}

/// Flat classification of [`ExchangeError`] for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeErrorKind {
	Uninitialized,
	PayloadSerializationFailure,
	CryptoFailure,
	RequestConstructionFailure,
	TransportFailure,
	NotFound,
	AuthFailure,
	DecodeFailure,
	UnexpectedStatus(u16),
}

impl ExchangeError {
	pub fn kind(&self) -> ExchangeErrorKind {
		match self {
			ExchangeError::Uninitialized => ExchangeErrorKind::Uninitialized,
			ExchangeError::PayloadSerialization(_) => ExchangeErrorKind::PayloadSerializationFailure,
			ExchangeError::Crypto(_) => ExchangeErrorKind::CryptoFailure,
			ExchangeError::RequestConstruction { .. } => ExchangeErrorKind::RequestConstructionFailure,
			ExchangeError::Transport(_) => ExchangeErrorKind::TransportFailure,
			ExchangeError::NotFound(_) => ExchangeErrorKind::NotFound,
			ExchangeError::AuthFailure => ExchangeErrorKind::AuthFailure,
			ExchangeError::Decode(_) => ExchangeErrorKind::DecodeFailure,
			ExchangeError::UnexpectedStatus(code) => ExchangeErrorKind::UnexpectedStatus(*code),
		}
	}

	/// Whether a later attempt might succeed without configuration changes.
	///
	/// A missing service and a rejected credential are not transient.
	pub fn is_transient(&self) -> bool {
		matches!(
			self,
			ExchangeError::Transport(_) | ExchangeError::UnexpectedStatus(_)
		)
	}

	/// The HTTP status that produced this error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			ExchangeError::NotFound(_) => Some(404),
			ExchangeError::AuthFailure => Some(401),
			ExchangeError::UnexpectedStatus(code) => Some(*code),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn not_found_and_auth_are_not_transient() {
		assert!(!ExchangeError::NotFound("svc".into()).is_transient());
		assert!(!ExchangeError::AuthFailure.is_transient());
		assert!(!ExchangeError::Uninitialized.is_transient());
	}

	#[test]
	fn transport_and_server_conditions_are_transient() {
		assert!(ExchangeError::Transport(TransportError::Connect("refused".into())).is_transient());
		assert!(ExchangeError::UnexpectedStatus(503).is_transient());
	}

	#[test]
	fn unexpected_status_keeps_code() {
		let err = ExchangeError::UnexpectedStatus(500);
		assert_eq!(err.kind(), ExchangeErrorKind::UnexpectedStatus(500));
		assert_eq!(err.status(), Some(500));
		assert!(err.to_string().contains("500"));
	}

	#[test]
	fn crypto_failure_wraps_cause() {
		let err = ExchangeError::Crypto(KmsError::KeyNotFound("alias/x".into()));
		assert_eq!(err.kind(), ExchangeErrorKind::CryptoFailure);
		assert!(err.to_string().contains("alias/x"));
		assert!(std::error::Error::source(&err).is_some());
	}
}
