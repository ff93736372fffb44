// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for key-management operations.

use thiserror::Error;

/// Result type alias for key-management operations.
pub type KmsResult<T> = Result<T, KmsError>;

/// Errors returned by a [`KeyManagement`](crate::KeyManagement) backend.
#[derive(Debug, Error)]
pub enum KmsError {
	#[error("key not found: {0}")]
	KeyNotFound(String),

	#[error("invalid key material: {0}")]
	InvalidKey(String),

	#[error("encryption failed: {0}")]
	Encryption(String),

	#[error("decryption failed: {0}")]
	Decryption(String),

	#[error("malformed ciphertext: {0}")]
	MalformedCiphertext(String),

	#[error("key management service returned no ciphertext")]
	EmptyCiphertext,

	#[error("key management backend error: {0}")]
	Backend(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_include_cause() {
		let err = KmsError::KeyNotFound("alias/missing".into());
		assert_eq!(err.to_string(), "key not found: alias/missing");

		let err = KmsError::Backend("AccessDeniedException".into());
		assert!(err.to_string().contains("AccessDeniedException"));
	}
}
