// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrappers for tokens and secret-bearing payloads.
//!
//! Both types print `[REDACTED]` through `Debug` and `Display`, so they are
//! safe to hand to `tracing` fields, and both zero their memory on drop.

use std::fmt;

use serde::de::DeserializeOwned;
use zeroize::Zeroize;

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

/// A string that must not appear in logs.
///
/// There is no `Deref`; call [`SecretString::expose`] to read it.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct SecretString {
	inner: String,
}

impl SecretString {
	pub fn new(inner: impl Into<String>) -> Self {
		Self {
			inner: inner.into(),
		}
	}

	pub fn expose(&self) -> &str {
		&self.inner
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SecretString").field(&REDACTED).finish()
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

/// The body of a successful service lookup, captured verbatim.
///
/// The body is known to be well-formed JSON; its shape is left to the caller.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct ServicePayload {
	bytes: Vec<u8>,
}

impl ServicePayload {
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self {
			bytes: bytes.into(),
		}
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Copy the raw body out. The wrapper (and its copy) is still zeroed on drop.
	pub fn to_vec(&self) -> Vec<u8> {
		self.bytes.clone()
	}

	/// Take ownership of the raw body. Zeroizing it becomes the caller's job.
	pub fn into_bytes(mut self) -> Vec<u8> {
		std::mem::take(&mut self.bytes)
	}

	/// Deserialize the body into a caller-chosen shape.
	pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
		serde_json::from_slice(&self.bytes)
	}
}

impl fmt::Debug for ServicePayload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServicePayload")
			.field("len", &self.bytes.len())
			.field("bytes", &REDACTED)
			.finish()
	}
}

impl fmt::Display for ServicePayload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}
