// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer token encoding and the `Authorization` header.
//!
//! Confidant reads the caller identity and token as HTTP basic credentials:
//! username is the requesting service, password is the token.

use std::str::FromStr;

use base64::{
	engine::general_purpose::{STANDARD, URL_SAFE},
	Engine,
};
use http::HeaderValue;
use serde::Deserialize;

use crate::secret::SecretString;

/// A minted auth token: the KMS ciphertext, base64url encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(SecretString);

impl BearerToken {
	pub fn from_ciphertext(ciphertext: &[u8]) -> Self {
		Self(SecretString::new(URL_SAFE.encode(ciphertext)))
	}

	pub fn expose(&self) -> &str {
		self.0.expose()
	}
}

impl std::fmt::Display for BearerToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Display::fmt(&self.0, f)
	}
}

/// How identity and token are rendered into the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
	/// RFC 7617: `Basic base64(from:token)`, standard alphabet.
	#[default]
	Basic,
	/// `Basic: base64url(from:token)`, as emitted by older clients. Only
	/// servers with a lenient header parser accept this.
	Legacy,
}

impl AuthScheme {
	/// Render the header value for `from` presenting `token`.
	///
	/// `from` must not contain `:`; the server splits user and password on
	/// the first colon.
	pub fn credentials(&self, from: &str, token: &BearerToken) -> SecretString {
		let pair = format!("{}:{}", from, token.expose());
		let value = match self {
			AuthScheme::Basic => format!("Basic {}", STANDARD.encode(pair.as_bytes())),
			AuthScheme::Legacy => format!("Basic: {}", URL_SAFE.encode(pair.as_bytes())),
		};
		SecretString::new(value)
	}

	/// The credentials as a header value flagged sensitive.
	pub fn header_value(
		&self,
		from: &str,
		token: &BearerToken,
	) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
		let credentials = self.credentials(from, token);
		let mut value = HeaderValue::from_str(credentials.expose())?;
		value.set_sensitive(true);
		Ok(value)
	}
}

impl FromStr for AuthScheme {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"basic" => Ok(AuthScheme::Basic),
			"legacy" => Ok(AuthScheme::Legacy),
			other => Err(format!(
				"unknown auth scheme '{other}' (expected 'basic' or 'legacy')"
			)),
		}
	}
}
