// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

/// Everything one exchange needs. All fields come from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExchangeRequest {
	/// Token lifetime in minutes.
	pub token_life_minutes: i64,
	/// Key id or alias the token is encrypted under.
	pub auth_key: String,
	/// Requesting service (also the service whose secrets are fetched).
	pub from_context: String,
	/// Identity of the Confidant server the token is minted for.
	pub to_context: String,
	/// Base URL of the Confidant server.
	pub base_url: String,
}

impl ExchangeRequest {
	pub fn new(
		token_life_minutes: i64,
		auth_key: impl Into<String>,
		from_context: impl Into<String>,
		to_context: impl Into<String>,
		base_url: impl Into<String>,
	) -> Self {
		Self {
			token_life_minutes,
			auth_key: auth_key.into(),
			from_context: from_context.into(),
			to_context: to_context.into(),
			base_url: base_url.into(),
		}
	}
}
