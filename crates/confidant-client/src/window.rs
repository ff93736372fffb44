// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token validity window and its encrypted payload form.

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use serde::Serialize;

use crate::error::ExchangeError;

/// Fixed-width UTC timestamp format used inside the token payload.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Years `%Y` renders as exactly four digits.
const FOUR_DIGIT_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// The interval a token is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
	pub not_before: DateTime<Utc>,
	pub not_after: DateTime<Utc>,
}

#[derive(Serialize)]
struct TokenPayload {
	not_before: String,
	not_after: String,
}

impl ValidityWindow {
	/// A window opening at `now` and closing `lifetime_minutes` later.
	///
	/// Zero and negative lifetimes are allowed; the server decides what to do
	/// with an empty or inverted window.
	pub fn starting_at(now: DateTime<Utc>, lifetime_minutes: i64) -> Result<Self, ExchangeError> {
		let lifetime = TimeDelta::try_minutes(lifetime_minutes).ok_or_else(|| {
			ExchangeError::PayloadSerialization(format!(
				"token lifetime of {lifetime_minutes} minutes is out of range"
			))
		})?;
		let not_after = now.checked_add_signed(lifetime).ok_or_else(|| {
			ExchangeError::PayloadSerialization(format!(
				"token lifetime of {lifetime_minutes} minutes overflows the calendar"
			))
		})?;

		for (field, instant) in [("not_before", now), ("not_after", not_after)] {
			if !FOUR_DIGIT_YEARS.contains(&instant.year()) {
				return Err(ExchangeError::PayloadSerialization(format!(
					"{field} year {} does not fit a four-digit timestamp",
					instant.year()
				)));
			}
		}

		Ok(Self {
			not_before: now,
			not_after,
		})
	}

	/// Serialize to the JSON payload that gets encrypted into the token.
	pub fn to_payload(&self) -> Result<Vec<u8>, ExchangeError> {
		let payload = TokenPayload {
			not_before: self.not_before.format(TIMESTAMP_FORMAT).to_string(),
			not_after: self.not_after.format(TIMESTAMP_FORMAT).to_string(),
		};
		serde_json::to_vec(&payload).map_err(|e| ExchangeError::PayloadSerialization(e.to_string()))
	}
}
