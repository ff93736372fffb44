// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::ExchangeError;
use crate::exchange::ExchangeResult;
use crate::secret::ServicePayload;

/// Flat `{success, payload, error}` record of an exchange.
///
/// Only constructible from an [`ExchangeResult`], so exactly one of
/// `payload` (non-empty on success) and `error` is meaningful.
#[derive(Debug)]
pub struct ExchangeOutcome {
	success: bool,
	payload: ServicePayload,
	error: Option<ExchangeError>,
}

impl ExchangeOutcome {
	pub fn success(&self) -> bool {
		self.success
	}

	/// The service payload; empty unless [`ExchangeOutcome::success`].
	pub fn payload(&self) -> &ServicePayload {
		&self.payload
	}

	pub fn error(&self) -> Option<&ExchangeError> {
		self.error.as_ref()
	}

	pub fn into_result(self) -> ExchangeResult {
		match self.error {
			Some(err) => Err(err),
			None => Ok(self.payload),
		}
	}
}

impl From<ExchangeResult> for ExchangeOutcome {
	fn from(result: ExchangeResult) -> Self {
		match result {
			Ok(payload) => Self {
				success: true,
				payload,
				error: None,
			},
			Err(err) => Self {
				success: false,
				payload: ServicePayload::new(Vec::new()),
				error: Some(err),
			},
		}
	}
}
