// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::Write;

use anyhow::{Context, Result};
use confidant_client::{
	ExchangeError, ExchangeResult, Exchanger, HttpTransport, ProcessBinding, SecretString,
};
use confidant_kms::{AwsKms, LocalKms};
use tracing::{error, info, warn};

use crate::config::{ConfigError, Settings};
use crate::secret_env::LOCAL_KEY_VAR;

/// Process exit status for an exchange outcome.
///
/// 0 on success, 2 when the service is unknown to Confidant, 3 when the token
/// was rejected, 1 for everything else.
pub fn exit_status(result: &ExchangeResult) -> u8 {
	match result {
		Ok(_) => 0,
		Err(err) => failure_code(err),
	}
}

fn failure_code(err: &ExchangeError) -> u8 {
	match err {
		ExchangeError::NotFound(_) => 2,
		ExchangeError::AuthFailure => 3,
		_ => 1,
	}
}

/// Bind the configured key backend: the local key if one was supplied,
/// AWS KMS otherwise.
pub async fn key_binding(
	settings: &Settings,
	local_key: Option<SecretString>,
) -> Result<ProcessBinding, ConfigError> {
	if let Some(key) = local_key {
		let kms = LocalKms::new()
			.with_base64_key(&settings.request.auth_key, key.expose())
			.map_err(|e| ConfigError::invalid_value(LOCAL_KEY_VAR, e.to_string()))?;
		warn!(key_id = %settings.request.auth_key, "Using local key instead of AWS KMS");
		return Ok(ProcessBinding::new(&settings.region, kms));
	}

	let kms = match &settings.kms_endpoint {
		Some(endpoint) => AwsKms::with_endpoint(&settings.region, endpoint).await,
		None => AwsKms::for_region(&settings.region).await,
	};
	Ok(ProcessBinding::new(&settings.region, kms))
}

/// Run one exchange, write the payload to `out` and return the exit status.
pub async fn fetch(
	settings: &Settings,
	binding: ProcessBinding,
	out: &mut impl Write,
) -> Result<u8> {
	let transport = HttpTransport::new().context("failed to create HTTP client")?;
	let exchanger = Exchanger::bound(binding, transport).with_options(settings.options);

	info!(
		service = %settings.request.from_context,
		url = %settings.request.base_url,
		"Fetching service secrets"
	);

	let result = exchanger.exchange(&settings.request).await;
	match &result {
		Ok(payload) => {
			out.write_all(payload.as_bytes())?;
			out.write_all(b"\n")?;
			out.flush()?;
		}
		Err(err) => error!(error = %err, kind = ?err.kind(), "Exchange failed"),
	}
	Ok(exit_status(&result))
}
