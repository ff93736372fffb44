// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token exchange engine.

use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use confidant_kms::{EncryptionContext, ProcessBinding};
use http::header::{ACCEPT, AUTHORIZATION};
use http::{Method, StatusCode};
use serde::de::IgnoredAny;
use tracing::{debug, instrument, warn};

use crate::endpoint::service_url;
use crate::error::{ExchangeError, TransportError};
use crate::request::ExchangeRequest;
use crate::secret::ServicePayload;
use crate::token::{AuthScheme, BearerToken};
use crate::transport::{HttpTransport, Transport};
use crate::window::ValidityWindow;

/// Outcome of one exchange: the service payload or the reason there is none.
pub type ExchangeResult = Result<ServicePayload, ExchangeError>;

/// Per-engine knobs that are not part of a single request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeOptions {
	/// How identity and token are written into the `Authorization` header.
	pub auth_scheme: AuthScheme,
	/// Upper bound on the HTTP call. `None` leaves it to the transport.
	pub timeout: Option<Duration>,
}

/// Mints auth tokens and exchanges them for a service's secrets.
///
/// Starts unbound; every exchange fails with
/// [`ExchangeError::Uninitialized`] until [`Exchanger::initialize`] installs
/// a key-management binding. Once bound, `&Exchanger` can be shared freely
/// across tasks.
pub struct Exchanger<T = HttpTransport> {
	binding: Option<ProcessBinding>,
	transport: T,
	options: ExchangeOptions,
}

impl<T: Transport> Exchanger<T> {
	pub fn new(transport: T) -> Self {
		Self {
			binding: None,
			transport,
			options: ExchangeOptions::default(),
		}
	}

	pub fn bound(binding: ProcessBinding, transport: T) -> Self {
		let mut exchanger = Self::new(transport);
		exchanger.initialize(binding);
		exchanger
	}

	pub fn with_options(mut self, options: ExchangeOptions) -> Self {
		self.options = options;
		self
	}

	/// Install the key-management binding, replacing any previous one.
	pub fn initialize(&mut self, binding: ProcessBinding) {
		if let Some(previous) = self.binding.replace(binding) {
			debug!(previous_region = %previous.region(), "Replaced key management binding");
		}
	}

	pub fn is_initialized(&self) -> bool {
		self.binding.is_some()
	}

	pub fn binding(&self) -> Option<&ProcessBinding> {
		self.binding.as_ref()
	}

	pub fn options(&self) -> &ExchangeOptions {
		&self.options
	}

	/// Build the validity window, encrypt it under the request's key and
	/// identities, and encode the result as a bearer token.
	pub async fn mint_token(&self, request: &ExchangeRequest) -> Result<BearerToken, ExchangeError> {
		let binding = self.binding.as_ref().ok_or(ExchangeError::Uninitialized)?;

		let window = ValidityWindow::starting_at(Utc::now(), request.token_life_minutes)?;
		let payload = window.to_payload()?;
		let context = EncryptionContext::between(&request.from_context, &request.to_context);

		let ciphertext = binding
			.key_management()
			.encrypt(&request.auth_key, &payload, &context)
			.await
			.map_err(ExchangeError::Crypto)?;

		debug!(
			not_after = %window.not_after,
			ciphertext_len = ciphertext.len(),
			"Minted auth token"
		);

		Ok(BearerToken::from_ciphertext(&ciphertext))
	}

	/// Mint a token and fetch the requesting service's secrets with it.
	///
	/// Makes at most one key-management call and one HTTP call, in that order,
	/// and never retries.
	#[instrument(
		skip(self, request),
		fields(service = %request.from_context, server = %request.to_context)
	)]
	pub async fn exchange(&self, request: &ExchangeRequest) -> ExchangeResult {
		let token = self.mint_token(request).await?;

		let url = service_url(&request.base_url, &request.from_context)?;
		if request.from_context.contains(':') {
			return Err(ExchangeError::RequestConstruction {
				base_url: request.base_url.clone(),
				reason: format!(
					"service name '{}' contains ':' and cannot be sent as a basic auth user",
					request.from_context
				),
			});
		}
		let authorization = self
			.options
			.auth_scheme
			.header_value(&request.from_context, &token)
			.map_err(|e| ExchangeError::RequestConstruction {
				base_url: request.base_url.clone(),
				reason: format!("invalid authorization header: {e}"),
			})?;

		let http_request = http::Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(AUTHORIZATION, authorization)
			.header(ACCEPT, "application/json")
			.body(())
			.map_err(|e| ExchangeError::RequestConstruction {
				base_url: request.base_url.clone(),
				reason: e.to_string(),
			})?;

		debug!(url = %url, "Fetching service from confidant");

		let response = self.send(http_request).await?;
		classify(&request.from_context, response.status(), response.into_body())
	}

	async fn send(&self, request: http::Request<()>) -> Result<http::Response<Bytes>, TransportError> {
		match self.options.timeout {
			Some(limit) => tokio::time::timeout(limit, self.transport.send(request))
				.await
				.map_err(|_| TransportError::Timeout(format!("no response within {limit:?}")))?,
			None => self.transport.send(request).await,
		}
	}
}

impl<T> std::fmt::Debug for Exchanger<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Exchanger")
			.field("binding", &self.binding)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

/// Map a Confidant response onto the exchange outcome.
fn classify(service: &str, status: StatusCode, body: Bytes) -> ExchangeResult {
	match status {
		StatusCode::OK => {
			serde_json::from_slice::<IgnoredAny>(&body)
				.map_err(|e| ExchangeError::Decode(e.to_string()))?;
			Ok(ServicePayload::new(body.to_vec()))
		}
		StatusCode::NOT_FOUND => Err(ExchangeError::NotFound(service.to_string())),
		StatusCode::UNAUTHORIZED => {
			warn!(service, "Confidant rejected the auth token");
			Err(ExchangeError::AuthFailure)
		}
		other => Err(ExchangeError::UnexpectedStatus(other.as_u16())),
	}
}
