// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The HTTP collaborator: one request in, one fully buffered response out.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::debug;

use crate::error::TransportError;

/// Sends a single request. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, request: http::Request<()>) -> Result<http::Response<Bytes>, TransportError>;
}

#[async_trait]
impl<T> Transport for std::sync::Arc<T>
where
	T: Transport + ?Sized,
{
	async fn send(&self, request: http::Request<()>) -> Result<http::Response<Bytes>, TransportError> {
		(**self).send(request).await
	}
}

/// Returns the User-Agent sent by [`HttpTransport`].
///
/// Format: `confidant-client/{version}`
pub fn user_agent() -> String {
	format!("confidant-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Creates a reqwest builder with the standard User-Agent and redirects
/// disabled, so credentials are never replayed to another host.
pub fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.redirect(reqwest::redirect::Policy::none())
}

/// Default cap on a buffered response body (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// [`Transport`] backed by reqwest.
///
/// Only `200 OK` bodies are read, up to a size cap; any other status comes
/// back with an empty body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
	max_body_bytes: usize,
}

impl HttpTransport {
	/// A transport with no client-side timeout.
	pub fn new() -> Result<Self, TransportError> {
		Self::from_builder(builder())
	}

	/// A transport whose every request is bounded by `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
		Self::from_builder(builder().timeout(timeout))
	}

	pub fn from_builder(builder: ClientBuilder) -> Result<Self, TransportError> {
		let client = builder
			.build()
			.map_err(|e| TransportError::Request(format!("failed to create HTTP client: {e}")))?;
		Ok(Self::from_client(client))
	}

	/// Wrap an existing client as-is.
	pub fn from_client(client: Client) -> Self {
		Self {
			client,
			max_body_bytes: DEFAULT_MAX_BODY_BYTES,
		}
	}

	pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
		self.max_body_bytes = max_body_bytes;
		self
	}

	async fn read_body(&self, mut response: reqwest::Response) -> Result<Bytes, TransportError> {
		if response
			.content_length()
			.is_some_and(|len| len > self.max_body_bytes as u64)
		{
			return Err(self.too_large());
		}

		let mut body = BytesMut::new();
		while let Some(chunk) = response
			.chunk()
			.await
			.map_err(|e| TransportError::Body(e.to_string()))?
		{
			if body.len() + chunk.len() > self.max_body_bytes {
				return Err(self.too_large());
			}
			body.extend_from_slice(&chunk);
		}
		Ok(body.freeze())
	}

	fn too_large(&self) -> TransportError {
		TransportError::Body(format!(
			"response body exceeds {} bytes",
			self.max_body_bytes
		))
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, request: http::Request<()>) -> Result<http::Response<Bytes>, TransportError> {
		let (parts, ()) = request.into_parts();

		let response = self
			.client
			.request(parts.method, parts.uri.to_string())
			.headers(parts.headers)
			.send()
			.await?;

		let status = response.status();
		let headers = response.headers().clone();
		let body = if status == StatusCode::OK {
			self.read_body(response).await?
		} else {
			Bytes::new()
		};

		debug!(status = %status, len = body.len(), "Received response");

		let mut out = http::Response::new(body);
		*out.status_mut() = status;
		*out.headers_mut() = headers;
		Ok(out)
	}
}
