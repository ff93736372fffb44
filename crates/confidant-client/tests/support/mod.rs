// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process collaborators for exchange tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use confidant_client::{Transport, TransportError};
use confidant_kms::{EncryptionContext, KeyManagement, KmsError, KmsResult};

/// One recorded call to the key-management collaborator.
#[derive(Debug, Clone)]
pub struct KmsCall {
	pub key_id: String,
	pub plaintext: Vec<u8>,
	pub context: EncryptionContext,
}

/// Returns a fixed ciphertext (or error) and records every call.
#[derive(Clone)]
pub struct RecordingKms {
	calls: Arc<Mutex<Vec<KmsCall>>>,
	reply: Result<Vec<u8>, String>,
}

impl RecordingKms {
	pub fn returning(ciphertext: &[u8]) -> Self {
		Self {
			calls: Arc::default(),
			reply: Ok(ciphertext.to_vec()),
		}
	}

	pub fn failing(message: &str) -> Self {
		Self {
			calls: Arc::default(),
			reply: Err(message.to_string()),
		}
	}

	pub fn calls(&self) -> Vec<KmsCall> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl KeyManagement for RecordingKms {
	async fn encrypt(
		&self,
		key_id: &str,
		plaintext: &[u8],
		context: &EncryptionContext,
	) -> KmsResult<Vec<u8>> {
		self.calls.lock().unwrap().push(KmsCall {
			key_id: key_id.to_string(),
			plaintext: plaintext.to_vec(),
			context: context.clone(),
		});
		self.reply.clone().map_err(KmsError::Backend)
	}
}

/// What the scripted transport does for one call.
#[derive(Debug, Clone)]
pub enum Reply {
	Status(u16, &'static [u8]),
	Fail,
	Hang,
}

/// One recorded request.
#[derive(Debug, Clone)]
pub struct SentRequest {
	pub method: http::Method,
	pub uri: String,
	pub authorization: Option<String>,
}

/// Replays scripted replies in order and records every request.
#[derive(Clone)]
pub struct ScriptedTransport {
	replies: Arc<Mutex<VecDeque<Reply>>>,
	sent: Arc<Mutex<Vec<SentRequest>>>,
}

impl ScriptedTransport {
	pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
		Self {
			replies: Arc::new(Mutex::new(replies.into_iter().collect())),
			sent: Arc::default(),
		}
	}

	/// Answers every call with `status` and `body`.
	pub fn always(status: u16, body: &'static [u8]) -> Self {
		Self::new(std::iter::repeat(Reply::Status(status, body)).take(1024))
	}

	pub fn sent(&self) -> Vec<SentRequest> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl Transport for ScriptedTransport {
	async fn send(&self, request: http::Request<()>) -> Result<http::Response<Bytes>, TransportError> {
		self.sent.lock().unwrap().push(SentRequest {
			method: request.method().clone(),
			uri: request.uri().to_string(),
			authorization: request
				.headers()
				.get(http::header::AUTHORIZATION)
				.map(|v| v.to_str().unwrap().to_string()),
		});

		let reply = self.replies.lock().unwrap().pop_front();
		match reply {
			Some(Reply::Status(status, body)) => {
				let mut response = http::Response::new(Bytes::from_static(body));
				*response.status_mut() = http::StatusCode::from_u16(status).unwrap();
				Ok(response)
			}
			Some(Reply::Hang) => {
				tokio::time::sleep(Duration::from_secs(30)).await;
				Err(TransportError::Timeout("hung".into()))
			}
			Some(Reply::Fail) | None => Err(TransportError::Connect("connection refused".into())),
		}
	}
}
