// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process key management using AES-256-GCM.
//!
//! Suitable for development, local stand-in servers and tests. The encryption
//! context is passed as associated data, so a ciphertext only opens under the
//! exact context it was minted with.

use std::collections::HashMap;

use aes_gcm::{
	aead::{Aead, KeyInit, OsRng, Payload},
	Aes256Gcm, Key, Nonce,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroizing;

use crate::context::EncryptionContext;
use crate::error::{KmsError, KmsResult};
use crate::KeyManagement;

/// Size of keys in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes.
const NONCE_SIZE: usize = 12;

/// Leading byte of every ciphertext blob.
const BLOB_VERSION: u8 = 1;

/// Software key backend holding named keys in memory.
#[derive(Default)]
pub struct LocalKms {
	keys: HashMap<String, Zeroizing<[u8; KEY_SIZE]>>,
}

impl LocalKms {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add (or replace) a key under `key_id`.
	pub fn with_key(mut self, key_id: impl Into<String>, key: Zeroizing<[u8; KEY_SIZE]>) -> Self {
		self.keys.insert(key_id.into(), key);
		self
	}

	/// Add a freshly generated random key under `key_id`.
	pub fn with_generated_key(self, key_id: impl Into<String>) -> Self {
		let mut key = Zeroizing::new([0u8; KEY_SIZE]);
		OsRng.fill_bytes(key.as_mut());
		self.with_key(key_id, key)
	}

	/// Add a key given as standard base64.
	pub fn with_base64_key(self, key_id: impl Into<String>, encoded: &str) -> KmsResult<Self> {
		let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
			BASE64
				.decode(encoded.trim().as_bytes())
				.map_err(|e| KmsError::InvalidKey(format!("invalid base64: {e}")))?,
		);

		if bytes.len() != KEY_SIZE {
			return Err(KmsError::InvalidKey(format!(
				"key must be {} bytes, got {}",
				KEY_SIZE,
				bytes.len()
			)));
		}

		let mut key = Zeroizing::new([0u8; KEY_SIZE]);
		key.copy_from_slice(&bytes);
		Ok(self.with_key(key_id, key))
	}

	pub fn has_key(&self, key_id: &str) -> bool {
		self.keys.contains_key(key_id)
	}

	fn cipher(&self, key_id: &str) -> KmsResult<Aes256Gcm> {
		let key = self
			.keys
			.get(key_id)
			.ok_or_else(|| KmsError::KeyNotFound(key_id.to_string()))?;
		Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice())))
	}

	fn seal(&self, key_id: &str, plaintext: &[u8], context: &EncryptionContext) -> KmsResult<Vec<u8>> {
		let cipher = self.cipher(key_id)?;

		let mut nonce_bytes = [0u8; NONCE_SIZE];
		OsRng.fill_bytes(&mut nonce_bytes);
		let aad = context.to_aad();

		let sealed = cipher
			.encrypt(
				Nonce::from_slice(&nonce_bytes),
				Payload {
					msg: plaintext,
					aad: &aad,
				},
			)
			.map_err(|e| KmsError::Encryption(e.to_string()))?;

		let mut blob = Vec::with_capacity(1 + NONCE_SIZE + sealed.len());
		blob.push(BLOB_VERSION);
		blob.extend_from_slice(&nonce_bytes);
		blob.extend_from_slice(&sealed);
		Ok(blob)
	}

	/// Open a blob produced by [`KeyManagement::encrypt`].
	///
	/// Fails unless `context` is identical to the one used when encrypting.
	pub fn decrypt(
		&self,
		key_id: &str,
		blob: &[u8],
		context: &EncryptionContext,
	) -> KmsResult<Zeroizing<Vec<u8>>> {
		let (version, rest) = blob
			.split_first()
			.ok_or_else(|| KmsError::MalformedCiphertext("empty blob".into()))?;
		if *version != BLOB_VERSION {
			return Err(KmsError::MalformedCiphertext(format!(
				"unsupported blob version {version}"
			)));
		}
		if rest.len() < NONCE_SIZE {
			return Err(KmsError::MalformedCiphertext("blob shorter than nonce".into()));
		}
		let (nonce, sealed) = rest.split_at(NONCE_SIZE);

		let cipher = self.cipher(key_id)?;
		let aad = context.to_aad();
		let plaintext = cipher
			.decrypt(
				Nonce::from_slice(nonce),
				Payload {
					msg: sealed,
					aad: &aad,
				},
			)
			.map_err(|e| KmsError::Decryption(e.to_string()))?;

		Ok(Zeroizing::new(plaintext))
	}
}

#[async_trait]
impl KeyManagement for LocalKms {
	async fn encrypt(
		&self,
		key_id: &str,
		plaintext: &[u8],
		context: &EncryptionContext,
	) -> KmsResult<Vec<u8>> {
		let blob = self.seal(key_id, plaintext, context)?;
		debug!(key_id, len = blob.len(), "sealed payload with local key");
		Ok(blob)
	}
}

impl std::fmt::Debug for LocalKms {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut key_ids: Vec<&str> = self.keys.keys().map(String::as_str).collect();
		key_ids.sort_unstable();
		f.debug_struct("LocalKms")
			.field("key_ids", &key_ids)
			.field("keys", &"[REDACTED]")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const KEY_ID: &str = "alias/authnz-testing";

	fn kms() -> LocalKms {
		LocalKms::new().with_generated_key(KEY_ID)
	}

	#[tokio::test]
	async fn encrypt_then_decrypt_with_same_context() {
		let kms = kms();
		let context = EncryptionContext::between("app1", "confidant");

		let blob = kms.encrypt(KEY_ID, b"payload", &context).await.unwrap();
		let opened = kms.decrypt(KEY_ID, &blob, &context).unwrap();

		assert_eq!(opened.as_slice(), b"payload");
	}

	#[tokio::test]
	async fn different_receiver_is_rejected() {
		let kms = kms();
		let minted = EncryptionContext::between("app1", "confidant");
		let other = EncryptionContext::between("app1", "someone-else");

		let blob = kms.encrypt(KEY_ID, b"payload", &minted).await.unwrap();
		let result = kms.decrypt(KEY_ID, &blob, &other);

		assert!(matches!(result, Err(KmsError::Decryption(_))));
	}

	#[tokio::test]
	async fn unknown_key_is_reported() {
		let kms = kms();
		let context = EncryptionContext::between("a", "b");

		let result = kms.encrypt("alias/nope", b"x", &context).await;

		assert!(matches!(result, Err(KmsError::KeyNotFound(id)) if id == "alias/nope"));
	}

	#[tokio::test]
	async fn fresh_nonce_per_call() {
		let kms = kms();
		let context = EncryptionContext::between("a", "b");

		let first = kms.encrypt(KEY_ID, b"same", &context).await.unwrap();
		let second = kms.encrypt(KEY_ID, b"same", &context).await.unwrap();

		assert_ne!(first, second);
	}

	#[test]
	fn truncated_blob_is_malformed() {
		let kms = kms();
		let context = EncryptionContext::between("a", "b");

		assert!(matches!(
			kms.decrypt(KEY_ID, &[], &context),
			Err(KmsError::MalformedCiphertext(_))
		));
		assert!(matches!(
			kms.decrypt(KEY_ID, &[BLOB_VERSION, 1, 2], &context),
			Err(KmsError::MalformedCiphertext(_))
		));
		assert!(matches!(
			kms.decrypt(KEY_ID, &[9; 40], &context),
			Err(KmsError::MalformedCiphertext(_))
		));
	}

	#[test]
	fn base64_key_must_be_32_bytes() {
		let short = BASE64.encode([7u8; 16]);
		assert!(matches!(
			LocalKms::new().with_base64_key(KEY_ID, &short),
			Err(KmsError::InvalidKey(_))
		));

		let bad = "not base64!";
		assert!(matches!(
			LocalKms::new().with_base64_key(KEY_ID, bad),
			Err(KmsError::InvalidKey(_))
		));

		let good = BASE64.encode([7u8; KEY_SIZE]);
		let kms = LocalKms::new().with_base64_key(KEY_ID, &good).unwrap();
		assert!(kms.has_key(KEY_ID));
	}

	#[test]
	fn debug_does_not_leak_keys() {
		let key = Zeroizing::new([0xAB; KEY_SIZE]);
		let kms = LocalKms::new().with_key(KEY_ID, key);
		let debug = format!("{kms:?}");

		assert!(debug.contains(KEY_ID));
		assert!(debug.contains("[REDACTED]"));
		assert!(!debug.contains("171"));
	}

	proptest! {
		#[test]
		fn roundtrips_arbitrary_payloads(
			payload in proptest::collection::vec(any::<u8>(), 0..256),
			from in "[a-z0-9-]{0,12}",
			to in "[a-z0-9-]{0,12}",
		) {
			let kms = kms();
			let context = EncryptionContext::between(from, to);
			let blob = kms.seal(KEY_ID, &payload, &context).unwrap();
			let opened = kms.decrypt(KEY_ID, &blob, &context).unwrap();
			prop_assert_eq!(opened.as_slice(), payload.as_slice());
		}
	}
}
