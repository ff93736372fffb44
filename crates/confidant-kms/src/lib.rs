// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Key-management collaborators for minting Confidant auth tokens.
//!
//! A token is a small payload encrypted under a named key with an
//! authenticated encryption context (`from` / `to`). This crate provides:
//!
//! - [`KeyManagement`]: the encryption primitive the token exchange needs
//! - [`LocalKms`]: an in-process AES-256-GCM backend for development and tests
//! - `AwsKms`: AWS KMS, region-scoped (feature `aws`, on by default)
//! - [`ProcessBinding`]: a region plus the client bound to it
//!
//! # Example
//!
//! ```ignore
//! use confidant_kms::{EncryptionContext, ProcessBinding};
//!
//! let binding = ProcessBinding::initialize("us-east-1").await;
//! let context = EncryptionContext::between("my-service", "confidant-production");
//! let blob = binding
//!     .key_management()
//!     .encrypt("alias/authnz", b"{}", &context)
//!     .await?;
//! ```

#[cfg(feature = "aws")]
mod aws;
mod binding;
mod context;
mod error;
mod local;

use async_trait::async_trait;

#[cfg(feature = "aws")]
pub use aws::AwsKms;
pub use binding::ProcessBinding;
pub use context::{EncryptionContext, FROM_KEY, TO_KEY};
pub use error::{KmsError, KmsResult};
pub use local::{LocalKms, KEY_SIZE};

/// Envelope encryption under a named key, bound to an encryption context.
///
/// A ciphertext produced for one context must not decrypt under another,
/// even with the same key.
#[async_trait]
pub trait KeyManagement: Send + Sync {
	/// Encrypt `plaintext` under `key_id` with `context` as authenticated data.
	async fn encrypt(
		&self,
		key_id: &str,
		plaintext: &[u8],
		context: &EncryptionContext,
	) -> KmsResult<Vec<u8>>;
}

#[async_trait]
impl<T> KeyManagement for std::sync::Arc<T>
where
	T: KeyManagement + ?Sized,
{
	async fn encrypt(
		&self,
		key_id: &str,
		plaintext: &[u8],
		context: &EncryptionContext,
	) -> KmsResult<Vec<u8>> {
		(**self).encrypt(key_id, plaintext, context).await
	}
}
