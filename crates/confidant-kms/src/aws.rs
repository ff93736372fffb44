// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! AWS KMS backend.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_kms::{primitives::Blob, Client};
use aws_types::region::Region;
use tracing::{debug, instrument};

use crate::context::EncryptionContext;
use crate::error::{KmsError, KmsResult};
use crate::KeyManagement;

/// Region-scoped AWS KMS client.
#[derive(Clone)]
pub struct AwsKms {
	client: Client,
	region: String,
}

impl AwsKms {
	/// Build a client for `region` using the default credential chain.
	pub async fn for_region(region: impl Into<String>) -> Self {
		Self::load(region.into(), None).await
	}

	/// Build a client for `region` that talks to `endpoint` instead of the
	/// public AWS endpoint (e.g. a localstack instance).
	pub async fn with_endpoint(region: impl Into<String>, endpoint: impl Into<String>) -> Self {
		Self::load(region.into(), Some(endpoint.into())).await
	}

	/// Wrap an already configured SDK client.
	pub fn from_client(client: Client, region: impl Into<String>) -> Self {
		Self {
			client,
			region: region.into(),
		}
	}

	pub fn region(&self) -> &str {
		&self.region
	}

	async fn load(region: String, endpoint: Option<String>) -> Self {
		let shared_config = aws_config::defaults(BehaviorVersion::latest())
			.region(Region::new(region.clone()))
			.load()
			.await;

		let mut builder = aws_sdk_kms::config::Builder::from(&shared_config);
		if let Some(endpoint) = endpoint.as_deref() {
			builder = builder.endpoint_url(endpoint);
		}

		debug!(region = %region, endpoint = ?endpoint, "Configured AWS KMS client");

		Self {
			client: Client::from_conf(builder.build()),
			region,
		}
	}
}

#[async_trait]
impl KeyManagement for AwsKms {
	#[instrument(skip(self, plaintext, context), fields(region = %self.region))]
	async fn encrypt(
		&self,
		key_id: &str,
		plaintext: &[u8],
		context: &EncryptionContext,
	) -> KmsResult<Vec<u8>> {
		let output = self
			.client
			.encrypt()
			.key_id(key_id)
			.plaintext(Blob::new(plaintext.to_vec()))
			.set_encryption_context(Some(context.to_hash_map()))
			.send()
			.await
			.map_err(|err| KmsError::Backend(format!("kms encrypt: {err}")))?;

		output
			.ciphertext_blob()
			.map(|blob| blob.as_ref().to_vec())
			.ok_or(KmsError::EmptyCiphertext)
	}
}

impl std::fmt::Debug for AwsKms {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AwsKms")
			.field("region", &self.region)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn client_is_scoped_to_region() {
		let kms = AwsKms::for_region("us-east-1").await;
		assert_eq!(kms.region(), "us-east-1");
		assert_eq!(format!("{kms:?}"), "AwsKms { region: \"us-east-1\" }");
	}
}
