// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Region-scoped key-management binding.

use std::sync::Arc;

use crate::KeyManagement;

/// A key-management client bound to one region.
///
/// Built once at startup and then only read. Cloning shares the same client,
/// so one binding can serve any number of concurrent exchanges.
#[derive(Clone)]
pub struct ProcessBinding {
	region: String,
	kms: Arc<dyn KeyManagement>,
}

impl ProcessBinding {
	/// Bind to AWS KMS in `region`.
	///
	/// Never fails: credential and connectivity problems surface on the first
	/// encryption call.
	#[cfg(feature = "aws")]
	pub async fn initialize(region: impl Into<String>) -> Self {
		let region = region.into();
		let kms = crate::AwsKms::for_region(region.clone()).await;
		tracing::info!(region = %region, "Initialized AWS KMS binding");
		Self::new(region, kms)
	}

	/// Bind an arbitrary backend to `region`.
	pub fn new(region: impl Into<String>, kms: impl KeyManagement + 'static) -> Self {
		Self {
			region: region.into(),
			kms: Arc::new(kms),
		}
	}

	/// Bind an already shared backend to `region`.
	pub fn from_shared(region: impl Into<String>, kms: Arc<dyn KeyManagement>) -> Self {
		Self {
			region: region.into(),
			kms,
		}
	}

	pub fn region(&self) -> &str {
		&self.region
	}

	pub fn key_management(&self) -> &dyn KeyManagement {
		self.kms.as_ref()
	}
}

impl std::fmt::Debug for ProcessBinding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProcessBinding")
			.field("region", &self.region)
			.finish_non_exhaustive()
	}
}
