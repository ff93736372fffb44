// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authenticated encryption context.

use std::collections::{BTreeMap, HashMap};

/// Context key naming the requesting service.
pub const FROM_KEY: &str = "from";

/// Context key naming the receiving server.
pub const TO_KEY: &str = "to";

/// String pairs bound to a ciphertext as authenticated data.
///
/// Entries are kept sorted so the canonical byte form is stable regardless of
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptionContext {
	entries: BTreeMap<String, String>,
}

impl EncryptionContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// The `{from, to}` context used for service auth tokens.
	pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
		let mut context = Self::new();
		context.insert(FROM_KEY, from);
		context.insert(TO_KEY, to);
		context
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.entries.insert(key.into(), value.into());
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.get(key).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Canonical byte form: a JSON object with sorted keys.
	pub fn to_aad(&self) -> Vec<u8> {
		// A BTreeMap<String, String> always serializes.
		serde_json::to_vec(&self.entries).unwrap_or_default()
	}

	pub fn to_hash_map(&self) -> HashMap<String, String> {
		self
			.entries
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}
}

impl<K, V> FromIterator<(K, V)> for EncryptionContext
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut context = Self::new();
		for (k, v) in iter {
			context.insert(k, v);
		}
		context
	}
}
