// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use url::Url;

use crate::error::ExchangeError;

/// `{base_url}/v1/services/{service}`, with `service` as one encoded segment.
///
/// Any path already on `base_url` is kept; a trailing slash is not doubled.
/// `.` and `..` are refused: URL normalization would resolve them away.
pub fn service_url(base_url: &str, service: &str) -> Result<Url, ExchangeError> {
	let construction = |reason: String| ExchangeError::RequestConstruction {
		base_url: base_url.to_string(),
		reason,
	};

	if matches!(service, "." | "..") {
		return Err(construction(format!(
			"service name '{service}' is a dot segment"
		)));
	}

	let mut url = Url::parse(base_url).map_err(|e| construction(e.to_string()))?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(construction(format!(
			"unsupported scheme '{}'",
			url.scheme()
		)));
	}

	url.set_query(None);
	url.set_fragment(None);
	url
		.path_segments_mut()
		.map_err(|()| construction("URL cannot be a base".to_string()))?
		.pop_if_empty()
		.extend(["v1", "services", service]);

	Ok(url)
}
