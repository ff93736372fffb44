// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use confidant_cli::{Args, ConfigError, Settings};
use confidant_client::AuthScheme;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(content.as_bytes()).unwrap();
	file
}

/// Verifies that `--config` supplies defaults and flags override them.
#[test]
fn flags_override_config_file() {
	let file = config_file(
		r#"
		region = "us-east-1"
		auth_key = "alias/authnz-production"
		from = "app1"
		to = "confidant-production"
		url = "https://confidant.example.com"
		token_lifetime = 10
		timeout_secs = 30
		"#,
	);

	let args = Args::try_parse_from([
		"confidant-get",
		"--config",
		file.path().to_str().unwrap(),
		"--to",
		"confidant-staging",
		"--auth-scheme",
		"legacy",
	])
	.unwrap();

	let settings = Settings::load(&args).unwrap();

	assert_eq!(settings.region, "us-east-1");
	assert_eq!(settings.request.auth_key, "alias/authnz-production");
	assert_eq!(settings.request.from_context, "app1");
	assert_eq!(settings.request.to_context, "confidant-staging");
	assert_eq!(settings.request.token_life_minutes, 10);
	assert_eq!(settings.options.auth_scheme, AuthScheme::Legacy);
	assert_eq!(settings.options.timeout, Some(Duration::from_secs(30)));
}

/// Verifies that an unreadable config file is reported with its path.
#[test]
fn missing_config_file_is_io_error() {
	let args = Args::try_parse_from(["confidant-get", "--config", "/nonexistent/confidant.toml"]).unwrap();

	let err = Settings::load(&args).unwrap_err();

	assert!(matches!(err, ConfigError::Io { .. }));
	assert!(err.to_string().contains("/nonexistent/confidant.toml"));
}

/// Verifies that a file lacking a required key names that key.
#[test]
fn incomplete_config_file_names_missing_field() {
	let file = config_file(
		r#"
		region = "us-east-1"
		from = "app1"
		to = "confidant"
		url = "https://c.example"
		token_lifetime = 5
		"#,
	);
	let args = Args::try_parse_from([
		"confidant-get",
		"--config",
		file.path().to_str().unwrap(),
	])
	.unwrap();

	let err = Settings::load(&args).unwrap_err();

	assert!(matches!(err, ConfigError::MissingField(field) if field == "auth_key"));
}
