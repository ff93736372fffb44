// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command line arguments, the optional TOML file, and how they merge.
//!
//! Every argument can also come from a `CONFIDANT_*` environment variable.
//! Values given on the command line or in the environment win over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use confidant_client::{AuthScheme, ExchangeOptions, ExchangeRequest};
use serde::Deserialize;
use tracing::debug;

/// Errors that can occur while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// Config file could not be read
	#[error("failed to read config file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// TOML parsing error
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// Missing required field
	#[error("missing required field: {0} (set --{flag} or CONFIDANT_{env})", flag = .0.replace('_', "-"), env = .0.to_uppercase())]
	MissingField(String),

	/// Invalid value
	#[error("invalid value for {field}: {message}")]
	InvalidValue { field: String, message: String },
}

impl ConfigError {
	pub fn missing_field(field: impl Into<String>) -> Self {
		Self::MissingField(field.into())
	}

	pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			message: message.into(),
		}
	}
}

/// How log lines are written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
	#[default]
	Pretty,
	Json,
}

/// confidant-get - fetch one service's secrets from Confidant.
#[derive(Parser, Debug, Default)]
#[command(name = "confidant-get", about = "Fetch a service's secrets from Confidant", version)]
pub struct Args {
	/// TOML file with defaults for any of the options below
	#[arg(long, env = "CONFIDANT_CONFIG")]
	pub config: Option<PathBuf>,

	/// AWS region of the KMS key
	#[arg(long, env = "CONFIDANT_REGION")]
	pub region: Option<String>,

	/// KMS key id or alias the token is encrypted under
	#[arg(long, env = "CONFIDANT_AUTH_KEY")]
	pub auth_key: Option<String>,

	/// Name of this service, as known to Confidant
	#[arg(long, env = "CONFIDANT_FROM")]
	pub from: Option<String>,

	/// Identity of the Confidant server
	#[arg(long, env = "CONFIDANT_TO")]
	pub to: Option<String>,

	/// Base URL of the Confidant server
	#[arg(long, env = "CONFIDANT_URL")]
	pub url: Option<String>,

	/// Token lifetime in minutes
	#[arg(long, env = "CONFIDANT_TOKEN_LIFETIME", allow_negative_numbers = true)]
	pub token_lifetime: Option<i64>,

	/// Authorization header form: basic or legacy
	#[arg(long, env = "CONFIDANT_AUTH_SCHEME")]
	pub auth_scheme: Option<AuthScheme>,

	/// Give up on the HTTP call after this many seconds
	#[arg(long, env = "CONFIDANT_TIMEOUT_SECS")]
	pub timeout_secs: Option<u64>,

	/// Talk to this KMS endpoint instead of the public AWS one
	#[arg(long, env = "CONFIDANT_KMS_ENDPOINT")]
	pub kms_endpoint: Option<String>,

	/// Log output format
	#[arg(long, env = "CONFIDANT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
	pub log_format: LogFormat,
}

/// Contents of the `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
	pub region: Option<String>,
	pub auth_key: Option<String>,
	pub from: Option<String>,
	pub to: Option<String>,
	pub url: Option<String>,
	pub token_lifetime: Option<i64>,
	pub auth_scheme: Option<AuthScheme>,
	pub timeout_secs: Option<u64>,
	pub kms_endpoint: Option<String>,
}

impl FileConfig {
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(path, &content)
	}

	fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|source| ConfigError::TomlParse {
			path: path.to_path_buf(),
			source,
		})
	}
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub region: String,
	pub kms_endpoint: Option<String>,
	pub request: ExchangeRequest,
	pub options: ExchangeOptions,
}

impl Settings {
	/// Read the `--config` file if one was given, then merge.
	pub fn load(args: &Args) -> Result<Self, ConfigError> {
		let file = match &args.config {
			Some(path) => {
				debug!(path = %path.display(), "Loading config file");
				FileConfig::load(path)?
			}
			None => FileConfig::default(),
		};
		Self::resolve(args, file)
	}

	/// Merge arguments over file values and check required fields.
	pub fn resolve(args: &Args, file: FileConfig) -> Result<Self, ConfigError> {
		let region = required("region", args.region.clone().or(file.region))?;
		let auth_key = required("auth_key", args.auth_key.clone().or(file.auth_key))?;
		let from = required("from", args.from.clone().or(file.from))?;
		let to = required("to", args.to.clone().or(file.to))?;
		let url = required("url", args.url.clone().or(file.url))?;
		let token_lifetime = args
			.token_lifetime
			.or(file.token_lifetime)
			.ok_or_else(|| ConfigError::missing_field("token_lifetime"))?;

		let timeout = match args.timeout_secs.or(file.timeout_secs) {
			Some(0) => return Err(ConfigError::invalid_value("timeout_secs", "must be at least 1")),
			Some(secs) => Some(Duration::from_secs(secs)),
			None => None,
		};

		Ok(Self {
			region,
			kms_endpoint: args.kms_endpoint.clone().or(file.kms_endpoint),
			request: ExchangeRequest::new(token_lifetime, auth_key, from, to, url),
			options: ExchangeOptions {
				auth_scheme: args.auth_scheme.or(file.auth_scheme).unwrap_or_default(),
				timeout,
			},
		})
	}
}

fn required(field: &str, value: Option<String>) -> Result<String, ConfigError> {
	match value {
		Some(v) if !v.trim().is_empty() => Ok(v),
		_ => Err(ConfigError::missing_field(field)),
	}
}
