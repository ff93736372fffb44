// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secrets from `VAR` or `VAR_FILE` environment variables.

use std::path::PathBuf;
use std::{env, fs};

use confidant_client::SecretString;
use thiserror::Error;

/// Name of the variable holding a base64 local key. Its presence selects the
/// in-process key backend instead of AWS KMS.
pub const LOCAL_KEY_VAR: &str = "CONFIDANT_LOCAL_KEY";

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load `var` from the environment, preferring a path in `{var}_FILE`.
///
/// One trailing newline is stripped from file contents.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	Ok(env::var(var).ok().map(SecretString::new))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	// Each test owns a distinct variable name so they can run in parallel.

	#[test]
	fn unset_is_none() {
		assert!(load_secret_env("CONFIDANT_TEST_UNSET").unwrap().is_none());
	}

	#[test]
	fn direct_value() {
		env::set_var("CONFIDANT_TEST_DIRECT", "c2VjcmV0");
		let secret = load_secret_env("CONFIDANT_TEST_DIRECT").unwrap().unwrap();
		assert_eq!(secret.expose(), "c2VjcmV0");
		env::remove_var("CONFIDANT_TEST_DIRECT");
	}

	#[test]
	fn file_wins_and_one_newline_is_stripped() {
		let mut file = NamedTempFile::new().unwrap();
		write!(file, "from-file\n\n").unwrap();

		env::set_var("CONFIDANT_TEST_BOTH", "from-env");
		env::set_var("CONFIDANT_TEST_BOTH_FILE", file.path());
		let secret = load_secret_env("CONFIDANT_TEST_BOTH").unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file\n");
		env::remove_var("CONFIDANT_TEST_BOTH");
		env::remove_var("CONFIDANT_TEST_BOTH_FILE");
	}

	#[test]
	fn empty_file_path_is_an_error() {
		env::set_var("CONFIDANT_TEST_EMPTY_FILE", "");
		let err = load_secret_env("CONFIDANT_TEST_EMPTY").unwrap_err();
		assert!(matches!(err, SecretEnvError::EmptyPath { var } if var == "CONFIDANT_TEST_EMPTY_FILE"));
		env::remove_var("CONFIDANT_TEST_EMPTY_FILE");
	}

	#[test]
	fn missing_file_is_an_error() {
		env::set_var("CONFIDANT_TEST_GONE_FILE", "/nonexistent/confidant/key");
		let err = load_secret_env("CONFIDANT_TEST_GONE").unwrap_err();
		assert!(matches!(err, SecretEnvError::Io { .. }));
		env::remove_var("CONFIDANT_TEST_GONE_FILE");
	}
}
