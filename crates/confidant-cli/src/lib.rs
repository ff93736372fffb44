// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Library half of the `confidant-get` binary.

pub mod config;
pub mod run;
pub mod secret_env;

pub use config::{Args, ConfigError, FileConfig, LogFormat, Settings};
pub use run::{exit_status, fetch, key_binding};
pub use secret_env::{load_secret_env, SecretEnvError, LOCAL_KEY_VAR};
