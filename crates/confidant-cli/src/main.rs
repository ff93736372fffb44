// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! confidant-get: mint a KMS auth token and print this service's Confidant
//! secrets to stdout. Logs go to stderr.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use confidant_cli::{fetch, key_binding, load_secret_env, Args, LogFormat, Settings, LOCAL_KEY_VAR};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
	let args = Args::parse();
	init_tracing(args.log_format);

	let settings = Settings::load(&args)?;
	info!(
		region = %settings.region,
		service = %settings.request.from_context,
		server = %settings.request.to_context,
		"Loaded configuration"
	);

	let local_key = load_secret_env(LOCAL_KEY_VAR)?;
	let binding = key_binding(&settings, local_key).await?;

	let status = fetch(&settings, binding, &mut std::io::stdout()).await?;
	Ok(ExitCode::from(status))
}

fn init_tracing(format: LogFormat) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let registry = tracing_subscriber::registry().with(filter);

	match format {
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
			.init(),
		LogFormat::Pretty => registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init(),
	}
}
