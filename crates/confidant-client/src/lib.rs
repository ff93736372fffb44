// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for fetching a service's secrets from Confidant.
//!
//! One exchange:
//! 1. Builds a validity window (`not_before` = now, `not_after` = now + lifetime)
//! 2. Encrypts it through the bound key-management client, with the requesting
//!    service and the Confidant server as encryption context
//! 3. Presents the base64url ciphertext as basic credentials on
//!    `GET {base_url}/v1/services/{service}`
//! 4. Maps the response status onto an [`ExchangeResult`]
//!
//! # Example
//!
//! ```ignore
//! use confidant_client::{ExchangeRequest, Exchanger, HttpTransport};
//! use confidant_kms::ProcessBinding;
//!
//! let binding = ProcessBinding::initialize("us-east-1").await;
//! let exchanger = Exchanger::bound(binding, HttpTransport::new()?);
//!
//! let request = ExchangeRequest::new(
//!     10,
//!     "alias/authnz-production",
//!     "my-service",
//!     "confidant-production",
//!     "https://confidant.example.com",
//! );
//!
//! match exchanger.exchange(&request).await {
//!     Ok(payload) => println!("{} bytes of service data", payload.len()),
//!     Err(e) if e.is_transient() => eprintln!("try again later: {e}"),
//!     Err(e) => eprintln!("giving up: {e}"),
//! }
//! ```

mod endpoint;
mod error;
mod exchange;
mod outcome;
mod request;
mod secret;
mod token;
mod transport;
mod window;

pub use confidant_kms::ProcessBinding;
pub use endpoint::service_url;
pub use error::{ExchangeError, ExchangeErrorKind, TransportError};
pub use exchange::{ExchangeOptions, ExchangeResult, Exchanger};
pub use outcome::ExchangeOutcome;
pub use request::ExchangeRequest;
pub use secret::{SecretString, ServicePayload, REDACTED};
pub use token::{AuthScheme, BearerToken};
pub use transport::{builder, user_agent, HttpTransport, Transport, DEFAULT_MAX_BODY_BYTES};
pub use window::{ValidityWindow, TIMESTAMP_FORMAT};
