//! Signing Volcengine OpenAPI requests without effort.
//!
//! This crate implements the volcengine control-plane signing scheme: a
//! SigV4-style protocol that derives a date/region/service-scoped key from
//! the long-term secret, canonicalizes the request into a deterministic
//! string, and emits the `Authorization` header plus its companion signed
//! headers (`host`, `content-type`, `x-content-sha256`, `x-date`) and the
//! unsigned `x-security-token`.
//!
//! The crate is built around a few key concepts:
//!
//! - **Context**: holds the environment abstraction so the signing core
//!   never reads ambient process state itself
//! - **Traits**: [`ProvideCredential`] for credential loading and
//!   [`SignRequest`] for service signing
//! - **Signer**: the orchestrator that loads a credential and signs requests
//!
//! ## Example
//!
//! ```no_run
//! use volcsign::{Context, OsEnv, RequestSigner, Signer, StaticCredentialProvider};
//!
//! # async fn example() -> volcsign::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let signer = Signer::new(
//!     ctx,
//!     StaticCredentialProvider::new("access_key_id", "secret_access_key"),
//!     RequestSigner::new("cn-beijing"),
//! );
//!
//! let body = br#"{"Name":"demo"}"#;
//! let (mut parts, _) = http::Request::builder()
//!     .method("POST")
//!     .uri("https://iam.volcengineapi.com/?Action=CreateApplication")
//!     .body(())
//!     .unwrap()
//!     .into_parts();
//!
//! signer.sign(&mut parts, body).await?;
//! // parts now carries Authorization and the signed headers; hand it to
//! // your HTTP transport together with the same body.
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod action;
pub use action::{content_type_for, service_for, version_for};
mod constants;

mod context;
pub use context::{Context, Env, NoopEnv, OsEnv, StaticEnv};
mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;

mod config;
pub use config::Config;
mod credential;
pub use credential::Credential;
mod provide_credential;
pub use provide_credential::{
    ConfigCredentialProvider, DefaultCredentialProvider, EnvCredentialProvider,
    ProvideCredentialChain, StaticCredentialProvider,
};
mod sign_request;
pub use sign_request::RequestSigner;
