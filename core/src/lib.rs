//! Core components for signing API requests.
//!
//! This crate provides the foundational types and traits for the cloudsign
//! workspace:
//!
//! - **Context**: a container holding the file-read and environment
//!   capabilities credential providers need
//! - **Traits**: [`ProvideCredential`] for credential loading,
//!   [`SignRequest`] for service-specific signing, [`SigningCredential`]
//!   for validity checks
//! - **Signer**: the orchestrator that loads the credential once and signs
//!   every request with it
//!
//! Signing itself is pure: given the same request, credential, and clock
//! instant, a [`SignRequest`] implementation must produce byte-identical
//! output.
//!
//! ## Example
//!
//! ```no_run
//! use cloudsign_core::{Context, Signer, ProvideCredential, SignRequest, SigningCredential};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(
//!         &self,
//!         _: &Context,
//!     ) -> cloudsign_core::Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! #[async_trait]
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         _req: &mut http::request::Parts,
//!         _body: &[u8],
//!         _cred: Option<&Self::Credential>,
//!     ) -> cloudsign_core::Result<()> {
//!         // Compute and attach the signature here.
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> cloudsign_core::Result<()> {
//! let ctx = Context::default();
//! let signer = Signer::new(ctx, MyLoader, MyBuilder);
//!
//! let mut parts = http::Request::builder()
//!     .method("POST")
//!     .uri("https://example.com")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//!
//! signer.sign(&mut parts, b"{}").await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
mod fs;
pub use fs::FileRead;
mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
