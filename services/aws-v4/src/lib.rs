//! AWS SigV4 service signer.
//!
//! Produces the `Authorization` header for requests against AWS-style HTTP
//! APIs without pulling in an SDK. The canonical form used here is the
//! raw-path/raw-query variant: path and query are signed exactly as
//! received, never re-encoded or reordered. See [`RequestSigner`] for the
//! compatibility notes.
//!
//! ## Example
//!
//! ```no_run
//! use cloudsign_aws_v4::{RequestSigner, StaticCredentialProvider};
//! use cloudsign_core::{Context, Signer};
//!
//! # async fn example() -> cloudsign_core::Result<()> {
//! let ctx = Context::new();
//! let loader = StaticCredentialProvider::new("access_key_id", "secret_access_key");
//! let signer = Signer::new(ctx, loader, RequestSigner::new("dynamodb", "us-east-1"));
//!
//! let body = br#"{"TableName":"temperature_data"}"#;
//! let mut parts = http::Request::builder()
//!     .method("POST")
//!     .uri("https://dynamodb.us-east-1.amazonaws.com/")
//!     .header("x-amz-target", "DynamoDB_20120810.Query")
//!     .header("content-type", "application/x-amz-json-1.0")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//!
//! signer.sign(&mut parts, body).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{
    DefaultCredentialProvider, EnvCredentialProvider, FileCredentialProvider,
    ProvideCredentialChain, StaticCredentialProvider,
};

mod sign_request;
pub use sign_request::RequestSigner;
