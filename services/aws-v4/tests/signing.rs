use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use cloudsign_aws_v4::{Credential, DefaultCredentialProvider, RequestSigner, StaticCredentialProvider};
use cloudsign_core::time::FixedClock;
use cloudsign_core::{Context, ErrorKind, ProvideCredential, Result, Signer, StaticEnv};
use http::header;

fn iam_parts() -> http::request::Parts {
    http::Request::builder()
        .method("GET")
        .uri("https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08")
        .header(
            "content-type",
            "application/x-www-form-urlencoded; charset=utf-8",
        )
        .header("host", "iam.amazonaws.com")
        .header("x-amz-date", "20150830T123600Z")
        .body(())
        .unwrap()
        .into_parts()
        .0
}

fn iam_signer() -> RequestSigner {
    RequestSigner::new("iam", "us-east-1")
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()))
}

#[tokio::test]
async fn test_signer_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();

    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
        iam_signer(),
    );

    let mut parts = iam_parts();
    signer.sign(&mut parts, b"").await.unwrap();

    assert_eq!(
        parts.headers[header::AUTHORIZATION].to_str().unwrap(),
        "AWS4-HMAC-SHA256 \
         Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request, \
         SignedHeaders=content-type;host;x-amz-date, \
         Signature=5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
    );
}

#[derive(Debug)]
struct CountingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProvideCredential for CountingProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Credential::new("ak", "sk")))
    }
}

#[tokio::test]
async fn test_credential_loaded_once_then_frozen() {
    let calls = Arc::new(AtomicUsize::new(0));
    let signer = Signer::new(
        Context::new(),
        CountingProvider {
            calls: calls.clone(),
        },
        iam_signer(),
    );

    for _ in 0..3 {
        let mut parts = iam_parts();
        signer.sign(&mut parts, b"").await.unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_signing_without_credential_source_fails() {
    let signer = Signer::new(
        Context::new().with_env(StaticEnv::default()),
        DefaultCredentialProvider::new(),
        iam_signer(),
    );

    let mut parts = iam_parts();
    let err = signer.sign(&mut parts, b"").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
}

#[tokio::test]
async fn test_signer_with_env_credentials() {
    let envs = std::collections::HashMap::from([
        ("AWS_ACCESS_KEY_ID".to_string(), "AKIDEXAMPLE".to_string()),
        (
            "AWS_SECRET_ACCESS_KEY".to_string(),
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
        ),
    ]);
    let signer = Signer::new(
        Context::new().with_env(StaticEnv {
            home_dir: None,
            envs,
        }),
        DefaultCredentialProvider::new(),
        iam_signer(),
    );

    let mut parts = iam_parts();
    signer.sign(&mut parts, b"").await.unwrap();

    let authorization = parts.headers[header::AUTHORIZATION].to_str().unwrap();
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830"));
}
