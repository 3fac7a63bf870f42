use crate::constants::AWS_CREDENTIAL_FILE;
use crate::provide_credential::{
    EnvCredentialProvider, FileCredentialProvider, ProvideCredentialChain,
};
use crate::Credential;
use async_trait::async_trait;
use cloudsign_core::{Context, ProvideCredential, Result};

/// DefaultCredentialProvider is the recommended loader for most setups.
///
/// Resolution order:
///
/// 1. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` environment variables
/// 2. the JSON credential file named by `AWS_CREDENTIAL_FILE`, when set
///
/// Whatever resolves first wins; the result is then held by the signer for
/// the process lifetime.
#[derive(Debug, Default)]
pub struct DefaultCredentialProvider;

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let mut chain = ProvideCredentialChain::new().push(EnvCredentialProvider::new());
        if let Some(path) = ctx.env_var(AWS_CREDENTIAL_FILE) {
            chain = chain.push(FileCredentialProvider::new(&path));
        }

        chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY};
    use cloudsign_core::StaticEnv;
    use cloudsign_file_read_tokio::TokioFileRead;
    use std::collections::HashMap;
    use std::io::Write;

    #[tokio::test]
    async fn test_default_provider_prefers_env() {
        let envs = HashMap::from([
            (AWS_ACCESS_KEY_ID.to_string(), "env_access_key".to_string()),
            (
                AWS_SECRET_ACCESS_KEY.to_string(),
                "env_secret_key".to_string(),
            ),
        ]);
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs,
        });

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key_id, "env_access_key");
    }

    #[tokio::test]
    async fn test_default_provider_falls_back_to_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(br#"{"access_key": "file_access_key", "secret_key": "file_secret_key"}"#)
            .unwrap();

        let envs = HashMap::from([(
            AWS_CREDENTIAL_FILE.to_string(),
            f.path().to_str().unwrap().to_string(),
        )]);
        let ctx = Context::new()
            .with_file_read(TokioFileRead)
            .with_env(StaticEnv {
                home_dir: None,
                envs,
            });

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key_id, "file_access_key");
        assert_eq!(cred.secret_access_key, "file_secret_key");
    }

    #[tokio::test]
    async fn test_default_provider_without_sources() {
        let ctx = Context::new().with_env(StaticEnv::default());

        let cred = DefaultCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }
}
