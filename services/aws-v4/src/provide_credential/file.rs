use crate::Credential;
use async_trait::async_trait;
use cloudsign_core::{Context, Error, ProvideCredential, Result};
use serde::Deserialize;

/// FileCredentialProvider loads AWS credentials from a JSON document.
///
/// The document carries the same shape the deployments this crate grew out
/// of bundle alongside the binary:
///
/// ```json
/// {
///     "access_key": "AKIDEXAMPLE",
///     "secret_key": "..."
/// }
/// ```
///
/// The file is read through the context's `FileRead` capability; `~` in the
/// path expands to the home directory.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    path: String,
}

impl FileCredentialProvider {
    /// Create a new FileCredentialProvider reading from the given path.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct CredentialFile {
    access_key: String,
    secret_key: String,
}

#[async_trait]
impl ProvideCredential for FileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(path) = ctx.expand_home_dir(&self.path) else {
            return Ok(None);
        };

        let content = ctx.file_read_as_string(&path).await?;
        let file: CredentialFile = serde_json::from_str(&content).map_err(|e| {
            Error::credential_invalid("credential file is not valid JSON").with_source(e)
        })?;

        if file.access_key.is_empty() || file.secret_key.is_empty() {
            return Err(Error::credential_invalid(
                "credential file is missing access_key or secret_key",
            ));
        }

        Ok(Some(Credential::new(&file.access_key, &file.secret_key)))
    }
}
