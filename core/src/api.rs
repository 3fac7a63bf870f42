use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait used by the signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used by the signer to load credentials
/// from the environment.
///
/// Loading happens once, before the first signing call; signing itself never
/// goes back to the source.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from the context.
    ///
    /// - Returns `Ok(None)` if this provider has nothing to offer, letting
    ///   a chain fall through to the next provider.
    /// - Returns `Err(_)` only for failures that should surface to callers.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used by the signer to compute and attach the
/// signature for one request.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request parts in place.
    ///
    /// `body` is the raw request payload; services that sign the payload
    /// hash it here. Implementations must either attach a complete
    /// signature or fail without modifying the request semantics, never
    /// both.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()>;
}
