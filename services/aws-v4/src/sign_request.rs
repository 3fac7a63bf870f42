use std::sync::Arc;

use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;

use cloudsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use cloudsign_core::time::{format_date, format_iso8601, Clock, DateTime, SystemClock};
use cloudsign_core::{Context, Error, Result, SignRequest, SigningRequest};

use crate::constants::{DEFAULT_ALGORITHM, SCOPE_TERMINATOR, SECRET_PREFIX, X_AMZ_DATE};
use crate::Credential;

/// RequestSigner that implements AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// ## Canonical form compatibility
///
/// This signer emits the raw-path/raw-query canonical form: the path and the
/// query string enter the canonical request exactly as they appear on the
/// wire, with no percent-encoding pass and no query sorting. The deployed
/// endpoints this crate targets accept that form; the general SigV4
/// specification instead requires URI-encoding path segments and sorting
/// encoded query parameters. A port pointed at a service that enforces the
/// encoded form needs a canonicalization pass here first.
///
/// Algorithm, service, and region are configuration. Signing is pure: same
/// request, credential, and clock instant give byte-identical output, so the
/// signer can be shared freely across tasks.
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,
    algorithm: String,

    clock: Arc<dyn Clock>,
}

impl RequestSigner {
    /// Create a new AWS V4 signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            algorithm: DEFAULT_ALGORITHM.into(),

            clock: Arc::new(SystemClock),
        }
    }

    /// Override the signing algorithm label.
    ///
    /// Only `AWS4-HMAC-SHA256` is meaningful for SigV4 today; the label is
    /// configuration so a compatible deployment can rename it without a
    /// rebuild.
    pub fn with_algorithm(mut self, algorithm: &str) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Replace the clock used to take the signing instant.
    ///
    /// Production code keeps the system clock; tests pin a
    /// [`cloudsign_core::time::FixedClock`] to make signatures reproducible.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "no credential available for signing",
            ));
        };

        // Both the x-amz-date header and the scope date render this one
        // instant. Taking the time twice could straddle UTC midnight and
        // split the two.
        let now = self.clock.now_utc();
        let mut signed_req = SigningRequest::build(req)?;

        // Hand the URI and headers back even when signing fails, so the
        // caller can retry with a freshly computed signature.
        let signed = self.sign_parts(&mut signed_req, body, cred, now);
        signed_req.apply(req)?;
        signed
    }
}

impl RequestSigner {
    fn sign_parts(
        &self,
        signed_req: &mut SigningRequest,
        body: &[u8],
        cred: &Credential,
        now: DateTime,
    ) -> Result<()> {
        // Insert HOST header if not present.
        if signed_req.headers.get(header::HOST).is_none() {
            let host = HeaderValue::from_str(signed_req.authority.as_str()).map_err(|e| {
                Error::malformed_request("authority is not a valid header value").with_source(e)
            })?;
            signed_req.headers.insert(header::HOST, host);
        }

        // Insert DATE header if not present.
        if signed_req.headers.get(X_AMZ_DATE).is_none() {
            let date_header = HeaderValue::try_from(format_iso8601(now)).map_err(|e| {
                Error::unexpected("failed to create date header").with_source(e)
            })?;
            signed_req.headers.insert(X_AMZ_DATE, date_header);
        }

        // Build canonical request and string to sign.
        let creq = canonical_request_string(signed_req, body)?;
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20150830/<region>/<service>/aws4_request"
        let scope = credential_scope(&format_date(now), &self.region, &self.service)?;
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20150830T123600Z
        // 20150830/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            self.algorithm,
            format_iso8601(now),
            scope,
            encoded_req
        );
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(
            &cred.secret_access_key,
            &format_date(now),
            &self.region,
            &self.service,
        )?;
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.algorithm,
            cred.access_key_id,
            scope,
            signed_req.header_name_to_vec_sorted().join(";"),
            signature
        ))
        .map_err(|e| {
            Error::unexpected("failed to create authorization header").with_source(e)
        })?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        Ok(())
    }
}

/// Build the canonical request string.
///
/// ```text
/// METHOD
/// PATH
/// QUERY
/// name:value per header, sorted by lowercased name
///
/// SIGNED_HEADERS
/// PAYLOAD_HASH
/// ```
///
/// Every header present on the request is signed. Values go in verbatim.
fn canonical_request_string(ctx: &SigningRequest, body: &[u8]) -> Result<String> {
    if ctx.path.is_empty() {
        return Err(Error::malformed_request("request path must not be empty"));
    }
    if ctx.has_duplicate_headers() {
        return Err(Error::malformed_request(
            "repeated header names make the canonical form ambiguous",
        ));
    }

    let mut header_lines = Vec::with_capacity(ctx.headers.len());
    for (name, value) in ctx.headers.iter() {
        let value = value.to_str().map_err(|e| {
            Error::malformed_request(format!("header `{name}` value is not valid text"))
                .with_source(e)
        })?;
        // HeaderName is already lowercase.
        header_lines.push((name.as_str(), value));
    }
    header_lines.sort_unstable();

    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    f.push_str(ctx.method.as_str());
    f.push('\n');
    f.push_str(&ctx.path);
    f.push('\n');
    f.push_str(ctx.query.as_deref().unwrap_or(""));
    f.push('\n');
    for (name, value) in &header_lines {
        f.push_str(name);
        f.push(':');
        f.push_str(value);
        f.push('\n');
    }
    f.push('\n');
    for (idx, (name, _)) in header_lines.iter().enumerate() {
        if idx > 0 {
            f.push(';');
        }
        f.push_str(name);
    }
    f.push('\n');
    f.push_str(&hex_sha256(body));

    Ok(f)
}

/// Build the credential scope: `20150830/us-east-1/iam/aws4_request`.
fn credential_scope(date: &str, region: &str, service: &str) -> Result<String> {
    for (component, value) in [("date", date), ("region", region), ("service", service)] {
        if value.is_empty() {
            return Err(Error::invalid_scope_component(format!(
                "scope {component} must not be empty"
            )));
        }
    }

    Ok(format!("{date}/{region}/{service}/{SCOPE_TERMINATOR}"))
}

/// Derive the request signing key.
///
/// Four HMAC-SHA256 stages, each keyed by the previous stage's output. The
/// result is only valid for one date/region/service combination and is
/// dropped at the end of the signing call.
fn generate_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    if secret.is_empty() {
        return Err(Error::invalid_secret_key("secret key must not be empty"));
    }

    // Sign secret
    let secret = format!("{SECRET_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    let sign_request = hmac_sha256(sign_service.as_slice(), SCOPE_TERMINATOR.as_bytes());

    Ok(sign_request)
}
