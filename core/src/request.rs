use std::mem;
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// Signing context for request.
///
/// Path and query are kept exactly as they appeared on the wire. Services
/// that canonicalize them raw (see `cloudsign-aws-v4`) rely on this: the
/// descriptor never re-encodes or reorders anything.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, as received.
    pub path: String,
    /// Raw query string, `None` when the URI carries none.
    pub query: Option<String>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    ///
    /// The request is only taken apart once it is known to be signable, so a
    /// rejected request keeps its URI and headers.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let authority = parts.uri.authority().cloned().ok_or_else(|| {
            Error::malformed_request("request without authority is invalid for signing")
        })?;

        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority,
            path: paq.path().to_string(),
            query: paq.query().map(|v| v.to_string()),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let paq = match self.query {
                    None => self.path,
                    Some(query) => {
                        let mut s = self.path;
                        s.reserve(query.len() + 1);
                        s.push('?');
                        s.push_str(&query);
                        s
                    }
                };

                Some(PathAndQuery::from_str(&paq).map_err(|e| {
                    Error::malformed_request("invalid path and query").with_source(e)
                })?)
            };
            Uri::from_parts(uri_parts)
                .map_err(|e| Error::malformed_request("invalid uri").with_source(e))?
        };

        Ok(())
    }

    /// Get header names as sorted vector.
    ///
    /// `http::HeaderName` is always lowercase, so the result is already
    /// case-folded.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }

    /// Check whether any header name carries more than one value.
    ///
    /// The canonical form emits one `name:value` line per header; a repeated
    /// name would make the signature ambiguous, so callers reject it.
    pub fn has_duplicate_headers(&self) -> bool {
        self.headers.keys_len() != self.headers.len()
    }
}
