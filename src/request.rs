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
/// Borrows the pieces of an `http::request::Parts` that signing needs to
/// inspect or mutate, and writes them back with [`SigningRequest::apply`].
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        let query_size = self.query_size();

        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            // Build path and query.
            uri_parts.path_and_query = {
                let paq = if query_size == 0 {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(query_size + 2 * self.query.len());

                    s.push('?');
                    for (i, (k, v)) in self.query.iter().enumerate() {
                        if i > 0 {
                            s.push('&');
                        }

                        // Always emit `k=`, even for empty values: the
                        // canonical request signs `k=`, and the wire bytes
                        // must match what was signed.
                        s.push_str(k);
                        s.push('=');
                        s.push_str(v);
                    }

                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Get the first query value with the given key.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_for(uri: &str) -> http::request::Parts {
        http::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0
    }

    #[test]
    fn test_build_parses_query_in_order() {
        let mut parts = parts_for("https://iam.volcengineapi.com/?tag=x&tag=y&Action=Foo");
        let req = SigningRequest::build(&mut parts).expect("build must succeed");

        assert_eq!(req.path, "/");
        assert_eq!(req.authority.as_str(), "iam.volcengineapi.com");
        assert_eq!(
            req.query,
            vec![
                ("tag".to_string(), "x".to_string()),
                ("tag".to_string(), "y".to_string()),
                ("Action".to_string(), "Foo".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_without_authority_fails() {
        let mut parts = parts_for("/relative/path");
        assert!(SigningRequest::build(&mut parts).is_err());
    }

    #[test]
    fn test_apply_round_trip() {
        let mut parts = parts_for("https://iam.volcengineapi.com/?a=1&b=2");
        let mut req = SigningRequest::build(&mut parts).expect("build must succeed");
        req.query_push("c", "3");
        req.apply(&mut parts).expect("apply must succeed");

        assert_eq!(
            parts.uri.to_string(),
            "https://iam.volcengineapi.com/?a=1&b=2&c=3"
        );
    }

    #[test]
    fn test_apply_keeps_equals_for_empty_value() {
        let mut parts = parts_for("https://iam.volcengineapi.com/?flag=&a=1");
        let req = SigningRequest::build(&mut parts).expect("build must succeed");
        req.apply(&mut parts).expect("apply must succeed");

        assert_eq!(
            parts.uri.to_string(),
            "https://iam.volcengineapi.com/?flag=&a=1"
        );
    }

    #[test]
    fn test_apply_empty_query_has_no_question_mark() {
        let mut parts = parts_for("https://iam.volcengineapi.com/");
        let req = SigningRequest::build(&mut parts).expect("build must succeed");
        req.apply(&mut parts).expect("apply must succeed");

        assert_eq!(parts.uri.to_string(), "https://iam.volcengineapi.com/");
    }

    #[test]
    fn test_query_get_returns_first_match() {
        let mut parts = parts_for("https://iam.volcengineapi.com/?Action=ListRoutes&Action=Other");
        let req = SigningRequest::build(&mut parts).expect("build must succeed");

        assert_eq!(req.query_get("Action"), Some("ListRoutes"));
        assert_eq!(req.query_get("Version"), None);
    }
}
