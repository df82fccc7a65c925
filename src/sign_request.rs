use crate::action;
use crate::constants::{
    ALGORITHM, REQUEST_SUFFIX, RFC3986_ENCODE_SET, SIGNED_HEADERS, X_CONTENT_SHA_256, X_DATE,
    X_SECURITY_TOKEN,
};
use crate::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use crate::time::{format_iso8601, now, DateTime};
use crate::{Context, Credential, Error, Result, SignRequest, SigningRequest};
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::fmt::Write;

/// RequestSigner that implements the volcengine OpenAPI HMAC-SHA256 scheme.
///
/// The scheme is a SigV4 derivative: the canonical request covers a fixed
/// four-header block (`content-type;host;x-content-sha256;x-date`), and the
/// signing key is derived per call by chaining HMACs over short date, region,
/// service, and the literal `request`. Derived keys are never cached; each
/// call re-derives from its timestamp, so signing is deterministic and
/// side-effect free.
#[derive(Debug)]
pub struct RequestSigner {
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new volcengine signer for the given region.
    pub fn new(region: &str) -> Self {
        Self {
            region: region.into(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
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
        // Refuse before canonicalization: an unsigned or malformed-signature
        // request is worse than an explicit failure.
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "no credential available to sign the request",
            ));
        };
        if cred.access_key_id.is_empty() || cred.secret_access_key.is_empty() {
            return Err(Error::credential_invalid(
                "access key id or secret access key is empty",
            ));
        }

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;

        let action = signed_req
            .query_get(action::QUERY_ACTION)
            .map(ToString::to_string)
            .ok_or_else(|| {
                Error::request_invalid("query must carry an Action parameter for signing")
            })?;
        let service = action::service_for(&action);
        let content_type = action::content_type_for(&signed_req.method);

        // canonicalize context
        canonicalize_query(&mut signed_req, &action);

        let x_date = format_iso8601(now);
        let short_date = x_date[..8].to_string();
        let body_hash = hex_sha256(body);
        let host = signed_req.authority.to_string();

        canonicalize_header(
            &mut signed_req,
            cred,
            content_type,
            &host,
            &body_hash,
            &x_date,
        )?;

        // build canonical request and string to sign.
        let creq = canonical_request_string(&signed_req, content_type, &host, &body_hash, &x_date)?;
        debug!("calculated canonical request: {creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20250101/<region>/<service>/request"
        let scope = format!(
            "{short_date}/{}/{service}/{REQUEST_SUFFIX}",
            self.region
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // HMAC-SHA256
        // 20250101T000000Z
        // 20250101/<region>/<service>/request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{ALGORITHM}")?;
            writeln!(f, "{x_date}")?;
            writeln!(f, "{scope}")?;
            write!(f, "{encoded_req}")?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, &short_date, &self.region, service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            cred.access_key_id,
        ))?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

/// Resolve the Version parameter and normalize the query in place.
///
/// After this call the query holds percent-encoded pairs sorted byte-wise by
/// key; a repeated key keeps its values in given order (stable sort). The
/// same normalized form is signed and written back to the wire, so both
/// sides canonicalize identical bytes.
fn canonicalize_query(ctx: &mut SigningRequest, action: &str) {
    if let Some(version) = action::version_for(action) {
        // Forced version for this action, whatever the caller supplied.
        ctx.query.retain(|(k, _)| k != action::QUERY_VERSION);
        ctx.query_push(action::QUERY_VERSION, version);
    } else if ctx.query_get(action::QUERY_VERSION).is_none() {
        ctx.query_push(action::QUERY_VERSION, action::DEFAULT_VERSION);
    }

    // Sort raw keys before encoding; encoding must not influence order.
    ctx.query.sort_by(|a, b| a.0.cmp(&b.0));

    ctx.query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &RFC3986_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &RFC3986_ENCODE_SET).to_string(),
            )
        })
        .collect();
}

fn canonicalize_header(
    ctx: &mut SigningRequest,
    cred: &Credential,
    content_type: &'static str,
    host: &str,
    body_hash: &str,
    x_date: &str,
) -> Result<()> {
    ctx.headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    ctx.headers.insert(header::HOST, host.parse()?);
    ctx.headers
        .insert(X_CONTENT_SHA_256, HeaderValue::from_str(body_hash)?);
    ctx.headers.insert(X_DATE, HeaderValue::from_str(x_date)?);

    // Always sent, never part of the signed set: the token can rotate
    // without invalidating the canonical request.
    let mut token = HeaderValue::from_str(cred.session_token.as_deref().unwrap_or(""))?;
    token.set_sensitive(true);
    ctx.headers.insert(X_SECURITY_TOKEN, token);

    Ok(())
}

fn canonical_request_string(
    ctx: &SigningRequest,
    content_type: &str,
    host: &str,
    body_hash: &str,
    x_date: &str,
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", ctx.method)?;
    // Insert path
    writeln!(f, "{}", ctx.path)?;
    // Insert normalized query
    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert the fixed canonical header block. Exactly these four headers
    // enter the signature; any other caller header is forwarded on the wire
    // but never signed.
    writeln!(f, "content-type:{content_type}")?;
    writeln!(f, "host:{host}")?;
    writeln!(f, "{X_CONTENT_SHA_256}:{body_hash}")?;
    writeln!(f, "{X_DATE}:{x_date}")?;
    writeln!(f)?;
    writeln!(f, "{SIGNED_HEADERS}")?;
    write!(f, "{body_hash}")?;

    Ok(f)
}

fn generate_signing_key(secret: &str, short_date: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), short_date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), REQUEST_SUFFIX.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use chrono::TimeZone;
    use http::{Method, Request};
    use pretty_assertions::assert_eq;

    const GOLDEN_LIST_ROUTES: &str = "HMAC-SHA256 Credential=test_access_key/20250101/cn-beijing/apig/request, SignedHeaders=content-type;host;x-content-sha256;x-date, Signature=eb54074586b188541de0df57fddde822ae93fc1ddb23608e8602d64fa0bc36f2";
    const GOLDEN_CREATE_APPLICATION: &str = "HMAC-SHA256 Credential=test_access_key/20250101/cn-beijing/vefaas/request, SignedHeaders=content-type;host;x-content-sha256;x-date, Signature=2f39f575f737866042a363923541610230e99fea7e2147b339898dde8d04194b";

    fn test_time() -> DateTime {
        chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn test_credential() -> Credential {
        Credential {
            access_key_id: "test_access_key".to_string(),
            secret_access_key: "test_secret_key".to_string(),
            ..Default::default()
        }
    }

    fn test_signer() -> RequestSigner {
        RequestSigner::new("cn-beijing").with_time(test_time())
    }

    fn parts_for(method: Method, uri: &str) -> Parts {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0
    }

    async fn sign(method: Method, uri: &str, body: &[u8], cred: &Credential) -> Parts {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut parts = parts_for(method, uri);
        test_signer()
            .sign_request(&Context::new(), &mut parts, body, Some(cred))
            .await
            .expect("sign must succeed");
        parts
    }

    fn header_str<'a>(parts: &'a Parts, name: &str) -> &'a str {
        parts
            .headers
            .get(name)
            .expect("header must be present")
            .to_str()
            .expect("header must be valid")
    }

    #[tokio::test]
    async fn test_golden_list_routes() {
        let parts = sign(
            Method::GET,
            "https://iam.volcengineapi.com/?Action=ListRoutes&Version=2021-03-03",
            b"",
            &test_credential(),
        )
        .await;

        // Version is silently rewritten per the route-action override.
        assert_eq!(
            parts.uri.query(),
            Some("Action=ListRoutes&Version=2022-11-12")
        );
        assert_eq!(
            header_str(&parts, "content-type"),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(header_str(&parts, "host"), "iam.volcengineapi.com");
        assert_eq!(
            header_str(&parts, "x-content-sha256"),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(header_str(&parts, "x-date"), "20250101T000000Z");
        assert_eq!(header_str(&parts, "x-security-token"), "");
        assert_eq!(header_str(&parts, "authorization"), GOLDEN_LIST_ROUTES);
    }

    #[tokio::test]
    async fn test_golden_create_application() {
        let parts = sign(
            Method::POST,
            "https://iam.volcengineapi.com/?Action=CreateApplication",
            br#"{"Name":"demo"}"#,
            &test_credential(),
        )
        .await;

        // Default version appended, vefaas scope resolved from the table.
        assert_eq!(
            parts.uri.query(),
            Some("Action=CreateApplication&Version=2021-03-03")
        );
        assert_eq!(header_str(&parts, "content-type"), "application/json");
        assert_eq!(
            header_str(&parts, "authorization"),
            GOLDEN_CREATE_APPLICATION
        );
    }

    #[tokio::test]
    async fn test_signing_is_deterministic() {
        let uri = "https://iam.volcengineapi.com/?Action=GetSandbox&SandboxId=s-123";
        let a = sign(Method::GET, uri, b"", &test_credential()).await;
        let b = sign(Method::GET, uri, b"", &test_credential()).await;

        assert_eq!(
            header_str(&a, "authorization"),
            header_str(&b, "authorization")
        );
    }

    #[tokio::test]
    async fn test_service_override_changes_scope() {
        let listed = sign(
            Method::POST,
            "https://iam.volcengineapi.com/?Action=GetApplication",
            b"{}",
            &test_credential(),
        )
        .await;
        let unlisted = sign(
            Method::POST,
            "https://iam.volcengineapi.com/?Action=GetSandbox",
            b"{}",
            &test_credential(),
        )
        .await;

        assert!(header_str(&listed, "authorization").contains("/cn-beijing/vefaas/request"));
        assert!(header_str(&unlisted, "authorization").contains("/cn-beijing/apig/request"));
    }

    #[tokio::test]
    async fn test_multi_valued_query_keeps_value_order() {
        let parts = sign(
            Method::GET,
            "https://iam.volcengineapi.com/?tag=x&tag=y&Action=ListSandboxes",
            b"",
            &test_credential(),
        )
        .await;

        assert_eq!(
            parts.uri.query(),
            Some("Action=ListSandboxes&Version=2021-03-03&tag=x&tag=y")
        );
    }

    #[tokio::test]
    async fn test_query_values_are_rfc3986_encoded() {
        // `a b!c'()*` exercises the characters permissive encoders leave
        // bare: all must come out as uppercase %XX, space as %20 not `+`.
        let parts = sign(
            Method::GET,
            "https://iam.volcengineapi.com/?Action=ListSandboxes&name=a%20b%21c%27%28%29%2A",
            b"",
            &test_credential(),
        )
        .await;

        assert_eq!(
            parts.uri.query(),
            Some("Action=ListSandboxes&Version=2021-03-03&name=a%20b%21c%27%28%29%2A")
        );
    }

    #[tokio::test]
    async fn test_body_avalanche() {
        let uri = "https://iam.volcengineapi.com/?Action=CreateSandbox";
        let a = sign(Method::POST, uri, br#"{"Image":"a"}"#, &test_credential()).await;
        let b = sign(Method::POST, uri, br#"{"Image":"b"}"#, &test_credential()).await;

        assert_ne!(
            header_str(&a, "x-content-sha256"),
            header_str(&b, "x-content-sha256")
        );
        assert_ne!(
            header_str(&a, "authorization"),
            header_str(&b, "authorization")
        );
    }

    #[tokio::test]
    async fn test_session_token_never_enters_signature() {
        let uri = "https://iam.volcengineapi.com/?Action=ListSandboxes";
        let without = sign(Method::GET, uri, b"", &test_credential()).await;

        let cred = Credential {
            session_token: Some("sts_session_token".to_string()),
            ..test_credential()
        };
        let with = sign(Method::GET, uri, b"", &cred).await;

        // Same signed-headers list, same signature; only the token differs.
        assert_eq!(
            header_str(&without, "authorization"),
            header_str(&with, "authorization")
        );
        assert_eq!(header_str(&without, "x-security-token"), "");
        assert_eq!(header_str(&with, "x-security-token"), "sts_session_token");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_canonicalization() {
        let mut parts = parts_for(
            Method::GET,
            "https://iam.volcengineapi.com/?Action=ListSandboxes",
        );

        let err = test_signer()
            .sign_request(&Context::new(), &mut parts, b"", None)
            .await
            .expect_err("sign must fail");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);

        // The request is left untouched.
        assert_eq!(
            parts.uri.to_string(),
            "https://iam.volcengineapi.com/?Action=ListSandboxes"
        );
        assert!(parts.headers.is_empty());
    }

    #[tokio::test]
    async fn test_empty_secret_fails() {
        let mut parts = parts_for(
            Method::GET,
            "https://iam.volcengineapi.com/?Action=ListSandboxes",
        );

        let cred = Credential {
            access_key_id: "test_access_key".to_string(),
            ..Default::default()
        };
        let err = test_signer()
            .sign_request(&Context::new(), &mut parts, b"", Some(&cred))
            .await
            .expect_err("sign must fail");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[tokio::test]
    async fn test_missing_action_fails() {
        let mut parts = parts_for(Method::GET, "https://iam.volcengineapi.com/");

        let err = test_signer()
            .sign_request(&Context::new(), &mut parts, b"", Some(&test_credential()))
            .await
            .expect_err("sign must fail");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_extra_caller_headers_are_not_signed() {
        let uri = "https://iam.volcengineapi.com/?Action=ListSandboxes";
        let plain = sign(Method::GET, uri, b"", &test_credential()).await;

        let mut parts = parts_for(Method::GET, uri);
        parts
            .headers
            .insert("x-custom-trace", "abc123".parse().unwrap());
        test_signer()
            .sign_request(&Context::new(), &mut parts, b"", Some(&test_credential()))
            .await
            .expect("sign must succeed");

        // Forwarded on the wire, absent from the signature.
        assert_eq!(header_str(&parts, "x-custom-trace"), "abc123");
        assert_eq!(
            header_str(&plain, "authorization"),
            header_str(&parts, "authorization")
        );
    }
}
