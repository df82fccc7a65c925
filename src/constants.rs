// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in volcengine services.
pub const X_CONTENT_SHA_256: &str = "x-content-sha256";
pub const X_DATE: &str = "x-date";
pub const X_SECURITY_TOKEN: &str = "x-security-token";

// Env values used in volcengine services.
pub const VOLCENGINE_ACCESS_KEY: &str = "VOLCENGINE_ACCESS_KEY";
pub const VOLCENGINE_SECRET_KEY: &str = "VOLCENGINE_SECRET_KEY";
pub const VOLCENGINE_SESSION_TOKEN: &str = "VOLCENGINE_SESSION_TOKEN";
// Alternate names honored by other volcengine tooling.
pub const VOLC_ACCESSKEY: &str = "VOLC_ACCESSKEY";
pub const VOLC_SECRETKEY: &str = "VOLC_SECRETKEY";

/// Default region for the control-plane endpoint.
pub const DEFAULT_REGION: &str = "cn-beijing";

/// Default service of the credential scope; per-action overrides live in
/// the `action` module.
pub const DEFAULT_SERVICE: &str = "apig";

/// Fixed suffix terminating the signing key derivation chain and the
/// credential scope.
pub const REQUEST_SUFFIX: &str = "request";

/// Signing algorithm name as it appears in the string-to-sign and the
/// `Authorization` header.
pub const ALGORITHM: &str = "HMAC-SHA256";

/// The signed header list is fixed for this scheme: exactly these four
/// headers, in this order, regardless of what else the caller sends.
pub const SIGNED_HEADERS: &str = "content-type;host;x-content-sha256;x-date";

/// AsciiSet for RFC 3986 percent-encoding.
///
/// URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z',
/// '0'-'9', '-', '.', '_', and '~'. This also covers `! ' ( ) *`, which
/// permissive encoders leave bare but the server requires as uppercase `%XX`.
pub static RFC3986_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
