//! Per-action signing policy.
//!
//! The control plane multiplexes several backend services behind one
//! endpoint, dispatched on the `Action` query parameter. A handful of
//! function/application lifecycle actions must be signed against the
//! `vefaas` service scope instead of the default, and the two
//! route-management actions use a newer API version. Both policies are kept
//! as data tables so adding an action is a one-line change with a test, not
//! a new code path.

use http::Method;

use crate::constants::DEFAULT_SERVICE;

/// Query parameter carrying the API action name.
pub const QUERY_ACTION: &str = "Action";

/// Query parameter carrying the API version.
pub const QUERY_VERSION: &str = "Version";

/// Base API version.
pub const DEFAULT_VERSION: &str = "2021-03-03";

/// API version used by the route-management actions.
pub const ROUTE_VERSION: &str = "2022-11-12";

/// Media type for non-POST requests.
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Media type for POST requests.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Actions signed against the `vefaas` service scope.
///
/// Extension point: any new action hitting the vefaas backend must be added
/// here, or it will sign against the default scope and the server will
/// reject the signature.
const VEFAAS_ACTIONS: &[&str] = &[
    "CodeUploadCallback",
    "CreateDependencyInstallTask",
    "GetDependencyInstallTaskStatus",
    "GetDependencyInstallTaskLogDownloadURI",
    "ListTriggers",
    "CreateApplication",
    "ReleaseApplication",
    "GetApplication",
];

/// Actions using [`ROUTE_VERSION`] instead of [`DEFAULT_VERSION`].
const ROUTE_ACTIONS: &[&str] = &["CreateRoute", "ListRoutes"];

/// Resolve the credential-scope service for the given action.
pub fn service_for(action: &str) -> &'static str {
    if VEFAAS_ACTIONS.contains(&action) {
        "vefaas"
    } else {
        DEFAULT_SERVICE
    }
}

/// Resolve the forced API version for the given action, if any.
pub fn version_for(action: &str) -> Option<&'static str> {
    if ROUTE_ACTIONS.contains(&action) {
        Some(ROUTE_VERSION)
    } else {
        None
    }
}

/// Resolve the content type for the given HTTP method.
pub fn content_type_for(method: &Method) -> &'static str {
    if method == Method::POST {
        CONTENT_TYPE_JSON
    } else {
        CONTENT_TYPE_FORM
    }
}
