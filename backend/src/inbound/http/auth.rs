//! Authentication helpers used by the access-control middleware and handlers.
//!
//! Keep the middleware focused on policy by concentrating header decoding
//! here. Any `Authorization` header that is present but unusable is reported
//! as invalid credentials, never as a missing identity.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::{Ready, ready};
use zeroize::Zeroizing;

use crate::domain::{Error, INVALID_CREDENTIALS, LoginCredentials, Principal};

use super::ApiResult;

/// Message for requests that reach a guarded route without an identity.
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// Message for identities lacking the role a route demands.
pub const ACCESS_DENIED: &str = "Access denied";

const BASIC_SCHEME: &str = "basic";

/// Identity resolved by the access-control middleware for this request.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl FromRequest for CurrentPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let principal = req.extensions().get::<Principal>().cloned();
        ready(
            principal
                .map(Self)
                .ok_or_else(|| Error::unauthorized(AUTHENTICATION_REQUIRED)),
        )
    }
}

/// Decode `Authorization: Basic <base64(username:password)>`.
///
/// Returns `Ok(None)` when no `Authorization` header is present.
///
/// # Examples
/// ```
/// use actix_web::http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
/// use anime_backend::inbound::http::auth::basic_credentials;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWRtaW46cGFzc3dvcmQ="));
/// let creds = basic_credentials(&headers).unwrap().unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
pub fn basic_credentials(headers: &HeaderMap) -> ApiResult<Option<LoginCredentials>> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let invalid = || Error::unauthorized(INVALID_CREDENTIALS);

    let value = value.to_str().map_err(|_| invalid())?;
    let (scheme, encoded) = value.trim().split_once(' ').ok_or_else(invalid)?;
    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return Err(invalid());
    }

    let decoded = Zeroizing::new(STANDARD.decode(encoded.trim()).map_err(|_| invalid())?);
    let text = std::str::from_utf8(&decoded).map_err(|_| invalid())?;
    let (username, password) = text.split_once(':').ok_or_else(invalid)?;
    LoginCredentials::try_from_parts(username, password)
        .map(Some)
        .map_err(|_| invalid())
}

/// Encode a Basic `Authorization` header value.
pub fn basic_header_value(username: &str, password: &str) -> String {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::header::HeaderValue;
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(value).expect("ascii header"),
        );
        headers
    }

    #[given("an admin Basic header")]
    fn admin_basic_header() -> HeaderMap {
        headers_with(&basic_header_value("admin", "password"))
    }

    #[given("a bearer token header")]
    fn bearer_header() -> HeaderMap {
        headers_with("Bearer abc.def")
    }

    #[when("the header is decoded")]
    fn header_is_decoded(headers: HeaderMap) -> ApiResult<Option<LoginCredentials>> {
        basic_credentials(&headers)
    }

    #[then("the admin credentials are returned")]
    fn admin_credentials_returned(result: ApiResult<Option<LoginCredentials>>) {
        let creds = result.expect("decoded").expect("present");
        assert_eq!(creds.username(), "admin");
        assert_eq!(creds.password(), "password");
    }

    #[then("the credentials are rejected")]
    fn credentials_rejected(result: ApiResult<Option<LoginCredentials>>) {
        let error = result.expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    fn basic_header_happy_path() {
        let headers = admin_basic_header();
        let result = header_is_decoded(headers);
        admin_credentials_returned(result);
    }

    #[rstest]
    fn other_schemes_are_rejected() {
        let headers = bearer_header();
        let result = header_is_decoded(headers);
        credentials_rejected(result);
    }

    #[test]
    fn absent_header_is_no_identity() {
        let result = basic_credentials(&HeaderMap::new()).expect("no error");
        assert!(result.is_none());
    }

    #[rstest]
    #[case("Basic")]
    #[case("Basic !!!not-base64!!!")]
    #[case("Basic YWRtaW4=")] // "admin", no colon
    #[case("Basic OnBhc3N3b3Jk")] // ":password", blank username
    #[case("Basic YWRtaW46")] // "admin:", blank password
    fn malformed_headers_are_invalid_credentials(#[case] value: &str) {
        credentials_rejected(basic_credentials(&headers_with(value)));
    }

    #[test]
    fn scheme_is_case_insensitive_and_password_may_contain_colons() {
        let encoded = STANDARD.encode("admin:pa:ss");
        let result = basic_credentials(&headers_with(&format!("bAsIc {encoded}")));
        let creds = result.expect("decoded").expect("present");
        assert_eq!(creds.password(), "pa:ss");
    }
}
