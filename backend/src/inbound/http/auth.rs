//! Bearer-token identity extraction.
//!
//! A bad or missing token never fails the request here. The outcome is a
//! [`CallerIdentity`] and resolvers decide whether anonymity is acceptable.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use tracing::debug;

use crate::domain::ports::TokenService;
use crate::domain::{Anonymous, CallerIdentity};

const BEARER: &str = "bearer";

/// Resolve the caller from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. The token payload is trusted
/// as-is; the user is not re-read from storage.
pub fn caller_identity(headers: &HeaderMap, tokens: &dyn TokenService) -> CallerIdentity {
    let Some(raw) = headers.get(AUTHORIZATION) else {
        return Err(Anonymous::MissingToken);
    };
    let token = raw
        .to_str()
        .ok()
        .and_then(|value| value.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(Anonymous::MalformedHeader)?;

    tokens.verify(token).map_err(|err| {
        debug!(error = %err, "bearer token rejected; serving request anonymously");
        Anonymous::InvalidToken
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockTokenService, TokenError};
    use crate::domain::{Identity, Role, UserId};
    use actix_web::http::header::HeaderValue;
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    fn identity() -> Identity {
        Identity {
            user_id: UserId::random(),
            role: Role::Organizer,
        }
    }

    fn accepting(expected: Identity) -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().returning(move |token| {
            if token == "good-token" {
                Ok(expected)
            } else {
                Err(TokenError::invalid("bad signature"))
            }
        });
        tokens
    }

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[given("a request carrying a valid bearer token")]
    fn a_request_carrying_a_valid_bearer_token() -> HeaderMap {
        headers_with("Bearer good-token")
    }

    #[given("a request carrying a forged bearer token")]
    fn a_request_carrying_a_forged_bearer_token() -> HeaderMap {
        headers_with("Bearer forged-token")
    }

    #[when("the caller is resolved")]
    fn the_caller_is_resolved(headers: &HeaderMap, tokens: &MockTokenService) -> CallerIdentity {
        caller_identity(headers, tokens)
    }

    #[then("the token's identity is attached")]
    fn the_tokens_identity_is_attached(result: CallerIdentity, expected: Identity) {
        assert_eq!(result, Ok(expected));
    }

    #[then("the request continues anonymously")]
    fn the_request_continues_anonymously(result: CallerIdentity, reason: Anonymous) {
        assert_eq!(result, Err(reason));
    }

    #[rstest]
    fn valid_bearer_token_yields_identity() {
        let expected = identity();
        let tokens = accepting(expected);
        let headers = a_request_carrying_a_valid_bearer_token();
        let result = the_caller_is_resolved(&headers, &tokens);
        the_tokens_identity_is_attached(result, expected);
    }

    #[rstest]
    fn forged_token_is_silently_anonymous() {
        let tokens = accepting(identity());
        let headers = a_request_carrying_a_forged_bearer_token();
        let result = the_caller_is_resolved(&headers, &tokens);
        the_request_continues_anonymously(result, Anonymous::InvalidToken);
    }

    #[rstest]
    #[case::lowercase_scheme("bearer good-token")]
    #[case::padded("  Bearer   good-token  ")]
    fn scheme_is_case_insensitive(#[case] header: &'static str) {
        let expected = identity();
        let tokens = accepting(expected);
        assert_eq!(caller_identity(&headers_with(header), &tokens), Ok(expected));
    }

    #[rstest]
    #[case::basic_auth("Basic dXNlcjpwYXNz")]
    #[case::no_token("Bearer")]
    #[case::blank_token("Bearer    ")]
    fn non_bearer_headers_are_malformed(#[case] header: &'static str) {
        let tokens = MockTokenService::new();
        let result = caller_identity(&headers_with(header), &tokens);
        the_request_continues_anonymously(result, Anonymous::MalformedHeader);
    }

    #[rstest]
    fn missing_header_is_anonymous() {
        let tokens = MockTokenService::new();
        let result = caller_identity(&HeaderMap::new(), &tokens);
        the_request_continues_anonymously(result, Anonymous::MissingToken);
    }
}
