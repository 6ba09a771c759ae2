use axum::http::HeaderMap;


/// Extract the access token from the HTTP Authorization header
///
/// Accepted formats:
/// - "Authorization: Bearer <token>"
/// - "Authorization: <token>"
pub fn extract_token(headers: &HeaderMap) -> Result<String, TokenError> {
    let auth_header = headers
        .get("authorization")
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::InvalidFormat)?;

    parse_token(auth_header)
}

/// Check the request carries `expected`. No expected token means the
/// endpoint is open.
pub fn authorize(headers: &HeaderMap, expected: Option<&str>) -> Result<(), TokenError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let token = extract_token(headers)?;
    if !tokens_match(&token, expected) {
        return Err(TokenError::Mismatch);
    }
    Ok(())
}

/// Compares two tokens without exiting at the first differing byte. Only
/// the length can be observed through timing.
fn tokens_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Parse token from Authorization header value
fn parse_token(header_value: &str) -> Result<String, TokenError> {
    let value = header_value.trim();

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return Err(TokenError::InvalidFormat),
        None if value.eq_ignore_ascii_case("bearer") => "",
        None => value,
    };

    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    Ok(token.to_string())
}

/// Token extraction errors
#[derive(Debug, PartialEq, Clone)]
pub enum TokenError {
    /// Authorization header not present
    Missing,
    /// Not "Bearer <token>" or a bare token
    InvalidFormat,
    /// Token is empty string
    Empty,
    /// Token does not match the configured one
    Mismatch,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Missing => write!(f, "Missing authorization token"),
            TokenError::InvalidFormat => write!(f, "Invalid authorization header format"),
            TokenError::Empty => write!(f, "Authorization token is empty"),
            TokenError::Mismatch => write!(f, "Authorization token is not valid"),
        }
    }
}

impl std::error::Error for TokenError {}
