use crate::constants::MISSING_TOKEN_MARKER;

/// Builds the `Authorization` value for a stored token.
///
/// A missing token is not rejected: the header degrades to `Bearer null`,
/// exactly what a browser produces when interpolating an absent storage entry.
pub fn bearer_value(token: Option<&str>) -> String {
    format!("Bearer {}", token.unwrap_or(MISSING_TOKEN_MARKER))
}
