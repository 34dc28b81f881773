//! HTTP handlers for the catalog pages and form submissions.

pub mod books;
pub mod comments;
pub mod directory;

use crate::error::AppError;

/// Path ids are positive integers; anything else is a bad request.
pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("0"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
    }
}
