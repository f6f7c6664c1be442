//! Shared plumbing for the Connect-style RPC handlers.
//!
//! Every RPC is a `POST` with a JSON body. Page tokens are decimal
//! offsets handed back to the caller in `nextPageToken`.

use axum::Json;
use axum_extra::extract::WithRejection;

use crate::models::{PageRequest, Paged};
use crate::{Error, Result};

/// JSON request body whose decode failures surface as `invalid_argument`.
pub type Rpc<T> = WithRejection<Json<T>, Error>;

/// Parse a page token into an offset. Empty means the first page.
pub fn parse_page_token(token: &str) -> Result<i32> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(0);
    }
    token
        .parse::<i32>()
        .map_err(|_| Error::InvalidArgument(format!("invalid page token: {}", token)))
}

/// Build the paging arguments from the wire fields.
pub fn page_request(page_size: i32, page_token: &str) -> Result<PageRequest> {
    Ok(PageRequest::new(page_size, parse_page_token(page_token)?))
}

/// Token for the following page, empty when this page was not full.
pub fn next_page_token<T>(paged: &Paged<T>) -> String {
    paged
        .next_offset()
        .map(|offset| offset.to_string())
        .unwrap_or_default()
}

/// Trimmed, non-empty string field.
pub fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Page;

    #[test]
    fn test_parse_page_token() {
        assert_eq!(parse_page_token("").unwrap(), 0);
        assert_eq!(parse_page_token("50").unwrap(), 50);
        assert_eq!(parse_page_token("-3").unwrap(), -3);
        assert_eq!(
            parse_page_token("abc").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            parse_page_token("99999999999").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_next_page_token_echoes_offset_plus_limit() {
        let page = Page { limit: 2, offset: 10 };
        assert_eq!(next_page_token(&Paged { items: vec!['a', 'b'], page }), "12");
        assert_eq!(next_page_token(&Paged { items: vec!['a'], page }), "");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" x "), Some("x"));
    }
}
