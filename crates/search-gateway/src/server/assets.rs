//! Static asset serving.
//!
//! The generated front end is served from disk. Every response from this
//! service carries the OAuth client id cookie the front end needs to start
//! the GitHub authorization flow.

use std::path::Path;

use axum::http::{HeaderValue, header};
use axum_extra::extract::cookie::Cookie;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeader;

use crate::config::CLIENT_ID_COOKIE;

/// `Set-Cookie` value announcing the client id.
///
/// # Errors
///
/// Returns error if the client id cannot be carried in a header.
pub fn client_id_cookie(client_id: &str) -> anyhow::Result<HeaderValue> {
    let cookie = Cookie::build((CLIENT_ID_COOKIE, client_id.to_owned())).path("/").build();
    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| anyhow::anyhow!("client id is not a valid cookie value: {e}"))
}

/// File service over `dir` that appends the client id cookie to every response.
///
/// # Errors
///
/// Returns error if the client id cannot be carried in a header.
pub fn static_files(dir: &Path, client_id: &str) -> anyhow::Result<SetResponseHeader<ServeDir, HeaderValue>> {
    let cookie = client_id_cookie(client_id)?;
    Ok(SetResponseHeader::appending(ServeDir::new(dir), header::SET_COOKIE, cookie))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let value = client_id_cookie("Iv1.8a61f9b3a7aba766").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "stemcstudio-github-application-client-id=Iv1.8a61f9b3a7aba766; Path=/"
        );
    }

    #[test]
    fn test_cookie_rejects_control_characters() {
        assert!(client_id_cookie("bad\nid").is_err());
    }
}
