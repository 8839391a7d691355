//! Share-link addressing
//!
//! A share link is the application's base URL with a `#/share/<batchId>`
//! fragment. It carries no payload, only the key of a locally stored batch.

use url::Url;

use crate::error::CoreError;
use crate::Result;

const SHARE_ROUTE: &str = "/share/";

/// Build the share link for `batch_id`, replacing any fragment on `base`.
pub fn share_link(base: &str, batch_id: &str) -> Result<String> {
    if batch_id.is_empty() || batch_id.contains('/') {
        return Err(CoreError::InvalidLink(format!("bad batch id: {batch_id:?}")));
    }

    let mut url = Url::parse(base).map_err(|e| CoreError::InvalidLink(format!("{base}: {e}")))?;
    url.set_fragment(Some(&format!("{SHARE_ROUTE}{batch_id}")));
    Ok(url.to_string())
}

/// Extract the batch id from a share link.
///
/// Accepts a full URL (`snapshare://local/#/share/<id>`), a bare fragment
/// (`#/share/<id>`) or the route alone (`/share/<id>`). Returns `None` for
/// anything else, including other routes and empty ids.
pub fn parse_share_link(input: &str) -> Option<String> {
    let input = input.trim();

    let route = if let Some(fragment) = input.strip_prefix('#') {
        fragment.to_string()
    } else if input.starts_with(SHARE_ROUTE) {
        input.to_string()
    } else {
        Url::parse(input).ok()?.fragment()?.to_string()
    };

    let id = route.strip_prefix(SHARE_ROUTE)?.trim_end_matches('/');
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(id.to_string())
}

/// Resolve user input that may be either a share link or a bare batch id.
pub fn resolve_batch_ref(input: &str) -> Option<String> {
    if let Some(id) = parse_share_link(input) {
        return Some(id);
    }

    let input = input.trim();
    let is_bare_id = !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    is_bare_id.then(|| input.to_string())
}
