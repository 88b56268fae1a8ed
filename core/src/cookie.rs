//! Reading a named cookie out of `document.cookie`.

use percent_encoding::percent_decode_str;

use crate::env::CookieStore;

/// Value of the first cookie called `name`, or an empty string.
pub fn get_cookie<C: CookieStore + ?Sized>(store: &C, name: &str) -> String {
    parse_cookie(&store.cookie_string(), name)
}

/// Find `name` in a `a=1; b=2` style cookie string.
///
/// The whole string is percent-decoded first (invalid UTF-8 is replaced),
/// then each `;` segment has its leading spaces stripped and the first one
/// starting with `name=` wins.
pub fn parse_cookie(cookies: &str, name: &str) -> String {
    let decoded = percent_decode_str(cookies).decode_utf8_lossy();
    let prefix = format!("{name}=");
    decoded
        .split(';')
        .map(|segment| segment.trim_start_matches(' '))
        .find_map(|segment| segment.strip_prefix(prefix.as_str()))
        .unwrap_or_default()
        .to_string()
}
