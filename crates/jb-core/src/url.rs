//! URL helpers for the hot path
//!
//! These functions work directly on string slices and only allocate when a
//! host has to be lower-cased.

use std::borrow::Cow;

// =============================================================================
// Scheme
// =============================================================================

/// Get the position after "://".
#[inline]
pub fn get_scheme_end(url: &str) -> Option<usize> {
    let bytes = url.as_bytes();

    // Find ':'
    let colon_pos = bytes.iter().position(|&b| b == b':')?;
    if colon_pos == 0 {
        return None;
    }

    // Check for "://"
    if bytes.len() > colon_pos + 2 && bytes[colon_pos + 1] == b'/' && bytes[colon_pos + 2] == b'/' {
        return Some(colon_pos + 3);
    }

    None
}

// =============================================================================
// Host Extraction
// =============================================================================

/// Get the start and end positions of the hostname in a URL.
#[inline]
pub fn get_host_position(url: &str) -> Option<(usize, usize)> {
    let scheme_end = get_scheme_end(url)?;
    let bytes = url.as_bytes();

    // Authority ends at the first '/', '?' or '#'
    let mut authority_end = bytes.len();
    for (i, &b) in bytes[scheme_end..].iter().enumerate() {
        if b == b'/' || b == b'?' || b == b'#' {
            authority_end = scheme_end + i;
            break;
        }
    }

    // Skip userinfo
    let host_start = match bytes[scheme_end..authority_end].iter().rposition(|&b| b == b'@') {
        Some(at) => scheme_end + at + 1,
        None => scheme_end,
    };

    // Bracketed IPv6 literal
    if bytes.get(host_start) == Some(&b'[') {
        let close = bytes[host_start..authority_end].iter().position(|&b| b == b']')?;
        return Some((host_start, host_start + close + 1));
    }

    // Host ends before the port
    let host_end = bytes[host_start..authority_end]
        .iter()
        .position(|&b| b == b':')
        .map_or(authority_end, |i| host_start + i);

    if host_end == host_start {
        return None;
    }

    Some((host_start, host_end))
}

/// Host slice of a URL, original case.
#[inline]
pub fn extract_host(url: &str) -> Option<&str> {
    let (start, end) = get_host_position(url)?;
    Some(&url[start..end])
}

/// Host of a URL, lower-cased. Borrows when the host is already lower-case.
pub fn extract_host_lowercase(url: &str) -> Option<Cow<'_, str>> {
    let host = extract_host(url)?;
    Some(to_lowercase_cow(host))
}

/// Lower-case a string, borrowing when nothing changes.
pub fn to_lowercase_cow(s: &str) -> Cow<'_, str> {
    if !s.is_ascii() {
        return Cow::Owned(s.to_lowercase());
    }
    if s.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(s.to_ascii_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

// =============================================================================
// Path
// =============================================================================

/// Extract the path portion of a URL.
#[inline]
pub fn extract_path(url: &str) -> &str {
    let (_, host_end) = match get_host_position(url) {
        Some(pos) => pos,
        None => return "/",
    };

    let bytes = url.as_bytes();

    // Find path start (first '/' after host)
    let mut path_start = None;
    for (i, &b) in bytes[host_end..].iter().enumerate() {
        if b == b'/' {
            path_start = Some(host_end + i);
            break;
        }
        if b == b'?' || b == b'#' {
            return "/";
        }
    }

    let path_start = match path_start {
        Some(pos) => pos,
        None => return "/",
    };

    // Find path end
    let path_end = bytes[path_start..]
        .iter()
        .position(|&b| b == b'?' || b == b'#')
        .map_or(bytes.len(), |i| path_start + i);

    &url[path_start..path_end]
}

// =============================================================================
// Host Suffixes
// =============================================================================

/// Iterator over a host and every suffix that starts right after a dot,
/// from most specific to least specific.
pub struct HostSuffixIter<'a> {
    current: Option<&'a str>,
}

impl<'a> Iterator for HostSuffixIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;
        self.current = result.find('.').map(|dot| &result[dot + 1..]).filter(|s| !s.is_empty());
        Some(result)
    }
}

/// Walk host suffixes, e.g. `a.b.com`, `b.com`, `com`.
pub fn walk_host_suffixes(host: &str) -> HostSuffixIter<'_> {
    HostSuffixIter {
        current: if host.is_empty() { None } else { Some(host) },
    }
}

// =============================================================================
// Separator Check
// =============================================================================

/// Check if a byte is a separator for `^`-suffixed patterns.
#[inline]
pub fn is_separator_char(c: u8) -> bool {
    matches!(c, b'?' | b'/' | b'&' | b'=' | b':' | b';' | b'#')
}

/// Check if position in string is at a separator or at the end.
#[inline]
pub fn is_at_separator(s: &str, pos: usize) -> bool {
    match s.as_bytes().get(pos) {
        None => true,
        Some(&b) => is_separator_char(b),
    }
}

/// True if some occurrence of `needle` in `haystack`, overlapping ones
/// included, is followed by a separator or the end of the string.
pub fn contains_before_separator(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        if is_at_separator(haystack, start + needle.len()) {
            return true;
        }
        // Advance by one char so overlapping occurrences are tried too
        let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
        from = start + step;
    }

    false
}
