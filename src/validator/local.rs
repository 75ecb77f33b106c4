/// RFC 5322 `atext`: ASCII letters, digits and the printable specials.
fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c)
}

/// Strict rules: a dot-atom, non-empty runs of `atext` joined by single dots.
pub(crate) fn is_local_strict(local: &str) -> bool {
    local
        .split('.')
        .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

/// Relaxed rules: also takes a simple quoted string (no inner quote, no
/// control characters).
pub(crate) fn is_local_relaxed(local: &str) -> bool {
    match local.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        Some(inner) => {
            !inner.is_empty() && !inner.contains('"') && !inner.chars().any(char::is_control)
        }
        None => is_local_strict(local),
    }
}
