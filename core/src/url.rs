//! Final request URL resolution.

/// Resolve `target` against `base`.
///
/// Targets with an `http:`/`https:` scheme (any case) or a leading `/` are used
/// as-is; anything else becomes `{base}/{target}`. No slash normalization.
pub fn resolve_url(target: &str, base: &str) -> String {
    if has_http_scheme(target) || target.starts_with('/') {
        target.to_string()
    } else {
        format!("{base}/{target}")
    }
}

fn has_http_scheme(target: &str) -> bool {
    let head: String = target.chars().take(6).collect::<String>().to_ascii_lowercase();
    head.starts_with("http:") || head.starts_with("https:")
}
