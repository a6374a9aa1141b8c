use url::Url;

/// Normalizes an arbitrary string to a `scheme://host[:port]` origin.
///
/// Returns an empty string for anything that does not parse as an absolute
/// URL with a tuple origin. Opaque origins (`data:`, `file:`, `about:`) are
/// treated as unparseable so they can never match an allow-list entry.
#[must_use]
pub fn normalize_origin(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let Ok(url) = Url::parse(trimmed) else {
        return String::new();
    };

    let origin = url.origin();
    if !origin.is_tuple() {
        return String::new();
    }

    origin.ascii_serialization()
}

/// Host part of `raw` when it parses as an absolute URL.
#[must_use]
pub fn origin_host(raw: &str) -> Option<String> {
    Url::parse(raw.trim())
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_ascii_lowercase()))
        .filter(|host| !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_scheme_host_and_explicit_port() {
        assert_eq!(
            normalize_origin("https://shop.example:8443/cart?item=1#top"),
            "https://shop.example:8443"
        );
    }

    #[test]
    fn drops_default_port_and_lowercases_host() {
        assert_eq!(normalize_origin(" HTTPS://Shop.Example:443/ "), "https://shop.example");
        assert_eq!(normalize_origin("http://shop.example:80"), "http://shop.example");
    }

    #[test]
    fn malformed_values_collapse_to_empty() {
        for raw in [
            "",
            "   ",
            "shop.example",
            "/relative/path",
            "https://",
            "not a url",
            "data:text/plain,hi",
            "file:///etc/hosts",
            "about:blank",
        ] {
            assert_eq!(normalize_origin(raw), "", "expected empty origin for {raw:?}");
        }
    }

    #[test]
    fn origin_host_reads_lowercase_host() {
        assert_eq!(
            origin_host("https://Tomos.Bot/chat.html").as_deref(),
            Some("tomos.bot")
        );
        assert_eq!(origin_host("chat.html"), None);
    }
}
