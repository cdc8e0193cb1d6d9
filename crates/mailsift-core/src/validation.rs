//! Email address validation and normalization.

use std::net::{IpAddr, Ipv6Addr};

use email_address::{EmailAddress, Options};

/// Parser options shared by every validity check.
///
/// Bare addresses only: display-name forms are rejected and the domain must
/// have at least two labels. Bracketed domain literals are narrowed further
/// by [`is_ip_literal`].
fn options() -> Options {
    Options::default().without_display_text().with_required_tld()
}

/// Returns true if `address` is a syntactically valid email address.
///
/// Case is irrelevant to the result; no trimming is performed, so surrounding
/// whitespace makes the address invalid.
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    EmailAddress::parse_with_options(address, options()).is_ok_and(|parsed| {
        let domain = parsed.domain();
        !domain.starts_with('[') || is_ip_literal(domain)
    })
}

/// `[192.0.2.1]` or `[IPv6:2001:db8::1]`; general literals are refused.
fn is_ip_literal(domain: &str) -> bool {
    let Some(inner) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) else {
        return false;
    };
    match inner.strip_prefix("IPv6:") {
        Some(v6) => v6.parse::<Ipv6Addr>().is_ok(),
        None => inner.parse::<IpAddr>().is_ok(),
    }
}

/// Normalized form used for comparison and storage.
#[must_use]
pub fn normalize(address: &str) -> String {
    address.to_lowercase()
}

/// Substring after the final `@`, if there is one.
#[must_use]
pub fn domain_of(address: &str) -> Option<&str> {
    address.rsplit_once('@').map(|(_, domain)| domain)
}
