//! Client metadata extraction
//!
//! The transport layer hands over raw request headers; these helpers pick the
//! IP and user agent the OTP store binds records and blocks to.

use std::collections::HashMap;

/// Placeholder used when a value cannot be determined
pub const UNKNOWN: &str = "unknown";

fn header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Resolve the originating client IP
///
/// Order: first `x-forwarded-for` hop, `x-real-ip`, the socket peer address.
pub fn resolve_client_ip(headers: &HashMap<String, String>, peer: Option<&str>) -> String {
    if let Some(forwarded) = header(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|ip| !ip.is_empty()) {
            return first.to_string();
        }
    }

    header(headers, "x-real-ip")
        .or(peer.map(str::trim).filter(|p| !p.is_empty()))
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Resolve the client user agent
pub fn resolve_user_agent(headers: &HashMap<String, String>) -> String {
    header(headers, "user-agent").unwrap_or(UNKNOWN).to_string()
}
