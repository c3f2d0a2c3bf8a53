//! Live system introspection for status reporting.
//!
//! The values here describe the machine a grid member is running on and are
//! rendered into every configuration XML snapshot. They are read fresh on
//! each call rather than cached, so a status page always reflects the
//! current network identity of the host.

use std::net::UdpSocket;

/// A human-readable descriptor of the operating system and architecture,
/// e.g. `linux x86_64`.
pub fn os_string() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

/// The host's name, or `unknown` if it cannot be determined.
pub fn host_name() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// The local IP address other grid members would use to reach this host.
///
/// Determined by opening a UDP socket toward a public address and reading
/// the local end; no packet is actually sent. Falls back to `127.0.0.1`
/// when the host has no route.
pub fn ip_address() -> String {
    local_routable_ip().unwrap_or_else(|| "127.0.0.1".to_string())
}

fn local_routable_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let addr = socket.local_addr().ok()?;
    Some(addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_string_names_current_platform() {
        let os = os_string();
        assert!(os.contains(std::env::consts::OS));
        assert!(os.contains(std::env::consts::ARCH));
    }

    #[test]
    fn test_host_name_is_nonempty() {
        assert!(!host_name().is_empty());
    }

    #[test]
    fn test_ip_address_parses() {
        let ip = ip_address();
        assert!(ip.parse::<std::net::IpAddr>().is_ok(), "not an IP: {}", ip);
    }
}
