use crate::Result;
use crate::ServiceError;

/// Splits `host:port`, `[ipv6]:port` or `host:` into host and port.
///
/// The port is returned as text and may be empty; callers decide what a
/// valid port is. Brackets are stripped from IPv6 hosts.
pub fn split_host_port(addr: &str) -> Result<(String, String)> {
    let invalid = || ServiceError::InvalidServiceAddress {
        addr: addr.to_string(),
    };

    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        let Some(end) = rest.find(']') else {
            return Err(invalid().into());
        };
        let Some(port) = rest[end + 1..].strip_prefix(':') else {
            return Err(invalid().into());
        };
        (&rest[..end], port)
    } else {
        let Some(colon) = addr.rfind(':') else {
            return Err(invalid().into());
        };
        let host = &addr[..colon];
        if host.contains(':') {
            return Err(invalid().into());
        }
        (host, &addr[colon + 1..])
    };

    if host.contains(['[', ']']) || port.contains(['[', ']', ':']) {
        return Err(invalid().into());
    }

    Ok((host.to_string(), port.to_string()))
}

/// Parses a decimal TCP port.
pub fn parse_port(port: &str) -> Result<u16> {
    port.parse::<u16>().map_err(|_| {
        ServiceError::InvalidPort {
            port: port.to_string(),
        }
        .into()
    })
}
