use std::net::{IpAddr, Ipv4Addr};

use async_trait::async_trait;
use netbot_core::{HostResolver, ResolveError};
use tokio::net::lookup_host;

/// Hostname lookups through the operating system resolver. Only IPv4 answers
/// count; a host with IPv6 records alone does not resolve.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, hostname: &str) -> Result<Ipv4Addr, ResolveError> {
        let host = hostname.trim();
        if host.is_empty() {
            return Err(ResolveError::NoAddress(hostname.to_owned()));
        }

        let mut addresses = lookup_host((host, 0))
            .await
            .map_err(|error| ResolveError::Lookup { host: host.to_owned(), message: error.to_string() })?;

        addresses
            .find_map(|socket| match socket.ip() {
                IpAddr::V4(address) => Some(address),
                IpAddr::V6(_) => None,
            })
            .ok_or_else(|| ResolveError::NoAddress(host.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use netbot_core::{HostResolver, ResolveError};

    use super::SystemResolver;

    #[tokio::test]
    async fn literal_ipv4_resolves_to_itself() {
        assert_eq!(SystemResolver.resolve(" 127.0.0.1 ").await, Ok(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn ipv6_only_answer_has_no_address() {
        assert_eq!(SystemResolver.resolve("::1").await, Err(ResolveError::NoAddress("::1".to_owned())));
    }

    #[tokio::test]
    async fn blank_hostname_has_no_address() {
        assert_eq!(SystemResolver.resolve("  ").await, Err(ResolveError::NoAddress("  ".to_owned())));
    }
}
