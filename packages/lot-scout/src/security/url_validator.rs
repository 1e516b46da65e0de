//! URL validation for SSRF protection.
//!
//! Auction URLs come straight from API callers and the server fetches them,
//! so they are checked before any request leaves the process.

use std::collections::HashSet;
use std::net::IpAddr;

use url::Url;

use crate::error::{SecurityError, SecurityResult};

/// URL validator for SSRF protection.
///
/// Rejects:
/// - Internal services (localhost, 127.0.0.1)
/// - Private IP ranges (10.x, 172.16.x, 192.168.x)
/// - Cloud metadata services (169.254.x)
/// - Non-HTTP(S) schemes (file://, ftp://)
/// - Names that resolve into any of the blocked ranges
#[derive(Debug, Clone)]
pub struct UrlValidator {
    allowed_schemes: HashSet<String>,
    blocked_hosts: HashSet<String>,
    blocked_cidrs: Vec<ipnet::IpNet>,
    resolve_dns: bool,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    /// Create a new URL validator with default security rules.
    pub fn new() -> Self {
        let blocked_cidrs = [
            "10.0.0.0/8",
            "172.16.0.0/12",
            "192.168.0.0/16",
            "169.254.0.0/16", // Link-local / cloud metadata
            "127.0.0.0/8",
            "0.0.0.0/8",
            "::1/128",
            "fc00::/7",
            "fe80::/10",
        ]
        .into_iter()
        .filter_map(|cidr| cidr.parse().ok())
        .collect();

        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: [
                "localhost",
                "0.0.0.0",
                "metadata.google.internal",
                "metadata.gke.internal",
                "instance-data",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            blocked_cidrs,
            resolve_dns: true,
        }
    }

    /// Skip host resolution in [`validate_with_dns`](Self::validate_with_dns).
    ///
    /// Static checks still apply. Meant for offline environments where the
    /// fetcher never touches the network.
    pub fn skip_dns_check(mut self) -> Self {
        self.resolve_dns = false;
        self
    }

    /// Validate a parsed URL without touching the network.
    pub fn validate_url(&self, url: &Url) -> SecurityResult<()> {
        if !self.allowed_schemes.contains(url.scheme()) {
            return Err(SecurityError::DisallowedScheme(url.scheme().to_string()));
        }

        let host = url.host_str().ok_or(SecurityError::NoHost)?.to_lowercase();

        if self.blocked_hosts.contains(&host) {
            return Err(SecurityError::BlockedHost(host));
        }

        if let Some(ip) = ip_literal(&host) {
            if self.is_blocked(&ip) {
                return Err(SecurityError::BlockedCidr(ip.to_string()));
            }
        }

        Ok(())
    }

    /// Validate a URL, then resolve its host and check every address.
    pub async fn validate_with_dns(&self, url: &Url) -> SecurityResult<()> {
        self.validate_url(url)?;

        if !self.resolve_dns {
            return Ok(());
        }

        let host = url.host_str().ok_or(SecurityError::NoHost)?.to_lowercase();

        // IP literals were checked above
        if ip_literal(&host).is_some() {
            return Ok(());
        }

        let port = url.port_or_known_default().unwrap_or(80);
        let addrs = tokio::net::lookup_host((host.as_str(), port))
            .await
            .map_err(|e| SecurityError::DnsResolution(format!("{}: {}", host, e)))?;

        self.check_resolved(&host, addrs.map(|addr| addr.ip()))
    }

    /// Reject the host if any resolved address is in a blocked range.
    fn check_resolved(&self, host: &str, ips: impl IntoIterator<Item = IpAddr>) -> SecurityResult<()> {
        match ips.into_iter().find(|ip| self.is_blocked(ip)) {
            Some(ip) => Err(SecurityError::BlockedCidr(format!(
                "DNS for {} resolved to blocked IP {}",
                host, ip
            ))),
            None => Ok(()),
        }
    }

    fn is_blocked(&self, ip: &IpAddr) -> bool {
        self.blocked_cidrs.iter().any(|cidr| cidr.contains(ip))
    }
}

/// The host as an IP address, if it is one. IPv6 hosts come back bracketed
/// from `host_str()`.
fn ip_literal(host: &str) -> Option<IpAddr> {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(validator: &UrlValidator, url: &str) -> SecurityResult<()> {
        validator.validate_url(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_blocks_localhost() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "http://localhost/").is_err());
        assert!(check(&validator, "http://127.0.0.1/").is_err());
        assert!(check(&validator, "http://[::1]/").is_err());
    }

    #[test]
    fn test_blocks_private_ips() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "http://10.0.0.1/").is_err());
        assert!(check(&validator, "http://172.16.0.1/").is_err());
        assert!(check(&validator, "http://192.168.1.1/").is_err());
    }

    #[test]
    fn test_blocks_metadata_services() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "http://169.254.169.254/").is_err());
        assert!(check(&validator, "http://metadata.google.internal/").is_err());
    }

    #[test]
    fn test_blocks_non_http() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "file:///etc/passwd").is_err());
        assert!(check(&validator, "ftp://hibid.com/").is_err());
    }

    #[test]
    fn test_allows_auction_sites() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "https://www.hibid.com/catalog/1").is_ok());
        assert!(check(&validator, "https://www.invaluable.com/auction/x").is_ok());
    }

    #[test]
    fn test_resolved_loopback_is_blocked() {
        let validator = UrlValidator::new();
        let err = validator
            .check_resolved(
                "hibid.com.127.0.0.1.nip.io",
                ["127.0.0.1".parse().unwrap()],
            )
            .unwrap_err();
        assert!(matches!(err, SecurityError::BlockedCidr(ref msg) if msg.contains("127.0.0.1")));
    }

    #[test]
    fn test_any_blocked_address_rejects_the_host() {
        let validator = UrlValidator::new();
        let ips: Vec<IpAddr> = vec!["93.184.216.34".parse().unwrap(), "10.1.2.3".parse().unwrap()];
        assert!(validator.check_resolved("mixed.example.com", ips).is_err());
    }

    #[test]
    fn test_public_addresses_pass() {
        let validator = UrlValidator::new();
        let ips: Vec<IpAddr> = vec![
            "93.184.216.34".parse().unwrap(),
            "2606:2800:220:1::248".parse().unwrap(),
        ];
        assert!(validator.check_resolved("www.hibid.com", ips).is_ok());
    }

    #[tokio::test]
    async fn test_dns_check_runs_static_checks_first() {
        let validator = UrlValidator::new();
        let url = Url::parse("http://169.254.169.254/latest").unwrap();
        assert!(matches!(
            validator.validate_with_dns(&url).await,
            Err(SecurityError::BlockedCidr(_))
        ));
    }

    #[tokio::test]
    async fn test_skipped_dns_check_keeps_static_checks() {
        let validator = UrlValidator::new().skip_dns_check();
        let ok = Url::parse("https://www.hibid.com/catalog/1").unwrap();
        assert!(validator.validate_with_dns(&ok).await.is_ok());

        let blocked = Url::parse("http://localhost/").unwrap();
        assert!(validator.validate_with_dns(&blocked).await.is_err());
    }
}
