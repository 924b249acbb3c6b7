//! Tenant resolution from the request hostname.

/// Identity of the caller's tenant, derived once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    /// Hostname as received, without port.
    pub original_host: String,
    /// Subdomain label(s) in front of the base domain, or the full hostname.
    pub tenant_id: String,
}

/// Derive the tenant for `host` under `base_domain`.
///
/// `hmg.example.com` under `example.com` yields `hmg`. Hosts outside the
/// base domain are their own tenant id. Matching is case-sensitive and the
/// host is not normalized.
pub fn resolve_tenant(host: &str, base_domain: &str) -> TenantContext {
    let suffix = format!(".{base_domain}");
    let tenant_id = host.strip_suffix(suffix.as_str()).unwrap_or(host);

    TenantContext {
        original_host: host.to_string(),
        tenant_id: tenant_id.to_string(),
    }
}
