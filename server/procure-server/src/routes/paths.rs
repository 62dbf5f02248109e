//! Route path constants for the HTTP surface.

/// Liveness probe.
pub const HEALTH: &str = "/health";

/// Prefix the versioned API surface is nested under.
pub const API_V1: &str = "/api/v1";

/// Paths relative to [`API_V1`].
pub mod api_v1 {
    pub const AUTH_REGISTER: &str = "/auth/register";
    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_ME: &str = "/auth/me";

    pub const CONTACT: &str = "/contact";

    pub const TENDERS: &str = "/tenders";
    pub const TENDER_BY_ID: &str = "/tenders/:id";
    pub const TENDER_AWARD: &str = "/tenders/:id/award";
    pub const TENDER_BIDS: &str = "/tenders/:id/bids";

    pub const AUDIT_LOGS: &str = "/audit-logs";

    pub const ADMIN_DEACTIVATE_USER: &str = "/admin/users/:id/deactivate";
}
