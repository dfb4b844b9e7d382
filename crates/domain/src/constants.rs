//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client.

// Credential storage keys
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

// Resource synchronisation defaults
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const FIRST_PAGE: u64 = 1;

// Auth endpoints
pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const AUTH_REGISTER_PATH: &str = "/auth/register";
pub const AUTH_REFRESH_PATH: &str = "/auth/refresh";
pub const AUTH_LOGOUT_PATH: &str = "/auth/logout";

// Resource endpoints
pub const WORK_ORDERS_PATH: &str = "/work-orders";
pub const CLIENTS_PATH: &str = "/clients";
pub const DASHBOARD_STATS_PATH: &str = "/dashboard/stats";
