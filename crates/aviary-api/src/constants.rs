/// API version prefix for all catalog routes.
pub const API_PREFIX: &str = "/api/v0";
