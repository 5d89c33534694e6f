//! Shared Axum utilities for the shop services.
//!
//! - **[`auth`]**: stateless JWT issuance/verification and the role-gate
//!   middleware every protected route goes through
//! - **[`extractors`]**: request-boundary validation (`ValidatedJson`)

pub mod auth;
pub mod extractors;

pub use auth::{
    ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, JwtConfig, REFRESH_TOKEN_TTL, RoleGate, role_gate,
};
pub use extractors::ValidatedJson;
