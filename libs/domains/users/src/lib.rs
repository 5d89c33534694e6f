//! User identity domain: registration with OTP verification over email
//! and SMS, login with JWT issuance, token refresh, and the admin
//! management surface.

pub mod error;
pub mod handlers;
pub mod models;
pub mod otp;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::{AuthState, router};
pub use models::{Role, Status, User, UserResponse};
pub use otp::OtpEngine;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
