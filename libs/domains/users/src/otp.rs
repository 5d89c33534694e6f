//! Time-step one-time codes for email/phone verification.
//!
//! A code is a pure function of (email-derived secret, time step), so
//! no per-challenge state is stored: "resend" regenerates the code for
//! the current window and verification recomputes it.

use totp_rs::{Algorithm, TOTP};

/// Appended to the email to form the per-user shared secret.
const SECRET_TAG: &str = "email";

/// Default code lifetime in seconds
pub const DEFAULT_STEP: u64 = 300;
/// Default code length
pub const DEFAULT_DIGITS: usize = 5;

/// Stateless TOTP generator/verifier keyed by email.
#[derive(Clone, Debug)]
pub struct OtpEngine {
    step: u64,
    digits: usize,
}

impl Default for OtpEngine {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl OtpEngine {
    pub fn new(step: u64, digits: usize) -> Self {
        Self { step, digits }
    }

    // 5-digit codes and raw string secrets sit outside RFC 6238
    // strictness, hence the unchecked constructor.
    pub(crate) fn totp_for(&self, email: &str) -> TOTP {
        TOTP::new_unchecked(
            Algorithm::SHA1,
            self.digits,
            0,
            self.step,
            format!("{}{}", email, SECRET_TAG).into_bytes(),
        )
    }

    /// Generate the code for the current time window
    pub fn generate(&self, email: &str) -> Result<String, std::time::SystemTimeError> {
        self.totp_for(email).generate_current()
    }

    /// Check a code against the current time window only (no skew)
    pub fn verify(&self, email: &str, code: &str) -> bool {
        self.totp_for(email).check_current(code).unwrap_or(false)
    }
}
