use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::kernel::BaseCodeGenerator;

/// Lifetime of an issued code
pub const OTP_TTL_SECS: i64 = 5 * 60;

pub const OTP_CODE_MIN: u32 = 100_000;
pub const OTP_CODE_MAX: u32 = 999_999;

/// A pending code for one phone number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpEntry {
    pub phone: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpEntry {
    pub fn new(phone: impl Into<String>, code: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            phone: phone.into(),
            code: code.into(),
            expires_at: issued_at + Duration::seconds(OTP_TTL_SECS),
        }
    }

    /// Live while `now <= expires_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Uniform draw from [100000, 999999] using the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl BaseCodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let code = rand::thread_rng().gen_range(OTP_CODE_MIN..=OTP_CODE_MAX);
        code.to_string()
    }
}
