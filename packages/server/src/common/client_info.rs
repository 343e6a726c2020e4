use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "unknown";

/// Where a request came from, as far as the edge can tell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: String,
}

impl ClientInfo {
    pub fn new(ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self::unknown()
    }
}
