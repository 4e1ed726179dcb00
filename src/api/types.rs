// API payload types
// Serialized into the `data` field of success envelopes

use serde::Serialize;
use serde_json::Value;

use crate::config::Environment;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// Whole seconds since process start
    pub uptime: u64,
    pub memory: Option<MemoryUsage>,
    pub version: String,
    pub environment: Environment,
    pub timestamp: String,
}

/// Process memory as reported by the OS, in kilobytes
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MemoryUsage {
    pub resident_kb: u64,
    pub virtual_kb: u64,
}

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub message: String,
    pub slug: String,
    pub greeting_id: String,
    pub is_email: bool,
    pub environment: Environment,
}

#[derive(Debug, Serialize)]
pub struct Echo {
    pub echo: Value,
    pub received_at: String,
    pub content_type: Option<String>,
    pub method: String,
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimeInfo {
    pub current: CurrentTime,
    pub tomorrow: Tomorrow,
    pub timezone: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentTime {
    pub iso: String,
    pub date: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub is_today: bool,
}

#[derive(Debug, Serialize)]
pub struct Tomorrow {
    pub iso: String,
    pub date: String,
    pub days_between: i64,
}

/// Mock user record; a real deployment would load this from storage
#[derive(Debug, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub slug: String,
    pub created_at: String,
    pub is_active: bool,
    pub last_login: String,
}

#[derive(Debug, Serialize)]
pub struct TextUtilities {
    pub original: String,
    pub slug: String,
    pub capitalized: String,
    pub truncated: String,
    pub kebab_case: String,
}
