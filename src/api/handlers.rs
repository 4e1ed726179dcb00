// Representative endpoint handlers
// Each is a pure function of the request; validation failures are returned
// as structured rejections so they never become 500s.

use chrono::Utc;
use serde_json::Value;

use super::types::{
    CurrentTime, Echo, Greeting, HealthStatus, MemoryUsage, TextUtilities, TimeInfo, Tomorrow,
    User,
};
use crate::handler::{reply, AppContext, HandlerError, HandlerResult};
use crate::http::InboundRequest;
use crate::utils::text;
use crate::utils::time;

const GREETING_ID_LENGTH: usize = 8;
const SLUG_TRUNCATE_LENGTH: usize = 20;

/// `GET /health`
pub fn health(_req: &InboundRequest, ctx: &AppContext) -> HandlerResult {
    reply(&HealthStatus {
        status: "healthy",
        uptime: ctx.uptime_secs(),
        memory: memory_usage(),
        version: ctx.version.clone(),
        environment: ctx.environment,
        timestamp: time::format_iso(Utc::now()),
    })
}

/// `GET /api/hello?name=...`
pub fn hello(req: &InboundRequest, ctx: &AppContext) -> HandlerResult {
    let name = req.query("name").filter(|n| !n.is_empty()).unwrap_or("World");
    let sanitized = text::capitalize(name.trim());

    reply(&Greeting {
        message: format!("Hello, {sanitized}!"),
        slug: text::slugify(&sanitized),
        greeting_id: text::random(GREETING_ID_LENGTH),
        is_email: text::is_email(name),
        environment: ctx.environment,
    })
}

/// `POST /api/echo`
pub fn echo(req: &InboundRequest, _ctx: &AppContext) -> HandlerResult {
    let body = match req.body.as_deref() {
        None | Some("") => Value::Object(serde_json::Map::new()),
        Some(raw) => serde_json::from_str(raw).map_err(|e| {
            HandlerError::bad_request("INVALID_JSON", "Invalid JSON in request body")
                .with_details(serde_json::json!({ "error": e.to_string() }))
        })?,
    };

    reply(&Echo {
        echo: body,
        received_at: time::format_iso(Utc::now()),
        content_type: req.header("content-type").map(ToString::to_string),
        method: req.method.clone(),
        user_agent: req.header("user-agent").map(ToString::to_string),
    })
}

/// `GET /api/time`
pub fn current_time(_req: &InboundRequest, _ctx: &AppContext) -> HandlerResult {
    let now = Utc::now();
    let tomorrow = time::add_days(now, 1);

    reply(&TimeInfo {
        current: CurrentTime {
            iso: time::format_iso(now),
            date: time::format_date(now),
            timestamp: now.timestamp_millis(),
            is_today: time::is_today(now),
        },
        tomorrow: Tomorrow {
            iso: time::format_iso(tomorrow),
            date: time::format_date(tomorrow),
            days_between: time::days_between(now, tomorrow),
        },
        timezone: time::local_timezone(),
    })
}

/// `GET /api/users/:id`
pub fn user(req: &InboundRequest, _ctx: &AppContext) -> HandlerResult {
    let id = req
        .path_parameter("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            HandlerError::bad_request("MISSING_USER_ID", "User ID is required in path parameters")
        })?;

    let is_email = text::is_email(id);
    if !is_email && !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HandlerError::bad_request(
            "INVALID_USER_ID",
            "User ID must be a number or valid email address",
        ));
    }

    let alphanumeric: String = id.chars().filter(char::is_ascii_alphanumeric).collect();
    let now = Utc::now();

    reply(&User {
        id: id.to_string(),
        name: text::capitalize(&format!("user {alphanumeric}")),
        email: if is_email {
            id.to_string()
        } else {
            format!("user{id}@example.com")
        },
        slug: text::slugify(&format!("user-{id}")),
        created_at: time::format_iso(time::add_days(now, -30)),
        is_active: true,
        last_login: time::format_iso(time::add_days(now, -1)),
    })
}

/// `GET /api/utils/slug?text=...`
pub fn slug(req: &InboundRequest, _ctx: &AppContext) -> HandlerResult {
    let input = req
        .query("text")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| HandlerError::bad_request("MISSING_TEXT", "Text parameter is required"))?;

    reply(&TextUtilities {
        original: input.to_string(),
        slug: text::slugify(input),
        capitalized: text::capitalize(input),
        truncated: text::truncate(input, SLUG_TRUNCATE_LENGTH, "..."),
        kebab_case: text::camel_to_kebab(input),
    })
}

/// Best-effort resident/virtual memory from `/proc/self/status`
fn memory_usage() -> Option<MemoryUsage> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_memory_status(&status)
}

fn parse_memory_status(status: &str) -> Option<MemoryUsage> {
    let field = |name: &str| {
        status
            .lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|rest| rest.trim().trim_end_matches("kB").trim().parse::<u64>().ok())
    };

    Some(MemoryUsage {
        resident_kb: field("VmRSS:")?,
        virtual_kb: field("VmSize:")?,
    })
}
