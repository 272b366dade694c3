//! Visitor analytics: a row in `visitor_stats` for every request.
//!
//! Recording a visit must never break the request it describes, so every
//! failure here is logged and swallowed.

use axum::{
    extract::{Request, State},
    http::header::USER_AGENT,
    middleware::Next,
    response::Response,
};

use crate::database::Db;
use crate::models::{VisitorStat, VisitorSummary};

/// What we learn about a client from its `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub browser: String,
    pub device: String,
    pub operating_system: String,
    pub is_bot: bool,
}

const BOT_MARKERS: [&str; 8] = [
    "bot", "crawler", "spider", "slurp", "curl", "wget", "python-requests", "headless",
];

/// Order matters: Edge and Opera also advertise Chrome, and Chrome also
/// advertises Safari.
const BROWSERS: [(&str, &str); 7] = [
    ("edg/", "Edge"),
    ("opr/", "Opera"),
    ("firefox/", "Firefox"),
    ("chromium/", "Chromium"),
    ("chrome/", "Chrome"),
    ("safari/", "Safari"),
    ("msie", "IE"),
];

const OPERATING_SYSTEMS: [(&str, &str); 7] = [
    ("windows", "Windows"),
    ("android", "Android"),
    ("iphone", "iOS"),
    ("ipad", "iOS"),
    ("mac os x", "Mac OS X"),
    ("cros", "Chrome OS"),
    ("linux", "Linux"),
];

fn first_match(haystack: &str, table: &[(&str, &str)]) -> Option<String> {
    table
        .iter()
        .find(|(needle, _)| haystack.contains(needle))
        .map(|(_, name)| name.to_string())
}

/// Classify a user agent string by substring matching.
pub fn parse_user_agent(user_agent: &str) -> ClientInfo {
    let lowered = user_agent.to_lowercase();

    let is_bot = BOT_MARKERS.iter().any(|marker| lowered.contains(marker));
    let browser = first_match(&lowered, &BROWSERS).unwrap_or_else(|| "Other".to_string());
    let operating_system =
        first_match(&lowered, &OPERATING_SYSTEMS).unwrap_or_else(|| "Other".to_string());

    let device = if is_bot {
        "Spider"
    } else if lowered.contains("ipad") || lowered.contains("tablet") {
        "Tablet"
    } else if lowered.contains("mobile") || lowered.contains("iphone") {
        "Mobile"
    } else if lowered.contains("windows") || lowered.contains("macintosh") || lowered.contains("x11")
    {
        "Desktop"
    } else {
        "Other"
    }
    .to_string();

    ClientInfo {
        browser,
        device,
        operating_system,
        is_bot,
    }
}

pub async fn record_visit(db: &Db, client: &ClientInfo, timestamp: i64) -> Result<(), libsql::Error> {
    let conn = db.write().await;
    conn.execute(
        "INSERT INTO visitor_stats (browser, device, operating_system, is_bot, timestamp) VALUES (?, ?, ?, ?, ?)",
        (
            client.browser.as_str(),
            client.device.as_str(),
            client.operating_system.as_str(),
            client.is_bot as i64,
            timestamp,
        ),
    )
    .await?;
    Ok(())
}

/// Middleware that runs the request and then records the visit.
///
/// The insert needs the connection's write lock, so it is taken only after
/// the handler has finished with the database.
pub async fn track_visitor(State(db): State<Db>, request: Request, next: Next) -> Response {
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let client = parse_user_agent(user_agent);
    let timestamp = time::OffsetDateTime::now_utc().unix_timestamp();

    let response = next.run(request).await;

    if let Err(error) = record_visit(&db, &client, timestamp).await {
        tracing::warn!("visitor stats logging error: {}", error);
    }

    response
}

fn extract_visitor_stat_from_row(row: libsql::Row) -> Result<VisitorStat, libsql::Error> {
    let is_bot: i64 = row.get(4)?;

    Ok(VisitorStat {
        id: row.get(0)?,
        browser: row.get(1)?,
        device: row.get(2)?,
        operating_system: row.get(3)?,
        is_bot: is_bot != 0,
        timestamp: row.get(5)?,
    })
}

/// Most recent visits first.
pub async fn recent_visits(db: &Db, limit: u32, offset: u32) -> Result<Vec<VisitorStat>, libsql::Error> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            "SELECT id, browser, device, operating_system, is_bot, timestamp FROM visitor_stats ORDER BY id DESC LIMIT ? OFFSET ?",
            (limit, offset),
        )
        .await?;

    let mut visits = Vec::new();
    while let Some(row) = rows.next().await? {
        visits.push(extract_visitor_stat_from_row(row)?);
    }
    Ok(visits)
}

pub async fn visitor_summary(db: &Db) -> Result<VisitorSummary, libsql::Error> {
    let conn = db.read().await;
    let mut rows = conn
        .query(
            "SELECT COUNT(*), COALESCE(SUM(is_bot), 0) FROM visitor_stats",
            (),
        )
        .await?;

    let (total, bots): (u32, u32) = match rows.next().await? {
        Some(row) => (row.get(0)?, row.get(1)?),
        None => (0, 0),
    };

    Ok(VisitorSummary {
        total,
        bots,
        humans: total - bots,
    })
}
