use chrono::Local;
use uuid::Uuid;

/// Format: {YYYYMMDD}-{HHmmss}-{random8}
///
/// Sorts by start time; the random suffix keeps runs started in the same
/// second apart.
pub fn generate_session_id() -> String {
    let ts = Local::now().format("%Y%m%d-%H%M%S");
    let uuid = Uuid::new_v4().simple().to_string();
    let suffix = &uuid[..8];
    format!("{}-{}", ts, suffix)
}
