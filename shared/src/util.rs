/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a new opaque resource identifier (UUID v4, hyphenated)
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Normalize an email address for lookups and unique constraints.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Build a URL slug from a display name.
///
/// ASCII alphanumerics are kept (lowercased), every other run of characters
/// collapses into a single `-`, and leading/trailing dashes are dropped.
/// Returns `"restaurant"` when nothing usable remains.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "restaurant".to_string()
    } else {
        slug
    }
}
