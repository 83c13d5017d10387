//! Stored-name allocation for uploaded files

use chrono::Utc;
use rand::Rng;

/// Derive a sanitized, collision-resistant stored name from an uploaded
/// file's original name.
///
/// Whitespace runs become a single `_`, anything outside `[A-Za-z0-9._-]`
/// is dropped, and a timestamp+random suffix keeps concurrent allocations
/// apart before the original extension is reattached. Uniqueness is
/// probabilistic; there is no existence check.
pub fn allocate_stored_name(original_name: &str) -> String {
    let (stem, extension) = split_extension(original_name);

    let mut clean_stem = String::with_capacity(stem.len());
    let mut last_was_space = false;
    for ch in stem.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                clean_stem.push('_');
            }
            last_was_space = true;
        } else {
            last_was_space = false;
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                clean_stem.push(ch);
            }
        }
    }
    if clean_stem.is_empty() {
        clean_stem.push_str("file");
    }

    let timestamp = Utc::now().timestamp_millis();
    let entropy: u32 = rand::rng().random_range(0..1_000_000_000);

    match extension {
        Some(ext) => format!("{}-{}-{}.{}", clean_stem, timestamp, entropy, ext),
        None => format!("{}-{}-{}", clean_stem, timestamp, entropy),
    }
}

/// Split a name into stem and sanitized extension. Extensions keep only
/// ASCII alphanumerics so nothing hostile survives reattachment.
fn split_extension(name: &str) -> (&str, Option<String>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            let clean: String = ext.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            if clean.is_empty() {
                (stem, None)
            } else {
                (stem, Some(clean))
            }
        }
        _ => (name, None),
    }
}
