//! Text manipulation and validation helpers

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

const RANDOM_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

// Word characters are ASCII-only here, matching the slug alphabet
static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").unwrap());
static EDGE_DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-+|-+$").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static ACRONYM_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])([A-Z][a-z])").unwrap());

/// Convert text to a URL-friendly slug
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let dashed = SLUG_SEPARATORS.replace_all(&stripped, "-");
    EDGE_DASHES.replace_all(&dashed, "").into_owned()
}

/// Uppercase the first character, lowercase the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Truncate to `length` characters, the suffix included
pub fn truncate(text: &str, length: usize, suffix: &str) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let keep = length.saturating_sub(suffix.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

/// Random lowercase alphanumeric string
pub fn random(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(RANDOM_ALPHABET[rng.gen_range(0..RANDOM_ALPHABET.len())]))
        .collect()
}

pub fn is_email(text: &str) -> bool {
    EMAIL_REGEX.is_match(text)
}

/// Convert camelCase (including acronyms) to kebab-case
pub fn camel_to_kebab(text: &str) -> String {
    let split = CAMEL_BOUNDARY.replace_all(text, "${1}-${2}");
    ACRONYM_BOUNDARY
        .replace_all(&split, "${1}-${2}")
        .to_lowercase()
}
