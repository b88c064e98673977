//! Field validators shared by the entities.
//!
//! Each returns the normalized value (trimmed, case-folded where relevant) or
//! a `ModelError::Validation` naming the offending field.

use crate::errors::ModelError;

pub const SLUG_MIN: usize = 3;
pub const SLUG_MAX: usize = 64;
pub const NAME_MAX: usize = 128;
pub const CAPACITY_MAX: i32 = 10_000;

pub fn validate_name(field: &str, value: &str) -> Result<String, ModelError> {
    validate_text(field, value, NAME_MAX)
}

/// Trimmed, non-empty, at most `max` characters.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::invalid(format!("{field} required")));
    }
    if v.chars().count() > max {
        return Err(ModelError::invalid(format!("{field} must be at most {max} characters")));
    }
    Ok(v.to_string())
}

pub fn validate_slug(slug: &str) -> Result<String, ModelError> {
    let s = slug.trim();
    let len = s.len();
    if !(SLUG_MIN..=SLUG_MAX).contains(&len) {
        return Err(ModelError::invalid(format!("slug must be {SLUG_MIN}-{SLUG_MAX} characters")));
    }
    if !s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-') {
        return Err(ModelError::invalid("slug may only contain lowercase letters, digits and '-'"));
    }
    if s.starts_with('-') || s.ends_with('-') {
        return Err(ModelError::invalid("slug must not start or end with '-'"));
    }
    Ok(s.to_string())
}

/// Derive a slug from a display name: lowercase ASCII alphanumerics, every
/// other run of characters collapsed into one '-'.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
        if out.len() >= SLUG_MAX {
            break;
        }
    }
    out.truncate(SLUG_MAX);
    out.trim_end_matches('-').to_string()
}

pub fn validate_email(email: &str) -> Result<String, ModelError> {
    let e = email.trim();
    match e.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && e.len() <= 255 => Ok(e.to_ascii_lowercase()),
        _ => Err(ModelError::invalid("invalid email")),
    }
}

pub fn validate_url(field: &str, url: &str) -> Result<String, ModelError> {
    let u = url.trim();
    if !(u.starts_with("http://") || u.starts_with("https://")) || u.len() > 512 {
        return Err(ModelError::invalid(format!("{field} must start with http(s)")));
    }
    Ok(u.to_string())
}

/// `#RRGGBB`, normalized to upper case.
pub fn validate_color(field: &str, color: &str) -> Result<String, ModelError> {
    let c = color.trim();
    let ok = c.len() == 7 && c.starts_with('#') && c[1..].bytes().all(|b| b.is_ascii_hexdigit());
    if !ok {
        return Err(ModelError::invalid(format!("{field} must be a #RRGGBB hex color")));
    }
    Ok(c.to_ascii_uppercase())
}

pub fn validate_currency(code: &str) -> Result<String, ModelError> {
    let c = code.trim().to_ascii_uppercase();
    if c.len() != 3 || !c.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ModelError::invalid("currency must be a 3-letter ISO code"));
    }
    Ok(c)
}

pub fn validate_range(field: &str, value: i32, min: i32, max: i32) -> Result<i32, ModelError> {
    if value < min || value > max {
        return Err(ModelError::invalid(format!("{field} must be between {min} and {max}")));
    }
    Ok(value)
}

pub fn validate_capacity(capacity: i32) -> Result<i32, ModelError> {
    validate_range("capacity", capacity, 1, CAPACITY_MAX)
}

pub fn validate_timezone(tz: &str) -> Result<String, ModelError> {
    let t = validate_text("timezone", tz, 64)?;
    if t.contains(char::is_whitespace) {
        return Err(ModelError::invalid("timezone must not contain whitespace"));
    }
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert_eq!(validate_slug(" iron-gym-42 ").unwrap(), "iron-gym-42");
        assert!(validate_slug("ab").is_err());
        assert!(validate_slug("Iron-Gym").is_err());
        assert!(validate_slug("-iron").is_err());
        assert!(validate_slug("iron_gym").is_err());
        assert!(validate_slug(&"a".repeat(65)).is_err());
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Iron & Steel Gym!! "), "iron-steel-gym");
        assert_eq!(slugify("Zen Yoga Studio (Downtown)"), "zen-yoga-studio-downtown");
        assert_eq!(slugify("Café Pilates"), "caf-pilates");
        assert!(slugify(&"x y ".repeat(40)).len() <= SLUG_MAX);
    }

    #[test]
    fn email_and_url() {
        assert_eq!(validate_email("Owner@Gym.COM").unwrap(), "owner@gym.com");
        assert!(validate_email("owner.gym.com").is_err());
        assert!(validate_email("@gym.com").is_err());
        assert!(validate_url("website", "https://gym.example").is_ok());
        assert!(validate_url("website", "ftp://gym.example").is_err());
    }

    #[test]
    fn color_and_currency() {
        assert_eq!(validate_color("primaryColor", "#3b82f6").unwrap(), "#3B82F6");
        assert!(validate_color("primaryColor", "3B82F6").is_err());
        assert!(validate_color("primaryColor", "#3B82FZ").is_err());
        assert_eq!(validate_currency("eur").unwrap(), "EUR");
        assert!(validate_currency("EURO").is_err());
    }

    #[test]
    fn text_and_ranges() {
        assert_eq!(validate_name("name", "  Main Hall ").unwrap(), "Main Hall");
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_capacity(0).is_err());
        assert_eq!(validate_capacity(12).unwrap(), 12);
        assert!(validate_timezone("America/New York").is_err());
        assert_eq!(validate_timezone("Europe/Berlin").unwrap(), "Europe/Berlin");
    }
}
