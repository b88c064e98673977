//! Normalizers for optional and nullable input fields.

use models::errors::ModelError;

/// Create-time optional string: absent or blank -> `None`.
pub(crate) fn optional<F>(value: Option<&str>, validate: F) -> Result<Option<String>, ModelError>
where
    F: Fn(&str) -> Result<String, ModelError>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => validate(v).map(Some),
    }
}

/// PATCH nullable string: absent -> leave, `null` or blank -> clear,
/// value -> validated set.
pub(crate) fn nullable<F>(value: Option<Option<String>>, validate: F) -> Result<Option<Option<String>>, ModelError>
where
    F: Fn(&str) -> Result<String, ModelError>,
{
    match value {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(v)) if v.trim().is_empty() => Ok(Some(None)),
        Some(Some(v)) => validate(&v).map(|v| Some(Some(v))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::validation::validate_email;

    #[test]
    fn optional_skips_blank() {
        assert_eq!(optional(Some("  "), validate_email).unwrap(), None);
        assert_eq!(optional(None, validate_email).unwrap(), None);
        assert_eq!(optional(Some("a@b.io"), validate_email).unwrap(), Some("a@b.io".into()));
        assert!(optional(Some("nope"), validate_email).is_err());
    }

    #[test]
    fn nullable_distinguishes_clear_and_leave() {
        assert_eq!(nullable(None, validate_email).unwrap(), None);
        assert_eq!(nullable(Some(None), validate_email).unwrap(), Some(None));
        assert_eq!(nullable(Some(Some(" ".into())), validate_email).unwrap(), Some(None));
        assert_eq!(nullable(Some(Some("A@B.io".into())), validate_email).unwrap(), Some(Some("a@b.io".into())));
    }
}
