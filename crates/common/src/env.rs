//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use std::path::Path;

use tracing::warn;

/// Returns true when the static asset directory exists; warns otherwise.
pub async fn check_static_dir(static_dir: &str) -> bool {
    match tokio::fs::metadata(static_dir).await {
        Ok(meta) if meta.is_dir() => true,
        _ => {
            warn!(%static_dir, "frontend assets directory not found; static assets disabled");
            false
        }
    }
}

/// Path of the SPA entry document inside `static_dir`.
pub fn spa_index(static_dir: &str) -> String {
    Path::new(static_dir).join("index.html").to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_dir_is_reported() {
        assert!(!check_static_dir("/definitely/not/here").await);
    }

    #[test]
    fn spa_index_joins_path() {
        assert_eq!(spa_index("dist"), "dist/index.html");
    }
}
