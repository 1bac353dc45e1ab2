//! Error types
//!
//! Nothing here reaches the collaborator: callers log and fall back.

use thiserror::Error;

/// Failure to acquire a drawable 2D surface
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("no browser window")]
    NoWindow,
    #[error("no element with id `{0}`")]
    CanvasNotFound(String),
    #[error("element `{0}` is not a canvas")]
    NotACanvas(String),
    #[error("2D context unavailable")]
    ContextUnavailable,
}

/// Failure to parse or validate settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Log a failed setup step and carry on without its result
pub fn contained<T, E: std::fmt::Display>(result: Result<T, E>, context: &str) -> Option<T> {
    result.inspect_err(|e| log::warn!("{}: {}", context, e)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contained_swallows_surface_errors() {
        let missing: Result<u8, _> = Err(SurfaceError::CanvasNotFound("sky".into()));
        assert_eq!(contained(missing, "Celebration not mounted"), None);
        assert_eq!(contained(Ok::<_, SurfaceError>(7), "unused"), Some(7));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SurfaceError::NotACanvas("main".into()).to_string(),
            "element `main` is not a canvas"
        );
        assert_eq!(
            SettingsError::Invalid("x".into()).to_string(),
            "invalid setting: x"
        );
    }
}
