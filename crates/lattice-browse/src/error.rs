//! Error types for the browse-mode controller.

use lattice_browse_core::GeometryError;

/// Result type alias for browse-mode operations.
pub type Result<T> = std::result::Result<T, BrowseError>;

/// Errors surfaced by [`BrowseMode`](crate::BrowseMode) operations.
///
/// Vetoes and out-of-range targets are ordinary outcomes and never appear
/// here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowseError {
    /// A geometry query failed. Any focus change was still applied.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The controller was disposed while the operation was in flight.
    #[error("browse-mode controller has been disposed")]
    Disposed,
}

impl BrowseError {
    /// Returns true if this error came from a geometry query.
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_converts() {
        let error: BrowseError = GeometryError::new("item 4 not realized").into();
        assert!(error.is_geometry());
        assert_eq!(
            error.to_string(),
            "geometry query failed: item 4 not realized"
        );
    }

    #[test]
    fn test_disposed_message() {
        assert_eq!(
            BrowseError::Disposed.to_string(),
            "browse-mode controller has been disposed"
        );
    }
}
