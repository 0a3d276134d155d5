//! Drag payloads and drag-over descriptions.
//!
//! A [`DragData`] is the native payload handle that travels with a drag. The
//! controller never interprets it; it hands it to the host in every drag
//! notification so the host can attach or read formats.

use std::collections::HashMap;
use std::sync::Arc;

use lattice_browse_core::Point;

/// Standard MIME types used in drag payloads.
pub mod mime {
    /// Item keys of the dragged items, newline separated.
    pub const ITEM_KEYS: &str = "application/x-lattice-browse-keys";
}

/// Data carried by a drag.
///
/// `DragData` can hold multiple representations of the same data, each
/// identified by a MIME type.
#[derive(Debug, Clone, Default)]
pub struct DragData {
    data: HashMap<String, Vec<u8>>,
}

impl DragData {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if data is available for the given MIME type.
    pub fn has_format(&self, mime_type: &str) -> bool {
        self.data.contains_key(mime_type)
    }

    /// Gets raw data for a MIME type.
    pub fn get_data(&self, mime_type: &str) -> Option<&[u8]> {
        self.data.get(mime_type).map(|v| v.as_slice())
    }

    /// Sets raw data for a MIME type.
    pub fn set_data(&mut self, mime_type: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.data.insert(mime_type.into(), data.into());
    }
}

/// A drag entering, moving over, leaving or dropping onto the list.
#[derive(Debug, Clone)]
pub struct DragEvent {
    /// Cursor position in viewport coordinates.
    pub position: Point,
    /// The payload being dragged.
    pub data: Arc<DragData>,
}

impl DragEvent {
    /// Creates a drag event.
    pub fn new(position: Point, data: Arc<DragData>) -> Self {
        Self { position, data }
    }
}
