// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for floor plan topology extraction.

/// Result type alias for floor plan topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or exporting a floor plan topology.
///
/// Ambiguous local detections (an opening touching a single room, a wall
/// scan running off the image) are not errors; they are skipped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two grids that must describe the same pixels have different sizes.
    #[error("{grid} is {}x{} but the label image is {}x{}", .found.0, .found.1, .expected.0, .expected.1)]
    ShapeMismatch {
        /// Name of the offending grid.
        grid: &'static str,
        /// Dimensions of the label image (width, height).
        expected: (u32, u32),
        /// Dimensions of the offending grid (width, height).
        found: (u32, u32),
    },

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
