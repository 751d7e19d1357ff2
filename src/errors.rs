//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`UmbraError`] covers every failure mode of the crate:
//! - Cascade and atlas configuration errors (rejected at construction time)
//! - Light configuration errors
//! - Out-of-range cascade lookups
//! - Settings file I/O and JSON parsing
//!
//! Degenerate geometry (near ≥ far, empty scene bounds, a vertical light) is
//! *not* an error: the fitter clamps to a minimal extent instead.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, UmbraError>`.
//!
//! ```rust,ignore
//! use umbra::errors::Result;
//! use umbra::shadow::CascadeShadowSettings;
//!
//! fn load() -> Result<CascadeShadowSettings> {
//!     CascadeShadowSettings::from_json_file("shadows.json")
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum UmbraError {
    // ========================================================================
    // Cascade Configuration Errors
    // ========================================================================
    /// Cascade count is zero or exceeds [`MAX_CASCADES`](crate::shadow::MAX_CASCADES).
    #[error("Invalid cascade count: {count} (expected 1..={max})")]
    InvalidCascadeCount {
        /// The requested number of cascades
        count: usize,
        /// The largest supported number of cascades
        max: usize,
    },

    /// A cascade split is not strictly greater than the one before it.
    #[error("Cascade splits must be strictly ascending: split[{index}] = {current} <= {previous}")]
    NonAscendingSplits {
        /// Index of the offending split
        index: usize,
        /// Value of the previous split
        previous: f32,
        /// Value of the offending split
        current: f32,
    },

    /// A cascade split is non-finite, non-positive, or above the partition maximum.
    #[error("Cascade split {index} out of range: {value} (expected (0, {max}])")]
    SplitOutOfRange {
        /// Index of the offending split
        index: usize,
        /// Value of the offending split
        value: f32,
        /// The configured partition maximum
        max: f32,
    },

    /// The partition maximum (the value representing the far clip) is not positive.
    #[error("Invalid partition maximum: {0}")]
    InvalidPartitionMax(f32),

    // ========================================================================
    // Shadow Atlas Errors
    // ========================================================================
    /// The per-cascade tile resolution is zero.
    #[error("Invalid shadow tile dimension: {0}")]
    InvalidTileDimension(u32),

    /// The atlas width (`tile * cascades`) does not fit in a `u32`.
    #[error("Shadow atlas too wide: {tile_dimension} x {cascade_count} cascades")]
    AtlasTooWide {
        /// The per-cascade tile resolution
        tile_dimension: u32,
        /// The number of cascades
        cascade_count: usize,
    },

    /// The PCF kernel half-width is negative or non-finite.
    #[error("Invalid PCF kernel half-width: {0}")]
    InvalidPcfKernel(f32),

    // ========================================================================
    // Light Errors
    // ========================================================================
    /// The light direction is zero-length or contains NaN/inf.
    #[error("Invalid light direction: {0:?}")]
    InvalidLightDirection([f32; 3]),

    /// The distance of the virtual light eye behind the camera is not positive.
    #[error("Invalid light distance: {0}")]
    InvalidLightDistance(f32),

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// Cascade index out of bounds.
    #[error("Cascade index out of bounds: {index} (cascade count: {count})")]
    CascadeIndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// The number of cascades
        count: usize,
    },

    // ========================================================================
    // I/O & Parsing Errors
    // ========================================================================
    /// Settings file I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Settings JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, UmbraError>`.
pub type Result<T> = std::result::Result<T, UmbraError>;
