//! Data model for per-reflection records.
//!
//! An [`Observation`] is what spot finding reports for one diffraction spot:
//! which panel it landed on, the pixel-space centroid with its variance, and
//! raw/corrected intensity estimates. A [`Shoebox`] is the 3-D pixel sub-volume
//! cut out around the spot, carrying the raw counts, a per-pixel mask and a
//! fitted background over the same grid.

use serde::{Deserialize, Serialize};

/// A measured value together with its variance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueVariance {
    /// The measured value.
    pub value: f64,
    /// The variance of the measurement.
    pub variance: f64,
}

impl ValueVariance {
    /// Create a value/variance pair.
    pub fn new(value: f64, variance: f64) -> Self {
        Self { value, variance }
    }
}

/// Pixel-space centroid of an observed spot.
///
/// Positions are (x, y, frame) in pixel/image-number coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    /// Centroid position.
    pub position: [f64; 3],
    /// Per-component variance of the centroid position.
    pub variance: [f64; 3],
}

/// Raw and corrected integrated intensity for one observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intensity {
    /// Intensity as summed from the raw pixel values.
    pub observed: ValueVariance,
    /// Intensity after applying corrections.
    pub corrected: ValueVariance,
}

/// A single spot observation on one detector panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Index of the detector panel the spot was recorded on.
    pub panel: usize,
    /// Pixel-space centroid of the spot.
    pub centroid_px: Centroid,
    /// Intensity estimates for the spot.
    pub intensity: Intensity,
}

/// Dense row-major 3-D array, indexed as (frame, slow, fast).
///
/// Backing storage is a flat `Vec<T>`; all three shoebox arrays (data, mask,
/// background) share one shape so they can be iterated in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid3<T> {
    depth: usize,
    height: usize,
    width: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid3<T> {
    /// Allocate a `depth x height x width` grid filled with `value`.
    pub fn filled(depth: usize, height: usize, width: usize, value: T) -> Self {
        Self {
            depth,
            height,
            width,
            data: vec![value; depth * height * width],
        }
    }
}

impl<T> Grid3<T> {
    /// The (depth, height, width) shape of the grid.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.depth, self.height, self.width)
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether this grid has the same shape as `other`.
    pub fn same_shape<U>(&self, other: &Grid3<U>) -> bool {
        self.shape() == (other.depth, other.height, other.width)
    }

    /// Element at (frame, slow, fast), or `None` when out of range.
    pub fn get(&self, k: usize, j: usize, i: usize) -> Option<&T> {
        if k >= self.depth || j >= self.height || i >= self.width {
            return None;
        }
        self.data.get((k * self.height + j) * self.width + i)
    }

    /// The flat backing storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the flat backing storage.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/// The 3-D pixel sub-volume around one spot.
///
/// Carries the raw pixel counts, an integer per-pixel mask and the fitted
/// background, all over the same grid. The bounding box is
/// `(x0, x1, y0, y1, z0, z1)` in pixel/frame coordinates, half-open on the
/// upper bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shoebox {
    /// Index of the detector panel the shoebox was cut from.
    pub panel: usize,
    /// Bounding box (x0, x1, y0, y1, z0, z1).
    pub bbox: [i32; 6],
    /// Raw pixel values.
    pub data: Grid3<f64>,
    /// Per-pixel mask codes.
    pub mask: Grid3<i32>,
    /// Fitted background values.
    pub background: Grid3<f64>,
}

impl Shoebox {
    /// Allocate a zeroed shoebox covering `bbox` on `panel`.
    ///
    /// # Panics
    ///
    /// Panics if any bounding box extent is negative.
    pub fn new(panel: usize, bbox: [i32; 6]) -> Self {
        assert!(
            bbox[1] >= bbox[0] && bbox[3] >= bbox[2] && bbox[5] >= bbox[4],
            "shoebox bbox extents must be non-negative: {bbox:?}"
        );
        let width = (bbox[1] - bbox[0]) as usize;
        let height = (bbox[3] - bbox[2]) as usize;
        let depth = (bbox[5] - bbox[4]) as usize;
        Self {
            panel,
            bbox,
            data: Grid3::filled(depth, height, width, 0.0),
            mask: Grid3::filled(depth, height, width, 0),
            background: Grid3::filled(depth, height, width, 0.0),
        }
    }

    /// Build a shoebox from pre-filled arrays.
    ///
    /// # Panics
    ///
    /// Panics if the three arrays do not share one shape.
    pub fn with_arrays(
        panel: usize,
        bbox: [i32; 6],
        data: Grid3<f64>,
        mask: Grid3<i32>,
        background: Grid3<f64>,
    ) -> Self {
        assert!(
            data.same_shape(&mask) && data.same_shape(&background),
            "shoebox data, mask and background must share one shape"
        );
        Self {
            panel,
            bbox,
            data,
            mask,
            background,
        }
    }

    /// The (depth, height, width) shape of the pixel arrays.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        self.data.shape()
    }
}
