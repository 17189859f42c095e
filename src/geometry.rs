//! Detector geometry: planar panels and ray/plane intersections.
//!
//! A [`Panel`] is one planar sensor region, described by its lab-frame origin
//! and unit fast/slow axes. A [`Detector`] is an ordered, index-addressable
//! collection of panels. The table helper
//! [`ReflectionTable::compute_ray_intersections`] maps every row's diffracted
//! beam vector onto its panel plane.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{XrdError, XrdResult};
use crate::table::ReflectionTable;

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalized(v: [f64; 3]) -> [f64; 3] {
    let length = dot(v, v).sqrt();
    assert!(length > 0.0, "panel axis must have non-zero length");
    [v[0] / length, v[1] / length, v[2] / length]
}

/// One planar sensor region of a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    origin: [f64; 3],
    fast: [f64; 3],
    slow: [f64; 3],
}

impl Panel {
    /// Create a panel from its lab-frame origin and fast/slow axis directions.
    ///
    /// The axis directions are normalized; they need not be unit vectors on
    /// input but must be non-zero and non-parallel.
    ///
    /// # Panics
    ///
    /// Panics if either axis is zero-length or the axes are parallel.
    pub fn new(origin: [f64; 3], fast: [f64; 3], slow: [f64; 3]) -> Self {
        let fast = normalized(fast);
        let slow = normalized(slow);
        let normal = cross(fast, slow);
        assert!(
            dot(normal, normal) > 0.0,
            "panel fast and slow axes must not be parallel"
        );
        Self { origin, fast, slow }
    }

    /// Lab-frame position of the panel corner at (0, 0).
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// Unit vector along the fast pixel direction.
    pub fn fast_axis(&self) -> [f64; 3] {
        self.fast
    }

    /// Unit vector along the slow pixel direction.
    pub fn slow_axis(&self) -> [f64; 3] {
        self.slow
    }

    /// Plane normal (fast x slow).
    pub fn normal(&self) -> [f64; 3] {
        cross(self.fast, self.slow)
    }

    /// Intersect the ray `t * s1` (origin at the crystal, `t > 0`) with the
    /// panel plane.
    ///
    /// Returns the intersection point in (fast, slow) panel coordinates, or
    /// `None` when the ray is parallel to the plane or directed away from it.
    pub fn ray_intersection(&self, s1: [f64; 3]) -> Option<[f64; 2]> {
        let normal = self.normal();
        let distance = dot(self.origin, normal);
        let along = dot(s1, normal);
        // The ray only reaches the plane when it advances towards it.
        if along == 0.0 || (along < 0.0) != (distance < 0.0) {
            return None;
        }
        let t = distance / along;
        let point = [t * s1[0], t * s1[1], t * s1[2]];
        let relative = [
            point[0] - self.origin[0],
            point[1] - self.origin[1],
            point[2] - self.origin[2],
        ];
        Some([dot(relative, self.fast), dot(relative, self.slow)])
    }
}

/// An ordered collection of detector panels.
///
/// Panel indices stored in reflection tables address panels in this
/// collection; indexing is unchecked beyond the slice bounds check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    panels: Vec<Panel>,
}

impl Detector {
    /// Create a detector from its panels, in index order.
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    /// Number of panels.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether the detector has no panels.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panel at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    /// Append a panel at the next index.
    pub fn push(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    /// Iterate over the panels in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Panel> {
        self.panels.iter()
    }
}

impl std::ops::Index<usize> for Detector {
    type Output = Panel;

    fn index(&self, index: usize) -> &Panel {
        &self.panels[index]
    }
}

impl ReflectionTable {
    /// Intersect every row's diffracted beam vector with its detector panel.
    ///
    /// Reads the `s1` (3-vector) and `panel` (index) columns and produces one
    /// 2-D panel-plane point per row. A ray that never reaches its panel plane
    /// fails with [`XrdError::RayMiss`].
    ///
    /// # Panics
    ///
    /// Panics if a row's panel index is out of range for `detector`; panel
    /// indices are trusted and indexed directly.
    pub fn compute_ray_intersections(&self, detector: &Detector) -> XrdResult<Vec<[f64; 2]>> {
        let s1 = self.column::<[f64; 3]>("s1")?;
        let panel = self.column::<usize>("panel")?;
        let mut result = Vec::with_capacity(self.nrows());
        for (&beam, &index) in s1.iter().zip(panel) {
            let point = detector[index]
                .ray_intersection(beam)
                .ok_or(XrdError::RayMiss { panel: index })?;
            result.push(point);
        }
        debug!(
            nrows = self.nrows(),
            npanels = detector.len(),
            "computed ray intersections"
        );
        Ok(result)
    }
}
