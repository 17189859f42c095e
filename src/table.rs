//! The reflection table: a row-synchronized, named-column container.
//!
//! Each row of a [`ReflectionTable`] holds the data for one reflection; each
//! named column is a homogeneously-typed vector with exactly `nrows` entries.
//! Columns are heterogeneous across the table: panel indices live next to
//! centroid 3-vectors, bounding boxes and full shoebox records.
//!
//! Element types form a closed set ([`ColumnData`]). Typed access names the
//! element type at the call site (`table.column::<f64>("intensity.raw.value")`)
//! and is checked against the stored tag, so there is no runtime reflection and
//! a wrong type fails fast with a descriptive error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{XrdError, XrdResult};
use crate::model::{Observation, Shoebox};

/// One column of reflection data.
///
/// A closed set of element types keeps access static: every supported type has
/// its own variant holding a plain `Vec`, so algorithms borrow column slices
/// directly with no boxing or downcasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    /// Unsigned index values (panel numbers, flag words).
    Size(Vec<usize>),
    /// Signed integer values.
    Int(Vec<i32>),
    /// Floating point values (intensities, variances).
    Double(Vec<f64>),
    /// Boolean values (selections, entering/exiting).
    Bool(Vec<bool>),
    /// 2-vectors (detector-plane coordinates).
    Vec2(Vec<[f64; 2]>),
    /// 3-vectors (centroids, beam vectors).
    Vec3(Vec<[f64; 3]>),
    /// 6-tuples (bounding boxes).
    Int6(Vec<[i32; 6]>),
    /// Full shoebox records.
    Shoebox(Vec<Shoebox>),
}

impl ColumnData {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Size(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Vec2(v) => v.len(),
            ColumnData::Vec3(v) => v.len(),
            ColumnData::Int6(v) => v.len(),
            ColumnData::Shoebox(v) => v.len(),
        }
    }

    /// Whether the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored element type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Size(_) => "size",
            ColumnData::Int(_) => "int",
            ColumnData::Double(_) => "double",
            ColumnData::Bool(_) => "bool",
            ColumnData::Vec2(_) => "vec2",
            ColumnData::Vec3(_) => "vec3",
            ColumnData::Int6(_) => "int6",
            ColumnData::Shoebox(_) => "shoebox",
        }
    }
}

/// Element types that can live in a reflection table column.
///
/// Implemented for each variant of [`ColumnData`]; the accessed type is named
/// at the call site and checked against the stored tag.
pub trait ColumnValue: Sized {
    /// Tag name used in error messages.
    const TYPE_NAME: &'static str;

    /// Borrow the backing vector when the column holds this element type.
    fn from_column(column: &ColumnData) -> Option<&Vec<Self>>;

    /// Mutably borrow the backing vector when the column holds this type.
    fn from_column_mut(column: &mut ColumnData) -> Option<&mut Vec<Self>>;

    /// Wrap a vector of this element type into a column.
    fn into_column(values: Vec<Self>) -> ColumnData;
}

macro_rules! impl_column_value {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl ColumnValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_column(column: &ColumnData) -> Option<&Vec<Self>> {
                match column {
                    ColumnData::$variant(values) => Some(values),
                    _ => None,
                }
            }

            fn from_column_mut(column: &mut ColumnData) -> Option<&mut Vec<Self>> {
                match column {
                    ColumnData::$variant(values) => Some(values),
                    _ => None,
                }
            }

            fn into_column(values: Vec<Self>) -> ColumnData {
                ColumnData::$variant(values)
            }
        }
    };
}

impl_column_value!(usize, Size, "size");
impl_column_value!(i32, Int, "int");
impl_column_value!(f64, Double, "double");
impl_column_value!(bool, Bool, "bool");
impl_column_value!([f64; 2], Vec2, "vec2");
impl_column_value!([f64; 3], Vec3, "vec3");
impl_column_value!([i32; 6], Int6, "int6");
impl_column_value!(Shoebox, Shoebox, "shoebox");

/// Row-synchronized, named-column container for per-reflection data.
///
/// Invariant: every stored column has exactly [`nrows`](Self::nrows) entries.
/// Column insertion asserts this; it is a programming error to break it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReflectionTable {
    nrows: usize,
    columns: BTreeMap<String, ColumnData>,
}

impl ReflectionTable {
    /// Create an empty table with a fixed row count and no columns.
    pub fn new(nrows: usize) -> Self {
        Self {
            nrows,
            columns: BTreeMap::new(),
        }
    }

    /// Build a reflection table by fusing matched observation/shoebox records.
    ///
    /// Row `i` of the result is built from `observations[i]` and
    /// `shoeboxes[i]`. The populated columns are `panel`, `xyzobs.px.value`,
    /// `xyzobs.px.variance`, `intensity.raw.value`, `intensity.raw.variance`,
    /// `intensity.cor.value`, `intensity.cor.variance`, `bbox` and `shoebox`.
    /// Inputs are read-only; nothing is published on failure.
    ///
    /// # Panics
    ///
    /// Panics if the inputs differ in length, or if any row's observation and
    /// shoebox disagree on the panel index.
    pub fn from_observations_and_shoeboxes(
        observations: &[Observation],
        shoeboxes: &[Shoebox],
    ) -> Self {
        assert_eq!(
            observations.len(),
            shoeboxes.len(),
            "observation and shoebox counts must match"
        );
        let n = observations.len();

        let mut panel = Vec::with_capacity(n);
        let mut xyzval = Vec::with_capacity(n);
        let mut xyzvar = Vec::with_capacity(n);
        let mut iraw = Vec::with_capacity(n);
        let mut irawv = Vec::with_capacity(n);
        let mut icor = Vec::with_capacity(n);
        let mut icorv = Vec::with_capacity(n);
        let mut bbox = Vec::with_capacity(n);
        let mut sbox = Vec::with_capacity(n);

        for (i, (obs, shoebox)) in observations.iter().zip(shoeboxes).enumerate() {
            assert_eq!(
                obs.panel, shoebox.panel,
                "panel mismatch at row {i}: observation and shoebox disagree"
            );
            panel.push(obs.panel);
            xyzval.push(obs.centroid_px.position);
            xyzvar.push(obs.centroid_px.variance);
            iraw.push(obs.intensity.observed.value);
            irawv.push(obs.intensity.observed.variance);
            icor.push(obs.intensity.corrected.value);
            icorv.push(obs.intensity.corrected.variance);
            bbox.push(shoebox.bbox);
            sbox.push(shoebox.clone());
        }

        let mut table = Self::new(n);
        table.insert_column("panel", panel);
        table.insert_column("xyzobs.px.value", xyzval);
        table.insert_column("xyzobs.px.variance", xyzvar);
        table.insert_column("intensity.raw.value", iraw);
        table.insert_column("intensity.raw.variance", irawv);
        table.insert_column("intensity.cor.value", icor);
        table.insert_column("intensity.cor.variance", icorv);
        table.insert_column("bbox", bbox);
        table.insert_column("shoebox", sbox);

        debug!(nrows = n, "fused reflection table from observations and shoeboxes");
        table
    }

    /// Number of rows shared by every column.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    /// Whether a column with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Names of all stored columns.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Insert (or replace) a column.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the table row count.
    pub fn insert_column<T: ColumnValue>(&mut self, name: impl Into<String>, values: Vec<T>) {
        let name = name.into();
        assert_eq!(
            values.len(),
            self.nrows,
            "column '{name}' length must match the table row count"
        );
        self.columns.insert(name, T::into_column(values));
    }

    /// Borrow a column as a typed slice.
    ///
    /// Fails with [`XrdError::ColumnMissing`] when no column has this name and
    /// with [`XrdError::ColumnType`] when the stored element type differs from
    /// `T`.
    pub fn column<T: ColumnValue>(&self, name: &str) -> XrdResult<&[T]> {
        let column = self.columns.get(name).ok_or_else(|| XrdError::ColumnMissing {
            name: name.to_string(),
        })?;
        T::from_column(column)
            .map(Vec::as_slice)
            .ok_or_else(|| XrdError::ColumnType {
                name: name.to_string(),
                expected: T::TYPE_NAME,
                found: column.type_name(),
            })
    }

    /// Mutably borrow a column's backing vector.
    ///
    /// Same failure modes as [`column`](Self::column). The length invariant is
    /// the caller's to keep when mutating through the returned vector.
    pub fn column_mut<T: ColumnValue>(&mut self, name: &str) -> XrdResult<&mut Vec<T>> {
        let column = self
            .columns
            .get_mut(name)
            .ok_or_else(|| XrdError::ColumnMissing {
                name: name.to_string(),
            })?;
        let found = column.type_name();
        T::from_column_mut(column).ok_or_else(|| XrdError::ColumnType {
            name: name.to_string(),
            expected: T::TYPE_NAME,
            found,
        })
    }

    /// Documentation for the standard column names.
    pub fn help_keys() -> &'static str {
        HELP_KEYS
    }
}

const HELP_KEYS: &str = "Standard column names:
======================

 Columns in the reflection table can have any name and type;
 however, it is helpful to have a set of standard data columns
 which can be used by different algorithms. These are shown below.

 General properties
 ------------------

  flags:                  bit mask status flags
  id:                     experiment id
  panel:                  the detector panel index

 Predicted properties
 --------------------

  miller_index:           miller indices
  entering:               reflection entering/exiting
  s1:                     the diffracted beam vector
  xyzcal.mm:              the predicted location (mm, mm, rad)
  xyzcal.px:              the predicted location (px, px, frame)
  ub_matrix:              predicted crystal setting

 Observed properties
 -------------------

  xyzobs.px.value:        centroid pixel position
  xyzobs.px.variance:     centroid pixel variance
  xyzobs.mm.value:        centroid millimetre position
  xyzobs.mm.variance:     centroid millimetre variance
  intensity.raw.value:    raw intensity value
  intensity.raw.variance: raw intensity variance
  intensity.cor.value:    corrected intensity value
  intensity.cor.variance: corrected intensity variance

 Shoebox properties
 ------------------

  bbox:                   bounding box
  shoebox:                shoebox data/mask/background struct

";
