//! `rust_xrd`
//!
//! Reflection-table core and viewer font utilities for crystallographic data
//! processing.
//!
//! The centre of the crate is the [`ReflectionTable`]: a row-synchronized,
//! named-column container holding one diffraction observation per row, with a
//! closed set of column element types and typed fail-fast access. Around it
//! sit the row fusion constructor (building tables from matched
//! observation/shoebox records), the [`Flag`] bitmask operations on the
//! `flags` column, and planar detector geometry for per-row ray
//! intersections. The [`viewer`] module carries the 14x7 bitmap glyph set and
//! the numeric formatter used to draw scale labels.
//!
//! ## Key Types
//!
//! - [`ReflectionTable`]: named-column, row-synchronized reflection data
//! - [`Observation`] / [`Shoebox`]: per-spot input records for row fusion
//! - [`Flag`]: status bits stored in the `flags` column
//! - [`Detector`] / [`Panel`]: planar detector geometry
//! - [`XrdError`]: recoverable table/geometry failure modes
//!
//! ## Example
//!
//! ```rust
//! use rust_xrd::{Flag, ReflectionTable};
//!
//! let mut table = ReflectionTable::new(3);
//! table.insert_column("flags", vec![0_usize; 3]);
//!
//! table.set_flags(&[true, false, true], Flag::Observed)?;
//! assert_eq!(table.get_flags(Flag::Observed)?, vec![true, false, true]);
//! # Ok::<(), rust_xrd::XrdError>(())
//! ```

pub mod error;
pub mod flags;
pub mod geometry;
pub mod model;
pub mod table;
pub mod viewer;

pub use error::{XrdError, XrdResult};
pub use flags::{Flag, FLAGS_COLUMN};
pub use geometry::{Detector, Panel};
pub use model::{Centroid, Grid3, Intensity, Observation, Shoebox, ValueVariance};
pub use table::{ColumnData, ColumnValue, ReflectionTable};
