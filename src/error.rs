//! Custom error types for the crate.
//!
//! This module defines the primary error type, `XrdError`, used across the
//! reflection-table and geometry code. Using the `thiserror` crate, it provides
//! a centralized way to handle the recoverable failure modes of table access:
//! looking up a column that does not exist, asking for a column under the wrong
//! element type, and rays that never reach a panel plane.
//!
//! Contract violations (mismatched input lengths, mismatched panel indices,
//! wrong-length selection masks) are deliberately *not* represented here. They
//! are programming errors, enforced with assertions at the call site, and the
//! caller must not attempt to recover from them.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type XrdResult<T> = std::result::Result<T, XrdError>;

/// Primary error type for reflection-table and geometry operations.
///
/// # Error Categories
///
/// 1. **Table access errors** - `ColumnMissing`, `ColumnType`
///    - Occur when an algorithm asks a table for a column it does not hold,
///      or holds under a different element type.
///    - Recovery: check `contains()` first, or populate the column.
///
/// 2. **Geometry errors** - `RayMiss`
///    - Occur when a diffracted beam vector is parallel to, or points away
///      from, the targeted panel plane.
///    - Recovery: usually indicates a bad beam vector or detector model;
///      filter the offending rows and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XrdError {
    /// The requested column is not present in the table.
    #[error("Column '{name}' not found in reflection table")]
    ColumnMissing {
        /// Name of the missing column.
        name: String,
    },

    /// The requested column exists but holds a different element type.
    ///
    /// Column access names the element type at the call site; this error is
    /// returned when that type does not match the stored column tag.
    #[error("Column '{name}' holds {found} data, expected {expected}")]
    ColumnType {
        /// Name of the column.
        name: String,
        /// Element type requested at the call site.
        expected: &'static str,
        /// Element type actually stored.
        found: &'static str,
    },

    /// A diffracted beam vector does not intersect its panel plane.
    #[error("Ray does not intersect the plane of panel {panel}")]
    RayMiss {
        /// Index of the panel that was missed.
        panel: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = XrdError::ColumnMissing {
            name: "flags".into(),
        };
        assert_eq!(err.to_string(), "Column 'flags' not found in reflection table");
    }

    #[test]
    fn test_column_type_display() {
        let err = XrdError::ColumnType {
            name: "panel".into(),
            expected: "size",
            found: "double",
        };
        assert_eq!(
            err.to_string(),
            "Column 'panel' holds double data, expected size"
        );
    }
}
