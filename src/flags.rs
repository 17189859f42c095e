//! Status flags for reflection table rows.
//!
//! Each row of the `flags` column holds a bitmask over the [`Flag`] bits.
//! The test/set/clear operations are row-wise and order-independent; set and
//! clear mutate the column in place under a boolean row selection. Concurrent
//! mutation of one table is not synchronized here; callers serialize writers.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::XrdResult;
use crate::table::ReflectionTable;

/// Name of the column holding the per-row flag words.
pub const FLAGS_COLUMN: &str = "flags";

/// Status bits stored in the `flags` column of a reflection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Flag {
    /// The reflection position was predicted from the experimental models.
    Predicted = 1 << 0,
    /// The reflection was located in the image data.
    Observed = 1 << 1,
    /// The reflection has been assigned a miller index.
    Indexed = 1 << 2,
    /// The reflection was used during geometry refinement.
    UsedInRefinement = 1 << 3,
    /// The reflection serves as a profile reference spot.
    ReferenceSpot = 1 << 4,
    /// The reflection intensity has been integrated.
    Integrated = 1 << 5,
}

impl Flag {
    /// The raw bit value of this flag.
    pub const fn bits(self) -> usize {
        self as usize
    }
}

impl From<Flag> for usize {
    fn from(flag: Flag) -> usize {
        flag.bits()
    }
}

impl std::ops::BitOr for Flag {
    type Output = usize;

    fn bitor(self, rhs: Flag) -> usize {
        self.bits() | rhs.bits()
    }
}

impl ReflectionTable {
    /// Test which rows have every bit of `value` set.
    ///
    /// This is an all-bits test: for a multi-bit `value` a row only reads true
    /// when each requested bit is present, not when any one of them is. Pass a
    /// single [`Flag`] unless the AND semantics are wanted.
    pub fn get_flags(&self, value: impl Into<usize>) -> XrdResult<Vec<bool>> {
        let value = value.into();
        let flags = self.column::<usize>(FLAGS_COLUMN)?;
        Ok(flags.iter().map(|&word| word & value == value).collect())
    }

    /// Set the bits of `value` on every row selected by `mask`.
    ///
    /// Unselected rows are untouched.
    ///
    /// # Panics
    ///
    /// Panics if `mask.len()` differs from the table row count.
    pub fn set_flags(&mut self, mask: &[bool], value: impl Into<usize>) -> XrdResult<()> {
        let value = value.into();
        assert_eq!(
            mask.len(),
            self.nrows(),
            "selection mask length must match the table row count"
        );
        let flags = self.column_mut::<usize>(FLAGS_COLUMN)?;
        for (word, &selected) in flags.iter_mut().zip(mask) {
            if selected {
                *word |= value;
            }
        }
        trace!(value, "set flag bits on selected rows");
        Ok(())
    }

    /// Clear the bits of `value` on every row selected by `mask`.
    ///
    /// Unselected rows are untouched.
    ///
    /// # Panics
    ///
    /// Panics if `mask.len()` differs from the table row count.
    pub fn unset_flags(&mut self, mask: &[bool], value: impl Into<usize>) -> XrdResult<()> {
        let value = value.into();
        assert_eq!(
            mask.len(),
            self.nrows(),
            "selection mask length must match the table row count"
        );
        let flags = self.column_mut::<usize>(FLAGS_COLUMN)?;
        for (word, &selected) in flags.iter_mut().zip(mask) {
            if selected {
                *word &= !value;
            }
        }
        trace!(value, "cleared flag bits on selected rows");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XrdError;

    fn table_with_flags(words: Vec<usize>) -> ReflectionTable {
        let mut table = ReflectionTable::new(words.len());
        table.insert_column(FLAGS_COLUMN, words);
        table
    }

    #[test]
    fn test_flag_bit_values() {
        assert_eq!(Flag::Predicted.bits(), 1);
        assert_eq!(Flag::Observed.bits(), 2);
        assert_eq!(Flag::Indexed.bits(), 4);
        assert_eq!(Flag::UsedInRefinement.bits(), 8);
        assert_eq!(Flag::ReferenceSpot.bits(), 16);
        assert_eq!(Flag::Integrated.bits(), 32);
    }

    #[test]
    fn test_set_get_unset_round_trip() {
        let mut table = table_with_flags(vec![0; 5]);
        let all = vec![true; 5];

        table.set_flags(&all, Flag::Indexed).unwrap();
        assert_eq!(table.get_flags(Flag::Indexed).unwrap(), vec![true; 5]);

        table.unset_flags(&all, Flag::Indexed).unwrap();
        assert_eq!(table.get_flags(Flag::Indexed).unwrap(), vec![false; 5]);
    }

    #[test]
    fn test_unselected_rows_are_untouched() {
        let mut table = table_with_flags(vec![0b01, 0b10, 0b11, 0b00]);
        let mask = [true, false, true, false];

        table.set_flags(&mask, Flag::Integrated).unwrap();
        let words = table.column::<usize>(FLAGS_COLUMN).unwrap();
        assert_eq!(words, &[0b01 | 32, 0b10, 0b11 | 32, 0b00]);

        table.unset_flags(&mask, Flag::Predicted).unwrap();
        let words = table.column::<usize>(FLAGS_COLUMN).unwrap();
        assert_eq!(words, &[32, 0b10, 0b10 | 32, 0b00]);
    }

    #[test]
    fn test_get_flags_requires_all_bits() {
        let both = Flag::Predicted | Flag::Observed;
        let table = table_with_flags(vec![
            Flag::Predicted.bits(),
            Flag::Observed.bits(),
            both,
            0,
        ]);
        assert_eq!(
            table.get_flags(both).unwrap(),
            vec![false, false, true, false]
        );
    }

    #[test]
    #[should_panic(expected = "selection mask length must match")]
    fn test_set_flags_rejects_short_mask() {
        let mut table = table_with_flags(vec![0; 3]);
        let _ = table.set_flags(&[true, false], Flag::Observed);
    }

    #[test]
    fn test_flags_column_must_exist() {
        let table = ReflectionTable::new(2);
        let err = table.get_flags(Flag::Observed).unwrap_err();
        assert_eq!(
            err,
            XrdError::ColumnMissing {
                name: FLAGS_COLUMN.into()
            }
        );
    }
}
