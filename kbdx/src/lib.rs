// SPDX-License-Identifier: LGPL-3.0-only

#![deny(missing_docs)]
#![deny(unsafe_code)]

//! Small utilities: human-readable durations, named stopwatches, text tables,
//! a hierarchical logger and a handful of slice helpers.
//!
//! # Examples
//!
//! ```
//! use kbdx::{stopwatch::Stopwatch, time};
//!
//! assert_eq!(time::parse("3 days 4h").unwrap(), 273_600_000);
//! assert_eq!(time::format(68_603), "1m 8s 603ms");
//!
//! let mut sw = Stopwatch::new();
//! sw.set_at("start", 1000).unwrap();
//! sw.set_at("end", 1000 + 220_300).unwrap();
//! assert_eq!(sw.compare("start", "end"), "3m 40s 300ms");
//! ```

pub mod array;
pub mod logger;
pub mod stopwatch;
pub mod table;
pub mod time;

pub use crate::logger::{Logger, LoggerOptions};
pub use crate::stopwatch::{At, Stopwatch};
pub use crate::table::Table;
pub use crate::time::{Format, FormatFlags, Time, Unit};

use thiserror::Error;

/// The error type for all fallible operations of this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The smallest unit of a format range is larger than the largest one.
    #[error("Invalid unit range: {min:?} > {max:?}")]
    InvalidRange {
        /// Requested smallest unit.
        min: Unit,
        /// Requested largest unit.
        max: Unit,
    },
    /// A format element cap of zero was requested.
    #[error("Element cap can't be 0")]
    InvalidElementCap,
    /// A unit word in a duration string is not known.
    #[error("Unknown unit \"{0}\"")]
    UnknownUnit(Box<str>),
    /// A numeral in a duration string can't be represented.
    #[error("Invalid number \"{0}\"")]
    InvalidNumber(Box<str>),
    /// A timer was set to a time before the epoch.
    #[error("Negative timestamp {0}")]
    NegativeTimestamp(i64),
    /// A cell was written to a missing column of a fixed width table.
    #[error("Column {0} does not exist and the table is not dynamic")]
    FixedWidth(usize),
    /// A column index is out of bounds.
    #[error("Column {col} is out of bounds, table has {columns} columns")]
    ColumnOutOfBounds {
        /// Requested column.
        col: usize,
        /// Number of columns.
        columns: usize,
    },
    /// A row index is out of bounds.
    #[error("Row {row} is out of bounds, table has {rows} rows")]
    RowOutOfBounds {
        /// Requested row.
        row: usize,
        /// Number of rows.
        rows: usize,
    },
    /// A string is not a valid sequence of hex encoded bytes.
    #[error("Invalid hex string \"{0}\"")]
    InvalidHex(Box<str>),
}

/// A specialized result type for this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
