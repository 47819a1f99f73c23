// SPDX-License-Identifier: LGPL-3.0-only

//! Plain text tables for monospace output.
//!
//! Every column is as wide as its widest cell, shorter cells are padded with
//! a filler character and every cell is followed by a column splitter.
//!
//! ```
//! use kbdx::table::Table;
//!
//! let mut table = Table::new();
//! table
//!     .set(0, 0, "name").unwrap()
//!     .set(1, 0, "took").unwrap()
//!     .set(0, 1, "boot").unwrap()
//!     .set(1, 1, "1m 8s").unwrap();
//! table.set_splitter(" | ");
//! assert_eq!(table.to_string(), "name | took  | \nboot | 1m 8s | ");
//! ```

use core::fmt::{self, Write};

use ahash::AHashMap;

use crate::{Error, Result};

type Column = AHashMap<usize, Box<str>>;

fn width(s: &str) -> usize {
    s.chars().count()
}

/// A sparse grid of text cells.
#[derive(Clone, Debug)]
pub struct Table {
    dynamic: bool,
    filler: char,
    splitter: Box<str>,
    columns: Vec<Column>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Creates an empty table that grows columns on demand.
    pub fn new() -> Self {
        Self {
            dynamic: true,
            filler: ' ',
            splitter: Box::from(" "),
            columns: Vec::new(),
        }
    }

    /// Creates a table with a fixed amount of columns.
    ///
    /// Writing to a column outside of the table fails until the table is
    /// made dynamic with [`set_dynamic`](Self::set_dynamic).
    pub fn with_width(width: usize) -> Self {
        let mut table = Self::new();
        table.dynamic = false;
        table.set_width(width);
        table
    }

    /// Returns `true` if the table grows columns on demand.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Sets whether the table grows columns on demand.
    pub fn set_dynamic(&mut self, dynamic: bool) -> &mut Self {
        self.dynamic = dynamic;
        self
    }

    /// Returns the character used to pad cells, `' '` by default.
    pub fn filler(&self) -> char {
        self.filler
    }

    /// Sets the character used to pad cells.
    pub fn set_filler(&mut self, filler: char) -> &mut Self {
        self.filler = filler;
        self
    }

    /// Returns the string written after each cell, `" "` by default.
    pub fn splitter(&self) -> &str {
        &self.splitter
    }

    /// Sets the string written after each cell.
    pub fn set_splitter(&mut self, splitter: &str) -> &mut Self {
        self.splitter = Box::from(splitter);
        self
    }

    /// Returns the amount of columns.
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the amount of rows, the highest used row index plus one.
    pub fn rows(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|c| c.keys())
            .max()
            .map_or(0, |i| i + 1)
    }

    /// Returns the text of a cell.
    pub fn get(&self, col: usize, row: usize) -> Option<&str> {
        self.columns.get(col)?.get(&row).map(|s| &**s)
    }

    /// Sets the text of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FixedWidth`] if the column does not exist and the
    /// table is not dynamic.
    pub fn set(&mut self, col: usize, row: usize, value: &str) -> Result<&mut Self> {
        if col >= self.columns.len() {
            if !self.dynamic {
                return Err(Error::FixedWidth(col));
            }
            self.set_width(col + 1);
        }
        self.columns[col].insert(row, Box::from(value));
        Ok(self)
    }

    /// Removes a column, shifting the following columns to the left.
    ///
    /// A table with fixed width gets an empty column appended to keep its
    /// width.
    pub fn remove_column(&mut self, col: usize) -> Result<&mut Self> {
        if col >= self.columns.len() {
            return Err(Error::ColumnOutOfBounds {
                col,
                columns: self.columns.len(),
            });
        }
        self.columns.remove(col);
        if !self.dynamic {
            self.columns.push(Column::default());
        }
        Ok(self)
    }

    /// Clears every cell of a row.
    ///
    /// Following rows keep their indices.
    pub fn remove_row(&mut self, row: usize) -> Result<&mut Self> {
        let rows = self.rows();
        if row >= rows {
            return Err(Error::RowOutOfBounds { row, rows });
        }
        for column in &mut self.columns {
            column.remove(&row);
        }
        Ok(self)
    }

    /// Sets the amount of columns, dropping the rightmost columns if the
    /// table is too wide.
    pub fn set_width(&mut self, width: usize) -> &mut Self {
        self.columns.resize_with(width, Column::default);
        self
    }

    /// Removes every row with index `rows` or above.
    pub fn prune_rows(&mut self, rows: usize) -> &mut Self {
        for column in &mut self.columns {
            column.retain(|&row, _| row < rows);
        }
        self
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .map(|c| c.values().map(|s| width(s)).max().unwrap_or(0))
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let widths = self.widths();
        for row in 0..self.rows() {
            if row != 0 {
                fmt.write_char('\n')?;
            }
            for (column, &w) in self.columns.iter().zip(&widths) {
                let cell = column.get(&row).map_or("", |s| &**s);
                fmt.write_str(cell)?;
                for _ in width(cell)..w {
                    fmt.write_char(self.filler)?;
                }
                fmt.write_str(&self.splitter)?;
            }
        }
        Ok(())
    }
}

/// Compares the rendered text and the settings of both tables.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.dynamic == other.dynamic
            && self.filler == other.filler
            && self.splitter == other.splitter
            && self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic() -> Result<()> {
        let mut table = Table::with_width(1);
        table
            .set(0, 0, "1")?
            .set_dynamic(true)
            .set(4, 0, "SE")?
            .remove_column(4)?
            .set(2, 1, "2")?
            .set(3, 3, "3")?
            .set(3, 4, "AB")?;
        assert_eq!(
            table.to_string(),
            "1       \n   2    \n        \n     3  \n     AB "
        );
        assert_eq!(table.columns(), 4);
        assert_eq!(table.rows(), 5);
        Ok(())
    }

    #[test]
    fn dynamic_with_settings() -> Result<()> {
        let mut table = Table::new();
        table
            .set_splitter(":")
            .set_filler('_')
            .set(0, 0, "1")?
            .set(2, 1, "2")?
            .set(2, 43, "test")?
            .set(3, 3, "3")?
            .remove_row(43)?
            .set(3, 4, "AB")?;
        assert_eq!(
            table.to_string(),
            "1::_:__:\n_::2:__:\n_::_:__:\n_::_:3_:\n_::_:AB:"
        );
        Ok(())
    }

    #[test]
    fn fixed() -> Result<()> {
        let mut table = Table::with_width(5);
        table
            .set(0, 0, "1")?
            .set(4, 0, "SE")?
            .remove_column(4)?
            .set(2, 1, "2")?
            .set(3, 3, "3")?
            .set(3, 4, "AB")?;
        assert_eq!(
            table.to_string(),
            "1        \n   2     \n         \n     3   \n     AB  "
        );
        assert_eq!(table.columns(), 5);
        Ok(())
    }

    #[test]
    fn fixed_with_settings() -> Result<()> {
        let mut table = Table::with_width(2);
        table
            .set_width(4)
            .set_splitter(":")
            .set_filler('_')
            .set(0, 0, "1")?
            .set(2, 1, "2")?
            .set(2, 43, "test")?
            .set(3, 3, "3")?
            .remove_row(43)?
            .set(3, 4, "AB")?;
        assert_eq!(
            table.to_string(),
            "1::_:__:\n_::2:__:\n_::_:__:\n_::_:3_:\n_::_:AB:"
        );
        Ok(())
    }

    #[test]
    fn errors() {
        let mut table = Table::with_width(2);
        assert_eq!(table.set(3, 2, "Yo").err(), Some(Error::FixedWidth(3)));
        assert_eq!(
            table.remove_column(2).err(),
            Some(Error::ColumnOutOfBounds { col: 2, columns: 2 })
        );
        assert_eq!(
            table.remove_row(0).err(),
            Some(Error::RowOutOfBounds { row: 0, rows: 0 })
        );

        let mut table = Table::new();
        assert!(table.set(3, 2, "Yo").is_ok());
        assert_eq!(table.columns(), 4);
    }

    #[test]
    fn resize() -> Result<()> {
        let mut table = Table::new();
        table.set(0, 0, "a")?.set(1, 1, "b")?.set(2, 2, "c")?;
        table.set_width(2);
        assert_eq!(table.columns(), 2);
        assert_eq!(table.get(2, 2), None);
        assert_eq!(table.rows(), 2);
        table.prune_rows(1);
        assert_eq!(table.rows(), 1);
        assert_eq!(table.get(0, 0), Some("a"));
        assert_eq!(table.get(1, 1), None);
        assert_eq!(table.to_string(), "a  ");
        Ok(())
    }

    #[test]
    fn settings() {
        let mut table = Table::new();
        assert_eq!(table.filler(), ' ');
        assert_eq!(table.set_filler('a').filler(), 'a');
        assert_eq!(table.splitter(), " ");
        assert_eq!(table.set_splitter("ABC").splitter(), "ABC");
        assert!(table.is_dynamic());
        assert!(!table.set_dynamic(false).is_dynamic());

        let mut table = Table::with_width(3);
        assert!(!table.is_dynamic());
        assert!(table.set_dynamic(true).is_dynamic());
        assert_eq!(Table::new(), Table::default());
        assert_ne!(Table::new(), Table::with_width(0));
    }

    #[test]
    fn unicode_width() -> Result<()> {
        let mut table = Table::new();
        table.set(0, 0, "åäö")?.set(0, 1, "x")?;
        assert_eq!(table.to_string(), "åäö \nx   ");
        Ok(())
    }
}
