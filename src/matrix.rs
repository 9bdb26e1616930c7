//! One year of a contribution calendar as a 7x53 grid of intensities.
//!
//! The first and last columns may be partially hidden by the calendar
//! depending on the date the history is rendered against.

use crate::error::{ArtError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub const ROWS: usize = 7;
pub const COLUMNS: usize = 53;
pub const AREA: usize = ROWS * COLUMNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Empty,
    Light,
    Medium,
    Dark,
}

impl Value {
    pub const ALL: [Value; 4] = [Value::Empty, Value::Light, Value::Medium, Value::Dark];

    pub fn character(self) -> char {
        match self {
            Value::Empty => ' ',
            Value::Light => '.',
            Value::Medium => ':',
            Value::Dark => '!',
        }
    }

    pub fn from_char(character: char) -> Option<Self> {
        match character {
            ' ' => Some(Value::Empty),
            '.' => Some(Value::Light),
            ':' => Some(Value::Medium),
            '!' => Some(Value::Dark),
            _ => None,
        }
    }

    /// Number of commits one unit of scaling factor buys for this cell.
    pub fn weight(self) -> u32 {
        match self {
            Value::Empty => 0,
            Value::Light => 1,
            Value::Medium => 2,
            Value::Dark => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    cells: [[Value; ROWS]; COLUMNS],
}

impl Matrix {
    pub fn filled(value: Value) -> Self {
        Self {
            cells: [[value; ROWS]; COLUMNS],
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let matrix = Self::from_reader(reader, &path.display().to_string())?;
        info!(file = %path.display(), "initialized matrix from definition file");
        Ok(matrix)
    }

    /// Parse the first `ROWS` lines of `reader`, `file` naming the source in errors.
    ///
    /// Characters past `COLUMNS` on a line and lines past `ROWS` are ignored.
    pub fn from_reader<R: BufRead>(reader: R, file: &str) -> Result<Self> {
        let mut cells = [[Value::Empty; ROWS]; COLUMNS];
        let mut lines = reader.lines();

        for row in 0..ROWS {
            let line = match lines.next() {
                Some(line) => line?,
                None => {
                    return Err(ArtError::MissingLine {
                        file: file.to_string(),
                        row,
                    })
                }
            };

            let length = line.chars().count();
            if length < COLUMNS {
                return Err(ArtError::ShortLine {
                    file: file.to_string(),
                    row,
                    length,
                });
            }

            for (column, character) in line.chars().take(COLUMNS).enumerate() {
                cells[column][row] = Value::from_char(character).ok_or_else(|| ArtError::InvalidCharacter {
                    file: file.to_string(),
                    row,
                    column,
                    character,
                })?;
            }
        }

        Ok(Self { cells })
    }

    /// Column-major traversal, matching calendar week then day-of-week order.
    pub fn values(&self) -> Values<'_> {
        Values {
            matrix: self,
            index: 0,
        }
    }
}

impl FromStr for Matrix {
    type Err = ArtError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes(), "<string>")
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for column in 0..COLUMNS {
                write!(f, "{}", self.cells[column][row].character())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Values<'a> {
    matrix: &'a Matrix,
    index: usize,
}

impl Iterator for Values<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.index >= AREA {
            return None;
        }
        let value = self.matrix.cells[self.index / ROWS][self.index % ROWS];
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = AREA - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Values<'_> {}

impl<'a> IntoIterator for &'a Matrix {
    type Item = Value;
    type IntoIter = Values<'a>;

    fn into_iter(self) -> Values<'a> {
        self.values()
    }
}
