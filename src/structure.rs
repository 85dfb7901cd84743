use std::fmt::{Debug, Formatter};

use crate::error::{Error, Result};
use crate::GridCoord;

/// A rectangular matrix of fillable and blocked cells, stored row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Structure {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Structure {
    /// Build a structure from rows of flags, where `true` marks a fillable cell. Every row must
    /// have the same number of cells.
    pub fn new<R>(rows: R) -> Result<Structure>
        where
            R: IntoIterator,
            R::Item: AsRef<[bool]>,
    {
        let mut width: Option<usize> = None;
        let mut height = 0;
        let mut cells = vec![];

        for (row, flags) in rows.into_iter().enumerate() {
            let flags = flags.as_ref();
            let expected = *width.get_or_insert(flags.len());
            if flags.len() != expected {
                return Err(Error::RaggedRow { row, expected, found: flags.len() });
            }
            cells.extend_from_slice(flags);
            height += 1;
        }

        match width {
            Some(width) if width > 0 => Ok(Structure { width, height, cells }),
            _ => Err(Error::EmptyStructure),
        }
    }

    /// Build a structure from a string template, with `#` representing blocks and `_` or `.`
    /// representing fillable cells. Blank lines and surrounding whitespace are ignored.
    pub fn from_template(template: &str) -> Result<Structure> {
        let mut rows: Vec<Vec<bool>> = vec![];

        for line in template.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let row = rows.len();
            let flags = line.chars().enumerate().map(|(col, cell)| match cell {
                '#' => Ok(false),
                '_' | '.' => Ok(true),
                found => Err(Error::InvalidTemplateCell { row, col, found }),
            }).collect::<Result<Vec<bool>>>()?;
            rows.push(flags);
        }

        Structure::new(rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at `(row, col)` can hold a letter. Out-of-bounds cells count as blocked.
    pub fn is_fillable(&self, (row, col): GridCoord) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }
}

impl Debug for Structure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Structure {}x{}", self.height, self.width)?;
        for row in 0..self.height {
            let line: String = (0..self.width)
                .map(|col| if self.is_fillable((row, col)) { '_' } else { '#' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::Structure;
    use crate::error::Error;

    #[test]
    fn test_structure_from_rows() {
        let structure = Structure::new([
            [true, true, false],
            [true, false, false],
        ]).unwrap();

        assert_eq!(structure.width(), 3);
        assert_eq!(structure.height(), 2);
        assert!(structure.is_fillable((0, 1)));
        assert!(!structure.is_fillable((1, 1)));
        assert!(!structure.is_fillable((2, 0)), "rows past the bottom are blocked");
        assert!(!structure.is_fillable((0, 3)), "columns past the edge are blocked");
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = Structure::new(vec![vec![true, true], vec![true]]);

        assert_matches!(result, Err(Error::RaggedRow { row: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn test_empty_structure_is_rejected() {
        assert_matches!(Structure::new(Vec::<Vec<bool>>::new()), Err(Error::EmptyStructure));
        assert_matches!(Structure::new(vec![Vec::<bool>::new()]), Err(Error::EmptyStructure));
        assert_matches!(Structure::from_template("\n  \n"), Err(Error::EmptyStructure));
    }

    #[test]
    fn test_structure_from_template() {
        let structure = Structure::from_template(
            "
            #__
            _._
            __#
            ",
        ).unwrap();

        assert_eq!(structure, Structure::new([
            [false, true, true],
            [true, true, true],
            [true, true, false],
        ]).unwrap());
    }

    #[test]
    fn test_template_rejects_unknown_cells() {
        let result = Structure::from_template("__\n_x");

        assert_matches!(result, Err(Error::InvalidTemplateCell { row: 1, col: 1, found: 'x' }));
    }
}
