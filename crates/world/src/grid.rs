use std::fmt;
use std::path::Path;

const DEFAULT_LAYOUT: &str = include_str!("../layouts/default.txt");

/// Errors from building or parsing an occupancy grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout is empty")]
    Empty,
    #[error("layout is not square: row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown cell {ch:?} at line {line}, column {column}")]
    UnknownCell { ch: char, line: usize, column: usize },
}

/// Square boolean map where `true` marks a wall column.
///
/// Text layouts use one line per row: `#` is a wall, `.` is open floor.
/// Blank lines and lines starting with `;` are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// All-floor grid of `width × width` cells.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            cells: vec![false; width * width],
        }
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, GridError> {
        let width = rows.len();
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(width * width);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(GridError::NotSquare {
                    row,
                    found: cols.len(),
                    expected: width,
                });
            }
            cells.extend(cols);
        }
        Ok(Self { width, cells })
    }

    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let row = line
                .chars()
                .enumerate()
                .map(|(column, ch)| match ch {
                    '#' => Ok(true),
                    '.' => Ok(false),
                    _ => Err(GridError::UnknownCell {
                        ch,
                        line: index + 1,
                        column: column + 1,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let grid = Self::parse(&text)?;
        tracing::debug!(
            "loaded {}x{} layout from {} ({} walls)",
            grid.width,
            grid.width,
            path.display(),
            grid.wall_count()
        );
        Ok(grid)
    }

    /// The built-in 50×50 maze: a bordered arena with nested rings around an
    /// open centre.
    pub fn default_layout() -> Self {
        match Self::parse(DEFAULT_LAYOUT) {
            Ok(grid) => grid,
            Err(e) => unreachable!("built-in layout is malformed: {e}"),
        }
    }

    /// Load `path` when given, otherwise fall back to the built-in layout.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, GridError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default_layout()),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the cell at column `x`, row `y` is a wall. Out of range is floor.
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or(false)
    }

    pub fn set(&mut self, x: usize, y: usize, wall: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = wall;
        }
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.width).then(|| y * self.width + x)
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for &wall in row {
                f.write_str(if wall { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_small_layout() {
        let grid = OccupancyGrid::parse("; comment\n#..\n.#.\n\n..#\n").unwrap();
        assert_eq!(grid.width(), 3);
        assert!(grid.is_wall(0, 0));
        assert!(grid.is_wall(1, 1));
        assert!(grid.is_wall(2, 2));
        assert!(!grid.is_wall(1, 0));
        assert_eq!(grid.wall_count(), 3);
    }

    #[test]
    fn display_round_trips() {
        let text = "#..\n.#.\n..#\n";
        let grid = OccupancyGrid::parse(text).unwrap();
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn rejects_non_square() {
        let err = OccupancyGrid::parse("#..\n.#\n...\n").unwrap_err();
        assert!(matches!(
            err,
            GridError::NotSquare {
                row: 1,
                found: 2,
                expected: 3
            }
        ));
        assert!(matches!(
            OccupancyGrid::parse("##\n##\n##\n").unwrap_err(),
            GridError::NotSquare { .. }
        ));
    }

    #[test]
    fn rejects_unknown_cell() {
        let err = OccupancyGrid::parse("..\n.x\n").unwrap_err();
        assert!(matches!(
            err,
            GridError::UnknownCell {
                ch: 'x',
                line: 2,
                column: 2
            }
        ));
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            OccupancyGrid::parse("; nothing\n\n").unwrap_err(),
            GridError::Empty
        ));
    }

    #[test]
    fn set_and_bounds() {
        let mut grid = OccupancyGrid::new(4);
        grid.set(3, 2, true);
        assert!(grid.is_wall(3, 2));
        grid.set(10, 10, true);
        assert!(!grid.is_wall(10, 10));
        assert_eq!(grid.wall_count(), 1);
        assert_eq!(grid.cell_count(), 16);
    }

    #[test]
    fn default_layout_is_50_square_with_open_centre() {
        let grid = OccupancyGrid::default_layout();
        assert_eq!(grid.width(), 50);
        assert!(grid.is_wall(0, 0));
        assert!(grid.is_wall(49, 49));
        assert!(!grid.is_wall(25, 25));
        assert!(grid.wall_count() > 0);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#.\n.#\n").unwrap();
        let grid = OccupancyGrid::load(file.path()).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.wall_count(), 2);
    }

    #[test]
    fn load_or_default_picks_source() {
        let grid = OccupancyGrid::load_or_default(None).unwrap();
        assert_eq!(grid, OccupancyGrid::default_layout());

        let missing = std::path::Path::new("/no/such/layout.txt");
        assert!(matches!(
            OccupancyGrid::load_or_default(Some(missing)),
            Err(GridError::Io(_))
        ));
    }
}
