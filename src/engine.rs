use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// Side length of the board.
pub const SIZE: usize = 4;
/// Tile value that wins the game.
pub const WINNING_TILE: Tile = 2048;
/// Largest tile a 4x4 board can ever hold.
pub const MAX_TILE: Tile = 1 << 17;

pub type Tile = u32;
pub type Score = u64;
pub type Line = [Tile; SIZE];
pub type Grid = [Line; SIZE];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("expected 4 rows, found {0}")]
    Rows(usize),
    #[error("row {row} has {found} cells, expected 4")]
    Columns { row: usize, found: usize },
    #[error("cell ({row}, {col}) holds {value}, which is not empty or a power of two from 2 to 131072")]
    BadValue { row: usize, col: usize, value: Tile },
    #[error("cannot parse cell {0:?}")]
    Parse(String),
}

/// A 4x4 2048 board stored row-major, `0` meaning empty.
///
/// `Board` is a plain `Copy` value: every operation returns a new board or
/// mutates the one you own, so handing it out never aliases engine state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Grid", into = "Grid")]
pub struct Board(Grid);

/// Result of sliding a board in one direction, before any tile is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shifted {
    pub board: Board,
    /// Sum of the values of every tile produced by a merge.
    pub score: Score,
}

/// Where a random tile landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Build a board from rows without validation.
    ///
    /// Use `Board::try_from` when the grid comes from outside the program.
    #[inline]
    pub const fn from_rows(rows: Grid) -> Self { Board(rows) }

    #[inline]
    pub fn rows(&self) -> &Grid { &self.0 }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile { self.0[row][col] }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use play_2048::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);
    /// let shifted = b.shift(Move::Left);
    /// assert_eq!(shifted.board.rows()[0], [4, 4, 0, 0]);
    /// assert_eq!(shifted.score, 8);
    /// ```
    pub fn shift(self, dir: Move) -> Shifted {
        match dir {
            Move::Left => collapse_rows(self),
            Move::Right => {
                let s = collapse_rows(reverse_rows(self));
                Shifted { board: reverse_rows(s.board), score: s.score }
            }
            Move::Up => {
                let s = collapse_rows(transpose(self));
                Shifted { board: transpose(s.board), score: s.score }
            }
            Move::Down => {
                let s = collapse_rows(reverse_rows(transpose(self)));
                Shifted { board: transpose(reverse_rows(s.board)), score: s.score }
            }
        }
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns `None` and leaves the board untouched when it is full.
    ///
    /// ```
    /// use play_2048::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut b = Board::EMPTY;
    /// let spawn = b.spawn_tile(&mut rng).unwrap();
    /// assert!(spawn.value == 2 || spawn.value == 4);
    /// assert_eq!(b.count_empty(), 15);
    /// ```
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Spawn> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let (row, col) = empty[rng.gen_range(0..empty.len())];
        let value = generate_random_tile(rng);
        self.0[row][col] = value;
        Some(Spawn { row, col, value })
    }

    /// Convenience: like `spawn_tile` but by value, returning the board unchanged when full.
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.spawn_tile(rng);
        self
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(SIZE * SIZE);
        for (r, row) in self.0.iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                if tile == 0 {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    #[inline]
    pub fn count_empty(&self) -> usize {
        self.0.iter().flatten().filter(|&&t| t == 0).count()
    }

    /// Return the highest tile value present on the board (0 when empty).
    pub fn highest_tile(&self) -> Tile {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn sum(&self) -> Score {
        self.0.iter().flatten().map(|&t| t as Score).sum()
    }

    pub fn contains_winning_tile(&self) -> bool {
        self.0.iter().flatten().any(|&t| t == WINNING_TILE)
    }

    /// True if some cell equals its right or lower neighbour.
    ///
    /// Adjacent empty cells count as a pair.
    pub fn has_mergeable_pair(&self) -> bool {
        for r in 0..SIZE {
            for c in 0..SIZE {
                let current = self.0[r][c];
                if c + 1 < SIZE && self.0[r][c + 1] == current {
                    return true;
                }
                if r + 1 < SIZE && self.0[r + 1][c] == current {
                    return true;
                }
            }
        }
        false
    }

    /// True while at least one direction can still change the board.
    pub fn has_available_moves(&self) -> bool {
        self.count_empty() > 0 || self.has_mergeable_pair()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "+------+------+------+------+";
        writeln!(f, "{rule}")?;
        for row in &self.0 {
            write!(f, "|")?;
            for &tile in row {
                write!(f, "{}|", format_val(tile))?;
            }
            writeln!(f)?;
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl TryFrom<Grid> for Board {
    type Error = BoardError;

    fn try_from(grid: Grid) -> Result<Self, Self::Error> {
        for (row, line) in grid.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(BoardError::BadValue { row, col, value });
                }
            }
        }
        Ok(Board(grid))
    }
}

impl TryFrom<Vec<Vec<Tile>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE {
            return Err(BoardError::Rows(rows.len()));
        }
        let mut grid = [[0; SIZE]; SIZE];
        for (r, row) in rows.iter().enumerate() {
            grid[r] = row
                .as_slice()
                .try_into()
                .map_err(|_| BoardError::Columns { row: r, found: row.len() })?;
        }
        Board::try_from(grid)
    }
}

impl From<Board> for Grid {
    fn from(b: Board) -> Self { b.0 }
}

/// Parse four lines of four cells separated by whitespace or commas.
/// `.` stands for an empty cell, as does `0`. Blank lines are skipped.
///
/// ```
/// use play_2048::engine::Board;
/// let b: Board = "2 . . 2\n0,0,0,0\n. . . .\n4 4 8 16".parse().unwrap();
/// assert_eq!(b.get(0, 3), 2);
/// assert_eq!(b.get(3, 3), 16);
/// ```
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.split(|ch: char| ch == ',' || ch.is_whitespace())
                    .filter(|tok| !tok.is_empty())
                    .map(parse_cell)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Board::try_from(rows)
    }
}

/// Collapse one line toward index 0.
///
/// Zeros are squeezed out, then a single left-to-right pass merges equal
/// neighbours; a tile produced by a merge never merges again in the same
/// pass. Returns the padded line and the sum of merged tile values.
///
/// ```
/// use play_2048::engine::process_line;
/// assert_eq!(process_line([2, 0, 2, 2]), ([4, 2, 0, 0], 4));
/// ```
pub fn process_line(line: Line) -> (Line, Score) {
    let mut packed = [0; SIZE];
    let mut len = 0;
    for tile in line {
        if tile != 0 {
            packed[len] = tile;
            len += 1;
        }
    }

    let mut out = [0; SIZE];
    let mut score = 0;
    let mut i = 0;
    let mut n = 0;
    while i < len {
        if i + 1 < len && packed[i] == packed[i + 1] {
            let merged = packed[i] * 2;
            out[n] = merged;
            score += merged as Score;
            i += 2;
        } else {
            out[n] = packed[i];
            i += 1;
        }
        n += 1;
    }
    (out, score)
}

/// Swap rows and columns into a fresh board.
pub fn transpose(board: Board) -> Board {
    let mut grid = [[0; SIZE]; SIZE];
    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = board.0[c][r];
        }
    }
    Board(grid)
}

/// Mirror every row left-to-right.
pub fn reverse_rows(mut board: Board) -> Board {
    for row in board.0.iter_mut() {
        row.reverse();
    }
    board
}

/// Slide/merge tiles in the given direction. No randomness.
#[inline]
pub fn shift(board: Board, direction: Move) -> Shifted { board.shift(direction) }

fn collapse_rows(board: Board) -> Shifted {
    let mut grid = board.0;
    let mut score = 0;
    for row in grid.iter_mut() {
        let (line, delta) = process_line(*row);
        *row = line;
        score += delta;
    }
    Shifted { board: Board(grid), score }
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile { if rng.gen_range(0..10) < 9 { 2 } else { 4 } }

fn is_valid_tile(value: Tile) -> bool { value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two()) }

fn parse_cell(tok: &str) -> Result<Tile, BoardError> {
    if tok == "." {
        return Ok(0);
    }
    tok.parse().map_err(|_| BoardError::Parse(tok.to_string()))
}

fn format_val(tile: Tile) -> String {
    match tile {
        0 => " ".repeat(6),
        x => format!("{x:^6}"),
    }
}
