use rand::seq::SliceRandom;
use rand::Rng;
use std::error::Error;
use std::fmt;

pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];
pub const CONSONANTS: [char; 21] = [
    'B', 'C', 'D', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'X',
    'Y', 'Z',
];

/// Probability that a cell is drawn from the vowel alphabet. Biased so word
/// formation stays plausible without any dictionary-aware guarantee.
const VOWEL_BIAS: f64 = 0.3;

pub const SUPPORTED_SIZES: [usize; 2] = [4, 5];

/// Zero-indexed (row, col) position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    UnsupportedSize(usize),
    MalformedRows,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::UnsupportedSize(size) => {
                write!(f, "unsupported grid size {} (expected 4 or 5)", size)
            }
            GridError::MalformedRows => write!(f, "rows must form a square of uppercase letters"),
        }
    }
}

impl Error for GridError {}

/// Immutable square board of uppercase letters. Built once per session and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<char>,
}

impl Grid {
    /// Generate a board of the given size with the vowel-bias distribution.
    /// Pure function of `size` and the random source.
    pub fn generate<R: Rng>(size: usize, rng: &mut R) -> Result<Self, GridError> {
        if !SUPPORTED_SIZES.contains(&size) {
            return Err(GridError::UnsupportedSize(size));
        }

        let mut cells = Vec::with_capacity(size * size);
        for _ in 0..size * size {
            let alphabet: &[char] = if rng.gen_bool(VOWEL_BIAS) {
                &VOWELS
            } else {
                &CONSONANTS
            };
            // choose only returns None on an empty slice
            cells.push(*alphabet.choose(rng).unwrap_or(&'E'));
        }

        Ok(Self { size, cells })
    }

    /// Build a board from literal rows, e.g. `["WORD", ...]`. Intended for
    /// tests and deterministic setups.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridError> {
        let size = rows.len();
        if !SUPPORTED_SIZES.contains(&size) {
            return Err(GridError::UnsupportedSize(size));
        }

        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.chars().count() != size {
                return Err(GridError::MalformedRows);
            }
            for c in row.chars() {
                if !c.is_ascii_uppercase() {
                    return Err(GridError::MalformedRows);
                }
                cells.push(c);
            }
        }

        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    pub fn letter(&self, coord: Coord) -> Option<char> {
        if self.contains(coord) {
            Some(self.cells[coord.row * self.size + coord.col])
        } else {
            None
        }
    }

    /// Rows of letters in board order, for rendering.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.size)
    }
}
