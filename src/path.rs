use crate::grid::Coord;

/// Whether an ordered selection path only takes legal steps: every consecutive
/// pair of cells must be within king's-move distance and distinct. Paths of
/// length 0 or 1 are trivially contiguous.
///
/// Revisiting an earlier cell later in the path is NOT rejected here; only
/// step adjacency is checked. Commit-time uniqueness is the engine's concern.
pub fn is_contiguous(path: &[Coord]) -> bool {
    path.windows(2).all(|pair| is_step(pair[0], pair[1]))
}

fn is_step(from: Coord, to: Coord) -> bool {
    let row_diff = from.row.abs_diff(to.row);
    let col_diff = from.col.abs_diff(to.col);

    row_diff <= 1 && col_diff <= 1 && (row_diff, col_diff) != (0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(coords: &[(usize, usize)]) -> Vec<Coord> {
        coords.iter().map(|&(r, c)| Coord::new(r, c)).collect()
    }

    #[test]
    fn test_empty_and_single_are_contiguous() {
        assert!(is_contiguous(&[]));
        assert!(is_contiguous(&path(&[(0, 0)])));
    }

    #[test]
    fn test_orthogonal_and_diagonal_steps() {
        assert!(is_contiguous(&path(&[(0, 0), (0, 1)])));
        assert!(is_contiguous(&path(&[(0, 0), (1, 0)])));
        assert!(is_contiguous(&path(&[(0, 0), (1, 1)])));
        assert!(is_contiguous(&path(&[(2, 2), (1, 1), (0, 2), (1, 3)])));
    }

    #[test]
    fn test_distant_step_is_rejected() {
        assert!(!is_contiguous(&path(&[(0, 0), (2, 2)])));
        assert!(!is_contiguous(&path(&[(0, 0), (0, 2)])));
        assert!(!is_contiguous(&path(&[(0, 0), (0, 1), (3, 1)])));
    }

    #[test]
    fn test_stationary_step_is_rejected() {
        assert!(!is_contiguous(&path(&[(1, 1), (1, 1)])));
        assert!(!is_contiguous(&path(&[(0, 0), (0, 1), (0, 1)])));
    }

    #[test]
    fn test_revisit_of_earlier_cell_is_allowed() {
        // zig-zag back over an already used cell: each step is adjacent,
        // so the path is contiguous by this check
        assert!(is_contiguous(&path(&[(0, 0), (0, 1), (0, 0)])));
        assert!(is_contiguous(&path(&[(1, 1), (1, 2), (2, 2), (1, 1)])));
    }
}
