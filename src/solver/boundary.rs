use super::idx;

/// How ghost cells mirror the interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Ghost cells copy their interior neighbour (density, pressure, divergence).
    Continuous,
    /// Left/right ghost columns are negated (horizontal velocity).
    InvertHorizontal,
    /// Top/bottom ghost rows are negated (vertical velocity).
    InvertVertical,
}

impl BoundaryKind {
    #[inline]
    fn column_sign(self) -> f64 {
        if self == BoundaryKind::InvertHorizontal { -1.0 } else { 1.0 }
    }

    #[inline]
    fn row_sign(self) -> f64 {
        if self == BoundaryKind::InvertVertical { -1.0 } else { 1.0 }
    }
}

/// Fill the ghost ring of an `(n + 2) x (n + 2)` grid from its interior.
///
/// Edge ghosts mirror the nearest interior cell, negated on the walls the
/// kind calls for. Corners take the mean of their two adjacent edge ghosts.
pub fn set_bnd(kind: BoundaryKind, x: &mut [f64], n: usize) {
    let size = n + 2;
    let cs = kind.column_sign();
    let rs = kind.row_sign();

    for i in 1..=n {
        x[idx(0, i, size)] = cs * x[idx(1, i, size)];
        x[idx(n + 1, i, size)] = cs * x[idx(n, i, size)];
        x[idx(i, 0, size)] = rs * x[idx(i, 1, size)];
        x[idx(i, n + 1, size)] = rs * x[idx(i, n, size)];
    }

    x[idx(0, 0, size)] = 0.5 * (x[idx(1, 0, size)] + x[idx(0, 1, size)]);
    x[idx(0, n + 1, size)] = 0.5 * (x[idx(1, n + 1, size)] + x[idx(0, n, size)]);
    x[idx(n + 1, 0, size)] = 0.5 * (x[idx(n, 0, size)] + x[idx(n + 1, 1, size)]);
    x[idx(n + 1, n + 1, size)] = 0.5 * (x[idx(n, n + 1, size)] + x[idx(n + 1, n, size)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 5;
    const SIZE: usize = N + 2;

    /// Interior filled with distinct values, ghosts left at zero.
    fn ramp() -> Vec<f64> {
        let mut field = vec![0.0; SIZE * SIZE];
        for y in 1..=N {
            for x in 1..=N {
                field[idx(x, y, SIZE)] = (y * 10 + x) as f64;
            }
        }
        field
    }

    fn check_edges(field: &[f64], column_sign: f64, row_sign: f64) {
        for i in 1..=N {
            assert_eq!(field[idx(0, i, SIZE)], column_sign * field[idx(1, i, SIZE)]);
            assert_eq!(field[idx(N + 1, i, SIZE)], column_sign * field[idx(N, i, SIZE)]);
            assert_eq!(field[idx(i, 0, SIZE)], row_sign * field[idx(i, 1, SIZE)]);
            assert_eq!(field[idx(i, N + 1, SIZE)], row_sign * field[idx(i, N, SIZE)]);
        }
    }

    fn check_corners(field: &[f64]) {
        let last = N + 1;
        assert_eq!(field[idx(0, 0, SIZE)], 0.5 * (field[idx(1, 0, SIZE)] + field[idx(0, 1, SIZE)]));
        assert_eq!(field[idx(0, last, SIZE)], 0.5 * (field[idx(1, last, SIZE)] + field[idx(0, N, SIZE)]));
        assert_eq!(field[idx(last, 0, SIZE)], 0.5 * (field[idx(N, 0, SIZE)] + field[idx(last, 1, SIZE)]));
        assert_eq!(field[idx(last, last, SIZE)], 0.5 * (field[idx(N, last, SIZE)] + field[idx(last, N, SIZE)]));
    }

    #[test]
    fn test_continuous_mirrors_exactly() {
        let mut field = ramp();
        set_bnd(BoundaryKind::Continuous, &mut field, N);
        check_edges(&field, 1.0, 1.0);
        check_corners(&field);
    }

    #[test]
    fn test_invert_horizontal_negates_side_columns() {
        let mut field = ramp();
        set_bnd(BoundaryKind::InvertHorizontal, &mut field, N);
        check_edges(&field, -1.0, 1.0);
        check_corners(&field);
        assert_eq!(field[idx(0, 2, SIZE)], -21.0);
        assert_eq!(field[idx(3, 0, SIZE)], 13.0);
    }

    #[test]
    fn test_invert_vertical_negates_top_bottom_rows() {
        let mut field = ramp();
        set_bnd(BoundaryKind::InvertVertical, &mut field, N);
        check_edges(&field, 1.0, -1.0);
        check_corners(&field);
        assert_eq!(field[idx(3, 0, SIZE)], -13.0);
        assert_eq!(field[idx(N + 1, 2, SIZE)], 25.0);
    }

    #[test]
    fn test_interior_untouched() {
        let reference = ramp();
        for kind in [BoundaryKind::Continuous, BoundaryKind::InvertHorizontal, BoundaryKind::InvertVertical] {
            let mut field = ramp();
            set_bnd(kind, &mut field, N);
            for y in 1..=N {
                for x in 1..=N {
                    assert_eq!(field[idx(x, y, SIZE)], reference[idx(x, y, SIZE)]);
                }
            }
        }
    }

    #[test]
    fn test_inverted_corner_of_single_cell_grid() {
        // n = 1: both adjacent ghosts of every corner come from the same cell.
        let mut field = vec![0.0; 9];
        field[idx(1, 1, 3)] = 4.0;
        set_bnd(BoundaryKind::InvertHorizontal, &mut field, 1);
        assert_eq!(field[idx(0, 1, 3)], -4.0);
        assert_eq!(field[idx(1, 0, 3)], 4.0);
        assert_eq!(field[idx(0, 0, 3)], 0.0);
    }
}
