use super::boundary::{set_bnd, BoundaryKind};
use super::idx;

/// Gauss-Seidel relaxation over the interior of an `(n + 2)^2` grid.
/// Solves: x[i,j] = (x0[i,j] + a * (neighbors)) / c
pub fn lin_solve(kind: BoundaryKind, x: &mut [f64], x0: &[f64], a: f64, c: f64, iter: usize, n: usize) {
    let size = n + 2;
    let c_inv = 1.0 / c;
    for _ in 0..iter {
        for j in 1..=n {
            for i in 1..=n {
                let neighbors = x[idx(i - 1, j, size)]
                    + x[idx(i + 1, j, size)]
                    + x[idx(i, j - 1, size)]
                    + x[idx(i, j + 1, size)];
                x[idx(i, j, size)] = (x0[idx(i, j, size)] + a * neighbors) * c_inv;
            }
        }
        set_bnd(kind, x, n);
    }
}

/// Implicit diffusion of `x0` into `x`.
/// a = dt * rate * n^2, c = 1 + 4a
pub fn diffuse(kind: BoundaryKind, x: &mut [f64], x0: &[f64], rate: f64, dt: f64, iter: usize, n: usize) {
    let a = dt * rate * (n * n) as f64;
    // Start the relaxation from the previous state rather than a stale generation.
    x.copy_from_slice(x0);
    lin_solve(kind, x, x0, a, 1.0 + 4.0 * a, iter, n);
}

/// Semi-Lagrangian advection: traces each interior cell back along (vx, vy)
/// and samples `d0` bilinearly at the departure point.
pub fn advect(kind: BoundaryKind, d: &mut [f64], d0: &[f64], vx: &[f64], vy: &[f64], dt: f64, n: usize) {
    let size = n + 2;
    let dt0 = dt * n as f64;
    let lo = 0.5;
    let hi = n as f64 + 0.5;

    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, size);
            let x = (i as f64 - dt0 * vx[ii]).clamp(lo, hi);
            let y = (j as f64 - dt0 * vy[ii]).clamp(lo, hi);

            let i0 = x.floor() as usize;
            let i1 = i0 + 1;
            let j0 = y.floor() as usize;
            let j1 = j0 + 1;

            let s1 = x - i0 as f64;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f64;
            let t0 = 1.0 - t1;

            d[ii] = s0 * (t0 * d0[idx(i0, j0, size)] + t1 * d0[idx(i0, j1, size)])
                + s1 * (t0 * d0[idx(i1, j0, size)] + t1 * d0[idx(i1, j1, size)]);
        }
    }
    set_bnd(kind, d, n);
}

/// Pressure projection: removes the gradient part of (vx, vy).
/// `p` and `div` are scratch grids of the same size.
pub fn project(vx: &mut [f64], vy: &mut [f64], p: &mut [f64], div: &mut [f64], iter: usize, n: usize) {
    let size = n + 2;
    let h = 1.0 / n as f64;

    for j in 1..=n {
        for i in 1..=n {
            div[idx(i, j, size)] = -0.5
                * h
                * (vx[idx(i + 1, j, size)] - vx[idx(i - 1, j, size)]
                    + vy[idx(i, j + 1, size)] - vy[idx(i, j - 1, size)]);
            p[idx(i, j, size)] = 0.0;
        }
    }
    set_bnd(BoundaryKind::Continuous, div, n);
    set_bnd(BoundaryKind::Continuous, p, n);

    lin_solve(BoundaryKind::Continuous, p, div, 1.0, 4.0, iter, n);

    for j in 1..=n {
        for i in 1..=n {
            vx[idx(i, j, size)] -= 0.5 * (p[idx(i + 1, j, size)] - p[idx(i - 1, j, size)]) / h;
            vy[idx(i, j, size)] -= 0.5 * (p[idx(i, j + 1, size)] - p[idx(i, j - 1, size)]) / h;
        }
    }
    set_bnd(BoundaryKind::InvertHorizontal, vx, n);
    set_bnd(BoundaryKind::InvertVertical, vy, n);
}
