use super::idx;

/// Sum of a scalar field over interior cells.
pub fn total(field: &[f64], n: usize) -> f64 {
    let size = n + 2;
    (1..=n)
        .map(|j| (1..=n).map(|i| field[idx(i, j, size)]).sum::<f64>())
        .sum()
}

/// Interior-averaged kinetic energy: KE = 0.5 * <vx² + vy²>.
pub fn kinetic_energy(vx: &[f64], vy: &[f64], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let size = n + 2;
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, size);
            sum += vx[ii] * vx[ii] + vy[ii] * vy[ii];
        }
    }
    0.5 * sum / (n * n) as f64
}

/// Mean absolute central-difference divergence over interior cells, in
/// grid units (h = 1/n).
pub fn mean_abs_divergence(vx: &[f64], vy: &[f64], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let size = n + 2;
    let half_n = 0.5 * n as f64;
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let d = vx[idx(i + 1, j, size)] - vx[idx(i - 1, j, size)]
                + vy[idx(i, j + 1, size)] - vy[idx(i, j - 1, size)];
            sum += (half_n * d).abs();
        }
    }
    sum / (n * n) as f64
}
