//! Dense linear solves for small systems

use crate::{MathError, Result};

/// Pivots smaller than this are treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Solve `a * x = b` by Gaussian elimination with partial pivoting
///
/// Intended for the handful of unknowns an autoregression carries; the
/// matrix is taken by value and reduced in place.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(format!(
            "Expected a {}x{} system matrix",
            n, n
        )));
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col].abs() < PIVOT_TOLERANCE {
            return Err(MathError::SingularMatrix(format!(
                "No usable pivot in column {}",
                col
            )));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    Ok(x)
}
