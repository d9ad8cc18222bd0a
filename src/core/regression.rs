use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("no training samples")]
    Empty,

    #[error("{samples} samples but {targets} targets")]
    LengthMismatch { samples: usize, targets: usize },

    #[error("row {row} has {found} features, expected {expected}")]
    RaggedRow { row: usize, found: usize, expected: usize },

    #[error("training data contains a non-finite value")]
    NonFinite,

    #[error("expected {expected} features, got {found}")]
    FeatureCount { expected: usize, found: usize },
}

/// Ordinary least squares with an intercept term
///
/// Fitting centers the data and solves the normal equations
/// `(XᵀX) β = Xᵀy` by Gaussian elimination with partial pivoting.
/// Columns that are constant or linearly dependent on earlier ones get a
/// zero coefficient, so degenerate data still yields a least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Relative pivot tolerance below which a column counts as dependent
const PIVOT_EPSILON: f64 = 1e-10;

impl LinearRegression {
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<Self, RegressionError> {
        if x.is_empty() {
            return Err(RegressionError::Empty);
        }
        if x.len() != y.len() {
            return Err(RegressionError::LengthMismatch {
                samples: x.len(),
                targets: y.len(),
            });
        }

        let features = x[0].len();
        for (row, values) in x.iter().enumerate() {
            if values.len() != features {
                return Err(RegressionError::RaggedRow {
                    row,
                    found: values.len(),
                    expected: features,
                });
            }
        }
        if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
            return Err(RegressionError::NonFinite);
        }

        let n = x.len() as f64;
        let x_mean: Vec<f64> = (0..features)
            .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        let mut xtx = vec![vec![0.0; features]; features];
        let mut xty = vec![0.0; features];
        for (row, target) in x.iter().zip(y) {
            let centered: Vec<f64> = row.iter().zip(&x_mean).map(|(v, m)| v - m).collect();
            let t = target - y_mean;
            for i in 0..features {
                xty[i] += centered[i] * t;
                for j in 0..features {
                    xtx[i][j] += centered[i] * centered[j];
                }
            }
        }

        let coefficients = solve_normal_equations(xtx, xty);
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        Ok(Self { coefficients, intercept })
    }

    pub fn predict(&self, features: &[f64]) -> Result<f64, RegressionError> {
        if features.len() != self.coefficients.len() {
            return Err(RegressionError::FeatureCount {
                expected: self.coefficients.len(),
                found: features.len(),
            });
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(b, v)| b * v)
                .sum::<f64>())
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Solve a symmetric positive semi-definite system, zeroing free variables
fn solve_normal_equations(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let size = b.len();
    let scale = (0..size).map(|i| a[i][i].abs()).fold(0.0, f64::max);
    let tolerance = scale * PIVOT_EPSILON;

    let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(size);
    let mut row = 0;

    for col in 0..size {
        if row == size {
            break;
        }

        let (best, magnitude) = (row..size)
            .map(|r| (r, a[r][col].abs()))
            .fold((row, 0.0), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        if magnitude <= tolerance {
            continue;
        }

        a.swap(row, best);
        b.swap(row, best);

        for r in (row + 1)..size {
            let factor = a[r][col] / a[row][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..size {
                a[r][c] -= factor * a[row][c];
            }
            b[r] -= factor * b[row];
        }

        pivots.push((row, col));
        row += 1;
    }

    let mut solution = vec![0.0; size];
    for &(r, c) in pivots.iter().rev() {
        let rest: f64 = ((c + 1)..size).map(|k| a[r][k] * solution[k]).sum();
        solution[c] = (b[r] - rest) / a[r][c];
    }
    solution
}
