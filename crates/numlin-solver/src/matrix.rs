//! Primitive matrix operations shared by every solver.
//!
//! Row operations mutate in place and are meant for use inside elimination
//! loops on a solver's private copy. Everything else is a pure computation.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Build a matrix from nested rows.
///
/// Fails with `EmptyMatrix` when there are no rows or columns and with
/// `DimensionMismatch` when rows have different lengths.
pub fn from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if nrows == 0 || ncols == 0 {
        return Err(Error::EmptyMatrix);
    }
    if let Some(row) = rows.iter().find(|row| row.len() != ncols) {
        return Err(Error::DimensionMismatch {
            expected: ncols,
            actual: row.len(),
        });
    }

    Ok(DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]))
}

/// Convert a matrix back into nested rows.
pub fn to_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

/// Identity matrix of dimension `n`.
pub fn identity(n: usize) -> DMatrix<f64> {
    DMatrix::identity(n, n)
}

/// Divide every element of `row` by `divisor`.
#[inline]
pub fn scale_row(m: &mut DMatrix<f64>, row: usize, divisor: f64) {
    for k in 0..m.ncols() {
        m[(row, k)] /= divisor;
    }
}

/// Subtract `factor` times row `source` from row `target`.
#[inline]
pub fn combine_rows(m: &mut DMatrix<f64>, target: usize, source: usize, factor: f64) {
    for k in 0..m.ncols() {
        let v = m[(source, k)];
        m[(target, k)] -= factor * v;
    }
}

/// Exchange rows `a` and `b`.
#[inline]
pub fn swap_rows(m: &mut DMatrix<f64>, a: usize, b: usize) {
    if a != b {
        m.swap_rows(a, b);
    }
}

/// Matrix product `a * b`.
pub fn product(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if a.ncols() != b.nrows() {
        return Err(Error::DimensionMismatch {
            expected: a.ncols(),
            actual: b.nrows(),
        });
    }
    Ok(a * b)
}

/// Determinant by partial-pivoting elimination on a private copy.
///
/// Returns exactly 0.0 when a column has no non-zero candidate pivot, which
/// is what happens for a zero row or two identical rows.
pub fn determinant(a: &DMatrix<f64>) -> Result<f64> {
    let n = check_square(a)?;
    let mut m = a.clone();
    let mut det = 1.0;

    for j in 0..n {
        let mut pivot = j;
        for i in (j + 1)..n {
            if m[(i, j)].abs() > m[(pivot, j)].abs() {
                pivot = i;
            }
        }
        if m[(pivot, j)] == 0.0 {
            return Ok(0.0);
        }
        if pivot != j {
            swap_rows(&mut m, pivot, j);
            det = -det;
        }

        let divisor = m[(j, j)];
        det *= divisor;
        for i in (j + 1)..n {
            let factor = m[(i, j)] / divisor;
            combine_rows(&mut m, i, j, factor);
        }
    }

    Ok(det)
}

/// Zero-determinant test.
pub fn is_singular(a: &DMatrix<f64>) -> Result<bool> {
    Ok(determinant(a)? == 0.0)
}

/// Residual `a * x - b`.
pub fn residual(a: &DMatrix<f64>, x: &DVector<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    check_len(a.ncols(), x.len())?;
    check_len(a.nrows(), b.len())?;
    Ok(a * x - b)
}

/// Largest absolute component of the residual `a * x - b`.
pub fn max_abs_residual(a: &DMatrix<f64>, x: &DVector<f64>, b: &DVector<f64>) -> Result<f64> {
    Ok(residual(a, x, b)?.amax())
}

/// Largest absolute entry of `a * a_inv - I`.
pub fn inverse_residual(a: &DMatrix<f64>, a_inv: &DMatrix<f64>) -> Result<f64> {
    let n = check_square(a)?;
    let prod = product(a, a_inv)?;
    check_len(n, prod.ncols())?;
    Ok((prod - identity(n)).amax())
}

/// Whether `a` is square and symmetric within `rel_tol` of its largest entry.
pub fn is_symmetric(a: &DMatrix<f64>, rel_tol: f64) -> bool {
    check_symmetric(a, rel_tol).is_ok()
}

/// Fail with `NotSymmetric` at the first asymmetric pair.
pub fn check_symmetric(a: &DMatrix<f64>, rel_tol: f64) -> Result<()> {
    let n = check_square(a)?;
    let tol = rel_tol * a.amax().max(1.0);
    for i in 0..n {
        for j in (i + 1)..n {
            if (a[(i, j)] - a[(j, i)]).abs() > tol {
                return Err(Error::NotSymmetric { row: i, col: j });
            }
        }
    }
    Ok(())
}

/// Dimension of a non-empty square matrix.
pub(crate) fn check_square(a: &DMatrix<f64>) -> Result<usize> {
    if a.nrows() == 0 || a.ncols() == 0 {
        return Err(Error::EmptyMatrix);
    }
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    Ok(a.nrows())
}

pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// One line per row, for trace output.
pub(crate) fn describe_matrix(m: &DMatrix<f64>) -> String {
    m.row_iter()
        .map(|row| format!("{:?}", row.iter().collect::<Vec<_>>()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn describe_vector(v: &DVector<f64>) -> String {
    format!("{:?}", v.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn from_rows_builds_row_major() {
        let m = from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(to_rows(&m), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let result = from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(from_rows(&[]), Err(Error::EmptyMatrix)));
    }

    #[test]
    fn row_operations() {
        let mut m = dmatrix![2.0, 4.0; 1.0, 3.0];

        scale_row(&mut m, 0, 2.0);
        assert_eq!(m, dmatrix![1.0, 2.0; 1.0, 3.0]);

        combine_rows(&mut m, 1, 0, 1.0);
        assert_eq!(m, dmatrix![1.0, 2.0; 0.0, 1.0]);

        swap_rows(&mut m, 0, 1);
        assert_eq!(m, dmatrix![0.0, 1.0; 1.0, 2.0]);
    }

    #[test]
    fn product_checks_inner_dimension() {
        let a = dmatrix![1.0, 2.0; 3.0, 4.0];
        let b = dmatrix![1.0; 1.0];
        assert_eq!(product(&a, &b).unwrap(), dmatrix![3.0; 7.0]);

        let c = dmatrix![1.0, 2.0, 3.0];
        assert!(matches!(
            product(&a, &c),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn determinant_values() {
        let a = dmatrix![2.0, 1.0, 7.0; 3.0, 2.0, 1.0; 1.0, 3.0, 0.0];
        // 2(0 - 3) - 1(0 - 1) + 7(9 - 2) = 44
        assert!((determinant(&a).unwrap() - 44.0).abs() < 1e-10);

        let swapped = dmatrix![0.0, 1.0; 1.0, 0.0];
        assert!((determinant(&swapped).unwrap() + 1.0).abs() < 1e-15);
    }

    #[test]
    fn zero_row_and_identical_rows_are_singular() {
        let zero_row = dmatrix![1.0, 2.0, 3.0; 0.0, 0.0, 0.0; 4.0, 5.0, 7.0];
        assert!(is_singular(&zero_row).unwrap());

        let identical = dmatrix![0.3, 1.7, 2.9; 4.1, 0.2, 5.5; 0.3, 1.7, 2.9];
        assert!(is_singular(&identical).unwrap());

        let scaled = dmatrix![1.0, 2.0; 2.0, 4.0];
        assert!(is_singular(&scaled).unwrap());

        assert!(!is_singular(&identity(3)).unwrap());
    }

    #[test]
    fn determinant_requires_square() {
        let a = dmatrix![1.0, 2.0, 3.0; 4.0, 5.0, 6.0];
        assert!(matches!(
            determinant(&a),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn residuals() {
        let a = dmatrix![2.0, 1.0; 1.0, 3.0];
        let x = dvector![1.8, 1.4];
        let b = dvector![5.0, 6.0];
        assert!(max_abs_residual(&a, &x, &b).unwrap() < 1e-12);

        let a_inv = dmatrix![0.6, -0.2; -0.2, 0.4];
        assert!(inverse_residual(&a, &a_inv).unwrap() < 1e-12);

        let short = dvector![1.0];
        assert!(matches!(
            residual(&a, &short, &b),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn symmetry_check() {
        let sym = dmatrix![4.0, 2.0; 2.0, -3.0];
        assert!(is_symmetric(&sym, 1e-12));

        let asym = dmatrix![1.0, 2.0, 0.0; 2.0, 1.0, 5.0; 0.0, 4.0, 1.0];
        assert!(matches!(
            check_symmetric(&asym, 1e-12),
            Err(Error::NotSymmetric { row: 1, col: 2 })
        ));
    }
}
