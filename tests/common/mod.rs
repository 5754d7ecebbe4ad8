//! Dense reference implementations shared by the integration tests.
//!
//! Every routine works on `Vec<Vec<f64>>` rows and spells out the padded
//! signal explicitly, so the sparse kernels can be checked position by
//! position.

#![allow(dead_code)]

use spectre::sparse::{savgol_coefficients, Axis, PaddingMode, RollingOp};

/// Dense matrix, one `Vec` per row
pub type Dense = Vec<Vec<f64>>;

// ============================================================================
// Shape helpers
// ============================================================================

pub fn transpose(rows: &Dense, n_cols: usize) -> Dense {
    (0..n_cols)
        .map(|col| rows.iter().map(|row| row[col]).collect())
        .collect()
}

/// Run `line_op` over every line along `axis` and reassemble the matrix.
fn along(rows: &Dense, n_cols: usize, axis: Axis, line_op: impl Fn(&[f64]) -> Vec<f64>) -> Dense {
    match axis {
        Axis::Columns => rows.iter().map(|row| line_op(row)).collect(),
        Axis::Rows => {
            let columns: Dense = transpose(rows, n_cols).iter().map(|col| line_op(col)).collect();
            let out_rows = columns.first().map_or(0, Vec::len);
            transpose(&columns, out_rows)
        }
    }
}

pub fn assert_dense_close(actual: &Dense, expected: &Dense, tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "row count differs");
    for (r, (a_row, e_row)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(a_row.len(), e_row.len(), "column count differs in row {}", r);
        for (c, (&a, &e)) in a_row.iter().zip(e_row).enumerate() {
            let scale = 1.0_f64.max(e.abs());
            assert!(
                (a - e).abs() <= tolerance * scale,
                "mismatch at ({}, {}): got {}, expected {}",
                r,
                c,
                a,
                e
            );
        }
    }
}

// ============================================================================
// Rolling windows
// ============================================================================

/// Pad one line the way the sliding window sees it.
pub fn pad_line(line: &[f64], window: usize, mode: PaddingMode) -> Vec<f64> {
    let n = line.len();
    let (left, right) = match mode {
        PaddingMode::Valid => (0, 0),
        PaddingMode::Full => (window - 1, window - 1),
        PaddingMode::Symmetric | PaddingMode::Constant => (window / 2, (window - 1) / 2),
    };

    let mut padded = Vec::with_capacity(n + left + right);
    match mode {
        PaddingMode::Symmetric => {
            padded.extend(line[..left].iter().rev());
            padded.extend_from_slice(line);
            padded.extend(line[n - right..].iter().rev());
        }
        _ => {
            padded.resize(left, 0.0);
            padded.extend_from_slice(line);
            padded.resize(left + n + right, 0.0);
        }
    }
    padded
}

/// Statistic of one fully materialized window; the median is the upper one.
pub fn statistic(op: RollingOp, samples: &[f64]) -> f64 {
    match op {
        RollingOp::Min => samples.iter().copied().fold(f64::INFINITY, f64::min),
        RollingOp::Max => samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        RollingOp::Mean => samples.iter().sum::<f64>() / samples.len() as f64,
        RollingOp::Median => {
            let mut sorted = samples.to_vec();
            sorted.sort_by(f64::total_cmp);
            sorted[sorted.len() / 2]
        }
    }
}

pub fn rolling_line(line: &[f64], window: usize, op: RollingOp, mode: PaddingMode) -> Vec<f64> {
    pad_line(line, window, mode)
        .windows(window)
        .map(|samples| statistic(op, samples))
        .collect()
}

pub fn dense_rolling(
    rows: &Dense,
    n_cols: usize,
    window: usize,
    axis: Axis,
    op: RollingOp,
    mode: PaddingMode,
) -> Dense {
    along(rows, n_cols, axis, |line| rolling_line(line, window, op, mode))
}

// ============================================================================
// Savitzky-Golay
// ============================================================================

pub fn dense_savgol(rows: &Dense, n_cols: usize, window: usize, degree: usize, axis: Axis) -> Dense {
    let coefficients = savgol_coefficients(window, degree).expect("valid savgol parameters");
    along(rows, n_cols, axis, |line| {
        pad_line(line, window, PaddingMode::Constant)
            .windows(window)
            .map(|samples| samples.iter().zip(&coefficients).map(|(s, c)| s * c).sum())
            .collect()
    })
}

// ============================================================================
// Baseline
// ============================================================================

/// Baseline removal on a dense run, `window` already fitted to the run.
pub fn dense_remove_baseline(rows: &Dense, n_cols: usize, window: usize) -> Dense {
    let step = |input: &Dense, op| dense_rolling(input, n_cols, window, Axis::Rows, op, PaddingMode::Symmetric);

    let floor = step(rows, RollingOp::Min);
    let n_rows = rows.len() as f64;
    let noise: Vec<f64> = (0..n_cols)
        .map(|col| {
            let mean = floor.iter().map(|row| row[col]).sum::<f64>() / n_rows;
            let variance = floor.iter().map(|row| (row[col] - mean).powi(2)).sum::<f64>() / n_rows;
            variance.sqrt()
        })
        .collect();

    let median = step(rows, RollingOp::Median);
    let clipped: Dense = median
        .iter()
        .zip(&floor)
        .map(|(m_row, f_row)| {
            m_row
                .iter()
                .zip(f_row)
                .zip(&noise)
                .map(|((&m, &f), &off)| m.min(f + off))
                .collect()
        })
        .collect();
    let base = step(&clipped, RollingOp::Mean);

    rows.iter()
        .zip(&base)
        .map(|(row, b_row)| row.iter().zip(b_row).map(|(&x, &b)| (x - b).max(0.0)).collect())
        .collect()
}
