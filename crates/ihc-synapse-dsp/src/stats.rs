// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Vector statistics for spike-count and PSTH aggregation

/// Arithmetic mean (0.0 for an empty slice)
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Sample variance around a known mean (n - 1 denominator)
pub fn variance(x: &[f64], m: f64) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }
    x.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (x.len() - 1) as f64
}

/// Sample standard deviation around a known mean
pub fn std_dev(x: &[f64], m: f64) -> f64 {
    variance(x, m).sqrt()
}

/// Running sum
pub fn cum_sum(x: &[f64]) -> Vec<f64> {
    x.iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Sum consecutive chunks of `x` into `n_bins` bins
///
/// Each bin covers `x.len() / n_bins` samples; a remainder that does not fill a whole
/// bin is dropped.
pub fn make_bins(x: &[f64], n_bins: usize) -> Vec<f64> {
    if n_bins == 0 {
        return Vec::new();
    }
    let width = x.len() / n_bins;
    if width == 0 {
        return vec![0.0; n_bins];
    }
    x.chunks_exact(width)
        .take(n_bins)
        .map(|chunk| chunk.iter().sum())
        .collect()
}

/// Column-wise mean over rows of equal length
pub fn reduce_mean(rows: &[Vec<f64>]) -> Vec<f64> {
    let Some(width) = rows.first().map(Vec::len) else {
        return Vec::new();
    };
    (0..width)
        .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / rows.len() as f64)
        .collect()
}

/// Column-wise sample standard deviation given the column means
pub fn reduce_std(rows: &[Vec<f64>], means: &[f64]) -> Vec<f64> {
    means
        .iter()
        .enumerate()
        .map(|(j, &m)| {
            let column: Vec<f64> = rows.iter().map(|r| r[j]).collect();
            std_dev(&column, m)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let m = mean(&x);
        assert_eq!(m, 2.5);
        assert!((variance(&x, m) - 5.0 / 3.0).abs() < 1e-12);
        assert!((std_dev(&x, m) - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[1.0], 1.0), 0.0);
    }

    #[test]
    fn test_cum_sum() {
        assert_eq!(cum_sum(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
    }

    #[test]
    fn test_make_bins() {
        let x = [1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 9.0];
        assert_eq!(make_bins(&x, 3), vec![2.0, 4.0, 6.0]);
        assert_eq!(make_bins(&x, 0), Vec::<f64>::new());
        assert_eq!(make_bins(&[1.0], 2), vec![0.0, 0.0]);
    }

    #[test]
    fn test_reduce_over_rows() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let means = reduce_mean(&rows);
        assert_eq!(means, vec![2.0, 10.0]);
        let stds = reduce_std(&rows, &means);
        assert!((stds[0] - 2.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(stds[1], 0.0);
    }
}
