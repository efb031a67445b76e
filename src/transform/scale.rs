//! Feature standardization.

/// A standardized column with its parameters.
#[derive(Debug, Clone)]
pub struct ScaleResult {
    /// Transformed data
    pub data: Vec<f64>,
    /// Column mean
    pub center: f64,
    /// Column standard deviation (1.0 for constant columns)
    pub scale: f64,
}

/// Standardize data to zero mean and unit variance.
///
/// x_scaled = (x - mean) / std, where std is the population standard
/// deviation. Constant columns map to all zeros.
pub fn standardize(series: &[f64]) -> ScaleResult {
    if series.is_empty() {
        return ScaleResult {
            data: Vec::new(),
            center: 0.0,
            scale: 1.0,
        };
    }

    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    let scale = if std < 1e-10 { 1.0 } else { std };
    let data = series.iter().map(|&x| (x - mean) / scale).collect();

    ScaleResult {
        data,
        center: mean,
        scale,
    }
}

/// Standardize each column of a row-major feature table.
///
/// Returns the scaled rows and the per-column parameters.
pub fn standardize_columns(rows: &[Vec<f64>]) -> (Vec<Vec<f64>>, Vec<ScaleResult>) {
    let dims = rows.first().map(|r| r.len()).unwrap_or(0);
    let columns: Vec<ScaleResult> = (0..dims)
        .map(|j| {
            let column: Vec<f64> = rows.iter().map(|r| r[j]).collect();
            standardize(&column)
        })
        .collect();

    let scaled = (0..rows.len())
        .map(|i| columns.iter().map(|c| c.data[i]).collect())
        .collect();

    (scaled, columns)
}
