//! Summary statistics over a timing sample.

/// Order statistics and central tendency of one workload's measured runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (N−1 denominator); 0.0 for a single sample.
    pub stdev: f64,
}

/// Reduce a timing sample to summary statistics.
///
/// Defined for samples of length ≥ 1; the timed execution engine never
/// returns an empty successful sample, so an empty input is a programming
/// error here.
pub fn summarize(sample: &[f64]) -> SummaryStats {
    assert!(!sample.is_empty(), "summarize requires at least one sample");

    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();

    let min = sorted[0];
    let max = sorted[n - 1];
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };
    let stdev = if n > 1 {
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    SummaryStats {
        min,
        max,
        mean,
        median,
        stdev,
    }
}
