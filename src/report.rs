//! Report rendering: per-workload statistics and paired JSON/BSON comparisons.

use crate::shell::ExecutionFailure;
use crate::stats::SummaryStats;
use crate::workloads::ComparisonPair;
use std::collections::BTreeMap;
use std::fmt::Write;

/// One entry per completed workload: statistics on success, the failure that
/// prevented measurement otherwise. Keyed by workload name; iteration order
/// is sorted-name order.
pub type BenchmarkResult = BTreeMap<&'static str, Result<SummaryStats, ExecutionFailure>>;

/// Render the full benchmark report.
///
/// Every workload present in `results` gets exactly one line — statistics or
/// an explicit FAILED marker, never fabricated numbers. Comparison ratios are
/// printed in declaration order for each pair whose sides both produced
/// statistics; incomplete pairs are omitted from that section.
pub fn render(results: &BenchmarkResult, pairs: &[ComparisonPair], rows: u64) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "  BENCHMARK RESULTS ({rows} rows)");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "  {:<40} {:>11} {:>11} {:>11}",
        "Workload", "Median (s)", "Mean (s)", "StdDev (s)"
    );
    let _ = writeln!(out, "  {}", "-".repeat(76));

    for (name, entry) in results {
        match entry {
            Ok(stats) => {
                let _ = writeln!(
                    out,
                    "  {:<40} {:>11.4} {:>11.4} {:>11.4}",
                    name, stats.median, stats.mean, stats.stdev
                );
            }
            Err(failure) => {
                let cause = failure.to_string();
                let cause = cause.lines().next().unwrap_or("unknown").to_string();
                let _ = writeln!(out, "  {name:<40} FAILED  ({cause})");
            }
        }
    }
    let _ = writeln!(out, "{rule}");

    let _ = writeln!(out, "\n  COMPARISON (JSON baseline = 1.0x):");
    let _ = writeln!(out, "  {}", "-".repeat(76));
    for pair in pairs {
        let (baseline, candidate) = match (results.get(pair.baseline), results.get(pair.candidate))
        {
            (Some(Ok(b)), Some(Ok(c))) => (b, c),
            // partial data is expected when a workload fails; skip the pair
            _ => continue,
        };
        if baseline.median <= 0.0 || candidate.median <= 0.0 {
            continue;
        }
        let ratio = candidate.median / baseline.median;
        let verdict = if ratio < 1.0 { "faster" } else { "slower" };
        let _ = writeln!(
            out,
            "  {:<30} JSON: {:.4}s  BSON: {:.4}s  ({:.2}x, BSON is {:.1}% {})",
            pair.label,
            baseline.median,
            candidate.median,
            ratio,
            (1.0 - ratio).abs() * 100.0,
            verdict
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::WORKLOAD_TIMEOUT;

    fn stats(median: f64) -> SummaryStats {
        SummaryStats {
            min: median,
            max: median,
            mean: median,
            median,
            stdev: 0.0,
        }
    }

    fn pair() -> ComparisonPair {
        ComparisonPair {
            baseline: "20_extract_string_json",
            candidate: "21_extract_string_bson",
            label: "Extract String",
        }
    }

    #[test]
    fn half_median_reports_as_faster() {
        let mut results = BenchmarkResult::new();
        results.insert("20_extract_string_json", Ok(stats(0.40)));
        results.insert("21_extract_string_bson", Ok(stats(0.20)));

        let text = render(&results, &[pair()], 100);
        assert!(text.contains("0.50x"), "{text}");
        assert!(text.contains("BSON is 50.0% faster"), "{text}");
    }

    #[test]
    fn slower_candidate_reports_as_slower() {
        let mut results = BenchmarkResult::new();
        results.insert("20_extract_string_json", Ok(stats(0.20)));
        results.insert("21_extract_string_bson", Ok(stats(0.30)));

        let text = render(&results, &[pair()], 100);
        assert!(text.contains("1.50x"), "{text}");
        assert!(text.contains("slower"), "{text}");
    }

    #[test]
    fn failed_workload_gets_marker_not_numbers() {
        let mut results = BenchmarkResult::new();
        results.insert(
            "21_extract_string_bson",
            Err(ExecutionFailure::Timeout {
                limit: WORKLOAD_TIMEOUT,
            }),
        );

        let text = render(&results, &[], 100);
        let line = text
            .lines()
            .find(|l| l.contains("21_extract_string_bson"))
            .unwrap();
        assert!(line.contains("FAILED"), "{line}");
        assert!(line.contains("query timeout"), "{line}");
    }

    #[test]
    fn pair_with_failed_side_is_omitted_from_comparison() {
        let mut results = BenchmarkResult::new();
        results.insert("20_extract_string_json", Ok(stats(0.40)));
        results.insert(
            "21_extract_string_bson",
            Err(ExecutionFailure::MalformedOutput {
                expected: 4,
                actual: 2,
            }),
        );

        let text = render(&results, &[pair()], 100);
        assert!(!text.contains("Extract String"), "{text}");
    }

    #[test]
    fn pair_with_missing_side_is_omitted_from_comparison() {
        let mut results = BenchmarkResult::new();
        results.insert("20_extract_string_json", Ok(stats(0.40)));

        let text = render(&results, &[pair()], 100);
        assert!(!text.contains("Extract String"), "{text}");
    }

    #[test]
    fn workloads_print_in_sorted_name_order() {
        let mut results = BenchmarkResult::new();
        results.insert("41_groupby_country_bson", Ok(stats(0.1)));
        results.insert("10_convert_json_to_bson", Ok(stats(0.1)));
        results.insert("30_exists_json", Ok(stats(0.1)));

        let text = render(&results, &[], 100);
        let first = text.find("10_convert_json_to_bson").unwrap();
        let second = text.find("30_exists_json").unwrap();
        let third = text.find("41_groupby_country_bson").unwrap();
        assert!(first < second && second < third);
    }
}
