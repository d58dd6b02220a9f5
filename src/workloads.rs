//! Workload catalog: the named benchmark queries and their comparison pairs.
//!
//! Names carry a numeric prefix so that sorted order groups related
//! workloads: 1x conversion, 2x extraction, 3x existence, 4x aggregation,
//! 5x storage size. Even/odd suffixes are the JSON/BSON variants.

/// A single named benchmark query.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub name: &'static str,
    pub statement: &'static str,
}

/// Declares two workloads as semantically equivalent across representations.
///
/// `baseline` is the JSON variant, `candidate` the BSON variant; the report
/// computes `candidate.median / baseline.median` for each pair whose sides
/// both produced statistics.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonPair {
    pub baseline: &'static str,
    pub candidate: &'static str,
    pub label: &'static str,
}

const WORKLOADS: [WorkloadSpec; 9] = [
    WorkloadSpec {
        name: "10_convert_json_to_bson",
        statement: "SELECT COUNT(*) FROM (
    SELECT json_to_bson(raw_json) AS bson_doc FROM json_data
) sub;",
    },
    WorkloadSpec {
        name: "20_extract_string_json",
        statement: "SELECT COUNT(*) FROM (
    SELECT json_extract_string(data_json, '$.user.name') AS name FROM json_data
) sub;",
    },
    WorkloadSpec {
        name: "21_extract_string_bson",
        statement: "SELECT COUNT(*) FROM (
    SELECT bson_extract_string(data_bson, '$.user.name') AS name FROM bson_data
) sub;",
    },
    WorkloadSpec {
        name: "30_exists_json",
        statement: "SELECT COUNT(*) FROM (
    SELECT json_extract(data_json, '$.flag') IS NOT NULL AS has_flag FROM json_data
) sub;",
    },
    WorkloadSpec {
        name: "31_exists_bson",
        statement: "SELECT COUNT(*) FROM (
    SELECT bson_exists(data_bson, '$.flag') AS has_flag FROM bson_data
) sub;",
    },
    WorkloadSpec {
        name: "40_groupby_country_json",
        statement: "SELECT json_extract_string(data_json, '$.country') AS country, COUNT(*) AS cnt
FROM json_data
GROUP BY country
ORDER BY country;",
    },
    WorkloadSpec {
        name: "41_groupby_country_bson",
        statement: "SELECT bson_extract_string(data_bson, '$.country') AS country, COUNT(*) AS cnt
FROM bson_data
GROUP BY country
ORDER BY country;",
    },
    WorkloadSpec {
        name: "50_size_json",
        statement: "SELECT SUM(octet_length(raw_json::BLOB)) AS total_bytes FROM json_data;",
    },
    WorkloadSpec {
        name: "51_size_bson",
        statement: "SELECT SUM(octet_length(data_bson::BLOB)) AS total_bytes FROM bson_data;",
    },
];

const PAIRS: [ComparisonPair; 4] = [
    ComparisonPair {
        baseline: "20_extract_string_json",
        candidate: "21_extract_string_bson",
        label: "Extract String",
    },
    ComparisonPair {
        baseline: "30_exists_json",
        candidate: "31_exists_bson",
        label: "Exists Check",
    },
    ComparisonPair {
        baseline: "40_groupby_country_json",
        candidate: "41_groupby_country_bson",
        label: "GroupBy Country",
    },
    ComparisonPair {
        baseline: "50_size_json",
        candidate: "51_size_bson",
        label: "Storage Size",
    },
];

/// All benchmark workloads, sorted by name.
///
/// Panics if the catalog contains duplicate names — that is a programming
/// error in the static tables above, not a runtime condition.
pub fn catalog() -> Vec<WorkloadSpec> {
    let mut specs = WORKLOADS.to_vec();
    specs.sort_by_key(|s| s.name);
    for pair in specs.windows(2) {
        assert_ne!(pair[0].name, pair[1].name, "duplicate workload name");
    }
    specs
}

/// Comparison pairs in declaration order.
pub fn comparison_pairs() -> &'static [ComparisonPair] {
    &PAIRS
}
