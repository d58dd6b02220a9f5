//! Dataset provisioning: generates the setup SQL and runs it once.
//!
//! Every generated row is a pure function of its integer index, so two plans
//! with the same row count produce byte-identical SQL and byte-identical
//! table contents. The BSON table is populated by converting the JSON rows
//! through the engine's own `json_to_bson` — the codec is never reimplemented
//! here, which keeps the two representations logically identical by
//! construction.

use crate::shell::{DuckDbShell, SETUP_TIMEOUT};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Configuration for the one-time setup pass.
#[derive(Debug, Clone)]
pub struct SetupPlan {
    pub rows: u64,
    /// Sets `extension_directory` before loading extensions.
    pub extension_dir: Option<PathBuf>,
    /// Direct path to the bson extension file; falls back to `LOAD bson`.
    pub bson_extension: Option<PathBuf>,
}

/// JSON document expression over the row index `i`:
/// `{"user":{"name":"user_<i>","age":20+i%40},"country":…,"flag":…,"score":i*1.5}`
const DOC_EXPR: &str = r#"'{' ||
    '"user":{' ||
    '"name":"user_' || i::VARCHAR || '",' ||
    '"age":' || (20 + (i % 40))::VARCHAR ||
    '},' ||
    '"country":"' || (CASE (i % 5)
        WHEN 0 THEN 'US'
        WHEN 1 THEN 'UK'
        WHEN 2 THEN 'FR'
        WHEN 3 THEN 'DE'
        ELSE 'JP' END) || '",' ||
    '"flag":' || (CASE WHEN i % 2 = 0 THEN 'true' ELSE 'false' END) || ',' ||
    '"score":' || (i * 1.5)::VARCHAR ||
    '}'"#;

const CREATE_TABLES: &str = "CREATE TABLE json_data (
    id INTEGER PRIMARY KEY,
    raw_json VARCHAR,
    data_json JSON
);

CREATE TABLE bson_data (
    id INTEGER PRIMARY KEY,
    data_bson BSON
);

";

const CONVERT_ROWS: &str = "INSERT INTO bson_data
SELECT
    id,
    json_to_bson(raw_json) AS data_bson
FROM json_data;
";

/// Build the combined setup SQL for the given plan. Pure; deterministic for
/// a fixed plan.
pub fn setup_sql(plan: &SetupPlan) -> String {
    let mut sql = String::new();
    if let Some(dir) = &plan.extension_dir {
        sql.push_str(&format!("SET extension_directory='{}';\n", dir.display()));
    }
    match &plan.bson_extension {
        Some(path) => sql.push_str(&format!("LOAD '{}';\n", path.display())),
        None => sql.push_str("LOAD bson;\n"),
    }
    sql.push_str("LOAD json;\n\n");
    sql.push_str(CREATE_TABLES);
    sql.push_str(&insert_json_rows(plan.rows));
    sql.push_str(CONVERT_ROWS);
    sql
}

fn insert_json_rows(rows: u64) -> String {
    format!(
        "INSERT INTO json_data
SELECT
    i AS id,
    {DOC_EXPR} AS raw_json,
    ({DOC_EXPR})::JSON AS data_json
FROM range({rows}) t(i);

"
    )
}

/// Execute the setup SQL against the target database exactly once.
///
/// Any timeout or non-zero exit is fatal: a partially provisioned dataset
/// would invalidate every subsequent measurement, so the whole run aborts.
pub fn provision(shell: &DuckDbShell, db: &Path, plan: &SetupPlan) -> Result<()> {
    let sql = setup_sql(plan);
    shell
        .run_batch(db, std::slice::from_ref(&sql), SETUP_TIMEOUT)
        .map(drop)
        .map_err(|failure| anyhow::anyhow!("database setup failed: {failure}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(rows: u64) -> SetupPlan {
        SetupPlan {
            rows,
            extension_dir: Some(PathBuf::from("build/extension")),
            bson_extension: None,
        }
    }

    #[test]
    fn setup_sql_is_deterministic() {
        assert_eq!(setup_sql(&plan(100)), setup_sql(&plan(100)));
    }

    #[test]
    fn row_count_is_plumbed_into_the_generator() {
        let sql = setup_sql(&plan(12345));
        assert!(sql.contains("FROM range(12345) t(i)"));
        // zero rows is a valid (empty) dataset
        assert!(setup_sql(&plan(0)).contains("FROM range(0) t(i)"));
    }

    #[test]
    fn bson_rows_derive_from_json_rows_via_engine_codec() {
        let sql = setup_sql(&plan(10));
        assert!(sql.contains("json_to_bson(raw_json)"));
        let json_insert = sql.find("INSERT INTO json_data").unwrap();
        let bson_insert = sql.find("INSERT INTO bson_data").unwrap();
        assert!(json_insert < bson_insert);
    }

    #[test]
    fn extension_directory_clause_is_optional() {
        let with_dir = setup_sql(&plan(1));
        assert!(with_dir.starts_with("SET extension_directory='build/extension';"));
        assert!(with_dir.contains("LOAD bson;"));

        let explicit = setup_sql(&SetupPlan {
            rows: 1,
            extension_dir: None,
            bson_extension: Some(PathBuf::from("ext/bson.duckdb_extension")),
        });
        assert!(!explicit.contains("SET extension_directory"));
        assert!(explicit.contains("LOAD 'ext/bson.duckdb_extension';"));
        assert!(!explicit.contains("LOAD bson;"));
    }

    #[test]
    fn both_tables_are_created_and_json_loaded() {
        let sql = setup_sql(&plan(1));
        assert!(sql.contains("CREATE TABLE json_data"));
        assert!(sql.contains("CREATE TABLE bson_data"));
        assert!(sql.contains("LOAD json;"));
    }
}
