//! Catalog verification queries.
//!
//! A fixed set of read-only introspection queries run after the step loop,
//! whether or not it halted, so the report always shows how much of the
//! schema is actually in place. Every query is independently guarded: one
//! failing query records an error marker in its own slot and never blocks
//! the others.

use sqlx::{PgPool, Row};

/// A read-only catalog query. Every selected column is cast to text so rows
/// stringify uniformly for the report.
#[derive(Debug, Clone, Copy)]
pub struct VerificationQuery {
    pub name: &'static str,
    pub sql: &'static str,
}

/// The fixed verification set. Unordered with respect to each other.
pub const VERIFICATION_QUERIES: &[VerificationQuery] = &[
    VerificationQuery {
        name: "Check tables",
        sql: r#"
            SELECT table_name::text FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name IN ('waitlist', 'profiles', 'credits');
        "#,
    },
    VerificationQuery {
        name: "Check indexes",
        sql: r#"
            SELECT indexname::text FROM pg_indexes
            WHERE schemaname = 'public'
            AND tablename IN ('waitlist', 'credits');
        "#,
    },
    VerificationQuery {
        name: "Check RLS enabled",
        sql: r#"
            SELECT tablename::text, rowsecurity::text
            FROM pg_tables
            WHERE schemaname = 'public'
            AND tablename IN ('waitlist', 'profiles', 'credits');
        "#,
    },
    VerificationQuery {
        name: "Check policies",
        sql: r#"
            SELECT schemaname::text, tablename::text, policyname::text
            FROM pg_policies
            WHERE schemaname = 'public';
        "#,
    },
    VerificationQuery {
        name: "Check triggers",
        sql: r#"
            SELECT trigger_name::text, event_object_table::text
            FROM information_schema.triggers
            WHERE trigger_schema = 'public';
        "#,
    },
];

/// Outcome of one verification query: its row set, or an error description.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    Rows(Vec<Vec<String>>),
    Error(String),
}

impl VerificationOutcome {
    /// Stringified form persisted in the report artifact.
    pub fn to_report_string(&self) -> String {
        match self {
            VerificationOutcome::Rows(rows) => format!("{:?}", rows),
            VerificationOutcome::Error(message) => format!("Error: {}", message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, VerificationOutcome::Error(_))
    }
}

/// Run every verification query, collecting per-query outcomes. Failures are
/// recorded in place and never abort the stage.
pub async fn run_verification(pool: &PgPool) -> Vec<(String, VerificationOutcome)> {
    println!("\n=== Running Verification Queries ===");
    let mut outcomes = Vec::with_capacity(VERIFICATION_QUERIES.len());

    for query in VERIFICATION_QUERIES {
        match fetch_text_rows(pool, query.sql).await {
            Ok(rows) => {
                println!("\n{}:", query.name);
                for row in &rows {
                    println!("  - {}", row.join(" | "));
                }
                outcomes.push((query.name.to_string(), VerificationOutcome::Rows(rows)));
            }
            Err(e) => {
                println!("❌ Failed to run {}: {}", query.name, e);
                outcomes.push((
                    query.name.to_string(),
                    VerificationOutcome::Error(e.to_string()),
                ));
            }
        }
    }

    outcomes
}

/// Fetch a query whose columns are all text, NULLs as empty strings.
async fn fetch_text_rows(pool: &PgPool, sql: &str) -> Result<Vec<Vec<String>>, sqlx::Error> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut values = Vec::with_capacity(row.len());
        for index in 0..row.len() {
            let value: Option<String> = row.try_get(index)?;
            values.push(value.unwrap_or_default());
        }
        out.push(values);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_query_set_and_unique_names() {
        assert_eq!(VERIFICATION_QUERIES.len(), 5);
        let names: HashSet<_> = VERIFICATION_QUERIES.iter().map(|q| q.name).collect();
        assert_eq!(names.len(), VERIFICATION_QUERIES.len());
    }

    #[test]
    fn test_queries_are_read_only() {
        for query in VERIFICATION_QUERIES {
            let sql = query.sql.trim_start().to_uppercase();
            assert!(sql.starts_with("SELECT"), "non-SELECT query: {}", query.name);
        }
    }

    #[test]
    fn test_outcome_stringification() {
        let rows = VerificationOutcome::Rows(vec![vec!["waitlist".to_string()]]);
        assert_eq!(rows.to_report_string(), r#"[["waitlist"]]"#);
        assert!(!rows.is_error());

        let err = VerificationOutcome::Error("relation missing".to_string());
        assert_eq!(err.to_report_string(), "Error: relation missing");
        assert!(err.is_error());
    }

    #[test]
    fn test_all_columns_cast_to_text() {
        for query in VERIFICATION_QUERIES {
            assert!(
                query.sql.contains("::text"),
                "uncast column in {}",
                query.name
            );
        }
    }
}
