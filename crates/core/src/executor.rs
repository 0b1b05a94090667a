//! Schema executor - applies the provisioning steps in order.
//!
//! Each step runs under autocommit semantics: one `raw_sql` round trip per
//! step, committed the instant it executes. There is no rollback-on-failure
//! for already-applied steps, which is why the step table places low-risk
//! operations first. A duplicate-object error downgrades the step to
//! `skipped` and the run continues; any other error halts the remaining
//! steps because later steps depend on earlier ones. Verification runs
//! either way.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{is_duplicate_object_error, SeedbedError, SeedbedResult};
use crate::report::{ExecutionReport, StepResult, StepStatus};
use crate::steps::EXECUTION_STEPS;
use crate::verify::run_verification;

/// Executes the forward step sequence over a single connection.
pub struct SchemaExecutor {
    pool: PgPool,
}

impl SchemaExecutor {
    /// Connect with a single pooled connection, so exactly one statement is
    /// in flight at a time.
    pub async fn connect(database_url: &str) -> SeedbedResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| {
                SeedbedError::connection(format!("Failed to connect to database: {}", e))
            })?;
        println!("✅ Connected to database\n");

        Ok(Self { pool })
    }

    /// Get the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply every step in declaration order, halting after the first
    /// non-duplicate failure, then verify whatever schema is in place.
    pub async fn provision(&self) -> ExecutionReport {
        let mut results = Vec::with_capacity(EXECUTION_STEPS.len());

        for step in EXECUTION_STEPS {
            println!("Executing: {}", step.name);

            match sqlx::raw_sql(step.sql).execute(&self.pool).await {
                Ok(_) => {
                    println!("✅ Success: {}\n", step.name);
                    results.push(StepResult::new(
                        step.name,
                        StepStatus::Success,
                        "Executed successfully",
                    ));
                }
                Err(e) if is_duplicate_object_error(&e) => {
                    println!("⚠️  Already exists: {}", step.name);
                    println!("   Continuing...\n");
                    results.push(StepResult::new(
                        step.name,
                        StepStatus::Skipped,
                        "Table already exists",
                    ));
                }
                Err(e) => {
                    println!("❌ Failed: {}", step.name);
                    println!("   Error: {}\n", e);
                    results.push(StepResult::new(step.name, StepStatus::Failed, e.to_string()));
                    // Later steps depend on earlier ones.
                    break;
                }
            }
        }

        // Runs after a halt too, so the report shows the partially-applied
        // schema exactly as the database has it.
        let verification = run_verification(&self.pool).await;

        ExecutionReport::new(results, verification, EXECUTION_STEPS.len())
    }

    /// Release the connection.
    pub async fn close(self) {
        self.pool.close().await;
        println!("\n✅ Database connection closed");
    }
}

/// Forward flow entry point: connect, provision, and release the connection
/// on every exit path. A connection failure produces a synthetic
/// single-entry report so the artifact is still written.
pub async fn provision_schema(database_url: &str) -> ExecutionReport {
    println!("Connecting to database...");

    match SchemaExecutor::connect(database_url).await {
        Ok(executor) => {
            let report = executor.provision().await;
            executor.close().await;
            report
        }
        Err(e) => {
            println!("❌ Fatal error: {}", e);
            ExecutionReport::connection_failure(e.to_string())
        }
    }
}
