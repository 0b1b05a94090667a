//! Rollback executor - reverses the provisioned schema in one script.
//!
//! Strict reverse dependency order: triggers first (they reference the
//! functions), then functions, then tables with CASCADE (which takes the
//! dependent indexes and policies with them). Every statement is
//! existence-guarded, so the script is safe against a pristine,
//! partially-applied, or fully-applied database.

use sqlx::postgres::PgPoolOptions;

use crate::error::{SeedbedError, SeedbedResult};

/// The reverse script. One batch, no per-statement log.
pub const ROLLBACK_SQL: &str = r#"
    -- Triggers reference the functions below, so they go first.
    DROP TRIGGER IF EXISTS on_auth_user_created ON auth.users;
    DROP TRIGGER IF EXISTS waitlist_position_trigger ON waitlist;

    DROP FUNCTION IF EXISTS public.handle_new_user();
    DROP FUNCTION IF EXISTS assign_waitlist_position();

    -- CASCADE drops the dependent indexes and policies.
    DROP TABLE IF EXISTS credits CASCADE;
    DROP TABLE IF EXISTS profiles CASCADE;
    DROP TABLE IF EXISTS waitlist CASCADE;
"#;

/// Execute the rollback script. No retry and no partial-success tracking;
/// any failure surfaces as a single rollback error.
pub async fn rollback_schema(database_url: &str) -> SeedbedResult<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .map_err(|e| SeedbedError::connection(format!("Failed to connect to database: {}", e)))?;

    println!("Rolling back schema...");
    let result = sqlx::raw_sql(ROLLBACK_SQL).execute(&pool).await;
    pool.close().await;

    match result {
        Ok(_) => {
            println!("✅ Schema rolled back successfully");
            Ok(())
        }
        Err(e) => Err(SeedbedError::rollback(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::EXECUTION_STEPS;

    #[test]
    fn test_every_drop_is_existence_guarded() {
        let drops = ROLLBACK_SQL.matches("DROP ").count();
        let guarded = ROLLBACK_SQL.matches("IF EXISTS").count();
        assert_eq!(drops, 7);
        assert_eq!(drops, guarded);
    }

    #[test]
    fn test_reverse_dependency_order() {
        let last_trigger = ROLLBACK_SQL.rfind("DROP TRIGGER").unwrap();
        let first_function = ROLLBACK_SQL.find("DROP FUNCTION").unwrap();
        let last_function = ROLLBACK_SQL.rfind("DROP FUNCTION").unwrap();
        let first_table = ROLLBACK_SQL.find("DROP TABLE").unwrap();

        assert!(last_trigger < first_function);
        assert!(last_function < first_table);
    }

    #[test]
    fn test_rollback_covers_everything_the_forward_flow_creates() {
        // Objects not covered by a table CASCADE must be dropped by name.
        for object in [
            "on_auth_user_created",
            "waitlist_position_trigger",
            "handle_new_user",
            "assign_waitlist_position",
        ] {
            assert!(ROLLBACK_SQL.contains(object), "missing drop for {}", object);
        }

        for table in ["credits", "profiles", "waitlist"] {
            assert!(
                ROLLBACK_SQL.contains(&format!("DROP TABLE IF EXISTS {} CASCADE", table)),
                "missing cascade drop for {}",
                table
            );
        }

        // Sanity: every named object actually comes from the forward steps.
        let forward_sql: String = EXECUTION_STEPS.iter().map(|s| s.sql).collect();
        for object in [
            "on_auth_user_created",
            "waitlist_position_trigger",
            "handle_new_user",
            "assign_waitlist_position",
            "credits",
            "profiles",
            "waitlist",
        ] {
            assert!(forward_sql.contains(object));
        }
    }

    #[test]
    fn test_tables_drop_with_cascade() {
        assert_eq!(ROLLBACK_SQL.matches("CASCADE").count(), 3);
    }
}
