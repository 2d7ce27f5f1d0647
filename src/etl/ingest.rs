use serde::Serialize;
use sqlx::{Executor, PgPool, Postgres, Row, Transaction};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::etl::dataset::Dataset;
use crate::etl::error::{classify, EtlError};

/// Staging table the variable-expenses batch is loaded into before the
/// server-side function migrates it into the final tables.
const STAGING_TABLE: &str = "staging_variable_bills";

/// Message used when the investments verification row is unusable.
const INVESTMENT_QUERY_FAILED: &str = "The client query for investments did not succeed.";

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct InvestmentCounts {
    pub investment_cnt: i64,
    pub bridge_cnt: i64,
    pub tax_cnt: i64,
    pub dividend_cnt: i64,
}

/// Per-dataset row counts accumulated while the transaction runs,
/// returned to the caller only on commit.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct IngestionSummary {
    pub variable_expenses: BTreeMap<String, i64>,
    pub fixed_costs: i64,
    pub fixed_income: i64,
    pub food_prices: i64,
    pub investments: InvestmentCounts,
}

/// Datasets without a batch in the map, in canonical order.
pub fn missing_datasets(batches: &HashMap<Dataset, String>) -> Vec<&'static str> {
    Dataset::ALL
        .iter()
        .filter(|d| !batches.contains_key(d))
        .map(|d| d.name())
        .collect()
}

/// Parse the textual per-table report returned by the staging migration
/// function. Lines look like `variable_expenses: 120`; anything else is
/// ignored.
pub fn parse_migration_report(report: &str) -> BTreeMap<String, i64> {
    report
        .lines()
        .filter_map(|line| {
            let (table, count) = line.split_once(':')?;
            let count = count.trim().parse::<i64>().ok()?;
            let table = table.trim();
            if table.is_empty() {
                return None;
            }
            Some((table.to_string(), count))
        })
        .collect()
}

/// Apply all five SQL batches inside one transaction.
///
/// The steps are strictly ordered: later tables have foreign keys into
/// earlier ones, and the staging-table lifecycle (load, migrate,
/// truncate) must complete before anything depending on its output runs.
/// Any failure rolls the whole run back; there is no partial commit.
pub async fn ingest(pool: &PgPool, batches: &HashMap<Dataset, String>) -> Result<IngestionSummary, EtlError> {
    // A partial apply would leave the schema inconsistent with no
    // recovery path, so refuse before the transaction even opens.
    let missing = missing_datasets(batches);
    if !missing.is_empty() {
        return Err(EtlError::IncompleteBatch(missing));
    }

    let mut tx = pool.begin().await.map_err(|e| EtlError::Ingestion(classify(e)))?;

    match apply_all(&mut tx, batches).await {
        Ok(summary) => {
            tx.commit().await.map_err(|e| EtlError::Ingestion(classify(e)))?;
            info!("ETL ingestion committed");
            Ok(summary)
        }
        Err(e) => {
            // Connection goes back to the pool either way.
            let _ = tx.rollback().await;
            Err(e)
        }
    }
}

async fn apply_all(
    tx: &mut Transaction<'_, Postgres>,
    batches: &HashMap<Dataset, String>,
) -> Result<IngestionSummary, EtlError> {
    let mut summary = IngestionSummary::default();

    summary.variable_expenses = apply_variable_expenses(tx, &batches[&Dataset::VariableExpenses]).await?;
    summary.fixed_costs = apply_counted(tx, &batches[&Dataset::FixedCosts], "fixed_costs").await?;
    summary.fixed_income = apply_counted(tx, &batches[&Dataset::Income], "fixed_income").await?;
    summary.food_prices = apply_counted(tx, &batches[&Dataset::FoodItems], "food_price").await?;
    summary.investments = apply_investments(tx, &batches[&Dataset::Investments]).await?;

    Ok(summary)
}

/// Step 1: stage, verify, migrate via server-side function, truncate.
///
/// The truncate runs even though the migration already consumed the rows;
/// an empty staging table is the authoritative done-signal for this
/// dataset.
async fn apply_variable_expenses(
    tx: &mut Transaction<'_, Postgres>,
    batch: &str,
) -> Result<BTreeMap<String, i64>, EtlError> {
    execute_batch(tx, batch).await?;

    let staged: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", STAGING_TABLE))
        .fetch_one(&mut **tx)
        .await
        .map_err(violation)?;
    debug!("staged {} variable expense rows", staged);

    if staged == 0 {
        return Err(EtlError::Verification(format!(
            "staging table {} is empty after applying the variable_expenses batch",
            STAGING_TABLE
        )));
    }

    let report: String = sqlx::query_scalar("SELECT public.migrate_staging_variable_bills()")
        .fetch_one(&mut **tx)
        .await
        .map_err(violation)?;
    let counts = parse_migration_report(&report);

    (&mut **tx)
        .execute(format!("TRUNCATE TABLE {}", STAGING_TABLE).as_str())
        .await
        .map_err(violation)?;

    Ok(counts)
}

/// Steps 2-4: apply a direct-load batch and verify the target table is
/// non-empty.
async fn apply_counted(
    tx: &mut Transaction<'_, Postgres>,
    batch: &str,
    table: &str,
) -> Result<i64, EtlError> {
    execute_batch(tx, batch).await?;

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut **tx)
        .await
        .map_err(violation)?;

    if count == 0 {
        return Err(EtlError::Verification(format!(
            "table {} is empty after applying its batch",
            table
        )));
    }

    debug!("{} holds {} rows after insert", table, count);
    Ok(count)
}

/// Step 5: apply the investments batch and verify via one query returning
/// the four related counts. Every column must come back usable, or the
/// step is fatal.
async fn apply_investments(
    tx: &mut Transaction<'_, Postgres>,
    batch: &str,
) -> Result<InvestmentCounts, EtlError> {
    execute_batch(tx, batch).await?;

    let row = sqlx::query(
        "SELECT \
           (SELECT COUNT(*) FROM investments) AS investment_cnt, \
           (SELECT COUNT(*) FROM bridge_investment_dividends) AS bridge_cnt, \
           (SELECT COUNT(*) FROM investment_taxes) AS tax_cnt, \
           (SELECT COUNT(*) FROM investment_dividends) AS dividend_cnt",
    )
    .fetch_one(&mut **tx)
    .await
    .map_err(violation)?;

    let read = |column: &str| -> Result<i64, EtlError> {
        row.try_get::<Option<i64>, _>(column)
            .ok()
            .flatten()
            .ok_or_else(|| EtlError::Verification(INVESTMENT_QUERY_FAILED.to_string()))
    };

    Ok(InvestmentCounts {
        investment_cnt: read("investment_cnt")?,
        bridge_cnt: read("bridge_cnt")?,
        tax_cnt: read("tax_cnt")?,
        dividend_cnt: read("dividend_cnt")?,
    })
}

/// Run one opaque multi-statement SQL batch over the simple query
/// protocol (a plain `&str` goes through `Executor::execute` unprepared).
async fn execute_batch(tx: &mut Transaction<'_, Postgres>, batch: &str) -> Result<(), EtlError> {
    (&mut **tx).execute(batch).await.map_err(violation)?;
    Ok(())
}

fn violation(err: sqlx::Error) -> EtlError {
    EtlError::Ingestion(classify(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_map(datasets: &[Dataset]) -> HashMap<Dataset, String> {
        datasets
            .iter()
            .map(|d| (*d, format!("INSERT INTO {} VALUES (1);", d.name())))
            .collect()
    }

    #[test]
    fn all_present_means_nothing_missing() {
        assert!(missing_datasets(&batch_map(&Dataset::ALL)).is_empty());
    }

    #[test]
    fn missing_datasets_reported_in_canonical_order() {
        let batches = batch_map(&[Dataset::FixedCosts, Dataset::FoodItems]);
        assert_eq!(missing_datasets(&batches), vec!["variable_expenses", "income", "investments"]);
    }

    #[test]
    fn migration_report_parses_table_counts() {
        let report = "variable_expenses: 120\nbridge_var_exp_sensitivity: 34\ndone";
        let counts = parse_migration_report(report);
        assert_eq!(counts.get("variable_expenses"), Some(&120));
        assert_eq!(counts.get("bridge_var_exp_sensitivity"), Some(&34));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn migration_report_ignores_garbage_lines() {
        assert!(parse_migration_report("no counts here").is_empty());
        assert!(parse_migration_report(": 5").is_empty());
    }

    #[test]
    fn investment_failure_message_is_stable() {
        assert_eq!(INVESTMENT_QUERY_FAILED, "The client query for investments did not succeed.");
    }
}
