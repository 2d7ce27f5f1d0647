use axum::extract::Path;
use chrono::NaiveDate;
use tracing::info;

use crate::config::API_ADDRESS;
use crate::database;
use crate::middleware::{ApiResult, Results};
use crate::models::{FixedCost, FixedIncome};

const FIXED_COST_COLUMNS: &str = "id, category, description, \
    monthly_interval::double precision AS monthly_interval, \
    billed_cost::double precision AS billed_cost, \
    monthly_cost::double precision AS monthly_cost, \
    effective_date, expiration_date";

const FIXED_INCOME_COLUMNS: &str = "id, description, income_type, \
    monthly_interval::double precision AS monthly_interval, \
    value::double precision AS value, \
    effective_date, expiration_date";

/// GET /api/fiscalia/fixed_costs
pub async fn all_fixed_costs() -> ApiResult<Vec<FixedCost>> {
    info!("received GET to {}/fixed_costs", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, FixedCost>(&format!(
        "SELECT {} FROM fixed_costs ORDER BY id",
        FIXED_COST_COLUMNS
    ))
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/fixed_costs/:id
pub async fn fixed_cost_by_id(Path(id): Path<i32>) -> ApiResult<Vec<FixedCost>> {
    info!("received GET to {}/fixed_costs/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, FixedCost>(&format!(
        "SELECT {} FROM fixed_costs WHERE id = $1",
        FIXED_COST_COLUMNS
    ))
    .bind(id)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/fixed_costs/valid/:date - costs in effect at a date
pub async fn fixed_costs_by_effective_date(Path(date): Path<NaiveDate>) -> ApiResult<Vec<FixedCost>> {
    info!("received GET to {}/fixed_costs/valid/{}", API_ADDRESS, date);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, FixedCost>(&format!(
        "SELECT {} FROM fixed_costs WHERE $1 BETWEEN effective_date AND expiration_date",
        FIXED_COST_COLUMNS
    ))
    .bind(date)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/fixed_income
pub async fn all_fixed_income() -> ApiResult<Vec<FixedIncome>> {
    info!("received GET to {}/fixed_income", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, FixedIncome>(&format!(
        "SELECT {} FROM fixed_income ORDER BY id",
        FIXED_INCOME_COLUMNS
    ))
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/fixed_income/valid/:date - income in effect at a date
pub async fn fixed_income_by_effective_date(
    Path(date): Path<NaiveDate>,
) -> ApiResult<Vec<FixedIncome>> {
    info!("received GET to {}/fixed_income/valid/{}", API_ADDRESS, date);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, FixedIncome>(&format!(
        "SELECT {} FROM fixed_income WHERE $1 BETWEEN effective_date AND expiration_date",
        FIXED_INCOME_COLUMNS
    ))
    .bind(date)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}
