use axum::extract::Path;
use tracing::info;

use crate::config::API_ADDRESS;
use crate::database;
use crate::middleware::{ApiResult, Results};
use crate::models::{Dividend, Investment, InvestmentOverview};

const INVESTMENT_COLUMNS: &str = "inv.id, inv.execution_type, inv.description, inv.isin, \
    inv.investment_type, inv.marketplace, \
    inv.units::double precision AS units, \
    inv.price_per_unit::double precision AS price_per_unit, \
    inv.total_price::double precision AS total_price, \
    inv.fees::double precision AS fees, \
    inv.execution_date";

/// GET /api/fiscalia/investments - investments joined with their tax rows
pub async fn all_investments() -> ApiResult<Vec<InvestmentOverview>> {
    info!("received GET to {}/investments", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, InvestmentOverview>(&format!(
        "SELECT {}, \
           tax.pct_of_profit_taxed::double precision AS pct_of_profit_taxed, \
           tax.profit_amt::double precision AS profit_amt, \
           tax.tax_rate::double precision AS tax_rate, \
           tax.tax_paid::double precision AS tax_paid, \
           tax.tax_year \
         FROM investments inv \
         LEFT OUTER JOIN investment_taxes tax ON inv.id = tax.investment_id \
         ORDER BY inv.execution_date",
        INVESTMENT_COLUMNS
    ))
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/investments/:id
pub async fn investment_by_id(Path(id): Path<i32>) -> ApiResult<Vec<Investment>> {
    info!("received GET to {}/investments/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, Investment>(&format!(
        "SELECT {} FROM investments inv WHERE inv.id = $1",
        INVESTMENT_COLUMNS
    ))
    .bind(id)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/investment_dividends
pub async fn all_dividends() -> ApiResult<Vec<Dividend>> {
    info!("received GET to {}/investment_dividends", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, Dividend>(
        "SELECT id, isin, description, dividend_date, \
           units::double precision AS units, \
           dividend_amount::double precision AS dividend_amount \
         FROM v_investment_dividends ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/investment_dividends/:id
pub async fn dividend_by_id(Path(id): Path<i32>) -> ApiResult<Vec<Dividend>> {
    info!("received GET to {}/investment_dividends/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, Dividend>(
        "SELECT id, isin, description, dividend_date, \
           units::double precision AS units, \
           dividend_amount::double precision AS dividend_amount \
         FROM investment_dividends WHERE id = $1",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}
