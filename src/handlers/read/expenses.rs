use axum::extract::Path;
use tracing::info;

use crate::config::API_ADDRESS;
use crate::database;
use crate::middleware::{ApiResult, Results};
use crate::models::{VariableExpense, VariableExpenseOverview};

/// GET /api/fiscalia/variable_expenses
///
/// Joined overview with resolved category/store names and the aggregated
/// indulgence list for flagged purchases.
pub async fn all_variable_expenses() -> ApiResult<Vec<VariableExpenseOverview>> {
    info!("received GET to {}/variable_expenses", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, VariableExpenseOverview>(
        "SELECT \
           exp.id, exp.description, category.description AS category, store.description AS store, \
           exp.cost::double precision AS cost, exp.purchasing_date, exp.is_planned, exp.contains_indulgence, \
           CASE WHEN exp.contains_indulgence IS TRUE \
             THEN STRING_AGG(sens.description, ', ') \
             ELSE NULL \
           END AS indulgences \
         FROM variable_expenses exp \
         JOIN category category ON category.id = exp.category_id \
         JOIN store store ON store.id = exp.store_id \
         LEFT OUTER JOIN bridge_var_exp_sensitivity exp_sens ON exp_sens.variable_expense_id = exp.id \
         LEFT OUTER JOIN sensitivity sens ON exp_sens.sensitivity_id = sens.id \
         GROUP BY exp.id, exp.description, category.description, store.description, \
                  exp.cost, exp.purchasing_date, exp.is_planned, exp.contains_indulgence \
         ORDER BY exp.purchasing_date DESC",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/variable_expenses/:id
pub async fn variable_expense_by_id(Path(id): Path<i32>) -> ApiResult<Vec<VariableExpense>> {
    info!("received GET to {}/variable_expenses/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, VariableExpense>(
        "SELECT id, description, category_id, store_id, cost::double precision AS cost, \
                purchasing_date, is_planned, contains_indulgence \
         FROM variable_expenses WHERE id = $1",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/variable_expenses/category/:category
pub async fn variable_expenses_by_category(
    Path(category): Path<String>,
) -> ApiResult<Vec<VariableExpenseOverview>> {
    info!("received GET to {}/variable_expenses/category/{}", API_ADDRESS, category);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, VariableExpenseOverview>(
        "SELECT \
           exp.id, exp.description, category.description AS category, store.description AS store, \
           exp.cost::double precision AS cost, exp.purchasing_date, exp.is_planned, exp.contains_indulgence, \
           NULL::text AS indulgences \
         FROM variable_expenses exp \
         JOIN category category ON category.id = exp.category_id AND category.description = $1 \
         JOIN store store ON store.id = exp.store_id \
         ORDER BY exp.purchasing_date DESC",
    )
    .bind(category)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}
