use axum::extract::Path;
use tracing::info;

use crate::config::API_ADDRESS;
use crate::database;
use crate::middleware::{ApiResult, Results};
use crate::models::{Category, PurchaseSensitivity, Sensitivity, Store};

/// GET /api/fiscalia/category
pub async fn all_categories() -> ApiResult<Vec<Category>> {
    info!("received GET to {}/category", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, Category>("SELECT id, description FROM category ORDER BY id")
        .fetch_all(&pool)
        .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/category/:id
pub async fn category_by_id(Path(id): Path<i32>) -> ApiResult<Vec<Category>> {
    info!("received GET to {}/category/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, Category>("SELECT id, description FROM category WHERE id = $1")
        .bind(id)
        .fetch_all(&pool)
        .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/store
pub async fn all_stores() -> ApiResult<Vec<Store>> {
    info!("received GET to {}/store", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, Store>("SELECT id, description FROM store ORDER BY id")
        .fetch_all(&pool)
        .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/store/:id
pub async fn store_by_id(Path(id): Path<i32>) -> ApiResult<Vec<Store>> {
    info!("received GET to {}/store/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, Store>("SELECT id, description FROM store WHERE id = $1")
        .bind(id)
        .fetch_all(&pool)
        .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/sensitivity
pub async fn all_sensitivities() -> ApiResult<Vec<Sensitivity>> {
    info!("received GET to {}/sensitivity", API_ADDRESS);
    let pool = database::pool().await?;
    let rows =
        sqlx::query_as::<_, Sensitivity>("SELECT id, description FROM sensitivity ORDER BY id")
            .fetch_all(&pool)
            .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/sensitivity/:id
pub async fn sensitivity_by_id(Path(id): Path<i32>) -> ApiResult<Vec<Sensitivity>> {
    info!("received GET to {}/sensitivity/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows =
        sqlx::query_as::<_, Sensitivity>("SELECT id, description FROM sensitivity WHERE id = $1")
            .bind(id)
            .fetch_all(&pool)
            .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/sensitivities_of_purchase
pub async fn all_purchase_sensitivities() -> ApiResult<Vec<PurchaseSensitivity>> {
    info!("received GET to {}/sensitivities_of_purchase", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, PurchaseSensitivity>(
        "SELECT id, variable_expense_id, sensitivity_id FROM bridge_var_exp_sensitivity ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/sensitivities_of_purchase/sensitivity/:id
pub async fn purchase_sensitivities_by_sensitivity(
    Path(id): Path<i32>,
) -> ApiResult<Vec<PurchaseSensitivity>> {
    info!("received GET to {}/sensitivities_of_purchase/sensitivity/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, PurchaseSensitivity>(
        "SELECT id, variable_expense_id, sensitivity_id FROM bridge_var_exp_sensitivity \
         WHERE sensitivity_id = $1",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/sensitivities_of_purchase/var_expense/:id
pub async fn purchase_sensitivities_by_expense(
    Path(id): Path<i32>,
) -> ApiResult<Vec<PurchaseSensitivity>> {
    info!("received GET to {}/sensitivities_of_purchase/var_expense/{}", API_ADDRESS, id);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, PurchaseSensitivity>(
        "SELECT id, variable_expense_id, sensitivity_id FROM bridge_var_exp_sensitivity \
         WHERE variable_expense_id = $1",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}
