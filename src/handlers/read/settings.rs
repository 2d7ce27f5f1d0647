use axum::extract::Path;
use tracing::info;

use crate::config::API_ADDRESS;
use crate::database;
use crate::middleware::{ApiResult, Results};
use crate::models::UserSetting;

/// GET /api/fiscalia/um/settings/:username
pub async fn user_settings(Path(username): Path<String>) -> ApiResult<Vec<UserSetting>> {
    info!("received GET to {}/um/settings/{}", API_ADDRESS, username);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, UserSetting>(
        "SELECT setting_key, setting_value, setting_description \
         FROM public.um_user_settings \
         WHERE user_id = (SELECT id FROM public.um_users WHERE username = $1)",
    )
    .bind(username)
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}
