use tracing::info;

use crate::config::API_ADDRESS;
use crate::database;
use crate::middleware::{ApiResult, Results};
use crate::models::{DiscountedFood, FoodPriceOverview};

/// GET /api/fiscalia/food_prices_and_discounts - currently valid food prices
pub async fn all_food_prices() -> ApiResult<Vec<FoodPriceOverview>> {
    info!("received GET to {}/food_prices_and_discounts", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, FoodPriceOverview>(
        "SELECT DISTINCT \
           id, food_item, brand, store, main_macro, kcal_amount, weight, \
           price::double precision AS price, \
           last_update, effective_date, expiration_date, \
           weight_per_100_kcal::double precision AS weight_per_100_kcal, \
           price_per_kg::double precision AS price_per_kg, \
           normalized_price::double precision AS normalized_price, \
           filepath \
         FROM v_food_price_overview \
         WHERE current_date BETWEEN effective_date AND expiration_date \
         ORDER BY store, normalized_price",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}

/// GET /api/fiscalia/discounted_foods_current - discounts still running
pub async fn currently_discounted_foods() -> ApiResult<Vec<DiscountedFood>> {
    info!("received GET to {}/discounted_foods_current", API_ADDRESS);
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, DiscountedFood>(
        "SELECT \
           id, food_item, brand, store, \
           price::double precision AS price, \
           discount_price::double precision AS discount_price, \
           reduced_by_amount::double precision AS reduced_by_amount, \
           reduced_by_pct::double precision AS reduced_by_pct, \
           discount_start_date, discount_end_date, \
           starts_in_days, ends_in_days, discount_days_duration, \
           normalized_price::double precision AS normalized_price \
         FROM v_food_price_overview \
         WHERE discount_price IS NOT NULL AND discount_end_date >= current_date \
         ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Results(rows))
}
