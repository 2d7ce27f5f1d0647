use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use fiscalia_api::config::{self, API_ADDRESS};
use fiscalia_api::handlers::{etl, read, system, texttsv};
use fiscalia_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    system::mark_started();

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.backend_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    info!("fiscalia-api listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(system::root))
        .nest(API_ADDRESS, unauthenticated_routes().merge(protected_routes()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn unauthenticated_routes() -> Router {
    Router::new()
        .route("/hc", get(system::health_check))
        .route("/db_hc", get(system::database_health_check))
        .route("/ip", get(system::ip_address))
}

fn protected_routes() -> Router {
    Router::new()
        // Catalog tables
        .route("/category", get(read::catalog::all_categories))
        .route("/category/:id", get(read::catalog::category_by_id))
        .route("/store", get(read::catalog::all_stores))
        .route("/store/:id", get(read::catalog::store_by_id))
        .route("/sensitivity", get(read::catalog::all_sensitivities))
        .route("/sensitivity/:id", get(read::catalog::sensitivity_by_id))
        .route(
            "/sensitivities_of_purchase",
            get(read::catalog::all_purchase_sensitivities),
        )
        .route(
            "/sensitivities_of_purchase/sensitivity/:id",
            get(read::catalog::purchase_sensitivities_by_sensitivity),
        )
        .route(
            "/sensitivities_of_purchase/var_expense/:id",
            get(read::catalog::purchase_sensitivities_by_expense),
        )
        // Expenses
        .route("/variable_expenses", get(read::expenses::all_variable_expenses))
        .route("/variable_expenses/:id", get(read::expenses::variable_expense_by_id))
        .route(
            "/variable_expenses/category/:category",
            get(read::expenses::variable_expenses_by_category),
        )
        // Fixed costs and income
        .route("/fixed_costs", get(read::fixed::all_fixed_costs))
        .route("/fixed_costs/:id", get(read::fixed::fixed_cost_by_id))
        .route("/fixed_costs/valid/:date", get(read::fixed::fixed_costs_by_effective_date))
        .route("/fixed_income", get(read::fixed::all_fixed_income))
        .route("/fixed_income/valid/:date", get(read::fixed::fixed_income_by_effective_date))
        // Investments
        .route("/investments", get(read::investments::all_investments))
        .route("/investments/:id", get(read::investments::investment_by_id))
        .route("/investment_dividends", get(read::investments::all_dividends))
        .route("/investment_dividends/:id", get(read::investments::dividend_by_id))
        // Food prices
        .route("/food_prices_and_discounts", get(read::food::all_food_prices))
        .route("/discounted_foods_current", get(read::food::currently_discounted_foods))
        // User settings
        .route("/um/settings/:username", get(read::settings::user_settings))
        // TSV to SQL conversion (consumed by the ETL transform proxy)
        .route("/texttsv/:dataset", post(texttsv::generate_sql))
        // ETL trigger, streaming progress over SSE
        .route("/admin/raw_data_etl", get(etl::raw_data_etl))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}
