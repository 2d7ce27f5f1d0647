//! Typed row models for the read catalog.
//!
//! Money and other numeric columns are cast to `double precision` in the
//! queries so every amount deserializes as `f64` on the wire, matching
//! what the frontend charts expect.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub description: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Store {
    pub id: i32,
    pub description: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Sensitivity {
    pub id: i32,
    pub description: String,
}

/// One row of the purchase-to-sensitivity bridge table.
#[derive(Debug, Serialize, FromRow)]
pub struct PurchaseSensitivity {
    pub id: i32,
    pub variable_expense_id: i32,
    pub sensitivity_id: i32,
}

/// Joined variable expense with resolved category/store descriptions and
/// an aggregated indulgence list.
#[derive(Debug, Serialize, FromRow)]
pub struct VariableExpenseOverview {
    pub id: i32,
    pub description: String,
    pub category: String,
    pub store: String,
    pub cost: f64,
    pub purchasing_date: NaiveDate,
    pub is_planned: bool,
    pub contains_indulgence: bool,
    pub indulgences: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct VariableExpense {
    pub id: i32,
    pub description: String,
    pub category_id: i32,
    pub store_id: i32,
    pub cost: f64,
    pub purchasing_date: NaiveDate,
    pub is_planned: bool,
    pub contains_indulgence: bool,
}

#[derive(Debug, Serialize, FromRow)]
pub struct FixedCost {
    pub id: i32,
    pub category: String,
    pub description: String,
    pub monthly_interval: f64,
    pub billed_cost: f64,
    pub monthly_cost: f64,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
}

#[derive(Debug, Serialize, FromRow)]
pub struct FixedIncome {
    pub id: i32,
    pub description: String,
    #[serde(rename = "type")]
    pub income_type: String,
    pub monthly_interval: f64,
    pub value: f64,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
}

/// Investment joined with its (optional) tax row.
#[derive(Debug, Serialize, FromRow)]
pub struct InvestmentOverview {
    pub id: i32,
    pub execution_type: String,
    pub description: String,
    pub isin: String,
    pub investment_type: String,
    pub marketplace: String,
    pub units: f64,
    pub price_per_unit: f64,
    pub total_price: f64,
    pub fees: f64,
    pub execution_date: NaiveDate,
    pub pct_of_profit_taxed: Option<f64>,
    pub profit_amt: Option<f64>,
    pub tax_rate: Option<f64>,
    pub tax_paid: Option<f64>,
    pub tax_year: Option<i32>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Investment {
    pub id: i32,
    pub execution_type: String,
    pub description: String,
    pub isin: String,
    pub investment_type: String,
    pub marketplace: String,
    pub units: f64,
    pub price_per_unit: f64,
    pub total_price: f64,
    pub fees: f64,
    pub execution_date: NaiveDate,
}

/// Row of the `v_investment_dividends` view.
#[derive(Debug, Serialize, FromRow)]
pub struct Dividend {
    pub id: i32,
    pub isin: String,
    pub description: String,
    pub dividend_date: NaiveDate,
    pub units: f64,
    pub dividend_amount: f64,
}

/// Row of the `v_food_price_overview` view.
#[derive(Debug, Serialize, FromRow)]
pub struct FoodPriceOverview {
    pub id: i32,
    pub food_item: String,
    pub brand: String,
    pub store: String,
    pub main_macro: String,
    pub kcal_amount: i32,
    pub weight: i32,
    pub price: f64,
    pub last_update: NaiveDate,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub weight_per_100_kcal: f64,
    pub price_per_kg: f64,
    pub normalized_price: f64,
    pub filepath: Option<String>,
}

/// Food item currently on discount, with the discount window details.
#[derive(Debug, Serialize, FromRow)]
pub struct DiscountedFood {
    pub id: i32,
    pub food_item: String,
    pub brand: String,
    pub store: String,
    pub price: f64,
    pub discount_price: f64,
    pub reduced_by_amount: f64,
    pub reduced_by_pct: f64,
    pub discount_start_date: NaiveDate,
    pub discount_end_date: NaiveDate,
    pub starts_in_days: i32,
    pub ends_in_days: i32,
    pub discount_days_duration: i32,
    pub normalized_price: f64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserSetting {
    pub setting_key: String,
    pub setting_value: String,
    pub setting_description: Option<String>,
}
