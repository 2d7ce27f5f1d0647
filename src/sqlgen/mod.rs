//! TSV-to-SQL statement generation.
//!
//! Each dataset has a fixed tab-separated column layout produced by the
//! remote transform. The generator validates the header row, then emits
//! one INSERT statement per data row. Values are emitted as quoted
//! literals (Postgres coerces them to the column types); empty cells
//! become NULL.

use thiserror::Error;

use crate::etl::dataset::Dataset;

#[derive(Debug, Error)]
pub enum SqlGenError {
    #[error("TSV payload is empty")]
    Empty,

    #[error("TSV header mismatch: expected {expected:?}, got {got:?}")]
    HeaderMismatch { expected: Vec<String>, got: Vec<String> },

    #[error("TSV row {row} is malformed: {message}")]
    BadRow { row: usize, message: String },

    #[error("TSV payload contains no data rows")]
    NoRows,
}

/// Target table and column layout for one dataset's TSV.
fn layout(dataset: Dataset) -> (&'static str, &'static [&'static str]) {
    match dataset {
        Dataset::VariableExpenses => (
            "staging_variable_bills",
            &[
                "description",
                "category",
                "store",
                "cost",
                "purchasing_date",
                "is_planned",
                "contains_indulgence",
                "sensitivities",
            ],
        ),
        Dataset::FixedCosts => (
            "fixed_costs",
            &[
                "category",
                "description",
                "monthly_interval",
                "billed_cost",
                "monthly_cost",
                "effective_date",
                "expiration_date",
            ],
        ),
        Dataset::Income => (
            "fixed_income",
            &[
                "description",
                "income_type",
                "monthly_interval",
                "value",
                "effective_date",
                "expiration_date",
            ],
        ),
        Dataset::FoodItems => (
            "food_price",
            &[
                "food_item",
                "brand",
                "store",
                "main_macro",
                "kcal_amount",
                "weight",
                "price",
                "last_update",
                "effective_date",
                "expiration_date",
            ],
        ),
        Dataset::Investments => (
            "investments",
            &[
                "execution_type",
                "description",
                "isin",
                "investment_type",
                "marketplace",
                "units",
                "price_per_unit",
                "total_price",
                "fees",
                "execution_date",
            ],
        ),
    }
}

/// Quote one cell as a SQL literal; empty cells become NULL.
fn literal(cell: &str) -> String {
    if cell.is_empty() {
        "NULL".to_string()
    } else {
        format!("'{}'", cell.replace('\'', "''"))
    }
}

/// Generate the INSERT batch for one dataset from raw TSV text.
pub fn generate(dataset: Dataset, tsv: &str) -> Result<String, SqlGenError> {
    if tsv.trim().is_empty() {
        return Err(SqlGenError::Empty);
    }

    let (table, columns) = layout(dataset);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(tsv.as_bytes());

    let got: Vec<String> = reader
        .headers()
        .map_err(|e| SqlGenError::BadRow { row: 0, message: e.to_string() })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if got.iter().map(String::as_str).collect::<Vec<_>>() != columns {
        return Err(SqlGenError::HeaderMismatch {
            expected: columns.iter().map(|c| c.to_string()).collect(),
            got,
        });
    }

    let mut statements = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| SqlGenError::BadRow {
            row: index + 1,
            message: e.to_string(),
        })?;

        let values: Vec<String> = record.iter().map(|cell| literal(cell.trim())).collect();
        statements.push(format!(
            "INSERT INTO {} ({}) VALUES ({});",
            table,
            columns.join(", "),
            values.join(", ")
        ));
    }

    if statements.is_empty() {
        return Err(SqlGenError::NoRows);
    }

    Ok(statements.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_one_insert_per_row() {
        let tsv = "category\tdescription\tmonthly_interval\tbilled_cost\tmonthly_cost\teffective_date\texpiration_date\n\
                   LIVING\tRent\t1\t700\t700\t2026-01-01\t4000-01-01\n\
                   LEISURE\tGym\t1\t35\t35\t2026-01-01\t4000-01-01\n";
        let sql = generate(Dataset::FixedCosts, tsv).unwrap();
        let lines: Vec<&str> = sql.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("INSERT INTO fixed_costs (category, description,"));
        assert!(lines[0].contains("'Rent'"));
        assert!(lines[1].contains("'Gym'"));
    }

    #[test]
    fn escapes_single_quotes() {
        let tsv = "description\tincome_type\tmonthly_interval\tvalue\teffective_date\texpiration_date\n\
                   Jim's salary\tnet salary\t1\t2400\t2026-01-01\t4000-01-01\n";
        let sql = generate(Dataset::Income, tsv).unwrap();
        assert!(sql.contains("'Jim''s salary'"));
    }

    #[test]
    fn empty_cells_become_null() {
        let tsv = "description\tcategory\tstore\tcost\tpurchasing_date\tis_planned\tcontains_indulgence\tsensitivities\n\
                   Groceries\tFood\tAldi\t12.49\t2026-02-19\tfalse\tfalse\t\n";
        let sql = generate(Dataset::VariableExpenses, tsv).unwrap();
        assert!(sql.ends_with("NULL);"));
        assert!(sql.contains("staging_variable_bills"));
    }

    #[test]
    fn rejects_wrong_header() {
        let tsv = "foo\tbar\n1\t2\n";
        assert!(matches!(
            generate(Dataset::Investments, tsv),
            Err(SqlGenError::HeaderMismatch { .. })
        ));
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(matches!(generate(Dataset::FoodItems, "  \n"), Err(SqlGenError::Empty)));
    }

    #[test]
    fn rejects_header_only_payload() {
        let tsv = "execution_type\tdescription\tisin\tinvestment_type\tmarketplace\tunits\tprice_per_unit\ttotal_price\tfees\texecution_date\n";
        assert!(matches!(generate(Dataset::Investments, tsv), Err(SqlGenError::NoRows)));
    }
}
