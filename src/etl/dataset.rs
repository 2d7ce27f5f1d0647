use serde::Serialize;

/// The five units of transformable data the remote ETL produces.
///
/// Artifact locations (presigned URLs) are mapped onto a dataset by
/// substring containment of the dataset name. Declaration order is the
/// match precedence, so a pathological filename containing two names
/// resolves to the first one listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    VariableExpenses,
    FixedCosts,
    Income,
    FoodItems,
    Investments,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::VariableExpenses,
        Dataset::FixedCosts,
        Dataset::Income,
        Dataset::FoodItems,
        Dataset::Investments,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dataset::VariableExpenses => "variable_expenses",
            Dataset::FixedCosts => "fixed_costs",
            Dataset::Income => "income",
            Dataset::FoodItems => "food_items",
            Dataset::Investments => "investments",
        }
    }

    /// Path of the local TSV-to-SQL conversion endpoint for this dataset,
    /// relative to the API base.
    pub fn texttsv_path(self) -> String {
        format!("/texttsv/{}", self.name())
    }

    /// Resolve an artifact location to a dataset by substring match.
    pub fn match_location(location: &str) -> Option<Dataset> {
        Self::ALL.iter().copied().find(|d| location.contains(d.name()))
    }

    /// Parse a dataset name as used in the texttsv route segment.
    pub fn from_name(name: &str) -> Option<Dataset> {
        Self::ALL.iter().copied().find(|d| d.name() == name)
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_presigned_url_by_substring() {
        let url = "https://bucket.s3.amazonaws.com/transformed/2026-02-19_fixed_costs.tsv?X-Amz-Expires=300";
        assert_eq!(Dataset::match_location(url), Some(Dataset::FixedCosts));
    }

    #[test]
    fn unknown_location_matches_nothing() {
        assert_eq!(Dataset::match_location("https://bucket/foo_data.tsv"), None);
    }

    #[test]
    fn every_dataset_round_trips_through_its_name() {
        for dataset in Dataset::ALL {
            assert_eq!(Dataset::from_name(dataset.name()), Some(dataset));
        }
    }

    #[test]
    fn texttsv_paths_are_per_dataset() {
        assert_eq!(Dataset::FoodItems.texttsv_path(), "/texttsv/food_items");
    }
}
