// src/dataset/mod.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed description emitted at the top of the dataset.
pub const DATASET_DESCRIPTION: &str = "This dataset contains information about all Government Secondary Schools in Uganda, organized by district. The data includes school names and their corresponding EMIS (Education Management Information System) codes, which are unique identifiers for educational institutions in Uganda.";

/// A single school entry within a district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    /// School name, never empty
    pub name: String,
    /// EMIS code; empty string when the source row carries no code
    pub emis: String,
}

/// Root of the serialized dataset: `{ "uganda": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub uganda: CountryListing,
}

/// The per-country listing. Districts are held in a BTreeMap so the
/// serialized output is always sorted alphabetically by district name;
/// schools within a district keep source document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryListing {
    pub description: String,
    /// District count, serialized as a string to match the published schema
    pub total_districts: String,
    pub districts: BTreeMap<String, Vec<School>>,
}

impl Dataset {
    /// Builds the dataset wrapper around an extracted district map.
    pub fn new(districts: BTreeMap<String, Vec<School>>) -> Self {
        Self {
            uganda: CountryListing {
                description: DATASET_DESCRIPTION.to_string(),
                total_districts: districts.len().to_string(),
                districts,
            },
        }
    }

    pub fn total_districts(&self) -> usize {
        self.uganda.districts.len()
    }

    /// Total school count across all districts.
    pub fn total_schools(&self) -> usize {
        self.uganda.districts.values().map(Vec::len).sum()
    }

    /// District names in output (alphabetical) order.
    pub fn district_names(&self) -> impl Iterator<Item = &str> {
        self.uganda.districts.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_districts() -> BTreeMap<String, Vec<School>> {
        let mut districts = BTreeMap::new();
        districts.insert(
            "WAKISO".to_string(),
            vec![School {
                name: "Naalya SS".to_string(),
                emis: "700123".to_string(),
            }],
        );
        districts.insert(
            "KAMPALA".to_string(),
            vec![
                School {
                    name: "Kololo SS".to_string(),
                    emis: "123456".to_string(),
                },
                School {
                    name: "Old Kampala SS".to_string(),
                    emis: String::new(),
                },
            ],
        );
        districts
    }

    #[test]
    fn total_districts_is_serialized_as_string() {
        let dataset = Dataset::new(sample_districts());
        let value = serde_json::to_value(&dataset).unwrap();

        assert_eq!(value["uganda"]["total_districts"], "2");
        assert_eq!(
            value["uganda"]["description"],
            DATASET_DESCRIPTION,
        );
    }

    #[test]
    fn districts_serialize_in_alphabetical_order() {
        let dataset = Dataset::new(sample_districts());
        let json = serde_json::to_string(&dataset).unwrap();

        let kampala = json.find("KAMPALA").unwrap();
        let wakiso = json.find("WAKISO").unwrap();
        assert!(kampala < wakiso, "districts must be sorted alphabetically");
    }

    #[test]
    fn school_order_within_district_is_preserved() {
        let dataset = Dataset::new(sample_districts());
        let schools = &dataset.uganda.districts["KAMPALA"];

        assert_eq!(schools[0].name, "Kololo SS");
        assert_eq!(schools[0].emis, "123456");
        assert_eq!(schools[1].name, "Old Kampala SS");
        assert_eq!(schools[1].emis, "");
    }

    #[test]
    fn total_schools_matches_sum_of_district_lengths() {
        let dataset = Dataset::new(sample_districts());
        let by_hand: usize = dataset.uganda.districts.values().map(Vec::len).sum();

        assert_eq!(dataset.total_schools(), 3);
        assert_eq!(dataset.total_schools(), by_hand);
    }
}
