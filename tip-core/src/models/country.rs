use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A country with its customary tip and the time zone used to auto-select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub tip_percentage: Decimal,
    pub time_zone: String,
}

/// Read-only list of countries offered by the country picker.
///
/// Order is preserved; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTable {
    countries: Vec<Country>,
}

impl CountryTable {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    /// Country with exactly this name.
    pub fn find(
        &self,
        name: &str,
    ) -> Option<&Country> {
        self.countries.iter().find(|c| c.name == name)
    }

    /// First country in the given IANA time zone (e.g. `Europe/Paris`).
    pub fn find_by_time_zone(
        &self,
        time_zone: &str,
    ) -> Option<&Country> {
        self.countries.iter().find(|c| c.time_zone == time_zone)
    }

    /// Countries whose name contains `query`, ignoring case.
    /// An empty query matches every country.
    pub fn search(
        &self,
        query: &str,
    ) -> Vec<&Country> {
        let needle = query.trim().to_lowercase();
        self.countries
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl From<Vec<Country>> for CountryTable {
    fn from(countries: Vec<Country>) -> Self {
        Self::new(countries)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn table() -> CountryTable {
        CountryTable::new(vec![
            Country {
                name: "France".to_string(),
                tip_percentage: dec!(0),
                time_zone: "Europe/Paris".to_string(),
            },
            Country {
                name: "United States".to_string(),
                tip_percentage: dec!(18),
                time_zone: "America/New_York".to_string(),
            },
            Country {
                name: "United Kingdom".to_string(),
                tip_percentage: dec!(12.5),
                time_zone: "Europe/London".to_string(),
            },
        ])
    }

    #[test]
    fn find_matches_exact_name_only() {
        let table = table();

        assert_eq!(table.find("France").map(|c| c.tip_percentage), Some(dec!(0)));
        assert!(table.find("france").is_none());
    }

    #[test]
    fn find_by_time_zone_returns_first_match() {
        let table = table();

        let country = table.find_by_time_zone("Europe/London");

        assert_eq!(country.map(|c| c.name.as_str()), Some("United Kingdom"));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let table = table();

        let names: Vec<_> = table
            .search("UNITED")
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();

        assert_eq!(names, vec!["United States", "United Kingdom"]);
    }

    #[test]
    fn search_with_empty_query_returns_everything() {
        let table = table();

        assert_eq!(table.search("").len(), 3);
        assert!(table.search("Atlantis").is_empty());
    }
}
