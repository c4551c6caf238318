use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::trace;

use crate::domain::FilterField;
use crate::record::{CompanyRecord, InterestLevel};
use crate::table::{Table, TableView};

pub const ALL_OPTION: &str = "All";

/// Equality filters on country, sector and interest level. `None` lets every row pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub country: Option<String>,
    pub sector: Option<String>,
    pub interest: Option<InterestLevel>,
}

impl Filters {
    pub fn matches(&self, record: &CompanyRecord) -> bool {
        self.country.as_ref().is_none_or(|c| record.country == *c)
            && self.sector.as_ref().is_none_or(|s| record.sector == *s)
            && self
                .interest
                .is_none_or(|level| record.interest_level == level.label())
    }

    pub fn is_active(&self) -> bool {
        self.country.is_some() || self.sector.is_some() || self.interest.is_some()
    }

    /// Rows of the table passing every active filter, in table order.
    pub fn apply(&self, table: &Table) -> TableView {
        let rows: Vec<usize> = table
            .records()
            .par_iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .map(|(idx, _)| idx)
            .collect();
        trace!("Filter {:?} kept {}/{} rows", self, rows.len(), table.len());
        TableView::new(rows)
    }

    pub fn selected(&self, field: FilterField) -> String {
        let value = match field {
            FilterField::Country => self.country.clone(),
            FilterField::Sector => self.sector.clone(),
            FilterField::Interest => self.interest.map(|l| l.label().to_string()),
        };
        value.unwrap_or_else(|| ALL_OPTION.to_string())
    }

    /// Moves the selection of one filter through its option list, wrapping around.
    pub fn step(&mut self, field: FilterField, table: &Table, forward: bool) {
        let options = options(table, field);
        let current = self.selected(field);
        let pos = options.iter().position(|o| *o == current).unwrap_or(0);
        let next = if forward {
            (pos + 1) % options.len()
        } else {
            (pos + options.len() - 1) % options.len()
        };
        self.select(field, &options[next]);
    }

    /// Selects an option by its text. `All` clears the filter.
    pub fn select(&mut self, field: FilterField, option: &str) {
        let value = (option != ALL_OPTION).then(|| option.to_string());
        match field {
            FilterField::Country => self.country = value,
            FilterField::Sector => self.sector = value,
            FilterField::Interest => {
                self.interest = value.as_deref().and_then(InterestLevel::from_label)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Options offered for a filter: `All` followed by the sorted distinct
/// non-blank values. Interest always offers the three levels.
pub fn options(table: &Table, field: FilterField) -> Vec<String> {
    let mut options = vec![ALL_OPTION.to_string()];
    match field {
        FilterField::Interest => {
            options.extend(InterestLevel::ALL.iter().map(|l| l.label().to_string()))
        }
        FilterField::Country | FilterField::Sector => {
            let values: BTreeSet<&str> = table
                .records()
                .iter()
                .map(|r| match field {
                    FilterField::Country => r.country.as_str(),
                    _ => r.sector.as_str(),
                })
                .filter(|v| !v.trim().is_empty())
                .collect();
            options.extend(values.into_iter().map(String::from));
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, country: &str, sector: &str, interest: &str) -> CompanyRecord {
        CompanyRecord {
            name: name.into(),
            country: country.into(),
            sector: sector.into(),
            interest_level: interest.into(),
            contact_date: "2024-01-01".into(),
        }
    }

    fn table() -> Table {
        Table::new(vec![
            record("a", "Spain", "Energy", "High"),
            record("b", "France", "Food", "Low"),
            record("c", "Spain", "Food", "Low"),
            record("d", "", "Energy", "High"),
            record("e", "Spain", "", "Medium"),
        ])
    }

    #[test]
    fn no_filter_passes_everything() {
        let table = table();
        let view = Filters::default().apply(&table);
        assert_eq!(view.rows(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn country_filter_keeps_exact_matches() {
        let table = table();
        let mut filters = Filters::default();
        filters.select(FilterField::Country, "Spain");
        let view = filters.apply(&table);
        assert_eq!(view.rows(), &[0, 2, 4]);
        assert!(view.records(&table).all(|r| r.country == "Spain"));

        filters.select(FilterField::Country, "spain");
        assert!(filters.apply(&table).is_empty());
    }

    #[test]
    fn combined_filters_intersect() {
        let table = table();
        let mut by_country = Filters::default();
        by_country.select(FilterField::Country, "Spain");
        let mut by_interest = Filters::default();
        by_interest.select(FilterField::Interest, "Low");

        let mut both = by_country.clone();
        both.select(FilterField::Interest, "Low");

        let expected: Vec<usize> = by_country
            .apply(&table)
            .rows()
            .iter()
            .copied()
            .filter(|r| by_interest.apply(&table).rows().contains(r))
            .collect();
        assert_eq!(both.apply(&table).rows(), expected.as_slice());
        assert_eq!(expected, vec![2]);
    }

    #[test]
    fn options_skip_blanks_but_rows_stay() {
        let table = table();
        assert_eq!(options(&table, FilterField::Country), vec!["All", "France", "Spain"]);
        assert_eq!(options(&table, FilterField::Sector), vec!["All", "Energy", "Food"]);
        assert_eq!(
            options(&table, FilterField::Interest),
            vec!["All", "High", "Medium", "Low"]
        );
        assert_eq!(Filters::default().apply(&table).len(), 5);
    }

    #[test]
    fn stepping_wraps_around() {
        let table = table();
        let mut filters = Filters::default();
        filters.step(FilterField::Country, &table, true);
        assert_eq!(filters.selected(FilterField::Country), "France");
        filters.step(FilterField::Country, &table, true);
        filters.step(FilterField::Country, &table, true);
        assert_eq!(filters.country, None);
        filters.step(FilterField::Interest, &table, false);
        assert_eq!(filters.interest, Some(InterestLevel::Low));
        assert!(filters.is_active());
        filters.reset();
        assert!(!filters.is_active());
    }
}
