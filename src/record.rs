/// Header row of the persisted and exported spreadsheets, in column order.
pub const COLUMNS: [&str; 5] = ["Name", "Country", "Sector", "Interest Level", "Contact Date"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterestLevel {
    #[default]
    High,
    Medium,
    Low,
}

impl InterestLevel {
    pub const ALL: [InterestLevel; 3] = [InterestLevel::High, InterestLevel::Medium, InterestLevel::Low];

    pub fn label(&self) -> &'static str {
        match self {
            InterestLevel::High => "High",
            InterestLevel::Medium => "Medium",
            InterestLevel::Low => "Low",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == label)
    }

    pub fn next(&self) -> Self {
        match self {
            InterestLevel::High => InterestLevel::Medium,
            InterestLevel::Medium => InterestLevel::Low,
            InterestLevel::Low => InterestLevel::High,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            InterestLevel::High => InterestLevel::Low,
            InterestLevel::Medium => InterestLevel::High,
            InterestLevel::Low => InterestLevel::Medium,
        }
    }
}

/// One row of the table. Values are kept as cell text so that rows read
/// from disk survive a save unchanged, even with blank or unexpected cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyRecord {
    pub name: String,
    pub country: String,
    pub sector: String,
    pub interest_level: String,
    pub contact_date: String,
}

impl CompanyRecord {
    /// Cell value for the column at `idx` of [`COLUMNS`].
    pub fn field(&self, idx: usize) -> &str {
        match idx {
            0 => &self.name,
            1 => &self.country,
            2 => &self.sector,
            3 => &self.interest_level,
            4 => &self.contact_date,
            _ => "",
        }
    }

    pub fn from_fields(fields: [String; 5]) -> Self {
        let [name, country, sector, interest_level, contact_date] = fields;
        Self {
            name,
            country,
            sector,
            interest_level,
            contact_date,
        }
    }

    pub fn is_blank(&self) -> bool {
        (0..COLUMNS.len()).all(|idx| self.field(idx).trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_follow_column_order() {
        let record = CompanyRecord::from_fields([
            "Acme".into(),
            "Spain".into(),
            "Food".into(),
            "Low".into(),
            "2024-03-01".into(),
        ]);
        let values: Vec<&str> = (0..COLUMNS.len()).map(|i| record.field(i)).collect();
        assert_eq!(values, vec!["Acme", "Spain", "Food", "Low", "2024-03-01"]);
        assert_eq!(record.field(COLUMNS.len()), "");
    }

    #[test]
    fn interest_level_cycles_both_ways() {
        let mut level = InterestLevel::default();
        for _ in 0..3 {
            level = level.next();
        }
        assert_eq!(level, InterestLevel::High);
        assert_eq!(InterestLevel::High.previous(), InterestLevel::Low);
        assert_eq!(InterestLevel::from_label("Medium"), Some(InterestLevel::Medium));
        assert_eq!(InterestLevel::from_label("medium"), None);
    }

    #[test]
    fn blank_record() {
        assert!(CompanyRecord::default().is_blank());
        let record = CompanyRecord {
            sector: " x ".into(),
            ..Default::default()
        };
        assert!(!record.is_blank());
    }
}
