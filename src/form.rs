use chrono::{Local, NaiveDate};
use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::domain::TrackerError;
use crate::inputter::Inputter;
use crate::record::{CompanyRecord, DATE_FORMAT, InterestLevel};

// Accepted spellings of the contact date, first match wins
const DATE_INPUT_FORMATS: [&str; 3] = [DATE_FORMAT, "%Y/%m/%d", "%d/%m/%Y"];

pub const MISSING_FIELDS_WARNING: &str = "Please fill in name, country and sector.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Country,
    Sector,
    Interest,
    ContactDate,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Country,
        FormField::Sector,
        FormField::Interest,
        FormField::ContactDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Country => "Country",
            FormField::Sector => "Sector",
            FormField::Interest => "Interest Level",
            FormField::ContactDate => "Contact Date",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn previous(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Form used to add a new company.
#[derive(Debug, Clone)]
pub struct EntryForm {
    name: Inputter,
    country: Inputter,
    sector: Inputter,
    interest: InterestLevel,
    contact_date: Inputter,
    focus: FormField,
    today: NaiveDate,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl EntryForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: Inputter::default(),
            country: Inputter::default(),
            sector: Inputter::default(),
            interest: InterestLevel::default(),
            contact_date: Inputter::with_value(&today.format(DATE_FORMAT).to_string()),
            focus: FormField::default(),
            today,
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn interest(&self) -> InterestLevel {
        self.interest
    }

    /// Text input behind a field, None for the interest selector.
    pub fn input(&self, field: FormField) -> Option<&Inputter> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Country => Some(&self.country),
            FormField::Sector => Some(&self.sector),
            FormField::Interest => None,
            FormField::ContactDate => Some(&self.contact_date),
        }
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut Inputter> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Country => Some(&mut self.country),
            FormField::Sector => Some(&mut self.sector),
            FormField::Interest => None,
            FormField::ContactDate => Some(&mut self.contact_date),
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Routes a key to the focused input. Returns false if the key was not used.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.focus {
            FormField::Interest => match key.code {
                KeyCode::Right | KeyCode::Char(' ') => {
                    self.interest = self.interest.next();
                    true
                }
                KeyCode::Left => {
                    self.interest = self.interest.previous();
                    true
                }
                _ => false,
            },
            field => self.input_mut(field).is_some_and(|input| input.read(key)),
        }
    }

    #[cfg(test)]
    pub fn set_value(&mut self, field: FormField, value: &str) {
        match self.input_mut(field) {
            Some(input) => input.set(value),
            None => {
                if let Some(level) = InterestLevel::from_label(value) {
                    self.interest = level;
                }
            }
        }
    }

    #[cfg(test)]
    pub fn set_interest(&mut self, level: InterestLevel) {
        self.interest = level;
    }

    /// Validates the form and builds the record. The form is left untouched.
    pub fn submit(&self) -> Result<CompanyRecord, TrackerError> {
        let name = self.name.value().trim();
        let country = self.country.value().trim();
        let sector = self.sector.value().trim();
        if name.is_empty() || country.is_empty() || sector.is_empty() {
            return Err(TrackerError::Validation(MISSING_FIELDS_WARNING.to_string()));
        }

        let contact_date = parse_date(self.contact_date.value()).ok_or_else(|| {
            TrackerError::Validation(format!(
                "\"{}\" is not a valid date, use YYYY-MM-DD.",
                self.contact_date.value()
            ))
        })?;

        Ok(CompanyRecord {
            name: name.to_string(),
            country: country.to_string(),
            sector: sector.to_string(),
            interest_level: self.interest.label().to_string(),
            contact_date: contact_date.format(DATE_FORMAT).to_string(),
        })
    }

    /// Resets every field. The date goes back to today.
    pub fn clear(&mut self) {
        *self = Self::new(self.today);
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    fn filled_form() -> EntryForm {
        let mut form = EntryForm::new(today());
        form.set_value(FormField::Name, "Acme");
        form.set_value(FormField::Country, "Spain");
        form.set_value(FormField::Sector, "Energy");
        form
    }

    #[test]
    fn date_defaults_to_today() {
        let form = EntryForm::new(today());
        assert_eq!(form.input(FormField::ContactDate).unwrap().value(), "2024-02-29");
        assert_eq!(form.interest(), InterestLevel::High);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        for field in [FormField::Name, FormField::Country, FormField::Sector] {
            let mut form = filled_form();
            form.set_value(field, "   ");
            match form.submit() {
                Err(TrackerError::Validation(msg)) => assert_eq!(msg, MISSING_FIELDS_WARNING),
                other => panic!("expected a warning for {field:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn submit_normalizes_date() {
        let mut form = filled_form();
        form.set_value(FormField::ContactDate, "05/03/2024");
        form.set_interest(InterestLevel::Low);
        let record = form.submit().unwrap();
        assert_eq!(
            record,
            CompanyRecord {
                name: "Acme".into(),
                country: "Spain".into(),
                sector: "Energy".into(),
                interest_level: "Low".into(),
                contact_date: "2024-03-05".into(),
            }
        );
    }

    #[test]
    fn invalid_date_is_rejected() {
        let mut form = filled_form();
        form.set_value(FormField::ContactDate, "2024-02-30");
        assert!(matches!(form.submit(), Err(TrackerError::Validation(_))));
    }

    #[test]
    fn focus_wraps_and_interest_cycles() {
        let mut form = EntryForm::new(today());
        form.focus_previous();
        assert_eq!(form.focus(), FormField::ContactDate);
        form.focus_next();
        assert_eq!(form.focus(), FormField::Name);

        for _ in 0..3 {
            form.focus_next();
        }
        assert_eq!(form.focus(), FormField::Interest);
        assert!(form.handle_key(KeyEvent::from(KeyCode::Right)));
        assert_eq!(form.interest(), InterestLevel::Medium);
        assert!(!form.handle_key(KeyEvent::from(KeyCode::Char('x'))));
    }

    #[test]
    fn clear_resets_to_defaults() {
        let mut form = filled_form();
        form.set_value(FormField::ContactDate, "2020-01-01");
        form.set_interest(InterestLevel::Medium);
        form.focus_next();
        form.clear();
        assert_eq!(form.input(FormField::Name).unwrap().value(), "");
        assert_eq!(form.input(FormField::ContactDate).unwrap().value(), "2024-02-29");
        assert_eq!(form.interest(), InterestLevel::High);
        assert_eq!(form.focus(), FormField::Name);
    }
}
