use std::fmt;

/// Income-statement section a ledger row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Expenses,
    Revenue,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Expenses => "Expenses",
        }
    }

    /// Section marker as it appears in the code column of a monthly sheet.
    pub fn from_marker(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "REVENUES" => Some(Self::Revenue),
            "EXPENSES" => Some(Self::Expenses),
            _ => None,
        }
    }

    /// Category label as persisted in the fact sheet.
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("revenue") {
            Some(Self::Revenue)
        } else if raw.eq_ignore_ascii_case("expenses") {
            Some(Self::Expenses)
        } else {
            None
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// English name for a 1-based month number; empty for anything out of range.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// Month number from either a numeric string or an English month name.
pub fn month_from_label(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    raw.parse::<chrono::Month>()
        .ok()
        .map(|m| m.number_from_month())
}

/// A ledger row lifted off a department sheet, before the reference join.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetFact {
    pub account_code: String,
    /// The sheet's own label for the row; only used for QA reporting.
    pub label: Option<String>,
    pub category: Option<Category>,
    pub period: Period,
    pub department: String,
    pub amount: f64,
}

/// One monetary observation in the canonical fact schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRow {
    pub account_code: String,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub year: i32,
    pub month: u32,
    pub department: String,
    /// Blank when a persisted row carries no usable amount.
    pub amount: Option<f64>,
}

impl FactRow {
    pub fn is_unmapped(&self) -> bool {
        self.description.is_none()
    }

    pub fn key(&self) -> FactKey {
        FactKey {
            account_code: self.account_code.clone(),
            year: self.year,
            month: self.month,
            department: self.department.clone(),
            category: self.category,
        }
    }
}

/// Natural key: at most one persisted fact per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactKey {
    pub account_code: String,
    pub year: i32,
    pub month: u32,
    pub department: String,
    pub category: Option<Category>,
}

/// A fact after the reference join, carrying what the QA sheet needs.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedFact {
    pub fact: FactRow,
    pub sheet_label: Option<String>,
}

impl JoinedFact {
    pub fn is_unmapped(&self) -> bool {
        self.fact.is_unmapped()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub account_code: String,
    pub description: String,
}

/// Names of the three warehouse sheets the pipeline touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub reference: String,
    pub facts: String,
    pub qa: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            reference: "GL".to_string(),
            facts: "Final".to_string(),
            qa: "Missing_GL_Mapping".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_markers() {
        assert_eq!(Category::from_marker("REVENUES"), Some(Category::Revenue));
        assert_eq!(Category::from_marker(" expenses "), Some(Category::Expenses));
        assert_eq!(Category::from_marker("Revenue"), None);
        assert_eq!(Category::from_marker("4010"), None);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::from_label("Revenue"), Some(Category::Revenue));
        assert_eq!(Category::from_label("EXPENSES"), Some(Category::Expenses));
        assert_eq!(Category::from_label("Other"), None);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_month_from_label() {
        assert_eq!(month_from_label("3"), Some(3));
        assert_eq!(month_from_label("March"), Some(3));
        assert_eq!(month_from_label("sep"), Some(9));
        assert_eq!(month_from_label("13"), None);
        assert_eq!(month_from_label("Smarch"), None);
    }

    #[test]
    fn test_unmapped_is_derived_from_description() {
        let mut fact = FactRow {
            account_code: "4010".into(),
            description: None,
            category: Some(Category::Revenue),
            year: 2024,
            month: 1,
            department: "100".into(),
            amount: Some(1.0),
        };
        assert!(fact.is_unmapped());
        fact.description = Some("Sales".into());
        assert!(!fact.is_unmapped());
    }
}
