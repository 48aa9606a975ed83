use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{Result, WarehouseError};
use crate::merge::read_existing_facts;
use crate::models::{Category, FactRow, Period, SheetNames};
use crate::workbook::load_all_sheets;

/// Load the persisted fact table from a warehouse file.
pub fn load_warehouse_facts(path: &Path, sheets: &SheetNames) -> Result<Vec<FactRow>> {
    if !path.is_file() {
        return Err(WarehouseError::NotFound(format!(
            "Warehouse file not found: {}",
            path.display()
        )));
    }
    let workbook = load_all_sheets(path)?;
    read_existing_facts(&workbook, &sheets.facts)
}

// ---------------------------------------------------------------------------
// Period / department summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentSummary {
    pub period: Period,
    pub department: String,
    pub revenue: f64,
    pub expenses: f64,
    pub uncategorized: f64,
    pub rows: usize,
    pub unmapped: usize,
}

pub fn summarize(facts: &[FactRow], year: Option<i32>, department: Option<&str>) -> Vec<DepartmentSummary> {
    let mut groups: BTreeMap<(Period, String), DepartmentSummary> = BTreeMap::new();

    let selected = facts
        .iter()
        .filter(|f| year.map_or(true, |y| f.year == y))
        .filter(|f| department.map_or(true, |d| f.department == d));

    for fact in selected {
        let period = Period {
            year: fact.year,
            month: fact.month,
        };
        let entry = groups
            .entry((period, fact.department.clone()))
            .or_insert_with(|| DepartmentSummary {
                period,
                department: fact.department.clone(),
                revenue: 0.0,
                expenses: 0.0,
                uncategorized: 0.0,
                rows: 0,
                unmapped: 0,
            });
        let amount = fact.amount.unwrap_or(0.0);
        match fact.category {
            Some(Category::Revenue) => entry.revenue += amount,
            Some(Category::Expenses) => entry.expenses += amount,
            None => entry.uncategorized += amount,
        }
        entry.rows += 1;
        if fact.is_unmapped() {
            entry.unmapped += 1;
        }
    }
    groups.into_values().collect()
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseStats {
    pub fact_rows: usize,
    pub periods: Vec<Period>,
    pub departments: Vec<String>,
    pub unmapped: usize,
}

pub fn warehouse_stats(facts: &[FactRow]) -> WarehouseStats {
    let periods: BTreeSet<Period> = facts
        .iter()
        .map(|f| Period {
            year: f.year,
            month: f.month,
        })
        .collect();
    let departments: BTreeSet<&str> = facts.iter().map(|f| f.department.as_str()).collect();
    WarehouseStats {
        fact_rows: facts.len(),
        periods: periods.into_iter().collect(),
        departments: departments.into_iter().map(str::to_string).collect(),
        unmapped: facts.iter().filter(|f| f.is_unmapped()).count(),
    }
}

pub fn unmapped_facts(facts: &[FactRow]) -> Vec<&FactRow> {
    facts.iter().filter(|f| f.is_unmapped()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(code: &str, month: u32, dept: &str, category: Option<Category>, amount: f64, mapped: bool) -> FactRow {
        FactRow {
            account_code: code.into(),
            description: mapped.then(|| format!("GL {code}")),
            category,
            year: 2024,
            month,
            department: dept.into(),
            amount: Some(amount),
        }
    }

    fn seed() -> Vec<FactRow> {
        vec![
            fact("4010", 1, "100", Some(Category::Revenue), 1000.0, true),
            fact("4020", 1, "100", Some(Category::Revenue), 250.0, true),
            fact("5010", 1, "100", Some(Category::Expenses), -200.0, true),
            fact("9999", 1, "100", None, 5.0, false),
            fact("4010", 1, "200", Some(Category::Revenue), 10.0, true),
            fact("4010", 2, "100", Some(Category::Revenue), 30.0, true),
        ]
    }

    #[test]
    fn test_summarize_groups_by_period_and_department() {
        let rows = summarize(&seed(), None, None);
        assert_eq!(rows.len(), 3);
        let jan_100 = &rows[0];
        assert_eq!(jan_100.period, Period { year: 2024, month: 1 });
        assert_eq!(jan_100.department, "100");
        assert_eq!(jan_100.revenue, 1250.0);
        assert_eq!(jan_100.expenses, -200.0);
        assert_eq!(jan_100.uncategorized, 5.0);
        assert_eq!(jan_100.rows, 4);
        assert_eq!(jan_100.unmapped, 1);
        assert_eq!(rows[1].department, "200");
        assert_eq!(rows[2].period.month, 2);
    }

    #[test]
    fn test_summarize_filters() {
        assert_eq!(summarize(&seed(), None, Some("200")).len(), 1);
        assert!(summarize(&seed(), Some(2023), None).is_empty());
    }

    #[test]
    fn test_warehouse_stats() {
        let stats = warehouse_stats(&seed());
        assert_eq!(stats.fact_rows, 6);
        assert_eq!(stats.periods.len(), 2);
        assert_eq!(stats.departments, vec!["100".to_string(), "200".to_string()]);
        assert_eq!(stats.unmapped, 1);
    }

    #[test]
    fn test_unmapped_facts() {
        let facts = seed();
        let unmapped = unmapped_facts(&facts);
        assert_eq!(unmapped.len(), 1);
        assert_eq!(unmapped[0].account_code, "9999");
    }

    #[test]
    fn test_load_warehouse_facts_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_warehouse_facts(&dir.path().join("wh.xlsx"), &SheetNames::default()).unwrap_err();
        assert!(matches!(err, WarehouseError::NotFound(_)));
    }
}
