//! Reference (GL) table resolution.
//!
//! The reference sheet is maintained by hand, so column positions and header
//! names drift. Each role (account code, description) is resolved by an ordered
//! chain of strategies over per-column profiles; the first strategy that finds a
//! column wins.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, WarehouseError};
use crate::models::ReferenceEntry;
use crate::normalize::{is_account_code, looks_numeric};
use crate::workbook::{Cell, Sheet};

const SAMPLE_SIZE: usize = 50;

const CODE_HEADERS: &[&str] = &[
    "gl",
    "gl code",
    "glcode",
    "number",
    "account",
    "account number",
    "account#",
    "account #",
];

const DESCRIPTION_HEADERS: &[&str] = &[
    "description",
    "account description",
    "gl description",
    "name",
];

/// What the resolvers get to see about one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub index: usize,
    /// Lowercased, whitespace-collapsed header; empty for headerless sheets.
    pub header: String,
    /// First non-empty values, as text.
    pub samples: Vec<String>,
}

impl ColumnProfile {
    fn fraction(&self, pred: impl Fn(&str) -> bool) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let hits = self.samples.iter().filter(|s| pred(s)).count();
        Some(hits as f64 / self.samples.len() as f64)
    }
}

/// A resolver strategy: given all profiles and an already-claimed column, pick one or pass.
type Strategy = fn(&[ColumnProfile], Option<usize>) -> Option<usize>;

const CODE_STRATEGIES: &[Strategy] = &[code_by_header, code_by_shape];
const DESCRIPTION_STRATEGIES: &[Strategy] = &[description_by_header, description_by_shape];

fn by_header(profiles: &[ColumnProfile], synonyms: &[&str]) -> Option<usize> {
    // Several matching headers: the rightmost wins.
    profiles
        .iter()
        .rev()
        .find(|p| synonyms.contains(&p.header.as_str()))
        .map(|p| p.index)
}

fn code_by_header(profiles: &[ColumnProfile], _claimed: Option<usize>) -> Option<usize> {
    by_header(profiles, CODE_HEADERS)
}

fn description_by_header(profiles: &[ColumnProfile], _claimed: Option<usize>) -> Option<usize> {
    by_header(profiles, DESCRIPTION_HEADERS)
}

/// First column where more than half the samples are 4-digit codes.
fn code_by_shape(profiles: &[ColumnProfile], _claimed: Option<usize>) -> Option<usize> {
    profiles
        .iter()
        .find(|p| p.fraction(is_account_code).is_some_and(|f| f > 0.5))
        .map(|p| p.index)
}

/// Column with the largest share of values that don't look like figures.
fn description_by_shape(profiles: &[ColumnProfile], claimed: Option<usize>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for p in profiles.iter().filter(|p| Some(p.index) != claimed) {
        let Some(score) = p.fraction(|s| !looks_numeric(s)) else {
            continue;
        };
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((p.index, score));
        }
    }
    best.map(|(index, _)| index)
}

fn run_chain(chain: &[Strategy], profiles: &[ColumnProfile], claimed: Option<usize>) -> Option<usize> {
    chain.iter().find_map(|strategy| strategy(profiles, claimed))
}

/// Resolve (code column, description column) from column profiles.
pub fn resolve_columns(profiles: &[ColumnProfile]) -> Result<(usize, usize)> {
    let code = run_chain(CODE_STRATEGIES, profiles, None).ok_or_else(|| {
        WarehouseError::Schema("Could not identify GL code column in GL reference sheet.".into())
    })?;
    let description = run_chain(DESCRIPTION_STRATEGIES, profiles, Some(code)).ok_or_else(|| {
        WarehouseError::Schema("Could not identify Description column in GL reference sheet.".into())
    })?;
    Ok((code, description))
}

fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Profile every column of a reference sheet. A first row that already holds
/// an account code is data, not a header.
pub fn profile_columns(sheet: &Sheet) -> Vec<ColumnProfile> {
    let (headers, data) = split_header(&sheet.rows);
    (0..sheet.width())
        .map(|index| ColumnProfile {
            index,
            header: headers
                .and_then(|row| row.get(index))
                .and_then(Cell::as_text)
                .map(|h| normalize_header(&h))
                .unwrap_or_default(),
            samples: data
                .iter()
                .filter_map(|row| row.get(index).and_then(Cell::as_text))
                .take(SAMPLE_SIZE)
                .collect(),
        })
        .collect()
}

fn split_header(rows: &[Vec<Cell>]) -> (Option<&Vec<Cell>>, &[Vec<Cell>]) {
    match rows.split_first() {
        Some((first, rest)) if !is_data_row(first) => (Some(first), rest),
        _ => (None, rows),
    }
}

/// A first row naming a known column is a header even when it also holds a
/// 4-digit value such as a year. Otherwise any 4-digit code marks it as data.
fn is_data_row(row: &[Cell]) -> bool {
    let texts: Vec<String> = row.iter().filter_map(Cell::as_text).collect();
    let names_a_column = texts.iter().any(|t| {
        let header = normalize_header(t);
        CODE_HEADERS.contains(&header.as_str()) || DESCRIPTION_HEADERS.contains(&header.as_str())
    });
    !names_a_column && texts.iter().any(|t| is_account_code(t))
}

/// Account-code lookup built from the warehouse's reference sheet.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
    by_code: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Keep only 4-digit codes; the first entry for a code wins.
    pub fn from_entries(entries: impl IntoIterator<Item = ReferenceEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries: Vec<ReferenceEntry> = entries
            .into_iter()
            .filter(|e| is_account_code(&e.account_code))
            .filter(|e| seen.insert(e.account_code.clone()))
            .collect();
        let by_code = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.account_code.clone(), i))
            .collect();
        Self { entries, by_code }
    }

    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let profiles = profile_columns(sheet);
        let (code_col, desc_col) = resolve_columns(&profiles)?;
        let (_, data) = split_header(&sheet.rows);

        let entries = data.iter().filter_map(|row| {
            let code = row.get(code_col)?.as_trimmed()?;
            let description = row
                .get(desc_col)
                .and_then(Cell::as_trimmed)
                .unwrap_or_default();
            Some(ReferenceEntry {
                account_code: code,
                description,
            })
        });
        Ok(Self::from_entries(entries))
    }

    /// Description for a code; a code listed with a blank description counts
    /// as missing, the same as it will once persisted.
    pub fn description(&self, code: &str) -> Option<&str> {
        self.by_code
            .get(code)
            .map(|&i| self.entries[i].description.trim())
            .filter(|d| !d.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
