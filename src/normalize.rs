use crate::workbook::Cell;

/// Parse a human-formatted amount: strips `$` and thousands separators and
/// treats `(500)` as negative. Blank or unparseable input is `None`.
pub fn clean_amount(raw: &str) -> Option<f64> {
    let s = raw.trim().replace('$', "").replace(',', "");
    let mut s = s.as_str();

    // Accounting negatives; stacked parens such as "((5))" collapse to one sign.
    let negative = s.starts_with('(') && s.ends_with(')') && s.len() >= 2;
    if negative {
        s = s.trim_matches(&['(', ')'][..]).trim();
    }
    if s.is_empty() {
        return None;
    }

    let value: f64 = s.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Amount from a worksheet cell: numbers pass through, text goes through [`clean_amount`].
pub fn cell_amount(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Text(s) => clean_amount(s),
        _ => None,
    }
}

/// True iff the trimmed string is exactly four ASCII digits.
pub fn is_account_code(raw: &str) -> bool {
    let s = raw.trim();
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

/// True when every character is one a number or currency figure could contain.
pub fn looks_numeric(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '(' | ')' | '$'))
}
