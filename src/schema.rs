use crate::error::{BillAnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which kind of utility account a file belongs to. Selected by the caller,
/// never inferred from the data; it only controls the unit label attached to
/// quantity values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Water,
    Energy,
}

impl AccountKind {
    pub fn unit(&self) -> Unit {
        match self {
            AccountKind::Water => Unit::Volume,
            AccountKind::Energy => Unit::Energy,
        }
    }
}

/// Unit of the quantity series. The label is a display string only; no
/// conversion is ever performed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Volume,
    Energy,
}

impl Unit {
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Volume => "m³",
            Unit::Energy => "kWh",
        }
    }
}

/// A table as received from an upload: one header row plus string cells.
/// Transient input to normalization; rows may be ragged.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Canonical attributes a raw column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Month,
    Year,
    Amount,
    Quantity,
    /// Combined "MM/YYYY" reference supplying both month and year.
    Reference,
}

impl CanonicalField {
    /// Case-insensitive exact aliases. No fuzzy matching.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Month => &["mes", "mês", "month"],
            CanonicalField::Year => &["ano", "year", "exercicio"],
            CanonicalField::Amount => &["valor", "valor_mensal", "value", "custo"],
            CanonicalField::Quantity => {
                &["consumo", "consumo_mensal", "consumption", "gasto"]
            }
            CanonicalField::Reference => &["mes_ref"],
        }
    }
}

/// Resolved header positions for one table.
///
/// The date may come from either the combined reference column or the
/// month+year pair; `resolve` guarantees at least one of the two forms is
/// present, and `amount`/`quantity` are always present.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub month: Option<usize>,
    pub year: Option<usize>,
    pub reference: Option<usize>,
    pub amount: usize,
    pub quantity: usize,
}

impl ColumnMap {
    /// Match headers against the alias table. Fails with a dataset-level
    /// schema error when a required field has no match at all.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let index = build_header_index(headers);

        let month = find_field(&index, CanonicalField::Month);
        let year = find_field(&index, CanonicalField::Year);
        let reference = find_field(&index, CanonicalField::Reference);

        if reference.is_none() && (month.is_none() || year.is_none()) {
            return Err(BillAnalyticsError::Schema(
                "no date columns found: expected 'mes_ref' or the pair 'mes' + 'ano'"
                    .to_string(),
            ));
        }

        let amount = find_field(&index, CanonicalField::Amount).ok_or_else(|| {
            BillAnalyticsError::Schema(missing_field_message("amount", CanonicalField::Amount))
        })?;
        let quantity = find_field(&index, CanonicalField::Quantity).ok_or_else(|| {
            BillAnalyticsError::Schema(missing_field_message(
                "quantity",
                CanonicalField::Quantity,
            ))
        })?;

        Ok(Self {
            month,
            year,
            reference,
            amount,
            quantity,
        })
    }
}

fn build_header_index(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

// Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM;
// strip it or alias matching reports the column as missing.
fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_lowercase()
}

fn find_field(index: &HashMap<String, usize>, field: CanonicalField) -> Option<usize> {
    field
        .aliases()
        .iter()
        .find_map(|alias| index.get(*alias).copied())
}

fn missing_field_message(name: &str, field: CanonicalField) -> String {
    format!(
        "no column found for {}: expected one of {:?}",
        name,
        field.aliases()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_separate_month_year() {
        let map =
            ColumnMap::resolve(&headers(&["mes", "ano", "consumo_mensal", "valor_mensal"]))
                .unwrap();
        assert_eq!(map.month, Some(0));
        assert_eq!(map.year, Some(1));
        assert_eq!(map.quantity, 2);
        assert_eq!(map.amount, 3);
        assert!(map.reference.is_none());
    }

    #[test]
    fn test_resolve_combined_reference() {
        let map = ColumnMap::resolve(&headers(&["mes_ref", "consumo", "valor"])).unwrap();
        assert_eq!(map.reference, Some(0));
        assert!(map.month.is_none());
        assert!(map.year.is_none());
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let map = ColumnMap::resolve(&headers(&["Month", "Year", "Consumption", "Value"]))
            .unwrap();
        assert_eq!(map.month, Some(0));
        assert_eq!(map.year, Some(1));
    }

    #[test]
    fn test_resolve_strips_bom() {
        let map = ColumnMap::resolve(&headers(&["\u{feff}mes", "ano", "gasto", "custo"]))
            .unwrap();
        assert_eq!(map.month, Some(0));
    }

    #[test]
    fn test_missing_date_columns_is_schema_error() {
        let result = ColumnMap::resolve(&headers(&["consumo", "valor"]));
        assert!(matches!(result, Err(BillAnalyticsError::Schema(_))));
    }

    #[test]
    fn test_missing_amount_is_schema_error() {
        let result = ColumnMap::resolve(&headers(&["mes", "ano", "consumo"]));
        assert!(matches!(result, Err(BillAnalyticsError::Schema(_))));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        // "valores" is not an alias of "valor" and must not match.
        let result = ColumnMap::resolve(&headers(&["mes", "ano", "consumo", "valores"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(AccountKind::Water.unit().label(), "m³");
        assert_eq!(AccountKind::Energy.unit().label(), "kWh");
    }
}
