//! Report pipeline: load → filter → aggregate → trend
//!
//! [`Report::build`] turns the two loaded sheets plus a city selection into
//! everything the presenters need. The same code serves both dashboard
//! variants; the [`ReportProfile`] decides column names and measure semantics.

mod aggregate;
mod filter;
mod trend;

pub use aggregate::{group_by_city, summarize, CityGroup, FormattedSummary, Summary};
pub use filter::{distinct_cities, filter_by_cities, CitySelection, FilteredView};
pub use trend::{
    label_from_date_serial, month_position, order_trend, ExcludedMonth, Trend, TrendPoint,
    CANONICAL_MONTHS,
};

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::config::{ColumnMap, PainelConfig, ReportProfile};
use crate::error::PainelResult;
use crate::excel::WorkbookCache;
use crate::types::SheetTable;

/// One record of the base sheet with measures already coerced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseRecord {
    pub city: String,
    pub weight: Option<f64>,
    pub note: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_capita: Option<f64>,
}

impl BaseRecord {
    pub fn new(city: impl Into<String>, weight: Option<f64>, note: Option<f64>) -> Self {
        Self {
            city: city.into(),
            weight,
            note,
            per_capita: None,
        }
    }
}

/// The per-record table used for city filtering and totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseTable {
    pub records: Vec<BaseRecord>,
    pub has_per_capita: bool,
}

impl BaseTable {
    pub fn new(records: Vec<BaseRecord>) -> Self {
        let has_per_capita = records.iter().any(|r| r.per_capita.is_some());
        Self {
            records,
            has_per_capita,
        }
    }

    /// Extract typed records from a loaded sheet
    ///
    /// Every mapped column must exist. Rows without a city are skipped.
    pub fn from_sheet(sheet: &SheetTable, columns: &ColumnMap) -> PainelResult<Self> {
        let city_col = sheet.require_column(&columns.city)?;
        let weight_col = sheet.require_column(&columns.weight)?;
        let note_col = sheet.require_column(&columns.note)?;
        let per_capita_col = columns
            .per_capita
            .as_deref()
            .map(|name| sheet.require_column(name))
            .transpose()?;

        let mut records = Vec::with_capacity(sheet.row_count());
        for row in 0..sheet.row_count() {
            let city = sheet.cell(row, city_col).as_label();
            if city.is_empty() {
                warn!(sheet = %sheet.name, row = row + 2, "skipping row without city");
                continue;
            }
            records.push(BaseRecord {
                city,
                weight: sheet.cell(row, weight_col).to_numeric(),
                note: sheet.cell(row, note_col).to_numeric(),
                per_capita: per_capita_col.and_then(|col| sheet.cell(row, col).to_numeric()),
            });
        }

        Ok(Self {
            records,
            has_per_capita: per_capita_col.is_some(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct cities in order of first appearance (the filter's options)
    pub fn cities(&self) -> Vec<String> {
        distinct_cities(&self.records)
    }
}

/// Everything one render of the dashboard needs
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub profile: String,
    pub available_cities: Vec<String>,
    pub selected_cities: Vec<String>,
    pub summary: Summary,
    pub formatted: FormattedSummary,
    pub groups: Vec<CityGroup>,
    pub trend: Trend,
    pub trend_y_range: [f64; 2],
}

impl Report {
    /// Build a report from already loaded sheets
    ///
    /// `selection` of `None` selects every city.
    pub fn build(
        profile: &ReportProfile,
        base_sheet: &SheetTable,
        comp_sheet: &SheetTable,
        selection: Option<&CitySelection>,
    ) -> PainelResult<Self> {
        let base = BaseTable::from_sheet(base_sheet, &profile.columns)?;
        let trend = order_trend(comp_sheet, &profile.columns)?;
        Ok(Self::from_parts(profile, &base, trend, selection))
    }

    /// Build a report from a typed base table and an ordered trend
    pub fn from_parts(
        profile: &ReportProfile,
        base: &BaseTable,
        trend: Trend,
        selection: Option<&CitySelection>,
    ) -> Self {
        let available_cities = base.cities();
        let selection = match selection {
            Some(selection) => selection.clone(),
            None => CitySelection::all(&available_cities),
        };

        let view = filter_by_cities(base, &selection);
        let with_per_capita = base.has_per_capita && profile.columns.per_capita.is_some();
        let summary = summarize(&view, profile.note_mode, with_per_capita);
        let groups = group_by_city(&view, profile.note_mode);

        Self {
            profile: profile.name.clone(),
            selected_cities: selection.ordered(&available_cities),
            available_cities,
            formatted: summary.formatted(),
            summary,
            groups,
            trend,
            trend_y_range: profile.trend_y_range,
        }
    }
}

/// Load both sheets through the cache and build the report
pub fn load_report(
    cache: &WorkbookCache,
    config: &PainelConfig,
    selection: Option<&CitySelection>,
) -> PainelResult<Report> {
    let (base, comp) = load_sheets(cache, config)?;
    Report::build(&config.profile, &base, &comp, selection)
}

/// Load the base and comp sheets named by the profile
pub fn load_sheets(
    cache: &WorkbookCache,
    config: &PainelConfig,
) -> PainelResult<(Arc<SheetTable>, Arc<SheetTable>)> {
    let base = cache.load(&config.workbook, &config.profile.base_sheet)?;
    let comp = cache.load(&config.workbook, &config.profile.comp_sheet)?;
    Ok((base, comp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoteMode;
    use crate::types::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn base_sheet() -> SheetTable {
        let mut sheet = SheetTable::new(
            "BASE",
            vec!["Cidade".to_string(), "Peso".to_string(), "Nota".to_string()],
        );
        sheet.push_row(vec![text("X"), CellValue::Number(10.0), CellValue::Number(1.0)]);
        sheet.push_row(vec![text("Y"), CellValue::Number(20.0), text("N/A")]);
        sheet.push_row(vec![CellValue::Empty, CellValue::Number(5.0), CellValue::Number(1.0)]);
        sheet
    }

    fn comp_sheet() -> SheetTable {
        let mut sheet = SheetTable::new(
            "COMP",
            vec!["DATA".to_string(), "VOLUME_PESO".to_string()],
        );
        sheet.push_row(vec![text("out-22"), CellValue::Number(120_000.0)]);
        sheet.push_row(vec![text("set-22"), CellValue::Number(100_000.0)]);
        sheet
    }

    #[test]
    fn test_from_sheet_skips_rows_without_city() {
        let base = BaseTable::from_sheet(&base_sheet(), &ReportProfile::bbt().columns).unwrap();

        assert_eq!(base.len(), 2);
        assert_eq!(base.records[1].note, None);
        assert!(!base.has_per_capita);
    }

    #[test]
    fn test_city_text_is_not_normalized() {
        let mut sheet = SheetTable::new(
            "BASE",
            vec!["Cidade".to_string(), "Peso".to_string(), "Nota".to_string()],
        );
        sheet.push_row(vec![text("Pelotas"), CellValue::Number(1.0), CellValue::Number(1.0)]);
        sheet.push_row(vec![text("Pelotas "), CellValue::Number(2.0), CellValue::Number(1.0)]);
        let base = BaseTable::from_sheet(&sheet, &ReportProfile::bbt().columns).unwrap();

        assert_eq!(base.cities(), vec!["Pelotas", "Pelotas "]);

        let selection = CitySelection::of(["Pelotas"]);
        let report = Report::from_parts(&ReportProfile::bbt(), &base, Trend::default(), Some(&selection));
        assert_eq!(report.summary.total_weight, 1.0);
        assert_eq!(report.groups.len(), 1);
    }

    #[test]
    fn test_from_sheet_requires_per_capita_column_when_mapped() {
        let err = BaseTable::from_sheet(&base_sheet(), &ReportProfile::habi().columns).unwrap_err();
        assert!(err.to_string().contains("Litros_Habitante"));
    }

    #[test]
    fn test_build_end_to_end() {
        let profile = ReportProfile::bbt();
        let report = Report::build(&profile, &base_sheet(), &comp_sheet(), None).unwrap();

        assert_eq!(report.available_cities, vec!["X", "Y"]);
        assert_eq!(report.selected_cities, vec!["X", "Y"]);
        assert_eq!(report.summary.total_weight, 30.0);
        assert_eq!(report.summary.total_notes, 1.0);
        assert_eq!(report.formatted.total_weight, "30,00");
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.trend.points[0].month, "set-22");
        assert_eq!(profile.note_mode, NoteMode::Count);
    }
}
