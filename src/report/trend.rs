use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::config::ColumnMap;
use crate::error::PainelResult;
use crate::types::{CellValue, SheetTable};

/// Chronological order of the trend chart's month labels
pub const CANONICAL_MONTHS: [&str; 16] = [
    "set-22", "out-22", "nov-22", "dez-22", "jan-23", "fev-23", "mar-23", "abr-23", "mai-23",
    "jun-23", "jul-23", "ago-23", "set-23", "out-23", "nov-23", "dez-23",
];

/// 9999-12-31, the last date Excel can represent
const MAX_DATE_SERIAL: f64 = 2_958_465.0;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Index of a label in [`CANONICAL_MONTHS`], ignoring case and surrounding spaces
pub fn month_position(label: &str) -> Option<usize> {
    let wanted = label.trim().to_lowercase();
    CANONICAL_MONTHS.iter().position(|m| *m == wanted)
}

/// `mmm-yy` label for an Excel date serial (1900 date system)
pub fn label_from_date_serial(serial: f64) -> Option<String> {
    if !serial.is_finite() || !(1.0..=MAX_DATE_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(Duration::try_days(serial.trunc() as i64)?)?;
    let abbr = MONTH_ABBREVIATIONS[date.month0() as usize];
    Some(format!("{}-{:02}", abbr, date.year().rem_euclid(100)))
}

/// One point of the monthly line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub volume: f64,
}

/// A comp row left out of the trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedMonth {
    /// 1-based worksheet row, header included
    pub row: usize,
    pub label: String,
    pub reason: String,
}

/// Ordered monthly series plus the rows that could not be placed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trend {
    pub points: Vec<TrendPoint>,
    pub excluded: Vec<ExcludedMonth>,
}

impl Trend {
    pub fn months(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.month.as_str()).collect()
    }
}

fn month_label(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(serial) => {
            label_from_date_serial(*serial).unwrap_or_else(|| cell.as_label())
        }
        other => other.as_label(),
    }
}

/// Sort the comp sheet by the canonical month sequence
///
/// Labels outside the sequence and rows without a numeric volume are
/// excluded and logged. Duplicate labels keep their sheet order.
pub fn order_trend(sheet: &SheetTable, columns: &ColumnMap) -> PainelResult<Trend> {
    let month_col = sheet.require_column(&columns.month)?;
    let volume_col = sheet.require_column(&columns.volume)?;

    let mut placed: Vec<(usize, TrendPoint)> = Vec::with_capacity(sheet.row_count());
    let mut excluded = Vec::new();

    for row in 0..sheet.row_count() {
        let label = month_label(sheet.cell(row, month_col));
        let sheet_row = row + 2;

        let Some(position) = month_position(&label) else {
            warn!(sheet = %sheet.name, row = sheet_row, label = %label, "month label outside canonical sequence, excluded");
            excluded.push(ExcludedMonth {
                row: sheet_row,
                label,
                reason: "month outside canonical sequence".to_string(),
            });
            continue;
        };

        let Some(volume) = sheet.cell(row, volume_col).to_numeric() else {
            warn!(sheet = %sheet.name, row = sheet_row, label = %label, "non-numeric volume, excluded");
            excluded.push(ExcludedMonth {
                row: sheet_row,
                label,
                reason: "non-numeric volume".to_string(),
            });
            continue;
        };

        placed.push((
            position,
            TrendPoint {
                month: CANONICAL_MONTHS[position].to_string(),
                volume,
            },
        ));
    }

    placed.sort_by_key(|(position, _)| *position);

    Ok(Trend {
        points: placed.into_iter().map(|(_, point)| point).collect(),
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportProfile;

    fn comp(rows: &[(CellValue, CellValue)]) -> SheetTable {
        let mut sheet = SheetTable::new(
            "COMP",
            vec!["DATA".to_string(), "VOLUME_PESO".to_string()],
        );
        for (month, volume) in rows {
            sheet.push_row(vec![month.clone(), volume.clone()]);
        }
        sheet
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_month_position() {
        assert_eq!(month_position("set-22"), Some(0));
        assert_eq!(month_position(" DEZ-23 "), Some(15));
        assert_eq!(month_position("jan-24"), None);
    }

    #[test]
    fn test_label_from_date_serial() {
        // 2022-09-01
        assert_eq!(label_from_date_serial(44805.0).as_deref(), Some("set-22"));
        // 2023-12-31
        assert_eq!(label_from_date_serial(45291.0).as_deref(), Some("dez-23"));
        assert_eq!(label_from_date_serial(0.0), None);
        assert_eq!(label_from_date_serial(2_958_466.0), None);
        assert_eq!(label_from_date_serial(1e15), None);
    }

    #[test]
    fn test_huge_numeric_month_is_excluded_not_fatal() {
        let rows = vec![
            (CellValue::Number(1e15), CellValue::Number(100_000.0)),
            (text("set-22"), CellValue::Number(120_000.0)),
        ];

        let trend = order_trend(&comp(&rows), &ReportProfile::bbt().columns).unwrap();

        assert_eq!(trend.months(), vec!["set-22"]);
        assert_eq!(trend.excluded.len(), 1);
        assert_eq!(trend.excluded[0].row, 2);
        assert_eq!(trend.excluded[0].reason, "month outside canonical sequence");
    }

    #[test]
    fn test_reverse_input_comes_out_canonical() {
        let rows: Vec<(CellValue, CellValue)> = CANONICAL_MONTHS
            .iter()
            .rev()
            .enumerate()
            .map(|(i, m)| (text(m), CellValue::Number(100_000.0 + i as f64)))
            .collect();

        let trend = order_trend(&comp(&rows), &ReportProfile::bbt().columns).unwrap();

        assert_eq!(trend.months(), CANONICAL_MONTHS.to_vec());
        assert!(trend.excluded.is_empty());
    }

    #[test]
    fn test_out_of_set_and_non_numeric_rows_excluded() {
        let rows = vec![
            (text("jan-24"), CellValue::Number(1.0)),
            (text("out-22"), text("N/A")),
            (text("nov-22"), CellValue::Number(150_000.0)),
        ];

        let trend = order_trend(&comp(&rows), &ReportProfile::bbt().columns).unwrap();

        assert_eq!(trend.months(), vec!["nov-22"]);
        assert_eq!(trend.excluded.len(), 2);
        assert_eq!(trend.excluded[0].row, 2);
        assert_eq!(trend.excluded[0].label, "jan-24");
        assert_eq!(trend.excluded[1].reason, "non-numeric volume");
    }

    #[test]
    fn test_duplicate_labels_keep_sheet_order() {
        let rows = vec![
            (text("out-22"), CellValue::Number(2.0)),
            (text("set-22"), CellValue::Number(1.0)),
            (text("out-22"), CellValue::Number(3.0)),
        ];

        let trend = order_trend(&comp(&rows), &ReportProfile::bbt().columns).unwrap();
        let volumes: Vec<f64> = trend.points.iter().map(|p| p.volume).collect();

        assert_eq!(volumes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_missing_volume_column_is_error() {
        let sheet = SheetTable::new("COMP", vec!["DATA".to_string()]);
        assert!(order_trend(&sheet, &ReportProfile::bbt().columns).is_err());
    }
}
