//! Report exporter - computed report → Excel (.xlsx)

use crate::config::ReportProfile;
use crate::error::{PainelError, PainelResult};
use crate::report::Report;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

fn export_err(context: &str) -> impl Fn(XlsxError) -> PainelError + '_ {
    move |e| PainelError::Export(format!("{}: {}", context, e))
}

/// Writes a report as three worksheets: `Resumo`, `Cidades` and `Mensal`
pub struct ReportExporter<'a> {
    report: &'a Report,
    profile: &'a ReportProfile,
}

impl<'a> ReportExporter<'a> {
    pub fn new(report: &'a Report, profile: &'a ReportProfile) -> Self {
        Self { report, profile }
    }

    /// Export the report to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> PainelResult<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        self.export_summary(workbook.add_worksheet(), &header)?;
        self.export_cities(workbook.add_worksheet(), &header)?;
        self.export_trend(workbook.add_worksheet(), &header)?;

        workbook
            .save(output_path)
            .map_err(export_err("Failed to save Excel file"))?;

        Ok(())
    }

    fn write_headers(worksheet: &mut Worksheet, headers: &[&str], format: &Format) -> PainelResult<()> {
        for (col, title) in headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *title, format)
                .map_err(export_err("Failed to write header"))?;
            worksheet.set_column_width(col as u16, 22).ok();
        }
        Ok(())
    }

    fn export_summary(&self, worksheet: &mut Worksheet, header: &Format) -> PainelResult<()> {
        worksheet
            .set_name("Resumo")
            .map_err(export_err("Failed to set worksheet name"))?;
        Self::write_headers(worksheet, &["Medida", "Valor", "Formatado"], header)?;

        let labels = &self.profile.labels;
        let summary = &self.report.summary;
        let formatted = &self.report.formatted;

        let mut rows: Vec<(&str, f64, &str)> = vec![
            (
                labels.weight_total.as_str(),
                summary.total_weight,
                formatted.total_weight.as_str(),
            ),
            (
                labels.note_total.as_str(),
                summary.total_notes,
                formatted.total_notes.as_str(),
            ),
        ];
        if let (Some(value), Some(text)) = (summary.total_per_capita, &formatted.total_per_capita) {
            rows.push((labels.per_capita_total.as_str(), value, text.as_str()));
        }

        for (i, (label, value, text)) in rows.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet
                .write_string(row, 0, *label)
                .map_err(export_err("Failed to write summary"))?;
            worksheet
                .write_number(row, 1, *value)
                .map_err(export_err("Failed to write summary"))?;
            worksheet
                .write_string(row, 2, *text)
                .map_err(export_err("Failed to write summary"))?;
        }

        let meta_row = (rows.len() + 2) as u32;
        worksheet
            .write_string(
                meta_row,
                0,
                format!("Cidades: {}", self.report.selected_cities.join(", ")),
            )
            .map_err(export_err("Failed to write summary"))?;
        worksheet
            .write_string(meta_row + 1, 0, format!("Perfil: {}", self.report.profile))
            .map_err(export_err("Failed to write summary"))?;

        Ok(())
    }

    fn export_cities(&self, worksheet: &mut Worksheet, header: &Format) -> PainelResult<()> {
        worksheet
            .set_name("Cidades")
            .map_err(export_err("Failed to set worksheet name"))?;
        let columns = &self.profile.columns;
        Self::write_headers(
            worksheet,
            &[columns.city.as_str(), columns.weight.as_str(), columns.note.as_str()],
            header,
        )?;

        for (i, group) in self.report.groups.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet
                .write_string(row, 0, &group.city)
                .map_err(export_err("Failed to write city row"))?;
            worksheet
                .write_number(row, 1, group.weight)
                .map_err(export_err("Failed to write city row"))?;
            worksheet
                .write_number(row, 2, group.notes)
                .map_err(export_err("Failed to write city row"))?;
        }

        Ok(())
    }

    fn export_trend(&self, worksheet: &mut Worksheet, header: &Format) -> PainelResult<()> {
        worksheet
            .set_name("Mensal")
            .map_err(export_err("Failed to set worksheet name"))?;
        let columns = &self.profile.columns;
        Self::write_headers(
            worksheet,
            &[columns.month.as_str(), columns.volume.as_str()],
            header,
        )?;

        for (i, point) in self.report.trend.points.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet
                .write_string(row, 0, &point.month)
                .map_err(export_err("Failed to write trend row"))?;
            worksheet
                .write_number(row, 1, point.volume)
                .map_err(export_err("Failed to write trend row"))?;
        }

        Ok(())
    }
}
