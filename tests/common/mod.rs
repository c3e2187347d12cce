//! Scratch workbook fixtures shared by the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// One cell of a fixture sheet
#[derive(Clone, Copy)]
pub enum Cell {
    Num(f64),
    Text(&'static str),
    Blank,
}

pub struct Sheet {
    pub name: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

/// Write the given sheets to an .xlsx file
pub fn write_workbook(path: &Path, sheets: &[Sheet]) {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name).unwrap();
        for (col, title) in sheet.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title).unwrap();
        }
        for (r, row) in sheet.rows.iter().enumerate() {
            let row_index = (r + 1) as u32;
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Num(n) => {
                        worksheet.write_number(row_index, c as u16, *n).unwrap();
                    }
                    Cell::Text(s) => {
                        worksheet.write_string(row_index, c as u16, *s).unwrap();
                    }
                    Cell::Blank => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

/// BASE sheet: Recife twice, Olinda with a non-numeric note, Caruaru once
pub fn base_sheet() -> Sheet {
    use Cell::*;
    Sheet {
        name: "BASE",
        headers: &["Cidade", "Peso", "Nota"],
        rows: vec![
            vec![Text("Recife"), Num(100.0), Num(1.0)],
            vec![Text("Olinda"), Num(50.0), Text("N/A")],
            vec![Text("Recife"), Num(25.0), Num(3.0)],
            vec![Text("Caruaru"), Num(10.0), Num(2.0)],
        ],
    }
}

/// COMP sheet: months out of order plus one label outside the calendar
pub fn comp_sheet() -> Sheet {
    use Cell::*;
    Sheet {
        name: "COMP",
        headers: &["DATA", "VOLUME_PESO"],
        rows: vec![
            vec![Text("out-22"), Num(120_000.0)],
            vec![Text("jan-23"), Num(150_000.0)],
            vec![Text("set-22"), Num(100_000.0)],
            vec![Text("TOTAL"), Num(370_000.0)],
        ],
    }
}

/// Standard two-sheet workbook in `dir`
pub fn sample_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("painel.xlsx");
    write_workbook(&path, &[base_sheet(), comp_sheet()]);
    path
}
