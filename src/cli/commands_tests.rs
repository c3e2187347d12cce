use super::*;
use crate::config::ReportProfile;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn write_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("painel.xlsx");
    let mut workbook = Workbook::new();

    let base = workbook.add_worksheet();
    base.set_name("BASE").unwrap();
    for (col, title) in ["Cidade", "Peso", "Nota"].iter().enumerate() {
        base.write_string(0, col as u16, *title).unwrap();
    }
    base.write_string(1, 0, "X").unwrap();
    base.write_number(1, 1, 10.0).unwrap();
    base.write_number(1, 2, 1.0).unwrap();
    base.write_string(2, 0, "Y").unwrap();
    base.write_number(2, 1, 20.0).unwrap();
    base.write_string(2, 2, "N/A").unwrap();

    let comp = workbook.add_worksheet();
    comp.set_name("COMP").unwrap();
    comp.write_string(0, 0, "DATA").unwrap();
    comp.write_string(0, 1, "VOLUME_PESO").unwrap();
    comp.write_string(1, 0, "out-22").unwrap();
    comp.write_number(1, 1, 120_000.0).unwrap();
    comp.write_string(2, 0, "set-22").unwrap();
    comp.write_number(2, 1, 100_000.0).unwrap();

    workbook.save(&path).unwrap();
    path
}

fn config_for(workbook: PathBuf) -> PainelConfig {
    PainelConfig {
        workbook,
        logo: None,
        profile: ReportProfile::bbt(),
    }
}

// =========================================================================
// Selection Tests
// =========================================================================

#[test]
fn test_selection_from_no_args_is_all() {
    assert!(selection_from_args(&[]).is_none());
}

#[test]
fn test_selection_from_args() {
    let selection = selection_from_args(&["X".to_string()]).unwrap();
    assert_eq!(selection.len(), 1);
    assert!(selection.contains("X"));
}

// =========================================================================
// Watch Filter Tests
// =========================================================================

#[test]
fn test_is_watched_file_by_name() {
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("painel.xlsx");
    assert!(is_watched_file(&workbook, &workbook));
    assert!(!is_watched_file(&dir.path().join("other.xlsx"), &workbook));
    assert!(!is_watched_file(&dir.path().join("~$painel.xlsx"), &workbook));
}

// =========================================================================
// Command Tests
// =========================================================================

#[test]
fn test_report_command() {
    let dir = TempDir::new().unwrap();
    let config = config_for(write_workbook(&dir));
    assert!(report(&config, vec![], true).is_ok());
}

#[test]
fn test_report_missing_workbook_fails() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path().join("missing.xlsx"));
    let err = report(&config, vec![], false).unwrap_err();
    assert!(err.is_load_error());
}

#[test]
fn test_html_command_writes_page() {
    let dir = TempDir::new().unwrap();
    let config = config_for(write_workbook(&dir));
    let output = dir.path().join("painel.html");

    html(&config, vec!["X".to_string()], output.clone(), false).unwrap();

    let page = fs::read_to_string(&output).unwrap();
    assert!(page.contains("INDICADORES - BBT"));
    assert!(page.contains("10,00"));
    assert!(page.contains("Gerado em"));
    assert!(page.contains("disabled"));
}

#[test]
fn test_export_command_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let config = config_for(write_workbook(&dir));
    let output = dir.path().join("resumo.xlsx");

    export(&config, vec![], output.clone(), true).unwrap();

    let table = crate::excel::load_sheet(&output, "Cidades").unwrap();
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_trend_and_cities_commands() {
    let dir = TempDir::new().unwrap();
    let config = config_for(write_workbook(&dir));
    assert!(trend(&config, true).is_ok());
    assert!(cities(&config).is_ok());
}

#[test]
fn test_watch_missing_workbook_fails_fast() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path().join("missing.xlsx"));
    let result = watch(&config, vec![], dir.path().join("out.html"), false);
    assert!(matches!(result, Err(PainelError::Workbook { .. })));
}
