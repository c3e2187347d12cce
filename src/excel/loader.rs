//! Workbook loader - Excel (.xlsx) sheet → in-memory table, with caching

use crate::error::{PainelError, PainelResult};
use crate::types::{CellValue, SheetTable};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use tracing::{debug, info};

/// Read one named sheet from a workbook
///
/// The first row of the sheet's used range is the header; every following
/// row is a record. Rows with no non-empty cell are dropped.
pub fn load_sheet(path: &Path, sheet: &str) -> PainelResult<SheetTable> {
    if !path.exists() {
        return Err(PainelError::Workbook {
            path: path.to_path_buf(),
            message: "file not found".to_string(),
        });
    }

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: calamine::XlsxError| PainelError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let names = workbook.sheet_names();
    let sheet_name = names
        .iter()
        .find(|name| name.as_str() == sheet)
        .or_else(|| {
            names
                .iter()
                .find(|name| name.trim().eq_ignore_ascii_case(sheet.trim()))
        })
        .cloned()
        .ok_or_else(|| PainelError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| PainelError::Workbook {
            path: path.to_path_buf(),
            message: format!("failed to read sheet '{}': {}", sheet_name, e),
        })?;

    Ok(range_to_table(sheet, &range))
}

fn range_to_table(sheet: &str, range: &Range<Data>) -> SheetTable {
    let (height, width) = range.get_size();
    if height == 0 {
        return SheetTable::new(sheet, Vec::new());
    }

    let headers: Vec<String> = (0..width)
        .map(|col| match range.get((0, col)) {
            Some(Data::String(s)) => s.trim().to_string(),
            Some(Data::Int(i)) => i.to_string(),
            Some(Data::Float(f)) => f.to_string(),
            _ => format!("col_{}", col),
        })
        .collect();

    let mut table = SheetTable::new(sheet, headers);
    for row in 1..height {
        let cells: Vec<CellValue> = (0..width)
            .map(|col| range.get((row, col)).map_or(CellValue::Empty, convert_cell))
            .collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    table
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

//==============================================================================
// Cache
//==============================================================================

/// Cache key: canonical workbook path plus sheet name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub sheet: String,
}

struct CacheEntry {
    modified: Option<SystemTime>,
    table: Arc<SheetTable>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    reads: u64,
}

/// Memoizes loaded sheets per (file, sheet)
///
/// An entry stays valid while the file's modification time is unchanged.
/// Each server or CLI invocation owns its own cache.
#[derive(Default)]
pub struct WorkbookCache {
    state: Mutex<CacheState>,
}

impl WorkbookCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached sheet, reading the workbook on a miss or when the
    /// file changed on disk since it was cached
    pub fn load(&self, path: &Path, sheet: &str) -> PainelResult<Arc<SheetTable>> {
        let key = Self::key(path, sheet)?;
        let modified = fs::metadata(&key.path)?.modified().ok();

        let mut state = self.lock();
        if let Some(entry) = state.entries.get(&key) {
            if entry.modified == modified {
                debug!(path = %key.path.display(), sheet, "workbook cache hit");
                return Ok(Arc::clone(&entry.table));
            }
            info!(path = %key.path.display(), sheet, "workbook changed on disk, reloading");
        }

        let table = Arc::new(load_sheet(&key.path, sheet)?);
        state.reads += 1;
        info!(
            path = %key.path.display(),
            sheet,
            rows = table.row_count(),
            "loaded sheet"
        );
        state.entries.insert(
            key,
            CacheEntry {
                modified,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&self, path: &Path, sheet: &str) -> bool {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let key = CacheKey {
            path,
            sheet: sheet.to_string(),
        };
        self.lock().entries.remove(&key).is_some()
    }

    /// Drop every entry belonging to a workbook; returns how many were removed
    pub fn invalidate_file(&self, path: &Path) -> usize {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|key, _| key.path != path);
        before - state.entries.len()
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of times a workbook was actually read from disk
    pub fn reads(&self) -> u64 {
        self.lock().reads
    }

    fn key(path: &Path, sheet: &str) -> PainelResult<CacheKey> {
        let path = path.canonicalize().map_err(|e| PainelError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(CacheKey {
            path,
            sheet: sheet.to_string(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_variants() {
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_cell(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            convert_cell(&Data::String("N/A".to_string())),
            CellValue::Text("N/A".to_string())
        );
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_range_to_table_skips_blank_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Cidade".to_string()));
        range.set_value((0, 1), Data::String("Peso".to_string()));
        range.set_value((1, 0), Data::String("X".to_string()));
        range.set_value((1, 1), Data::Float(10.0));
        range.set_value((3, 0), Data::String("Y".to_string()));

        let table = range_to_table("BASE", &range);

        assert_eq!(table.headers, vec!["Cidade", "Peso"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 0), &CellValue::Text("Y".to_string()));
        assert_eq!(table.cell(1, 1), &CellValue::Empty);
    }

    #[test]
    fn test_load_missing_file_is_workbook_error() {
        let err = load_sheet(Path::new("/nonexistent/painel.xlsx"), "BASE").unwrap_err();
        assert!(matches!(err, PainelError::Workbook { .. }));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_cache_missing_file_is_workbook_error() {
        let cache = WorkbookCache::new();
        let err = cache
            .load(Path::new("/nonexistent/painel.xlsx"), "BASE")
            .unwrap_err();
        assert!(matches!(err, PainelError::Workbook { .. }));
        assert!(cache.is_empty());
        assert_eq!(cache.reads(), 0);
    }
}
