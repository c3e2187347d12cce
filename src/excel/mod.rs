//! Excel import/export
//!
//! - Load: named sheets of the source workbook → [`SheetTable`](crate::types::SheetTable),
//!   memoized per (file, sheet) by [`WorkbookCache`]
//! - Export: computed report → `.xlsx` summary workbook

mod exporter;
mod loader;

pub use exporter::ReportExporter;
pub use loader::{load_sheet, CacheKey, WorkbookCache};
