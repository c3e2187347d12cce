//! Painel - indicators dashboard built from an Excel workbook
//!
//! Reads a base sheet (one record per shipment, with city, weight and note
//! columns) and a comparison sheet (monthly volume), lets the caller pick a
//! subset of cities, and produces totals, a per-city breakdown and a monthly
//! trend in calendar order.
//!
//! # Features
//!
//! - Two built-in report profiles (`bbt`, `habi`) or a YAML-defined one
//! - Sheet cache keyed by workbook path and sheet, invalidated on file change
//! - Brazilian Portuguese number formatting independent of the host locale
//! - Dashboard page with inline SVG charts, Excel export, JSON API
//!
//! # Example
//!
//! ```no_run
//! use painel::config::PainelConfig;
//! use painel::excel::WorkbookCache;
//! use painel::report::{load_report, CitySelection};
//!
//! let config = PainelConfig::default();
//! let cache = WorkbookCache::new();
//! let selection = CitySelection::of(["Recife"]);
//! let report = load_report(&cache, &config, Some(&selection))?;
//!
//! println!("Total: {}", report.formatted.total_weight);
//! # Ok::<(), painel::error::PainelError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod format;
pub mod logging;
pub mod render;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::{PainelConfig, ReportProfile};
pub use error::{PainelError, PainelResult};
pub use report::{CitySelection, Report};
pub use types::{CellValue, SheetTable};
