//! Report profiles and configuration
//!
//! A [`ReportProfile`] carries everything that distinguishes one dashboard
//! variant from another: sheet names, column mapping, how notes are
//! aggregated, whether a per-capita measure exists, and the trend axis range.
//! Two presets ship built in (`bbt` and `habi`); anything else comes from a
//! YAML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PainelError, PainelResult};

pub const DEFAULT_WORKBOOK: &str = "PAINEL DE CONTROLE - BBT V3.xlsx";
pub const DEFAULT_LOGO: &str = "BBT.png";

/// How the note/invoice measure is reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    /// Count the entries that coerce to a number
    Count,
    /// Sum the numeric entries
    Sum,
}

/// Column names inside the workbook sheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub city: String,
    pub weight: String,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_capita: Option<String>,
    pub month: String,
    pub volume: String,
}

/// Display labels for the rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    pub header: String,
    pub logo_caption: String,
    pub weight_total: String,
    pub note_total: String,
    pub per_capita_total: String,
    pub bar_title: String,
    pub trend_title: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            header: "INDICADORES - BBT".to_string(),
            logo_caption: "Big Boss Transportes".to_string(),
            weight_total: "Total Litros".to_string(),
            note_total: "Total Notas".to_string(),
            per_capita_total: "Litros por Habitante".to_string(),
            bar_title: "Cidades - Peso Vs Notas".to_string(),
            trend_title: "Volume Mensal - Peso".to_string(),
        }
    }
}

/// One parameterized dashboard variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProfile {
    pub name: String,
    pub base_sheet: String,
    pub comp_sheet: String,
    pub columns: ColumnMap,
    pub note_mode: NoteMode,
    /// Fixed y-axis range of the monthly trend chart
    pub trend_y_range: [f64; 2],
    #[serde(default)]
    pub labels: Labels,
}

impl ReportProfile {
    /// Variant A: "BASE" sheet, notes counted
    pub fn bbt() -> Self {
        Self {
            name: "bbt".to_string(),
            base_sheet: "BASE".to_string(),
            comp_sheet: "COMP".to_string(),
            columns: ColumnMap {
                city: "Cidade".to_string(),
                weight: "Peso".to_string(),
                note: "Nota".to_string(),
                per_capita: None,
                month: "DATA".to_string(),
                volume: "VOLUME_PESO".to_string(),
            },
            note_mode: NoteMode::Count,
            trend_y_range: [90_000.0, 220_000.0],
            labels: Labels::default(),
        }
    }

    /// Variant B: "HABI" sheet, notes summed, per-capita litres shown
    pub fn habi() -> Self {
        Self {
            name: "habi".to_string(),
            base_sheet: "HABI".to_string(),
            comp_sheet: "COMP".to_string(),
            columns: ColumnMap {
                city: "Cidade".to_string(),
                weight: "Peso".to_string(),
                note: "Nota".to_string(),
                per_capita: Some("Litros_Habitante".to_string()),
                month: "DATA".to_string(),
                volume: "VOLUME_PESO".to_string(),
            },
            note_mode: NoteMode::Sum,
            trend_y_range: [0.0, 220_000.0],
            labels: Labels::default(),
        }
    }

    /// Look up a built-in profile by name
    pub fn preset(name: &str) -> PainelResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "bbt" | "base" => Ok(Self::bbt()),
            "habi" => Ok(Self::habi()),
            other => Err(PainelError::Config(format!(
                "Unknown profile '{}' (expected 'bbt' or 'habi')",
                other
            ))),
        }
    }

    pub fn validate(&self) -> PainelResult<()> {
        let [low, high] = self.trend_y_range;
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(PainelError::Config(format!(
                "trend_y_range must be increasing, got [{}, {}]",
                low, high
            )));
        }
        if self.base_sheet.trim().is_empty() || self.comp_sheet.trim().is_empty() {
            return Err(PainelError::Config("Sheet names must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Full configuration: which files to read and which profile to apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainelConfig {
    pub workbook: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
    pub profile: ReportProfile,
}

impl Default for PainelConfig {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            logo: Some(PathBuf::from(DEFAULT_LOGO)),
            profile: ReportProfile::bbt(),
        }
    }
}

impl PainelConfig {
    /// Read a YAML configuration file
    ///
    /// Relative workbook/logo paths are resolved against the file's directory.
    pub fn from_file(path: &Path) -> PainelResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: PainelConfig = serde_yaml::from_str(&content)?;

        if let Some(dir) = path.parent() {
            if config.workbook.is_relative() {
                config.workbook = dir.join(&config.workbook);
            }
            if let Some(logo) = config.logo.as_mut() {
                if logo.is_relative() {
                    *logo = dir.join(&*logo);
                }
            }
        }

        config.profile.validate()?;
        Ok(config)
    }

    /// Resolve a configuration from optional file, preset and path overrides
    pub fn resolve(
        config_file: Option<&Path>,
        profile: Option<&str>,
        workbook: Option<PathBuf>,
        logo: Option<PathBuf>,
    ) -> PainelResult<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(name) = profile {
            config.profile = ReportProfile::preset(name)?;
        }
        if let Some(path) = workbook {
            config.workbook = path;
        }
        if let Some(path) = logo {
            config.logo = Some(path);
        }

        Ok(config)
    }
}
