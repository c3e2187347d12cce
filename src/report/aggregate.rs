use serde::Serialize;
use std::collections::BTreeMap;

use super::FilteredView;
use crate::config::NoteMode;
use crate::format::pt_br;

/// Totals over a filtered view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub total_weight: f64,
    pub total_notes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_per_capita: Option<f64>,
}

/// Totals already rendered in the pt-BR convention
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormattedSummary {
    pub total_weight: String,
    pub total_notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_per_capita: Option<String>,
}

impl Summary {
    pub fn formatted(&self) -> FormattedSummary {
        FormattedSummary {
            total_weight: pt_br(self.total_weight, 2),
            total_notes: pt_br(self.total_notes, 2),
            total_per_capita: self.total_per_capita.map(|v| pt_br(v, 4)),
        }
    }
}

/// One bar of the stacked city chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityGroup {
    pub city: String,
    pub weight: f64,
    pub notes: f64,
}

impl CityGroup {
    pub fn stacked_total(&self) -> f64 {
        self.weight + self.notes
    }
}

fn reduce_notes(notes: impl Iterator<Item = Option<f64>>, mode: NoteMode) -> f64 {
    match mode {
        NoteMode::Count => notes.flatten().count() as f64,
        NoteMode::Sum => notes.flatten().sum(),
    }
}

/// Compute the callout totals
///
/// Missing measures are skipped. The per-capita total is only present when
/// the profile maps a per-capita column.
pub fn summarize(view: &FilteredView<'_>, note_mode: NoteMode, with_per_capita: bool) -> Summary {
    Summary {
        rows: view.len(),
        total_weight: view.iter().filter_map(|r| r.weight).sum(),
        total_notes: reduce_notes(view.iter().map(|r| r.note), note_mode),
        total_per_capita: with_per_capita
            .then(|| view.iter().filter_map(|r| r.per_capita).sum()),
    }
}

/// Per-city weight sum and note count-or-sum, ordered by city name
///
/// Cities without rows in the view do not appear.
pub fn group_by_city(view: &FilteredView<'_>, note_mode: NoteMode) -> Vec<CityGroup> {
    let mut groups: BTreeMap<&str, (f64, Vec<Option<f64>>)> = BTreeMap::new();
    for record in view.iter() {
        let entry = groups.entry(record.city.as_str()).or_default();
        entry.0 += record.weight.unwrap_or(0.0);
        entry.1.push(record.note);
    }

    groups
        .into_iter()
        .map(|(city, (weight, notes))| CityGroup {
            city: city.to_string(),
            weight,
            notes: reduce_notes(notes.into_iter(), note_mode),
        })
        .collect()
}
