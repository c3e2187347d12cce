use crate::config::PainelConfig;
use crate::error::{PainelError, PainelResult};
use crate::excel::{ReportExporter, WorkbookCache};
use crate::format::pt_br;
use crate::render::{render_dashboard, PageOptions};
use crate::report::{load_report, CitySelection, Report};
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// `-c/--city` values; none given means every city
fn selection_from_args(cities: &[String]) -> Option<CitySelection> {
    if cities.is_empty() {
        None
    } else {
        Some(CitySelection::of(cities.iter().cloned()))
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%d/%m/%Y %H:%M:%S").to_string()
}

fn print_header(title: &str, config: &PainelConfig) {
    println!("{}", format!("📊 Painel - {}", title).bold().green());
    println!("   Workbook: {}", config.workbook.display());
    println!("   Profile:  {}\n", config.profile.name.bright_yellow());
}

fn print_unknown_cities(report: &Report) {
    let unknown: Vec<&String> = report
        .selected_cities
        .iter()
        .filter(|city| !report.available_cities.contains(city))
        .collect();
    for city in unknown {
        println!("   {} city '{}' not in workbook, ignored", "⚠️ ".yellow(), city);
    }
}

/// Execute the report command - totals and per-city table
pub fn report(config: &PainelConfig, cities: Vec<String>, verbose: bool) -> PainelResult<()> {
    print_header("Report", config);

    let cache = WorkbookCache::new();
    let selection = selection_from_args(&cities);
    let report = load_report(&cache, config, selection.as_ref())?;
    let labels = &config.profile.labels;

    if verbose {
        println!(
            "   {} of {} cities selected, {} rows\n",
            report.selected_cities.len(),
            report.available_cities.len(),
            report.summary.rows
        );
    }
    print_unknown_cities(&report);

    println!("{}", labels.header.bold().cyan());
    println!(
        "   {:<24}{}",
        labels.weight_total,
        report.formatted.total_weight.bold().green()
    );
    println!(
        "   {:<24}{}",
        labels.note_total,
        report.formatted.total_notes.bold().green()
    );
    if let Some(per_capita) = &report.formatted.total_per_capita {
        println!(
            "   {:<24}{}",
            labels.per_capita_total,
            per_capita.bold().green()
        );
    }

    println!("\n{}", labels.bar_title.bold().cyan());
    println!("{}", "─".repeat(56));
    println!(
        "{:<24}{:>16}{:>16}",
        config.profile.columns.city.bold(),
        config.profile.columns.weight.bold(),
        config.profile.columns.note.bold()
    );
    println!("{}", "─".repeat(56));
    if report.groups.is_empty() {
        println!("{}", "   (nenhuma cidade selecionada)".dimmed());
    }
    for group in &report.groups {
        println!(
            "{:<24}{:>16}{:>16}",
            group.city.bright_blue(),
            pt_br(group.weight, 2),
            pt_br(group.notes, 2)
        );
    }
    println!("{}", "─".repeat(56));

    Ok(())
}

/// Execute the html command - write the dashboard page to a file
pub fn html(
    config: &PainelConfig,
    cities: Vec<String>,
    output: PathBuf,
    verbose: bool,
) -> PainelResult<()> {
    print_header("HTML Export", config);

    let cache = WorkbookCache::new();
    let selection = selection_from_args(&cities);
    write_dashboard(&cache, config, selection.as_ref(), &output, verbose)?;

    println!("{}", "✅ Dashboard written".bold().green());
    println!("   File: {}\n", output.display());
    Ok(())
}

/// Build the report and write it as a static page
fn write_dashboard(
    cache: &WorkbookCache,
    config: &PainelConfig,
    selection: Option<&CitySelection>,
    output: &Path,
    verbose: bool,
) -> PainelResult<()> {
    let report = load_report(cache, config, selection)?;
    print_unknown_cities(&report);

    let logo_src = match &config.logo {
        Some(path) if path.is_file() => Some(path.display().to_string()),
        Some(path) => {
            tracing::warn!(path = %path.display(), "logo not found, banner omitted");
            None
        }
        None => None,
    };

    let options = PageOptions {
        logo_src,
        interactive: false,
        footer: Some(format!("Gerado em {}", timestamp())),
    };
    let page = render_dashboard(&report, &config.profile, &options);
    fs::write(output, page)?;

    if verbose {
        println!(
            "   {} cities, {} trend points, {} excluded",
            report.groups.len(),
            report.trend.points.len(),
            report.trend.excluded.len()
        );
    }
    Ok(())
}

/// Execute the export command - report to Excel
pub fn export(
    config: &PainelConfig,
    cities: Vec<String>,
    output: PathBuf,
    verbose: bool,
) -> PainelResult<()> {
    print_header("Excel Export", config);

    let cache = WorkbookCache::new();
    let selection = selection_from_args(&cities);
    let report = load_report(&cache, config, selection.as_ref())?;
    print_unknown_cities(&report);

    if verbose {
        println!("{}", "📊 Writing Resumo, Cidades, Mensal...".cyan());
    }

    ReportExporter::new(&report, &config.profile).export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());
    Ok(())
}

/// Execute the cities command - list the filter options
pub fn cities(config: &PainelConfig) -> PainelResult<()> {
    let cache = WorkbookCache::new();
    let report = load_report(&cache, config, None)?;

    for city in &report.available_cities {
        println!("{}", city);
    }
    Ok(())
}

/// Execute the trend command - ordered monthly series
pub fn trend(config: &PainelConfig, verbose: bool) -> PainelResult<()> {
    print_header("Trend", config);

    let cache = WorkbookCache::new();
    let report = load_report(&cache, config, None)?;
    let columns = &config.profile.columns;

    println!("{}", config.profile.labels.trend_title.bold().cyan());
    println!("{}", "─".repeat(32));
    println!("{:<12}{:>20}", columns.month.bold(), columns.volume.bold());
    println!("{}", "─".repeat(32));
    for point in &report.trend.points {
        println!(
            "{:<12}{:>20}",
            point.month.bright_blue(),
            pt_br(point.volume, 2)
        );
    }
    println!("{}", "─".repeat(32));

    if !report.trend.excluded.is_empty() {
        println!(
            "\n{} {} row(s) left out of the chart:",
            "⚠️ ".yellow(),
            report.trend.excluded.len()
        );
        for excluded in &report.trend.excluded {
            println!(
                "   row {}: '{}' ({})",
                excluded.row,
                excluded.label.yellow(),
                excluded.reason
            );
        }
    } else if verbose {
        println!("\n   {}", "All rows in canonical sequence".dimmed());
    }

    Ok(())
}

/// Execute the watch command - regenerate the page on workbook changes
pub fn watch(
    config: &PainelConfig,
    cities: Vec<String>,
    output: PathBuf,
    verbose: bool,
) -> PainelResult<()> {
    println!("{}", "👁️  Painel - Watch Mode".bold().green());
    println!("   Watching: {}", config.workbook.display());
    println!("   Output:   {}", output.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !config.workbook.exists() {
        return Err(PainelError::Workbook {
            path: config.workbook.clone(),
            message: "file not found".to_string(),
        });
    }

    let canonical_path = config.workbook.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| PainelError::Watch("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();

    // Spreadsheet apps save in bursts (temp file, rename, lock file)
    let mut debouncer = new_debouncer(Duration::from_millis(200), tx)
        .map_err(|e| PainelError::Watch(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| PainelError::Watch(format!("Failed to watch directory: {}", e)))?;

    if verbose {
        println!(
            "   {} {}",
            "Watching directory:".cyan(),
            parent_dir.display()
        );
    }

    let cache = WorkbookCache::new();
    let selection = selection_from_args(&cities);

    println!("{}", "🔄 Initial run...".cyan());
    run_watch_action(&cache, config, selection.as_ref(), &output, verbose);
    println!();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && is_watched_file(&event.path, &canonical_path)
                });

                if relevant {
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        timestamp().cyan()
                    );
                    let dropped = cache.invalidate_file(&canonical_path);
                    if verbose {
                        println!("   {} cached sheet(s) dropped", dropped);
                    }
                    run_watch_action(&cache, config, selection.as_ref(), &output, verbose);
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

/// Does a change event refer to the workbook being watched
fn is_watched_file(event_path: &Path, workbook: &Path) -> bool {
    if let Ok(event_canonical) = event_path.canonicalize() {
        if event_canonical == workbook {
            return true;
        }
    }
    // Deleted-then-recreated files no longer canonicalize; compare names
    matches!(
        (event_path.file_name(), workbook.file_name()),
        (Some(a), Some(b)) if a == b
    )
}

fn run_watch_action(
    cache: &WorkbookCache,
    config: &PainelConfig,
    selection: Option<&CitySelection>,
    output: &Path,
    verbose: bool,
) {
    match write_dashboard(cache, config, selection, output, verbose) {
        Ok(()) => println!("{} {}", "✅ Dashboard updated:".green(), output.display()),
        Err(e) => eprintln!("{} {}", "❌".red(), e),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
