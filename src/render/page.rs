//! Dashboard page rendering
//!
//! Produces one self-contained HTML document: header, logo banner, sidebar
//! city filter, metric callouts and the two inline SVG charts. The same
//! renderer backs the HTTP server (interactive form) and the CLI's static
//! export (read-only sidebar).

use crate::config::ReportProfile;
use crate::report::Report;

use super::chart::{escape_xml as html_escape, stacked_bar_svg, trend_line_svg};

/// Options that differ between the served page and a file export
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// `src` for the banner image; no banner when `None`
    pub logo_src: Option<String>,
    /// Render the sidebar as a submittable filter form
    pub interactive: bool,
    /// Footer note (e.g. generation timestamp)
    pub footer: Option<String>,
}

/// Render the full dashboard page
pub fn render_dashboard(report: &Report, profile: &ReportProfile, options: &PageOptions) -> String {
    let labels = &profile.labels;
    let note_column = &profile.columns.note;
    let weight_column = &profile.columns.weight;

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    {sidebar}
    <main>
        <header><h1>{title}</h1></header>
        {banner}
        {callouts}
        <hr>
        <section class="chart" id="city-chart">{bar_chart}</section>
        <section class="chart" id="trend-chart">{trend_chart}</section>
        {excluded}
        {footer}
    </main>
</body>
</html>"#,
        title = html_escape(&labels.header),
        css = inline_css(),
        sidebar = render_sidebar(report, options.interactive),
        banner = render_banner(options.logo_src.as_deref(), &labels.logo_caption),
        callouts = render_callouts(report, profile),
        bar_chart = stacked_bar_svg(&report.groups, &labels.bar_title, weight_column, note_column),
        trend_chart = trend_line_svg(&report.trend.points, &labels.trend_title, report.trend_y_range),
        excluded = render_excluded(report),
        footer = options
            .footer
            .as_deref()
            .map(|f| format!("<footer>{}</footer>", html_escape(f)))
            .unwrap_or_default(),
    )
}

/// Explicit diagnostic shown instead of the dashboard when loading fails
pub fn render_error_page(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <main>
        <header><h1>{title}</h1></header>
        <div class="error" role="alert">
            <h2>Não foi possível carregar o painel</h2>
            <pre>{message}</pre>
        </div>
    </main>
</body>
</html>"#,
        title = html_escape(title),
        css = inline_css(),
        message = html_escape(message),
    )
}

fn render_sidebar(report: &Report, interactive: bool) -> String {
    let options: String = report
        .available_cities
        .iter()
        .map(|city| {
            let checked = if report.selected_cities.contains(city) {
                " checked"
            } else {
                ""
            };
            let disabled = if interactive { "" } else { " disabled" };
            format!(
                r#"<label><input type="checkbox" name="cidade" value="{value}"{checked}{disabled}> {value}</label>"#,
                value = html_escape(city),
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    if interactive {
        format!(
            r#"<aside>
        <h2>Filtro por cidades:</h2>
        <form method="get" action="/">
            <p>Filtro por cidade:</p>
            <input type="hidden" name="todas" value="0">
            {options}
            <button type="submit">Aplicar</button>
        </form>
    </aside>"#
        )
    } else {
        format!(
            r#"<aside>
        <h2>Filtro por cidades:</h2>
        <div class="filter">
            {options}
        </div>
    </aside>"#
        )
    }
}

fn render_banner(logo_src: Option<&str>, caption: &str) -> String {
    match logo_src {
        Some(src) => format!(
            r#"<figure class="banner"><img src="{src}" alt="{caption}"><figcaption>{caption}</figcaption></figure>"#,
            src = html_escape(src),
            caption = html_escape(caption),
        ),
        None => String::new(),
    }
}

fn render_callouts(report: &Report, profile: &ReportProfile) -> String {
    let labels = &profile.labels;
    let mut cards = vec![
        (&labels.weight_total, &report.formatted.total_weight),
        (&labels.note_total, &report.formatted.total_notes),
    ];
    if let Some(per_capita) = report.formatted.total_per_capita.as_ref() {
        cards.push((&labels.per_capita_total, per_capita));
    }

    let body: String = cards
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="callout"><h3>{}</h3><div class="value">{}</div></div>"#,
                html_escape(label),
                html_escape(value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");

    format!(r#"<div class="callouts">{body}</div>"#)
}

fn render_excluded(report: &Report) -> String {
    if report.trend.excluded.is_empty() {
        return String::new();
    }

    let items: String = report
        .trend
        .excluded
        .iter()
        .map(|e| {
            format!(
                "<li>linha {}: '{}' ({})</li>",
                e.row,
                html_escape(&e.label),
                html_escape(&e.reason)
            )
        })
        .collect();

    format!(r#"<details class="excluded"><summary>Meses ignorados no gráfico</summary><ul>{items}</ul></details>"#)
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    display: flex;
    font-family: 'Source Sans Pro', system-ui, 'Segoe UI', sans-serif;
    color: #262730;
    background: #ffffff;
}
aside {
    width: 260px;
    min-height: 100vh;
    padding: 2rem 1rem;
    background: #f0f2f6;
}
aside h2 { font-size: 1.1rem; margin-bottom: 1rem; }
aside label { display: block; margin: 0.25rem 0; }
aside button { margin-top: 1rem; padding: 0.3rem 1rem; }
main { flex: 1; padding: 2rem 3rem; }
header h1 {
    font-size: 2rem;
    padding-bottom: 0.5rem;
    border-bottom: 3px solid green;
    margin-bottom: 1.5rem;
}
.banner img { max-width: 320px; }
.banner figcaption { color: #808495; font-size: 0.85rem; }
.callouts {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
    gap: 1rem;
    margin: 1.5rem 0;
}
.callout h3 { font-size: 1.4rem; }
.callout .value { font-size: 1.6rem; font-weight: 600; }
hr { border: none; border-top: 1px solid #ddd; margin: 1rem 0; }
.chart { margin: 1.5rem 0; }
.excluded { color: #808495; font-size: 0.85rem; }
.error {
    padding: 1rem;
    border: 1px solid #f51717;
    background: #fdecec;
}
.error pre { white-space: pre-wrap; margin-top: 0.5rem; }
footer { margin-top: 2rem; color: #808495; font-size: 0.8rem; }
"#
}
