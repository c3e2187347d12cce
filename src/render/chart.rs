//! Inline SVG charts: stacked city bars and the monthly trend line

use std::fmt::Write;

use crate::format::si_abbrev;
use crate::report::{CityGroup, TrendPoint};

pub const WEIGHT_COLOR: &str = "green";
pub const NOTE_COLOR: &str = "#f51717";
pub const TREND_COLOR: &str = "green";

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 130.0;
const MARGIN_TOP: f64 = 56.0;
const MARGIN_BOTTOM: f64 = 70.0;
const FONT: &str = "font-family='Source Sans Pro, Segoe UI, sans-serif'";

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Round a raw tick step up to 1, 2 or 5 times a power of ten
fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick values covering [low, high]
pub fn axis_ticks(low: f64, high: f64, target: usize) -> Vec<f64> {
    if !(high > low) {
        return vec![low];
    }
    let step = nice_step((high - low) / target.max(1) as f64);
    let mut tick = (low / step).ceil() * step;
    let mut ticks = Vec::new();
    while tick <= high + step * 1e-9 {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

struct Plot {
    low: f64,
    high: f64,
}

impl Plot {
    fn inner_width(&self) -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn inner_height(&self) -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn y(&self, value: f64) -> f64 {
        let span = self.high - self.low;
        MARGIN_TOP + self.inner_height() * (1.0 - (value - self.low) / span)
    }

    fn open(&self, svg: &mut String, title: &str, y_label: &str, x_label: &str) {
        // No background rect: the chart is transparent
        let _ = writeln!(
            svg,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{WIDTH:.0}' height='{HEIGHT:.0}' viewBox='0 0 {WIDTH:.0} {HEIGHT:.0}' role='img'>"
        );
        let _ = writeln!(
            svg,
            "  <text x='{MARGIN_LEFT:.0}' y='28' {FONT} font-size='17' fill='#262730'>{}</text>",
            escape_xml(title)
        );
        let _ = writeln!(
            svg,
            "  <text transform='translate(18 {:.1}) rotate(-90)' text-anchor='middle' {FONT} font-size='13' fill='#555'>{}</text>",
            MARGIN_TOP + self.inner_height() / 2.0,
            escape_xml(y_label)
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' text-anchor='middle' {FONT} font-size='13' fill='#555'>{}</text>",
            MARGIN_LEFT + self.inner_width() / 2.0,
            HEIGHT - 12.0,
            escape_xml(x_label)
        );

        // y axis ticks, no gridlines
        for tick in axis_ticks(self.low, self.high, 5) {
            let y = self.y(tick);
            let _ = writeln!(
                svg,
                "  <text x='{:.1}' y='{:.1}' text-anchor='end' {FONT} font-size='11' fill='#555'>{}</text>",
                MARGIN_LEFT - 8.0,
                y + 4.0,
                escape_xml(&si_abbrev(tick, 2))
            );
        }
        let _ = writeln!(
            svg,
            "  <line x1='{MARGIN_LEFT:.0}' y1='{:.1}' x2='{:.1}' y2='{:.1}' stroke='#bbb'/>",
            HEIGHT - MARGIN_BOTTOM,
            WIDTH - MARGIN_RIGHT,
            HEIGHT - MARGIN_BOTTOM
        );
    }

    fn x_label(&self, svg: &mut String, x: f64, label: &str) {
        let _ = writeln!(
            svg,
            "  <text x='{x:.1}' y='{:.1}' text-anchor='middle' {FONT} font-size='11' fill='#555'>{}</text>",
            HEIGHT - MARGIN_BOTTOM + 18.0,
            escape_xml(label)
        );
    }
}

/// Stacked bar chart: weight (green) under notes (red) per city
pub fn stacked_bar_svg(
    groups: &[CityGroup],
    title: &str,
    weight_label: &str,
    note_label: &str,
) -> String {
    let max_total = groups
        .iter()
        .map(CityGroup::stacked_total)
        .fold(0.0_f64, f64::max);
    let high = if max_total > 0.0 {
        let padded = max_total * 1.05;
        let step = nice_step(padded / 5.0);
        (padded / step).ceil() * step
    } else {
        1.0
    };
    let plot = Plot { low: 0.0, high };

    let mut svg = String::new();
    plot.open(&mut svg, title, "Peso-Nota", "Cidade");

    let slot = plot.inner_width() / groups.len().max(1) as f64;
    let bar_width = (slot * 0.7).min(80.0);
    for (index, group) in groups.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (index as f64 + 0.5);
        let x = center - bar_width / 2.0;
        let weight_top = plot.y(group.weight.max(0.0));
        let stack_top = plot.y(group.weight.max(0.0) + group.notes.max(0.0));
        let base = plot.y(0.0);

        let _ = writeln!(
            svg,
            "  <rect class='bar-weight' x='{x:.1}' y='{weight_top:.1}' width='{bar_width:.1}' height='{:.1}' fill='{WEIGHT_COLOR}'><title>{}: {}</title></rect>",
            base - weight_top,
            escape_xml(&group.city),
            group.weight
        );
        let _ = writeln!(
            svg,
            "  <rect class='bar-note' x='{x:.1}' y='{stack_top:.1}' width='{bar_width:.1}' height='{:.1}' fill='{NOTE_COLOR}'><title>{}: {}</title></rect>",
            weight_top - stack_top,
            escape_xml(&group.city),
            group.notes
        );
        plot.x_label(&mut svg, center, &group.city);
    }

    // Legend
    let legend_x = WIDTH - MARGIN_RIGHT + 16.0;
    let _ = writeln!(
        svg,
        "  <text x='{legend_x:.0}' y='{MARGIN_TOP:.0}' {FONT} font-size='12' fill='#262730'>Categoria</text>"
    );
    for (offset, (label, color)) in [(weight_label, WEIGHT_COLOR), (note_label, NOTE_COLOR)]
        .iter()
        .enumerate()
    {
        let y = MARGIN_TOP + 18.0 + offset as f64 * 20.0;
        let _ = writeln!(
            svg,
            "  <rect x='{legend_x:.0}' y='{:.0}' width='12' height='12' fill='{color}'/>",
            y - 10.0
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.0}' y='{y:.0}' {FONT} font-size='12' fill='#262730'>{}</text>",
            legend_x + 18.0,
            escape_xml(label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Single-series line chart with SI-abbreviated labels above each point
///
/// The y axis is fixed to `y_range`; points outside it are clipped.
pub fn trend_line_svg(points: &[TrendPoint], title: &str, y_range: [f64; 2]) -> String {
    let plot = Plot {
        low: y_range[0],
        high: y_range[1],
    };

    let mut svg = String::new();
    plot.open(&mut svg, title, "VOLUME_PESO", "DATA");
    let _ = writeln!(
        svg,
        "  <defs><clipPath id='trend-area'><rect x='{MARGIN_LEFT:.0}' y='{MARGIN_TOP:.0}' width='{:.0}' height='{:.0}'/></clipPath></defs>",
        plot.inner_width(),
        plot.inner_height()
    );

    let slot = plot.inner_width() / points.len().max(1) as f64;
    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(index, p)| (MARGIN_LEFT + slot * (index as f64 + 0.5), plot.y(p.volume)))
        .collect();

    if !coords.is_empty() {
        let path: Vec<String> = coords
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect();
        let _ = writeln!(
            svg,
            "  <polyline class='trend-line' clip-path='url(#trend-area)' points='{}' fill='none' stroke='{TREND_COLOR}' stroke-width='2'/>",
            path.join(" ")
        );
    }

    for (point, (x, y)) in points.iter().zip(&coords) {
        let _ = writeln!(
            svg,
            "  <g clip-path='url(#trend-area)'><circle cx='{x:.1}' cy='{y:.1}' r='3.5' fill='{TREND_COLOR}'/><text class='point-label' x='{x:.1}' y='{:.1}' text-anchor='middle' {FONT} font-size='11' fill='#262730'>{}</text></g>",
            y - 9.0,
            escape_xml(&si_abbrev(point.volume, 2))
        );
        plot.x_label(&mut svg, *x, &point.month);
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ticks() {
        assert_eq!(
            axis_ticks(90_000.0, 220_000.0, 5),
            vec![100_000.0, 150_000.0, 200_000.0]
        );
        assert_eq!(axis_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(axis_ticks(5.0, 5.0, 5), vec![5.0]);
    }

    #[test]
    fn test_stacked_bars_one_pair_per_city() {
        let groups = vec![
            CityGroup {
                city: "X".to_string(),
                weight: 10.0,
                notes: 1.0,
            },
            CityGroup {
                city: "Y & Z".to_string(),
                weight: 20.0,
                notes: 0.0,
            },
        ];
        let svg = stacked_bar_svg(&groups, "Cidades - Peso Vs Notas", "Peso", "Nota");

        assert_eq!(svg.matches("class='bar-weight'").count(), 2);
        assert_eq!(svg.matches("class='bar-note'").count(), 2);
        assert!(svg.contains(NOTE_COLOR));
        assert!(svg.contains("Y &amp; Z"));
        assert!(!svg.contains("<rect width"), "background must stay transparent");
    }

    #[test]
    fn test_trend_labels_abbreviated() {
        let points = vec![
            TrendPoint {
                month: "set-22".to_string(),
                volume: 150_000.0,
            },
            TrendPoint {
                month: "out-22".to_string(),
                volume: 95_432.0,
            },
        ];
        let svg = trend_line_svg(&points, "Volume Mensal - Peso", [90_000.0, 220_000.0]);

        assert!(svg.contains(">150k</text>"));
        assert!(svg.contains(">95k</text>"));
        assert_eq!(svg.matches("class='point-label'").count(), 2);
        assert!(svg.contains("set-22"));
    }

    #[test]
    fn test_empty_inputs_still_render() {
        assert!(stacked_bar_svg(&[], "t", "a", "b").ends_with("</svg>\n"));
        assert!(!trend_line_svg(&[], "t", [0.0, 1.0]).contains("polyline"));
    }
}
