//! Presentation: inline SVG charts and the HTML dashboard page

pub mod chart;
pub mod page;

pub use chart::{stacked_bar_svg, trend_line_svg};
pub use page::{render_dashboard, render_error_page, PageOptions};
