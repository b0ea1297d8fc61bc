//! Plotters-powered growth bar chart widget for Ratatui.
//!
//! One horizontal bar per growth period, 10 YRS at the top, TTM at the bottom.
//! Plotters output is drawn into the Ratatui buffer via `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{GrowthPeriod, GrowthSeries};

/// Render-only chart description; bounds are derived from the series.
pub struct GrowthBarChart<'a> {
    pub series: &'a GrowthSeries,
    pub color: RGBColor,
}

impl GrowthBarChart<'_> {
    /// X range always contains zero so negative growth extends left of the axis.
    fn x_bounds(&self) -> (f64, f64) {
        let (mut lo, mut hi) = (0.0_f64, 0.0_f64);
        for (_, v) in self.series.iter() {
            lo = lo.min(v as f64);
            hi = hi.max(v as f64);
        }
        if hi - lo < 1.0 {
            hi = lo + 1.0;
        }
        let pad = (hi - lo) * 0.05;
        (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
    }
}

/// Segment index for a period: 10 YRS occupies the top segment.
fn segment_of(period: GrowthPeriod) -> u32 {
    (GrowthPeriod::ALL.len() - 1 - period.index()) as u32
}

fn period_at_segment(segment: u32) -> Option<GrowthPeriod> {
    GrowthPeriod::ALL.into_iter().find(|p| segment_of(*p) == segment)
}

impl Widget for GrowthBarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let (x0, x1) = self.x_bounds();
        let n = GrowthPeriod::ALL.len() as u32;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, (0u32..n).into_segmented())?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}%"))
                .y_label_formatter(&|v| match v {
                    SegmentValue::CenterOf(s) => period_at_segment(*s)
                        .map(|p| p.display_name().to_string())
                        .unwrap_or_default(),
                    _ => String::new(),
                })
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            let color = self.color;
            chart.draw_series(self.series.iter().map(|(period, v)| {
                let s = segment_of(period);
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(s)), (v as f64, SegmentValue::Exact(s + 1))],
                    ShapeStyle::from(&color).filled(),
                );
                bar.set_margin(1, 1, 0, 0);
                bar
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
