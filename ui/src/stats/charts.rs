//! SVG chart rendering for the statistics page.
//!
//! Charts are drawn with the plotters SVG string backend and injected into
//! the page via `dangerous_inner_html`, so the same code serves the web and
//! desktop shells.

use plotters::prelude::*;

use super::aggregate::{ConfidenceBucket, DailyCount, ErrorBucket, MonthlyCount};

/// Matches the viable/non-viable accents in the theme.
const VIABLE_COLOR: RGBColor = RGBColor(34, 197, 94);
const NON_VIABLE_COLOR: RGBColor = RGBColor(239, 68, 68);
const ACCENT_COLOR: RGBColor = RGBColor(59, 130, 246);

const CHART_SIZE: (u32, u32) = (640, 320);

/// Daily analysis: paired viable / non-viable bars per calendar day.
pub fn daily_chart_svg(daily: &[DailyCount]) -> Result<String, String> {
    if daily.is_empty() {
        return Err("no daily data to plot".into());
    }

    let labels: Vec<String> = daily.iter().map(|d| d.date.clone()).collect();
    let max = daily
        .iter()
        .map(|d| d.viable.max(d.non_viable))
        .max()
        .unwrap_or(1)
        .max(1) as f64;

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("failed to fill chart background: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .caption("Daily analysis", ("sans-serif", 20).into_font())
            .build_cartesian_2d(-0.5f64..labels.len() as f64 - 0.5, 0.0f64..max * 1.1)
            .map_err(|e| format!("failed to build daily chart: {e}"))?;

        let formatter = index_label_formatter(&labels);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().min(10))
            .x_label_formatter(&formatter)
            .y_desc("Eggs")
            .draw()
            .map_err(|e| format!("failed to draw daily axes: {e}"))?;

        chart
            .draw_series(daily.iter().enumerate().map(|(i, day)| {
                let x = i as f64;
                Rectangle::new(
                    [(x - 0.35, 0.0), (x - 0.03, day.viable as f64)],
                    VIABLE_COLOR.filled(),
                )
            }))
            .map_err(|e| format!("failed to plot viable bars: {e}"))?
            .label("Viable")
            .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], VIABLE_COLOR.filled()));

        chart
            .draw_series(daily.iter().enumerate().map(|(i, day)| {
                let x = i as f64;
                Rectangle::new(
                    [(x + 0.03, 0.0), (x + 0.35, day.non_viable as f64)],
                    NON_VIABLE_COLOR.filled(),
                )
            }))
            .map_err(|e| format!("failed to plot non-viable bars: {e}"))?
            .label("Non-viable")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 4), (x + 12, y + 4)], NON_VIABLE_COLOR.filled())
            });

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| format!("failed to draw daily legend: {e}"))?;

        root.present()
            .map_err(|e| format!("failed to finalise daily chart: {e}"))?;
    }

    Ok(buffer)
}

/// Monthly trend: viable and non-viable line series in calendar order.
pub fn monthly_chart_svg(monthly: &[MonthlyCount]) -> Result<String, String> {
    if monthly.is_empty() {
        return Err("no monthly data to plot".into());
    }

    let labels: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
    let max = monthly
        .iter()
        .map(|m| m.viable.max(m.non_viable))
        .max()
        .unwrap_or(1)
        .max(1) as f64;

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("failed to fill chart background: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .caption("Monthly trend", ("sans-serif", 20).into_font())
            .build_cartesian_2d(-0.5f64..labels.len() as f64 - 0.5, 0.0f64..max * 1.1)
            .map_err(|e| format!("failed to build monthly chart: {e}"))?;

        let formatter = index_label_formatter(&labels);
        chart
            .configure_mesh()
            .x_labels(labels.len().min(12))
            .x_label_formatter(&formatter)
            .y_desc("Eggs")
            .draw()
            .map_err(|e| format!("failed to draw monthly axes: {e}"))?;

        chart
            .draw_series(LineSeries::new(
                monthly
                    .iter()
                    .enumerate()
                    .map(|(i, m)| (i as f64, m.viable as f64)),
                VIABLE_COLOR.stroke_width(2),
            ))
            .map_err(|e| format!("failed to plot viable series: {e}"))?
            .label("Viable")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], VIABLE_COLOR));

        chart
            .draw_series(LineSeries::new(
                monthly
                    .iter()
                    .enumerate()
                    .map(|(i, m)| (i as f64, m.non_viable as f64)),
                NON_VIABLE_COLOR.stroke_width(2),
            ))
            .map_err(|e| format!("failed to plot non-viable series: {e}"))?
            .label("Non-viable")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], NON_VIABLE_COLOR));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| format!("failed to draw monthly legend: {e}"))?;

        root.present()
            .map_err(|e| format!("failed to finalise monthly chart: {e}"))?;
    }

    Ok(buffer)
}

/// Confidence distribution: one bar per fixed bucket.
pub fn confidence_chart_svg(buckets: &[ConfidenceBucket]) -> Result<String, String> {
    let labels: Vec<String> = buckets.iter().map(|b| b.range.to_string()).collect();
    let values: Vec<f64> = buckets.iter().map(|b| b.count as f64).collect();
    bar_chart_svg("Confidence distribution", &labels, &values, ACCENT_COLOR)
}

/// Error analysis over non-viable records: one bar per non-empty bucket.
pub fn error_chart_svg(errors: &[ErrorBucket]) -> Result<String, String> {
    let labels: Vec<String> = errors.iter().map(|e| e.label.to_string()).collect();
    let values: Vec<f64> = errors.iter().map(|e| e.count as f64).collect();
    bar_chart_svg("Error analysis", &labels, &values, NON_VIABLE_COLOR)
}

fn bar_chart_svg(
    title: &str,
    labels: &[String],
    values: &[f64],
    color: RGBColor,
) -> Result<String, String> {
    if labels.is_empty() {
        return Err("no data to plot".into());
    }

    let max = values.iter().copied().fold(0.0f64, f64::max).max(1.0);

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("failed to fill chart background: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .caption(title, ("sans-serif", 20).into_font())
            .build_cartesian_2d(-0.5f64..labels.len() as f64 - 0.5, 0.0f64..max * 1.1)
            .map_err(|e| format!("failed to build chart: {e}"))?;

        let formatter = index_label_formatter(labels);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&formatter)
            .y_desc("Count")
            .draw()
            .map_err(|e| format!("failed to draw axes: {e}"))?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, &value)| {
                let x = i as f64;
                Rectangle::new([(x - 0.3, 0.0), (x + 0.3, value)], color.filled())
            }))
            .map_err(|e| format!("failed to plot bars: {e}"))?;

        root.present()
            .map_err(|e| format!("failed to finalise chart: {e}"))?;
    }

    Ok(buffer)
}

/// Tick formatter that shows a category label only at (near-)integer ticks.
fn index_label_formatter(labels: &[String]) -> impl Fn(&f64) -> String + '_ {
    move |x: &f64| {
        let nearest = x.round();
        if (x - nearest).abs() < 0.25 && nearest >= 0.0 && (nearest as usize) < labels.len() {
            labels[nearest as usize].clone()
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(date: &str, viable: u32, non_viable: u32) -> DailyCount {
        DailyCount {
            date: date.into(),
            viable,
            non_viable,
            total: viable + non_viable,
        }
    }

    #[test]
    fn daily_chart_produces_svg() {
        let svg = daily_chart_svg(&[daily("2024-01-01", 3, 1), daily("2024-01-02", 2, 2)]).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("Daily analysis"));
    }

    #[test]
    fn empty_daily_data_is_an_error_not_a_panic() {
        assert!(daily_chart_svg(&[]).is_err());
    }

    #[test]
    fn monthly_chart_produces_svg() {
        let monthly = vec![
            MonthlyCount {
                month: "Jan",
                processed: 4,
                viable: 3,
                non_viable: 1,
            },
            MonthlyCount {
                month: "Feb",
                processed: 2,
                viable: 1,
                non_viable: 1,
            },
        ];
        let svg = monthly_chart_svg(&monthly).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Monthly trend"));
    }

    #[test]
    fn confidence_chart_renders_all_buckets() {
        let buckets = vec![
            ConfidenceBucket {
                range: "90-100%",
                count: 2,
                percentage: 50.0,
            },
            ConfidenceBucket {
                range: "<60%",
                count: 2,
                percentage: 50.0,
            },
        ];
        let svg = confidence_chart_svg(&buckets).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Confidence distribution"));
    }

    #[test]
    fn error_chart_with_no_buckets_is_an_error() {
        assert!(error_chart_svg(&[]).is_err());
    }
}
