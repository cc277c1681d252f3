use crate::GuiError;
use diagrams_core::frame::{BarView, LineSeriesView, PlotBounds, PlotContent};
use diagrams_core::PlotView;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub(crate) fn palette_color(idx: usize) -> egui::Color32 {
    const COLORS: [egui::Color32; 10] = [
        egui::Color32::from_rgb(86, 156, 214),
        egui::Color32::from_rgb(220, 122, 95),
        egui::Color32::from_rgb(181, 206, 168),
        egui::Color32::from_rgb(197, 134, 192),
        egui::Color32::from_rgb(220, 220, 170),
        egui::Color32::from_rgb(156, 220, 254),
        egui::Color32::from_rgb(255, 204, 102),
        egui::Color32::from_rgb(206, 145, 120),
        egui::Color32::from_rgb(78, 201, 176),
        egui::Color32::from_rgb(214, 157, 133),
    ];
    COLORS[idx % COLORS.len()]
}

fn rgb(idx: usize) -> RGBColor {
    let color = palette_color(idx);
    RGBColor(color.r(), color.g(), color.b())
}

/// Draws a frame's view with `egui_plot` inside the current window.
pub(crate) fn render_view(ui: &mut egui::Ui, plot_id: &str, view: &PlotView) {
    let plot = Plot::new(plot_id)
        .legend(Legend::default())
        .x_axis_label(view.x_label.clone())
        .y_axis_label(view.y_label.clone())
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .allow_drag(false);

    match &view.content {
        PlotContent::Lines { series, bounds } => {
            plot.show(ui, |plot_ui| {
                for line in series {
                    if line.points.is_empty() {
                        continue;
                    }
                    plot_ui.line(
                        Line::new(PlotPoints::new(line.points.clone()))
                            .color(palette_color(line.color_index))
                            .name(&line.name),
                    );
                }
                if let Some(bounds) = bounds {
                    plot_ui.set_plot_bounds(egui_plot::PlotBounds::from_min_max(
                        bounds.min, bounds.max,
                    ));
                }
            });
        }
        PlotContent::Bars(bars) => {
            plot.show(ui, |plot_ui| {
                for (x, bar) in bars.iter().enumerate() {
                    let Some(value) = bar.value else {
                        continue;
                    };
                    let chart = BarChart::new(vec![Bar::new(x as f64, value).width(0.6)])
                        .color(palette_color(bar.color_index))
                        .name(&bar.name);
                    plot_ui.bar_chart(chart);
                }
            });
        }
    }
}

/// Writes the view to `path`; `.svg` selects the SVG backend, anything else PNG.
pub fn export_view(
    view: &PlotView,
    path: &Path,
    width: u32,
    height: u32,
    dark_theme: bool,
) -> Result<(), GuiError> {
    if view.is_empty() {
        return Err(GuiError::Export("No samples to export.".to_string()));
    }
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);
    let result = if is_svg {
        let root = SVGBackend::new(path, (width, height)).into_drawing_area();
        draw_view(&root, view, dark_theme).and_then(|_| root.present().map_err(|e| e.to_string()))
    } else {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        draw_view(&root, view, dark_theme).and_then(|_| root.present().map_err(|e| e.to_string()))
    };
    result.map_err(GuiError::Export)?;
    log::info!("exported {} to {}", view.title, path.display());
    Ok(())
}

fn draw_view<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &PlotView,
    dark_theme: bool,
) -> Result<(), String> {
    let bg_color = if dark_theme {
        RGBColor(24, 24, 24)
    } else {
        RGBColor(255, 255, 255)
    };
    let text_color = if dark_theme {
        RGBColor(220, 220, 220)
    } else {
        RGBColor(40, 40, 40)
    };
    let axis_color = if dark_theme {
        RGBColor(80, 80, 80)
    } else {
        RGBColor(120, 120, 120)
    };
    root.fill(&bg_color).map_err(|e| e.to_string())?;

    match &view.content {
        PlotContent::Lines { series, bounds } => {
            let Some(bounds) = bounds else {
                return Err("No samples to export.".to_string());
            };
            draw_lines(root, view, series, bounds, text_color, axis_color)
        }
        PlotContent::Bars(bars) => draw_bars(root, view, bars, text_color, axis_color),
    }
}

fn draw_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &PlotView,
    series: &[LineSeriesView],
    bounds: &PlotBounds,
    text_color: RGBColor,
    axis_color: RGBColor,
) -> Result<(), String> {
    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(&view.title, ("sans-serif", 24).into_font().color(&text_color))
        .set_label_area_size(LabelAreaPosition::Left, 40)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(bounds.min[0]..bounds.max[0], bounds.min[1]..bounds.max[1])
        .map_err(|e| e.to_string())?;
    chart
        .configure_mesh()
        .x_desc(view.x_label.as_str())
        .y_desc(view.y_label.as_str())
        .axis_desc_style(("sans-serif", 16).into_font().color(&text_color))
        .label_style(("sans-serif", 14).into_font().color(&text_color))
        .axis_style(axis_color)
        .light_line_style(axis_color)
        .bold_line_style(axis_color)
        .draw()
        .map_err(|e| e.to_string())?;

    for line in series {
        if line.points.is_empty() {
            continue;
        }
        let color = rgb(line.color_index);
        chart
            .draw_series(LineSeries::new(
                line.points.iter().map(|p| (p[0], p[1])),
                color.stroke_width(1),
            ))
            .map_err(|e| e.to_string())?
            .label(line.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }
    chart
        .configure_series_labels()
        .border_style(axis_color)
        .label_font(("sans-serif", 16).into_font().color(&text_color))
        .position(SeriesLabelPosition::UpperRight)
        .margin(12)
        .draw()
        .map_err(|e| e.to_string())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &PlotView,
    bars: &[BarView],
    text_color: RGBColor,
    axis_color: RGBColor,
) -> Result<(), String> {
    let values = bars.iter().filter_map(|bar| bar.value);
    let min_y = values.clone().fold(0.0_f64, f64::min);
    let max_y = values.fold(0.0_f64, f64::max);
    let pad = ((max_y - min_y) * 0.05).max(1.0);
    let labels: Vec<String> = bars.iter().map(|bar| bar.name.clone()).collect();

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(&view.title, ("sans-serif", 24).into_font().color(&text_color))
        .set_label_area_size(LabelAreaPosition::Left, 40)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(-0.5..(bars.len() as f64 - 0.5), (min_y - pad)..(max_y + pad))
        .map_err(|e| e.to_string())?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|x| {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_desc(view.y_label.as_str())
        .label_style(("sans-serif", 14).into_font().color(&text_color))
        .axis_style(axis_color)
        .draw()
        .map_err(|e| e.to_string())?;

    chart
        .draw_series(bars.iter().enumerate().filter_map(|(idx, bar)| {
            let value = bar.value?;
            let x = idx as f64;
            Some(Rectangle::new(
                [(x - 0.3, 0.0), (x + 0.3, value)],
                rgb(bar.color_index).filled(),
            ))
        }))
        .map_err(|e| e.to_string())?;
    Ok(())
}
