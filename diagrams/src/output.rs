use diagrams_core::frame::PlotContent;
use diagrams_core::{DiagramKind, PlotName, PlotView};

pub fn print_info(message: &str) {
    println!("[Diagrams][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[Diagrams][ERROR]: {message}");
}

fn kind_label(kind: DiagramKind) -> &'static str {
    match kind {
        DiagramKind::Line => "line",
        DiagramKind::Bar => "bar",
    }
}

pub fn print_plot_names(names: &[(PlotName, DiagramKind)], duplicates: &[PlotName]) {
    if names.is_empty() {
        print_info("Layout defines no diagrams");
        return;
    }
    print_info("Diagrams:");
    for (name, kind) in names {
        if duplicates.contains(name) {
            println!("{name} ({}) [duplicate]", kind_label(*kind));
        } else {
            println!("{name} ({})", kind_label(*kind));
        }
    }
}

pub fn print_frame_summary(kind: DiagramKind, view: &PlotView) {
    match &view.content {
        PlotContent::Lines { series, .. } => {
            let points: usize = series.iter().map(|s| s.points.len()).sum();
            println!("{} ({}) {points} points", view.title, kind_label(kind));
        }
        PlotContent::Bars(bars) => {
            let values: Vec<String> = bars
                .iter()
                .map(|bar| match bar.value {
                    Some(value) => format!("{}={value:.3}", bar.name),
                    None => format!("{}=-", bar.name),
                })
                .collect();
            println!("{} ({}) {}", view.title, kind_label(kind), values.join(" "));
        }
    }
}
