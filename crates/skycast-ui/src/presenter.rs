//! Presentation adapters. The view model carries all content decisions;
//! adapters only decide where the text goes.

use crate::view::ViewModel;

/// A sink for rendered dashboard state
pub trait Presenter {
    fn present(&mut self, view: &ViewModel);
}

/// Renders the dashboard to stdout
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, view: &ViewModel) {
        print!("{}", render_text(view));
    }
}

/// Render a view model as dashboard text. Pure; used by the terminal
/// presenter and directly testable without one.
pub fn render_text(view: &ViewModel) -> String {
    let mut out = String::new();

    out.push_str("────────────────────────────────────────\n");

    match &view.current {
        Some(current) => {
            out.push_str(&format!(
                "{} {} — {}\n",
                current.symbol, view.place_label, view.date_label
            ));
            out.push_str(&format!(
                "  {}{} (feels like {}{})  {}\n",
                current.temperature,
                view.units.temperature,
                current.feels_like,
                view.units.temperature,
                current.description
            ));
            out.push_str(&format!(
                "  humidity {}%  wind {} {}  precipitation {} {}\n",
                current.humidity,
                current.wind_speed,
                view.units.wind,
                current.precipitation,
                view.units.precipitation
            ));
        }
        None => {
            out.push_str(&format!("{}\n", view.place_label));
        }
    }

    if !view.daily.is_empty() {
        out.push('\n');
        for (i, day) in view.daily.iter().enumerate() {
            let marker = if day.selected { '>' } else { ' ' };
            out.push_str(&format!(
                " {} [{}] {} {}  {}°/{}°\n",
                marker,
                i + 1,
                day.label,
                day.symbol,
                day.high,
                day.low
            ));
        }
    }

    if !view.hourly.is_empty() {
        out.push('\n');
        for hour in &view.hourly {
            out.push_str(&format!(
                "   {} {} {}{}\n",
                hour.label, hour.symbol, hour.temperature, view.units.temperature
            ));
        }
    }

    if !view.suggestions.is_empty() {
        out.push('\n');
        for (i, suggestion) in view.suggestions.iter().enumerate() {
            out.push_str(&format!(" [{}] {}\n", i + 1, suggestion));
        }
    }

    if let Some(backdrop) = &view.backdrop {
        out.push_str(&format!("\n  backdrop: {}\n", backdrop));
    }

    if !view.status.is_empty() {
        out.push_str(&format!("\n  {}\n", view.status));
    }

    out
}
