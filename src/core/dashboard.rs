use crate::core::figures::{
    blank_figure, breakdown_figure, empty_figure, heatmap_figure, pie_figure, trend_figure, Figure,
};
use crate::core::transform::major_crime_options;
use crate::domain::model::{DashboardData, DropdownOption};
use serde::Serialize;

pub const NO_DATA_MESSAGE: &str = "Error: No data available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    None,
    Block,
}

/// CSS style object for a toggled element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Style {
    pub display: Display,
}

impl Style {
    pub const HIDDEN: Style = Style {
        display: Display::None,
    };
    pub const VISIBLE: Style = Style {
        display: Display::Block,
    };
}

/// Result of pressing "Go to Dashboard" or picking a major crime type.
///
/// Figure fields that are `None` are omitted from the JSON and mean "leave the chart as it is".
/// `major_crime_value` is omitted when unchanged and `null` when the selection is cleared;
/// every visible update clears it.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardUpdate {
    pub graph_container_style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_figure: Option<Figure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pie_figure: Option<Figure>,
    pub pie_style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown_figure: Option<Figure>,
    pub major_crime_options: Vec<DropdownOption>,
    pub major_crime_style: Style,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_crime_value: Option<Option<String>>,
}

impl DashboardUpdate {
    pub fn hidden() -> Self {
        Self {
            graph_container_style: Style::HIDDEN,
            trend_figure: None,
            pie_figure: None,
            pie_style: Style::HIDDEN,
            breakdown_figure: None,
            major_crime_options: vec![],
            major_crime_style: Style::HIDDEN,
            major_crime_value: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.graph_container_style == Style::VISIBLE
    }
}

/// Choropleth of total crimes per borough, or an error figure when either source is unavailable.
/// The click count only re-triggers rendering.
pub fn update_heatmap(data: &DashboardData, _n_clicks: u64) -> Figure {
    match (&data.crimes, &data.boundaries) {
        (Some(crimes), Some(boundaries)) => heatmap_figure(crimes, boundaries),
        _ => empty_figure(NO_DATA_MESSAGE),
    }
}

pub fn update_graphs(
    data: &DashboardData,
    n_clicks: u64,
    selected_major: Option<&str>,
    selected_borough: Option<&str>,
) -> DashboardUpdate {
    let borough = selected_borough.map(str::trim).filter(|b| !b.is_empty());
    let (Some(crimes), Some(borough)) = (data.crimes.as_deref(), borough) else {
        return DashboardUpdate::hidden();
    };
    if n_clicks == 0 {
        return DashboardUpdate::hidden();
    }

    let options = major_crime_options(crimes, borough);
    let major = selected_major.map(str::trim).filter(|m| !m.is_empty());

    let breakdown = match major {
        Some(major) => breakdown_figure(borough, major, &crimes.subcategory_series(borough, major)),
        None => blank_figure(),
    };

    tracing::debug!(
        borough,
        major = major.unwrap_or(""),
        options = options.len(),
        "Rendering dashboard graphs"
    );

    DashboardUpdate {
        graph_container_style: Style::VISIBLE,
        trend_figure: Some(trend_figure(borough, &crimes.monthly_totals(borough))),
        pie_figure: Some(pie_figure(borough, &crimes.category_totals(borough))),
        pie_style: Style::VISIBLE,
        breakdown_figure: Some(breakdown),
        major_crime_options: options,
        major_crime_style: Style::VISIBLE,
        major_crime_value: Some(None),
    }
}
