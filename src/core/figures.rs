//! Plotly figures, serialized as the `{data, layout}` JSON that `Plotly.react` accepts.

use crate::core::transform::SubcategorySeries;
use crate::domain::model::{BoroughBoundaries, CrimeTable};
use serde::Serialize;
use std::sync::Arc;

pub const LONDON_CENTER: MapCenter = MapCenter {
    lat: 51.5074,
    lon: -0.1278,
};
pub const MAP_ZOOM: f64 = 9.0;
pub const FEATURE_ID_KEY: &str = "properties.name";

const CHART_BACKGROUND: &str = "#f8f9fa";
const CHART_FONT: &str = "Arial, sans-serif";

#[derive(Debug, Clone, Default, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter {
        x: Vec<String>,
        y: Vec<u64>,
        mode: &'static str,
        line: Line,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<u64>,
        hovertemplate: String,
    },
    #[serde(rename = "choroplethmap")]
    ChoroplethMap {
        geojson: Arc<serde_json::Value>,
        locations: Vec<String>,
        z: Vec<u64>,
        featureidkey: &'static str,
        colorscale: &'static str,
        colorbar: ColorBar,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub shape: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub text: String,
    pub xref: &'static str,
    pub yref: &'static str,
    pub showarrow: bool,
    pub font: Font,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapLayout {
    pub style: &'static str,
    pub center: MapCenter,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// A figure with no traces that shows `message` as its title and as a centred annotation.
pub fn empty_figure(message: &str) -> Figure {
    let hidden = || Axis {
        visible: Some(false),
        ..Axis::default()
    };
    Figure {
        data: vec![],
        layout: Layout {
            title: Some(Title::new(message)),
            xaxis: Some(hidden()),
            yaxis: Some(hidden()),
            annotations: vec![Annotation {
                text: message.to_string(),
                xref: "paper",
                yref: "paper",
                showarrow: false,
                font: Font {
                    family: None,
                    size: Some(20),
                },
            }],
            ..Layout::default()
        },
    }
}

/// What an empty line chart looks like: no traces, default layout.
pub fn blank_figure() -> Figure {
    Figure::default()
}

fn chart_layout(title: String, time_axis: bool) -> Layout {
    let (xaxis, yaxis) = if time_axis {
        (
            Some(Axis {
                showgrid: Some(true),
                tickangle: Some(-45),
                title: Some(Title::new("Month")),
                ..Axis::default()
            }),
            Some(Axis {
                showgrid: Some(true),
                title: Some(Title::new("Crime Count")),
                ..Axis::default()
            }),
        )
    } else {
        (None, None)
    };

    Layout {
        title: Some(Title::new(title)),
        xaxis,
        yaxis,
        plot_bgcolor: Some(CHART_BACKGROUND),
        paper_bgcolor: Some(CHART_BACKGROUND),
        font: Some(Font {
            family: Some(CHART_FONT),
            size: None,
        }),
        ..Layout::default()
    }
}

fn line_trace(points: &[(String, u64)], name: Option<String>) -> Trace {
    Trace::Scatter {
        x: points.iter().map(|(m, _)| m.clone()).collect(),
        y: points.iter().map(|(_, c)| *c).collect(),
        mode: "lines",
        line: Line { shape: "linear" },
        name,
    }
}

pub fn heatmap_figure(table: &CrimeTable, boundaries: &BoroughBoundaries) -> Figure {
    let totals = table.borough_totals();

    Figure {
        data: vec![Trace::ChoroplethMap {
            geojson: Arc::clone(&boundaries.document),
            locations: totals.iter().map(|(b, _)| b.clone()).collect(),
            z: totals.iter().map(|(_, c)| *c).collect(),
            featureidkey: FEATURE_ID_KEY,
            colorscale: "Reds",
            colorbar: ColorBar {
                title: Title::new("CrimeCount"),
            },
        }],
        layout: Layout {
            title: Some(Title::new("Crime Heatmap of London")),
            margin: Some(Margin { r: 0, t: 30, l: 0, b: 0 }),
            map: Some(MapLayout {
                style: "carto-positron",
                center: LONDON_CENTER,
                zoom: MAP_ZOOM,
            }),
            ..Layout::default()
        },
    }
}

pub fn trend_figure(borough: &str, monthly: &[(String, u64)]) -> Figure {
    Figure {
        data: vec![line_trace(monthly, None)],
        layout: chart_layout(format!("Overall Crime Trend in {} Over Time", borough), true),
    }
}

const MAJOR_CATEGORY_LABEL: &str = "Major Crime Type";

pub fn pie_figure(borough: &str, categories: &[(String, u64)]) -> Figure {
    Figure {
        data: vec![Trace::Pie {
            labels: categories.iter().map(|(c, _)| c.clone()).collect(),
            values: categories.iter().map(|(_, n)| *n).collect(),
            hovertemplate: format!(
                "{}=%{{label}}<br>CrimeCount=%{{value}}<extra></extra>",
                MAJOR_CATEGORY_LABEL
            ),
        }],
        layout: Layout {
            legend: Some(Legend {
                title: Title::new(MAJOR_CATEGORY_LABEL),
            }),
            ..chart_layout(format!("Count of Each Major Crime Type in {}", borough), false)
        },
    }
}

pub fn breakdown_figure(borough: &str, major: &str, series: &[SubcategorySeries]) -> Figure {
    Figure {
        data: series
            .iter()
            .map(|s| line_trace(&s.points, Some(s.subcategory.clone())))
            .collect(),
        layout: chart_layout(
            format!("Crime Trend Over Time for {} in {}", major, borough),
            true,
        ),
    }
}
