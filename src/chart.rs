//! Plotly-style chart specifications for the trend metrics.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::metrics::{MetricRow, INNOVATION_SCORE, INVESTMENT_ATTRACTIVENESS, MARKET_POTENTIAL};

const AXES: [&str; 3] = [MARKET_POTENTIAL, INNOVATION_SCORE, INVESTMENT_ATTRACTIVENESS];

pub(crate) const RADAR_TITLE: &str = "Startup Domain Trend Radar";
pub(crate) const BAR_TITLE: &str = "Startup Domains: Comparative Trend Analysis";

/// A figure ready to be handed to a plotting library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChartSpec {
    pub(crate) data: Vec<Value>,
    pub(crate) layout: Value,
}

/// One polar series per domain over the three metric axes.
pub(crate) fn radar_chart(rows: &[MetricRow]) -> ChartSpec {
    let data = rows
        .iter()
        .map(|row| {
            json!({
                "type": "scatterpolar",
                "name": row.domain,
                "r": row.values(),
                "theta": AXES,
                "fill": "toself",
            })
        })
        .collect();

    ChartSpec {
        data,
        layout: json!({
            "title": { "text": RADAR_TITLE },
            "polar": { "radialaxis": { "visible": true, "range": [0, 100] } },
        }),
    }
}

/// One bar series per metric, grouped by domain.
pub(crate) fn bar_chart(rows: &[MetricRow]) -> ChartSpec {
    let domains: Vec<&str> = rows.iter().map(|row| row.domain.as_str()).collect();
    let data = AXES
        .iter()
        .enumerate()
        .map(|(i, axis)| {
            let values: Vec<i32> = rows.iter().map(|row| row.values()[i]).collect();
            json!({
                "type": "bar",
                "name": axis,
                "x": domains,
                "y": values,
            })
        })
        .collect();

    ChartSpec {
        data,
        layout: json!({
            "title": { "text": BAR_TITLE },
            "barmode": "group",
            "xaxis": { "title": { "text": "Domain" } },
            "yaxis": { "title": { "text": "value" } },
        }),
    }
}
