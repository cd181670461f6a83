use async_graphql::{Context, InputObject, Json, Object, Result};
use tracing::error;

use crate::{
    analyzer::{Analyzer, DomainAnalysis, TrendReport, TrendRequest},
    chart::ChartSpec,
    metrics::MetricRow,
    record::AnalysisRecord,
    report::Download,
};

#[derive(InputObject, Debug, Default)]
pub(crate) struct TrendReportInput {
    /// Domain labels from `domains`. Omit to analyze `defaultDomains`.
    domains: Option<Vec<String>>,
    /// API key for the language model. Falls back to the server's key.
    api_key: Option<String>,
    /// Level of detail requested from the model, 1 to 10. Defaults to 7.
    depth: Option<i32>,
    /// Areas the analysis should emphasize, from `focusAreas`.
    focus_areas: Option<Vec<String>>,
}

impl From<TrendReportInput> for TrendRequest {
    fn from(input: TrendReportInput) -> Self {
        Self {
            domains: input.domains,
            api_key: input.api_key,
            depth: input.depth,
            focus_areas: input.focus_areas.unwrap_or_default(),
        }
    }
}

#[derive(Default)]
pub(super) struct TrendQuery {}

#[Object]
impl TrendQuery {
    /// Searches, analyzes and scores each selected domain.
    ///
    /// A domain whose search or analysis fails is reported with an `error`
    /// instead of a `record`; the other domains are unaffected.
    async fn trend_report(&self, ctx: &Context<'_>, input: TrendReportInput) -> Result<TrendReport> {
        let analyzer = ctx.data::<Analyzer>()?.clone();
        let request = TrendRequest::from(input);
        let handle = tokio::spawn(async move { analyzer.run(&request).await });
        match handle.await {
            Ok(Ok(report)) => Ok(report),
            Ok(Err(e)) => Err(e.to_string().into()),
            Err(e) => {
                error!("trend analysis aborted: {e}");
                Err(format!("Analysis failed: {e}").into())
            }
        }
    }
}

#[Object]
impl TrendReport {
    /// One entry per selected domain, in selection order.
    async fn analyses(&self) -> Vec<&DomainAnalysis> {
        self.analyses.iter().collect()
    }

    async fn metrics(&self) -> &[MetricRow] {
        &self.metrics
    }

    /// Plotly figure: one polar series per domain.
    async fn radar_chart(&self) -> Json<ChartSpec> {
        Json(self.radar_chart.clone())
    }

    /// Plotly figure: metrics grouped by domain.
    async fn bar_chart(&self) -> Json<ChartSpec> {
        Json(self.bar_chart.clone())
    }

    async fn generated_at(&self) -> String {
        self.generated_at.to_rfc3339()
    }
}

#[Object]
impl DomainAnalysis {
    async fn domain(&self) -> &'static str {
        self.domain.label()
    }

    async fn record(&self) -> Option<&AnalysisRecord> {
        self.outcome.as_ref().ok()
    }

    async fn error(&self) -> Option<String> {
        self.error_message()
    }

    #[graphql(name = "download")]
    async fn download_file(&self) -> Download {
        self.download()
    }
}
