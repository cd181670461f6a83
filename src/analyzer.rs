use std::{sync::Arc, time::Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::{
    chart::{bar_chart, radar_chart, ChartSpec},
    domain::{parse_selection, Domain},
    error::{AnalysisError, ConfigError},
    llm,
    metrics::{generate_metrics, MetricRow},
    record::AnalysisRecord,
    search::{DuckDuckGoSearch, SearchAdapter},
    settings::Settings,
    synthesis::{synthesize, PromptOptions, SynthesisAdapter, DEFAULT_DEPTH},
};

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrendRequest {
    /// Domain labels. `None` selects the default domains.
    pub(crate) domains: Option<Vec<String>>,
    /// Overrides the configured credential.
    pub(crate) api_key: Option<String>,
    pub(crate) depth: Option<i32>,
    pub(crate) focus_areas: Vec<String>,
}

/// Outcome of one domain's search and synthesis.
#[derive(Debug, Clone)]
pub(crate) struct DomainAnalysis {
    pub(crate) domain: Domain,
    pub(crate) outcome: Result<AnalysisRecord, AnalysisError>,
}

impl DomainAnalysis {
    /// The message shown in place of a record when the analysis failed.
    pub(crate) fn error_message(&self) -> Option<String> {
        self.outcome
            .as_ref()
            .err()
            .map(|e| format!("Analysis failed for {}: {e}", self.domain))
    }
}

/// Per-domain results keyed by domain, in selection order.
#[derive(Debug, Clone, Default)]
pub(crate) struct AnalysisResultSet {
    entries: Vec<DomainAnalysis>,
}

impl AnalysisResultSet {
    /// Adds the outcome for a domain. Returns `false`, leaving the set
    /// unchanged, if the domain already has an entry.
    fn insert(&mut self, domain: Domain, outcome: Result<AnalysisRecord, AnalysisError>) -> bool {
        if self.get(domain).is_some() {
            return false;
        }
        self.entries.push(DomainAnalysis { domain, outcome });
        true
    }

    pub(crate) fn get(&self, domain: Domain) -> Option<&DomainAnalysis> {
        self.entries.iter().find(|entry| entry.domain == domain)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &DomainAnalysis> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_err()).count()
    }
}

/// Everything the presentation layer needs for one run.
#[derive(Debug, Clone)]
pub(crate) struct TrendReport {
    pub(crate) analyses: AnalysisResultSet,
    pub(crate) metrics: Vec<MetricRow>,
    pub(crate) radar_chart: ChartSpec,
    pub(crate) bar_chart: ChartSpec,
    pub(crate) generated_at: DateTime<Utc>,
}

struct RunPlan {
    domains: Vec<Domain>,
    options: PromptOptions,
    api_key: Option<String>,
}

/// Drives search, synthesis, metrics and charts for a selection of domains.
#[derive(Clone)]
pub(crate) struct Analyzer {
    search: Arc<dyn SearchAdapter>,
    synthesis: Arc<dyn SynthesisAdapter>,
    api_key: Option<String>,
}

impl Analyzer {
    pub(crate) fn new(
        search: Arc<dyn SearchAdapter>,
        synthesis: Arc<dyn SynthesisAdapter>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            search,
            synthesis,
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }

    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let search = Arc::new(DuckDuckGoSearch::new(&settings.search)?);
        let synthesis = llm::from_settings(&settings.llm)?;
        Ok(Self::new(search, synthesis, settings.llm.api_key.clone()))
    }

    fn plan(&self, request: &TrendRequest) -> Result<RunPlan, ConfigError> {
        let domains = match &request.domains {
            Some(labels) => parse_selection(labels)?,
            None => Domain::DEFAULT_SELECTION.to_vec(),
        };
        if domains.is_empty() {
            return Err(ConfigError::EmptySelection);
        }

        let api_key = request
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone());
        if self.synthesis.requires_credential() && api_key.is_none() {
            return Err(ConfigError::MissingCredential);
        }

        let options = PromptOptions::new(
            request.depth.unwrap_or(DEFAULT_DEPTH),
            &request.focus_areas,
        )?;

        Ok(RunPlan {
            domains,
            options,
            api_key,
        })
    }

    /// Runs the whole pipeline. Only configuration problems fail the run;
    /// search, model and parse failures are recorded per domain.
    pub(crate) async fn run(&self, request: &TrendRequest) -> Result<TrendReport, ConfigError> {
        let plan = self.plan(request).inspect_err(|e| warn!("run rejected: {e}"))?;
        let started = Instant::now();
        info!(
            provider = self.synthesis.name(),
            domains = plan.domains.len(),
            "starting trend analysis"
        );

        let mut analyses = AnalysisResultSet::default();
        for &domain in &plan.domains {
            let outcome = self.analyze_domain(domain, &plan).await;
            analyses.insert(domain, outcome);
        }

        let metrics = generate_metrics(&plan.domains);
        let radar_chart = radar_chart(&metrics);
        let bar_chart = bar_chart(&metrics);

        info!(
            domains = analyses.len(),
            failed = analyses.failed_count(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "trend analysis finished"
        );

        Ok(TrendReport {
            analyses,
            metrics,
            radar_chart,
            bar_chart,
            generated_at: Utc::now(),
        })
    }

    #[instrument(name = "analyze_domain", skip_all, fields(domain = %domain))]
    async fn analyze_domain(
        &self,
        domain: Domain,
        plan: &RunPlan,
    ) -> Result<AnalysisRecord, AnalysisError> {
        let snippets = self
            .search
            .search(&domain.search_query())
            .await
            .inspect_err(|e| warn!("search stage failed: {e}"))?;
        info!(snippets = snippets.len(), "search stage finished");

        let record = synthesize(
            self.synthesis.as_ref(),
            domain,
            &snippets,
            &plan.options,
            plan.api_key.as_deref(),
        )
        .await
        .inspect_err(|e| warn!("synthesis stage failed: {e}"))?;
        info!("synthesis stage finished");
        Ok(record)
    }
}
