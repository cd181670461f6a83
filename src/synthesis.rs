use std::{fmt::Write as _, str::FromStr};

use async_trait::async_trait;

use crate::{
    domain::Domain,
    error::{AnalysisError, ConfigError},
    record::{parse_record, AnalysisRecord},
};

pub(crate) const DEFAULT_DEPTH: i32 = 7;

const SYSTEM_INSTRUCTION: &str = "You are an expert startup trend analyst.
Provide a comprehensive analysis of startup trends based on the following context.
Focus on:
- Technological innovations
- Market potential
- Investment landscape
- Emerging opportunities

Respond in a structured JSON format with key insights.";

/// A two-message chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Prompt {
    pub(crate) system: String,
    pub(crate) user: String,
}

/// A hosted model that turns a prompt into raw completion text.
#[async_trait]
pub(crate) trait SynthesisAdapter: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &str;

    /// Whether a call needs an API credential; when it does and none is
    /// available, the run is rejected before any network call.
    fn requires_credential(&self) -> bool;

    async fn complete(&self, prompt: &Prompt, api_key: Option<&str>)
        -> Result<String, AnalysisError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FocusArea {
    TechnologicalInnovation,
    MarketPotential,
    InvestmentLandscape,
    EmergingTrends,
}

impl FocusArea {
    pub(crate) const ALL: [FocusArea; 4] = [
        FocusArea::TechnologicalInnovation,
        FocusArea::MarketPotential,
        FocusArea::InvestmentLandscape,
        FocusArea::EmergingTrends,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            FocusArea::TechnologicalInnovation => "Technological Innovation",
            FocusArea::MarketPotential => "Market Potential",
            FocusArea::InvestmentLandscape => "Investment Landscape",
            FocusArea::EmergingTrends => "Emerging Trends",
        }
    }
}

impl FromStr for FocusArea {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FocusArea::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownFocusArea(s.to_string()))
    }
}

/// User-chosen modifiers appended to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PromptOptions {
    pub(crate) depth: i32,
    pub(crate) focus_areas: Vec<FocusArea>,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            focus_areas: Vec::new(),
        }
    }
}

impl PromptOptions {
    pub(crate) fn new<S: AsRef<str>>(depth: i32, focus_areas: &[S]) -> Result<Self, ConfigError> {
        if !(1..=10).contains(&depth) {
            return Err(ConfigError::DepthOutOfRange(depth));
        }
        let mut areas = Vec::with_capacity(focus_areas.len());
        for label in focus_areas {
            let area: FocusArea = label.as_ref().parse()?;
            if !areas.contains(&area) {
                areas.push(area);
            }
        }
        Ok(Self {
            depth,
            focus_areas: areas,
        })
    }

    fn depth_instruction(&self) -> &'static str {
        match self.depth {
            ..=3 => "Keep each field brief: a sentence or a few short items.",
            4..=7 => "Give a balanced level of detail in each field.",
            _ => "Go into depth, naming concrete technologies, companies and funding signals where the context supports it.",
        }
    }
}

pub(crate) fn build_prompt(domain: Domain, snippets: &[String], options: &PromptOptions) -> Prompt {
    let mut results = String::new();
    if snippets.is_empty() {
        results.push_str("(no recent search results were found)");
    } else {
        for snippet in snippets {
            let _ = writeln!(results, "- {snippet}");
        }
    }

    let mut user = format!(
        "Analyze the following context about {domain} startup trends:\n\
        Recent Search Results:\n{results}\n\
        Provide a detailed analysis in the following JSON structure:\n\
        {{\n\
        \x20   \"domain\": \"{domain}\",\n\
        \x20   \"key_technologies\": [],\n\
        \x20   \"market_potential\": \"\",\n\
        \x20   \"investment_trends\": \"\",\n\
        \x20   \"emerging_opportunities\": [],\n\
        \x20   \"challenges\": []\n\
        }}\n"
    );

    let _ = write!(
        user,
        "\nAnalysis depth: {}/10. {}",
        options.depth,
        options.depth_instruction()
    );
    if !options.focus_areas.is_empty() {
        let areas = options
            .focus_areas
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(user, "\nGive particular attention to: {areas}.");
    }
    user.push_str("\nRespond with the JSON object only.");

    Prompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        user,
    }
}

/// Runs the synthesis stage for one domain.
pub(crate) async fn synthesize(
    adapter: &dyn SynthesisAdapter,
    domain: Domain,
    snippets: &[String],
    options: &PromptOptions,
    api_key: Option<&str>,
) -> Result<AnalysisRecord, AnalysisError> {
    let prompt = build_prompt(domain, snippets, options);
    let raw = adapter.complete(&prompt, api_key).await?;
    if raw.trim().is_empty() {
        return Err(AnalysisError::Model("empty completion".to_string()));
    }
    parse_record(domain, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_lists_the_four_focuses() {
        let prompt = build_prompt(Domain::FinTech, &[], &PromptOptions::default());
        for focus in [
            "Technological innovations",
            "Market potential",
            "Investment landscape",
            "Emerging opportunities",
        ] {
            assert!(prompt.system.contains(focus), "missing {focus}");
        }
    }

    #[test]
    fn user_prompt_embeds_domain_snippets_and_schema() {
        let snippets = vec!["Open banking grows".to_string(), "BNPL cools".to_string()];
        let prompt = build_prompt(Domain::FinTech, &snippets, &PromptOptions::default());
        assert!(prompt.user.contains("about FinTech startup trends"));
        assert!(prompt.user.contains("- Open banking grows\n- BNPL cools"));
        assert!(prompt.user.contains("\"domain\": \"FinTech\""));
        assert!(prompt.user.contains("\"emerging_opportunities\": []"));
        assert!(prompt.user.contains("Analysis depth: 7/10"));
        assert!(!prompt.user.contains("particular attention"));
    }

    #[test]
    fn focus_areas_are_threaded_into_prompt() {
        let options = PromptOptions::new(9, &["market potential", "Emerging Trends"]).unwrap();
        let prompt = build_prompt(Domain::SpaceTech, &[], &options);
        assert!(prompt
            .user
            .contains("Give particular attention to: Market Potential, Emerging Trends."));
        assert!(prompt.user.contains("Analysis depth: 9/10. Go into depth"));
        assert!(prompt.user.contains("no recent search results"));
    }

    #[test]
    fn options_are_validated() {
        assert_eq!(
            PromptOptions::new(0, &[] as &[&str]).unwrap_err(),
            ConfigError::DepthOutOfRange(0)
        );
        assert_eq!(
            PromptOptions::new(11, &[] as &[&str]).unwrap_err(),
            ConfigError::DepthOutOfRange(11)
        );
        assert!(matches!(
            PromptOptions::new(5, &["Vibes"]).unwrap_err(),
            ConfigError::UnknownFocusArea(_)
        ));
    }

    struct Canned(&'static str);

    #[async_trait]
    impl SynthesisAdapter for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn requires_credential(&self) -> bool {
            false
        }

        async fn complete(
            &self,
            _prompt: &Prompt,
            _api_key: Option<&str>,
        ) -> Result<String, AnalysisError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn empty_completion_is_model_error() {
        let err = synthesize(
            &Canned("  "),
            Domain::EdTech,
            &[],
            &PromptOptions::default(),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AnalysisError::Model(_)));
    }

    #[tokio::test]
    async fn completion_is_parsed_into_record() {
        let record = synthesize(
            &Canned(r#"{"challenges": ["Hardware costs"]}"#),
            Domain::Robotics,
            &[],
            &PromptOptions::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(record.domain, "Robotics");
        assert_eq!(record.challenges, vec!["Hardware costs"]);
    }
}
