use async_graphql::Object;

use crate::{domain::Domain, synthesis::FocusArea};

#[derive(Default)]
pub(super) struct CatalogQuery {}

#[Object]
impl CatalogQuery {
    /// All domains that can be analyzed.
    async fn domains(&self) -> Vec<&'static str> {
        Domain::ALL.iter().map(|d| d.label()).collect()
    }

    /// Domains selected when `trendReport` is called without `domains`.
    async fn default_domains(&self) -> Vec<&'static str> {
        Domain::DEFAULT_SELECTION.iter().map(|d| d.label()).collect()
    }

    /// Focus areas accepted by `trendReport`.
    async fn focus_areas(&self) -> Vec<&'static str> {
        FocusArea::ALL.iter().map(|f| f.label()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        analyzer::tests::{analyzer, StubModel, StubSearch},
        api::TestSchema,
    };

    fn schema() -> TestSchema {
        TestSchema::new(analyzer(
            Arc::new(StubSearch::default()),
            Arc::new(StubModel::default()),
            None,
        ))
    }

    #[tokio::test]
    async fn lists_full_catalog() {
        let query = r"{ domains }";
        let data = schema().execute(query).await.data.into_json().unwrap();
        let domains = data["domains"].as_array().unwrap();
        assert_eq!(domains.len(), 16);
        assert_eq!(domains[0], "AI/Machine Learning");
        assert_eq!(domains[15], "Autonomous Vehicles");
    }

    #[tokio::test]
    async fn lists_defaults_and_focus_areas() {
        let query = r"{ defaultDomains focusAreas }";
        let data = schema().execute(query).await.data.into_json().unwrap();
        assert_eq!(
            data["defaultDomains"],
            serde_json::json!(["AI/Machine Learning", "Biotechnology", "FinTech"])
        );
        assert_eq!(data["focusAreas"].as_array().unwrap().len(), 4);
    }
}
