use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::{error::AnalysisError, settings::SearchSettings};

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

static RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("valid selector"));
static SNIPPET: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a.result__snippet, .result__snippet").expect("valid selector")
});

/// Source of recent text snippets about a free-text query.
#[async_trait]
pub(crate) trait SearchAdapter: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<String>, AnalysisError>;
}

/// Searches through DuckDuckGo's HTML results page.
pub(crate) struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub(crate) fn new(settings: &SearchSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            max_results: settings.max_results,
        })
    }
}

#[async_trait]
impl SearchAdapter for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<Vec<String>, AnalysisError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| AnalysisError::Search(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AnalysisError::Search(format!(
                "search service returned {status}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| AnalysisError::Search(format!("failed to read body: {e}")))?;
        // `Html` is !Send; it is built and dropped inside this call.
        let snippets = parse_results_page(&body, self.max_results);
        debug!(query, count = snippets.len(), "search finished");
        Ok(snippets)
    }
}

/// Extracts `"<title>: <snippet>"` lines from a results page, in page order.
/// Results with neither a title nor a snippet are skipped.
fn parse_results_page(body: &str, max_results: usize) -> Vec<String> {
    let doc = Html::parse_document(body);
    doc.select(&RESULT)
        .filter_map(|result| {
            let title = first_text(result, &TITLE);
            let snippet = first_text(result, &SNIPPET);
            match (title.is_empty(), snippet.is_empty()) {
                (true, true) => None,
                (false, true) => Some(title),
                (true, false) => Some(snippet),
                (false, false) => Some(format!("{title}: {snippet}")),
            }
        })
        .take(max_results)
        .collect()
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div id="links" class="results">
  <div class="result results_links results_links_deep web-result">
    <div class="links_main links_deep result__body">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Ffintech">Top <b>FinTech</b> Trends 2024</a>
      </h2>
      <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Ffintech">Embedded finance and
        open banking drive <b>startup</b> growth.</a>
    </div>
  </div>
  <div class="result results_links results_links_deep web-result">
    <div class="links_main links_deep result__body">
      <h2 class="result__title"><a class="result__a" href="https://example.com/ai">AI in lending</a></h2>
    </div>
  </div>
  <div class="result result--ad">
    <div class="links_main"></div>
  </div>
  <div class="result results_links web-result">
    <div class="links_main result__body">
      <a class="result__snippet" href="https://example.com/pay">Payments startups raised less in 2024.</a>
    </div>
  </div>
</div>
</body></html>"#;

    #[test]
    fn titles_and_snippets_are_extracted_in_order() {
        let snippets = parse_results_page(PAGE, 10);
        assert_eq!(
            snippets,
            vec![
                "Top FinTech Trends 2024: Embedded finance and open banking drive startup growth.",
                "AI in lending",
                "Payments startups raised less in 2024.",
            ]
        );
    }

    #[test]
    fn empty_results_are_skipped_not_fatal() {
        let snippets = parse_results_page(PAGE, 10);
        assert_eq!(snippets.len(), 3);
        assert!(snippets.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn results_are_bounded() {
        let snippets = parse_results_page(PAGE, 2);
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[1], "AI in lending");
    }

    #[test]
    fn page_without_results_yields_nothing() {
        assert!(parse_results_page("<html><body>No results.</body></html>", 5).is_empty());
    }
}
