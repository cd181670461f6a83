use async_graphql::SimpleObject;

use crate::analyzer::DomainAnalysis;

/// A per-domain file the user can download from the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub(crate) struct Download {
    pub(crate) file_name: String,
    pub(crate) mime_type: String,
    pub(crate) content: String,
}

impl DomainAnalysis {
    /// The serialized record, or the error text when the analysis failed.
    pub(crate) fn download(&self) -> Download {
        let stem = self.domain.report_stem();
        let rendered = match &self.outcome {
            Ok(record) => serde_json::to_string_pretty(record).ok(),
            Err(_) => None,
        };
        match rendered {
            Some(content) => Download {
                file_name: format!("{stem}.json"),
                mime_type: "application/json".to_string(),
                content,
            },
            None => Download {
                file_name: format!("{stem}.txt"),
                mime_type: "text/plain".to_string(),
                content: self.error_message().unwrap_or_default(),
            },
        }
    }
}
