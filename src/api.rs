mod catalog;
mod trend;

use async_graphql::{EmptyMutation, EmptySubscription, MergedObject};

use crate::analyzer::Analyzer;

/// A set of queries defined in the schema.
///
/// This is exposed only for [`Schema`], and not used directly.
#[derive(Default, MergedObject)]
pub(crate) struct Query(catalog::CatalogQuery, trend::TrendQuery);

pub(crate) type Schema = async_graphql::Schema<Query, EmptyMutation, EmptySubscription>;

pub(crate) fn schema(analyzer: Analyzer) -> Schema {
    Schema::build(Query::default(), EmptyMutation, EmptySubscription)
        .data(analyzer)
        .finish()
}

#[cfg(test)]
struct TestSchema {
    schema: Schema,
}

#[cfg(test)]
impl TestSchema {
    fn new(analyzer: Analyzer) -> Self {
        Self {
            schema: schema(analyzer),
        }
    }

    async fn execute(&self, query: &str) -> async_graphql::Response {
        let request: async_graphql::Request = query.into();
        self.schema.execute(request).await
    }
}
