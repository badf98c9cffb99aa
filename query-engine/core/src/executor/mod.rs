use crate::{
    CoreError, CoreResult, GraphQLProtocolAdapter, QueryGraphBuilder, QueryResult, RawDocument, ReadInterpreter,
    ResolverConfig, Selection, SelectionBuilder,
};
use connector::ReadOperations;
use indexmap::IndexMap;
use query_structure::Schema;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Results of a document, keyed by the output keys of its root fields.
pub type Response = IndexMap<String, QueryResult>;

/// Central query executor and main entry point into the query core.
///
/// Holds the schema and the data source; every call resolves one document against them. No state
/// is shared between calls.
pub struct QueryExecutor {
    schema: Arc<Schema>,
    connector: Arc<dyn ReadOperations>,
    config: ResolverConfig,
}

impl QueryExecutor {
    pub fn new(schema: Arc<Schema>, connector: Arc<dyn ReadOperations>, config: ResolverConfig) -> Self {
        Self {
            schema,
            connector,
            config,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Parses a GraphQL document and resolves the picked operation.
    pub async fn execute_graphql(
        &self,
        query: &str,
        operation: Option<&str>,
        variables: &serde_json::Map<String, serde_json::Value>,
    ) -> CoreResult<Response> {
        let document = GraphQLProtocolAdapter::parse(query, operation, variables)?;
        self.execute(&document).await
    }

    pub async fn execute(&self, document: &RawDocument) -> CoreResult<Response> {
        let root = SelectionBuilder::build(&document.root, &document.fragments)?;
        self.resolve(&root, None).await
    }

    /// Like [`QueryExecutor::execute`], but gives up with [`CoreError::Cancelled`] as soon as
    /// `token` is cancelled.
    pub async fn execute_with_cancellation(
        &self,
        document: &RawDocument,
        token: CancellationToken,
    ) -> CoreResult<Response> {
        let root = SelectionBuilder::build(&document.root, &document.fragments)?;
        self.resolve(&root, Some(token)).await
    }

    /// Resolves an already built selection tree rooted at the query type.
    pub async fn execute_selection(&self, root: &Selection) -> CoreResult<Response> {
        self.resolve(root, None).await
    }

    #[tracing::instrument(skip_all)]
    async fn resolve(&self, root: &Selection, token: Option<CancellationToken>) -> CoreResult<Response> {
        let reads = QueryGraphBuilder::new(&self.schema).build(root)?;
        let interpreter = ReadInterpreter::new(self.connector.as_ref(), &self.config);

        let resolution = async {
            let resolution = interpreter.resolve_all(&reads);

            match self.config.timeout() {
                Some(limit) => match tokio::time::timeout(limit, resolution).await {
                    Ok(result) => result.map_err(CoreError::from),
                    Err(_) => Err(CoreError::Timeout(limit)),
                },
                None => resolution.await.map_err(CoreError::from),
            }
        };

        let result = match token {
            Some(token) => tokio::select! {
                biased;

                _ = token.cancelled() => Err(CoreError::Cancelled),
                result = resolution => result,
            },
            None => resolution.await,
        };

        if let Err(err) = &result {
            debug!(error = %err, malformed_query = err.is_malformed_query(), "query resolution failed");
        }

        result
    }
}
