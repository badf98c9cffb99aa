use crate::{QueryArguments, RowNumberWindow};
use async_trait::async_trait;
use query_structure::{Filter, GraphValue, ManyRecords};

/// The narrow read capability the query core drives.
///
/// Implementations issue flat selects against a single table. The core never asks for joins:
/// associations are resolved by follow-up reads with `IN` filters on the join column.
#[async_trait]
pub trait ReadOperations: Send + Sync {
    /// Gets multiple records from the table.
    ///
    /// - `columns` is the projection; the returned `field_names` must contain each of them.
    /// - `QueryArguments` carry the filter, the order and an optional global limit.
    async fn get_many_records(
        &self,
        table: &str,
        columns: &[String],
        query_arguments: QueryArguments,
    ) -> crate::Result<ManyRecords>;

    /// Like [`ReadOperations::get_many_records`], but the limit applies per partition of the
    /// window column instead of globally (a `ROW_NUMBER() OVER (PARTITION BY ..)` read).
    /// The `take` of the arguments is ignored.
    async fn get_many_records_windowed(
        &self,
        table: &str,
        columns: &[String],
        query_arguments: QueryArguments,
        window: RowNumberWindow,
    ) -> crate::Result<ManyRecords>;

    /// Counts the rows matching `filter`.
    async fn count_records(&self, table: &str, filter: &Filter) -> crate::Result<usize>;

    /// Counts the rows matching `filter`, grouped by the values of `group_by`.
    /// Groups without rows are absent from the result.
    async fn count_records_grouped(
        &self,
        table: &str,
        filter: &Filter,
        group_by: &str,
    ) -> crate::Result<Vec<(GraphValue, usize)>>;
}
