use crate::{
    LoggedQuery, QueryLog, ReadKind, Row,
    evaluate::{Evaluate, compare_rows},
};
use async_trait::async_trait;
use indexmap::IndexMap;
use itertools::Itertools;
use query_connector::{
    QueryArguments, ReadOperations, RowNumberWindow,
    error::{ConnectorError, ErrorKind},
};
use query_structure::{Filter, GraphValue, ManyRecords, Record};
use std::{collections::HashSet, time::Duration};

/// An in-memory data store with one row list per table.
#[derive(Debug, Default)]
pub struct InMemoryConnector {
    tables: IndexMap<String, Vec<Row>>,
    failing_tables: HashSet<String>,
    latency: Option<Duration>,
    log: QueryLog,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table, so that reads against it succeed even while it holds no rows.
    pub fn with_table(mut self, table: &str) -> Self {
        self.tables.entry(table.to_owned()).or_default();
        self
    }

    pub fn with_row<I, K>(mut self, table: &str, row: I) -> Self
    where
        I: IntoIterator<Item = (K, GraphValue)>,
        K: Into<String>,
    {
        self.insert(table, row);
        self
    }

    /// Every read against `table` fails with a query error.
    pub fn failing_on(mut self, table: &str) -> Self {
        self.failing_tables.insert(table.to_owned());
        self
    }

    /// Every read waits for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert<I, K>(&mut self, table: &str, row: I)
    where
        I: IntoIterator<Item = (K, GraphValue)>,
        K: Into<String>,
    {
        let row: Row = row.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.tables.entry(table.to_owned()).or_default().push(row);
    }

    pub fn query_log(&self) -> &QueryLog {
        &self.log
    }

    async fn scan(
        &self,
        table: &str,
        kind: ReadKind,
        filter: &Filter,
        take: Option<usize>,
    ) -> query_connector::Result<Vec<&Row>> {
        self.log.record(LoggedQuery {
            table: table.to_owned(),
            kind,
            filter: filter.clone(),
            take,
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing_tables.contains(table) {
            return Err(ConnectorError::from_kind(ErrorKind::QueryError(
                format!("simulated failure reading `{table}`").into(),
            )));
        }

        let rows = self.tables.get(table).ok_or_else(|| {
            ConnectorError::from_kind(ErrorKind::TableDoesNotExist {
                table: table.to_owned(),
            })
        })?;

        Ok(rows.iter().filter(|row| filter.matches(row)).collect())
    }
}

fn project(rows: Vec<&Row>, columns: &[String]) -> query_connector::Result<ManyRecords> {
    let mut records = ManyRecords::empty(columns);

    for row in rows {
        let values = columns
            .iter()
            .map(|column| {
                row.get(column).cloned().ok_or_else(|| {
                    ConnectorError::from_kind(ErrorKind::ColumnDoesNotExist { column: column.clone() })
                })
            })
            .collect::<query_connector::Result<Vec<_>>>()?;

        records.push(Record::new(values));
    }

    Ok(records)
}

#[async_trait]
impl ReadOperations for InMemoryConnector {
    async fn get_many_records(
        &self,
        table: &str,
        columns: &[String],
        query_arguments: QueryArguments,
    ) -> query_connector::Result<ManyRecords> {
        let mut rows = self
            .scan(table, ReadKind::Fetch, &query_arguments.filter, query_arguments.take)
            .await?;

        rows.sort_by(|a, b| compare_rows(&query_arguments.order_by, a, b));

        if let Some(take) = query_arguments.take {
            rows.truncate(take);
        }

        project(rows, columns)
    }

    async fn get_many_records_windowed(
        &self,
        table: &str,
        columns: &[String],
        query_arguments: QueryArguments,
        window: RowNumberWindow,
    ) -> query_connector::Result<ManyRecords> {
        let mut rows = self
            .scan(table, ReadKind::WindowedFetch, &query_arguments.filter, Some(window.limit))
            .await?;

        rows.sort_by(|a, b| compare_rows(&query_arguments.order_by, a, b));

        let mut numbered: IndexMap<GraphValue, usize> = IndexMap::new();

        rows.retain(|row| {
            let partition = row.get(&window.partition_by).cloned().unwrap_or(GraphValue::Null);
            let row_number = numbered.entry(partition).or_insert(0);
            *row_number += 1;

            *row_number <= window.limit
        });

        project(rows, columns)
    }

    async fn count_records(&self, table: &str, filter: &Filter) -> query_connector::Result<usize> {
        let rows = self.scan(table, ReadKind::Count, filter, None).await?;

        Ok(rows.len())
    }

    async fn count_records_grouped(
        &self,
        table: &str,
        filter: &Filter,
        group_by: &str,
    ) -> query_connector::Result<Vec<(GraphValue, usize)>> {
        let rows = self.scan(table, ReadKind::GroupedCount, filter, None).await?;

        let counts = rows
            .into_iter()
            .map(|row| row.get(group_by).cloned().unwrap_or(GraphValue::Null))
            .counts()
            .into_iter()
            .sorted()
            .collect();

        Ok(counts)
    }
}
