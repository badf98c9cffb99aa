use parking_lot::Mutex;
use query_structure::Filter;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadKind {
    Fetch,
    WindowedFetch,
    Count,
    GroupedCount,
}

impl fmt::Display for ReadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadKind::Fetch => f.write_str("fetch"),
            ReadKind::WindowedFetch => f.write_str("windowed fetch"),
            ReadKind::Count => f.write_str("count"),
            ReadKind::GroupedCount => f.write_str("grouped count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedQuery {
    pub table: String,
    pub kind: ReadKind,
    pub filter: Filter,
    pub take: Option<usize>,
}

impl LoggedQuery {
    pub fn is_fetch(&self) -> bool {
        matches!(self.kind, ReadKind::Fetch | ReadKind::WindowedFetch)
    }
}

/// Reads issued against the connector, in issue order.
#[derive(Debug, Default)]
pub struct QueryLog {
    entries: Mutex<Vec<LoggedQuery>>,
}

impl QueryLog {
    pub(crate) fn record(&self, query: LoggedQuery) {
        tracing::debug!(table = %query.table, kind = %query.kind, filter = %query.filter, "in-memory read");
        self.entries.lock().push(query);
    }

    pub fn entries(&self) -> Vec<LoggedQuery> {
        self.entries.lock().clone()
    }

    pub fn for_table(&self, table: &str) -> Vec<LoggedQuery> {
        self.entries.lock().iter().filter(|q| q.table == table).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
