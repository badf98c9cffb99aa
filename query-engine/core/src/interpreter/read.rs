use super::{InterpretationResult, plan::QueryPlan};
use crate::ResultRecord;
use connector::{QueryArguments, ReadOperations, RowNumberWindow};
use futures::future;
use query_structure::{Cursor, DomainResult, GraphValue, ManyRecords};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub(crate) enum RecordCount {
    #[default]
    NotRequested,
    Total(usize),

    /// Counts per value of the remote join column.
    Grouped(HashMap<GraphValue, usize>),
}

/// Records of one executed plan, with their count if one was requested.
#[derive(Debug, Default)]
pub(crate) struct PlanOutput {
    pub records: Vec<ResultRecord>,
    pub count: RecordCount,
}

/// Executes a plan. Counts run concurrently with the fetch. Joined plans issue one read per
/// chunk of parent keys.
pub(crate) async fn execute_plan(
    connector: &dyn ReadOperations,
    plan: &QueryPlan,
    max_bind_values: Option<usize>,
) -> InterpretationResult<PlanOutput> {
    let args = QueryArguments::new(plan.fetch_filter()).with_take(plan.take);
    let args = match &plan.fetch_order {
        Some(order) => args.with_order(order),
        None => args,
    };

    let (records, count) = match &plan.join {
        None => {
            debug!(table = plan.table(), take = ?plan.take, count = plan.count, "reading records");

            let fetch = connector.get_many_records(plan.table(), &plan.columns, args);
            let count = async {
                if plan.count {
                    connector.count_records(plan.table(), &plan.filter).await.map(RecordCount::Total)
                } else {
                    Ok(RecordCount::NotRequested)
                }
            };

            future::try_join(fetch, count).await?
        }

        Some(join) => {
            let chunk_size = max_bind_values.unwrap_or(join.keys.len()).max(1);

            debug!(
                table = plan.table(),
                parent_keys = join.keys.len(),
                chunks = join.keys.len().div_ceil(chunk_size),
                take = ?plan.take,
                count = plan.count,
                "reading related records"
            );

            let chunks: Vec<&[GraphValue]> = join.keys.chunks(chunk_size).collect();
            let batches = args.batched(&join.remote_column, &join.keys, chunk_size);

            let fetches = batches.into_iter().zip(&chunks).map(|(args, keys)| match plan.take {
                // Several parents share the limit: number the rows of each parent separately.
                Some(limit) if keys.len() > 1 => connector.get_many_records_windowed(
                    plan.table(),
                    &plan.columns,
                    args,
                    RowNumberWindow::new(join.remote_column.clone(), limit),
                ),
                _ => connector.get_many_records(plan.table(), &plan.columns, args),
            });

            let counts = chunks.iter().map(|keys| {
                let filter = plan.join_filter(keys);

                async move {
                    if plan.count {
                        connector
                            .count_records_grouped(plan.table(), &filter, &join.remote_column)
                            .await
                            .map(Some)
                    } else {
                        Ok(None)
                    }
                }
            });

            let (batches, counts) = future::try_join(future::try_join_all(fetches), future::try_join_all(counts)).await?;

            let mut records = ManyRecords::empty(&plan.columns);
            for batch in batches {
                records.extend(batch);
            }

            let count = if plan.count {
                RecordCount::Grouped(counts.into_iter().flatten().flatten().collect())
            } else {
                RecordCount::NotRequested
            };

            (records, count)
        }
    };

    Ok(PlanOutput {
        records: into_result_records(plan, records)?,
        count,
    })
}

fn into_result_records(plan: &QueryPlan, records: ManyRecords) -> DomainResult<Vec<ResultRecord>> {
    let type_name = plan.object_type.name.as_str();

    let sort_indexes = match &plan.sort_order {
        Some(order) => order
            .columns()
            .map(|column| records.require_column(type_name, column))
            .collect::<DomainResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    let parent_index = match &plan.join {
        Some(join) => Some(records.require_column(type_name, &join.remote_column)?),
        None => None,
    };

    let field_names: Arc<[String]> = records.field_names.into();
    let value_at = |values: &[GraphValue], idx: usize| values.get(idx).cloned().unwrap_or(GraphValue::Null);

    let records = records
        .records
        .into_iter()
        .map(|record| {
            let sort_key: Vec<GraphValue> = sort_indexes.iter().map(|idx| value_at(&record.values, *idx)).collect();
            let parent_key = parent_index.map(|idx| value_at(&record.values, idx));

            let mut result = ResultRecord::new(plan.object_type.clone(), field_names.clone(), record.values);

            if plan.cursors {
                let mut values = sort_key.clone();

                if plan.typed_cursors {
                    values.push(GraphValue::String(type_name.to_owned()));
                }

                result.set_cursor(Cursor::new(values).encode());
            }

            result.sort_key = sort_key;
            result.parent_key = parent_key;
            result
        })
        .collect();

    Ok(records)
}
