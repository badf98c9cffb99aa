use super::{
    InterpretationResult,
    merge::{merge_many, merge_one},
    nested_read::{ChildIndex, join_keys},
    plan::{JoinSpec, QueryPlan, ensure_consistent_order},
    read::{PlanOutput, RecordCount, execute_plan},
};
use crate::{BoundSelection, QueryResult, ResolverConfig, ResultRecord, ResultSet, RootRead, RootReadKind};
use connector::ReadOperations;
use futures::{StreamExt, TryStreamExt, stream};
use indexmap::IndexMap;
use query_structure::{Filter, GraphValue, ScalarCompare};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Root reads carry a limit of two so that ambiguous lookups are detected without reading the
/// whole table.
const SINGULAR_TAKE: usize = 2;

/// One entry point of a resolution.
struct RootPosition<'b> {
    key: &'b str,
    filter: &'b Filter,
    targets: &'b [BoundSelection],
    singular_id: Option<&'b GraphValue>,
}

/// One read: a position of the tree bound to one concrete type.
struct ReadNode<'b> {
    position: String,
    target: &'b BoundSelection,
    plan: QueryPlan,
}

/// Resolves bound selections level by level.
///
/// Every level is read completely, its reads running concurrently up to the configured limit,
/// before the reads of the next level are planned from its records. Results are then assembled
/// bottom-up, children before parents.
pub struct ReadInterpreter<'conn> {
    connector: &'conn dyn ReadOperations,
    config: &'conn ResolverConfig,
}

impl<'conn> ReadInterpreter<'conn> {
    pub fn new(connector: &'conn dyn ReadOperations, config: &'conn ResolverConfig) -> Self {
        Self { connector, config }
    }

    /// Resolves a list position over the given per-type selections.
    pub async fn resolve(&self, targets: &[BoundSelection], filter: &Filter) -> InterpretationResult<ResultSet> {
        let root = RootPosition {
            key: "",
            filter,
            targets,
            singular_id: None,
        };

        match self.run(vec![root]).await?.pop() {
            Some(QueryResult::Many(set)) => Ok(set),
            _ => Ok(ResultSet::default()),
        }
    }

    /// Looks up the record with primary key `id` across the given per-type selections. More than
    /// one match is an error.
    pub async fn resolve_singular(
        &self,
        targets: &[BoundSelection],
        filter: &Filter,
        id: &GraphValue,
    ) -> InterpretationResult<Option<ResultRecord>> {
        let root = RootPosition {
            key: "",
            filter,
            targets,
            singular_id: Some(id),
        };

        match self.run(vec![root]).await?.pop() {
            Some(QueryResult::One(record)) => Ok(record.map(|record| *record)),
            _ => Ok(None),
        }
    }

    /// Resolves every root read of a document in one pass, so that reads of the same level run
    /// together.
    #[tracing::instrument(skip_all, fields(root_fields = reads.len()))]
    pub async fn resolve_all(&self, reads: &[RootRead]) -> InterpretationResult<IndexMap<String, QueryResult>> {
        let roots = reads
            .iter()
            .map(|read| RootPosition {
                key: &read.key,
                filter: &read.filter,
                targets: &read.targets,
                singular_id: match &read.kind {
                    RootReadKind::Single { id } => Some(id),
                    RootReadKind::Many => None,
                },
            })
            .collect();

        let results = self.run(roots).await?;

        Ok(reads.iter().map(|read| read.key.clone()).zip(results).collect())
    }

    async fn run<'b>(&self, roots: Vec<RootPosition<'b>>) -> InterpretationResult<Vec<QueryResult>> {
        let mut nodes: Vec<ReadNode<'b>> = Vec::new();
        let mut children: Vec<Vec<(&'b str, usize)>> = Vec::new();
        let mut root_nodes: Vec<Vec<usize>> = Vec::with_capacity(roots.len());

        for root in &roots {
            let position = format!("Query.{}", root.key);
            ensure_consistent_order(&position, root.targets)?;

            let mut ids = Vec::with_capacity(root.targets.len());

            for target in root.targets {
                let (filter, take) = match root.singular_id {
                    Some(id) => {
                        let lookup = target.object_type().primary_key.as_str().equals(id.clone());
                        (Filter::and(vec![root.filter.clone(), lookup]), Some(SINGULAR_TAKE))
                    }
                    None => (root.filter.clone(), None),
                };

                ids.push(nodes.len());
                nodes.push(ReadNode {
                    position: position.clone(),
                    target,
                    plan: QueryPlan::compile(target, &filter, None, take),
                });
                children.push(Vec::new());
            }

            root_nodes.push(ids);
        }

        let mut outputs: Vec<Option<PlanOutput>> = Vec::new();
        outputs.resize_with(nodes.len(), || None);

        let mut level: Vec<usize> = (0..nodes.len()).collect();
        let mut depth = 0;

        while !level.is_empty() {
            debug!(depth, reads = level.len(), "resolving level");

            for (id, output) in self.execute_level(&nodes, &level).await? {
                outputs[id] = Some(output);
            }

            let mut planned = Vec::new();

            for &parent_id in &level {
                let parent = &nodes[parent_id];
                let target: &'b BoundSelection = parent.target;
                let (Some(field), Some(output)) = (target.record_selection(), &outputs[parent_id]) else {
                    continue;
                };

                for (key, bound) in field.associations() {
                    let position = format!("{}.{}", parent.position, key);
                    let keys = join_keys(&output.records, &bound.association.local_column)?;

                    // No parent can have children: every association resolves to nothing.
                    if keys.is_empty() {
                        continue;
                    }

                    ensure_consistent_order(&position, &bound.targets)?;

                    for child_target in &bound.targets {
                        let join = JoinSpec {
                            remote_column: bound.association.remote_column.clone(),
                            keys: keys.clone(),
                        };

                        let plan = QueryPlan::compile(child_target, &bound.filter, Some(join), None);
                        let node = ReadNode {
                            position: position.clone(),
                            target: child_target,
                            plan,
                        };

                        planned.push((parent_id, key, node));
                    }
                }
            }

            level = Vec::with_capacity(planned.len());

            for (parent_id, key, node) in planned {
                let id = nodes.len();

                children[parent_id].push((key, id));
                children.push(Vec::new());
                outputs.push(None);
                nodes.push(node);
                level.push(id);
            }

            depth += 1;
        }

        for id in (0..nodes.len()).rev() {
            assemble(&nodes[id], &children[id], id, &mut outputs)?;
        }

        roots
            .iter()
            .zip(root_nodes)
            .map(|(root, ids)| {
                let mut records = Vec::new();
                let mut total_count = 0;

                for id in ids {
                    if let Some(output) = outputs[id].take() {
                        records.extend(output.records);

                        if let RecordCount::Total(count) = output.count {
                            total_count += count;
                        }
                    }
                }

                match root.singular_id {
                    Some(_) => merge_one(records, &format!("Query.{}", root.key), None).map(QueryResult::One),
                    None => {
                        let connection = root.targets.first().and_then(BoundSelection::as_connection);
                        Ok(QueryResult::Many(merge_many(records, connection, total_count)))
                    }
                }
            })
            .collect()
    }

    async fn execute_level(&self, nodes: &[ReadNode<'_>], level: &[usize]) -> InterpretationResult<Vec<(usize, PlanOutput)>> {
        let max_bind_values = self.config.max_bind_values;

        stream::iter(level.iter().map(|&id| {
            let node = &nodes[id];
            trace!(position = %node.position, object_type = %node.plan.object_type.name, plan = %node.plan, "executing plan");

            async move {
                execute_plan(self.connector, &node.plan, max_bind_values)
                    .await
                    .map(|output| (id, output))
            }
        }))
        .buffer_unordered(self.config.effective_concurrency())
        .try_collect()
        .await
    }
}

/// Attaches the already assembled children of a node to its records.
fn assemble(
    node: &ReadNode<'_>,
    children: &[(&str, usize)],
    id: usize,
    outputs: &mut [Option<PlanOutput>],
) -> InterpretationResult<()> {
    let Some(field) = node.target.record_selection() else {
        return Ok(());
    };

    let Some(mut output) = outputs[id].take() else {
        return Ok(());
    };

    for (key, bound) in field.associations() {
        let association = &bound.association;
        let position = format!("{}.{}", node.position, key);

        let mut child_records = Vec::new();
        let mut counts: HashMap<GraphValue, usize> = HashMap::new();

        for (_, child_id) in children.iter().filter(|(child_key, _)| *child_key == key) {
            if let Some(child) = outputs[*child_id].take() {
                child_records.extend(child.records);

                if let RecordCount::Grouped(grouped) = child.count {
                    for (parent_key, count) in grouped {
                        *counts.entry(parent_key).or_default() += count;
                    }
                }
            }
        }

        let join_values: Vec<GraphValue> = output
            .records
            .iter()
            .map(|record| record.get(&association.local_column).cloned().unwrap_or(GraphValue::Null))
            .collect();

        let mut index = ChildIndex::new(child_records, join_values.iter().filter(|v| !v.is_null()));
        let connection = bound.targets.first().and_then(BoundSelection::as_connection);

        for (record, join_value) in output.records.iter_mut().zip(&join_values) {
            let matched = if join_value.is_null() {
                Vec::new()
            } else {
                index.take(join_value)
            };

            let result = if association.is_many() {
                let total_count = counts.get(join_value).copied().unwrap_or(0);
                QueryResult::Many(merge_many(matched, connection, total_count))
            } else {
                let required = (!association.nullable && !join_value.is_null()).then_some(join_value);
                QueryResult::One(merge_one(matched, &position, required)?)
            };

            record.associations.insert(key.to_owned(), result);
        }
    }

    outputs[id] = Some(output);
    Ok(())
}
