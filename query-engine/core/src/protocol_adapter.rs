use crate::query_document::*;
use graphql_parser::query::{
    Definition, Document, FragmentDefinition as GqlFragmentDefinition, OperationDefinition, Selection as GqlSelection,
    SelectionSet, Type, TypeCondition, Value, VariableDefinition,
};
use query_structure::GraphValue;
use std::collections::HashMap;

type AdapterResult<T> = Result<T, QueryParserError>;
type Variables = serde_json::Map<String, serde_json::Value>;

/// Protocol adapter for GraphQL -> raw query document.
///
/// GraphQL is mapped as following:
/// - The fields of the picked `query { ... }` or `{ ... }` block become the children of a root
///   field named after the root type.
/// - If an operation name is given, only that operation is picked; otherwise the document must
///   contain exactly one operation.
/// - Fragment definitions end up in the fragment table, spreads and inline fragments are kept as
///   they are.
/// - `$variables` are substituted from the supplied JSON map, falling back to the declared
///   default value. An argument bound to an omitted nullable variable without default is left
///   out, as if it had not been written; omitted non-null variables are an error.
///
/// Unsupported: mutations and subscriptions, directives (ignored).
pub struct GraphQLProtocolAdapter<'v> {
    variables: &'v Variables,
    declared: HashMap<String, DeclaredVariable>,
}

struct DeclaredVariable {
    default: Option<Value<'static, String>>,
    required: bool,
}

impl<'v> GraphQLProtocolAdapter<'v> {
    pub fn parse(query: &str, operation: Option<&str>, variables: &'v Variables) -> AdapterResult<RawDocument> {
        let document = graphql_parser::parse_query::<String>(query).map_err(|err| {
            QueryParserError::new(
                QueryPath::new(ROOT_TYPE_NAME),
                QueryParserErrorKind::Syntax(err.to_string()),
            )
        })?;

        Self::convert(document.into_static(), operation, variables)
    }

    pub fn convert(
        gql_doc: Document<'static, String>,
        operation: Option<&str>,
        variables: &'v Variables,
    ) -> AdapterResult<RawDocument> {
        let root_path = QueryPath::new(ROOT_TYPE_NAME);
        let error = |kind| QueryParserError::new(root_path.clone(), kind);

        let mut operations = Vec::new();
        let mut fragments = Vec::new();

        for definition in gql_doc.definitions {
            match definition {
                Definition::Operation(op) => operations.push(op),
                Definition::Fragment(fragment) => fragments.push(fragment),
            }
        }

        let op = match operation {
            Some(name) => operations
                .into_iter()
                .find(|def| Self::matches_operation(def, name))
                .ok_or_else(|| error(QueryParserErrorKind::UnknownOperation { name: name.to_owned() }))?,
            None if operations.len() > 1 => {
                return Err(error(QueryParserErrorKind::UnsupportedOperation(
                    "An operation name is required when the document contains several operations.".into(),
                )));
            }
            None => operations.pop().ok_or_else(|| {
                error(QueryParserErrorKind::UnsupportedOperation(
                    "Document contained no operations.".into(),
                ))
            })?,
        };

        let (selection_set, variable_definitions) = match op {
            OperationDefinition::SelectionSet(s) => (s, Vec::new()),
            OperationDefinition::Query(q) => (q.selection_set, q.variable_definitions),
            OperationDefinition::Mutation(m) => {
                return Err(error(QueryParserErrorKind::UnsupportedOperation(format!(
                    "Mutations are not supported (at position {}).",
                    m.position
                ))));
            }
            OperationDefinition::Subscription(s) => {
                return Err(error(QueryParserErrorKind::UnsupportedOperation(format!(
                    "Subscriptions are not supported (at position {}).",
                    s.position
                ))));
            }
        };

        let adapter = Self {
            variables,
            declared: Self::collect_declarations(variable_definitions),
        };

        let mut root = RawField::new(ROOT_TYPE_NAME);
        root.selection_set = adapter.convert_selection_set(selection_set, &root_path)?;

        let mut table = FragmentTable::new();

        for fragment in fragments {
            table.insert(adapter.convert_fragment(fragment, &root_path)?);
        }

        Ok(RawDocument::new(root).with_fragments(table))
    }

    fn collect_declarations(
        definitions: Vec<VariableDefinition<'static, String>>,
    ) -> HashMap<String, DeclaredVariable> {
        definitions
            .into_iter()
            .map(|def| {
                let declaration = DeclaredVariable {
                    required: matches!(def.var_type, Type::NonNullType(_)),
                    default: def.default_value,
                };

                (def.name, declaration)
            })
            .collect()
    }

    fn convert_fragment(
        &self,
        fragment: GqlFragmentDefinition<'static, String>,
        path: &QueryPath,
    ) -> AdapterResult<FragmentDefinition> {
        let TypeCondition::On(type_condition) = fragment.type_condition;
        let path = path.add(fragment.name.clone());

        Ok(FragmentDefinition {
            name: fragment.name,
            type_condition,
            selection_set: self.convert_selection_set(fragment.selection_set, &path)?,
        })
    }

    fn convert_selection_set(
        &self,
        selection_set: SelectionSet<'static, String>,
        path: &QueryPath,
    ) -> AdapterResult<Vec<RawSelection>> {
        selection_set
            .items
            .into_iter()
            .map(|item| match item {
                GqlSelection::Field(f) => {
                    let path = path.add(f.alias.clone().unwrap_or_else(|| f.name.clone()));

                    let arguments = f
                        .arguments
                        .into_iter()
                        .filter_map(|(k, v)| match v {
                            Value::Variable(name) => self
                                .resolve_variable(name, &path)
                                .transpose()
                                .map(|value| value.map(|value| (k, value))),
                            v => Some(self.convert_value(v, &path).map(|value| (k, value))),
                        })
                        .collect::<AdapterResult<Vec<_>>>()?;

                    Ok(RawSelection::Field(RawField {
                        name: f.name,
                        alias: f.alias,
                        arguments,
                        selection_set: self.convert_selection_set(f.selection_set, &path)?,
                    }))
                }

                GqlSelection::FragmentSpread(fs) => Ok(RawSelection::FragmentSpread(fs.fragment_name)),

                GqlSelection::InlineFragment(i) => Ok(RawSelection::InlineFragment {
                    type_condition: i.type_condition.map(|TypeCondition::On(t)| t),
                    selection_set: self.convert_selection_set(i.selection_set, path)?,
                }),
            })
            .collect()
    }

    /// Checks if the given GraphQL definition matches the operation name that should be executed.
    fn matches_operation(def: &OperationDefinition<'static, String>, operation: &str) -> bool {
        let check = |n: Option<&String>| n.filter(|name| name.as_str() == operation).is_some();

        match def {
            OperationDefinition::Subscription(s) => check(s.name.as_ref()),
            OperationDefinition::SelectionSet(_) => false,
            OperationDefinition::Query(q) => check(q.name.as_ref()),
            OperationDefinition::Mutation(m) => check(m.name.as_ref()),
        }
    }

    /// The value of `$name`: supplied, else its default. `None` for an omitted nullable variable
    /// without default.
    fn resolve_variable(&self, name: String, path: &QueryPath) -> AdapterResult<Option<GraphValue>> {
        if let Some(json) = self.variables.get(&name) {
            return GraphValue::try_from(json.clone()).map(Some).map_err(|err| {
                QueryParserError::new(path.clone(), QueryParserErrorKind::ValueConversion(err.to_string()))
            });
        }

        match self.declared.get(&name) {
            Some(DeclaredVariable {
                default: Some(default), ..
            }) => self.convert_value(default.clone(), path).map(Some),
            Some(DeclaredVariable { required: false, .. }) => Ok(None),
            _ => Err(QueryParserError::new(
                path.clone(),
                QueryParserErrorKind::MissingVariable { name },
            )),
        }
    }

    fn convert_value(&self, value: Value<'static, String>, path: &QueryPath) -> AdapterResult<GraphValue> {
        let conversion_error =
            |msg: String| QueryParserError::new(path.clone(), QueryParserErrorKind::ValueConversion(msg));

        match value {
            Value::Variable(name) => self
                .resolve_variable(name, path)
                .map(|value| value.unwrap_or(GraphValue::Null)),
            Value::Int(i) => match i.as_i64() {
                Some(i) => Ok(GraphValue::Int(i)),
                None => Err(conversion_error(format!("Invalid 64 bit integer: {i:?}"))),
            },
            Value::Float(f) => {
                GraphValue::new_float(f).map_err(|_| conversion_error(format!("invalid 64-bit float: {f:?}")))
            }
            Value::String(s) => Ok(GraphValue::String(s)),
            Value::Boolean(b) => Ok(GraphValue::Boolean(b)),
            Value::Null => Ok(GraphValue::Null),
            Value::Enum(e) => Ok(GraphValue::Enum(e)),
            Value::List(values) => {
                let values = values
                    .into_iter()
                    .map(|v| self.convert_value(v, path))
                    .collect::<AdapterResult<Vec<GraphValue>>>()?;

                Ok(GraphValue::List(values))
            }
            Value::Object(map) => {
                let values = map
                    .into_iter()
                    .map(|(k, v)| self.convert_value(v, path).map(|v| (k, v)))
                    .collect::<AdapterResult<Vec<_>>>()?;

                Ok(GraphValue::Object(values))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(query: &str, variables: serde_json::Value) -> AdapterResult<RawDocument> {
        let variables = match variables {
            serde_json::Value::Object(map) => map,
            _ => Variables::new(),
        };

        GraphQLProtocolAdapter::parse(query, None, &variables)
    }

    #[test]
    fn converts_fields_aliases_and_arguments() {
        let query = r#"{ recent: posts(first: 2, status: PUBLISHED) { edges { node { id } } } }"#;
        let document = parse(query, serde_json::Value::Null).unwrap();

        let expected = RawField::new(ROOT_TYPE_NAME).field(
            RawField::new("posts")
                .alias("recent")
                .argument("first", 2)
                .argument("status", GraphValue::Enum("PUBLISHED".into()))
                .field(RawField::new("edges").field(RawField::new("node").fields(&["id"]))),
        );

        assert_eq!(document.root, expected);
    }

    #[test]
    fn substitutes_variables_and_defaults() {
        let query = r#"
            query Feed($count: Int = 10, $after: String) {
                feed(first: $count, after: $after) { count }
            }
        "#;

        let document = parse(query, serde_json::json!({ "after": "abc" })).unwrap();
        let RawSelection::Field(feed) = &document.root.selection_set[0] else {
            panic!("expected a field");
        };

        assert_eq!(
            feed.arguments,
            vec![
                ("first".to_owned(), GraphValue::Int(10)),
                ("after".to_owned(), GraphValue::from("abc")),
            ]
        );
    }

    #[test]
    fn missing_variables_are_malformed_queries() {
        let err = parse("query Q($id: ID!) { node(id: $id) { id } }", serde_json::Value::Null).unwrap_err();

        assert_eq!(err.error_kind, QueryParserErrorKind::MissingVariable { name: "id".into() });
        assert_eq!(err.path.to_string(), "Query.node");
    }

    #[test]
    fn omitted_nullable_variables_drop_their_argument() {
        let query = r#"
            query Page($first: Int, $after: String, $tag: String) {
                posts(first: $first, after: $after, status: [$tag]) { count }
            }
        "#;

        let document = parse(query, serde_json::json!({ "first": 2 })).unwrap();
        let RawSelection::Field(posts) = &document.root.selection_set[0] else {
            panic!("expected a field");
        };

        assert_eq!(
            posts.arguments,
            vec![
                ("first".to_owned(), GraphValue::Int(2)),
                ("status".to_owned(), GraphValue::List(vec![GraphValue::Null])),
            ]
        );
    }

    #[test]
    fn undeclared_variables_are_missing() {
        let err = parse("{ posts(first: $first) { count } }", serde_json::Value::Null).unwrap_err();

        assert_eq!(err.error_kind, QueryParserErrorKind::MissingVariable { name: "first".into() });
    }

    #[test]
    fn collects_fragment_definitions() {
        let query = r#"
            { feed(first: 1) { edges { node { ...Photo } } } }
            fragment Photo on Photo { url }
        "#;

        let document = parse(query, serde_json::Value::Null).unwrap();
        let fragment = document.fragments.get("Photo").unwrap();

        assert_eq!(fragment.type_condition, "Photo");
        assert_eq!(fragment.selection_set, vec![RawSelection::Field(RawField::new("url"))]);
    }

    #[test]
    fn rejects_mutations() {
        let err = parse("mutation { deleteEverything { id } }", serde_json::Value::Null).unwrap_err();

        assert!(matches!(err.error_kind, QueryParserErrorKind::UnsupportedOperation(_)));
    }
}
