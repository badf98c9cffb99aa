use super::*;
use indexmap::IndexMap;

/// Builds the canonical [`Selection`] tree from the raw AST. Needs no schema knowledge: fragments
/// are filed under their type condition and only resolved during binding.
pub struct SelectionBuilder<'a> {
    fragments: &'a FragmentTable,
    active_spreads: Vec<String>,
}

impl<'a> SelectionBuilder<'a> {
    pub fn new(fragments: &'a FragmentTable) -> Self {
        Self {
            fragments,
            active_spreads: Vec::new(),
        }
    }

    pub fn build(root: &RawField, fragments: &'a FragmentTable) -> Result<Selection, QueryParserError> {
        let mut builder = Self::new(fragments);
        let path = QueryPath::new(root.name.clone());

        builder.build_field(root, &path)
    }

    fn build_field(&mut self, raw: &RawField, path: &QueryPath) -> Result<Selection, QueryParserError> {
        let mut arguments = IndexMap::with_capacity(raw.arguments.len());

        for (name, value) in &raw.arguments {
            if arguments.insert(name.clone(), value.clone()).is_some() {
                return Err(QueryParserError::new(
                    path.clone(),
                    QueryParserErrorKind::DuplicateArgument { argument: name.clone() },
                ));
            }
        }

        let mut selection = Selection::new(raw.name.clone(), raw.alias.clone(), arguments);
        self.fill(&mut selection, &raw.selection_set, path)?;

        Ok(selection)
    }

    fn fill(
        &mut self,
        target: &mut Selection,
        items: &[RawSelection],
        path: &QueryPath,
    ) -> Result<(), QueryParserError> {
        for item in items {
            match item {
                RawSelection::Field(field) => {
                    let child_path = path.add(field.alias.as_deref().unwrap_or(&field.name));
                    let child = self.build_field(field, &child_path)?;

                    target
                        .push_subselection(child)
                        .map_err(|kind| QueryParserError::new(child_path, kind))?;
                }

                RawSelection::FragmentSpread(name) => {
                    let fragments = self.fragments;
                    let definition = fragments.get(name).ok_or_else(|| {
                        QueryParserError::new(path.clone(), QueryParserErrorKind::UnknownFragment { name: name.clone() })
                    })?;

                    if self.active_spreads.contains(name) {
                        return Err(QueryParserError::new(
                            path.clone(),
                            QueryParserErrorKind::FragmentCycle { name: name.clone() },
                        ));
                    }

                    self.active_spreads.push(name.clone());
                    let fragment = self.build_fragment(&definition.type_condition, &definition.selection_set, path);
                    self.active_spreads.pop();

                    target.push_fragment(definition.type_condition.clone(), fragment?);
                }

                RawSelection::InlineFragment {
                    type_condition: Some(type_condition),
                    selection_set,
                } => {
                    let fragment = self.build_fragment(type_condition, selection_set, path)?;
                    target.push_fragment(type_condition.clone(), fragment);
                }

                // Without a type condition the fragment applies to the enclosing type.
                RawSelection::InlineFragment {
                    type_condition: None,
                    selection_set,
                } => self.fill(target, selection_set, path)?,
            }
        }

        Ok(())
    }

    fn build_fragment(
        &mut self,
        type_condition: &str,
        items: &[RawSelection],
        path: &QueryPath,
    ) -> Result<Selection, QueryParserError> {
        let mut fragment = Selection::with_name(type_condition);
        self.fill(&mut fragment, items, path)?;

        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aliases_of_the_same_field_are_kept_apart() {
        let root = RawField::new("Query")
            .field(RawField::new("users").alias("a").argument("first", 2).fields(&["id"]))
            .field(RawField::new("users").alias("b").argument("first", 2).fields(&["id"]));

        let selection = SelectionBuilder::build(&root, &FragmentTable::new()).unwrap();
        let keys: Vec<&String> = selection.subselections().keys().collect();

        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(selection.subselection("a"), selection.subselection("b"));
    }

    #[test]
    fn incompatible_duplicates_name_the_path() {
        let root = RawField::new("Query").field(
            RawField::new("user")
                .field(RawField::new("posts").argument("first", 1))
                .field(RawField::new("posts").argument("first", 5)),
        );

        let err = SelectionBuilder::build(&root, &FragmentTable::new()).unwrap_err();

        assert_eq!(err.path.to_string(), "Query.user.posts");
        assert_eq!(
            err.error_kind,
            QueryParserErrorKind::DuplicateField { field: "posts".into() }
        );
    }

    #[test]
    fn fragments_are_filed_by_type_condition() {
        let fragments = FragmentTable::new().with(FragmentDefinition {
            name: "PhotoParts".into(),
            type_condition: "Photo".into(),
            selection_set: vec![RawField::new("url").into()],
        });

        let root = RawField::new("Query").field(
            RawField::new("feed")
                .fields(&["id"])
                .spread("PhotoParts")
                .inline_fragment(Some("Post"), vec![RawField::new("title").into()])
                .inline_fragment(None, vec![RawField::new("created_at").into()]),
        );

        let selection = SelectionBuilder::build(&root, &fragments).unwrap();
        let feed = selection.subselection("feed").unwrap();

        let keys: Vec<&String> = feed.subselections().keys().collect();
        let conditions: Vec<&String> = feed.fragments().keys().collect();

        assert_eq!(keys, vec!["id", "created_at"]);
        assert_eq!(conditions, vec!["Photo", "Post"]);
        assert!(feed.fragments()["Photo"][0].subselection("url").is_some());
    }

    #[test]
    fn unknown_fragments_fail() {
        let root = RawField::new("Query").field(RawField::new("feed").spread("Missing"));
        let err = SelectionBuilder::build(&root, &FragmentTable::new()).unwrap_err();

        assert_eq!(
            err.error_kind,
            QueryParserErrorKind::UnknownFragment { name: "Missing".into() }
        );
    }

    #[test]
    fn self_spreading_fragments_fail() {
        let fragments = FragmentTable::new()
            .with(FragmentDefinition {
                name: "A".into(),
                type_condition: "User".into(),
                selection_set: vec![RawSelection::FragmentSpread("B".into())],
            })
            .with(FragmentDefinition {
                name: "B".into(),
                type_condition: "User".into(),
                selection_set: vec![RawSelection::FragmentSpread("A".into())],
            });

        let root = RawField::new("Query").field(RawField::new("me").spread("A"));
        let err = SelectionBuilder::build(&root, &fragments).unwrap_err();

        assert!(matches!(err.error_kind, QueryParserErrorKind::FragmentCycle { .. }));
    }
}
