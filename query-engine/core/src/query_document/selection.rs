use crate::QueryParserErrorKind;
use indexmap::IndexMap;
use query_structure::GraphValue;

pub type SelectionArgument = (String, GraphValue);
pub type SelectionSet = IndexMap<String, Selection>;

/// A node of the canonical query tree.
///
/// Subselections are keyed by output key (alias or name) and keep insertion order. Fragments are
/// not spliced in at build time: they are kept per type condition until the selection is bound
/// to a concrete type.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    name: String,
    alias: Option<String>,
    arguments: IndexMap<String, GraphValue>,
    subselections: SelectionSet,
    fragments: IndexMap<String, Vec<Selection>>,
}

/// Two invocations of a field are the same when everything except the output key matches.
impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.arguments == other.arguments
            && self.subselections == other.subselections
            && self.fragments == other.fragments
    }
}

impl Selection {
    pub fn with_name(name: impl Into<String>) -> Selection {
        Selection {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn new<T, A>(name: T, alias: Option<String>, arguments: A) -> Self
    where
        T: Into<String>,
        A: IntoIterator<Item = SelectionArgument>,
    {
        Self {
            name: name.into(),
            alias,
            arguments: arguments.into_iter().collect(),
            subselections: IndexMap::new(),
            fragments: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &Option<String> {
        &self.alias
    }

    /// The key this selection is returned under: its alias if it has one, its name otherwise.
    pub fn output_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn arguments(&self) -> &IndexMap<String, GraphValue> {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&GraphValue> {
        self.arguments.get(name)
    }

    pub fn subselections(&self) -> &SelectionSet {
        &self.subselections
    }

    pub fn subselection(&self, output_key: &str) -> Option<&Selection> {
        self.subselections.get(output_key)
    }

    pub fn fragments(&self) -> &IndexMap<String, Vec<Selection>> {
        &self.fragments
    }

    /// Files a partial selection set under the type it applies to.
    pub fn push_fragment(&mut self, type_condition: impl Into<String>, fragment: Selection) {
        self.fragments.entry(type_condition.into()).or_default().push(fragment);
    }

    /// Inserts `selection` under its output key, merging it into a selection already stored there.
    pub fn push_subselection(&mut self, selection: Selection) -> Result<(), QueryParserErrorKind> {
        match self.subselections.get_mut(selection.output_key()) {
            Some(existing) if existing.name != selection.name => Err(QueryParserErrorKind::DuplicateField {
                field: selection.output_key().to_owned(),
            }),
            Some(existing) => existing.merge(selection),
            None => {
                self.subselections.insert(selection.output_key().to_owned(), selection);
                Ok(())
            }
        }
    }

    /// Merges another invocation of the same field into this one. Fails if the arguments differ;
    /// subselections and fragments are merged recursively.
    pub fn merge(&mut self, other: Selection) -> Result<(), QueryParserErrorKind> {
        if self.arguments != other.arguments {
            return Err(QueryParserErrorKind::DuplicateField {
                field: self.output_key().to_owned(),
            });
        }

        self.splice(other)
    }

    /// Merges the contents of a fragment, which carries no arguments of its own.
    pub fn splice(&mut self, fragment: Selection) -> Result<(), QueryParserErrorKind> {
        for (_, selection) in fragment.subselections {
            self.push_subselection(selection)?;
        }

        for (type_condition, fragments) in fragment.fragments {
            self.fragments.entry(type_condition).or_default().extend(fragments);
        }

        Ok(())
    }

    /// A copy of this selection without its fragments.
    pub fn without_fragments(&self) -> Selection {
        Selection {
            name: self.name.clone(),
            alias: self.alias.clone(),
            arguments: self.arguments.clone(),
            subselections: self.subselections.clone(),
            fragments: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(name: &str, alias: Option<&str>, args: Vec<SelectionArgument>, children: &[&str]) -> Selection {
        let mut selection = Selection::new(name, alias.map(ToOwned::to_owned), args);

        for child in children {
            selection.push_subselection(Selection::with_name(*child)).unwrap();
        }

        selection
    }

    #[test]
    fn equality_ignores_the_alias() {
        let a = field("posts", Some("recent"), vec![("first".into(), 3.into())], &["id"]);
        let b = field("posts", None, vec![("first".into(), 3.into())], &["id"]);

        assert_eq!(a, b);
    }

    #[test]
    fn same_key_merges_subselections() {
        let mut root = Selection::with_name("Query");
        root.push_subselection(field("user", None, vec![], &["id"])).unwrap();
        root.push_subselection(field("user", None, vec![], &["name"])).unwrap();

        let keys: Vec<&String> = root.subselection("user").unwrap().subselections().keys().collect();

        assert_eq!(keys, vec!["id", "name"]);
    }

    #[test]
    fn same_key_with_different_arguments_fails() {
        let mut root = Selection::with_name("Query");
        root.push_subselection(field("posts", None, vec![("first".into(), 1.into())], &[]))
            .unwrap();

        let err = root
            .push_subselection(field("posts", None, vec![("first".into(), 2.into())], &[]))
            .unwrap_err();

        assert_eq!(err, QueryParserErrorKind::DuplicateField { field: "posts".into() });
    }

    #[test]
    fn same_key_for_different_fields_fails() {
        let mut root = Selection::with_name("Query");
        root.push_subselection(field("name", Some("x"), vec![], &[])).unwrap();

        assert!(root.push_subselection(field("email", Some("x"), vec![], &[])).is_err());
    }
}
