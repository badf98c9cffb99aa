//! The raw selection AST: a direct image of the parsed query, before duplicate fields are merged
//! and before fragments are resolved.

use indexmap::IndexMap;
use query_structure::GraphValue;

#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: Vec<(String, GraphValue)>,
    pub selection_set: Vec<RawSelection>,
}

impl RawField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, value: impl Into<GraphValue>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }

    pub fn field(mut self, field: RawField) -> Self {
        self.selection_set.push(RawSelection::Field(field));
        self
    }

    /// Shorthand for a list of leaf fields.
    pub fn fields(mut self, names: &[&str]) -> Self {
        self.selection_set
            .extend(names.iter().map(|name| RawSelection::Field(RawField::new(*name))));
        self
    }

    pub fn spread(mut self, fragment_name: impl Into<String>) -> Self {
        self.selection_set.push(RawSelection::FragmentSpread(fragment_name.into()));
        self
    }

    pub fn inline_fragment(mut self, type_condition: Option<&str>, selection_set: Vec<RawSelection>) -> Self {
        self.selection_set.push(RawSelection::InlineFragment {
            type_condition: type_condition.map(ToOwned::to_owned),
            selection_set,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawSelection {
    Field(RawField),
    FragmentSpread(String),
    InlineFragment {
        type_condition: Option<String>,
        selection_set: Vec<RawSelection>,
    },
}

impl From<RawField> for RawSelection {
    fn from(field: RawField) -> Self {
        RawSelection::Field(field)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDefinition {
    pub name: String,
    pub type_condition: String,
    pub selection_set: Vec<RawSelection>,
}

/// Named fragments of a query document, looked up when a spread is encountered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentTable {
    fragments: IndexMap<String, FragmentDefinition>,
}

impl FragmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fragment: FragmentDefinition) {
        self.fragments.insert(fragment.name.clone(), fragment);
    }

    pub fn with(mut self, fragment: FragmentDefinition) -> Self {
        self.insert(fragment);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FragmentDefinition> {
        self.fragments.get(name)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// A whole query: the root field (named after the root type) plus its named fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub root: RawField,
    pub fragments: FragmentTable,
}

impl RawDocument {
    pub fn new(root: RawField) -> Self {
        Self {
            root,
            fragments: FragmentTable::new(),
        }
    }

    pub fn with_fragments(mut self, fragments: FragmentTable) -> Self {
        self.fragments = fragments;
        self
    }
}
