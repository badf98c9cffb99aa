use crate::{
    DomainError, DomainResult, Interface, InterfaceRef, ObjectType, ObjectTypeRef, RootField, RootFieldKind,
    RootFieldRef,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Static registry of every type, interface and root field the resolver can serve.
///
/// Built once through [`SchemaBuilder`] and shared behind an `Arc`; every binding and planning
/// entry point receives it explicitly.
#[derive(Debug, Default)]
pub struct Schema {
    types: IndexMap<String, ObjectTypeRef>,
    interfaces: IndexMap<String, InterfaceRef>,
    root_fields: IndexMap<String, RootFieldRef>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn find_object_type(&self, name: &str) -> DomainResult<&ObjectTypeRef> {
        self.types
            .get(name)
            .ok_or_else(|| DomainError::TypeNotFound { name: name.to_owned() })
    }

    pub fn find_interface(&self, name: &str) -> Option<&InterfaceRef> {
        self.interfaces.get(name)
    }

    pub fn find_root_field(&self, name: &str) -> Option<&RootFieldRef> {
        self.root_fields.get(name)
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name) || self.interfaces.contains_key(name)
    }

    pub fn object_types(&self) -> impl Iterator<Item = &ObjectTypeRef> {
        self.types.values()
    }

    /// The concrete types behind a type or interface name, in declaration order.
    pub fn covered_types(&self, name: &str) -> DomainResult<Vec<ObjectTypeRef>> {
        if let Some(object_type) = self.types.get(name) {
            return Ok(vec![object_type.clone()]);
        }

        match self.interfaces.get(name) {
            Some(interface) => interface
                .covered_types
                .iter()
                .map(|t| self.find_object_type(t).cloned())
                .collect(),
            None => Err(DomainError::TypeNotFound { name: name.to_owned() }),
        }
    }

    /// Whether a fragment conditioned on `condition` applies to the concrete type `target`.
    pub fn is_assignable(&self, condition: &str, target: &str) -> DomainResult<bool> {
        if condition == target && self.types.contains_key(condition) {
            return Ok(true);
        }

        match self.interfaces.get(condition) {
            Some(interface) => Ok(interface.covers(target)),
            None if self.types.contains_key(condition) => Ok(false),
            None => Err(DomainError::TypeNotFound {
                name: condition.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: Vec<ObjectType>,
    interfaces: Vec<Interface>,
    root_fields: Vec<RootField>,
}

impl SchemaBuilder {
    pub fn object_type(mut self, object_type: ObjectType) -> Self {
        self.types.push(object_type);
        self
    }

    pub fn interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn root_field(mut self, root_field: RootField) -> Self {
        self.root_fields.push(root_field);
        self
    }

    /// Validates every cross reference and freezes the registry.
    pub fn build(self) -> DomainResult<Schema> {
        let mut schema = Schema::default();

        for object_type in self.types {
            if schema.types.contains_key(&object_type.name) {
                return Err(DomainError::InvalidSchema(format!(
                    "type `{}` is declared twice",
                    object_type.name
                )));
            }

            schema.types.insert(object_type.name.clone(), Arc::new(object_type));
        }

        for interface in self.interfaces {
            if schema.contains_type(&interface.name) {
                return Err(DomainError::InvalidSchema(format!(
                    "interface `{}` clashes with another type or interface",
                    interface.name
                )));
            }

            if interface.covered_types.is_empty() {
                return Err(DomainError::InvalidSchema(format!(
                    "interface `{}` covers no types",
                    interface.name
                )));
            }

            for covered in &interface.covered_types {
                if !schema.types.contains_key(covered) {
                    return Err(DomainError::InvalidSchema(format!(
                        "interface `{}` covers unknown type `{covered}`",
                        interface.name
                    )));
                }
            }

            schema.interfaces.insert(interface.name.clone(), Arc::new(interface));
        }

        for object_type in schema.types.values() {
            for association in object_type.associations() {
                association.validate(&object_type.name)?;

                if !schema.contains_type(&association.target) {
                    return Err(DomainError::InvalidAssociation {
                        type_name: object_type.name.clone(),
                        association: association.name.clone(),
                        reason: format!("target `{}` does not exist", association.target),
                    });
                }
            }
        }

        for root_field in self.root_fields {
            if !schema.contains_type(&root_field.target) {
                return Err(DomainError::InvalidSchema(format!(
                    "root field `{}` targets unknown type `{}`",
                    root_field.name, root_field.target
                )));
            }

            if let RootFieldKind::Connection { order } = &root_field.kind {
                if order.is_empty() {
                    return Err(DomainError::InvalidSchema(format!(
                        "root connection `{}` requires a declared order",
                        root_field.name
                    )));
                }
            }

            schema.root_fields.insert(root_field.name.clone(), Arc::new(root_field));
        }

        Ok(schema)
    }
}
