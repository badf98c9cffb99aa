use super::*;
use crate::{Selection, SelectionPath};
use query_structure::AssociationRef;

/// Binds the selection of an association against every concrete type the association reaches:
/// many associations are entered as connections, to-one associations as fields.
pub struct AssociationDispatcher<'b, 's> {
    binder: &'b TypeBinder<'s>,
}

impl<'b, 's> AssociationDispatcher<'b, 's> {
    pub fn new(binder: &'b TypeBinder<'s>) -> Self {
        Self { binder }
    }

    pub fn dispatch(
        &self,
        association: &AssociationRef,
        selection: &Selection,
        path: &SelectionPath,
    ) -> QueryGraphBuilderResult<BoundAssociation> {
        let (filter, targets) = if association.is_many() {
            let order = association.order.as_ref().ok_or_else(|| {
                QueryGraphBuilderError::SchemaError(format!(
                    "one-to-many association `{}` has no declared order",
                    association.name
                ))
            })?;

            let filter = extract_filter(selection, &association.filters, &PAGINATION_ARGUMENTS, path)?;
            let targets = self
                .binder
                .bind_targets(selection, &association.target, EntryPoint::Connection { order }, path)?;

            (filter, targets)
        } else {
            let filter = extract_filter(selection, &association.filters, &[], path)?;
            let targets = self
                .binder
                .bind_targets(selection, &association.target, EntryPoint::Field, path)?;

            (filter, targets)
        };

        Ok(BoundAssociation {
            association: association.clone(),
            filter,
            targets,
        })
    }
}
