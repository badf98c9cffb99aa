use query_structure::{Cursor, Filter, GraphValue, OrderExpression, ScalarCompare, SortOrder};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeekDirection {
    /// Records strictly after the cursor in the declared order.
    After,

    /// Records strictly before the cursor in the declared order.
    Before,
}

/// Builds the lexicographic seek predicate over the columns of `order`:
///
/// ```text
/// (c1 > v1)
/// OR (c1 = v1 AND c2 > v2)
/// OR (c1 = v1 AND c2 = v2 AND c3 > v3)
/// ```
///
/// where `>` is `<` for descending columns, and both are flipped when seeking backwards. The
/// cursor holds one value per order column.
///
/// Positions merging several concrete types append the type name of the cursor record to the
/// cursor, and break sort key ties by type name. The read of `type_name` then also takes the
/// records equal to the cursor on every column when its type sorts past the cursor's type.
pub(crate) fn seek_filter(
    order: &OrderExpression,
    cursor: &Cursor,
    direction: SeekDirection,
    type_name: Option<&str>,
) -> Filter {
    let pairs: Vec<_> = order.parts().iter().zip(cursor.values()).collect();

    let mut alternatives: Vec<Filter> = (0..pairs.len())
        .map(|i| {
            let (order_by, value) = pairs[i];
            let mut conditions: Vec<Filter> = pairs[..i]
                .iter()
                .map(|(order_by, value)| order_by.column.as_str().equals((*value).clone()))
                .collect();

            let ascending = matches!(
                (order_by.sort_order, direction),
                (SortOrder::Ascending, SeekDirection::After) | (SortOrder::Descending, SeekDirection::Before)
            );

            let column = order_by.column.as_str();
            conditions.push(if ascending {
                column.greater_than(value.clone())
            } else {
                column.less_than(value.clone())
            });

            Filter::and(conditions)
        })
        .collect();

    let type_order = match (type_name, cursor.values().get(order.len())) {
        (Some(own), Some(GraphValue::String(cursor_type))) => Some(own.cmp(cursor_type.as_str())),
        _ => None,
    };

    let takes_ties = matches!(
        (type_order, direction),
        (Some(Ordering::Greater), SeekDirection::After) | (Some(Ordering::Less), SeekDirection::Before)
    );

    if takes_ties {
        alternatives.push(Filter::and(
            pairs
                .iter()
                .map(|(order_by, value)| order_by.column.as_str().equals((*value).clone()))
                .collect(),
        ));
    }

    Filter::or(alternatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use query_structure::{GraphValue, OrderBy};

    fn newest_first() -> OrderExpression {
        OrderExpression::new(vec![OrderBy::desc("created_at"), OrderBy::asc("id")])
    }

    #[test]
    fn after_on_mixed_directions() {
        let cursor = Cursor::new(vec![GraphValue::Int(10), GraphValue::Int(4)]);
        let filter = seek_filter(&newest_first(), &cursor, SeekDirection::After, None);

        assert_eq!(
            filter,
            Filter::or(vec![
                "created_at".less_than(10),
                Filter::and(vec!["created_at".equals(10), "id".greater_than(4)]),
            ])
        );
    }

    #[test]
    fn before_flips_every_comparison() {
        let cursor = Cursor::new(vec![GraphValue::Int(10), GraphValue::Int(4)]);
        let filter = seek_filter(&newest_first(), &cursor, SeekDirection::Before, None);

        assert_eq!(
            filter,
            Filter::or(vec![
                "created_at".greater_than(10),
                Filter::and(vec!["created_at".equals(10), "id".less_than(4)]),
            ])
        );
    }

    fn typed_cursor() -> Cursor {
        Cursor::new(vec![
            GraphValue::Int(10),
            GraphValue::Int(4),
            GraphValue::String("Photo".to_owned()),
        ])
    }

    #[test]
    fn types_past_the_cursor_type_take_the_ties() {
        let filter = seek_filter(&newest_first(), &typed_cursor(), SeekDirection::After, Some("Post"));

        assert_eq!(
            filter,
            Filter::or(vec![
                "created_at".less_than(10),
                Filter::and(vec!["created_at".equals(10), "id".greater_than(4)]),
                Filter::and(vec!["created_at".equals(10), "id".equals(4)]),
            ])
        );
    }

    #[test]
    fn the_cursor_type_and_earlier_types_skip_the_ties() {
        let own_type = seek_filter(&newest_first(), &typed_cursor(), SeekDirection::After, Some("Photo"));
        let earlier_type = seek_filter(&newest_first(), &typed_cursor(), SeekDirection::After, Some("Article"));

        let expected = Filter::or(vec![
            "created_at".less_than(10),
            Filter::and(vec!["created_at".equals(10), "id".greater_than(4)]),
        ]);

        assert_eq!(own_type, expected);
        assert_eq!(earlier_type, expected);
    }

    #[test]
    fn seeking_backwards_gives_the_ties_to_earlier_types() {
        let filter = seek_filter(&newest_first(), &typed_cursor(), SeekDirection::Before, Some("Article"));

        assert_eq!(
            filter,
            Filter::or(vec![
                "created_at".greater_than(10),
                Filter::and(vec!["created_at".equals(10), "id".less_than(4)]),
                Filter::and(vec!["created_at".equals(10), "id".equals(4)]),
            ])
        );
    }
}
