//! Translation of an order list state into a store condition.
//!
//! The three dimension groups are all-or-nothing: they restrict the result
//! only when status, type and filter each have at least one selected code.
//! If any dimension is empty none of the groups is applied. The facility
//! restriction is applied independently of that rule.

use crate::catalog::{Dimension, FILTER_CATALOG};
use crate::condition::{Condition, OrderField};
use crate::state::OrderListState;

/// Which selection map decides membership of the filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterGroupSource {
    /// Filter keys are looked up in the filter selections.
    #[default]
    Filters,
    /// Legacy behavior: filter keys are looked up in the *type* selections.
    ///
    /// No filter key is a type key, so the filter group is always empty and
    /// the dimension groups never apply.
    Types,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionBuilder {
    filter_group_source: FilterGroupSource,
}

impl ConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter_group_source(mut self, source: FilterGroupSource) -> Self {
        self.filter_group_source = source;
        self
    }

    pub fn filter_group_source(&self) -> FilterGroupSource {
        self.filter_group_source
    }

    /// Build the top-level AND condition for `state`, optionally scoped to
    /// orders originating from `facility`.
    pub fn build(&self, state: &OrderListState, facility: Option<&str>) -> Condition {
        let status_codes = state.selections(Dimension::Status).selected_codes();
        let type_codes = state.selections(Dimension::Type).selected_codes();
        let filter_codes = self.filter_codes(state);

        let mut all_conditions = Vec::new();

        if !status_codes.is_empty() && !type_codes.is_empty() && !filter_codes.is_empty() {
            all_conditions.push(or_group(Dimension::Status.field(), &status_codes));
            all_conditions.push(or_group(Dimension::Type.field(), &type_codes));
            all_conditions.push(or_group(Dimension::Filter.field(), &filter_codes));
        }

        if let Some(facility) = facility {
            all_conditions.push(Condition::equals(OrderField::OriginFacilityId, facility));
        }

        Condition::and(all_conditions)
    }

    fn filter_codes(&self, state: &OrderListState) -> Vec<&'static str> {
        match self.filter_group_source {
            FilterGroupSource::Filters => state.selections(Dimension::Filter).selected_codes(),
            FilterGroupSource::Types => FILTER_CATALOG
                .entries()
                .filter(|(key, _)| state.has_type(key))
                .map(|(_, code)| code)
                .collect(),
        }
    }
}

fn or_group(field: OrderField, codes: &[&str]) -> Condition {
    Condition::or(codes.iter().map(|code| Condition::equals(field, *code)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ListUpdate, PageChange, SelectionChange};

    fn selected(status: &[&str], types: &[&str], filters: &[&str]) -> OrderListState {
        let mut change = SelectionChange::new();
        for key in status {
            change = change.include(Dimension::Status, *key);
        }
        for key in types {
            change = change.include(Dimension::Type, *key);
        }
        for key in filters {
            change = change.include(Dimension::Filter, *key);
        }
        let mut state = OrderListState::default();
        state.apply_update(&ListUpdate::SelectionChange(change));
        state
    }

    #[test]
    fn default_state_without_facility_is_unconditioned() {
        let cond = ConditionBuilder::new().build(&OrderListState::default(), None);
        assert_eq!(cond, Condition::unconditioned());
        assert!(cond.is_unconditioned());
    }

    #[test]
    fn default_state_with_facility_only_restricts_facility() {
        let cond = ConditionBuilder::new().build(&OrderListState::default(), Some("WH1"));
        assert_eq!(
            cond,
            Condition::and(vec![Condition::equals(OrderField::OriginFacilityId, "WH1")])
        );
    }

    #[test]
    fn all_three_dimensions_selected_applies_every_group() {
        let state = selected(&["viewcreated"], &["view_SALES_ORDER"], &["filterAuthProblems"]);
        let cond = ConditionBuilder::new().build(&state, None);
        assert_eq!(
            cond,
            Condition::and(vec![
                Condition::or(vec![Condition::equals(OrderField::StatusId, "ORDER_CREATED")]),
                Condition::or(vec![Condition::equals(OrderField::OrderTypeId, "SALES_ORDER")]),
                Condition::or(vec![Condition::equals(
                    OrderField::OrderFiltersStateId,
                    "filterAuthProblems"
                )]),
            ])
        );
    }

    #[test]
    fn groups_follow_catalog_order_and_facility_comes_last() {
        let state = selected(
            &["viewsent", "viewcompleted"],
            &["view_PURCHASE_ORDER", "view_SALES_ORDER"],
            &["filterPOsWithRejectedItems"],
        );
        let cond = ConditionBuilder::new().build(&state, Some("WH2"));
        assert_eq!(
            cond.to_string(),
            "(statusId = 'ORDER_COMPLETED' OR statusId = 'ORDER_SENT') \
             AND (orderTypeId = 'SALES_ORDER' OR orderTypeId = 'PURCHASE_ORDER') \
             AND orderFiltersStateId = 'filterPOsWithRejectedItems' \
             AND originFacilityId = 'WH2'"
        );
    }

    #[test]
    fn any_empty_dimension_drops_all_groups() {
        let builder = ConditionBuilder::new();
        let no_status = selected(&[], &["view_SALES_ORDER"], &["filterAuthProblems"]);
        let no_type = selected(&["viewcreated"], &[], &["filterAuthProblems"]);
        let no_filter = selected(&["viewcreated"], &["view_SALES_ORDER"], &[]);

        for state in [no_status, no_type, no_filter] {
            assert!(builder.build(&state, None).is_unconditioned());
            assert_eq!(
                builder.build(&state, Some("WH1")),
                Condition::and(vec![Condition::equals(OrderField::OriginFacilityId, "WH1")])
            );
        }
    }

    #[test]
    fn legacy_filter_source_never_applies_groups() {
        let state = selected(&["viewcreated"], &["view_SALES_ORDER"], &["filterAuthProblems"]);
        let legacy = ConditionBuilder::new().with_filter_group_source(FilterGroupSource::Types);
        assert_eq!(legacy.filter_group_source(), FilterGroupSource::Types);
        assert_eq!(legacy.build(&state, None), Condition::unconditioned());
    }

    #[test]
    fn building_is_idempotent() {
        let mut state = selected(&["viewapproved"], &["view_SALES_ORDER"], &["filterInventoryProblems"]);
        state.apply_update(&ListUpdate::PageChange(PageChange::new("5", "2")));
        let builder = ConditionBuilder::new();
        assert_eq!(builder.build(&state, Some("WH1")), builder.build(&state, Some("WH1")));
        assert_eq!(builder.build(&state, None), builder.build(&state, None));
    }
}
