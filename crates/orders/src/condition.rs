//! Boolean condition tree understood by the order store.
//!
//! Leaves are equality predicates on order header fields; inner nodes join
//! children with AND/OR. An empty list (either operator) places no
//! restriction, so `Condition::unconditioned()` matches every order.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::record::OrderRecord;

/// Order header fields a condition or sort can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderField {
    OrderId,
    StatusId,
    OrderTypeId,
    OriginFacilityId,
    OrderFiltersStateId,
    OrderDate,
}

impl OrderField {
    /// Field name as exposed to callers (`statusId`, `orderDate`, ...).
    pub fn name(self) -> &'static str {
        match self {
            OrderField::OrderId => "orderId",
            OrderField::StatusId => "statusId",
            OrderField::OrderTypeId => "orderTypeId",
            OrderField::OriginFacilityId => "originFacilityId",
            OrderField::OrderFiltersStateId => "orderFiltersStateId",
            OrderField::OrderDate => "orderDate",
        }
    }

    /// Column name in the `order_header` table.
    pub fn column(self) -> &'static str {
        match self {
            OrderField::OrderId => "order_id",
            OrderField::StatusId => "status_id",
            OrderField::OrderTypeId => "order_type_id",
            OrderField::OriginFacilityId => "origin_facility_id",
            OrderField::OrderFiltersStateId => "order_filters_state_id",
            OrderField::OrderDate => "order_date",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinOperator {
    And,
    Or,
}

impl JoinOperator {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinOperator::And => "AND",
            JoinOperator::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Condition {
    /// `field == value`
    Equals { field: OrderField, value: String },
    /// Children joined by `operator`.
    List {
        operator: JoinOperator,
        conditions: Vec<Condition>,
    },
}

impl Condition {
    pub fn equals(field: OrderField, value: impl Into<String>) -> Self {
        Condition::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::List {
            operator: JoinOperator::And,
            conditions,
        }
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::List {
            operator: JoinOperator::Or,
            conditions,
        }
    }

    /// The empty top-level condition (matches all orders).
    pub fn unconditioned() -> Self {
        Condition::and(Vec::new())
    }

    /// True when the tree places no restriction at all.
    pub fn is_unconditioned(&self) -> bool {
        match self {
            Condition::Equals { .. } => false,
            Condition::List { conditions, .. } => conditions.iter().all(Condition::is_unconditioned),
        }
    }

    /// Evaluate the tree against a single order record.
    pub fn matches(&self, record: &OrderRecord) -> bool {
        match self {
            Condition::Equals { field, value } => record
                .field_value(*field)
                .is_some_and(|v| v.as_ref() == value.as_str()),
            Condition::List {
                operator: JoinOperator::And,
                conditions,
            } => conditions.iter().all(|c| c.matches(record)),
            Condition::List {
                operator: JoinOperator::Or,
                conditions,
            } => conditions.is_empty() || conditions.iter().any(|c| c.matches(record)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Equals { field, value } => write!(f, "{field} = '{value}'"),
            Condition::List { conditions, .. } if conditions.is_empty() => f.write_str("(unconditioned)"),
            Condition::List {
                operator,
                conditions,
            } => {
                for (idx, c) in conditions.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " {} ", operator.keyword())?;
                    }
                    match c {
                        Condition::List { conditions: inner, .. } if inner.len() > 1 => write!(f, "({c})")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(field: OrderField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: OrderField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Order list default: newest orders first.
    pub fn order_list_default() -> Vec<OrderBy> {
        vec![OrderBy::desc(OrderField::OrderDate)]
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        write!(f, "{} {dir}", self.field)
    }
}
