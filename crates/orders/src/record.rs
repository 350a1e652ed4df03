//! The order read model shared by every store.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::condition::{OrderBy, OrderField, SortDirection};

/// Order header row as returned by a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: String,
    pub status_id: String,
    pub order_type_id: String,
    pub origin_facility_id: Option<String>,
    pub order_filters_state_id: Option<String>,
    pub order_date: DateTime<Utc>,
}

impl OrderRecord {
    /// Value of `field` in its comparable text form (`orderDate` as RFC 3339).
    pub fn field_value(&self, field: OrderField) -> Option<Cow<'_, str>> {
        match field {
            OrderField::OrderId => Some(Cow::Borrowed(&self.order_id)),
            OrderField::StatusId => Some(Cow::Borrowed(&self.status_id)),
            OrderField::OrderTypeId => Some(Cow::Borrowed(&self.order_type_id)),
            OrderField::OriginFacilityId => self.origin_facility_id.as_deref().map(Cow::Borrowed),
            OrderField::OrderFiltersStateId => self.order_filters_state_id.as_deref().map(Cow::Borrowed),
            OrderField::OrderDate => Some(Cow::Owned(self.order_date.to_rfc3339())),
        }
    }

    /// Compare two records by a list of sort keys (missing values sort first).
    pub fn cmp_by(&self, other: &Self, order_by: &[OrderBy]) -> Ordering {
        for key in order_by {
            let ord = match key.field {
                OrderField::OrderDate => self.order_date.cmp(&other.order_date),
                field => self.field_value(field).cmp(&other.field_value(field)),
            };
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
