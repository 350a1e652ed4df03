//! Parameter catalogs: selection key -> domain code, one table per dimension.
//!
//! Tables are immutable constants; iteration order is the declaration order.

use crate::condition::OrderField;

/// One filter dimension's mapping from user-facing selection key to store code.
#[derive(Debug, PartialEq, Eq)]
pub struct Catalog {
    dimension: Dimension,
    entries: &'static [(&'static str, &'static str)],
}

impl Catalog {
    const fn new(dimension: Dimension, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { dimension, entries }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Selection keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// `(selection key, domain code)` pairs in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn code(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, code)| *code)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three filterable dimensions of the order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Status,
    Type,
    Filter,
}

impl Dimension {
    pub fn catalog(self) -> &'static Catalog {
        match self {
            Dimension::Status => &STATUS_CATALOG,
            Dimension::Type => &TYPE_CATALOG,
            Dimension::Filter => &FILTER_CATALOG,
        }
    }

    /// Order header field the dimension's codes are compared against.
    pub fn field(self) -> OrderField {
        match self {
            Dimension::Status => OrderField::StatusId,
            Dimension::Type => OrderField::OrderTypeId,
            Dimension::Filter => OrderField::OrderFiltersStateId,
        }
    }
}

pub static STATUS_CATALOG: Catalog = Catalog::new(
    Dimension::Status,
    &[
        ("viewcompleted", "ORDER_COMPLETED"),
        ("viewcancelled", "ORDER_CANCELLED"),
        ("viewrejected", "ORDER_REJECTED"),
        ("viewapproved", "ORDER_APPROVED"),
        ("viewcreated", "ORDER_CREATED"),
        ("viewprocessing", "ORDER_PROCESSING"),
        ("viewsent", "ORDER_SENT"),
    ],
);

pub static TYPE_CATALOG: Catalog = Catalog::new(
    Dimension::Type,
    &[
        ("view_SALES_ORDER", "SALES_ORDER"),
        ("view_PURCHASE_ORDER", "PURCHASE_ORDER"),
    ],
);

// Filter keys are their own codes.
pub static FILTER_CATALOG: Catalog = Catalog::new(
    Dimension::Filter,
    &[
        ("filterInventoryProblems", "filterInventoryProblems"),
        ("filterAuthProblems", "filterAuthProblems"),
        ("filterPartiallyReceivedPOs", "filterPartiallyReceivedPOs"),
        ("filterPOsOpenPastTheirETA", "filterPOsOpenPastTheirETA"),
        ("filterPOsWithRejectedItems", "filterPOsWithRejectedItems"),
    ],
);
