//! Per-session order list state: selections for the three dimensions plus
//! the pagination cursor.

use core::fmt;
use std::num::NonZeroU32;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, Dimension, FILTER_CATALOG, STATUS_CATALOG, TYPE_CATALOG};
use crate::command::{ListUpdate, PageChange, SelectionChange};

/// Page size used when no configuration value is supplied.
pub const DEFAULT_VIEW_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(v) => v,
    None => unreachable!(),
};

const DEFAULT_STATUSES: &[&str] = &["viewcreated", "viewprocessing", "viewapproved"];
const DEFAULT_TYPES: &[&str] = &["view_SALES_ORDER"];

/// Pagination values that could not be parsed; the state is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("values of viewSize [{view_size}] and viewIndex [{view_index}] must both be integers (viewSize > 0)")]
pub struct PaginationParseError {
    pub view_size: String,
    pub view_index: String,
}

/// Include/exclude flag for every key of one catalog, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMap {
    catalog: &'static Catalog,
    included: Vec<bool>,
}

impl SelectionMap {
    fn with_defaults(catalog: &'static Catalog, defaults: &[&str]) -> Self {
        let included = catalog.keys().map(|key| defaults.contains(&key)).collect();
        Self { catalog, included }
    }

    /// False for keys the catalog does not know.
    pub fn contains(&self, key: &str) -> bool {
        self.catalog
            .position(key)
            .is_some_and(|idx| self.included[idx])
    }

    pub fn all(&self) -> bool {
        self.included.iter().all(|v| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.catalog.keys().zip(self.included.iter().copied())
    }

    /// Domain codes of the included keys, in catalog order.
    pub fn selected_codes(&self) -> Vec<&'static str> {
        self.catalog
            .entries()
            .zip(self.included.iter())
            .filter(|(_, included)| **included)
            .map(|((_, code), _)| code)
            .collect()
    }

    fn replace_from(&mut self, change: &SelectionChange) {
        let dimension = self.catalog.dimension();
        for (idx, key) in self.catalog.keys().enumerate() {
            self.included[idx] = change.is_included(dimension, key);
        }
    }
}

impl Serialize for SelectionMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl fmt::Display for SelectionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (key, included)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={}", if included { "Y" } else { "N" })?;
        }
        f.write_str("}")
    }
}

/// The order list state owned by one session.
///
/// Mutated only through [`OrderListState::apply_update`] (and
/// [`OrderListState::record_total`] after a fetch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListState {
    view_size: NonZeroU32,
    view_index: u32,
    status_selections: SelectionMap,
    type_selections: SelectionMap,
    filter_selections: SelectionMap,
    list_size: u64,
}

impl OrderListState {
    /// Fresh state: created/processing/approved sales orders, first page.
    pub fn new(view_size: NonZeroU32) -> Self {
        Self {
            view_size,
            view_index: 0,
            status_selections: SelectionMap::with_defaults(&STATUS_CATALOG, DEFAULT_STATUSES),
            type_selections: SelectionMap::with_defaults(&TYPE_CATALOG, DEFAULT_TYPES),
            filter_selections: SelectionMap::with_defaults(&FILTER_CATALOG, &[]),
            list_size: 0,
        }
    }

    /// Apply one update. Pagination parse failures are logged and ignored.
    pub fn apply_update(&mut self, update: &ListUpdate) {
        match update {
            ListUpdate::SelectionChange(change) => self.change_selections(change),
            ListUpdate::PageChange(change) => {
                if let Err(e) = self.try_change_page(change) {
                    tracing::warn!(
                        view_size = %e.view_size,
                        view_index = %e.view_index,
                        "{e}. Not paginating order list."
                    );
                }
            }
        }
    }

    /// Replace all three selection maps and go back to the first page.
    fn change_selections(&mut self, change: &SelectionChange) {
        self.status_selections.replace_from(change);
        self.type_selections.replace_from(change);
        self.filter_selections.replace_from(change);
        self.view_index = 0;
    }

    /// Parse both values first; only then replace both fields.
    pub fn try_change_page(&mut self, change: &PageChange) -> Result<(), PaginationParseError> {
        let parsed = change
            .view_size
            .parse::<NonZeroU32>()
            .ok()
            .zip(change.view_index.parse::<u32>().ok());

        let Some((view_size, view_index)) = parsed else {
            return Err(PaginationParseError {
                view_size: change.view_size.clone(),
                view_index: change.view_index.clone(),
            });
        };

        self.view_size = view_size;
        self.view_index = view_index;
        Ok(())
    }

    /// Remember the total match count of the most recent fetch.
    pub fn record_total(&mut self, total: u64) {
        self.list_size = total;
    }

    pub fn has_status(&self, key: &str) -> bool {
        self.status_selections.contains(key)
    }

    pub fn has_type(&self, key: &str) -> bool {
        self.type_selections.contains(key)
    }

    pub fn has_filter(&self, key: &str) -> bool {
        self.filter_selections.contains(key)
    }

    pub fn has_all_status(&self) -> bool {
        self.status_selections.all()
    }

    pub fn has_previous(&self) -> bool {
        self.view_index > 0
    }

    /// True while the current page ends before the last known total.
    pub fn has_next(&self) -> bool {
        let page_end = (u64::from(self.view_index) + 1) * u64::from(self.view_size.get());
        page_end < self.list_size
    }

    pub fn view_size(&self) -> u32 {
        self.view_size.get()
    }

    pub fn view_index(&self) -> u32 {
        self.view_index
    }

    /// Total of the most recent fetch; zero before any fetch.
    pub fn size(&self) -> u64 {
        self.list_size
    }

    pub fn selections(&self, dimension: Dimension) -> &SelectionMap {
        match dimension {
            Dimension::Status => &self.status_selections,
            Dimension::Type => &self.type_selections,
            Dimension::Filter => &self.filter_selections,
        }
    }

    pub fn status_selections(&self) -> &SelectionMap {
        &self.status_selections
    }

    pub fn type_selections(&self) -> &SelectionMap {
        &self.type_selections
    }

    pub fn filter_selections(&self) -> &SelectionMap {
        &self.filter_selections
    }
}

impl Default for OrderListState {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_SIZE)
    }
}

impl fmt::Display for OrderListState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OrderListState:")?;
        writeln!(f, "\tviewIndex={}, viewSize={}", self.view_index, self.view_size)?;
        writeln!(f, "\t{}", self.status_selections)?;
        writeln!(f, "\t{}", self.type_selections)?;
        write!(f, "\t{}", self.filter_selections)
    }
}
