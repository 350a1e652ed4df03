//! Update commands for the order list state and their decoding from flat
//! request parameters.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalog::Dimension;

/// Parameter whose value [`INCLUDE_MARKER`] selects the selection-change path.
pub const CHANGE_MODE_PARAM: &str = "changeStatusAndTypeState";
pub const VIEW_SIZE_PARAM: &str = "viewSize";
pub const VIEW_INDEX_PARAM: &str = "viewIndex";
/// Parameter value meaning "include this selection key".
pub const INCLUDE_MARKER: &str = "Y";

/// A single state transition request. Exactly one variant applies per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ListUpdate {
    SelectionChange(SelectionChange),
    PageChange(PageChange),
}

/// Incoming choices for all three dimensions.
///
/// Keys not present are treated as excluded; there is no partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub status_choices: BTreeMap<String, bool>,
    pub type_choices: BTreeMap<String, bool>,
    pub filter_choices: BTreeMap<String, bool>,
}

impl SelectionChange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: mark `key` of `dimension` as included.
    pub fn include(mut self, dimension: Dimension, key: impl Into<String>) -> Self {
        self.choices_mut(dimension).insert(key.into(), true);
        self
    }

    pub fn choices(&self, dimension: Dimension) -> &BTreeMap<String, bool> {
        match dimension {
            Dimension::Status => &self.status_choices,
            Dimension::Type => &self.type_choices,
            Dimension::Filter => &self.filter_choices,
        }
    }

    fn choices_mut(&mut self, dimension: Dimension) -> &mut BTreeMap<String, bool> {
        match dimension {
            Dimension::Status => &mut self.status_choices,
            Dimension::Type => &mut self.type_choices,
            Dimension::Filter => &mut self.filter_choices,
        }
    }

    pub fn is_included(&self, dimension: Dimension, key: &str) -> bool {
        self.choices(dimension).get(key).copied().unwrap_or(false)
    }
}

/// Raw pagination values; parsed (and possibly rejected) when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageChange {
    pub view_size: String,
    pub view_index: String,
}

impl PageChange {
    pub fn new(view_size: impl Into<String>, view_index: impl Into<String>) -> Self {
        Self {
            view_size: view_size.into(),
            view_index: view_index.into(),
        }
    }
}

impl ListUpdate {
    /// Decide which update (if any) a flat parameter map asks for.
    ///
    /// `changeStatusAndTypeState=Y` selects a selection change built from one
    /// parameter per catalog key. Otherwise a page change is produced only
    /// when both `viewSize` and `viewIndex` are present and non-empty.
    pub fn from_params(params: &HashMap<String, String>) -> Option<ListUpdate> {
        if params.get(CHANGE_MODE_PARAM).map(String::as_str) == Some(INCLUDE_MARKER) {
            let mut change = SelectionChange::new();
            for dimension in [Dimension::Status, Dimension::Type, Dimension::Filter] {
                for key in dimension.catalog().keys() {
                    if let Some(value) = params.get(key) {
                        change
                            .choices_mut(dimension)
                            .insert(key.to_string(), value == INCLUDE_MARKER);
                    }
                }
            }
            return Some(ListUpdate::SelectionChange(change));
        }

        let view_size = params.get(VIEW_SIZE_PARAM).filter(|v| !v.is_empty())?;
        let view_index = params.get(VIEW_INDEX_PARAM).filter(|v| !v.is_empty())?;
        Some(ListUpdate::PageChange(PageChange::new(view_size.clone(), view_index.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn change_mode_flag_selects_selection_change() {
        let update = ListUpdate::from_params(&params(&[
            (CHANGE_MODE_PARAM, "Y"),
            ("viewcreated", "Y"),
            ("viewsent", "N"),
            ("view_SALES_ORDER", "Y"),
            ("filterAuthProblems", "Y"),
            ("viewSize", "20"),
            ("viewIndex", "1"),
            ("unrelated", "Y"),
        ]))
        .unwrap();

        let ListUpdate::SelectionChange(change) = update else {
            panic!("expected a selection change");
        };
        assert!(change.is_included(Dimension::Status, "viewcreated"));
        assert!(!change.is_included(Dimension::Status, "viewsent"));
        assert!(!change.is_included(Dimension::Status, "viewapproved"));
        assert!(change.is_included(Dimension::Type, "view_SALES_ORDER"));
        assert!(change.is_included(Dimension::Filter, "filterAuthProblems"));
        assert!(!change.status_choices.contains_key("unrelated"));
    }

    #[test]
    fn other_flag_values_fall_through_to_pagination() {
        let update = ListUpdate::from_params(&params(&[
            (CHANGE_MODE_PARAM, "N"),
            ("viewSize", "20"),
            ("viewIndex", "3"),
        ]));
        assert_eq!(update, Some(ListUpdate::PageChange(PageChange::new("20", "3"))));
    }

    #[test]
    fn pagination_requires_both_values() {
        assert_eq!(ListUpdate::from_params(&params(&[("viewSize", "20")])), None);
        assert_eq!(
            ListUpdate::from_params(&params(&[("viewSize", "20"), ("viewIndex", "")])),
            None
        );
        assert_eq!(ListUpdate::from_params(&HashMap::new()), None);
    }

    #[test]
    fn malformed_page_values_are_still_forwarded() {
        let update = ListUpdate::from_params(&params(&[("viewSize", "ten"), ("viewIndex", "0")]));
        assert_eq!(update, Some(ListUpdate::PageChange(PageChange::new("ten", "0"))));
    }
}
