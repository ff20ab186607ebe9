//! Books ticked for a purchase inquiry.

use crate::catalog::Catalog;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InquirySelection {
    ids: BTreeSet<u32>,
}

impl InquirySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the checkbox for `id`; returns whether it is now selected.
    /// Ids not in `catalog` are ignored.
    pub fn toggle(&mut self, catalog: &Catalog, id: u32) -> bool {
        if catalog.slot_of(id).is_none() {
            log::debug!("[inquiry] unknown book id {id}");
            return false;
        }
        if !self.ids.remove(&id) {
            self.ids.insert(id);
            true
        } else {
            false
        }
    }

    pub fn set(&mut self, catalog: &Catalog, id: u32, selected: bool) {
        if self.contains(id) != selected {
            self.toggle(catalog, id);
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Titles of the selected books, in catalog order.
    pub fn titles<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        catalog
            .entries()
            .iter()
            .filter(|e| self.ids.contains(&e.id))
            .map(|e| e.title.as_str())
            .collect()
    }
}
