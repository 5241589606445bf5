/// Ordered in-memory collections with the journal's CRUD and search rules
///
/// Trips, albums and an album's photos all behave the same way:
/// - add appends in insertion order and refuses an empty name
/// - edit replaces mutable fields by id, unknown ids are ignored
/// - delete is two-phase: request, then confirm
/// - search is a case-insensitive substring match on the name
use std::collections::HashSet;
use uuid::Uuid;

use super::data::Entry;

/// A deletion the user still has to confirm
///
/// Produced by `request_delete*` and consumed by `confirm_delete`.
/// Dropping it is the "Cancel" button.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a delete request does nothing until it is confirmed"]
pub struct DeleteRequest {
    ids: Vec<Uuid>,
}

impl DeleteRequest {
    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entry> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Append a new entry. Returns its id, or `None` if the name is empty.
    pub fn add(&mut self, item: T) -> Option<Uuid> {
        if item.name().is_empty() {
            return None;
        }
        let id = item.id();
        self.items.push(item);
        Some(id)
    }

    /// Append entries as one update, without name checks
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    /// Replace the mutable fields of the entry with `updated`'s id.
    /// Returns false (and changes nothing) when the id is unknown.
    pub fn edit(&mut self, updated: &T) -> bool {
        match self.items.iter_mut().find(|item| item.id() == updated.id()) {
            Some(item) => {
                item.apply_edit(updated);
                true
            }
            None => false,
        }
    }

    /// Entries whose name contains `query`, ignoring case, in original order.
    /// An empty query returns everything.
    pub fn filter(&self, query: &str) -> Vec<&T> {
        if query.is_empty() {
            return self.items.iter().collect();
        }
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Ask to delete entries by id. Unknown ids are dropped from the request.
    pub fn request_delete(&self, ids: &[Uuid]) -> DeleteRequest {
        let mut seen = HashSet::new();
        let ids = ids
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_some() && seen.insert(*id))
            .collect();
        DeleteRequest { ids }
    }

    /// Ask to delete entries by their offsets in the list shown for `query`.
    ///
    /// Offsets are resolved against the filtered view, so deleting row 0
    /// of a search result deletes that result and not row 0 of the full list.
    pub fn request_delete_at(&self, query: &str, offsets: &[usize]) -> DeleteRequest {
        let view = self.filter(query);
        let ids: Vec<Uuid> = offsets
            .iter()
            .filter_map(|&offset| view.get(offset).map(|item| item.id()))
            .collect();
        self.request_delete(&ids)
    }

    /// Carry out a confirmed deletion. Returns the removed entries in
    /// their original order; ids that vanished in the meantime are skipped.
    pub fn confirm_delete(&mut self, request: DeleteRequest) -> Vec<T> {
        let doomed: HashSet<Uuid> = request.ids.into_iter().collect();
        let mut removed = Vec::with_capacity(doomed.len());
        let mut kept = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if doomed.contains(&item.id()) {
                removed.push(item);
            } else {
                kept.push(item);
            }
        }
        self.items = kept;
        removed
    }

    /// Move the entry at `from` so that it ends up at index `to`.
    /// Returns false if either offset is out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{new_id, Album};

    fn albums(names: &[&str]) -> Collection<Album> {
        let trip = new_id();
        Collection::from_vec(names.iter().map(|n| Album::new(trip, *n)).collect())
    }

    fn names(items: &[&Album]) -> Vec<String> {
        items.iter().map(|a| a.name.clone()).collect()
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let mut list = albums(&[]);
        assert_eq!(list.add(Album::new(new_id(), "")), None);
        assert!(list.is_empty());

        let added = list.add(Album::new(new_id(), "Hotel")).unwrap();
        assert_eq!(list.items()[0].id, added);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let list = albums(&["Airport", "Hotel", "Chair Museum"]);
        assert_eq!(names(&list.filter("air")), vec!["Airport", "Chair Museum"]);
        assert_eq!(names(&list.filter("HOTEL")), vec!["Hotel"]);
        assert!(list.filter("zzz").is_empty());
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let list = albums(&["Airport", "Outfit", "Hotel"]);
        assert_eq!(names(&list.filter("")), vec!["Airport", "Outfit", "Hotel"]);
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        let mut list = albums(&["Airport", "Hotel"]);
        let before = list.clone();

        let stranger = Album::new(new_id(), "Renamed");
        assert!(!list.edit(&stranger));
        assert_eq!(list, before);
    }

    #[test]
    fn test_edit_renames_in_place() {
        let mut list = albums(&["Airport", "Hotel"]);
        let mut hotel = list.items()[1].clone();
        hotel.name = "Ryokan".to_string();

        assert!(list.edit(&hotel));
        assert_eq!(list.items()[1].name, "Ryokan");
        assert_eq!(list.items()[1].id, hotel.id);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut list = albums(&["Airport", "Hotel"]);
        let hotel = list.items()[1].id;

        let request = list.request_delete(&[hotel]);
        assert_eq!(list.len(), 2);
        drop(request);
        assert_eq!(list.len(), 2);

        let request = list.request_delete(&[hotel]);
        let removed = list.confirm_delete(request);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, hotel);
        assert!(list.get(hotel).is_none());
    }

    #[test]
    fn test_request_ignores_unknown_and_duplicate_ids() {
        let list = albums(&["Airport"]);
        let airport = list.items()[0].id;
        let request = list.request_delete(&[airport, new_id(), airport]);
        assert_eq!(request.ids(), &[airport]);
    }

    #[test]
    fn test_offsets_resolve_against_filtered_view() {
        let mut list = albums(&["Airport", "Hotel", "Hostel"]);
        // "ho" shows [Hotel, Hostel]; offset 1 is Hostel
        let request = list.request_delete_at("ho", &[1, 7]);
        let removed = list.confirm_delete(request);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "Hostel");
        assert_eq!(names(&list.filter("")), vec!["Airport", "Hotel"]);
    }

    #[test]
    fn test_move_item() {
        let mut list = albums(&["A", "B", "C"]);
        assert!(list.move_item(0, 2));
        assert_eq!(names(&list.filter("")), vec!["B", "C", "A"]);
        assert!(list.move_item(2, 0));
        assert_eq!(names(&list.filter("")), vec!["A", "B", "C"]);
        assert!(!list.move_item(3, 0));
    }
}
