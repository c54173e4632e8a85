//! Scratch copies of a section payload held while an editor is open.

use chrono::Utc;

use super::{MerchItem, SectionContent, SectionPatch, parse_sizes};
use crate::types::ProductId;

/// An edit in progress.
///
/// Opened from the current payload, mutated freely, then either cancelled
/// (nothing happens) or committed into a [`SectionPatch`] that replaces the
/// section payload through the normal update path. Drafts are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft<T> {
    original: T,
    draft: T,
}

impl<T: Clone + PartialEq> EditDraft<T> {
    #[must_use]
    pub fn open(current: &T) -> Self {
        Self {
            original: current.clone(),
            draft: current.clone(),
        }
    }

    #[must_use]
    pub const fn get(&self) -> &T {
        &self.draft
    }

    pub const fn get_mut(&mut self) -> &mut T {
        &mut self.draft
    }

    /// Whether the draft differs from the payload it was opened from.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    /// Discard the draft, returning the untouched original.
    #[must_use]
    pub fn cancel(self) -> T {
        self.original
    }

    /// Finish the edit, producing the patch to apply.
    #[must_use]
    pub fn commit(self) -> SectionPatch
    where
        T: Into<SectionContent>,
    {
        SectionPatch::Replace(self.draft.into())
    }
}

impl EditDraft<Vec<MerchItem>> {
    /// Append a placeholder item and return its ID.
    pub fn add_item(&mut self) -> ProductId {
        let item = MerchItem::new_placeholder(Utc::now().timestamp_millis());
        let id = item.id.clone();
        self.draft.push(item);
        id
    }

    /// Remove an item from the draft catalog. Unknown IDs are ignored.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.draft.retain(|item| &item.id != id);
    }

    /// Set an item's sizes from the editor's comma-separated field.
    pub fn set_sizes(&mut self, id: &ProductId, input: &str) {
        if let Some(item) = self.draft.iter_mut().find(|item| &item.id == id) {
            item.sizes = parse_sizes(input);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{SiteContent, defaults};
    use crate::types::SectionName;

    #[test]
    fn test_cancel_leaves_original() {
        let hero = defaults::hero();
        let mut draft = EditDraft::open(&hero);
        draft.get_mut().title = "Changed".to_owned();

        assert!(draft.is_dirty());
        assert_eq!(draft.cancel(), hero);
    }

    #[test]
    fn test_commit_replaces_section() {
        let mut content = SiteContent::default();
        let mut draft = EditDraft::open(&content.contact);
        draft.get_mut().phone = "+1 555 0100".to_owned();

        let patch = draft.commit();
        assert_eq!(patch.section(), SectionName::Contact);

        content.apply(patch);
        assert_eq!(content.contact.phone, "+1 555 0100");
    }

    #[test]
    fn test_merch_draft_helpers() {
        let mut draft = EditDraft::open(&defaults::merch());
        let id = draft.add_item();
        assert_eq!(draft.get().len(), 7);
        assert!(id.as_str().starts_with('m'));

        draft.set_sizes(&id, "XS, , XL");
        let item = draft.get().iter().find(|i| i.id == id).map(|i| i.sizes.clone());
        assert_eq!(item, Some(Some(vec!["XS".to_owned(), "XL".to_owned()])));

        draft.remove_item(&ProductId::new("m1"));
        assert_eq!(draft.get().len(), 6);
        assert!(draft.get().iter().all(|i| i.id.as_str() != "m1"));
    }
}
