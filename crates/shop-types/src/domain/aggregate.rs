use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A persisted root entity together with the child entities it owns.
///
/// Roots are only ever produced by a repository: either by saving an
/// [`AggregateDraft`] or by reconstructing rows read back from storage.
pub trait Aggregate: Clone + Send + Sync + 'static {
    type Child: Clone + Send + Sync + 'static;

    /// Human readable name, used in not-found messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn children(&self) -> &[Self::Child];
    fn children_mut(&mut self) -> &mut Vec<Self::Child>;
}

/// An unsaved aggregate: scalar fields and child drafts, no identity.
pub trait AggregateDraft: Send + Sync + 'static {
    type Root: Aggregate;
    type ChildDraft: Send + Sync + 'static;

    /// Splits the draft into the root (stamped with `id`, `created_at` and
    /// `updated_at` set to `at`, no children yet) and its child drafts in
    /// collection order.
    fn into_parts(self, id: Uuid, at: DateTime<Utc>) -> (Self::Root, Vec<Self::ChildDraft>);

    /// Builds the persisted child once storage has assigned `child_id`.
    fn attach_child(
        child: Self::ChildDraft,
        root_id: Uuid,
        child_id: i64,
    ) -> <Self::Root as Aggregate>::Child;
}
