//! The capability contract an indexed record must provide.

/// A record that can be stored in an [`AvlTree`](crate::AvlTree).
///
/// Placement and exact lookup use [`Entry::key`]. Substring search uses
/// [`Entry::name`]. The two may coincide (see the `String` impl) or be
/// unrelated fields of the record.
pub trait Entry {
    /// Ordering key. Two entries with equal keys are the same entry as far as
    /// the tree is concerned.
    type Key: Ord + ?Sized;

    fn key(&self) -> &Self::Key;

    /// Human-readable name matched by substring search.
    fn name(&self) -> &str;
}

impl Entry for String {
    type Key = str;

    #[inline]
    fn key(&self) -> &str {
        self
    }

    #[inline]
    fn name(&self) -> &str {
        self
    }
}

/// An ordering key paired with an independent display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Named<K> {
    pub key: K,
    pub name: String,
}

impl<K> Named<K> {
    pub fn new(key: K, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }
}

impl<K: Ord> Entry for Named<K> {
    type Key = K;

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    fn name(&self) -> &str {
        &self.name
    }
}
