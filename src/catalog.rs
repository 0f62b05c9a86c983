//! Loading an index batch by batch from a paginated record source.
//!
//! A [`Catalog`] owns an [`AvlTree`] and pulls records from a [`BatchSource`]
//! one page at a time, the way a listing screen loads "more" results on
//! demand. Everything is synchronous and single-writer.

use crate::error::{Error, Result};
use crate::{AvlTree, Entry, DEFAULT_PAGE_SIZE};

/// A supplier of records in successive batches.
pub trait BatchSource<T> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches up to `limit` records.
    ///
    /// `Ok(None)` and an empty batch both mean the source is exhausted. A
    /// non-empty batch shorter than `limit` does not.
    fn next_batch(&mut self, limit: usize) -> std::result::Result<Option<Vec<T>>, Self::Error>;
}

/// Adapts any iterator into an infallible [`BatchSource`].
#[derive(Clone, Debug)]
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<T, I: Iterator<Item = T>> BatchSource<T> for IterSource<I> {
    type Error = std::convert::Infallible;

    fn next_batch(&mut self, limit: usize) -> std::result::Result<Option<Vec<T>>, Self::Error> {
        let batch: Vec<T> = self.inner.by_ref().take(limit).collect();
        Ok((!batch.is_empty()).then_some(batch))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatalogConfig {
    /// Records requested per batch, and entries per page when paging the
    /// index.
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub struct Catalog<T, S> {
    index: AvlTree<T>,
    source: S,
    config: CatalogConfig,
    exhausted: bool,
}

impl<T: Entry, S: BatchSource<T>> Catalog<T, S> {
    pub fn new(source: S, config: CatalogConfig) -> Result<Self> {
        if config.page_size == 0 {
            return Err(Error::InvalidPageSize(config.page_size));
        }
        Ok(Self {
            index: AvlTree::new(),
            source,
            config,
            exhausted: false,
        })
    }

    /// Whether the source may still yield records.
    #[inline]
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// Fetches one batch into the index and returns how many entries were new.
    ///
    /// Once the source has reported end-of-data this returns `Ok(0)` without
    /// calling it again. On a source error, nothing from the failed batch is
    /// inserted and the catalog remains usable.
    pub fn load_next(&mut self) -> Result<usize> {
        if self.exhausted {
            return Ok(0);
        }

        let batch = match self.source.next_batch(self.config.page_size) {
            Ok(Some(batch)) if !batch.is_empty() => batch,
            Ok(_) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(entries = self.index.count_nodes(), "source exhausted");
                self.exhausted = true;
                return Ok(0);
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "batch source failed");
                return Err(Error::Source(Box::new(err)));
            }
        };

        #[cfg(feature = "tracing")]
        let fetched = batch.len();

        let mut inserted = 0;
        for entry in batch {
            if self.index.insert(entry) {
                inserted += 1;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(fetched, inserted, "loaded batch");

        Ok(inserted)
    }

    /// Drains the source, returning the total number of new entries.
    pub fn load_all(&mut self) -> Result<usize> {
        let mut total = 0;
        while self.has_more() {
            total += self.load_next()?;
        }
        Ok(total)
    }

    /// The `index`-th page of the loaded entries, using the configured page
    /// size.
    pub fn page(&self, index: usize) -> Vec<&T> {
        self.index.page(index, self.config.page_size)
    }

    pub fn index(&self) -> &AvlTree<T> {
        &self.index
    }

    pub fn into_index(self) -> AvlTree<T> {
        self.index
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}
