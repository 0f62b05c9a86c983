//! Fixed-size pages over the in-order listing.

use crate::{AvlTree, Iter};

/// Iterator over consecutive pages of an [`AvlTree`], in ascending key order.
///
/// Every page holds `page_size` entries except possibly the last. An empty
/// tree, or a page size of zero, yields no pages.
pub struct Pages<'a, T> {
    iter: Iter<'a, T>,
    page_size: usize,
}

impl<'a, T> Iterator for Pages<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.page_size == 0 {
            return None;
        }
        let page: Vec<&'a T> = self.iter.by_ref().take(self.page_size).collect();
        (!page.is_empty()).then_some(page)
    }
}

impl<T> AvlTree<T> {
    pub fn pages(&self, page_size: usize) -> Pages<'_, T> {
        Pages {
            iter: self.iter(),
            page_size,
        }
    }

    /// The `index`-th page (0-based); empty past the last page.
    pub fn page(&self, index: usize, page_size: usize) -> Vec<&T> {
        if page_size == 0 {
            return Vec::new();
        }
        self.iter()
            .skip(index.saturating_mul(page_size))
            .take(page_size)
            .collect()
    }
}
