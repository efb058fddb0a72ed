use super::{CatalogItem, Slice};

/// Cut page `page` (1-based) of `page_size` items out of a result set.
///
/// A page past the end yields an empty item list with the real totals.
pub fn paginate(items: &[CatalogItem], page: u32, page_size: usize) -> Slice {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size) as u32;

    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);
    let page_items = items
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    Slice {
        items: page_items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::catalog_items;

    #[test]
    fn test_first_page() {
        let items = catalog_items(25);
        let slice = paginate(&items, 1, 10);
        assert_eq!(slice.items.len(), 10);
        assert_eq!(slice.items[0].id, 1);
        assert_eq!(slice.total_pages, 3);
        assert_eq!(slice.total_items, 25);
    }

    #[test]
    fn test_last_partial_page() {
        let items = catalog_items(25);
        let slice = paginate(&items, 3, 10);
        assert_eq!(slice.items.len(), 5);
        assert_eq!(slice.items[0].id, 21);
    }

    #[test]
    fn test_page_beyond_end_is_empty() {
        let items = catalog_items(25);
        let slice = paginate(&items, 4, 10);
        assert!(slice.items.is_empty());
        assert_eq!(slice.page, 4);
        assert_eq!(slice.total_pages, 3);
    }

    #[test]
    fn test_exact_multiple() {
        let items = catalog_items(30);
        assert_eq!(paginate(&items, 1, 30).total_pages, 1);
        assert_eq!(paginate(&items, 1, 10).total_pages, 3);
    }

    #[test]
    fn test_empty_set() {
        let slice = paginate(&[], 1, 10);
        assert!(slice.items.is_empty());
        assert_eq!(slice.total_pages, 0);
    }
}
