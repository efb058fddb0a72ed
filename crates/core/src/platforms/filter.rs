use std::collections::HashSet;

use super::Platform;
use crate::catalog::{AvailableItem, CatalogItem};

/// Keep items available on at least one of `platform_ids`, preserving order.
///
/// An empty platform set matches nothing.
pub fn filter_by_platforms(
    items: Vec<AvailableItem>,
    platform_ids: &HashSet<i64>,
) -> Vec<CatalogItem> {
    if platform_ids.is_empty() {
        return Vec::new();
    }

    items
        .into_iter()
        .filter(|available| {
            available
                .platform_ids
                .iter()
                .any(|id| platform_ids.contains(id))
        })
        .map(|available| available.item)
        .collect()
}

/// Translate provider watch-provider ids into local platform ids.
pub fn map_provider_ids(provider_ids: &[u32], platforms: &[Platform]) -> Vec<i64> {
    let mut ids: Vec<i64> = platforms
        .iter()
        .filter(|p| provider_ids.contains(&p.provider_id))
        .map(|p| p.id)
        .collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::catalog_item;

    fn available(id: i64, platforms: &[i64]) -> AvailableItem {
        AvailableItem {
            item: catalog_item(id, id as u32, &format!("item {}", id)),
            platform_ids: platforms.to_vec(),
        }
    }

    #[test]
    fn test_or_semantics() {
        let items = vec![
            available(1, &[1]),
            available(2, &[2]),
            available(3, &[3]),
            available(4, &[1, 3]),
        ];
        let selected: HashSet<i64> = [1, 2].into_iter().collect();

        let ids: Vec<i64> = filter_by_platforms(items, &selected)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_empty_selection_matches_nothing() {
        let items = vec![available(1, &[1]), available(2, &[2])];
        assert!(filter_by_platforms(items, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_map_provider_ids_ignores_unknown() {
        let platforms = vec![
            Platform {
                id: 1,
                name: "Netflix".to_string(),
                icon: "netflix".to_string(),
                color: "#E50914".to_string(),
                provider_id: 8,
            },
            Platform {
                id: 3,
                name: "Disney+".to_string(),
                icon: "disney-plus".to_string(),
                color: "#113CCF".to_string(),
                provider_id: 337,
            },
        ];
        assert_eq!(map_provider_ids(&[337, 2, 8], &platforms), vec![1, 3]);
        assert!(map_provider_ids(&[2], &platforms).is_empty());
    }
}
