use std::path::Path;

use crate::items::FolderItem;

/// Whether `item` matches a picker query.
///
/// Queries match case-insensitively on the label or the description, or
/// exactly on the item's root path.
pub fn matches_query(item: &FolderItem, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    if item.root == Path::new(query) {
        return true;
    }
    let needle = query.to_lowercase();
    item.label.to_lowercase().contains(&needle) || item.description.to_lowercase().contains(&needle)
}

/// Items matching `query`, in picker order.
pub fn filter_items<'a>(items: &'a [FolderItem], query: &str) -> Vec<&'a FolderItem> {
    items.iter().filter(|item| matches_query(item, query)).collect()
}
