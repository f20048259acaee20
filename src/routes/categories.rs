use axum::Json;

use crate::{models::CategoryInfo, services::taxonomy};

/// Handler listing the nine domain categories for filter menus
pub async fn list() -> Json<Vec<CategoryInfo>> {
    Json(taxonomy::all())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_returns_all_categories_in_order() {
        let Json(categories) = tokio_test::block_on(list());
        let ids: Vec<u8> = categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<u8>>());
        assert_eq!(categories[4].backend_label, "Celebrity Residence");
    }
}
