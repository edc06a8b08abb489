//! Item and category operations.
//!
//! Provides item creation with lazy category resolution, plus the
//! read-side lookups (list, get by id, keyword search). All reads return
//! [`ItemView`], the item row joined with its category name.

use super::connection::CatalogDb;
use crate::Error;
use crate::images::key;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Read-side projection of an item joined with its category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_filename: String,
}

const ITEM_VIEW_SELECT: &str = "SELECT items.id, items.name, category.name, items.image_name
     FROM items INNER JOIN category ON items.category_id = category.id";

fn item_view_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ItemView> {
    Ok(ItemView { id: row.get(0)?, name: row.get(1)?, category: row.get(2)?, image_filename: row.get(3)? })
}

/// Escape `%`, `_` and `\` so the keyword matches literally, then wrap it
/// in wildcards for a contains-anywhere match.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl CatalogDb {
    /// Create a new item, resolving its category name to a category id.
    ///
    /// An unseen category name gets a fresh row; a known one is reused.
    /// Both steps and the item insert run in a single transaction, so a
    /// failure never leaves an orphaned category or a dangling reference.
    /// The conflict-ignoring insert against the UNIQUE name column keeps
    /// concurrent creates of the same new category from producing two rows.
    ///
    /// Returns the new item's id.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an empty name, empty category name, or an
    /// `image_key` that is not a well-formed content key.
    pub async fn create_item(&self, name: &str, category_name: &str, image_key: &str) -> Result<i64, Error> {
        if name.is_empty() {
            return Err(Error::InvalidRequest("item name must not be empty".into()));
        }
        if category_name.is_empty() {
            return Err(Error::InvalidRequest("category name must not be empty".into()));
        }
        if !key::is_well_formed(image_key) {
            return Err(Error::InvalidRequest(format!("malformed image key: {image_key}")));
        }

        let name = name.to_string();
        let category_name = category_name.to_string();
        let image_key = image_key.to_string();

        let id = self
            .conn
            .call(move |conn| -> Result<i64, Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO category(name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
                    params![category_name],
                )?;
                let category_id: i64 = tx.query_row(
                    "SELECT id FROM category WHERE name = ?1",
                    params![category_name],
                    |row| row.get(0),
                )?;
                tx.execute(
                    "INSERT INTO items(name, category_id, image_name) VALUES (?1, ?2, ?3)",
                    params![name, category_id, image_key],
                )?;
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(id)
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(id, "item created");
        Ok(id)
    }

    /// List every item joined with its category name, in ascending id
    /// order (insertion order). An empty catalog yields an empty vec.
    pub async fn list_items(&self) -> Result<Vec<ItemView>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<ItemView>, Error> {
                let mut stmt = conn.prepare(&format!("{ITEM_VIEW_SELECT} ORDER BY items.id ASC"))?;
                let items = stmt
                    .query_map([], item_view_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(items)
            })
            .await
            .map_err(Error::from)
    }

    /// Get a single item by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no item with that id exists.
    pub async fn get_item(&self, id: i64) -> Result<ItemView, Error> {
        self.conn
            .call(move |conn| -> Result<ItemView, Error> {
                let mut stmt = conn.prepare(&format!("{ITEM_VIEW_SELECT} WHERE items.id = ?1"))?;
                let result = stmt.query_row(params![id], item_view_from_row);

                match result {
                    Ok(item) => Ok(item),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::NotFound(format!("item {id}"))),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Search items whose name contains `keyword` as a substring, in
    /// ascending id order. The empty keyword matches every item; a
    /// keyword matching nothing yields an empty vec, not an error.
    ///
    /// Matching uses SQLite's default `LIKE` collation, which is
    /// case-insensitive for ASCII. LIKE metacharacters in the keyword are
    /// escaped, so they match themselves.
    pub async fn search_items(&self, keyword: &str) -> Result<Vec<ItemView>, Error> {
        let pattern = like_pattern(keyword);
        self.conn
            .call(move |conn| -> Result<Vec<ItemView>, Error> {
                let mut stmt = conn.prepare(&format!(
                    "{ITEM_VIEW_SELECT} WHERE items.name LIKE ?1 ESCAPE '\\' ORDER BY items.id ASC"
                ))?;
                let items = stmt
                    .query_map(params![pattern], item_view_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(items)
            })
            .await
            .map_err(Error::from)
    }

    #[cfg(test)]
    pub(crate) async fn count_categories_named(&self, name: &str) -> i64 {
        let name = name.to_string();
        self.conn
            .call(move |conn| {
                conn.query_row("SELECT COUNT(*) FROM category WHERE name = ?1", params![name], |row| {
                    row.get(0)
                })
            })
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::key::image_key;

    async fn test_db() -> CatalogDb {
        CatalogDb::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let k = image_key(b"bicycle photo");

        let id = db.create_item("Bicycle", "vehicle", &k).await.unwrap();
        assert_eq!(id, 1);

        let item = db.get_item(id).await.unwrap();
        assert_eq!(item, ItemView {
            id: 1,
            name: "Bicycle".to_string(),
            category: "vehicle".to_string(),
            image_filename: k,
        });
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = test_db().await;
        let result = db.get_item(99).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields() {
        let db = test_db().await;
        let k = image_key(b"x");

        assert!(matches!(db.create_item("", "toys", &k).await, Err(Error::InvalidRequest(_))));
        assert!(matches!(db.create_item("Bear", "", &k).await, Err(Error::InvalidRequest(_))));
        assert!(matches!(
            db.create_item("Bear", "toys", "not-a-key.jpg").await,
            Err(Error::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_category_deduplicated() {
        let db = test_db().await;
        let k = image_key(b"teddy");

        db.create_item("Bear", "toys", &k).await.unwrap();
        db.create_item("Blocks", "toys", &k).await.unwrap();

        assert_eq!(db.count_categories_named("toys").await, 1);

        let items = db.list_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.category == "toys"));
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let db = test_db().await;
        let k = image_key(b"img");

        for name in ["first", "second", "third"] {
            db.create_item(name, "misc", &k).await.unwrap();
        }

        let items = db.list_items().await.unwrap();
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_list_empty_catalog() {
        let db = test_db().await;
        assert!(db.list_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_substring() {
        let db = test_db().await;
        let k = image_key(b"img");

        db.create_item("Bicycle", "vehicle", &k).await.unwrap();
        db.create_item("Motorcycle", "vehicle", &k).await.unwrap();
        db.create_item("Skateboard", "vehicle", &k).await.unwrap();

        let hits = db.search_items("cycl").await.unwrap();
        let names: Vec<&str> = hits.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bicycle", "Motorcycle"]);

        assert!(db.search_items("car").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_empty_keyword_matches_all() {
        let db = test_db().await;
        let k = image_key(b"img");

        db.create_item("one", "misc", &k).await.unwrap();
        db.create_item("two", "misc", &k).await.unwrap();

        assert_eq!(db.search_items("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_escapes_like_metacharacters() {
        let db = test_db().await;
        let k = image_key(b"img");

        db.create_item("100% cotton shirt", "clothes", &k).await.unwrap();
        db.create_item("plain shirt", "clothes", &k).await.unwrap();

        let hits = db.search_items("100%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "100% cotton shirt");

        // "_" must not act as a single-character wildcard
        assert!(db.search_items("plai_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bicycle_scenario() {
        let db = test_db().await;
        let k = image_key(b"bicycle bytes");

        let id = db.create_item("Bicycle", "vehicle", &k).await.unwrap();
        assert_eq!(id, 1);

        let expected = ItemView {
            id: 1,
            name: "Bicycle".to_string(),
            category: "vehicle".to_string(),
            image_filename: k,
        };
        assert_eq!(db.list_items().await.unwrap(), vec![expected.clone()]);
        assert_eq!(db.search_items("cycl").await.unwrap(), vec![expected]);
        assert!(db.search_items("car").await.unwrap().is_empty());
    }

    #[test]
    fn test_like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("a%b_c"), "%a\\%b\\_c%");
        assert_eq!(like_pattern(""), "%%");
    }
}
