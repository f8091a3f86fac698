//! Catalog repository. Items are seeded by migration and never mutated here.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::items;

/// Catalog repository.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an item by its exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<Option<items::Model>, DbErr> {
        items::Entity::find()
            .filter(items::Column::Name.eq(name))
            .one(conn)
            .await
    }

    /// Lists every item, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<items::Model>, DbErr> {
        items::Entity::find()
            .order_by_asc(items::Column::Price)
            .order_by_asc(items::Column::Name)
            .all(&self.db)
            .await
    }
}
