use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::{
    entities::movie,
    error::{StoreError, StoreResult},
    models::{MovieUpdate, NewMovie},
    ranking,
};

/// Persistent movie list. Every mutation re-ranks the table inside the same
/// transaction, so readers only ever see a consistent `ranking` column.
#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, new: NewMovie) -> StoreResult<movie::Model> {
        let txn = self.db.begin().await?;

        let title = new.title.clone();
        let inserted = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(new.rating),
            ranking: Set(None),
            review: Set(new.review),
            img_url: Set(new.img_url),
        }
        .insert(&txn)
        .await
        .map_err(|e| StoreError::from_insert(e, &title))?;

        ranking::recompute(&txn).await?;
        txn.commit().await?;

        info!(id = inserted.id, title = %inserted.title, "movie added");
        self.get(inserted.id).await
    }

    pub async fn all(&self) -> StoreResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.db).await?)
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> StoreResult<movie::Model> {
        movie::Entity::find_by_id(id).one(&self.db).await?.ok_or(StoreError::NotFound(id))
    }

    pub async fn update(&self, id: i32, fields: MovieUpdate) -> StoreResult<movie::Model> {
        debug!(id, ?fields, "updating movie");
        let txn = self.db.begin().await?;

        let existing =
            movie::Entity::find_by_id(id).one(&txn).await?.ok_or(StoreError::NotFound(id))?;

        let mut model: movie::ActiveModel = existing.into();
        if let Some(rating) = fields.rating {
            model.rating = Set(Some(rating));
        }
        if let Some(review) = fields.review {
            model.review = Set(review);
        }
        if model.is_changed() {
            model.update(&txn).await?;
        }

        ranking::recompute(&txn).await?;
        txn.commit().await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        let res = movie::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        ranking::recompute(&txn).await?;
        txn.commit().await?;

        info!(id, "movie deleted");
        Ok(())
    }

    /// All movies, best rated first. Unrated movies come last; ties keep
    /// insertion order.
    pub async fn ordered_by_rating(&self) -> StoreResult<Vec<movie::Model>> {
        let mut movies = self.all().await?;
        ranking::sort_by_rating(&mut movies);
        Ok(movies)
    }

    /// Inserts seed movies, skipping titles that are already present.
    /// Returns how many rows were added.
    pub async fn import(&self, movies: Vec<NewMovie>) -> StoreResult<usize> {
        let txn = self.db.begin().await?;

        let mut added = 0;
        for new in movies {
            let title = new.title.clone();
            let model = movie::ActiveModel {
                id: Default::default(),
                title: Set(new.title),
                year: Set(new.year),
                description: Set(new.description),
                rating: Set(new.rating),
                ranking: Set(None),
                review: Set(new.review),
                img_url: Set(new.img_url),
            };
            match model.insert(&txn).await.map_err(|e| StoreError::from_insert(e, &title)) {
                Ok(_) => added += 1,
                Err(StoreError::DuplicateTitle(title)) => {
                    warn!(%title, "skipping seed movie, title already exists");
                },
                Err(err) => return Err(err),
            }
        }

        ranking::recompute(&txn).await?;
        txn.commit().await?;

        info!(added, "imported seed movies");
        Ok(added)
    }
}
