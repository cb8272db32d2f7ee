use std::cmp::Ordering;

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use tracing::debug;

use crate::{entities::movie, error::StoreResult};

/// Rated movies first, highest rating first; unrated movies last. Equal
/// ratings (and all unrated movies) keep ascending id order.
pub fn by_rating(a: &movie::Model, b: &movie::Model) -> Ordering {
    let by_rating = match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_rating.then(a.id.cmp(&b.id))
}

pub fn sort_by_rating(movies: &mut [movie::Model]) {
    movies.sort_by(by_rating);
}

/// Pairs each movie id with its 1-based position. Expects `movies` already
/// sorted with [`sort_by_rating`].
pub fn rankings(movies: &[movie::Model]) -> impl Iterator<Item = (i32, i32)> + '_ {
    movies.iter().zip(1..).map(|(m, rank)| (m.id, rank))
}

/// Rewrites the `ranking` column so it matches the rating order. Only rows
/// whose ranking moved are written.
pub async fn recompute<C: ConnectionTrait>(conn: &C) -> StoreResult<usize> {
    let mut movies =
        movie::Entity::find().order_by_asc(movie::Column::Id).all(conn).await?;
    sort_by_rating(&mut movies);

    let mut changed = 0;
    for (movie, (id, rank)) in movies.iter().zip(rankings(&movies)) {
        if movie.ranking == Some(rank) {
            continue;
        }
        let model = movie::ActiveModel {
            id: Set(id),
            ranking: Set(Some(rank)),
            ..Default::default()
        };
        model.update(conn).await?;
        changed += 1;
    }

    debug!(total = movies.len(), changed, "recomputed rankings");
    Ok(changed)
}
