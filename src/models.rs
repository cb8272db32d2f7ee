use serde::Deserialize;

use crate::entities::movie;

/// A movie about to be stored. Rating and review are only present when
/// importing seed data; the add flow leaves them unset.
#[derive(Clone, Debug, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review: Option<String>,
}

/// Fields the edit flow is allowed to change. `None` leaves the column as is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieUpdate {
    pub rating: Option<f64>,
    pub review: Option<Option<String>>,
}

/// One row of a catalog search result.
#[derive(Clone, Debug)]
pub struct CandidateSummary {
    pub external_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub thumbnail_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CandidateDetail {
    pub external_id: String,
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}

impl From<CandidateDetail> for NewMovie {
    fn from(detail: CandidateDetail) -> Self {
        Self {
            title: detail.title,
            year: detail.year,
            description: detail.description,
            img_url: detail.img_url,
            rating: None,
            review: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct FindQuery {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub title: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

impl EditForm {
    pub fn from_movie(movie: &movie::Model) -> Self {
        Self {
            rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
            review: movie.review.clone().unwrap_or_default(),
        }
    }

    /// Checks the submitted values and turns them into a store update.
    pub fn validate(&self) -> Result<MovieUpdate, Vec<String>> {
        let mut errors = Vec::new();

        let rating = self.rating.trim();
        let parsed = if rating.is_empty() {
            errors.push("Rating is required.".to_string());
            None
        } else {
            match rating.parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    errors.push(format!("Rating must be a number, got \"{rating}\"."));
                    None
                },
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let review = self.review.trim();
        Ok(MovieUpdate {
            rating: parsed,
            review: Some((!review.is_empty()).then(|| review.to_string())),
        })
    }
}
