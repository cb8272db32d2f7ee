use std::sync::Arc;

use axum::{
    extract::{Form, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::{
    AppState,
    error::AppResult,
    models::{EditForm, FindQuery, IdQuery, NewMovie, SearchForm},
    templates,
};

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.store.ordered_by_rating().await?;
    Ok(Html(templates::index_page(&movies)))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page("", &[]))
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> AppResult<Response> {
    let title = form.title.trim();
    if title.is_empty() {
        let body = templates::add_page("", &["Movie title is required.".to_string()]);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
    }

    let candidates = state.tmdb.search(title).await?;
    Ok(Html(templates::select_page(title, &candidates)).into_response())
}

pub async fn find(
    State(state): State<Arc<AppState>>,
    q: Result<Query<FindQuery>, QueryRejection>,
) -> AppResult<Redirect> {
    let Query(q) = q?;
    let detail = state.tmdb.details(&q.id).await?;
    info!(external_id = %detail.external_id, title = %detail.title, "adding movie from catalog");
    state.store.insert(NewMovie::from(detail)).await?;
    Ok(Redirect::to("/"))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    q: Result<Query<IdQuery>, QueryRejection>,
) -> AppResult<Html<String>> {
    let Query(q) = q?;
    let movie = state.store.get(q.id).await?;
    Ok(Html(templates::edit_page(&movie, &EditForm::from_movie(&movie), &[])))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    q: Result<Query<IdQuery>, QueryRejection>,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let Query(q) = q?;
    let movie = state.store.get(q.id).await?;

    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            let body = templates::edit_page(&movie, &form, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    state.store.update(movie.id, update).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    q: Result<Query<IdQuery>, QueryRejection>,
) -> AppResult<Redirect> {
    let Query(q) = q?;
    state.store.delete(q.id).await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        store::{
            MovieStore,
            tests::{memory_store, new_movie},
        },
        tmdb::testing::fake_client,
    };

    async fn test_app() -> (Router, MovieStore) {
        let store = memory_store().await;
        let state = Arc::new(AppState { store: store.clone(), tmdb: Arc::new(fake_client().await) });
        (crate::app(state), store)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String, Option<String>) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let location =
            resp.headers().get(header::LOCATION).map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), location)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn list_renders_movies_in_rank_order() {
        let (app, store) = test_app().await;
        store.insert(new_movie("Alpha", None)).await.unwrap();
        store.insert(new_movie("Bravo", Some(9.0))).await.unwrap();
        store.insert(new_movie("Charlie", Some(7.0))).await.unwrap();

        let (status, body, _) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);

        let pos = |s: &str| body.find(s).unwrap();
        assert!(pos("Bravo") < pos("Charlie"));
        assert!(pos("Charlie") < pos("Alpha"));
        assert!(body.contains("#3"));
    }

    #[tokio::test]
    async fn add_flow_searches_then_inserts() {
        let (app, store) = test_app().await;

        let (status, body, _) = send(&app, post_form("/add", "title=Phone")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/find?id=1817"));

        let (status, _, location) = send(&app, get("/find?id=1817")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let movies = store.all().await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Phone Booth");
        assert_eq!(movies[0].year, 2002);
        assert_eq!(movies[0].img_url, "https://img.test/t/p/w500/booth.jpg");
        assert_eq!(movies[0].rating, None);
    }

    #[tokio::test]
    async fn adding_the_same_movie_twice_conflicts() {
        let (app, store) = test_app().await;
        send(&app, get("/find?id=1817")).await;

        let (status, _, _) = send(&app, get("/find?id=1817")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_search_is_redisplayed() {
        let (app, _) = test_app().await;
        let (status, body, _) = send(&app, post_form("/add", "title=++")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Movie title is required."));
    }

    #[tokio::test]
    async fn upstream_failure_fails_the_request() {
        let (app, store) = test_app().await;
        let (status, _, _) = send(&app, get("/find?id=404")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn edit_form_is_prefilled() {
        let (app, store) = test_app().await;
        let movie = store.insert(new_movie("Heat", Some(7.5))).await.unwrap();

        let (status, body, _) = send(&app, get(&format!("/edit?id={}", movie.id))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"value="7.5""#));
    }

    #[tokio::test]
    async fn edit_updates_and_redirects() {
        let (app, store) = test_app().await;
        let movie = store.insert(new_movie("Heat", None)).await.unwrap();

        let uri = format!("/edit?id={}", movie.id);
        let (status, _, location) =
            send(&app, post_form(&uri, "rating=8.5&review=Great+film")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let stored = store.get(movie.id).await.unwrap();
        assert_eq!(stored.rating, Some(8.5));
        assert_eq!(stored.review.as_deref(), Some("Great film"));
    }

    #[tokio::test]
    async fn invalid_rating_redisplays_form_without_writing() {
        let (app, store) = test_app().await;
        let movie = store.insert(new_movie("Heat", Some(6.0))).await.unwrap();

        let uri = format!("/edit?id={}", movie.id);
        let (status, body, _) = send(&app, post_form(&uri, "rating=ten&review=Loved+it")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains(r#"value="ten""#));
        assert!(body.contains(r#"value="Loved it""#));

        let stored = store.get(movie.id).await.unwrap();
        assert_eq!(stored, movie);
    }

    #[tokio::test]
    async fn missing_movie_is_404() {
        let (app, _) = test_app().await;
        assert_eq!(send(&app, get("/edit?id=5")).await.0, StatusCode::NOT_FOUND);
        assert_eq!(send(&app, post_form("/edit?id=5", "rating=1")).await.0, StatusCode::NOT_FOUND);
        assert_eq!(send(&app, get("/delete?id=5")).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_ids_render_the_error_page() {
        let (app, store) = test_app().await;
        store.insert(new_movie("Heat", None)).await.unwrap();

        for req in [get("/edit?id=abc"), get("/delete?id=abc"), get("/delete"), get("/find")] {
            let (status, body, _) = send(&app, req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body.contains("<!DOCTYPE html>"));
            assert!(body.contains(r#"href="/""#));
        }
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_removes_movie_from_listing() {
        let (app, store) = test_app().await;
        let gone = store.insert(new_movie("Gone", Some(4.0))).await.unwrap();
        store.insert(new_movie("Kept", Some(3.0))).await.unwrap();

        let (status, _, _) = send(&app, get(&format!("/delete?id={}", gone.id))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (_, body, _) = send(&app, get("/")).await;
        assert!(!body.contains("Gone"));
        assert!(body.contains("Kept"));
    }
}
