use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::movie,
    models::{CandidateSummary, EditForm},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn index_page(movies: &[movie::Model]) -> String {
    page(
        "My Top Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                            p class="mt-2 text-gray-600" { "These are my all-time favourite movies." }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies yet. Add one to get started." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for movie in movies {
                                (movie_card(movie))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(title: &str, errors: &[String]) -> String {
    page(
        "Add Movie",
        card(html! {
            h1 class="text-2xl font-bold text-gray-900" { "Add a Movie" }
            (error_list(errors))
            form class="mt-6 space-y-6" method="post" action="/add" {
                div {
                    label class="block text-sm font-medium text-gray-700" for="title" { "Movie Title" }
                    input class=(INPUT_CLASS) name="title" id="title" value=(title) required;
                }
                button class=(BUTTON_CLASS) type="submit" { "Add Movie" }
            }
        }),
    )
}

pub fn select_page(query: &str, candidates: &[CandidateSummary]) -> String {
    page(
        "Select Movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    h1 class="text-2xl font-bold text-gray-900" { "Select Movie" }
                    p class="mt-2 text-gray-600" { "Results for \"" (query) "\"" }
                    @if candidates.is_empty() {
                        div class="mt-8 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "Nothing matched that title." }
                            a class="mt-4 inline-block text-blue-600 hover:text-blue-800" href="/add" { "Try again" }
                        }
                    } @else {
                        ul class="mt-8 bg-white shadow rounded-lg divide-y divide-gray-200" {
                            @for candidate in candidates {
                                li class="p-4 flex items-center gap-4" {
                                    @if let Some(thumb) = &candidate.thumbnail_url {
                                        img class="h-16 w-11 rounded object-cover" src=(thumb) alt=(candidate.title);
                                    }
                                    a class="text-blue-600 hover:text-blue-800" href=(find_url(&candidate.external_id)) {
                                        (candidate.title)
                                        @if let Some(year) = candidate.year {
                                            span class="ml-2 text-gray-500" { "(" (year) ")" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_page(movie: &movie::Model, form: &EditForm, errors: &[String]) -> String {
    page(
        "Edit Movie",
        card(html! {
            h1 class="text-2xl font-bold text-gray-900" { (movie.title) }
            p class="mt-1 text-gray-600" { "Edit movie rating" }
            (error_list(errors))
            form class="mt-6 space-y-6" method="post" action=(format!("/edit?id={}", movie.id)) {
                div {
                    label class="block text-sm font-medium text-gray-700" for="rating" { "Your rating out of 10, e.g. 7.5" }
                    input class=(INPUT_CLASS) name="rating" id="rating" value=(form.rating) required;
                }
                div {
                    label class="block text-sm font-medium text-gray-700" for="review" { "Your review" }
                    input class=(INPUT_CLASS) name="review" id="review" value=(form.review);
                }
                button class=(BUTTON_CLASS) type="submit" { "Done" }
            }
        }),
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        card(html! {
            h1 class="text-2xl font-bold text-gray-900" { (status.canonical_reason().unwrap_or("Error")) }
            p class="mt-4 text-gray-700" { (message) }
            a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
        }),
    )
}

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn card(inner: Markup) -> Markup {
    html! {
        div class="min-h-screen bg-gray-50 flex items-center justify-center" {
            div class="max-w-xl w-full px-6" {
                div class="bg-white shadow rounded-lg p-8" { (inner) }
            }
        }
    }
}

fn error_list(errors: &[String]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul class="mt-4 rounded-md bg-red-50 p-4 text-sm text-red-700" {
                @for err in errors {
                    li { (err) }
                }
            }
        }
    }
}

fn find_url(external_id: &str) -> String {
    format!("/find?id={}", urlencoding::encode(external_id))
}

fn movie_card(movie: &movie::Model) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if !movie.img_url.is_empty() {
                img class="h-48 w-32 rounded object-cover" src=(movie.img_url) alt=(movie.title);
            }
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        @if let Some(ranking) = movie.ranking {
                            span class="mr-2 text-gray-400" { "#" (ranking) }
                        }
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    span class="text-lg font-semibold text-gray-900" {
                        @match movie.rating {
                            Some(rating) => { (format!("{rating:.1}")) },
                            None => { span class="text-gray-400" { "unrated" } },
                        }
                    }
                }
                p class="mt-3 text-gray-700" { (movie.description) }
                @if let Some(review) = &movie.review {
                    p class="mt-3 italic text-gray-600" { "\"" (review) "\"" }
                }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit?id={}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete?id={}", movie.id)) { "Delete" }
                }
            }
        }
    }
}
