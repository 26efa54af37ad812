//! In-memory service fakes for core tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use marquee_api::traits::{AccountService, CatalogService};
use marquee_api::types::{ListEntry, Movie, MovieId, NewReview, Review, User};
use marquee_api::{ApiError, ApiResult};
use tokio::sync::Notify;

/// A scripted response for one fake endpoint.
#[derive(Debug, Clone)]
pub enum Canned<T> {
    Ok(T),
    AuthRejected,
    ServerError,
    Malformed,
}

impl<T: Clone> Canned<T> {
    fn produce(&self) -> ApiResult<T> {
        match self {
            Canned::Ok(value) => Ok(value.clone()),
            Canned::AuthRejected => Err(ApiError::Auth {
                message: "session expired".into(),
            }),
            Canned::ServerError => Err(ApiError::Api {
                status: 500,
                message: "internal error".into(),
            }),
            Canned::Malformed => Err(ApiError::Parse("expected a JSON array".into())),
        }
    }
}

pub fn user() -> User {
    User {
        id: 1,
        username: "mika".into(),
        email: None,
    }
}

pub fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id: MovieId(id),
        title: title.into(),
        description: None,
        release_date: None,
        rating: None,
        poster_url: None,
        genres: Vec::new(),
        cast: Vec::new(),
        original_language: None,
    }
}

pub fn entry(id: u64, title: &str) -> ListEntry {
    ListEntry {
        movie: movie(id, title),
    }
}

pub fn stored_review(movie_id: u64, rating: f32, text: &str) -> Review {
    Review {
        id: Some(900 + movie_id),
        movie_id: Some(MovieId(movie_id)),
        rating,
        text: text.into(),
        user: None,
        created_at: None,
    }
}

#[derive(Debug, Default)]
pub struct AccountCalls {
    watchlist_fetches: AtomicUsize,
    favorites_fetches: AtomicUsize,
    watchlist_adds: AtomicUsize,
    watchlist_removes: AtomicUsize,
    favorite_adds: AtomicUsize,
    favorite_removes: AtomicUsize,
    review_submissions: AtomicUsize,
}

impl AccountCalls {
    pub fn watchlist_fetches(&self) -> usize {
        self.watchlist_fetches.load(Ordering::SeqCst)
    }

    pub fn favorites_fetches(&self) -> usize {
        self.favorites_fetches.load(Ordering::SeqCst)
    }

    pub fn watchlist_adds(&self) -> usize {
        self.watchlist_adds.load(Ordering::SeqCst)
    }

    pub fn watchlist_removes(&self) -> usize {
        self.watchlist_removes.load(Ordering::SeqCst)
    }

    pub fn favorite_adds(&self) -> usize {
        self.favorite_adds.load(Ordering::SeqCst)
    }

    pub fn favorite_removes(&self) -> usize {
        self.favorite_removes.load(Ordering::SeqCst)
    }

    pub fn review_submissions(&self) -> usize {
        self.review_submissions.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.watchlist_fetches()
            + self.favorites_fetches()
            + self.watchlist_adds()
            + self.watchlist_removes()
            + self.favorite_adds()
            + self.favorite_removes()
            + self.review_submissions()
    }
}

/// Fake account service with scripted responses and call counters.
///
/// When `gate` is set, mutations park on it after being counted, which
/// lets tests hold a request in flight.
#[derive(Debug)]
pub struct FakeAccount {
    pub watchlist: Canned<Vec<ListEntry>>,
    pub favorites: Canned<Vec<ListEntry>>,
    pub mutation: Canned<()>,
    pub review: Canned<Review>,
    pub gate: Option<Arc<Notify>>,
    pub calls: AccountCalls,
}

impl Default for FakeAccount {
    fn default() -> Self {
        Self {
            watchlist: Canned::Ok(Vec::new()),
            favorites: Canned::Ok(Vec::new()),
            mutation: Canned::Ok(()),
            review: Canned::Ok(stored_review(1, 5.0, "")),
            gate: None,
            calls: AccountCalls::default(),
        }
    }
}

impl FakeAccount {
    async fn pause(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

impl AccountService for FakeAccount {
    async fn watchlist(&self) -> ApiResult<Vec<ListEntry>> {
        self.calls.watchlist_fetches.fetch_add(1, Ordering::SeqCst);
        self.watchlist.produce()
    }

    async fn favorites(&self) -> ApiResult<Vec<ListEntry>> {
        self.calls.favorites_fetches.fetch_add(1, Ordering::SeqCst);
        self.favorites.produce()
    }

    async fn add_to_watchlist(&self, _id: MovieId) -> ApiResult<()> {
        self.calls.watchlist_adds.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.mutation.produce()
    }

    async fn remove_from_watchlist(&self, _id: MovieId) -> ApiResult<()> {
        self.calls.watchlist_removes.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.mutation.produce()
    }

    async fn add_favorite(&self, _id: MovieId) -> ApiResult<()> {
        self.calls.favorite_adds.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.mutation.produce()
    }

    async fn remove_favorite(&self, _id: MovieId) -> ApiResult<()> {
        self.calls.favorite_removes.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.mutation.produce()
    }

    async fn submit_review(&self, _review: NewReview) -> ApiResult<Review> {
        self.calls.review_submissions.fetch_add(1, Ordering::SeqCst);
        self.review.produce()
    }
}

#[derive(Debug, Default)]
pub struct CatalogCalls {
    detail_fetches: AtomicUsize,
    review_fetches: AtomicUsize,
}

impl CatalogCalls {
    pub fn detail_fetches(&self) -> usize {
        self.detail_fetches.load(Ordering::SeqCst)
    }

    pub fn review_fetches(&self) -> usize {
        self.review_fetches.load(Ordering::SeqCst)
    }
}

/// Fake catalog service with scripted detail and review responses.
#[derive(Debug)]
pub struct FakeCatalog {
    pub movie: Canned<Movie>,
    pub reviews: Canned<Vec<Review>>,
    pub calls: CatalogCalls,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            movie: Canned::Ok(movie(1, "Placeholder")),
            reviews: Canned::Ok(Vec::new()),
            calls: CatalogCalls::default(),
        }
    }
}

impl CatalogService for FakeCatalog {
    async fn movie_details(&self, _id: MovieId) -> ApiResult<Movie> {
        self.calls.detail_fetches.fetch_add(1, Ordering::SeqCst);
        self.movie.produce()
    }

    async fn reviews(&self, _id: MovieId) -> ApiResult<Vec<Review>> {
        self.calls.review_fetches.fetch_add(1, Ordering::SeqCst);
        self.reviews.produce()
    }

    async fn trending(&self) -> ApiResult<Vec<Movie>> {
        Ok(Vec::new())
    }

    async fn search(&self, _query: &str) -> ApiResult<Vec<Movie>> {
        Ok(Vec::new())
    }
}
