//! Trait seams over the service clients.
//!
//! Membership resolution, toggling, and the detail screen are generic
//! over these traits, so tests can stand in fakes for the HTTP clients
//! and front ends stay decoupled from the transport.

use std::future::Future;

use crate::error::ApiResult;
use crate::types::{ListEntry, Movie, MovieId, NewReview, Review};

/// Read-only catalog operations. No session required.
pub trait CatalogService: Send + Sync {
    /// Fetch full details for one movie.
    fn movie_details(&self, id: MovieId) -> impl Future<Output = ApiResult<Movie>> + Send;

    /// Fetch all reviews written for one movie.
    fn reviews(&self, id: MovieId) -> impl Future<Output = ApiResult<Vec<Review>>> + Send;

    /// Currently trending movies.
    fn trending(&self) -> impl Future<Output = ApiResult<Vec<Movie>>> + Send;

    /// Title search.
    fn search(&self, query: &str) -> impl Future<Output = ApiResult<Vec<Movie>>> + Send;
}

/// Operations scoped to the signed-in account: the watchlist and
/// favorites collections plus review submission.
///
/// The session credential rides on the connection (cookie); these
/// methods fail with [`crate::ApiError::Auth`] once the server stops
/// accepting it.
pub trait AccountService: Send + Sync {
    /// The user's full watchlist.
    fn watchlist(&self) -> impl Future<Output = ApiResult<Vec<ListEntry>>> + Send;

    /// The user's full favorites collection.
    fn favorites(&self) -> impl Future<Output = ApiResult<Vec<ListEntry>>> + Send;

    fn add_to_watchlist(&self, id: MovieId) -> impl Future<Output = ApiResult<()>> + Send;

    fn remove_from_watchlist(&self, id: MovieId) -> impl Future<Output = ApiResult<()>> + Send;

    fn add_favorite(&self, id: MovieId) -> impl Future<Output = ApiResult<()>> + Send;

    fn remove_favorite(&self, id: MovieId) -> impl Future<Output = ApiResult<()>> + Send;

    /// Submit a new review; the server returns the stored review.
    fn submit_review(&self, review: NewReview) -> impl Future<Output = ApiResult<Review>> + Send;
}
