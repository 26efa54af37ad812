use serde_json::json;

use crate::connection::Connection;
use crate::error::ApiResult;
use crate::traits::AccountService;
use crate::types::{Credentials, ListEntry, MovieId, NewReview, Registration, Review, User};

/// Client for the session-scoped account endpoints.
///
/// Login stores the session cookie in the shared connection, so a
/// [`crate::CatalogClient`] built from the same connection picks it up
/// automatically.
#[derive(Debug, Clone)]
pub struct AccountClient {
    conn: Connection,
}

impl AccountClient {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Sign in and return the account profile. The session cookie lands
    /// in the connection's jar as a side effect.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<User> {
        tracing::debug!(username = %credentials.username, "logging in");
        let resp = self
            .conn
            .http()
            .post(self.conn.endpoint("/users/login")?)
            .json(credentials)
            .send()
            .await?;

        let resp = Connection::check_response(resp).await?;
        Connection::json_body(resp).await
    }

    /// Create a new account. The server does not sign the account in;
    /// callers follow up with [`AccountClient::login`].
    pub async fn register(&self, registration: &Registration) -> ApiResult<()> {
        let resp = self
            .conn
            .http()
            .post(self.conn.endpoint("/users/register")?)
            .json(registration)
            .send()
            .await?;

        Connection::check_response(resp).await?;
        Ok(())
    }

    /// End the server-side session. The local cookie is dropped with the
    /// connection.
    pub async fn logout(&self) -> ApiResult<()> {
        let resp = self
            .conn
            .http()
            .post(self.conn.endpoint("/users/logout")?)
            .send()
            .await?;

        Connection::check_response(resp).await?;
        Ok(())
    }

    async fn list(&self, path: &str) -> ApiResult<Vec<ListEntry>> {
        let resp = self
            .conn
            .http()
            .get(self.conn.endpoint(path)?)
            .send()
            .await?;

        let resp = Connection::check_response(resp).await?;
        Connection::json_body(resp).await
    }

    async fn add_entry(&self, path: &str, id: MovieId) -> ApiResult<()> {
        tracing::debug!(%id, path, "adding list entry");
        let resp = self
            .conn
            .http()
            .post(self.conn.endpoint(path)?)
            .json(&json!({ "movie_id": id }))
            .send()
            .await?;

        // Treat 409 as success: the entry is already present.
        if resp.status().as_u16() == 409 {
            return Ok(());
        }
        Connection::check_response(resp).await?;
        Ok(())
    }

    async fn remove_entry(&self, path: &str, id: MovieId) -> ApiResult<()> {
        tracing::debug!(%id, path, "removing list entry");
        let resp = self
            .conn
            .http()
            .delete(self.conn.endpoint(&format!("{path}/{id}"))?)
            .send()
            .await?;

        // Treat 404 as success: the entry is already gone.
        if resp.status().as_u16() == 404 {
            return Ok(());
        }
        Connection::check_response(resp).await?;
        Ok(())
    }
}

impl AccountService for AccountClient {
    async fn watchlist(&self) -> ApiResult<Vec<ListEntry>> {
        self.list("/users/watchlist").await
    }

    async fn favorites(&self) -> ApiResult<Vec<ListEntry>> {
        self.list("/users/favorites").await
    }

    async fn add_to_watchlist(&self, id: MovieId) -> ApiResult<()> {
        self.add_entry("/users/watchlist", id).await
    }

    async fn remove_from_watchlist(&self, id: MovieId) -> ApiResult<()> {
        self.remove_entry("/users/watchlist", id).await
    }

    async fn add_favorite(&self, id: MovieId) -> ApiResult<()> {
        self.add_entry("/users/favorites", id).await
    }

    async fn remove_favorite(&self, id: MovieId) -> ApiResult<()> {
        self.remove_entry("/users/favorites", id).await
    }

    async fn submit_review(&self, review: NewReview) -> ApiResult<Review> {
        tracing::debug!(id = %review.movie_id, "submitting review");
        let resp = self
            .conn
            .http()
            .post(self.conn.endpoint("/users/ratings")?)
            .json(&review)
            .send()
            .await?;

        let resp = Connection::check_response(resp).await?;
        Connection::json_body(resp).await
    }
}
