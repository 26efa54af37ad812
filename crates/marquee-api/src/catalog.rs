use crate::connection::Connection;
use crate::error::ApiResult;
use crate::traits::CatalogService;
use crate::types::{Movie, MovieId, Review};

/// Client for the public catalog endpoints.
///
/// These work with or without a session; the connection just carries
/// the cookie along if one is present.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    conn: Connection,
}

impl CatalogClient {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl CatalogService for CatalogClient {
    async fn movie_details(&self, id: MovieId) -> ApiResult<Movie> {
        tracing::debug!(%id, "fetching movie details");
        let resp = self
            .conn
            .http()
            .get(self.conn.endpoint(&format!("/movies/{id}"))?)
            .send()
            .await?;

        let resp = Connection::check_response(resp).await?;
        Connection::json_body(resp).await
    }

    async fn reviews(&self, id: MovieId) -> ApiResult<Vec<Review>> {
        tracing::debug!(%id, "fetching reviews");
        let resp = self
            .conn
            .http()
            .get(self.conn.endpoint(&format!("/movies/{id}/reviews"))?)
            .send()
            .await?;

        let resp = Connection::check_response(resp).await?;
        Connection::json_body(resp).await
    }

    async fn trending(&self) -> ApiResult<Vec<Movie>> {
        let resp = self
            .conn
            .http()
            .get(self.conn.endpoint("/movies/trending")?)
            .send()
            .await?;

        let resp = Connection::check_response(resp).await?;
        Connection::json_body(resp).await
    }

    async fn search(&self, query: &str) -> ApiResult<Vec<Movie>> {
        tracing::debug!(query, "searching catalog");
        let resp = self
            .conn
            .http()
            .get(self.conn.endpoint("/movies/search")?)
            .query(&[("query", query)])
            .send()
            .await?;

        let resp = Connection::check_response(resp).await?;
        Connection::json_body(resp).await
    }
}
