use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identifiers ─────────────────────────────────────────────────

/// Canonical movie identifier.
///
/// Route parameters and CLI arguments arrive as strings; parse them into
/// a `MovieId` once at that boundary so every later comparison is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl FromStr for MovieId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(MovieId)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        MovieId(id)
    }
}

// ── Catalog responses ────────────────────────────────────────────

/// A movie as served by the catalog endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<f32>,
    pub poster_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    pub original_language: Option<String>,
}

/// One entry of the user's watchlist or favorites collection.
///
/// The service wraps each movie in an object, leaving room for
/// entry-level attributes it may add later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEntry {
    pub movie: Movie,
}

// ── Reviews ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub username: String,
}

/// A submitted rating with its free-text body.
///
/// Ratings run from 0.5 to 10 in half-point steps. The text body is
/// named `review` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Option<u64>,
    pub movie_id: Option<MovieId>,
    pub rating: f32,
    #[serde(rename = "review", default)]
    pub text: String,
    pub user: Option<ReviewAuthor>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for submitting a new review.
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub movie_id: MovieId,
    pub rating: f32,
    #[serde(rename = "review")]
    pub text: String,
}

// ── Account ──────────────────────────────────────────────────────

/// The signed-in identity as issued by login/register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}
