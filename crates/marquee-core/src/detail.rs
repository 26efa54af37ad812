use futures::join;
use marquee_api::traits::{AccountService, CatalogService};
use marquee_api::types::{Movie, MovieId, NewReview, Review, User};
use marquee_api::ApiResult;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::membership::{resolve_membership, MembershipFlags};
use crate::toggle::{MembershipKind, ToggleController, ToggleOutcome};

pub const RATING_MIN: f32 = 0.5;
pub const RATING_MAX: f32 = 10.0;
pub const RATING_STEP: f32 = 0.5;
pub const RATING_DEFAULT: f32 = 5.0;

/// Lifecycle of the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    /// Nothing usable yet; the primary fetch is outstanding.
    Loading,
    /// The movie is present. Reviews and membership may still have
    /// degraded; see [`DetailScreen::partial_data`].
    Ready,
    /// The primary fetch failed. No movie fields are rendered.
    Failed,
}

/// Outcome of submitting the review draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Submitted,
    /// No usable session; the caller should send the user to login. The
    /// draft is kept so nothing typed is lost.
    AuthRequired,
}

/// The review being composed on the screen.
///
/// Ratings run from 0.5 to 10 in half-point steps; the setter is the one
/// place that invariant is enforced.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    rating: f32,
    text: String,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            rating: RATING_DEFAULT,
            text: String::new(),
        }
    }
}

impl ReviewDraft {
    pub fn rating(&self) -> f32 {
        self.rating
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Snap to the nearest half point and clamp into the valid range.
    /// Non-finite input is ignored; the draft keeps its last value.
    pub fn set_rating(&mut self, rating: f32) {
        if !rating.is_finite() {
            return;
        }
        let snapped = (rating / RATING_STEP).round() * RATING_STEP;
        self.rating = snapped.clamp(RATING_MIN, RATING_MAX);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// State for one movie's detail view.
///
/// Drives the primary movie fetch, the review list, the viewer's
/// membership flags, and the review draft, keeping them consistent
/// across concurrent completions and navigation. All mutation goes
/// through the `apply_*` methods, which discard results fetched for a
/// movie the screen no longer shows.
#[derive(Debug)]
pub struct DetailScreen {
    movie_id: MovieId,
    phase: ScreenPhase,
    movie: Option<Movie>,
    reviews: Vec<Review>,
    membership: MembershipFlags,
    partial_data: bool,
    draft: ReviewDraft,
    toggles: ToggleController,
}

impl DetailScreen {
    pub fn open(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            phase: ScreenPhase::Loading,
            movie: None,
            reviews: Vec::new(),
            membership: MembershipFlags::default(),
            partial_data: false,
            draft: ReviewDraft::default(),
            toggles: ToggleController::new(),
        }
    }

    /// Point the screen at a different movie, resetting all content.
    /// Results still in flight for the old movie will be discarded when
    /// they land. Retargeting to the current movie is a no-op.
    pub fn retarget(&mut self, movie_id: MovieId) {
        if movie_id == self.movie_id {
            return;
        }
        debug!(from = %self.movie_id, to = %movie_id, "retargeting detail screen");
        self.movie_id = movie_id;
        self.reset_content();
        self.draft.reset();
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    pub fn phase(&self) -> ScreenPhase {
        self.phase
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn membership(&self) -> MembershipFlags {
        self.membership
    }

    /// True when the movie is shown but a secondary fetch (reviews)
    /// failed and placeholders are rendered instead.
    pub fn partial_data(&self) -> bool {
        self.partial_data
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ReviewDraft {
        &mut self.draft
    }

    /// Fetch everything the screen shows.
    ///
    /// The movie and its reviews load concurrently; membership
    /// resolution joins them only for signed-in viewers, so the
    /// signed-out path costs zero account requests. Only a primary
    /// (movie) failure is an error; secondary failures degrade in place.
    pub async fn load<C, A>(
        &mut self,
        catalog: &C,
        account: &A,
        viewer: Option<&User>,
    ) -> Result<(), CoreError>
    where
        C: CatalogService,
        A: AccountService,
    {
        let target = self.movie_id;
        self.reset_content();
        debug!(%target, signed_in = viewer.is_some(), "loading detail screen");

        if viewer.is_some() {
            let (movie, reviews, membership) = join!(
                catalog.movie_details(target),
                catalog.reviews(target),
                resolve_membership(account, target, viewer),
            );
            self.apply_movie(target, movie)?;
            self.apply_reviews(target, reviews);
            self.apply_membership(target, membership);
        } else {
            let (movie, reviews) = join!(catalog.movie_details(target), catalog.reviews(target));
            self.apply_movie(target, movie)?;
            self.apply_reviews(target, reviews);
        }
        Ok(())
    }

    /// Land the primary fetch. A failure here is fatal for the screen.
    pub fn apply_movie(
        &mut self,
        fetched_for: MovieId,
        result: ApiResult<Movie>,
    ) -> Result<(), CoreError> {
        if fetched_for != self.movie_id {
            debug!(%fetched_for, showing = %self.movie_id, "discarding stale movie result");
            return Ok(());
        }
        match result {
            Ok(movie) => {
                self.movie = Some(movie);
                self.phase = ScreenPhase::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(%fetched_for, error = %e, "movie details failed to load");
                self.movie = None;
                self.phase = ScreenPhase::Failed;
                Err(e.into())
            }
        }
    }

    /// Land the review list. Failure leaves the screen up with the
    /// partial-data flag set.
    pub fn apply_reviews(&mut self, fetched_for: MovieId, result: ApiResult<Vec<Review>>) {
        if fetched_for != self.movie_id {
            debug!(%fetched_for, showing = %self.movie_id, "discarding stale review result");
            return;
        }
        match result {
            Ok(reviews) => self.reviews = reviews,
            Err(e) => {
                warn!(%fetched_for, error = %e, "reviews failed to load");
                self.reviews.clear();
                self.partial_data = true;
            }
        }
    }

    /// Land the membership flags.
    pub fn apply_membership(&mut self, fetched_for: MovieId, flags: MembershipFlags) {
        if fetched_for != self.movie_id {
            debug!(%fetched_for, showing = %self.movie_id, "discarding stale membership result");
            return;
        }
        self.membership = flags;
    }

    /// Submit the current draft as a review for this movie.
    ///
    /// On success the stored review is appended to the list and the
    /// draft resets. On any failure the draft is untouched.
    pub async fn submit_review<A: AccountService>(
        &mut self,
        account: &A,
        viewer: Option<&User>,
    ) -> Result<ReviewOutcome, CoreError> {
        if viewer.is_none() {
            debug!(movie_id = %self.movie_id, "review submission without session");
            return Ok(ReviewOutcome::AuthRequired);
        }

        let new_review = NewReview {
            movie_id: self.movie_id,
            rating: self.draft.rating(),
            text: self.draft.text().to_owned(),
        };
        match account.submit_review(new_review).await {
            Ok(stored) => {
                info!(movie_id = %self.movie_id, "review submitted");
                self.reviews.push(stored);
                self.draft.reset();
                Ok(ReviewOutcome::Submitted)
            }
            Err(e) if e.is_auth() => {
                warn!(movie_id = %self.movie_id, "session rejected during review submission");
                Ok(ReviewOutcome::AuthRequired)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Toggle this movie in or out of the viewer's watchlist.
    pub async fn toggle_watchlist<A: AccountService>(
        &mut self,
        account: &A,
        viewer: Option<&User>,
    ) -> Result<ToggleOutcome, CoreError> {
        let outcome = self
            .toggles
            .toggle(
                account,
                MembershipKind::Watchlist,
                self.movie_id,
                self.membership.in_watchlist,
                viewer,
            )
            .await?;
        if let ToggleOutcome::Applied { member } = outcome {
            self.membership.in_watchlist = member;
        }
        Ok(outcome)
    }

    /// Toggle this movie in or out of the viewer's favorites.
    pub async fn toggle_favorite<A: AccountService>(
        &mut self,
        account: &A,
        viewer: Option<&User>,
    ) -> Result<ToggleOutcome, CoreError> {
        let outcome = self
            .toggles
            .toggle(
                account,
                MembershipKind::Favorite,
                self.movie_id,
                self.membership.is_favorited,
                viewer,
            )
            .await?;
        if let ToggleOutcome::Applied { member } = outcome {
            self.membership.is_favorited = member;
        }
        Ok(outcome)
    }

    fn reset_content(&mut self) {
        self.phase = ScreenPhase::Loading;
        self.movie = None;
        self.reviews.clear();
        self.membership = MembershipFlags::default();
        self.partial_data = false;
    }
}
