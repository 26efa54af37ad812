use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use marquee_api::traits::AccountService;
use marquee_api::types::{MovieId, User};
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Which of the two membership collections a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipKind {
    Watchlist,
    Favorite,
}

impl MembershipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipKind::Watchlist => "watchlist",
            MembershipKind::Favorite => "favorite",
        }
    }
}

impl fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a membership toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server acknowledged the mutation; `member` is the new state.
    Applied { member: bool },
    /// No usable session; the caller should send the user to login.
    AuthRequired,
    /// A toggle for the same movie and collection is still pending; this
    /// request was dropped without contacting the server.
    InFlight,
}

/// Serializes membership mutations per (movie, collection).
///
/// The flag a toggle flips is only updated after the server acknowledges
/// the mutation, so a second toggle issued while the first is pending
/// would read the stale flag and send the wrong request. The controller
/// drops such overlapping requests instead.
#[derive(Debug, Default)]
pub struct ToggleController {
    pending: Mutex<HashSet<(MovieId, MembershipKind)>>,
}

impl ToggleController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the viewer's membership for one movie.
    ///
    /// `current` is the flag as the caller last saw it: `false` requests
    /// an addition, `true` a removal. On acknowledgment the new state is
    /// reported back as `Applied`; the caller owns flipping its flag.
    /// A rejected session yields `AuthRequired` rather than an error;
    /// redirecting to login is the caller's job.
    pub async fn toggle<A: AccountService>(
        &self,
        account: &A,
        kind: MembershipKind,
        movie_id: MovieId,
        current: bool,
        viewer: Option<&User>,
    ) -> Result<ToggleOutcome, CoreError> {
        if viewer.is_none() {
            debug!(%movie_id, %kind, "toggle without session");
            return Ok(ToggleOutcome::AuthRequired);
        }

        let Some(_slot) = self.begin(movie_id, kind) else {
            debug!(%movie_id, %kind, "toggle already in flight, dropping");
            return Ok(ToggleOutcome::InFlight);
        };

        let result = match (kind, current) {
            (MembershipKind::Watchlist, false) => account.add_to_watchlist(movie_id).await,
            (MembershipKind::Watchlist, true) => account.remove_from_watchlist(movie_id).await,
            (MembershipKind::Favorite, false) => account.add_favorite(movie_id).await,
            (MembershipKind::Favorite, true) => account.remove_favorite(movie_id).await,
        };

        match result {
            Ok(()) => {
                info!(%movie_id, %kind, member = !current, "membership updated");
                Ok(ToggleOutcome::Applied { member: !current })
            }
            Err(e) if e.is_auth() => {
                warn!(%movie_id, %kind, "session rejected during toggle");
                Ok(ToggleOutcome::AuthRequired)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn begin(&self, movie_id: MovieId, kind: MembershipKind) -> Option<InFlightSlot<'_>> {
        let mut pending = self.lock_pending();
        if !pending.insert((movie_id, kind)) {
            return None;
        }
        Some(InFlightSlot {
            controller: self,
            key: (movie_id, kind),
        })
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashSet<(MovieId, MembershipKind)>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Reservation in the pending set, released on every exit path.
struct InFlightSlot<'a> {
    controller: &'a ToggleController,
    key: (MovieId, MembershipKind),
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.controller.lock_pending().remove(&self.key);
    }
}
