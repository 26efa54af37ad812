use futures::join;
use marquee_api::traits::AccountService;
use marquee_api::types::{ListEntry, MovieId, User};
use marquee_api::ApiResult;
use tracing::{debug, warn};

/// Where one movie stands in the viewer's collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MembershipFlags {
    pub in_watchlist: bool,
    pub is_favorited: bool,
}

/// Resolve the viewer's relationship to one movie.
///
/// Signed-out viewers get both flags false with zero network traffic.
/// For signed-in viewers the two collection fetches run concurrently and
/// degrade independently: a failed or malformed collection resolves to
/// "not a member" with a warning, never an error. Membership is
/// decoration on the detail screen and must not block it.
pub async fn resolve_membership<A: AccountService>(
    account: &A,
    movie_id: MovieId,
    viewer: Option<&User>,
) -> MembershipFlags {
    if viewer.is_none() {
        debug!(%movie_id, "membership skipped without session");
        return MembershipFlags::default();
    }

    let (watchlist, favorites) = join!(account.watchlist(), account.favorites());
    MembershipFlags {
        in_watchlist: contains_movie("watchlist", watchlist, movie_id),
        is_favorited: contains_movie("favorites", favorites, movie_id),
    }
}

fn contains_movie(
    collection: &str,
    fetched: ApiResult<Vec<ListEntry>>,
    movie_id: MovieId,
) -> bool {
    match fetched {
        Ok(entries) => entries.iter().any(|entry| entry.movie.id == movie_id),
        Err(e) => {
            warn!(collection, %movie_id, error = %e, "membership lookup failed, treating as absent");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entry, user, Canned, FakeAccount};

    #[tokio::test]
    async fn test_signed_out_viewer_resolves_without_requests() {
        let account = FakeAccount::default();

        let flags = resolve_membership(&account, MovieId(3), None).await;

        assert_eq!(flags, MembershipFlags::default());
        assert_eq!(account.calls.total(), 0);
    }

    #[tokio::test]
    async fn test_absent_movie_resolves_false() {
        let account = FakeAccount {
            watchlist: Canned::Ok(vec![entry(5, "Heat")]),
            favorites: Canned::Ok(vec![entry(8, "Ran")]),
            ..FakeAccount::default()
        };
        let viewer = user();

        let flags = resolve_membership(&account, MovieId(3), Some(&viewer)).await;

        assert!(!flags.in_watchlist);
        assert!(!flags.is_favorited);
        assert_eq!(account.calls.watchlist_fetches(), 1);
        assert_eq!(account.calls.favorites_fetches(), 1);
    }

    #[tokio::test]
    async fn test_flags_resolved_independently() {
        let account = FakeAccount {
            watchlist: Canned::Ok(vec![entry(5, "Heat")]),
            favorites: Canned::Ok(vec![entry(5, "Heat"), entry(9, "Alien")]),
            ..FakeAccount::default()
        };
        let viewer = user();

        let flags = resolve_membership(&account, MovieId(9), Some(&viewer)).await;

        assert!(!flags.in_watchlist);
        assert!(flags.is_favorited);
    }

    #[tokio::test]
    async fn test_failed_collection_degrades_only_its_flag() {
        let account = FakeAccount {
            watchlist: Canned::ServerError,
            favorites: Canned::Ok(vec![entry(9, "Alien")]),
            ..FakeAccount::default()
        };
        let viewer = user();

        let flags = resolve_membership(&account, MovieId(9), Some(&viewer)).await;

        assert!(!flags.in_watchlist);
        assert!(flags.is_favorited);
    }

    #[tokio::test]
    async fn test_malformed_collection_treated_as_absent() {
        let account = FakeAccount {
            watchlist: Canned::Malformed,
            favorites: Canned::Malformed,
            ..FakeAccount::default()
        };
        let viewer = user();

        let flags = resolve_membership(&account, MovieId(9), Some(&viewer)).await;

        assert_eq!(flags, MembershipFlags::default());
    }

    #[tokio::test]
    async fn test_expired_session_resolves_absent() {
        let account = FakeAccount {
            watchlist: Canned::AuthRejected,
            favorites: Canned::AuthRejected,
            ..FakeAccount::default()
        };
        let viewer = user();

        let flags = resolve_membership(&account, MovieId(9), Some(&viewer)).await;

        assert_eq!(flags, MembershipFlags::default());
    }
}
