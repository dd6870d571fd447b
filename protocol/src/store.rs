use crate::*;

/// Hosted document store the leaderboard lives in.
pub trait ScoreStore {
    type Error;

    /// Stored entry for `uid`, if the player ever submitted.
    fn fetch(&self, uid: &str) -> impl Future<Output = Result<Option<LeaderboardEntry>, Self::Error>>;

    /// Creates or overwrites the entry keyed by `entry.uid`.
    fn store(&self, entry: &LeaderboardEntry) -> impl Future<Output = Result<(), Self::Error>>;

    /// Best `limit` entries, highest score first.
    fn top(&self, limit: u32) -> impl Future<Output = Result<Vec<LeaderboardEntry>, Self::Error>>;
}

/// Records `score` for `uid`, keeping only the player's best.
///
/// Read-then-conditionally-write: nothing is written unless there is no entry yet or `score` strictly beats
/// it. Errors from either step are returned as-is and nothing is retried.
pub async fn submit_score<S: ScoreStore>(
    store: &S,
    uid: &str,
    name: &PlayerName,
    score: u32,
) -> Result<SubmitOutcome, S::Error> {
    let outcome = match store.fetch(uid).await? {
        None => SubmitOutcome::Saved,
        Some(existing) if score > existing.score => SubmitOutcome::NewHighScore,
        Some(existing) => {
            log::debug!(
                "score {} does not beat stored {} for {}",
                score,
                existing.score,
                uid
            );
            SubmitOutcome::NotHighScore
        }
    };

    if outcome.wrote() {
        let entry = LeaderboardEntry {
            uid: uid.to_string(),
            name: name.as_str().to_string(),
            score,
        };
        store.store(&entry).await?;
    }

    log::debug!("submitted {} for {}: {:?}", score, uid, outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    fn name(s: &str) -> PlayerName {
        PlayerName::parse(s).unwrap()
    }

    fn entry(uid: &str, name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            uid: uid.to_string(),
            name: name.to_string(),
            score,
        }
    }

    fn submit(store: &MemoryStore, uid: &str, who: &str, score: u32) -> Result<SubmitOutcome, MemoryStoreError> {
        submit_score(store, uid, &name(who), score)
            .now_or_never()
            .expect("memory store never blocks")
    }

    #[test]
    fn first_submission_is_saved() {
        let store = MemoryStore::new();

        assert_eq!(submit(&store, "u1", "bol", 42), Ok(SubmitOutcome::Saved));
        assert_eq!(store.get("u1"), Some(entry("u1", "bol", 42)));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn higher_score_overwrites_name_and_score() {
        let store = MemoryStore::with_entries([entry("u1", "old", 20)]);

        assert_eq!(submit(&store, "u1", "new", 21), Ok(SubmitOutcome::NewHighScore));
        assert_eq!(store.get("u1"), Some(entry("u1", "new", 21)));
    }

    #[test]
    fn lower_score_leaves_store_unchanged() {
        let store = MemoryStore::with_entries([entry("u1", "bol", 20)]);

        assert_eq!(submit(&store, "u1", "other", 10), Ok(SubmitOutcome::NotHighScore));
        assert_eq!(store.get("u1"), Some(entry("u1", "bol", 20)));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn equal_score_is_not_a_high_score() {
        let store = MemoryStore::with_entries([entry("u1", "bol", 20)]);

        assert_eq!(submit(&store, "u1", "bol", 20), Ok(SubmitOutcome::NotHighScore));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn fetch_failure_writes_nothing() {
        let store = MemoryStore::new();
        store.fail_fetches(true);

        assert_eq!(
            submit(&store, "u1", "bol", 5),
            Err(MemoryStoreError::Unavailable)
        );
        assert_eq!(store.get("u1"), None);
    }

    #[test]
    fn write_failure_is_reported() {
        let store = MemoryStore::new();
        store.fail_writes(true);

        assert_eq!(
            submit(&store, "u1", "bol", 5),
            Err(MemoryStoreError::Unavailable)
        );
        assert_eq!(store.get("u1"), None);
    }

    #[test]
    fn other_players_are_untouched() {
        let store = MemoryStore::with_entries([entry("u1", "a", 3), entry("u2", "b", 7)]);

        submit(&store, "u1", "a", 9).unwrap();

        assert_eq!(store.get("u2"), Some(entry("u2", "b", 7)));
    }
}
