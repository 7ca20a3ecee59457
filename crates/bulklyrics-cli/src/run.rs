use anyhow::Result;
use bulklyrics_doc::LyricsDocument;
use bulklyrics_fetch::Fetch;
use bulklyrics_model::{RunState, SongData};
use std::sync::atomic::{AtomicBool, Ordering};

/// What a finished (or cancelled) run hands back to the caller.
pub struct RunOutcome {
    pub state: RunState,
    /// The assembled document; `None` when the run was cancelled.
    pub document: Option<LyricsDocument>,
    /// One record per input song, in input order.
    pub songs: Vec<SongData>,
}

/// Process every song strictly sequentially: fetch, extract, append.
///
/// The cancel flag is inspected once per song boundary, never mid-fetch,
/// so a half-built record is never abandoned. With `fail_fast` a fetch
/// error aborts the batch (the original tool's behavior); otherwise the
/// failed song degrades to a not-found section and the batch completes.
pub async fn run_batch<F: Fetch>(
    fetcher: &F,
    songs: &[String],
    fail_fast: bool,
    cancel: &AtomicBool,
) -> Result<RunOutcome> {
    let mut state = RunState::Idle;
    let mut document = LyricsDocument::new();
    let mut collected = Vec::with_capacity(songs.len());

    for (i, song) in songs.iter().enumerate() {
        state = state.transition(RunState::Running { song_index: i })?;

        if cancel.load(Ordering::SeqCst) {
            state = state.transition(RunState::Cancelled)?;
            tracing::warn!(completed = i, total = songs.len(), "Run cancelled");
            return Ok(RunOutcome {
                state,
                document: None,
                songs: collected,
            });
        }

        tracing::info!(song = %song, index = i + 1, total = songs.len(), "Fetching info");

        let data = match fetcher.fetch(song).await {
            Ok(html) => bulklyrics_extract::extract(song, &html),
            Err(e) if fail_fast => return Err(e),
            Err(e) => {
                tracing::warn!(song = %song, error = %e, "Fetch failed — marking as not found");
                SongData::not_found(song, None)
            }
        };

        if data.found() {
            tracing::info!(title = %data.title, "Lyrics found");
        } else {
            tracing::info!(song = %song, fallback_link = data.link.is_some(), "Lyrics not found");
        }

        document.append_song(&data);
        collected.push(data);
    }

    state = state.transition(RunState::Finished)?;
    Ok(RunOutcome {
        state,
        document: Some(document),
        songs: collected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CannedFetcher {
        calls: AtomicUsize,
    }

    impl CannedFetcher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Fetch for CannedFetcher {
        async fn fetch(&self, query: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.contains("missing") {
                return Ok("<html><body></body></html>".to_string());
            }
            Ok(format!(
                r#"<html><body>
                <div data-attrid="title">{query}</div>
                <div data-attrid="subtitle">Song by Some Artist</div>
                <div jsname="U8S5sf"><span jsname="YS01Ge">la la la</span></div>
                </body></html>"#
            ))
        }
    }

    struct FailingFetcher;

    impl Fetch for FailingFetcher {
        async fn fetch(&self, _query: &str) -> Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_one_record_per_song_in_order() {
        let fetcher = CannedFetcher::new();
        let songs = vec![
            "first song".to_string(),
            "missing song".to_string(),
            "third song".to_string(),
        ];
        let cancel = AtomicBool::new(false);

        let outcome = run_batch(&fetcher, &songs, false, &cancel).await.unwrap();

        assert_eq!(outcome.state, RunState::Finished);
        assert_eq!(outcome.songs.len(), 3);
        assert_eq!(outcome.songs[0].title, "first song");
        assert!(!outcome.songs[1].found());
        assert_eq!(outcome.songs[1].title, "missing song");
        assert!(outcome.songs[2].found());

        let doc = outcome.document.unwrap();
        assert_eq!(doc.section_count(), 3);
        assert_eq!(doc.page_break_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_by_default() {
        let songs = vec!["a".to_string(), "b".to_string()];
        let cancel = AtomicBool::new(false);

        let outcome = run_batch(&FailingFetcher, &songs, false, &cancel)
            .await
            .unwrap();

        assert_eq!(outcome.state, RunState::Finished);
        assert_eq!(outcome.songs.len(), 2);
        assert!(outcome.songs.iter().all(|s| !s.found()));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_with_fail_fast() {
        let songs = vec!["a".to_string()];
        let cancel = AtomicBool::new(false);

        let result = run_batch(&FailingFetcher, &songs, true, &cancel).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancel_checked_at_song_boundary() {
        let fetcher = CannedFetcher::new();
        let songs = vec!["a".to_string(), "b".to_string()];
        let cancel = AtomicBool::new(true);

        let outcome = run_batch(&fetcher, &songs, false, &cancel).await.unwrap();

        assert_eq!(outcome.state, RunState::Cancelled);
        assert!(outcome.document.is_none());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
