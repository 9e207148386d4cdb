//! First-success race over a privilege group

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// Race a set of per-name checks: the first to settle successfully wins;
/// when every check fails, the last settled failure is reported.
///
/// Returns `None` for an empty set. The race is polled within the calling
/// task — cooperative scheduling, no spawned threads — and dropping it
/// cancels in-flight losers.
pub(crate) async fn first_success<F, T, E>(checks: impl IntoIterator<Item = F>) -> Option<Result<T, E>>
where
    F: Future<Output = Result<T, E>>,
{
    let mut pending: FuturesUnordered<F> = checks.into_iter().collect();
    let mut last_failure = None;

    while let Some(outcome) = pending.next().await {
        match outcome {
            Ok(value) => return Some(Ok(value)),
            Err(failure) => last_failure = Some(failure),
        }
    }

    last_failure.map(Err)
}
