use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use backoff::{future::retry, ExponentialBackoff};
use log::warn;
use crate::error::LookupFailure;

/// Retry a lookup up to `retry_times` extra times while its failure is transient
///
/// With `retry_times == 0` the lookup runs exactly once.
pub async fn retry_wrapper<I, F, Fut>(retry_times: usize, f: F) -> Result<I, LookupFailure>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<I, LookupFailure>>,
{
    let cur_times = AtomicUsize::new(0);
    retry(backoff_config(), || async {
        let prev_times = cur_times.fetch_add(1, Ordering::AcqRel);
        let times = prev_times + 1;
        if times > 1 {
            warn!("retrying for the {} time", times);
        }
        f().await
            .map_err(|err| map_to_backoff_err(err, times, retry_times))
    })
        .await
}

fn map_to_backoff_err(err: LookupFailure, cur_times: usize, max_retries: usize) -> backoff::Error<LookupFailure> {
    if cur_times > max_retries || !err.is_transient() {
        backoff::Error::permanent(err)
    } else {
        backoff::Error::transient(err)
    }
}

#[inline]
fn backoff_config() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(200),
        max_interval: Duration::from_millis(2000),
        ..Default::default()
    }
}
