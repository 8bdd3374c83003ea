//! The crawl frontier: pending queue plus seen-set
//!
//! This is the single piece of mutable state shared by all workers, so
//! everything lives behind one mutex: the pending queue, the seen-set,
//! and the in-flight count are always mutated together. The load-bearing
//! invariant is at-most-once dispatch per normalized URL: a URL enters
//! the seen-set in the same critical section that enqueues it, so two
//! workers discovering the same link concurrently can never both enqueue
//! it, and a dequeued entry goes to exactly one worker.
//!
//! Workers park on a [`Notify`] while the queue is empty. The run is over
//! when the queue is empty with nothing in flight (no worker can produce
//! new entries), or when the cancel flag is raised; either way every
//! parked worker wakes and observes `None`.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::Notify;
use url::Url;

/// One unit of crawl work: a normalized URL and its link depth
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

#[derive(Debug, Default)]
struct FrontierInner {
    queue: VecDeque<FrontierEntry>,
    seen: HashSet<String>,
    in_flight: usize,
    cancelled: bool,
}

/// Deduplicating work queue shared by the crawl workers
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
    notify: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks the seen-set and enqueues the URL if it is new.
    ///
    /// Returns false if the URL was already seen (enqueued, dispatched,
    /// or claimed) or the frontier is cancelled.
    pub fn enqueue(&self, url: &Url, depth: u32) -> bool {
        let mut inner = self.inner.lock().unwrap();

        if inner.cancelled {
            return false;
        }
        if !inner.seen.insert(url.as_str().to_string()) {
            return false;
        }

        inner.queue.push_back(FrontierEntry {
            url: url.clone(),
            depth,
        });
        drop(inner);

        self.notify.notify_one();
        true
    }

    /// Marks a URL as seen without queueing it.
    ///
    /// Used for work dispatched outside the page queue (PDF documents),
    /// so the same document linked from many pages is ingested once.
    pub fn claim(&self, url: &Url) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.seen.insert(url.as_str().to_string())
    }

    /// Takes the next entry, waiting until one is available.
    ///
    /// Returns `None` when the frontier is drained (empty queue, nothing
    /// in flight) or cancelled. A returned entry counts as in-flight
    /// until the worker calls [`Frontier::task_done`].
    pub async fn next_entry(&self) -> Option<FrontierEntry> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register for wakeups before checking state, otherwise a
            // notify between the check and the await is lost and a worker
            // parks forever.
            notified.as_mut().enable();

            {
                let mut inner = self.inner.lock().unwrap();

                if inner.cancelled {
                    return None;
                }

                if let Some(entry) = inner.queue.pop_front() {
                    inner.in_flight += 1;
                    return Some(entry);
                }

                if inner.in_flight == 0 {
                    drop(inner);
                    // Drained. Wake the other parked workers so they
                    // observe it too.
                    self.notify.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks one in-flight entry as finished.
    pub fn task_done(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        let drained = inner.in_flight == 0 && inner.queue.is_empty();
        drop(inner);

        if drained {
            self.notify.notify_waiters();
        }
    }

    /// Raises the cooperative cancel flag.
    ///
    /// No new entries are dispatched or accepted afterwards; entries
    /// already handed to workers run to completion.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.cancelled = true;
        drop(inner);

        self.notify.notify_waiters();
    }

    /// True once [`Frontier::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().unwrap().cancelled
    }

    /// Number of distinct normalized URLs seen so far.
    pub fn seen_count(&self) -> usize {
        self.inner.lock().unwrap().seen.len()
    }

    /// Number of entries waiting in the queue.
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_enqueue_dedups_by_url() {
        let frontier = Frontier::new();
        assert!(frontier.enqueue(&url("https://example.com/a"), 0));
        assert!(!frontier.enqueue(&url("https://example.com/a"), 1));
        assert_eq!(frontier.pending(), 1);
        assert_eq!(frontier.seen_count(), 1);
    }

    #[test]
    fn test_claim_blocks_later_enqueue() {
        let frontier = Frontier::new();
        assert!(frontier.claim(&url("https://example.com/doc.pdf")));
        assert!(!frontier.claim(&url("https://example.com/doc.pdf")));
        assert!(!frontier.enqueue(&url("https://example.com/doc.pdf"), 0));
    }

    #[tokio::test]
    async fn test_entries_dispatched_in_order() {
        let frontier = Frontier::new();
        frontier.enqueue(&url("https://example.com/a"), 0);
        frontier.enqueue(&url("https://example.com/b"), 1);

        let first = frontier.next_entry().await.unwrap();
        assert_eq!(first.url.as_str(), "https://example.com/a");
        assert_eq!(first.depth, 0);

        let second = frontier.next_entry().await.unwrap();
        assert_eq!(second.url.as_str(), "https://example.com/b");
        assert_eq!(second.depth, 1);
    }

    #[tokio::test]
    async fn test_empty_frontier_returns_none() {
        let frontier = Frontier::new();
        assert!(frontier.next_entry().await.is_none());
    }

    #[tokio::test]
    async fn test_drain_wakes_parked_worker() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue(&url("https://example.com/only"), 0);

        let entry = frontier.next_entry().await.unwrap();

        // A second worker parks: the queue is empty but the first entry
        // is still in flight and could produce more work.
        let parked = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.next_entry().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!parked.is_finished());

        // Finishing the entry without enqueueing drains the frontier.
        drop(entry);
        frontier.task_done();

        let result = tokio::time::timeout(Duration::from_secs(1), parked)
            .await
            .expect("parked worker should wake")
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_cancel_wakes_parked_worker() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue(&url("https://example.com/busy"), 0);
        let _entry = frontier.next_entry().await.unwrap();

        let parked = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.next_entry().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        frontier.cancel();

        let result = tokio::time::timeout(Duration::from_secs(1), parked)
            .await
            .expect("cancelled worker should wake")
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_no_enqueue_after_cancel() {
        let frontier = Frontier::new();
        frontier.cancel();
        assert!(!frontier.enqueue(&url("https://example.com/late"), 0));
        assert_eq!(frontier.pending(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_producers_dedup() {
        let frontier = Arc::new(Frontier::new());

        // Many producers racing to enqueue the same small URL set: the
        // seen-set must admit each URL exactly once.
        let mut handles = Vec::new();
        for _ in 0..8 {
            let frontier = Arc::clone(&frontier);
            handles.push(tokio::spawn(async move {
                let mut admitted = 0;
                for i in 0..20 {
                    let target = url(&format!("https://example.com/page/{}", i));
                    if frontier.enqueue(&target, 1) {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let mut total_admitted = 0;
        for handle in handles {
            total_admitted += handle.await.unwrap();
        }

        assert_eq!(total_admitted, 20);
        assert_eq!(frontier.pending(), 20);
        assert_eq!(frontier.seen_count(), 20);
    }
}
