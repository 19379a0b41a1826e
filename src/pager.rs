use std::future::Future;

use crate::clients::errors::Result;
use crate::retry::Retrier;

/// Position of the next page. Opaque to the walker; the Spotify client
/// interprets it as an item offset.
pub type Cursor = u32;

/// One batch of items plus the position of the batch after it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage<T> {
    pub items: Vec<T>,
    pub next: Option<Cursor>,
}

/// What a walk produced.
///
/// `aborted` is true only when the very first fetch never yielded a page,
/// i.e. the resource could not be read at all. A failure later in the walk
/// keeps the items gathered so far and counts as normal exhaustion.
#[derive(Debug)]
pub struct Walk<T> {
    pub items: Vec<T>,
    pub aborted: bool,
}

/// Follows `next` cursors across a paged resource until it is exhausted.
///
/// Every page fetch goes through the [`Retrier`], so a page that fails all
/// its attempts ends the walk instead of erroring out of it.
pub struct PageWalker<'a> {
    retrier: &'a Retrier,
}

impl<'a> PageWalker<'a> {
    #[must_use]
    pub fn new(retrier: &'a Retrier) -> Self {
        Self { retrier }
    }

    /// Collect every item of the paged resource, in server order.
    ///
    /// `fetch` is called with `None` for the first page and with the
    /// previous page's `next` cursor afterwards.
    pub async fn collect<T, F, Fut>(&self, what: &str, mut fetch: F) -> Walk<T>
    where
        F: FnMut(Option<Cursor>) -> Fut,
        Fut: Future<Output = Result<RawPage<T>>>,
    {
        let mut items = Vec::new();
        let mut cursor: Option<Cursor> = None;
        let mut first = true;
        loop {
            match self.retrier.call(what, || fetch(cursor)).await {
                None => {
                    return Walk {
                        items,
                        aborted: first,
                    };
                }
                Some(page) => {
                    first = false;
                    items.extend(page.items);
                    match page.next {
                        Some(next) => cursor = Some(next),
                        None => return Walk {
                            items,
                            aborted: false,
                        },
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::errors::Error;
    use crate::retry::RetryPolicy;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> Error {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "timed out",
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn yields_all_pages_in_order() {
        let retrier = Retrier::new(RetryPolicy::default());
        let walker = PageWalker::new(&retrier);
        let walk = walker
            .collect("pages", |cursor| async move {
                Ok(match cursor {
                    None => RawPage {
                        items: vec![1, 2],
                        next: Some(2),
                    },
                    Some(2) => RawPage {
                        items: vec![3],
                        next: Some(3),
                    },
                    Some(3) => RawPage {
                        items: vec![4, 5],
                        next: None,
                    },
                    Some(other) => panic!("unexpected cursor {other}"),
                })
            })
            .await;
        assert!(!walk.aborted);
        assert_eq!(walk.items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_failure_aborts_with_no_items() {
        let retrier = Retrier::new(RetryPolicy {
            max_attempts: 2,
            ..RetryPolicy::default()
        });
        let walker = PageWalker::new(&retrier);
        let calls = AtomicU32::new(0);
        let walk: Walk<i32> = walker
            .collect("pages", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;
        assert!(walk.aborted);
        assert!(walk.items.is_empty());
        // The first page spent the whole retry budget.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn later_failure_keeps_items_already_fetched() {
        let retrier = Retrier::new(RetryPolicy {
            max_attempts: 2,
            ..RetryPolicy::default()
        });
        let walker = PageWalker::new(&retrier);
        let walk = walker
            .collect("pages", |cursor| async move {
                match cursor {
                    None => Ok(RawPage {
                        items: vec!["a", "b"],
                        next: Some(2),
                    }),
                    Some(_) => Err(transient()),
                }
            })
            .await;
        assert!(!walk.aborted);
        assert_eq!(walk.items, vec!["a", "b"]);
    }
}
