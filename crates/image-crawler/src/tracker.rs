use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use url::Url;

fn key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

/// Thread-safe set of URLs seen during a crawl.
#[derive(Debug, Default)]
pub struct UniqueUris {
    seen: Mutex<HashSet<String>>,
}

impl UniqueUris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` and returns true if it had not been seen before.
    pub fn put_if_absent(&self, url: &Url) -> bool {
        self.seen.lock().insert(key(url))
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.seen.lock().contains(&key(url))
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }

    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

/// Shallowest depth at which each page has been claimed.
///
/// A page reached again at a shallower depth is claimed again, so the set
/// of pages a crawl expands is the same whichever branch gets there first.
#[derive(Debug, Default)]
pub struct PageDepths {
    best: Mutex<HashMap<String, u32>>,
}

impl PageDepths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `url` has not been claimed at `depth` or shallower.
    pub fn claim(&self, url: &Url, depth: u32) -> bool {
        match self.best.lock().entry(key(url)) {
            Entry::Vacant(entry) => {
                entry.insert(depth);
                true
            }
            Entry::Occupied(mut entry) if depth < *entry.get() => {
                entry.insert(depth);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn depth_of(&self, url: &Url) -> Option<u32> {
        self.best.lock().get(&key(url)).copied()
    }

    pub fn len(&self) -> usize {
        self.best.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.lock().is_empty()
    }
}

/// Records which (image, transform) pairs have already been produced so
/// each pair is transformed at most once.
#[derive(Debug, Default)]
pub struct TransformLedger {
    produced: Mutex<HashSet<(String, String)>>,
}

impl TransformLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the pair and returns true if nobody produced it yet.
    pub fn create_new_item(&self, image: &Url, transform: &str) -> bool {
        self.produced
            .lock()
            .insert((key(image), transform.to_string()))
    }

    pub fn len(&self) -> usize {
        self.produced.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.produced.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_put_if_absent_ignores_fragment() {
        let uris = UniqueUris::new();
        let page = Url::parse("file:///site/index.html").unwrap();
        let anchored = Url::parse("file:///site/index.html#top").unwrap();

        assert!(uris.put_if_absent(&page));
        assert!(!uris.put_if_absent(&anchored));
        assert!(uris.contains(&anchored));
        assert_eq!(uris.len(), 1);

        uris.clear();
        assert!(uris.is_empty());
    }

    #[test]
    fn test_page_depths_reclaim_only_when_shallower() {
        let depths = PageDepths::new();
        let page = Url::parse("file:///site/y.html").unwrap();

        assert!(depths.claim(&page, 2));
        assert!(!depths.claim(&page, 2));
        assert!(!depths.claim(&page, 3));
        assert!(depths.claim(&page, 1));
        assert!(!depths.claim(&Url::parse("file:///site/y.html#a").unwrap(), 2));
        assert_eq!(depths.depth_of(&page), Some(1));
        assert_eq!(depths.len(), 1);
    }

    #[test]
    fn test_ledger_claims_each_pair_once() {
        let ledger = TransformLedger::new();
        let image = Url::parse("file:///site/a.png").unwrap();

        assert!(ledger.create_new_item(&image, "identity"));
        assert!(ledger.create_new_item(&image, "invert"));
        assert!(!ledger.create_new_item(&image, "identity"));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_concurrent_claims_have_one_winner() {
        let uris = Arc::new(UniqueUris::new());
        let url = Url::parse("https://example.com/shared.html").unwrap();

        let winners: usize = (0..8)
            .map(|_| {
                let uris = uris.clone();
                let url = url.clone();
                thread::spawn(move || uris.put_if_absent(&url) as usize)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .sum();

        assert_eq!(winners, 1);
    }
}
