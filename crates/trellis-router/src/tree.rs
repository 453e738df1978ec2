use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::debug;

use crate::resource::{Match, Resource};

/// Atomically replaceable handle to a whole resource tree
///
/// Readers [`load`](Self::load) the current root and keep matching against
/// it even if a new tree is published meanwhile. A tree is never mutated
/// once shared; reloading builds a new one and swaps it in.
#[derive(Debug)]
pub struct SharedTree {
    root: ArcSwap<Resource>,
}

impl SharedTree {
    pub fn new(root: Arc<Resource>) -> Self {
        Self {
            root: ArcSwap::new(root),
        }
    }

    /// Returns the current root
    pub fn load(&self) -> Arc<Resource> {
        self.root.load_full()
    }

    /// Publishes a new tree, returning the previous root
    pub fn replace(&self, root: Arc<Resource>) -> Arc<Resource> {
        debug!(resources = root.size(), "replacing resource tree");
        self.root.swap(root)
    }

    /// Matches a path against the current tree
    pub fn match_path(&self, path: &str) -> Match {
        self.load().match_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace() {
        let old = Resource::root();
        old.add_segment("a").unwrap();
        let shared = SharedTree::new(Arc::clone(&old));

        let loaded = shared.load();
        assert!(shared.match_path("/a").complete);

        let new = Resource::root();
        new.add_segment("b").unwrap();
        let previous = shared.replace(new);

        assert!(Arc::ptr_eq(&previous, &old));
        assert!(!shared.match_path("/a").complete);
        assert!(shared.match_path("/b").complete);
        // a reader holding the old root is unaffected
        assert!(loaded.match_path("/a").complete);
    }
}
