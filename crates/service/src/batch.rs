use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_BATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity token of one execution batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(u64);

impl BatchId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch-{}", self.0)
    }
}

#[derive(Debug)]
pub(crate) struct BatchIdentity {
    id: BatchId,
}

/// Handle to one execution batch, owned by the event source.
///
/// Identity is the token drawn at construction, never the batch content:
/// two batches running the same text in the same database are still two
/// handles. Clones refer to the same batch. Once every clone is dropped the
/// registry forgets the batch.
#[derive(Debug, Clone)]
pub struct BatchHandle {
    identity: Arc<BatchIdentity>,
}

impl BatchHandle {
    #[must_use]
    pub fn new() -> Self {
        let id = BatchId(NEXT_BATCH_ID.fetch_add(1, Ordering::Relaxed));
        Self { identity: Arc::new(BatchIdentity { id }) }
    }

    #[must_use]
    pub fn id(&self) -> BatchId {
        self.identity.id
    }

    pub(crate) fn downgrade(&self) -> Weak<BatchIdentity> {
        Arc::downgrade(&self.identity)
    }
}

impl Default for BatchHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BatchHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.identity, &other.identity)
    }
}

impl Eq for BatchHandle {}
