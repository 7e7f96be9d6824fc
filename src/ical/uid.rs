use std::sync::Mutex;

/// Source of event UIDs for newly created events.
pub trait UidGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random (v4) UUIDs from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUid;

impl UidGenerator for RandomUid {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Hands out a fixed list of UIDs in order, then `uid-{n}` once exhausted.
///
/// Meant for tests and reproducible fixtures.
#[derive(Debug, Default)]
pub struct SequentialUid {
    queue: Mutex<(Vec<String>, usize)>,
}

impl SequentialUid {
    pub fn new<I, S>(uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut uids: Vec<String> = uids.into_iter().map(Into::into).collect();
        uids.reverse();
        Self {
            queue: Mutex::new((uids, 0)),
        }
    }
}

impl UidGenerator for SequentialUid {
    fn generate(&self) -> String {
        let mut guard = match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (remaining, issued) = &mut *guard;
        *issued += 1;
        remaining
            .pop()
            .unwrap_or_else(|| format!("uid-{}", *issued))
    }
}
