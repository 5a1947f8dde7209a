//! Per-document processing locks
//!
//! The queue may hold several tasks for the same document (duplicate
//! submissions, a retry racing a manual resubmit). Processing the same
//! document concurrently would double-ingest it, so each document gets an
//! async mutex that one handler holds for the duration of its attempt.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct ProcessingLocks {
    locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl ProcessingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one document, waiting if another handler holds it.
    /// The guard releases on drop.
    pub async fn acquire(&self, document_id: Uuid) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            locks.entry(document_id).or_default().clone()
        };
        entry.lock_owned().await
    }

    /// Release the lock and drop the map entry if no other handler is
    /// waiting on it, so the map does not grow with every document ever
    /// processed. Consumes the guard: the cleanup check only works once the
    /// guard's clone of the entry is gone.
    pub async fn release(&self, document_id: Uuid, guard: OwnedMutexGuard<()>) {
        drop(guard);
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(&document_id) {
            // strong count 1 means only the map itself holds the lock
            if Arc::strong_count(entry) == 1 {
                locks.remove(&document_id);
            }
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serializes_access_to_same_document() {
        let locks = ProcessingLocks::new();
        let document_id = Uuid::new_v4();

        let guard = locks.acquire(document_id).await;

        let locks_clone = locks.clone();
        let contender = tokio::spawn(async move {
            let _guard = locks_clone.acquire(document_id).await;
        });

        // Second acquire must block while the first guard lives.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_documents_do_not_contend() {
        let locks = ProcessingLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        // Acquiring a different document's lock completes immediately.
        let _b = locks.acquire(Uuid::new_v4()).await;
    }

    #[tokio::test]
    async fn release_cleans_up_entry_while_guard_is_held() {
        let locks = ProcessingLocks::new();
        let document_id = Uuid::new_v4();

        // Same order as the task handler: acquire, work, release the live guard.
        let guard = locks.acquire(document_id).await;
        assert_eq!(locks.len().await, 1);

        locks.release(document_id, guard).await;
        assert_eq!(locks.len().await, 0);
    }

    #[tokio::test]
    async fn release_keeps_entry_while_another_handler_waits() {
        let locks = ProcessingLocks::new();
        let document_id = Uuid::new_v4();

        let guard = locks.acquire(document_id).await;

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let locks_clone = locks.clone();
        let contender = tokio::spawn(async move {
            let guard = locks_clone.acquire(document_id).await;
            rx.await.unwrap();
            locks_clone.release(document_id, guard).await;
        });

        // Let the contender queue up on the entry before releasing.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        locks.release(document_id, guard).await;
        assert_eq!(locks.len().await, 1);

        tx.send(()).unwrap();
        contender.await.unwrap();
        assert_eq!(locks.len().await, 0);
    }
}
