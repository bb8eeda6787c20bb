//! Bounded worker-pool bridge between async handlers and blocking stores

use std::sync::Arc;

use pictor_core::AppError;
use tokio::sync::Semaphore;

/// Runs blocking catalog calls on the blocking thread pool, capped by a
/// semaphore sized independently of the request-handling runtime.
///
/// The cap keeps a burst of requests from parking more blocking threads than
/// the connection pool can serve. Callers queue on the semaphore instead.
#[derive(Clone)]
pub struct CatalogBridge {
    limiter: Arc<Semaphore>,
}

impl CatalogBridge {
    pub fn new(max_workers: usize) -> Self {
        Self {
            limiter: Arc::new(Semaphore::new(max_workers)),
        }
    }

    /// Run a blocking store call, resolving once it completes.
    ///
    /// The closure must return owned data; anything lazily backed by the
    /// store has to be realized before it crosses back to async code.
    pub async fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, AppError> + Send + 'static,
    {
        let permit = self
            .limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::Internal(format!("Catalog worker pool closed: {}", e)))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            op()
        })
        .await
        .map_err(|e| AppError::Internal(format!("Catalog worker task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_returns_closure_result() {
        let bridge = CatalogBridge::new(2);

        let value = bridge.run(|| Ok(41 + 1)).await.unwrap();

        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_run_propagates_store_errors() {
        let bridge = CatalogBridge::new(2);

        let result: Result<(), AppError> = bridge
            .run(|| Err(AppError::Catalog("connection refused".to_string())))
            .await;

        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded_by_worker_count() {
        let bridge = CatalogBridge::new(2);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let op = |in_flight: Arc<AtomicUsize>, peak: Arc<AtomicUsize>| move || {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(50));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        };

        let (a, b, c, d) = tokio::join!(
            bridge.run(op(in_flight.clone(), peak.clone())),
            bridge.run(op(in_flight.clone(), peak.clone())),
            bridge.run(op(in_flight.clone(), peak.clone())),
            bridge.run(op(in_flight.clone(), peak.clone())),
        );

        a.unwrap();
        b.unwrap();
        c.unwrap();
        d.unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }
}
