//! High-level design persistence on top of a [`DesignBackend`].

use super::{DesignBackend, DesignInfo, PersistenceError, PersistenceResult, now_millis};
use crate::design::Design;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Saves, loads and manages designs by name.
///
/// At most one save is in flight at a time; a second one is rejected with
/// [`PersistenceError::SaveInProgress`].
pub struct PersistenceClient<B: DesignBackend> {
    backend: Arc<B>,
    saving: AtomicBool,
}

/// Clears the in-flight flag when a save finishes, whatever the outcome.
struct SaveGuard<'a>(&'a AtomicBool);

impl<'a> SaveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: DesignBackend> PersistenceClient<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            saving: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Save a design under `name`, overwriting any previous value.
    ///
    /// Returns the stored version. An empty name is rejected before the
    /// backend is contacted.
    pub async fn save(&self, name: &str, design: &Design) -> PersistenceResult<u64> {
        let name = validate_name(name)?;
        let Some(_guard) = SaveGuard::acquire(&self.saving) else {
            log::warn!("Save of '{}' rejected: another save is in progress", name);
            return Err(PersistenceError::SaveInProgress);
        };

        let mut stamped = design.clone();
        stamped.saved_at = Some(now_millis());
        let payload = stamped
            .to_json()
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        let version = self.backend.save_design(name, &payload).await?;
        log::info!("Saved design '{}' (version {})", name, version);
        Ok(version)
    }

    /// Load a design. `None` if nothing was saved under `name`.
    pub async fn load(&self, name: &str) -> PersistenceResult<Option<Design>> {
        let name = validate_name(name)?;
        let Some(payload) = self.backend.load_design(name).await? else {
            log::info!("Design '{}' not found", name);
            return Ok(None);
        };
        let design = Design::from_json(&payload)
            .map_err(|e| PersistenceError::Serialization(format!("Failed to parse '{}': {}", name, e)))?;
        log::info!("Loaded design '{}' ({} layers, {} paths)", name, design.layers.len(), design.paths.len());
        Ok(Some(design))
    }

    /// List stored designs, sorted by name.
    pub async fn list(&self) -> PersistenceResult<Vec<DesignInfo>> {
        let mut designs = self.backend.list_designs().await?;
        designs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(designs)
    }

    /// Delete a design. Fails with `NotFound` if it does not exist.
    pub async fn delete(&self, name: &str) -> PersistenceResult<()> {
        let name = validate_name(name)?;
        if !self.backend.delete_design(name).await? {
            return Err(PersistenceError::NotFound(name.to_string()));
        }
        log::info!("Deleted design '{}'", name);
        Ok(())
    }

    /// Stored version of a design, if any.
    pub async fn version(&self, name: &str) -> PersistenceResult<Option<u64>> {
        let name = validate_name(name)?;
        self.backend.design_version(name).await
    }
}

fn validate_name(name: &str) -> PersistenceResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PersistenceError::Validation("Design name must not be empty".to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Path, Shape, ShapeKind};
    use crate::storage::{BoxFuture, MemoryBackend};
    use kurbo::{Point, Size};
    use std::future::Future;
    use std::sync::atomic::AtomicUsize;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_waker() -> Waker {
        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker { dummy_raw_waker() }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        unsafe { Waker::from_raw(dummy_raw_waker()) }
    }

    fn block_on<F: Future>(f: F) -> F::Output {
        let waker = dummy_waker();
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    /// Wraps a memory backend, counting calls and yielding once per save.
    #[derive(Default)]
    struct CountingBackend {
        inner: MemoryBackend,
        calls: AtomicUsize,
    }

    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();
        fn poll(mut self: std::pin::Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                Poll::Pending
            }
        }
    }

    impl DesignBackend for CountingBackend {
        fn save_design(&self, name: &str, payload: &str) -> BoxFuture<'_, PersistenceResult<u64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let name = name.to_string();
            let payload = payload.to_string();
            Box::pin(async move {
                YieldOnce(false).await;
                self.inner.save_design(&name, &payload).await
            })
        }

        fn load_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<String>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.load_design(name)
        }

        fn list_designs(&self) -> BoxFuture<'_, PersistenceResult<Vec<DesignInfo>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_designs()
        }

        fn delete_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<bool>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_design(name)
        }

        fn design_version(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<u64>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.design_version(name)
        }
    }

    fn sketch() -> Design {
        let mut design = Design::new();
        let layer = design.base_layer().id();
        design.add_shape(
            layer,
            Shape::new(ShapeKind::Rectangle, Point::new(50.0, 50.0), Size::new(100.0, 80.0)),
        );
        design.add_path(Path::from_points(
            layer,
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)],
        ));
        design
    }

    #[test]
    fn test_empty_name_never_reaches_backend() {
        let backend = Arc::new(CountingBackend::default());
        let client = PersistenceClient::new(backend.clone());

        let result = block_on(client.save("   ", &Design::new()));
        assert!(matches!(result, Err(PersistenceError::Validation(_))));
        assert!(matches!(block_on(client.save("", &Design::new())), Err(PersistenceError::Validation(_))));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(!client.is_saving());
    }

    #[test]
    fn test_load_missing_is_none() {
        let client = PersistenceClient::new(Arc::new(MemoryBackend::new()));
        assert!(block_on(client.load("never-saved")).unwrap().is_none());
    }

    #[test]
    fn test_round_trip_sketch() {
        let client = PersistenceClient::new(Arc::new(MemoryBackend::new()));
        let design = sketch();

        assert_eq!(block_on(client.save("sketch1", &design)).unwrap(), 1);
        let loaded = block_on(client.load("sketch1")).unwrap().unwrap();

        assert!(loaded.saved_at.is_some());
        assert_eq!(loaded.layers, design.layers);
        assert_eq!(loaded.paths, design.paths);
        assert_eq!(loaded.layers.len(), 1);
        let rect = &loaded.layers[0].shapes[0];
        assert_eq!(rect.kind, ShapeKind::Rectangle);
        assert_eq!(rect.position, Point::new(50.0, 50.0));
        assert_eq!(loaded.paths[0].points.len(), 3);
    }

    #[test]
    fn test_save_does_not_touch_the_design() {
        let client = PersistenceClient::new(Arc::new(MemoryBackend::new()));
        let design = sketch();
        block_on(client.save("a", &design)).unwrap();
        assert!(design.saved_at.is_none());
    }

    #[test]
    fn test_version_and_list() {
        let client = PersistenceClient::new(Arc::new(MemoryBackend::new()));
        block_on(client.save("zeta", &Design::new())).unwrap();
        block_on(client.save("alpha", &Design::new())).unwrap();
        assert_eq!(block_on(client.save("alpha", &Design::new())).unwrap(), 2);

        let names: Vec<_> = block_on(client.list()).unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(block_on(client.version("alpha")).unwrap(), Some(2));
        assert_eq!(block_on(client.version("missing")).unwrap(), None);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let client = PersistenceClient::new(Arc::new(MemoryBackend::new()));
        block_on(client.save("a", &Design::new())).unwrap();
        block_on(client.delete("a")).unwrap();
        assert!(matches!(block_on(client.delete("a")), Err(PersistenceError::NotFound(_))));
    }

    #[test]
    fn test_overlapping_save_rejected() {
        let backend = Arc::new(CountingBackend::default());
        let client = PersistenceClient::new(backend.clone());
        let design = sketch();

        let waker = dummy_waker();
        let mut cx = Context::from_waker(&waker);
        let mut first = std::pin::pin!(client.save("a", &design));
        assert!(first.as_mut().poll(&mut cx).is_pending());
        assert!(client.is_saving());

        let second = block_on(client.save("a", &design));
        assert!(matches!(second, Err(PersistenceError::SaveInProgress)));

        let version = loop {
            if let Poll::Ready(result) = first.as_mut().poll(&mut cx) {
                break result.unwrap();
            }
        };
        assert_eq!(version, 1);
        assert!(!client.is_saving());
        assert_eq!(block_on(client.save("a", &design)).unwrap(), 2);
    }
}
