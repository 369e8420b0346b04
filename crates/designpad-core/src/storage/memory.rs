//! In-memory design backend.

use super::{BoxFuture, DesignBackend, DesignInfo, PersistenceError, PersistenceResult, now_millis};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredDesign {
    payload: String,
    saved_at: i64,
    version: u64,
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryBackend {
    designs: RwLock<HashMap<String, StoredDesign>>,
}

impl MemoryBackend {
    /// Create a new empty memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.designs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Io(format!("Lock error: {}", e))
}

impl DesignBackend for MemoryBackend {
    fn save_design(&self, name: &str, payload: &str) -> BoxFuture<'_, PersistenceResult<u64>> {
        let name = name.to_string();
        let payload = payload.to_string();
        Box::pin(async move {
            let mut designs = self.designs.write().map_err(lock_error)?;
            let version = designs.get(&name).map_or(1, |d| d.version + 1);
            designs.insert(
                name,
                StoredDesign {
                    payload,
                    saved_at: now_millis(),
                    version,
                },
            );
            Ok(version)
        })
    }

    fn load_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<String>>> {
        let name = name.to_string();
        Box::pin(async move {
            let designs = self.designs.read().map_err(lock_error)?;
            Ok(designs.get(&name).map(|d| d.payload.clone()))
        })
    }

    fn list_designs(&self) -> BoxFuture<'_, PersistenceResult<Vec<DesignInfo>>> {
        Box::pin(async move {
            let designs = self.designs.read().map_err(lock_error)?;
            Ok(designs
                .iter()
                .map(|(name, d)| DesignInfo {
                    name: name.clone(),
                    saved_at: d.saved_at,
                    version: d.version,
                })
                .collect())
        })
    }

    fn delete_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<bool>> {
        let name = name.to_string();
        Box::pin(async move {
            let mut designs = self.designs.write().map_err(lock_error)?;
            Ok(designs.remove(&name).is_some())
        })
    }

    fn design_version(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<u64>>> {
        let name = name.to_string();
        Box::pin(async move {
            let designs = self.designs.read().map_err(lock_error)?;
            Ok(designs.get(&name).map(|d| d.version))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        // Simple blocking executor for tests
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    #[test]
    fn test_save_and_load() {
        let backend = MemoryBackend::new();
        assert_eq!(block_on(backend.save_design("a", "{}")).unwrap(), 1);
        assert_eq!(block_on(backend.load_design("a")).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_missing_is_none() {
        let backend = MemoryBackend::new();
        assert_eq!(block_on(backend.load_design("nope")).unwrap(), None);
        assert_eq!(block_on(backend.design_version("nope")).unwrap(), None);
    }

    #[test]
    fn test_overwrite_bumps_version() {
        let backend = MemoryBackend::new();
        block_on(backend.save_design("a", "1")).unwrap();
        assert_eq!(block_on(backend.save_design("a", "2")).unwrap(), 2);
        assert_eq!(block_on(backend.design_version("a")).unwrap(), Some(2));
        assert_eq!(block_on(backend.load_design("a")).unwrap().as_deref(), Some("2"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_delete() {
        let backend = MemoryBackend::new();
        block_on(backend.save_design("a", "{}")).unwrap();
        assert!(block_on(backend.delete_design("a")).unwrap());
        assert!(!block_on(backend.delete_design("a")).unwrap());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_list() {
        let backend = MemoryBackend::new();
        block_on(backend.save_design("one", "{}")).unwrap();
        block_on(backend.save_design("two", "{}")).unwrap();
        block_on(backend.save_design("two", "{}")).unwrap();

        let mut list = block_on(backend.list_designs()).unwrap();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "one");
        assert_eq!(list[1].version, 2);
    }
}
