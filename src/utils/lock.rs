//! Lock global de mutaciones
//!
//! Una única puerta de exclusión mutua para todo el conjunto de recursos
//! vehicle/coordinates. Toda mutación (create, update, delete, import)
//! la mantiene durante su sección crítica completa; las lecturas nunca la
//! adquieren. Solo los puntos de entrada HTTP y la tarea de importación
//! adquieren el lock: los servicios nunca lo hacen, así que la adquisición
//! anidada no ocurre y no hace falta un mutex reentrante con contador.

use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Handle clonable sobre el lock de mutaciones del proceso.
///
/// Es un valor explícito que vive en el estado compartido, no un global
/// ambiental: se puede sustituir por locks por recurso sin tocar los
/// call sites.
#[derive(Clone)]
pub struct ResourceLock {
    inner: Arc<Mutex<()>>,
}

impl ResourceLock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(())),
        }
    }

    /// Adquiere el lock, esperando indefinidamente si está ocupado.
    /// El guard es owned para poder moverlo a tareas spawneadas
    /// (la importación lo retiene durante decode + validate + commit).
    pub async fn acquire(&self) -> OwnedMutexGuard<()> {
        self.inner.clone().lock_owned().await
    }
}

impl Default for ResourceLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn guard_serializes_concurrent_tasks() {
        let lock = ResourceLock::new();
        let in_section = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let lock = lock.clone();
            let in_section = in_section.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = lock.acquire().await;
                let now = in_section.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(2)).await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn guard_release_unblocks_waiters() {
        let lock = ResourceLock::new();
        let guard = lock.acquire().await;

        let lock2 = lock.clone();
        let waiter = tokio::spawn(async move {
            let _guard = lock2.acquire().await;
        });

        drop(guard);
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("waiter should acquire the lock after release")
            .unwrap();
    }
}
