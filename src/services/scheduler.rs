//! Tareas periódicas del dashboard
//!
//! Cada tipo de tick tiene su propio guard: si el tick anterior sigue en
//! vuelo, el nuevo se descarta en lugar de encolarse.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Default)]
pub struct TickGuard {
    busy: Arc<AtomicBool>,
}

/// Se libera el guard al soltar el permiso
#[derive(Debug)]
pub struct TickPermit {
    busy: Arc<AtomicBool>,
}

impl TickGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<TickPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TickPermit {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for TickPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Lanzar `task` cada `period`, con un solo tick en vuelo a la vez
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, task: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let guard = TickGuard::new();

    let handle = tokio::spawn(async move {
        let mut timer = tokio::time::interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;

            let Some(permit) = guard.try_acquire() else {
                log::debug!("⏭️ Tick '{}' omitido: el anterior sigue en curso", name);
                continue;
            };

            let tick = task();
            tokio::spawn(async move {
                tick.await;
                drop(permit);
            });
        }
    });

    log::info!("⏰ Tarea periódica '{}' iniciada cada {:?}", name, period);
    handle
}
