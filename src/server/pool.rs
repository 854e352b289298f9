//! # Pool de Workers
//! src/server/pool.rs
//!
//! Número fijo de threads que consumen de una cola acotada
//! (`mpsc::sync_channel`). `try_submit` nunca bloquea: si la cola está
//! llena retorna el item al llamador para que decida qué hacer con él.
//!
//! ```text
//! acceptor ──try_submit──▶ [ cola (capacity) ] ──recv──▶ worker-0..N
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Razón por la que `try_submit` rechazó un item
#[derive(Debug)]
pub enum SubmitError<T> {
    /// La cola está llena; se devuelve el item
    Full(T),

    /// Todos los workers terminaron
    Closed(T),
}

/// Pool de threads con cola acotada
pub struct WorkerPool<T: Send + 'static> {
    sender: Option<SyncSender<T>>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Crea `size` workers que ejecutan `job` sobre cada item recibido.
    ///
    /// Los threads se llaman `<name>-<i>`.
    pub fn new<F>(name: &str, size: usize, capacity: usize, job: F) -> std::io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let job = Arc::new(job);

        let mut workers = Vec::with_capacity(size);
        for i in 0..size {
            let receiver = Arc::clone(&receiver);
            let job = Arc::clone(&job);

            let handle = thread::Builder::new()
                .name(format!("{}-{}", name, i))
                .spawn(move || Self::worker_loop(receiver, job))?;
            workers.push(handle);
        }

        tracing::debug!(pool = name, size, capacity, "Worker pool started");

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    fn worker_loop<F>(receiver: Arc<Mutex<Receiver<T>>>, job: Arc<F>)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        loop {
            // El lock solo se mantiene mientras se espera el siguiente item
            let item = {
                let receiver = receiver.lock().unwrap_or_else(PoisonError::into_inner);
                receiver.recv()
            };

            let Ok(item) = item else {
                // Canal cerrado: el pool se está destruyendo
                break;
            };

            if panic::catch_unwind(AssertUnwindSafe(|| job(item))).is_err() {
                tracing::error!("Worker job panicked; worker keeps running");
            }
        }
    }

    /// Encola un item sin bloquear
    pub fn try_submit(&self, item: T) -> Result<(), SubmitError<T>> {
        let Some(sender) = &self.sender else {
            return Err(SubmitError::Closed(item));
        };

        sender.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) => SubmitError::Full(item),
            TrySendError::Disconnected(item) => SubmitError::Closed(item),
        })
    }

    /// Número de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        // Cerrar el canal despierta a los workers con Err en recv()
        drop(self.sender.take());

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
