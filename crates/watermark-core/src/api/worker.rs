//! Runs watermark requests off the calling thread and reports their outcome
//! exactly once.

use log::{debug, error};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::WatermarkError;
use crate::result::Result;

/// threads of the pool shared by all requests that bring no pool of their own
pub const DEFAULT_WORKER_THREADS: usize = 2;

/// Receives the outcome of a request, exactly one of the two methods is
/// called exactly once.
pub trait WatermarkListener<T>: Send + 'static {
    fn on_success(&self, output: T);

    fn on_failure(&self, reason: String);
}

/// for callers that only [`RequestHandle::wait`]
impl<T> WatermarkListener<T> for () {
    fn on_success(&self, _: T) {}

    fn on_failure(&self, _: String) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Configured,
    Running,
    Succeeded,
    Failed,
}

pub struct WorkerPool {
    pool: ThreadPool,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

static SHARED_POOL: OnceLock<Arc<WorkerPool>> = OnceLock::new();

impl WorkerPool {
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("watermark-worker-{i}"))
            .build()
            .map_err(|e| WatermarkError::WorkerUnavailable(e.to_string()))?;

        Ok(Self { pool })
    }

    /// the pool used when a request is not given one
    pub fn shared() -> Result<Arc<WorkerPool>> {
        if let Some(pool) = SHARED_POOL.get() {
            return Ok(pool.clone());
        }
        let pool = Arc::new(Self::with_threads(DEFAULT_WORKER_THREADS)?);

        Ok(SHARED_POOL.get_or_init(|| pool).clone())
    }

    /// Runs `task` on the pool, its result goes to `listener` and to the returned handle.
    pub fn submit<T, F, L>(&self, task: F, listener: L) -> RequestHandle<T>
    where
        T: Clone + Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
        L: WatermarkListener<T>,
    {
        let (completion, handle) = Completion::new(listener);
        self.pool.spawn(move || {
            completion.start();
            let result = panic::catch_unwind(AssertUnwindSafe(task)).unwrap_or_else(|_| {
                error!("a watermark request panicked");
                Err(WatermarkError::WorkerUnavailable(
                    "the request panicked".to_string(),
                ))
            });
            completion.complete(result);
        });

        handle
    }
}

/// Submits to `pool` or the shared pool. Without any pool the request fails right away.
pub(crate) fn dispatch<T, F, L>(
    pool: Option<&Arc<WorkerPool>>,
    task: F,
    listener: L,
) -> RequestHandle<T>
where
    T: Clone + Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
    L: WatermarkListener<T>,
{
    let pool = match pool {
        Some(pool) => Ok(pool.clone()),
        None => WorkerPool::shared(),
    };
    match pool {
        Ok(pool) => pool.submit(task, listener),
        Err(e) => {
            let (completion, handle) = Completion::new(listener);
            completion.complete(Err(e));
            handle
        }
    }
}

/// The single writer of a request outcome. Completing consumes it, so a
/// request cannot report twice.
pub struct Completion<T, L: WatermarkListener<T>> {
    listener: L,
    state: Arc<Mutex<RequestState>>,
    sender: Sender<Result<T>>,
}

impl<T, L> Completion<T, L>
where
    T: Clone + Send + 'static,
    L: WatermarkListener<T>,
{
    pub fn new(listener: L) -> (Self, RequestHandle<T>) {
        let state = Arc::new(Mutex::new(RequestState::Configured));
        let (sender, receiver) = mpsc::channel();
        let completion = Self {
            listener,
            state: state.clone(),
            sender,
        };
        let handle = RequestHandle { state, receiver };

        (completion, handle)
    }

    fn start(&self) {
        set_state(&self.state, RequestState::Running);
    }

    /// Notifies the listener first, then the handle.
    pub fn complete(self, result: Result<T>) {
        match &result {
            Ok(output) => {
                debug!("request succeeded");
                self.listener.on_success(output.clone());
                set_state(&self.state, RequestState::Succeeded);
            }
            Err(e) => {
                error!("request failed: {e}");
                self.listener.on_failure(e.to_string());
                set_state(&self.state, RequestState::Failed);
            }
        }
        // nobody waits when the handle was dropped
        let _ = self.sender.send(result);
    }
}

fn set_state(state: &Mutex<RequestState>, next: RequestState) {
    match state.lock() {
        Ok(mut s) => *s = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}

/// The caller side of a request
#[derive(Debug)]
pub struct RequestHandle<T> {
    state: Arc<Mutex<RequestState>>,
    receiver: Receiver<Result<T>>,
}

impl<T> RequestHandle<T> {
    pub fn state(&self) -> RequestState {
        match self.state.lock() {
            Ok(s) => *s,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// blocks until the request finished and returns what the listener got
    pub fn wait(self) -> Result<T> {
        self.receiver.recv().map_err(|_| {
            WatermarkError::WorkerUnavailable("the request ended without a result".into())
        })?
    }
}

/// Cooperative cancellation, checked between work items
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// remembers every call it receives
    pub struct RecordingListener<T> {
        pub successes: Arc<Mutex<Vec<T>>>,
        pub failures: Arc<Mutex<Vec<String>>>,
    }

    impl<T> Clone for RecordingListener<T> {
        fn clone(&self) -> Self {
            Self {
                successes: self.successes.clone(),
                failures: self.failures.clone(),
            }
        }
    }

    impl<T> RecordingListener<T> {
        pub fn new() -> Self {
            Self {
                successes: Arc::new(Mutex::new(Vec::new())),
                failures: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn calls(&self) -> usize {
            self.successes.lock().unwrap().len() + self.failures.lock().unwrap().len()
        }
    }

    impl<T: Send + 'static> WatermarkListener<T> for RecordingListener<T> {
        fn on_success(&self, output: T) {
            self.successes.lock().unwrap().push(output);
        }

        fn on_failure(&self, reason: String) {
            self.failures.lock().unwrap().push(reason);
        }
    }

    #[test]
    fn should_report_success_once() {
        let pool = WorkerPool::with_threads(1).unwrap();
        let listener = RecordingListener::new();

        let handle = pool.submit(|| Ok(42), listener.clone());
        assert_eq!(handle.wait().unwrap(), 42);

        assert_eq!(listener.calls(), 1);
        assert_eq!(*listener.successes.lock().unwrap(), vec![42]);
    }

    #[test]
    fn should_report_failure_once_with_the_reason() {
        let pool = WorkerPool::with_threads(1).unwrap();
        let listener = RecordingListener::<u8>::new();

        let handle = pool.submit(|| Err(WatermarkError::MarkersNotFound), listener.clone());
        let result = handle.wait();

        assert!(matches!(result, Err(WatermarkError::MarkersNotFound)));
        assert_eq!(listener.calls(), 1);
        assert_eq!(
            *listener.failures.lock().unwrap(),
            vec!["No watermark found".to_string()]
        );
    }

    #[test]
    fn should_report_a_panicking_task_as_failure() {
        let pool = WorkerPool::with_threads(1).unwrap();
        let listener = RecordingListener::<u8>::new();

        let handle = pool.submit(|| -> Result<u8> { panic!("boom") }, listener.clone());
        let result = handle.wait();

        assert!(matches!(result, Err(WatermarkError::WorkerUnavailable(_))));
        assert_eq!(listener.calls(), 1);
        assert_eq!(listener.failures.lock().unwrap().len(), 1);

        // the worker thread is still usable
        assert_eq!(pool.submit(|| Ok(7), ()).wait().unwrap(), 7);
    }

    #[test]
    fn should_move_through_the_states() {
        let pool = WorkerPool::with_threads(1).unwrap();
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel::<()>();

        let handle = pool.submit(
            move || {
                started_tx.send(()).unwrap();
                gate_rx.recv().unwrap();
                Ok(())
            },
            (),
        );
        started_rx.recv().unwrap();
        assert_eq!(handle.state(), RequestState::Running);
        gate_tx.send(()).unwrap();

        let (completion, handle) = Completion::<u8, ()>::new(());
        assert_eq!(handle.state(), RequestState::Configured);
        completion.complete(Err(WatermarkError::MarkersNotFound));
        assert_eq!(handle.state(), RequestState::Failed);
    }

    #[test]
    fn should_succeed_in_the_final_state() {
        let pool = WorkerPool::with_threads(1).unwrap();
        let handle = pool.submit(|| Ok("done"), ());
        let state = handle.state.clone();

        assert_eq!(handle.wait().unwrap(), "done");
        assert_eq!(*state.lock().unwrap(), RequestState::Succeeded);
    }

    #[test]
    fn should_share_one_pool() {
        let a = WorkerPool::shared().unwrap();
        let b = WorkerPool::shared().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn should_remember_a_cancellation() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        clone.cancel();
        assert!(token.is_cancelled());
    }
}
