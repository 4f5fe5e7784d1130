//! A small persistent worker pool for the per-row cost relaxation.
//!
//! A FIFO job queue guarded by one mutex and two condvars: workers block
//! on `work_available` when idle, and `wait()` blocks on `all_done` until
//! the queue has drained and no job is mid-flight. Threads are spawned
//! once at pool construction and parked for the life of the pool, rather
//! than spun up per column.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send>;

struct Shared {
    queue: Mutex<Inner>,
    work_available: Condvar,
    all_done: Condvar,
}

struct Inner {
    queue: VecDeque<Job>,
    pending: u32,
    quit: bool,
}

pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool with `threads` workers (0 means "use available
    /// parallelism").
    pub fn new(threads: u32) -> Self {
        let n = if threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1) as u32
        } else {
            threads
        };
        tracing::debug!(workers = n, "spawning worker pool");

        let shared = Arc::new(Shared {
            queue: Mutex::new(Inner {
                queue: VecDeque::new(),
                pending: 0,
                quit: false,
            }),
            work_available: Condvar::new(),
            all_done: Condvar::new(),
        });

        let workers = (0..n)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || worker_loop(shared))
            })
            .collect();

        Self { shared, workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Submit a job to the queue. The caller must call `wait()` before
    /// any data the job borrows goes out of scope: the pool runs jobs on
    /// other threads with no lifetime tracking of its own, the same
    /// contract a raw callback queue would have.
    ///
    /// # Safety
    /// `job` must remain valid (any data it references must outlive the
    /// following `wait()` call).
    pub unsafe fn run<'env>(&self, job: Box<dyn FnOnce() + Send + 'env>) {
        let job: Job = std::mem::transmute::<Box<dyn FnOnce() + Send + 'env>, Job>(job);
        let mut inner = self.shared.queue.lock().unwrap();
        inner.queue.push_back(job);
        self.shared.work_available.notify_one();
    }

    /// Block until every submitted job has finished.
    pub fn wait(&self) {
        let inner = self.shared.queue.lock().unwrap();
        let _inner = self
            .shared
            .all_done
            .wait_while(inner, |inner| !inner.queue.is_empty() || inner.pending > 0)
            .unwrap();
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let mut inner = shared.queue.lock().unwrap();
        loop {
            if inner.quit {
                return;
            }
            if let Some(job) = inner.queue.pop_front() {
                inner.pending += 1;
                drop(inner);
                job();
                inner = shared.queue.lock().unwrap();
                inner.pending -= 1;
                shared.all_done.notify_all();
                break;
            }
            inner = shared.work_available.wait(inner).unwrap();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        {
            let mut inner = self.shared.queue.lock().unwrap();
            inner.queue.clear();
            inner.quit = true;
        }
        self.shared.work_available.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
