use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::{AppError, AppResult};

use super::cache::PhotoKey;
use super::frame::{PhotoSource, RgbaFrame};
use super::image_ops::downscale_to_bounds;

enum PhotoRequest {
    Load { key: PhotoKey, path: PathBuf },
    Shutdown,
}

#[derive(Debug)]
pub struct PhotoResult {
    pub key: PhotoKey,
    pub result: AppResult<RgbaFrame>,
    pub elapsed: Duration,
}

struct WorkerRuntime {
    _owned: Option<Runtime>,
    handle: Handle,
}

impl WorkerRuntime {
    fn new() -> AppResult<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self {
                _owned: None,
                handle,
            });
        }

        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("sbk-photo")
            .build()
            .map_err(|source| {
                AppError::io_with_context(source, "failed to start photo worker runtime")
            })?;
        let handle = runtime.handle().clone();
        Ok(Self {
            _owned: Some(runtime),
            handle,
        })
    }
}

/// Decodes page photos off the event loop. Requests fan out over a shared
/// queue to a fixed set of blocking workers; results come back in completion
/// order.
pub struct PhotoWorker {
    request_tx: flume::Sender<PhotoRequest>,
    result_rx: UnboundedReceiver<PhotoResult>,
    in_flight: HashSet<PhotoKey>,
    workers: Vec<JoinHandle<()>>,
    _runtime: WorkerRuntime,
}

impl PhotoWorker {
    pub fn spawn(source: Arc<dyn PhotoSource>, worker_threads: usize) -> AppResult<Self> {
        let runtime = WorkerRuntime::new()?;
        let (request_tx, request_rx) = flume::unbounded();
        let (result_tx, result_rx) = unbounded_channel();
        let worker_threads = worker_threads.max(1);

        let workers = (0..worker_threads)
            .map(|_| {
                let request_rx = request_rx.clone();
                let result_tx = result_tx.clone();
                let source = Arc::clone(&source);
                runtime
                    .handle
                    .spawn_blocking(move || photo_worker_main(request_rx, source, result_tx))
            })
            .collect();
        debug!(worker_threads, "photo workers started");

        Ok(Self {
            request_tx,
            result_rx,
            in_flight: HashSet::new(),
            workers,
            _runtime: runtime,
        })
    }

    /// Queues a decode unless the same key is already in flight.
    pub fn request(&mut self, key: PhotoKey, path: PathBuf) -> bool {
        if self.in_flight.contains(&key) {
            return false;
        }
        if self
            .request_tx
            .send(PhotoRequest::Load { key, path })
            .is_err()
        {
            return false;
        }
        self.in_flight.insert(key);
        true
    }

    pub fn is_in_flight(&self, key: &PhotoKey) -> bool {
        self.in_flight.contains(key)
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub async fn recv_result(&mut self) -> Option<PhotoResult> {
        let result = self.result_rx.recv().await?;
        self.in_flight.remove(&result.key);
        Some(result)
    }

    pub fn try_recv_result(&mut self) -> Option<PhotoResult> {
        let result = self.result_rx.try_recv().ok()?;
        self.in_flight.remove(&result.key);
        Some(result)
    }

    fn shutdown(&mut self) {
        for _ in 0..self.workers.len() {
            let _ = self.request_tx.send(PhotoRequest::Shutdown);
        }
        while let Some(worker) = self.workers.pop() {
            worker.abort();
        }
    }
}

impl Drop for PhotoWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn photo_worker_main(
    request_rx: flume::Receiver<PhotoRequest>,
    source: Arc<dyn PhotoSource>,
    result_tx: UnboundedSender<PhotoResult>,
) {
    while let Ok(request) = request_rx.recv() {
        let PhotoRequest::Load { key, path } = request else {
            break;
        };

        let started = Instant::now();
        let result = source
            .load(&path, key.leaf)
            .and_then(|frame| downscale_to_bounds(frame, key.max_width, key.max_height));
        trace!(
            leaf = key.leaf,
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "photo decoded"
        );

        let done = PhotoResult {
            key,
            result,
            elapsed: started.elapsed(),
        };
        if result_tx.send(done).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use super::{PhotoResult, PhotoWorker};
    use crate::error::{AppError, AppResult};
    use crate::media::{PhotoKey, PhotoSource, RgbaFrame};

    #[derive(Default)]
    struct StubSource {
        loads: AtomicUsize,
    }

    impl PhotoSource for StubSource {
        fn load(&self, path: &Path, page: usize) -> AppResult<RgbaFrame> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if path.ends_with("broken.png") {
                return Err(AppError::photo_decode(
                    page,
                    AppError::invalid_argument("broken"),
                ));
            }
            Ok(RgbaFrame {
                width: 40,
                height: 20,
                pixels: vec![7; 40 * 20 * 4].into(),
            })
        }
    }

    fn key(leaf: usize) -> PhotoKey {
        PhotoKey {
            leaf,
            max_width: 10,
            max_height: 10,
        }
    }

    fn wait_for_result(worker: &mut PhotoWorker) -> PhotoResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = worker.try_recv_result() {
                return result;
            }
            assert!(Instant::now() < deadline, "photo worker timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn worker_decodes_and_downscales_to_key_bounds() {
        let source = Arc::new(StubSource::default());
        let mut worker = PhotoWorker::spawn(source, 2).expect("worker should start");

        assert!(worker.request(key(1), PathBuf::from("one.png")));
        assert!(worker.is_in_flight(&key(1)));
        let done = wait_for_result(&mut worker);

        assert_eq!(done.key, key(1));
        let frame = done.result.expect("stub photo decodes");
        assert_eq!((frame.width, frame.height), (10, 5));
        assert_eq!(worker.in_flight_len(), 0);
    }

    #[test]
    fn duplicate_requests_are_coalesced() {
        let source = Arc::new(StubSource::default());
        let mut worker = PhotoWorker::spawn(source.clone(), 1).expect("worker should start");

        assert!(worker.request(key(2), PathBuf::from("two.png")));
        assert!(!worker.request(key(2), PathBuf::from("two.png")));
        let _ = wait_for_result(&mut worker);
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_come_back_as_results() {
        let source = Arc::new(StubSource::default());
        let mut worker = PhotoWorker::spawn(source, 1).expect("worker should start");

        worker.request(key(3), PathBuf::from("broken.png"));
        let done = wait_for_result(&mut worker);
        assert!(matches!(
            done.result,
            Err(AppError::PhotoDecode { page: 3, .. })
        ));
    }
}
