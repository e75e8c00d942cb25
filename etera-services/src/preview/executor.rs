// SPDX-License-Identifier: LGPL-3.0-only
//! Background worker pool for preview fetches.

use std::cell::RefCell;
use std::sync::Arc;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::{mpsc, Semaphore};

use crate::icon::Icon;
use crate::preview::error::PreviewError;
use crate::preview::events::PreviewEvent;
use crate::preview::fetch::PreviewFetcher;
use crate::settings::PreviewSettings;

/// Callback run on a worker thread after every completed fetch, so a UI
/// event loop can schedule event processing on its own thread.
pub type PreviewWaker = Arc<dyn Fn() + Send + Sync>;

/// Runs preview fetches on a tokio runtime and queues their outcomes.
///
/// Requests are sent to a dispatcher task which runs each fetch on its own
/// task, bounded by a semaphore. Decoding and preparation happen on the
/// blocking pool. Outcomes are collected with [`drain`](Self::drain) on the
/// owning thread.
pub struct PreviewExecutor {
    request_tx: mpsc::UnboundedSender<(String, u64)>,
    event_rx: RefCell<mpsc::UnboundedReceiver<PreviewEvent>>,
    runtime: Option<Runtime>,
}

impl PreviewExecutor {
    /// Start an executor on its own multi-threaded runtime.
    pub fn spawn(
        fetcher: Arc<dyn PreviewFetcher>,
        settings: &PreviewSettings,
        waker: Option<PreviewWaker>,
    ) -> Result<Self, PreviewError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(settings.worker_threads.max(1))
            .thread_name("etera-preview")
            .enable_all()
            .build()?;
        let mut executor = Self::with_handle(
            fetcher,
            runtime.handle(),
            settings.max_concurrent_fetches,
            waker,
        );
        executor.runtime = Some(runtime);
        Ok(executor)
    }

    /// Start an executor on an existing runtime.
    pub fn with_handle(
        fetcher: Arc<dyn PreviewFetcher>,
        handle: &Handle,
        max_concurrent_fetches: usize,
        waker: Option<PreviewWaker>,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let limit = Arc::new(Semaphore::new(max_concurrent_fetches.max(1)));

        handle.spawn(Self::dispatch(request_rx, event_tx, fetcher, limit, waker));

        Self {
            request_tx,
            event_rx: RefCell::new(event_rx),
            runtime: None,
        }
    }

    /// Queue a fetch of `source`. Its outcome carries `ticket`.
    pub fn request(&self, source: &str, ticket: u64) -> Result<(), PreviewError> {
        self.request_tx
            .send((source.to_string(), ticket))
            .map_err(|_| PreviewError::QueueClosed)
    }

    /// Take every outcome that has arrived so far.
    pub fn drain(&self) -> Vec<PreviewEvent> {
        let mut event_rx = self.event_rx.borrow_mut();
        let mut events = Vec::new();
        while let Ok(event) = event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn dispatch(
        mut request_rx: mpsc::UnboundedReceiver<(String, u64)>,
        event_tx: mpsc::UnboundedSender<PreviewEvent>,
        fetcher: Arc<dyn PreviewFetcher>,
        limit: Arc<Semaphore>,
        waker: Option<PreviewWaker>,
    ) {
        while let Some((source, ticket)) = request_rx.recv().await {
            let Ok(permit) = limit.clone().acquire_owned().await else {
                break;
            };
            let fetcher = fetcher.clone();
            let event_tx = event_tx.clone();
            let waker = waker.clone();

            tokio::spawn(async move {
                let event = Self::fetch_preview(fetcher.as_ref(), source, ticket).await;
                drop(permit);
                if event_tx.send(event).is_err() {
                    log::debug!("PreviewExecutor: Receiver dropped, discarding preview");
                    return;
                }
                if let Some(waker) = waker {
                    waker();
                }
            });
        }
        log::debug!("PreviewExecutor: Request channel closed, dispatcher exiting");
    }

    async fn fetch_preview(
        fetcher: &dyn PreviewFetcher,
        source: String,
        ticket: u64,
    ) -> PreviewEvent {
        let bytes = match fetcher.fetch(&source).await {
            Ok(bytes) => bytes,
            Err(error) => {
                log::debug!("PreviewExecutor: Fetch of {} failed: {}", source, error);
                return PreviewEvent::Failed {
                    source,
                    ticket,
                    error,
                };
            },
        };

        match tokio::task::spawn_blocking(move || decode_preview(&bytes)).await {
            Ok(Ok(icon)) => PreviewEvent::Ready {
                source,
                ticket,
                icon,
            },
            Ok(Err(e)) => {
                log::debug!("PreviewExecutor: Preview {} is undecodable: {}", source, e);
                PreviewEvent::Undecodable {
                    source,
                    ticket,
                    error: e.to_string(),
                }
            },
            Err(e) => PreviewEvent::Undecodable {
                source,
                ticket,
                error: format!("Task execution error: {}", e),
            },
        }
    }
}

impl Drop for PreviewExecutor {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Decode preview bytes and prepare them at every icon size.
pub fn decode_preview(bytes: &[u8]) -> Result<Icon, PreviewError> {
    let image = image::load_from_memory(bytes)?;
    Ok(Icon::from_image(image.to_rgba8()).prepare(1, false))
}
