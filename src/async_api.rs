use crate::rendering::layout::LayoutPlan;
use crate::{Error, GalleryConfig, GalleryItem, GalleryRenderer, ProfileHeader, RenderedPage, Result};
use log::{debug, info};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

/// Everything needed to render one page.
#[derive(Debug, Clone, Default)]
pub struct RenderJob {
    pub items: Vec<GalleryItem>,
    pub page: u32,
    pub max_page: u32,
    pub header: Option<ProfileHeader>,
}

enum Command {
    Render(RenderJob, oneshot::Sender<Result<RenderedPage>>),
    Layout(usize, oneshot::Sender<Result<LayoutPlan>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly renderer backed by a dedicated worker thread.
///
/// Rendering is CPU-bound and synchronous. The worker thread owns the
/// `GalleryRenderer` and runs jobs sent from async tasks so a render never
/// blocks the caller's runtime.
#[derive(Clone)]
pub struct RenderWorker {
    cmd_tx: Sender<Command>,
}

impl RenderWorker {
    /// Create a worker (spawns a background thread that loads the assets).
    pub async fn new(config: Option<GalleryConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        Self::spawn(move || {
            config.validate()?;
            Ok(GalleryRenderer::from_config(&config))
        })
        .await
    }

    /// Create a worker around an already built renderer.
    pub async fn with_renderer(renderer: GalleryRenderer) -> Result<Self> {
        Self::spawn(move || Ok(renderer)).await
    }

    async fn spawn<F>(init: F) -> Result<Self>
    where
        F: FnOnce() -> Result<GalleryRenderer> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            // Build the renderer on the worker thread
            let renderer = match init() {
                Ok(r) => r,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Render(job, resp) => {
                        let res =
                            renderer.render(&job.items, job.page, job.max_page, job.header.as_ref());
                        if resp.send(res).is_err() {
                            debug!("Render result for page {} dropped by caller", job.page);
                        }
                    }
                    Command::Layout(count, resp) => {
                        let _ = resp.send(renderer.choose_layout(count));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
            info!("Render worker stopped");
        });

        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Other("Render worker has stopped".into()))
    }

    /// Render a page on the worker thread.
    pub async fn render(&self, job: RenderJob) -> Result<RenderedPage> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Render(job, tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Render canceled: {}", e)))?
    }

    /// Like [`render`](Self::render) but gives up after `deadline_ms`.
    ///
    /// The worker still finishes the abandoned job and discards its result.
    pub async fn render_with_deadline(&self, job: RenderJob, deadline_ms: u64) -> Result<RenderedPage> {
        match tokio::time::timeout(Duration::from_millis(deadline_ms), self.render(job)).await {
            Ok(res) => res,
            Err(_) => Err(Error::Timeout(deadline_ms)),
        }
    }

    /// Run the layout search on the worker thread.
    pub async fn choose_layout(&self, item_count: usize) -> Result<LayoutPlan> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Layout(item_count, tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Layout canceled: {}", e)))?
    }

    /// Shutdown the background worker.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}
