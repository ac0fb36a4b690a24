mod common;

use common::small_budget;
use mangagrid::async_api::RenderJob;
use mangagrid::{Error, GalleryConfig, GalleryItem, GalleryRenderer, LayoutBudget, RenderWorker};

fn job(count: usize) -> RenderJob {
    RenderJob {
        items: (0..count)
            .map(|i| GalleryItem::new(format!("JM{}", i), format!("Title {}", i)))
            .collect(),
        page: 1,
        max_page: 1,
        header: None,
    }
}

#[tokio::test]
async fn worker_renders_and_closes() {
    let renderer = GalleryRenderer::builtin(small_budget());
    let canvas = renderer.canvas_size();
    let worker = RenderWorker::with_renderer(renderer).await.expect("spawn worker");

    let page = worker.render(job(3)).await.expect("render");
    assert_eq!((page.width, page.height), canvas);

    let plan = worker.choose_layout(4).await.expect("layout");
    assert_eq!((plan.columns, plan.rows), (2, 2));

    let handle = worker.clone();
    worker.close().await.expect("close");
    assert!(matches!(handle.render(job(1)).await, Err(Error::Other(_))));
}

#[tokio::test]
async fn worker_reports_invalid_layouts() {
    let worker = RenderWorker::with_renderer(GalleryRenderer::builtin(small_budget()))
        .await
        .unwrap();
    assert!(matches!(worker.render(job(5)).await, Err(Error::InvalidLayout(_))));
    worker.close().await.unwrap();
}

// The paused clock jumps to the deadline as soon as the runtime is idle.
#[tokio::test(start_paused = true)]
async fn deadline_elapses_before_a_large_page() {
    let budget = LayoutBudget {
        max_rows_per_column: 5,
        ..LayoutBudget::default()
    };
    let worker = RenderWorker::with_renderer(GalleryRenderer::builtin(budget))
        .await
        .unwrap();
    let res = worker.render_with_deadline(job(20), 60_000).await;
    assert!(matches!(res, Err(Error::Timeout(60_000))));

    // the worker survives an abandoned job
    let plan = worker.choose_layout(1).await.unwrap();
    assert_eq!(plan.columns, 1);
    worker.close().await.unwrap();
}

#[tokio::test]
async fn invalid_config_fails_worker_start() {
    let mut config = GalleryConfig::default();
    config.budget.max_columns = 0;
    assert!(matches!(
        RenderWorker::new(Some(config)).await,
        Err(Error::Config(_))
    ));
}
