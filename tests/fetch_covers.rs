#![cfg(feature = "fetch")]

mod common;

use common::png_cover;
use mangagrid::fetch::CoverFetcher;
use mangagrid::{Error, FetchConfig, GalleryItem};
use tiny_http::{Response, Server};

fn start_cover_server() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        let cover = png_cover(6, 8, [10, 20, 30, 255]);
        for request in server.incoming_requests() {
            let url = request.url();
            if url.ends_with("/ok.png") || url == "/media/albums/5_3x4.jpg" {
                let _ = request.respond(Response::from_data(cover.clone()));
            } else {
                let _ = request.respond(Response::from_string("not found").with_status_code(404));
            }
        }
    });
    format!("http://{}", addr)
}

fn fetcher(max_concurrent: usize) -> CoverFetcher {
    CoverFetcher::new(&FetchConfig {
        max_concurrent,
        timeout_ms: 5000,
        ..Default::default()
    })
    .expect("fetcher")
}

#[tokio::test]
async fn fetch_returns_body_and_rejects_non_success() {
    let base = start_cover_server();
    let f = fetcher(2);

    let body = f.fetch(&format!("{}/ok.png", base)).await.expect("fetch ok");
    assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");

    let err = f.fetch(&format!("{}/gone.png", base)).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert_eq!(f.available_permits(), 2);
}

#[tokio::test]
async fn fill_covers_skips_items_with_bytes_and_absorbs_failures() {
    let base = start_cover_server();
    let mut items = vec![
        GalleryItem::new("JM1", "ok").with_cover_url(format!("{}/ok.png", base)),
        GalleryItem::new("JM2", "missing").with_cover_url(format!("{}/missing.png", base)),
        GalleryItem::new("JM3", "local")
            .with_cover(vec![1, 2, 3])
            .with_cover_url(format!("{}/ok.png", base)),
        GalleryItem::new("JM4", "no url"),
    ];
    let filled = fetcher(1).fill_covers(&mut items).await;

    assert_eq!(filled, 1);
    assert!(items[0].cover().is_some());
    assert!(items[1].cover().is_none());
    assert_eq!(items[2].cover(), Some(&[1u8, 2, 3][..]));
    assert!(items[3].cover().is_none());
}

#[tokio::test]
async fn items_without_url_use_album_cover_under_base_url() {
    let base = start_cover_server();
    let f = CoverFetcher::new(&FetchConfig {
        max_concurrent: 2,
        timeout_ms: 5000,
        base_url: Some(base.clone()),
        ..Default::default()
    })
    .expect("fetcher");
    let mut items = vec![
        GalleryItem::new("JM5", "album"),
        GalleryItem::new("JM6", "no such album"),
        GalleryItem::new("JM7", "explicit").with_cover_url(format!("{}/ok.png", base)),
    ];
    let filled = f.fill_covers(&mut items).await;

    assert_eq!(filled, 2);
    assert_eq!(&items[0].cover().expect("album cover")[..8], b"\x89PNG\r\n\x1a\n");
    assert!(items[1].cover().is_none());
    assert!(items[2].cover().is_some());
}
