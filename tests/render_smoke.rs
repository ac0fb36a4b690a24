mod common;

use common::{png_cover, small_budget};
use mangagrid::rendering::layout::ScaledGrid;
use mangagrid::{GalleryItem, GalleryRenderer, LayoutBudget};

const BLUE: [u8; 4] = [0, 0, 255, 255];

#[test]
fn zero_items_render_background_only() {
    let renderer = GalleryRenderer::builtin(LayoutBudget::default());
    let page = renderer.render(&[], 1, 1, None).expect("empty render");
    assert_eq!((page.width, page.height), (2950, 4790));
    assert!(page.image.pixels().all(|p| p.0 == [255, 255, 255]));
}

#[test]
fn broken_cover_only_affects_its_own_item() {
    let budget = small_budget();
    let renderer = GalleryRenderer::builtin(budget.clone());
    let items = vec![
        GalleryItem::new("JM1", "first").with_cover(png_cover(60, 80, BLUE)),
        GalleryItem::new("JM2", "second").with_cover(b"\x89PNG but not really".to_vec()),
        GalleryItem::new("JM3", "third").with_cover(png_cover(90, 40, BLUE)),
    ];

    let plan = renderer.choose_layout(items.len()).expect("layout");
    assert_eq!((plan.columns, plan.rows), (2, 2));
    let page = renderer.render_page(&items, &plan, "1 / 1", None);
    let grid = ScaledGrid::new(plan, &budget);

    let corner = |i: usize| {
        let r = grid.cover_rect(i);
        page.image.get_pixel(r.x as u32 + 1, r.y as u32 + 1).0
    };
    assert_eq!(corner(0), [0, 0, 255]);
    assert_eq!(corner(1), [255, 80, 80]);
    assert_eq!(corner(2), [0, 0, 255]);

    // column-major: the second item sits below the first
    assert_eq!(grid.cover_rect(1).x, grid.cover_rect(0).x);
    assert!(grid.cover_rect(1).y > grid.cover_rect(0).y);
    assert!(grid.cover_rect(2).x > grid.cover_rect(0).x);
}

#[test]
fn rendered_page_encodes_to_png() {
    let renderer = GalleryRenderer::builtin(small_budget());
    let items = vec![GalleryItem::new("JM9", "only").with_tags(vec!["solo".into()])];
    let page = renderer.render(&items, 1, 1, None).expect("render");

    let png = page.encode_png().expect("png");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&png).expect("decode").to_rgb8();
    assert_eq!(decoded.dimensions(), renderer.canvas_size());
    assert_eq!(decoded, page.image);
}

#[test]
fn footer_label_is_drawn() {
    let renderer = GalleryRenderer::builtin(small_budget());
    let items = vec![GalleryItem::new("JM9", "t")];
    let page = renderer.render(&items, 3, 7, None).expect("render");
    let (w, h) = renderer.canvas_size();
    let footer_top = h - small_budget().footer_height;
    let painted = (footer_top..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .any(|(x, y)| page.image.get_pixel(x, y).0 != [255, 255, 255]);
    assert!(painted);
}
