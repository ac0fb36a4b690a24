use mangagrid::rendering::font::{BlockFont, Typeface};
use mangagrid::rendering::text::{truncate_text, wrap_title, ELLIPSIS};
use mangagrid::{choose_layout, Error, GridConstraints, LayoutBudget};

fn constraints(max_columns: u32, max_rows: u32, w: f64, h: f64) -> GridConstraints {
    GridConstraints {
        max_columns,
        max_rows_per_column: max_rows,
        item_width: 650.0,
        item_height: 200.0,
        column_spacing: 50.0,
        row_spacing: 30.0,
        content_width: w,
        content_height: h,
    }
}

#[test]
fn plans_hold_every_item_within_caps() {
    for max_columns in 1..=6u32 {
        for max_rows in 1..=8u32 {
            let c = constraints(max_columns, max_rows, 2750.0, 4570.0);
            for n in 1..=(max_columns * max_rows) as usize {
                let plan = choose_layout(n, &c).expect("capacity suffices");
                assert!(plan.capacity() as usize >= n, "n={} plan={:?}", n, plan);
                assert!(plan.columns <= max_columns);
                assert!(plan.rows <= max_rows);
                assert!(plan.scale > 0.0);
            }
            let over = (max_columns * max_rows) as usize + 1;
            assert!(matches!(choose_layout(over, &c), Err(Error::InvalidLayout(_))));
        }
    }
}

#[test]
fn layout_is_deterministic() {
    let c = constraints(4, 20, 2750.0, 4570.0);
    for n in 1..=80 {
        assert_eq!(choose_layout(n, &c).unwrap(), choose_layout(n, &c).unwrap());
    }
}

#[test]
fn growing_the_canvas_never_shrinks_the_scale() {
    for n in 1..=40 {
        let small = choose_layout(n, &constraints(4, 20, 2750.0, 4570.0)).unwrap();
        let large = choose_layout(n, &constraints(4, 20, 2750.0 * 1.5, 4570.0 * 1.5)).unwrap();
        assert!(large.scale >= small.scale, "n={}", n);
    }
}

#[test]
fn five_items_on_default_canvas() {
    // 1×5 gives min(4.23, 4570/1120 = 4.08); every wider grid is narrower-limited
    let budget = LayoutBudget::default();
    let plan = choose_layout(5, &budget.grid_constraints()).unwrap();
    assert_eq!((plan.columns, plan.rows), (1, 5));

    // with two rows at most, 3 and 4 columns tie at scale 1.0 and the narrower grid wins
    let capped = LayoutBudget {
        max_rows_per_column: 2,
        ..LayoutBudget::default()
    };
    let plan = choose_layout(5, &capped.grid_constraints()).unwrap();
    assert_eq!((plan.columns, plan.rows), (3, 2));
}

#[test]
fn full_page_uses_the_whole_grid_at_scale_one() {
    let budget = LayoutBudget::default();
    let plan = choose_layout(80, &budget.grid_constraints()).unwrap();
    assert_eq!((plan.columns, plan.rows), (4, 20));
    assert!((plan.scale - 1.0).abs() < 1e-12);
}

const FACE: BlockFont = BlockFont::new(0.5);

fn samples() -> Vec<String> {
    vec![
        String::new(),
        "short".into(),
        "A".repeat(100),
        "The quick brown fox jumps over the lazy dog".into(),
        "全角文字のタイトルも一文字ずつ測る".into(),
        "x".repeat(31),
    ]
}

#[test]
fn wrapped_lines_fit_and_respect_line_cap() {
    for text in samples() {
        for width in [30.0f32, 55.0, 100.0, 300.0, 1000.0] {
            for max_lines in 1..=4 {
                let lines = wrap_title(&FACE, 20.0, &text, width, max_lines);
                assert!(lines.len() <= max_lines);
                for line in &lines {
                    assert!(!line.is_empty());
                    assert!(FACE.measure(line, 20.0) <= width + 1e-3, "{:?} > {}", line, width);
                }
            }
        }
    }
}

#[test]
fn fitting_text_wraps_to_itself() {
    assert_eq!(wrap_title(&FACE, 20.0, "short", 300.0, 2), vec!["short"]);
    assert_eq!(wrap_title(&FACE, 20.0, &"x".repeat(30), 300.0, 1), vec!["x".repeat(30)]);
}

#[test]
fn hundred_char_title_matches_hand_computed_split() {
    let lines = wrap_title(&FACE, 20.0, &"A".repeat(100), 300.0, 2);
    assert_eq!(lines, vec!["A".repeat(30), format!("{}{}", "A".repeat(27), ELLIPSIS)]);
}

#[test]
fn truncation_fits_or_keeps_text() {
    for text in samples() {
        for width in [30.0f32, 55.0, 100.0, 300.0] {
            let out = truncate_text(&FACE, 20.0, &text, width);
            if FACE.measure(&text, 20.0) <= width {
                assert_eq!(out, text);
            } else {
                assert!(out.ends_with(ELLIPSIS));
                assert!(FACE.measure(&out, 20.0) <= width + 1e-3);
            }
        }
    }
}
