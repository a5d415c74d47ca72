#![forbid(unsafe_code)]

//! End-to-end layout scenarios against the engine façade.

use mosaic_layout::{
    Alignment, MasonryEngine, MasonryOptions, Position, SpanConfig, SpanSource,
};

fn options() -> MasonryOptions {
    MasonryOptions::default()
        .column_width(200.0)
        .gutter(10.0)
        .min_columns(3)
        .alignment(Alignment::Start)
}

struct Spans;

impl SpanSource<&'static str> for Spans {
    fn span_config(&self, item: &&'static str) -> SpanConfig {
        if *item == "b" {
            SpanConfig::Fixed(2)
        } else {
            SpanConfig::SINGLE
        }
    }
}

fn measure(engine: &mut MasonryEngine<&'static str, Spans>, pairs: &[(&'static str, f64)]) {
    for &(item, height) in pairs {
        engine.set_measurement(item, height);
    }
}

#[test]
fn three_column_grid_with_one_spanning_item() {
    let mut engine = MasonryEngine::with_span_source(options(), Spans);
    engine.set_container_width(Some(640.0));
    measure(
        &mut engine,
        &[("a", 100.0), ("b", 50.0), ("c", 80.0), ("d", 60.0)],
    );

    let out = engine.layout(&["a", "b", "c", "d"]);

    // "a" takes column 0; "b" spans columns 1-2 on the first row; "c" and
    // "d" stack beneath it on the now-level shelf.
    assert_eq!(out[0], Position::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(out[1], Position::new(0.0, 210.0, 410.0, 50.0));
    assert_eq!(out[2], Position::new(60.0, 210.0, 200.0, 80.0));
    assert_eq!(out[3], Position::new(60.0, 420.0, 200.0, 60.0));
}

#[test]
fn warm_relayout_reproduces_the_same_positions() {
    let mut engine = MasonryEngine::with_span_source(options(), Spans);
    engine.set_container_width(Some(640.0));
    measure(
        &mut engine,
        &[("a", 100.0), ("b", 50.0), ("c", 80.0), ("d", 60.0)],
    );

    let items = ["a", "b", "c", "d"];
    let first = engine.layout(&items);
    let second = engine.layout(&items);
    assert_eq!(first, second);
}

#[test]
fn appended_items_do_not_move_placed_ones() {
    let mut engine = MasonryEngine::with_span_source(options(), Spans);
    engine.set_container_width(Some(640.0));
    measure(&mut engine, &[("a", 100.0), ("c", 80.0)]);

    let first = engine.layout(&["a", "c"]);

    measure(&mut engine, &[("d", 60.0), ("e", 40.0)]);
    let second = engine.layout(&["a", "c", "d", "e"]);

    assert_eq!(second[0], first[0]);
    assert_eq!(second[1], first[1]);
    // New items continue from the cached column state.
    assert!(!second[2].is_offscreen());
    assert!(!second[3].is_offscreen());
}

#[test]
fn width_change_forces_remeasurement() {
    let mut engine = MasonryEngine::with_span_source(options(), Spans);
    engine.set_container_width(Some(640.0));
    measure(&mut engine, &[("a", 100.0), ("c", 80.0)]);
    let placed = engine.layout(&["a", "c"]);
    assert!(placed.iter().all(|p| !p.is_offscreen()));

    engine.set_container_width(Some(900.0));
    let after = engine.layout(&["a", "c"]);
    // Measurements were taken at the old width, so everything goes back to
    // placeholders until re-measured.
    assert!(after.iter().all(Position::is_offscreen));
}

#[test]
fn reflow_shrink_then_restore_round_trips() {
    let mut engine: MasonryEngine<u32> = MasonryEngine::new(
        MasonryOptions::default()
            .column_width(200.0)
            .gutter(10.0)
            .min_columns(3)
            .alignment(Alignment::Start),
    );
    engine.set_container_width(Some(640.0));
    let items: Vec<u32> = (0..9).collect();
    for &i in &items {
        engine.set_measurement(i, 60.0 + 25.0 * f64::from(i % 4));
    }
    let original = engine.layout(&items);

    assert!(engine.reflow_item(&items, &0, 20.0));
    let shrunk: Vec<Position> = items
        .iter()
        .map(|i| engine.positions().get(i).unwrap())
        .collect();
    assert_ne!(shrunk, original);

    assert!(engine.reflow_item(&items, &0, 60.0));
    let restored: Vec<Position> = items
        .iter()
        .map(|i| engine.positions().get(i).unwrap())
        .collect();
    assert_eq!(restored, original);
}

#[test]
fn reflow_leaves_other_columns_alone() {
    let mut engine: MasonryEngine<u32> = MasonryEngine::new(
        MasonryOptions::default()
            .column_width(200.0)
            .gutter(10.0)
            .min_columns(3)
            .alignment(Alignment::Start),
    );
    engine.set_container_width(Some(640.0));
    let items: Vec<u32> = (0..6).collect();
    for &i in &items {
        engine.set_measurement(i, 100.0);
    }
    let original = engine.layout(&items);

    assert!(engine.reflow_item(&items, &0, 160.0));
    for (i, item) in items.iter().enumerate() {
        let now = engine.positions().get(item).unwrap();
        if original[i].left == original[0].left && i != 0 {
            assert_eq!(now.top, original[i].top + 60.0, "item {item} should shift");
        } else if i != 0 {
            assert_eq!(now, original[i], "item {item} should stay put");
        }
    }
}

#[test]
fn zero_height_spacers_occupy_no_vertical_space() {
    let mut engine: MasonryEngine<u32> = MasonryEngine::new(
        MasonryOptions::default()
            .column_width(200.0)
            .gutter(10.0)
            .min_columns(3)
            .alignment(Alignment::Start),
    );
    engine.set_container_width(Some(640.0));
    engine.set_measurement(0, 0.0);
    engine.set_measurement(1, 50.0);
    let out = engine.layout(&[0, 1]);

    assert_eq!(out[0].top, 0.0);
    assert_eq!(out[0].height, 0.0);
    // The spacer did not raise its column, so the next item shares its top.
    assert_eq!(out[1].top, 0.0);
    assert_eq!(out[1].left, out[0].left);
}

#[test]
fn preseeded_positions_survive_a_pass() {
    let mut engine: MasonryEngine<u32> = MasonryEngine::new(
        MasonryOptions::default()
            .column_width(200.0)
            .gutter(10.0)
            .min_columns(3)
            .alignment(Alignment::Start),
    );
    engine.set_container_width(Some(640.0));
    engine.set_measurement(0, 100.0);
    engine.set_measurement(1, 40.0);
    // Hydrate item 0 as if a server pass had already placed it on column 2.
    engine
        .positions_mut()
        .set(0, Position::new(0.0, 420.0, 200.0, 100.0));

    let out = engine.layout(&[0, 1]);
    assert_eq!(out[0], Position::new(0.0, 420.0, 200.0, 100.0));
    // The fresh item avoids the seeded column's height.
    assert_eq!(out[1].top, 0.0);
    assert_ne!(out[1].left, 420.0);
}
