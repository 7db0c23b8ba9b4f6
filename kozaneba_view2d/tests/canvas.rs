// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `kozaneba_view2d` crate.

use std::sync::Arc;

use kozaneba_layout::{LayoutParams, Note, RawNote, World, layout_notes};
use kozaneba_view2d::{
    CanvasEvent, CanvasOptions, CanvasView, ClusterOverlay, ClusterStyle, ColumnMeasure, DrawOp,
    EventOutcome, Modifiers, contains_rect, intersects_closed,
};
use kurbo::{Point, Rect, Vec2};

const VIEW: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

fn grid_notes(side: usize) -> (Arc<[Note]>, World) {
    let raw = (0..side * side)
        .map(|i| RawNote {
            id: format!("n{i}"),
            text: format!("note {i} with a few words of text"),
            position: Point::new((i % side) as f64 / 30.0, (i / side) as f64 / 30.0),
        })
        .collect();
    let layout = layout_notes(raw, LayoutParams::default()).unwrap();
    (layout.notes.into(), layout.world)
}

fn canvas(side: usize) -> CanvasView {
    let (notes, world) = grid_notes(side);
    CanvasView::new(notes, world, VIEW, CanvasOptions::default(), ColumnMeasure::default())
}

fn wheel(canvas: &mut CanvasView, at: Point, delta_y: f64) {
    canvas.handle(CanvasEvent::Wheel {
        position: at,
        delta_y,
    });
}

fn world_texts(ops: &[DrawOp]) -> usize {
    ops.iter()
        .filter(|op| matches!(op, DrawOp::Text { .. }))
        .count()
}

#[test]
fn initial_fit_shows_whole_world() {
    let mut c = canvas(10);
    let frame = c.tick().unwrap();
    assert_eq!(frame.visible_count(), 100);
    let world = c.world().rect();
    let on_screen = c.viewport().world_to_view_rect(world);
    assert!(contains_rect(VIEW, on_screen));
    assert_eq!(c.viewport().min_zoom(), c.viewport().zoom());
}

#[test]
fn culling_matches_brute_force() {
    let mut c = canvas(12);
    let _ = c.tick();
    for _ in 0..8 {
        wheel(&mut c, Point::new(200.0, 150.0), -1.0);
    }
    c.handle(CanvasEvent::PointerDown {
        position: Point::new(400.0, 300.0),
        modifiers: Modifiers::empty(),
    });
    for step in 0..6 {
        let pos = Point::new(400.0 - 40.0 * f64::from(step), 300.0 - 25.0 * f64::from(step));
        c.handle(CanvasEvent::PointerMove { position: pos });
        let frame = c.tick().unwrap();
        let view_world = c.viewport().visible_world_rect();
        let expected: Vec<usize> = c
            .notes()
            .iter()
            .enumerate()
            .filter(|(_, n)| intersects_closed(n.rect, view_world))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(frame.visible_notes, expected);
        assert!(frame.visible_count() < c.notes().len());
    }
}

#[test]
fn wheel_zoom_keeps_world_point_under_pointer() {
    let mut c = canvas(10);
    let anchor = Point::new(123.0, 456.0);
    let before = c.viewport().view_to_world_point(anchor);
    wheel(&mut c, anchor, -3.0);
    let after = c.viewport().world_to_view_point(before);
    assert!((after - anchor).hypot() < 1e-9);
    wheel(&mut c, anchor, 3.0);
    let after = c.viewport().world_to_view_point(before);
    assert!((after - anchor).hypot() < 1e-9);
}

#[test]
fn zoom_stays_within_limits() {
    let mut c = canvas(10);
    let min = c.viewport().min_zoom();
    for _ in 0..60 {
        wheel(&mut c, Point::new(10.0, 10.0), -1.0);
        assert!(c.viewport().zoom() <= 1.5);
    }
    assert_eq!(c.viewport().zoom(), 1.5);
    for _ in 0..120 {
        wheel(&mut c, Point::new(10.0, 10.0), 1.0);
        assert!(c.viewport().zoom() >= min);
    }
    assert_eq!(c.viewport().zoom(), min);
    for _ in 0..10 {
        c.zoom_in();
    }
    assert_eq!(c.viewport().target_zoom(), 1.5);
}

#[test]
fn button_zoom_eases_and_then_idles() {
    let mut c = canvas(10);
    let _ = c.tick();
    let start = c.viewport().zoom();
    c.zoom_in();
    let center_world = c.viewport().view_to_world_point(VIEW.center());

    let mut frames = 0;
    let mut last = start;
    while c.tick().is_some() {
        frames += 1;
        assert!(c.viewport().zoom() >= last);
        last = c.viewport().zoom();
        assert!(frames < 200, "easing never settled");
    }
    assert!(frames > 1);
    assert!(c.viewport().is_settled());
    assert!((c.viewport().zoom() - start * 2.0).abs() < 1e-12);
    let center = c.viewport().world_to_view_point(center_world);
    assert!((center - VIEW.center()).hypot() < 1e-6);
}

#[test]
fn text_appears_above_the_legibility_threshold() {
    let mut c = canvas(10);
    let frame = c.tick().unwrap();
    assert!(c.viewport().zoom() * 120.0 < 80.0);
    assert_eq!(world_texts(&frame.world), 0);

    while c.viewport().zoom() * 120.0 < 80.0 {
        wheel(&mut c, VIEW.center(), -1.0);
    }
    let frame = c.tick().unwrap();
    assert!(world_texts(&frame.world) >= frame.visible_count());
    for op in &frame.world {
        if let DrawOp::Text { origin, .. } = op {
            let owner = frame
                .visible_notes
                .iter()
                .map(|&i| c.notes()[i].rect)
                .find(|r| r.contains(*origin));
            assert!(owner.is_some(), "text at {origin:?} is outside every note");
        }
    }
}

#[test]
fn shift_drag_commits_contained_notes_only() {
    let mut c = canvas(10);
    let _ = c.tick();
    let down = Point::new(150.0, 120.0);
    let up = Point::new(420.0, 390.0);
    c.handle(CanvasEvent::PointerDown {
        position: down,
        modifiers: Modifiers::SHIFT,
    });
    assert!(c.gesture().is_selecting());
    let zoom = c.viewport().zoom();
    c.handle(CanvasEvent::PointerMove { position: up });
    assert_eq!(c.viewport().zoom(), zoom, "selecting must not pan");
    let outcome = c.handle(CanvasEvent::PointerUp { position: up });
    assert_eq!(outcome, EventOutcome::SelectionCommitted);

    let region = c.viewport().view_to_world_rect(Rect::from_points(down, up));
    let selection = c.selection().unwrap().clone();
    assert!((selection.world_rect.x0 - region.x0).abs() < 1e-9);
    let expected: Vec<usize> = c
        .notes()
        .iter()
        .enumerate()
        .filter(|(_, n)| contains_rect(region, n.rect))
        .map(|(i, _)| i)
        .collect();
    assert!(!expected.is_empty());
    assert_eq!(selection.notes, expected);
    for text in c.selection_texts() {
        assert!(text.starts_with("note "));
    }

    // The committed selection survives panning and is drawn until cleared.
    c.handle(CanvasEvent::PointerDown {
        position: Point::new(10.0, 10.0),
        modifiers: Modifiers::empty(),
    });
    c.handle(CanvasEvent::PointerMove {
        position: Point::new(60.0, 10.0),
    });
    c.handle(CanvasEvent::PointerUp {
        position: Point::new(60.0, 10.0),
    });
    let frame = c.tick().unwrap();
    assert!(c.selection().is_some());
    assert!(frame
        .overlay
        .iter()
        .any(|op| matches!(op, DrawOp::StrokeRect { dashed: true, .. })));
    c.clear_selection();
    let frame = c.tick().unwrap();
    assert!(c.selection().is_none());
    assert!(!frame
        .overlay
        .iter()
        .any(|op| matches!(op, DrawOp::StrokeRect { dashed: true, .. })));
}

#[test]
fn reversed_drag_is_normalized() {
    let mut c = canvas(6);
    c.handle(CanvasEvent::PointerDown {
        position: Point::new(700.0, 550.0),
        modifiers: Modifiers::SHIFT | Modifiers::CONTROL,
    });
    c.handle(CanvasEvent::PointerUp {
        position: Point::new(10.0, 10.0),
    });
    let sel = c.selection().unwrap();
    assert!(sel.world_rect.width() > 0.0 && sel.world_rect.height() > 0.0);
}

#[test]
fn pan_moves_current_and_target_together() {
    let mut c = canvas(10);
    let pan = c.viewport().pan();
    c.handle(CanvasEvent::PointerDown {
        position: Point::new(100.0, 100.0),
        modifiers: Modifiers::empty(),
    });
    c.handle(CanvasEvent::PointerMove {
        position: Point::new(130.0, 80.0),
    });
    assert_eq!(c.viewport().pan(), pan + Vec2::new(30.0, -20.0));
    assert_eq!(c.viewport().target_pan(), c.viewport().pan());
    assert_eq!(
        c.handle(CanvasEvent::PointerUp {
            position: Point::new(130.0, 80.0)
        }),
        EventOutcome::Updated
    );
    assert!(c.gesture().is_idle());
}

#[test]
fn reset_restores_the_fit() {
    let mut c = canvas(10);
    let fitted = c.viewport().debug_info();
    wheel(&mut c, Point::new(40.0, 40.0), -1.0);
    c.zoom_in();
    c.handle(CanvasEvent::Key('R'));
    assert_eq!(c.viewport().zoom(), fitted.zoom);
    assert_eq!(c.viewport().pan(), fitted.pan);
    assert!(c.viewport().is_settled());

    wheel(&mut c, Point::new(40.0, 40.0), -1.0);
    c.handle(CanvasEvent::DoubleClick);
    assert_eq!(c.viewport().pan(), fitted.pan);
}

#[test]
fn hud_reports_zoom_visible_and_clusters() {
    let mut c = canvas(4);
    let frame = c.tick().unwrap();
    let hud = frame.texts().last().unwrap().to_owned();
    assert_eq!(hud, format!("zoom {:.2} | visible 16", c.viewport().zoom()));

    c.set_cluster_overlays(vec![ClusterOverlay {
        rect: Rect::new(0.0, 0.0, 240.0, 240.0),
        title: None,
    }]);
    let frame = c.tick().unwrap();
    assert!(frame.texts().last().unwrap().ends_with("| clusters 1"));
    let Some(DrawOp::FillRect { rect, .. }) = frame.overlay.iter().rev().nth(1) else {
        panic!("HUD panel missing");
    };
    assert!(contains_rect(VIEW, *rect));
    assert_eq!(rect.height(), 24.0);
}

#[test]
fn sticky_clusters_show_wrapped_titles() {
    let mut c = canvas(10);
    c.set_cluster_overlays(vec![ClusterOverlay {
        rect: Rect::new(0.0, 0.0, 1200.0, 600.0),
        title: Some("駐輪場の不足と駅前の混雑".to_owned()),
    }]);
    c.set_cluster_style(ClusterStyle::Sticky);
    let frame = c.tick().unwrap();
    let titles: Vec<&str> = frame
        .overlay
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, font, .. } if font.bold => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert!(!titles.is_empty() && titles.len() <= 2);
    assert!(titles[0].starts_with('駐'));

    c.set_cluster_style(ClusterStyle::Outline);
    let frame = c.tick().unwrap();
    assert!(frame.overlay.iter().any(|op| matches!(
        op,
        DrawOp::StrokeRect {
            width,
            dashed: false,
            ..
        } if *width == 2.0
    )));
}

#[test]
fn resize_marks_dirty_and_keeps_zoom() {
    let mut c = canvas(5);
    let _ = c.tick();
    let zoom = c.viewport().zoom();
    let outcome = c.handle(CanvasEvent::Resize(Rect::new(0.0, 0.0, 1024.0, 768.0)));
    assert_eq!(outcome, EventOutcome::Updated);
    let frame = c.tick().unwrap();
    assert_eq!(frame.view_rect.width(), 1024.0);
    assert_eq!(c.viewport().zoom(), zoom);
}

#[test]
fn svg_export_draws_every_visible_note() {
    let mut c = canvas(3);
    let frame = c.tick().unwrap();
    let svg = frame.to_svg();
    // Background, nine notes and the HUD panel.
    assert_eq!(svg.matches("<rect ").count(), 11);
    assert!(svg.contains("width=\"800\" height=\"600\""));
}
