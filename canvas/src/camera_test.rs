#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_add_and_sub() {
    let a = Point::new(5.0, 7.0);
    let b = Point::new(2.0, 3.0);
    assert_eq!(a - b, Point::new(3.0, 4.0));
    assert_eq!(a - b + b, a);
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
    let p = Point::new(12.5, -3.0);
    assert!(point_approx_eq(cam.screen_to_world(p), p));
}

// --- Conversions ---

#[test]
fn screen_to_world_applies_pan_and_zoom() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let world = cam.screen_to_world(Point::new(300.0, 250.0));
    assert!(point_approx_eq(world, Point::new(100.0, 100.0)));
}

#[test]
fn world_to_screen_inverts_screen_to_world() {
    let cam = Camera { pan_x: -37.0, pan_y: 12.0, zoom: 0.75 };
    let screen = Point::new(411.0, 98.0);
    let back = cam.world_to_screen(cam.screen_to_world(screen));
    assert!(point_approx_eq(back, screen));
}

// --- Fit ---

#[test]
fn fit_letterboxes_wide_viewport() {
    let mut cam = Camera::default();
    cam.fit(1600.0, 500.0, 800.0, 500.0);
    assert!(approx_eq(cam.zoom, 1.0));
    assert!(approx_eq(cam.pan_x, 400.0));
    assert!(approx_eq(cam.pan_y, 0.0));
}

#[test]
fn fit_scales_down_small_viewport() {
    let mut cam = Camera::default();
    cam.fit(400.0, 250.0, 800.0, 500.0);
    assert!(approx_eq(cam.zoom, 0.5));
    let corner = cam.world_to_screen(Point::new(800.0, 500.0));
    assert!(point_approx_eq(corner, Point::new(400.0, 250.0)));
}

#[test]
fn fit_ignores_degenerate_viewport() {
    let mut cam = Camera { pan_x: 5.0, pan_y: 6.0, zoom: 2.0 };
    cam.fit(0.0, 300.0, 800.0, 500.0);
    assert_eq!(cam.zoom, 2.0);
    assert_eq!(cam.pan_x, 5.0);
}
