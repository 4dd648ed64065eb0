#![allow(clippy::float_cmp)]

use std::collections::HashSet;

use serde_json::json;

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// ElementKind serde
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [
        (ElementKind::Player, "\"player\""),
        (ElementKind::Ball, "\"ball\""),
        (ElementKind::MoveArrow, "\"moveArrow\""),
        (ElementKind::PassArrow, "\"passArrow\""),
        (ElementKind::ShootArrow, "\"shootArrow\""),
        (ElementKind::Text, "\"text\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        assert_eq!(format!("\"{}\"", kind.as_str()), expected);
    }
}

#[test]
fn kind_parse_matches_as_str() {
    for kind in ElementKind::ALL {
        assert_eq!(ElementKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(ElementKind::parse("arrow"), None);
    assert_eq!(ElementKind::parse("Player"), None);
}

#[test]
fn only_arrow_kinds_are_arrows() {
    let arrows: Vec<_> = ElementKind::ALL.into_iter().filter(|k| k.is_arrow()).collect();
    assert_eq!(arrows, vec![ElementKind::MoveArrow, ElementKind::PassArrow, ElementKind::ShootArrow]);
}

// =============================================================
// Element wire format
// =============================================================

#[test]
fn player_serializes_with_type_key_and_no_points() {
    let mut el = Element::player(pt(100.0, 100.0), "A", Team::Blue);
    el.id = "p1".into();
    let value = serde_json::to_value(&el).unwrap();
    assert_eq!(
        value,
        json!({"id": "p1", "type": "player", "x": 100.0, "y": 100.0, "position": "A", "team": "blue"})
    );
}

#[test]
fn arrow_deserializes_from_wire_shape() {
    let el: Element = serde_json::from_value(json!({
        "id": "a1", "type": "passArrow", "x": 1.0, "y": 2.0, "points": [1.0, 2.0, 30.0, 40.0]
    }))
    .unwrap();
    assert_eq!(el.kind, ElementKind::PassArrow);
    assert_eq!(el.arrow_endpoints(), Some((pt(1.0, 2.0), pt(30.0, 40.0))));
    assert!(el.team.is_none());
}

// =============================================================
// Constructors
// =============================================================

#[test]
fn constructors_assign_unique_ids() {
    let ids: HashSet<_> = (0..50).map(|_| Element::ball(pt(0.0, 0.0)).id).collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn arrow_constructor_sets_start_as_position() {
    let el = Element::arrow(ElementKind::ShootArrow, pt(10.0, 20.0), pt(50.0, 60.0)).unwrap();
    assert_eq!((el.x, el.y), (10.0, 20.0));
    assert_eq!(el.points, Some(vec![10.0, 20.0, 50.0, 60.0]));
}

#[test]
fn arrow_constructor_rejects_non_arrow_kind() {
    assert!(Element::arrow(ElementKind::Ball, pt(0.0, 0.0), pt(10.0, 10.0)).is_none());
}

#[test]
fn player_and_ball_never_carry_points() {
    assert!(Element::player(pt(0.0, 0.0), "M", Team::Red).points.is_none());
    assert!(Element::ball(pt(0.0, 0.0)).points.is_none());
}

#[test]
fn arrow_endpoints_rejects_short_or_non_finite_points() {
    let mut el = Element::arrow(ElementKind::MoveArrow, pt(0.0, 0.0), pt(10.0, 0.0)).unwrap();
    el.points = Some(vec![0.0, 0.0, 10.0]);
    assert!(el.arrow_endpoints().is_none());
    el.points = Some(vec![0.0, f64::NAN, 10.0, 0.0]);
    assert!(el.arrow_endpoints().is_none());
}

// =============================================================
// Hit-testing
// =============================================================

#[test]
fn player_hit_radius_is_fifteen() {
    let el = Element::player(pt(100.0, 100.0), "A", Team::Blue);
    assert!(el.hit(pt(115.0, 100.0)));
    assert!(!el.hit(pt(115.5, 100.0)));
}

#[test]
fn ball_hit_radius_is_eight() {
    let el = Element::ball(pt(0.0, 0.0));
    assert!(el.hit(pt(0.0, 8.0)));
    assert!(!el.hit(pt(0.0, 9.0)));
}

#[test]
fn arrow_hit_threshold_is_ten() {
    let el = Element::arrow(ElementKind::MoveArrow, pt(0.0, 0.0), pt(100.0, 0.0)).unwrap();
    assert!(el.hit(pt(50.0, 10.0)));
    assert!(!el.hit(pt(50.0, 11.0)));
}

#[test]
fn text_hit_box_extends_right_and_down() {
    let el = Element::text(pt(10.0, 10.0), "Slide!");
    assert!(el.hit(pt(10.0, 10.0)));
    assert!(el.hit(pt(89.0, 29.0)));
    assert!(!el.hit(pt(91.0, 15.0)));
    assert!(!el.hit(pt(50.0, 5.0)));
}

// =============================================================
// move_to / apply_patch
// =============================================================

#[test]
fn move_to_translates_arrow_points() {
    let mut el = Element::arrow(ElementKind::MoveArrow, pt(0.0, 0.0), pt(10.0, 20.0)).unwrap();
    el.move_to(pt(5.0, -5.0));
    assert_eq!(el.points, Some(vec![5.0, -5.0, 15.0, 15.0]));
    assert_eq!((el.x, el.y), (5.0, -5.0));
}

#[test]
fn patch_updates_player_fields() {
    let mut el = Element::player(pt(0.0, 0.0), "A", Team::Blue);
    el.apply_patch(&ElementPatch {
        x: Some(40.0),
        position: Some("LSM".into()),
        team: Some(Team::Red),
        ..Default::default()
    });
    assert_eq!((el.x, el.y), (40.0, 0.0));
    assert_eq!(el.position.as_deref(), Some("LSM"));
    assert_eq!(el.team, Some(Team::Red));
}

#[test]
fn patch_ignores_fields_for_other_kinds() {
    let mut el = Element::ball(pt(0.0, 0.0));
    el.apply_patch(&ElementPatch { text: Some("nope".into()), team: Some(Team::Red), ..Default::default() });
    assert!(el.text.is_none());
    assert!(el.team.is_none());
}

#[test]
fn index_of_finds_by_id() {
    let elements = vec![Element::ball(pt(0.0, 0.0)), Element::text(pt(0.0, 0.0), "x")];
    assert_eq!(index_of(&elements, &elements[1].id), Some(1));
    assert_eq!(index_of(&elements, "missing"), None);
}

// =============================================================
// default_lineup
// =============================================================

#[test]
fn default_lineup_has_ten_per_side_and_a_ball() {
    let lineup = default_lineup();
    let count = |team| {
        lineup
            .iter()
            .filter(|el| el.kind == ElementKind::Player && el.team == Some(team))
            .count()
    };
    assert_eq!(count(Team::Blue), 10);
    assert_eq!(count(Team::Red), 10);
    assert_eq!(lineup.iter().filter(|el| el.kind == ElementKind::Ball).count(), 1);
}

#[test]
fn default_lineup_ids_are_unique_and_on_field() {
    let lineup = default_lineup();
    let ids: HashSet<_> = lineup.iter().map(|el| el.id.as_str()).collect();
    assert_eq!(ids.len(), lineup.len());
    for el in &lineup {
        assert!((0.0..=FIELD_WIDTH).contains(&el.x));
        assert!((0.0..=FIELD_HEIGHT).contains(&el.y));
    }
}

#[test]
fn default_lineup_players_do_not_overlap() {
    let players: Vec<_> = default_lineup().into_iter().filter(|el| el.kind == ElementKind::Player).collect();
    for (i, a) in players.iter().enumerate() {
        for b in &players[i + 1..] {
            let d = crate::geometry::distance(a.position_point(), b.position_point());
            assert!(d > PLAYER_RADIUS * 2.0, "{a:?} overlaps {b:?}");
        }
    }
}
