//! Document model: play elements and their construction rules.
//!
//! This module defines the one domain entity drawn on the field (`Element`),
//! its discriminant (`ElementKind`), team colors, and a sparse-update type for
//! edits (`ElementPatch`). Collections are plain `Vec<Element>` in insertion
//! order; later elements draw on top of earlier ones.
//!
//! Data flows into this layer from snapshots (JSON deserialization, checked
//! by [`crate::schema`]) and from the input engine (constructors below).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{
    ARROW_HIT_THRESHOLD, BALL_RADIUS, FIELD_HEIGHT, FIELD_WIDTH, PLAYER_RADIUS, TEXT_HIT_HEIGHT, TEXT_HIT_WIDTH,
};
use crate::geometry::{point_in_circle, point_in_rect, point_near_segment};

/// Opaque identifier for an element. Unique within a collection.
pub type ElementId = String;

/// The kind of a play element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// A player marker drawn as a team-colored circle with a position label.
    Player,
    /// The ball.
    Ball,
    /// Player movement (solid arrow).
    MoveArrow,
    /// Pass (dashed arrow).
    PassArrow,
    /// Shot on goal.
    ShootArrow,
    /// Free text label.
    Text,
}

impl ElementKind {
    /// Every kind, in wire order.
    pub const ALL: [ElementKind; 6] = [
        Self::Player,
        Self::Ball,
        Self::MoveArrow,
        Self::PassArrow,
        Self::ShootArrow,
        Self::Text,
    ];

    /// Whether this kind is one of the three arrow variants.
    #[must_use]
    pub fn is_arrow(self) -> bool {
        matches!(self, Self::MoveArrow | Self::PassArrow | Self::ShootArrow)
    }

    /// The wire name used in the `type` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Ball => "ball",
            Self::MoveArrow => "moveArrow",
            Self::PassArrow => "passArrow",
            Self::ShootArrow => "shootArrow",
            Self::Text => "text",
        }
    }

    /// Parse a wire name. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

/// Player team color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Blue,
    Red,
}

impl Team {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "blue" => Some(Self::Blue),
            "red" => Some(Self::Red),
            _ => None,
        }
    }
}

/// One placed or drawn object on the field, as stored and sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier, assigned at creation.
    pub id: ElementId,
    /// Element variant.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Field x coordinate. For arrows, the start point.
    pub x: f64,
    /// Field y coordinate. For arrows, the start point.
    pub y: f64,
    /// `[x1, y1, x2, y2]` for arrow kinds only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    /// Position label for players ("A", "M", "D", "G", or custom).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Team color for players.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    /// Label contents for text elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

fn new_id() -> ElementId {
    Uuid::new_v4().to_string()
}

impl Element {
    fn bare(kind: ElementKind, at: Point) -> Self {
        Self { id: new_id(), kind, x: at.x, y: at.y, points: None, position: None, team: None, text: None }
    }

    /// A player at `at` with a position label and team.
    #[must_use]
    pub fn player(at: Point, position: impl Into<String>, team: Team) -> Self {
        Self { position: Some(position.into()), team: Some(team), ..Self::bare(ElementKind::Player, at) }
    }

    /// The ball at `at`.
    #[must_use]
    pub fn ball(at: Point) -> Self {
        Self::bare(ElementKind::Ball, at)
    }

    /// An arrow from `start` to `end`. Returns `None` if `kind` is not an arrow kind.
    #[must_use]
    pub fn arrow(kind: ElementKind, start: Point, end: Point) -> Option<Self> {
        if !kind.is_arrow() {
            return None;
        }
        Some(Self { points: Some(vec![start.x, start.y, end.x, end.y]), ..Self::bare(kind, start) })
    }

    /// A text label anchored at `at`.
    #[must_use]
    pub fn text(at: Point, text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Self::bare(ElementKind::Text, at) }
    }

    /// The element's anchor position.
    #[must_use]
    pub fn position_point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Start and end of an arrow, read from the first four finite `points`.
    #[must_use]
    pub fn arrow_endpoints(&self) -> Option<(Point, Point)> {
        if !self.kind.is_arrow() {
            return None;
        }
        match self.points.as_deref() {
            Some([x1, y1, x2, y2, ..]) if [x1, y1, x2, y2].iter().all(|v| v.is_finite()) => {
                Some((Point::new(*x1, *y1), Point::new(*x2, *y2)))
            }
            _ => None,
        }
    }

    /// Move the element so its anchor lands on `to`. Arrows carry their
    /// points along so the shaft keeps its shape.
    pub fn move_to(&mut self, to: Point) {
        let dx = to.x - self.x;
        let dy = to.y - self.y;
        self.x = to.x;
        self.y = to.y;
        if self.kind.is_arrow() {
            if let Some(points) = self.points.as_mut() {
                for (i, v) in points.iter_mut().enumerate() {
                    *v += if i % 2 == 0 { dx } else { dy };
                }
            }
        }
    }

    /// Whether the field point `p` lands on this element.
    #[must_use]
    pub fn hit(&self, p: Point) -> bool {
        match self.kind {
            ElementKind::Player => point_in_circle(p, self.position_point(), PLAYER_RADIUS),
            ElementKind::Ball => point_in_circle(p, self.position_point(), BALL_RADIUS),
            ElementKind::MoveArrow | ElementKind::PassArrow | ElementKind::ShootArrow => self
                .arrow_endpoints()
                .is_some_and(|(a, b)| point_near_segment(p, a, b, ARROW_HIT_THRESHOLD)),
            ElementKind::Text => point_in_rect(p, self.position_point(), TEXT_HIT_WIDTH, TEXT_HIT_HEIGHT),
        }
    }

    /// Apply a sparse update. Fields that do not apply to this kind are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            let y = patch.y.unwrap_or(self.y);
            self.move_to(Point::new(x, y));
        } else if let Some(y) = patch.y {
            self.move_to(Point::new(self.x, y));
        }
        if self.kind == ElementKind::Player {
            if let Some(ref position) = patch.position {
                self.position = Some(position.clone());
            }
            if let Some(team) = patch.team {
                self.team = Some(team);
            }
        }
        if self.kind == ElementKind::Text {
            if let Some(ref text) = patch.text {
                self.text = Some(text.clone());
            }
        }
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Index of the element with `id`, if present.
#[must_use]
pub fn index_of(elements: &[Element], id: &str) -> Option<usize> {
    elements.iter().position(|el| el.id == id)
}

const LINEUP_POSITIONS: [(&str, f64); 10] = [
    ("G", 0.06),
    ("D", 0.2),
    ("D", 0.2),
    ("D", 0.2),
    ("M", 0.4),
    ("M", 0.4),
    ("M", 0.4),
    ("A", 0.75),
    ("A", 0.75),
    ("A", 0.75),
];

/// Starting content for a new play: ten players per side and the ball at
/// center field. Blue attacks to the right, red mirrors it.
#[must_use]
pub fn default_lineup() -> Vec<Element> {
    let mut elements = Vec::with_capacity(21);
    for team in [Team::Blue, Team::Red] {
        let mut lane = 0_u8;
        let mut last_position = "";
        for (position, depth) in LINEUP_POSITIONS {
            lane = if position == last_position { lane + 1 } else { 0 };
            last_position = position;

            let along = FIELD_WIDTH * depth;
            let x = match team {
                Team::Blue => along,
                Team::Red => FIELD_WIDTH - along,
            };
            let y = if position == "G" {
                FIELD_HEIGHT / 2.0
            } else {
                FIELD_HEIGHT * (0.25 + 0.25 * f64::from(lane))
            };
            elements.push(Element::player(Point::new(x, y), position, team));
        }
    }
    elements.push(Element::ball(Point::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0)));
    elements
}
