//! Input model: tools, keys, and the gesture state machine.
//!
//! `Tool` captures the user's intent at the time of a pointer event.
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying everything needed to show transient feedback and to
//! emit a single history entry on release. `Prompt` is an outstanding
//! request to the host (text entry, clear confirmation) that must be
//! resolved before the next gesture starts.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{Element, ElementId, ElementKind, Team};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    /// Select and drag elements (default).
    #[default]
    Select,
    /// Place a player.
    Player,
    /// Place the ball.
    Ball,
    /// Draw a movement arrow.
    MoveArrow,
    /// Draw a pass arrow.
    PassArrow,
    /// Draw a shot arrow.
    ShootArrow,
    /// Place a text label.
    Text,
    /// Delete the element under the pointer.
    Eraser,
    /// Remove everything after confirmation.
    Clear,
}

impl Tool {
    /// The element kind an arrow tool draws, if this is an arrow tool.
    #[must_use]
    pub fn arrow_kind(self) -> Option<ElementKind> {
        match self {
            Self::MoveArrow => Some(ElementKind::MoveArrow),
            Self::PassArrow => Some(ElementKind::PassArrow),
            Self::ShootArrow => Some(ElementKind::ShootArrow),
            _ => None,
        }
    }

    /// Whether this tool draws an arrow.
    #[must_use]
    pub fn is_arrow(self) -> bool {
        self.arrow_kind().is_some()
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
    /// Label given to newly placed players.
    pub custom_position: String,
    /// Team given to newly placed players.
    pub team: Team,
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: Tool::Select, selected_id: None, custom_position: "A".to_owned(), team: Team::Blue }
    }
}

/// Outstanding request to the host that blocks new gestures until resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Ask for label text; the label is placed at `at` on success.
    Text {
        /// Field point where the text tool was clicked.
        at: Point,
    },
    /// Ask whether to remove every element.
    ConfirmClear,
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to show feedback and
/// emit the final edit on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an existing element.
    DraggingElement {
        /// Id of the element being dragged.
        id: ElementId,
        /// Pointer minus element position at pointer-down.
        offset: Point,
        /// Working copy of the collection with the element at its current
        /// drag position. Becomes one history entry on release.
        working: Vec<Element>,
        /// Whether any pointer-move changed the element's position.
        moved: bool,
    },
    /// The user is drawing a new arrow.
    DrawingArrow {
        /// Arrow variant being drawn.
        kind: ElementKind,
        /// Field point where the gesture started.
        start: Point,
        /// Latest pointer position, for the preview.
        current: Point,
    },
}
