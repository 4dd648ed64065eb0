use web_sys::HtmlCanvasElement;

use crate::animate::{Playback, animate};
use crate::camera::{Camera, Point};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, MIN_ARROW_DELTA};
use crate::doc::{Element, ElementId, ElementPatch, Team, index_of};
use crate::history::History;
use crate::input::{InputState, Key, Prompt, Tool, UiState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Id carried by the transient arrow shown while drawing.
pub const PREVIEW_ID: &str = "preview";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The authoritative collection changed (one history entry was added or
    /// undo/redo moved through the stack). Hosts persist on this.
    ElementsChanged,
    SelectionChanged(Option<ElementId>),
    ToolChanged(Tool),
    /// Ask the user for label text, then call [`EngineCore::resolve_text`].
    TextPromptRequested { at: Point },
    /// Ask the user to confirm, then call [`EngineCore::resolve_clear`].
    ClearConfirmRequested,
    RenderNeeded,
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub history: History,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub prompt: Option<Prompt>,
    pub playback: Playback,
    pub play_name: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            history: History::default(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            prompt: None,
            playback: Playback::default(),
            play_name: String::new(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Open a play: install its elements with an empty undo history.
    pub fn open_play(&mut self, elements: Vec<Element>, name: impl Into<String>) {
        self.history.reset(elements);
        self.play_name = name.into();
        self.ui.selected_id = None;
        self.input = InputState::Idle;
        self.prompt = None;
        self.playback.reset();
    }

    /// Replace the collection as one undoable edit.
    pub fn load_elements(&mut self, elements: Vec<Element>) -> Vec<Action> {
        self.input = InputState::Idle;
        let mut actions = self.commit(elements);
        actions.extend(self.reconcile_selection());
        actions
    }

    // --- Tool / settings ---

    /// Set the active tool. Any gesture in progress is abandoned.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.input = InputState::Idle;
        if self.ui.tool == tool {
            return Vec::new();
        }
        self.ui.tool = tool;
        vec![Action::ToolChanged(tool), Action::RenderNeeded]
    }

    /// Label given to players placed from now on.
    pub fn set_custom_position(&mut self, position: impl Into<String>) {
        self.ui.custom_position = position.into();
    }

    /// Team given to players placed from now on.
    pub fn set_team(&mut self, team: Team) {
        self.ui.team = team;
    }

    // --- Edits ---

    /// Step back one edit.
    pub fn undo(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        if !self.history.undo() {
            return Vec::new();
        }
        let mut actions = vec![Action::ElementsChanged, Action::RenderNeeded];
        actions.extend(self.reconcile_selection());
        actions
    }

    /// Re-apply the last undone edit.
    pub fn redo(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        if !self.history.redo() {
            return Vec::new();
        }
        let mut actions = vec![Action::ElementsChanged, Action::RenderNeeded];
        actions.extend(self.reconcile_selection());
        actions
    }

    /// Remove the selected element, if any.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id.clone() else {
            return Vec::new();
        };
        let Some(i) = index_of(self.history.present(), &id) else {
            return Vec::new();
        };
        let mut next = self.history.present().to_vec();
        next.remove(i);
        let mut actions = self.commit(next);
        actions.extend(self.reconcile_selection());
        actions
    }

    /// Apply a sparse update to one element as a single edit.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> Vec<Action> {
        let Some(i) = index_of(self.history.present(), id) else {
            return Vec::new();
        };
        let mut next = self.history.present().to_vec();
        next[i].apply_patch(patch);
        if next[i] == self.history.present()[i] {
            return Vec::new();
        }
        self.commit(next)
    }

    /// Finish a text prompt. `None` or blank text cancels without editing.
    pub fn resolve_text(&mut self, text: Option<String>) -> Vec<Action> {
        let at = match self.prompt.take() {
            Some(Prompt::Text { at }) => at,
            other => {
                self.prompt = other;
                return Vec::new();
            }
        };
        match text {
            Some(text) if !text.trim().is_empty() => self.add(Element::text(at, text)),
            _ => Vec::new(),
        }
    }

    /// Finish a clear confirmation. The tool reverts to select either way.
    pub fn resolve_clear(&mut self, confirmed: bool) -> Vec<Action> {
        match self.prompt.take() {
            Some(Prompt::ConfirmClear) => {}
            other => {
                self.prompt = other;
                return Vec::new();
            }
        }
        let mut actions = Vec::new();
        if confirmed && !self.history.present().is_empty() {
            actions.extend(self.commit(Vec::new()));
            actions.extend(self.reconcile_selection());
        }
        actions.extend(self.set_tool(Tool::Select));
        actions
    }

    // --- Input events ---

    /// Handle pointer-down at a screen point.
    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.prompt.is_some() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);
        let mut actions = self.settle_gesture();

        if let Some(kind) = self.ui.tool.arrow_kind() {
            self.input = InputState::DrawingArrow { kind, start: world, current: world };
            actions.push(Action::RenderNeeded);
            return actions;
        }

        let started = match self.ui.tool {
            Tool::Select => self.select_at(world),
            Tool::Eraser => self.erase_at(world),
            Tool::Player => {
                let player = Element::player(world, self.ui.custom_position.clone(), self.ui.team);
                self.add(player)
            }
            Tool::Ball => self.add(Element::ball(world)),
            Tool::Text => {
                self.prompt = Some(Prompt::Text { at: world });
                vec![Action::TextPromptRequested { at: world }]
            }
            Tool::Clear => {
                self.prompt = Some(Prompt::ConfirmClear);
                vec![Action::ClearConfirmRequested]
            }
            Tool::MoveArrow | Tool::PassArrow | Tool::ShootArrow => Vec::new(),
        };
        actions.extend(started);
        actions
    }

    /// Close out a gesture whose pointer-up never arrived. A drag that moved
    /// is committed as-is; anything else is dropped.
    fn settle_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::DraggingElement { working, moved: true, .. } => self.commit(working),
            InputState::DraggingElement { .. } | InputState::DrawingArrow { .. } => vec![Action::RenderNeeded],
            InputState::Idle => Vec::new(),
        }
    }

    /// Handle pointer-move at a screen point.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::DraggingElement { id, offset, working, moved } => {
                let Some(i) = index_of(working, id) else {
                    return Vec::new();
                };
                let target = world - *offset;
                if working[i].position_point() == target {
                    return Vec::new();
                }
                working[i].move_to(target);
                *moved = true;
                vec![Action::RenderNeeded]
            }
            InputState::DrawingArrow { current, .. } => {
                *current = world;
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Handle pointer-up at a screen point.
    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DraggingElement { working, moved, .. } => {
                if moved {
                    self.commit(working)
                } else {
                    Vec::new()
                }
            }
            InputState::DrawingArrow { kind, start, .. } => {
                let long_enough =
                    (world.x - start.x).abs() > MIN_ARROW_DELTA || (world.y - start.y).abs() > MIN_ARROW_DELTA;
                match Element::arrow(kind, start, world) {
                    Some(arrow) if long_enough => self.add(arrow),
                    _ => vec![Action::RenderNeeded],
                }
            }
        }
    }

    /// Handle a key press.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "Escape" => {
                self.input = InputState::Idle;
                let mut actions = vec![Action::RenderNeeded];
                if self.ui.selected_id.take().is_some() {
                    actions.push(Action::SelectionChanged(None));
                }
                actions
            }
            _ => Vec::new(),
        }
    }

    /// Advance animation playback by `dt_secs`.
    pub fn tick(&mut self, dt_secs: f64) -> Vec<Action> {
        if self.playback.tick(dt_secs) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Queries ---

    /// The collection to draw, including an element mid-drag.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        match &self.input {
            InputState::DraggingElement { working, .. } => working,
            _ => self.history.present(),
        }
    }

    /// The collection to draw with animation playback applied.
    #[must_use]
    pub fn render_elements(&self) -> Vec<Element> {
        animate(self.elements(), self.playback.progress())
    }

    /// Transient arrow following the pointer while an arrow tool is dragging.
    #[must_use]
    pub fn preview_arrow(&self) -> Option<Element> {
        let InputState::DrawingArrow { kind, start, current } = &self.input else {
            return None;
        };
        let mut arrow = Element::arrow(*kind, *start, *current)?;
        arrow.id = PREVIEW_ID.to_owned();
        Some(arrow)
    }

    /// The currently selected element id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_id.as_deref()
    }

    /// The pending host prompt, if any.
    #[must_use]
    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    // --- Internals ---

    fn commit(&mut self, next: Vec<Element>) -> Vec<Action> {
        self.history.push(next);
        vec![Action::ElementsChanged, Action::RenderNeeded]
    }

    fn add(&mut self, element: Element) -> Vec<Action> {
        let mut next = self.history.present().to_vec();
        next.push(element);
        self.commit(next)
    }

    fn select_at(&mut self, world: Point) -> Vec<Action> {
        let present = self.history.present();
        let Some(i) = present.iter().rposition(|el| el.hit(world)) else {
            self.input = InputState::Idle;
            return match self.ui.selected_id.take() {
                Some(_) => vec![Action::SelectionChanged(None), Action::RenderNeeded],
                None => Vec::new(),
            };
        };

        let id = present[i].id.clone();
        let offset = world - present[i].position_point();
        let working = present.to_vec();
        self.input = InputState::DraggingElement { id: id.clone(), offset, working, moved: false };

        let mut actions = Vec::new();
        if self.ui.selected_id.as_deref() != Some(id.as_str()) {
            self.ui.selected_id = Some(id.clone());
            actions.push(Action::SelectionChanged(Some(id)));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn erase_at(&mut self, world: Point) -> Vec<Action> {
        let Some(i) = self.history.present().iter().position(|el| el.hit(world)) else {
            return Vec::new();
        };
        let mut next = self.history.present().to_vec();
        next.remove(i);
        let mut actions = self.commit(next);
        actions.extend(self.reconcile_selection());
        actions
    }

    /// Drop the selection if its element no longer exists.
    fn reconcile_selection(&mut self) -> Option<Action> {
        let id = self.ui.selected_id.as_deref()?;
        if index_of(self.history.present(), id).is_some() {
            return None;
        }
        self.ui.selected_id = None;
        Some(Action::SelectionChanged(None))
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    // --- Viewport ---

    /// Resize the backing store for the given CSS size and device pixel
    /// ratio, then fit the field into it.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        let dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
        self.core.camera.fit(width_css, height_css, FIELD_WIDTH, FIELD_HEIGHT);
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt)
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn resolve_text(&mut self, text: Option<String>) -> Vec<Action> {
        self.core.resolve_text(text)
    }

    pub fn resolve_clear(&mut self, confirmed: bool) -> Vec<Action> {
        self.core.resolve_clear(confirmed)
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.core.undo()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.core.redo()
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn render_elements(&self) -> Vec<Element> {
        self.core.render_elements()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.core.selection()
    }
}
