//! Editing engine for lacrosse play diagrams.
//!
//! The crate owns everything about a play except drawing pixels: the element
//! model, hit-testing, undo/redo, the pointer/keyboard state machine that turns
//! raw input into document edits, the arrow-driven playback interpolator, and
//! the persistence adapters (local snapshots, file export/import, and the REST
//! client). It compiles natively for tests and the CLI, and to WebAssembly for
//! the browser, where the host layer wires DOM events to the engine and paints
//! [`engine::EngineCore::render_elements`] after every
//! [`engine::Action::RenderNeeded`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Element model, default lineup, and patches |
//! | [`schema`] | Validation of untrusted element JSON |
//! | [`history`] | Snapshot-based undo/redo |
//! | [`input`] | Tools, UI state, and the gesture state machine |
//! | [`geometry`] | Distance and hit-testing primitives |
//! | [`camera`] | Field-to-viewport fitting and coordinate conversions |
//! | [`animate`] | Playback clock and arrow-driven interpolation |
//! | [`persist`] | Key-value snapshots and file export/import |
//! | [`remote`] | REST client for folders and plays, save sequencing |
//! | [`consts`] | Field size, hit radii, and other shared constants |

pub mod animate;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod history;
pub mod input;
pub mod persist;
pub mod remote;
pub mod schema;
