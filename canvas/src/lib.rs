//! Canvas engine for the infinite note board.
//!
//! This crate owns everything that happens between raw input and persisted
//! note geometry: the pan/zoom camera, the gesture state machine that turns
//! pointer, wheel, and key events into note mutations, the auto-arrange
//! packer, and the minimap projection. It performs no I/O. Hosts feed it
//! events and persist the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`] and the actions it emits |
//! | [`doc`] | In-memory note store and note types |
//! | [`camera`] | Pan/zoom viewport transform |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing notes and resize handles |
//! | [`arrange`] | Overlap-free auto-arrange packer |
//! | [`minimap`] | Fit-to-box overview projection |
//! | [`render`] | Serializable per-frame scene snapshot |
//! | [`geom`] | Points and rectangles |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod arrange;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod minimap;
pub mod render;
