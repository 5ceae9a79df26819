//! # spark-tree
//!
//! Keyed recursive trees whose leaves propagate their values up to a root.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! root state and the render effect.
//!
//! ## Architecture
//!
//! A tree is a sequence of keyed entries. Each entry is either a leaf holding a
//! string or a composite holding another sequence. Live units mirror that shape:
//!
//! ```text
//! RootHost ── CompositeUnit ─┬─ LeafUnit       (key 1)
//!                            ├─ LeafUnit       (key 2)
//!                            └─ CompositeUnit  (key 3) ─┬─ LeafUnit (key 4)
//!                                                       └─ LeafUnit (key 5)
//! ```
//!
//! Values are rendered down and reported up. When a leaf activates it reports
//! its value doubled; each composite commits the patch to its own copy of the
//! sequence, reports the whole sequence upward and re-renders. The root host
//! writes the final sequence into a signal, and the render effect installed by
//! [`mount`] draws it:
//!
//! ```text
//! leaf report -> composite commit -> ... -> RootHost signal -> render effect
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (NodeValue, Payload, UnitId, Cell)
//! - [`model`] - Validation, JSON projections, seed data
//! - [`engine`] - Unit registry
//! - [`primitives`] - LeafUnit and CompositeUnit
//! - [`pipeline`] - RootHost and the mount effect
//! - [`layout`] - Taffy layout of the tree
//! - [`renderer`] - Frame buffer, painting, terminal output
//! - [`config`] - Command-line configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::TreeError;

pub use config::{Cli, Config};

pub use engine::{get_activation_count, get_allocated_count, is_allocated, reset_registry};

pub use model::{leaf_count, load_seed, parse_seed, seed_data, to_json, validate, values_json};

pub use primitives::{CompositeUnit, LeafUnit, Unit};

pub use pipeline::{mount, render_frame, MountHandle, RootHost, Viewport};

pub use layout::{compute_layout, ComputedLayout};

pub use renderer::{FrameBuffer, FrameSink, MemorySink, RenderMode, TerminalSink};
