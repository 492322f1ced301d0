#![forbid(unsafe_code)]

//! Server-side model of a browser-rendered diagram.
//!
//! This crate holds the pieces that have no state of their own:
//! - typed style objects with documented defaults ([`style`])
//! - the cell model: nodes, text nodes, the background, edges ([`cell`])
//! - style reconciliation between typed objects and overlay maps ([`reconcile`])
//! - the canonical wire JSON consumed by the rendering surface ([`wire`])
//!
//! The stateful graph registry lives in the `cellmirror` crate.

pub mod cell;
pub mod config;
pub mod error;
pub mod geom;
pub mod reconcile;
pub mod style;
pub mod text;
pub mod wire;

pub use cell::{Cell, CellCommon, CellType, Edge, EdgeKind, EdgeLabel, Node, NodeKind};
pub use config::MirrorConfig;
pub use error::{Error, Result};
pub use geom::{Geometry, Vertex};
pub use reconcile::{StyleMap, StyleRecord};
pub use style::{EdgeLabelStyles, EdgeStyles, NodeLabelStyles, NodeStyles};
