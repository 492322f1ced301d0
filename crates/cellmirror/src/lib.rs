#![forbid(unsafe_code)]

//! `cellmirror` keeps an authoritative, server-side copy of a diagram drawn in a browser.
//!
//! The [`GraphRegistry`] owns the nodes, text labels, edges and background, and pushes every
//! change to the rendering surface through a [`RenderChannel`]. Notifications coming back from
//! the surface are decoded into [`GraphEvent`]s.
//!
//! The model types are re-exported from `cellmirror-core`.

pub use cellmirror_core::*;

pub mod channel;
pub mod events;
pub mod registry;

pub use channel::{NullChannel, RecordingChannel, RenderChannel, RenderCommand};
pub use events::{EventKind, EventListeners, GraphEvent, Registration};
pub use registry::GraphRegistry;

#[cfg(test)]
mod tests;
