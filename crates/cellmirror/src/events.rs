//! Inbound notifications from the rendering surface.
//!
//! The surface raises DOM `CustomEvent`s; [`GraphEvent::from_dom`] decodes the event name and
//! its `detail` payload into a typed event, and [`EventListeners`] fans it out to subscribers.

use cellmirror_core::wire::vertices_from_json;
use cellmirror_core::{CellType, Error, Result, Vertex};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CellSelected,
    CellUnselected,
    CellRemoved,
    NodeMoved,
    NodeChanged,
    BackgroundChanged,
    BackgroundResized,
    EdgeCreated,
    EdgeChanged,
    EdgeDblClick,
    BtnRemoveClicked,
    GraphCreated,
    GraphLoading,
    GraphLoaded,
    GraphCleaned,
    GraphRefreshed,
    BringToFront,
    SendToBack,
}

impl EventKind {
    pub const ALL: [EventKind; 18] = [
        Self::CellSelected,
        Self::CellUnselected,
        Self::CellRemoved,
        Self::NodeMoved,
        Self::NodeChanged,
        Self::BackgroundChanged,
        Self::BackgroundResized,
        Self::EdgeCreated,
        Self::EdgeChanged,
        Self::EdgeDblClick,
        Self::BtnRemoveClicked,
        Self::GraphCreated,
        Self::GraphLoading,
        Self::GraphLoaded,
        Self::GraphCleaned,
        Self::GraphRefreshed,
        Self::BringToFront,
        Self::SendToBack,
    ];

    /// DOM event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CellSelected => "cell-selected",
            Self::CellUnselected => "cell-unselected",
            Self::CellRemoved => "cell-removed",
            Self::NodeMoved => "node-moved",
            Self::NodeChanged => "node-changed",
            Self::BackgroundChanged => "background-changed",
            Self::BackgroundResized => "background-resized",
            Self::EdgeCreated => "edge-created",
            Self::EdgeChanged => "edge-changed",
            Self::EdgeDblClick => "edge-dblclick",
            Self::BtnRemoveClicked => "btn-remove-clicked",
            Self::GraphCreated => "graph-created",
            Self::GraphLoading => "graph-loading",
            Self::GraphLoaded => "graph-loaded",
            Self::GraphCleaned => "graph-cleaned",
            Self::GraphRefreshed => "graph-refreshed",
            Self::BringToFront => "bring-to-front",
            Self::SendToBack => "send-to-back",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    CellSelected {
        id: String,
        cell_type: Option<CellType>,
        number_cells: u32,
    },
    CellUnselected {
        id: String,
        state: String,
    },
    CellRemoved {
        id: String,
        cell_type: Option<CellType>,
    },
    NodeMoved {
        id: String,
        x: f64,
        y: f64,
    },
    NodeChanged {
        id: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        new_label: String,
    },
    BackgroundChanged {
        id: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    BackgroundResized {
        id: String,
        width: f64,
        height: f64,
    },
    EdgeCreated {
        id: String,
        source: String,
        target: String,
    },
    EdgeChanged {
        id: String,
        source: String,
        target: String,
        vertices: Vec<Vertex>,
    },
    EdgeDblClick {
        id: String,
        source: String,
        target: String,
    },
    BtnRemoveClicked {
        id: String,
    },
    GraphCreated {
        status: String,
    },
    GraphLoading {
        status: String,
    },
    GraphLoaded {
        status: String,
    },
    GraphCleaned {
        state: String,
    },
    GraphRefreshed {
        state: String,
    },
    BringToFront {
        id: String,
        z_index: i32,
    },
    SendToBack {
        id: String,
        z_index: i32,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CellDetail {
    id: String,
    cell_type: String,
    type_cell: String,
    number_cells: u32,
    state: String,
    z_index: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct NodeDetail {
    id: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    new_label: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EdgeDetail {
    id: String,
    id_source: String,
    id_target: String,
    /// JSON-encoded vertex array.
    vertices: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Detail {
    cell: CellDetail,
    node: NodeDetail,
    edge: EdgeDetail,
    id: String,
    status: String,
    state: String,
}

impl GraphEvent {
    /// Decodes a DOM event `name` and its `detail` object.
    ///
    /// Missing detail fields take empty/zero values; an unknown name is an error.
    pub fn from_dom(name: &str, detail: &Value) -> Result<Self> {
        let kind = EventKind::parse(name).ok_or_else(|| Error::UnknownEvent {
            name: name.to_string(),
        })?;
        let detail = if detail.is_null() {
            Detail::default()
        } else {
            Detail::deserialize(detail)?
        };
        let Detail {
            cell,
            node,
            edge,
            id,
            status,
            state,
        } = detail;

        let event = match kind {
            EventKind::CellSelected => Self::CellSelected {
                cell_type: CellType::parse(&cell.cell_type),
                id: cell.id,
                number_cells: cell.number_cells,
            },
            EventKind::CellUnselected => Self::CellUnselected {
                id: cell.id,
                state: cell.state,
            },
            EventKind::CellRemoved => Self::CellRemoved {
                cell_type: CellType::parse(&cell.type_cell),
                id: cell.id,
            },
            EventKind::NodeMoved => Self::NodeMoved {
                id: node.id,
                x: node.x,
                y: node.y,
            },
            EventKind::NodeChanged => Self::NodeChanged {
                id: node.id,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                new_label: node.new_label,
            },
            EventKind::BackgroundChanged => Self::BackgroundChanged {
                id: node.id,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
            },
            EventKind::BackgroundResized => Self::BackgroundResized {
                id: node.id,
                width: node.width,
                height: node.height,
            },
            EventKind::EdgeCreated => Self::EdgeCreated {
                id: edge.id,
                source: edge.id_source,
                target: edge.id_target,
            },
            EventKind::EdgeChanged => {
                let vertices = if edge.vertices.trim().is_empty() {
                    Vec::new()
                } else {
                    vertices_from_json(&edge.vertices)?
                };
                Self::EdgeChanged {
                    id: edge.id,
                    source: edge.id_source,
                    target: edge.id_target,
                    vertices,
                }
            }
            EventKind::EdgeDblClick => Self::EdgeDblClick {
                id: edge.id,
                source: edge.id_source,
                target: edge.id_target,
            },
            EventKind::BtnRemoveClicked => Self::BtnRemoveClicked { id },
            EventKind::GraphCreated => Self::GraphCreated { status },
            EventKind::GraphLoading => Self::GraphLoading { status },
            EventKind::GraphLoaded => Self::GraphLoaded { status },
            EventKind::GraphCleaned => Self::GraphCleaned { state },
            EventKind::GraphRefreshed => Self::GraphRefreshed { state },
            EventKind::BringToFront => Self::BringToFront {
                id: cell.id,
                z_index: cell.z_index,
            },
            EventKind::SendToBack => Self::SendToBack {
                id: cell.id,
                z_index: cell.z_index,
            },
        };
        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::CellSelected { .. } => EventKind::CellSelected,
            Self::CellUnselected { .. } => EventKind::CellUnselected,
            Self::CellRemoved { .. } => EventKind::CellRemoved,
            Self::NodeMoved { .. } => EventKind::NodeMoved,
            Self::NodeChanged { .. } => EventKind::NodeChanged,
            Self::BackgroundChanged { .. } => EventKind::BackgroundChanged,
            Self::BackgroundResized { .. } => EventKind::BackgroundResized,
            Self::EdgeCreated { .. } => EventKind::EdgeCreated,
            Self::EdgeChanged { .. } => EventKind::EdgeChanged,
            Self::EdgeDblClick { .. } => EventKind::EdgeDblClick,
            Self::BtnRemoveClicked { .. } => EventKind::BtnRemoveClicked,
            Self::GraphCreated { .. } => EventKind::GraphCreated,
            Self::GraphLoading { .. } => EventKind::GraphLoading,
            Self::GraphLoaded { .. } => EventKind::GraphLoaded,
            Self::GraphCleaned { .. } => EventKind::GraphCleaned,
            Self::GraphRefreshed { .. } => EventKind::GraphRefreshed,
            Self::BringToFront { .. } => EventKind::BringToFront,
            Self::SendToBack { .. } => EventKind::SendToBack,
        }
    }
}

type Listener = Box<dyn FnMut(&GraphEvent)>;

/// Handle returned by [`EventListeners::add`]; pass it to [`EventListeners::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Registration(u64);

#[derive(Default)]
pub struct EventListeners {
    next_id: u64,
    listeners: Vec<(u64, EventKind, Listener)>,
}

impl std::fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListeners")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: EventKind, listener: impl FnMut(&GraphEvent) + 'static) -> Registration {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        Registration(id)
    }

    /// Returns `false` if the registration was already removed.
    pub fn remove(&mut self, registration: Registration) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _, _)| *id != registration.0);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every listener registered for the event's kind, in registration order.
    /// Returns how many were called.
    pub fn emit(&mut self, event: &GraphEvent) -> usize {
        let kind = event.kind();
        let mut called = 0;
        for (_, _, listener) in self.listeners.iter_mut().filter(|(_, k, _)| *k == kind) {
            listener(event);
            called += 1;
        }
        tracing::trace!(event = kind.as_str(), listeners = called, "emit");
        called
    }
}
