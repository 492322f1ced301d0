//! One-way command interface to the rendering surface.
//!
//! The registry never gets a reply: a command is dispatched and forgotten. Implementations
//! decide how commands reach the surface (websocket frame, JS bridge, test recorder, ...).

use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    DrawNode(Value),
    DrawText(Value),
    DrawBackground(Value),
    DrawEdge(Value),
    RemoveCell {
        id: String,
    },
    RemoveBackground,
    CleanGraph,
    SetParent {
        parent_id: String,
        child_id: String,
    },
    SetNodeStyle {
        id: String,
        style: String,
        value: String,
    },
    SetEdgeStyle {
        id: String,
        style: String,
        value: String,
    },
    SetEdgeLabelStyle {
        id: String,
        style: String,
        value: String,
        label_pos: usize,
    },
    ChangeNodeLabel {
        node_id: String,
        text: String,
    },
    SelectCell {
        id: String,
    },
    UnselectCell {
        id: String,
    },
    ShowNode {
        id: String,
    },
    HideNode {
        id: String,
    },
    CenterGraph {
        id: String,
    },
    RefreshGraph,
}

impl RenderCommand {
    /// Function name invoked on the surface.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DrawNode(_) => "drawNode",
            Self::DrawText(_) => "drawText",
            Self::DrawBackground(_) => "drawBackground",
            Self::DrawEdge(_) => "drawEdge",
            Self::RemoveCell { .. } => "removeCell",
            Self::RemoveBackground => "removeBackground",
            Self::CleanGraph => "cleanGraph",
            Self::SetParent { .. } => "setParent",
            Self::SetNodeStyle { .. } => "setNodeStyle",
            Self::SetEdgeStyle { .. } => "setEdgeStyle",
            Self::SetEdgeLabelStyle { .. } => "setEdgeLabelStyle",
            Self::ChangeNodeLabel { .. } => "changeNodeLabel",
            Self::SelectCell { .. } => "selectCell",
            Self::UnselectCell { .. } => "unselectCell",
            Self::ShowNode { .. } => "showNode",
            Self::HideNode { .. } => "hideNode",
            Self::CenterGraph { .. } => "centerGraph",
            Self::RefreshGraph => "refreshGraph",
        }
    }

    /// Positional arguments; draw payloads travel as serialized JSON strings.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::DrawNode(payload)
            | Self::DrawText(payload)
            | Self::DrawBackground(payload)
            | Self::DrawEdge(payload) => vec![Value::String(payload.to_string())],
            Self::RemoveCell { id }
            | Self::SelectCell { id }
            | Self::UnselectCell { id }
            | Self::ShowNode { id }
            | Self::HideNode { id }
            | Self::CenterGraph { id } => vec![json!(id)],
            Self::RemoveBackground | Self::CleanGraph | Self::RefreshGraph => Vec::new(),
            Self::SetParent {
                parent_id,
                child_id,
            } => vec![json!(parent_id), json!(child_id)],
            Self::SetNodeStyle { id, style, value } | Self::SetEdgeStyle { id, style, value } => {
                vec![json!(id), json!(style), json!(value)]
            }
            Self::SetEdgeLabelStyle {
                id,
                style,
                value,
                label_pos,
            } => vec![json!(id), json!(style), json!(value), json!(label_pos)],
            Self::ChangeNodeLabel { node_id, text } => vec![json!(node_id), json!(text)],
        }
    }

    /// Draw payload, when this is a draw command.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::DrawNode(payload)
            | Self::DrawText(payload)
            | Self::DrawBackground(payload)
            | Self::DrawEdge(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "name": self.name(), "args": self.args() })
    }
}

pub trait RenderChannel {
    fn dispatch(&mut self, command: RenderCommand);
}

impl<C: RenderChannel + ?Sized> RenderChannel for &mut C {
    fn dispatch(&mut self, command: RenderCommand) {
        (**self).dispatch(command);
    }
}

impl<C: RenderChannel + ?Sized> RenderChannel for Box<C> {
    fn dispatch(&mut self, command: RenderCommand) {
        (**self).dispatch(command);
    }
}

/// Keeps every dispatched command, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    commands: Vec<RenderCommand>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(RenderCommand::name).collect()
    }

    pub fn take(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderChannel for RecordingChannel {
    fn dispatch(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }
}

/// Drops every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChannel;

impl RenderChannel for NullChannel {
    fn dispatch(&mut self, _command: RenderCommand) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_payload_is_sent_as_json_text() {
        let cmd = RenderCommand::DrawNode(json!({ "id": "n1" }));
        assert_eq!(cmd.name(), "drawNode");
        assert_eq!(cmd.args(), vec![json!(r#"{"id":"n1"}"#)]);
        assert_eq!(cmd.payload(), Some(&json!({ "id": "n1" })));
    }

    #[test]
    fn label_style_command_carries_position() {
        let cmd = RenderCommand::SetEdgeLabelStyle {
            id: "e1".to_string(),
            style: "fontSize".to_string(),
            value: "20".to_string(),
            label_pos: 1,
        };
        assert_eq!(
            cmd.to_json(),
            json!({ "name": "setEdgeLabelStyle", "args": ["e1", "fontSize", "20", 1] })
        );
        assert!(cmd.payload().is_none());
    }

    #[test]
    fn recording_channel_keeps_order() {
        let mut channel = RecordingChannel::new();
        {
            let borrowed: &mut RecordingChannel = &mut channel;
            borrowed.dispatch(RenderCommand::CleanGraph);
        }
        channel.dispatch(RenderCommand::RemoveBackground);
        assert_eq!(channel.names(), vec!["cleanGraph", "removeBackground"]);
        assert_eq!(channel.take().len(), 2);
        assert!(channel.commands().is_empty());
    }

    #[test]
    fn boxed_channels_dispatch() {
        let mut boxed: Box<dyn RenderChannel> = Box::new(NullChannel);
        boxed.dispatch(RenderCommand::RefreshGraph);
        assert_eq!(RenderCommand::RefreshGraph.args(), Vec::<Value>::new());
    }
}
