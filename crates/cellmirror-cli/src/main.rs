use cellmirror::wire::{edge_from_wire, node_from_wire};
use cellmirror::{EdgeKind, GraphRegistry, MirrorConfig, NodeKind, RecordingChannel, RenderCommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Mirror(cellmirror::Error),
    Json(serde_json::Error),
    Op { index: usize, source: Box<CliError> },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Mirror(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Op { index, source } => write!(f, "op #{index}: {source}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<cellmirror::Error> for CliError {
    fn from(value: cellmirror::Error) -> Self {
        Self::Mirror(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Replay,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    with_state: bool,
    verbose: bool,
    /// `--set path=value` config writes, applied in order.
    config_sets: Vec<(String, Value)>,
}

/// A replayable scene: optional config overrides plus an ordered list of registry operations.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scene {
    config: Option<Value>,
    ops: Vec<Op>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum Op {
    DrawNode {
        node: Value,
    },
    DrawText {
        node: Value,
    },
    DrawBackground {
        node: Value,
    },
    DrawEdge {
        edge: Value,
    },
    DrawEdgeBasic {
        edge: Value,
    },
    Remove {
        id: String,
    },
    RemoveBackground,
    Clean,
    Refresh,
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
        #[serde(default)]
        label_pos: usize,
    },
    ChangeNodeLabel {
        node_id: String,
        text: String,
    },
}

#[derive(Serialize)]
struct ReplayOut<'a> {
    commands: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a Value>,
}

fn usage() -> &'static str {
    "cellmirror-cli\n\
\n\
USAGE:\n\
  cellmirror-cli [replay] [--pretty] [--state] [--verbose] [--set <path>=<value>]... [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the scene is read from stdin.\n\
  - A scene is {\"config\": {...}, \"ops\": [{\"op\": \"drawNode\", \"node\": {...}}, ...]}.\n\
  - Prints {\"commands\": [...]} with every render command dispatched, in order.\n\
  - --state adds the final registry snapshot under \"state\".\n\
  - --set text.margin=4 writes one config path after the scene config; values are JSON or text.\n\
  - Logs go to stderr; RUST_LOG overrides the level (default warn, --verbose: debug).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "replay" => args.command = Command::Replay,
            "--pretty" => args.pretty = true,
            "--state" => args.with_state = true,
            "--verbose" | "-v" => args.verbose = true,
            "--set" => {
                let Some(assignment) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config_sets.push(parse_config_set(assignment)?);
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

/// Splits `path=value`; the value is read as JSON when it parses, else kept as text.
fn parse_config_set(assignment: &str) -> Result<(String, Value), CliError> {
    let Some((path, raw)) = assignment.split_once('=') else {
        return Err(CliError::Usage(usage()));
    };
    let path = path.trim();
    if path.is_empty() {
        return Err(CliError::Usage(usage()));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((path.to_string(), value))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn apply_op(registry: &mut GraphRegistry<RecordingChannel>, op: Op) -> Result<(), CliError> {
    match op {
        Op::DrawNode { node } => {
            registry.draw_node(node_from_wire(NodeKind::Plain, &node)?);
        }
        Op::DrawText { node } => {
            registry.draw_text(node_from_wire(NodeKind::Text, &node)?);
        }
        Op::DrawBackground { node } => {
            registry.draw_background(node_from_wire(NodeKind::Background, &node)?);
        }
        Op::DrawEdge { edge } => {
            registry.draw_edge(edge_from_wire(EdgeKind::Labeled, &edge)?);
        }
        Op::DrawEdgeBasic { edge } => {
            registry.draw_edge(edge_from_wire(EdgeKind::Basic, &edge)?);
        }
        Op::Remove { id } => {
            registry.remove(&id);
        }
        Op::RemoveBackground => registry.remove_background(),
        Op::Clean => registry.clean(),
        Op::Refresh => registry.refresh(),
        Op::SetParent {
            parent_id,
            child_id,
        } => registry.set_parent(&parent_id, &child_id),
        Op::SetNodeStyle { id, style, value } => registry.set_node_style(&id, &style, &value)?,
        Op::SetEdgeStyle { id, style, value } => registry.set_edge_style(&id, &style, &value)?,
        Op::SetEdgeLabelStyle {
            id,
            style,
            value,
            label_pos,
        } => registry.set_edge_label_style(&id, &style, &value, label_pos)?,
        Op::ChangeNodeLabel { node_id, text } => registry.change_node_label(&node_id, &text),
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let scene: Scene = serde_json::from_str(&text)?;

    let mut config = match &scene.config {
        Some(overrides) => MirrorConfig::with_overrides(overrides),
        None => MirrorConfig::default(),
    };
    for (path, value) in args.config_sets {
        config.set_value(&path, value);
    }
    let mut registry = GraphRegistry::with_config(RecordingChannel::new(), config);

    match args.command {
        Command::Replay => {
            let total = scene.ops.len();
            for (index, op) in scene.ops.into_iter().enumerate() {
                apply_op(&mut registry, op).map_err(|err| CliError::Op {
                    index,
                    source: Box::new(err),
                })?;
            }
            tracing::debug!(ops = total, "scene replayed");

            let state = args.with_state.then(|| registry.snapshot());
            let commands = registry
                .channel()
                .commands()
                .iter()
                .map(RenderCommand::to_json)
                .collect();
            let out = ReplayOut {
                commands,
                state: state.as_ref(),
            };
            write_json(&out, args.pretty)?;
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
