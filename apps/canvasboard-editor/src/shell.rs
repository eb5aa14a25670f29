//! Line-oriented command shell driving an [`Editor`] from stdin.
//!
//! Pointer coordinates are screen pixels, as a canvas would report them.

use canvasboard_core::{EditKey, ShapeKind};
use canvasboard_io::KeyValueStore;
use canvasboard_renderer::SurfaceEvent;

use crate::{Editor, Tab};

pub const HELP: &str = "\
commands:
  add rect|circle          add a shape
  click <x> <y>            select the shape under the pointer (or clear)
  drag <id> <x> <y>        drop a shape at a canvas position
  key delete|backspace|undo|redo
  wheel <dy> <x> <y>       zoom at the pointer (dy > 0 zooms out)
  pan <dx> <dy>            drag the stage
  resize <w> <h>           container size changed
  reset-zoom
  list | frame | status
  load | save              sync with the shapes API
  tab canvas|flow
  connect <from> <to> | unlink <edge> | nodes
  move-node <id> <x> <y> | remove-node <id>
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add(ShapeKind),
    Event(SurfaceEvent),
    ResetZoom,
    List,
    Frame,
    Status,
    Load,
    Save,
    Tab(Tab),
    Connect(String, String),
    Unlink(String),
    MoveNode { id: String, x: f64, y: f64 },
    RemoveNode(String),
    Nodes,
    Help,
    Quit,
}

/// A finite number; `NaN` and `inf` parse as floats but are refused here.
fn number(arg: Option<&str>, name: &str) -> Result<f64, String> {
    let raw = arg.ok_or_else(|| format!("missing <{}>", name))?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("<{}> must be a finite number, got '{}'", name, raw)),
    }
}

fn word<'a>(arg: Option<&'a str>, name: &str) -> Result<&'a str, String> {
    arg.ok_or_else(|| format!("missing <{}>", name))
}

pub fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut args = line.split_whitespace();
    let Some(head) = args.next() else {
        return Ok(None);
    };
    let command = match head {
        "add" => ShellCommand::Add(word(args.next(), "kind")?.parse()?),
        "click" => ShellCommand::Event(SurfaceEvent::Click {
            x: number(args.next(), "x")?,
            y: number(args.next(), "y")?,
        }),
        "drag" => ShellCommand::Event(SurfaceEvent::DragEnd {
            id: word(args.next(), "id")?.to_string(),
            x: number(args.next(), "x")?,
            y: number(args.next(), "y")?,
        }),
        "key" => {
            let key = match word(args.next(), "key")? {
                "delete" => EditKey::Delete,
                "backspace" => EditKey::Backspace,
                "undo" => EditKey::Undo,
                "redo" => EditKey::Redo,
                other => return Err(format!("unknown key '{}'", other)),
            };
            ShellCommand::Event(SurfaceEvent::Key { key })
        }
        "wheel" => ShellCommand::Event(SurfaceEvent::Wheel {
            delta_y: number(args.next(), "dy")?,
            x: number(args.next(), "x")?,
            y: number(args.next(), "y")?,
        }),
        "pan" => ShellCommand::Event(SurfaceEvent::StageDrag {
            dx: number(args.next(), "dx")?,
            dy: number(args.next(), "dy")?,
        }),
        "resize" => ShellCommand::Event(SurfaceEvent::Resize {
            width: number(args.next(), "w")?,
            height: number(args.next(), "h")?,
        }),
        "reset-zoom" => ShellCommand::ResetZoom,
        "list" => ShellCommand::List,
        "frame" => ShellCommand::Frame,
        "status" => ShellCommand::Status,
        "load" => ShellCommand::Load,
        "save" => ShellCommand::Save,
        "tab" => match word(args.next(), "tab")? {
            "canvas" => ShellCommand::Tab(Tab::Canvas),
            "flow" => ShellCommand::Tab(Tab::Flow),
            other => return Err(format!("unknown tab '{}'", other)),
        },
        "connect" => ShellCommand::Connect(
            word(args.next(), "from")?.to_string(),
            word(args.next(), "to")?.to_string(),
        ),
        "unlink" => ShellCommand::Unlink(word(args.next(), "edge")?.to_string()),
        "move-node" => ShellCommand::MoveNode {
            id: word(args.next(), "id")?.to_string(),
            x: number(args.next(), "x")?,
            y: number(args.next(), "y")?,
        },
        "remove-node" => ShellCommand::RemoveNode(word(args.next(), "id")?.to_string()),
        "nodes" => ShellCommand::Nodes,
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };
    Ok(Some(command))
}

/// Run one command and return the text to print.
pub async fn execute<S: KeyValueStore>(editor: &mut Editor<S>, command: ShellCommand) -> String {
    match command {
        ShellCommand::Add(kind) => format!("added {}", editor.add_shape(kind)),
        ShellCommand::Event(event) => {
            let view_only = matches!(
                event,
                SurfaceEvent::Wheel { .. } | SurfaceEvent::StageDrag { .. } | SurfaceEvent::Resize { .. }
            );
            let response = editor.handle_event(event);
            if view_only {
                let vp = editor.viewport();
                return format!(
                    "scale {:.3} offset ({:.1}, {:.1}) size {}x{}",
                    vp.scale, vp.offset_x, vp.offset_y, vp.width, vp.height
                );
            }
            match (response.shapes_changed, editor.store().selected()) {
                (true, _) => format!("{} shapes", editor.shapes().len()),
                (false, Some(id)) => format!("selected {}", id),
                (false, None) => "nothing selected".to_string(),
            }
        }
        ShellCommand::ResetZoom => {
            editor.reset_zoom();
            "scale 1.000".to_string()
        }
        ShellCommand::List => editor
            .shapes()
            .iter()
            .map(|s| {
                let marker = if editor.store().is_selected(&s.id) { "*" } else { " " };
                format!(
                    "{}{} {:?} ({}, {}) size {} {}",
                    marker, s.id, s.kind, s.position.x, s.position.y, s.size, s.fill
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        ShellCommand::Frame => editor
            .frame()
            .to_json()
            .unwrap_or_else(|e| format!("error: {}", e)),
        ShellCommand::Status => editor.status().to_string(),
        ShellCommand::Load => editor.load_from_api().await.to_string(),
        ShellCommand::Save => editor.save_to_api().await.to_string(),
        ShellCommand::Tab(tab) => {
            editor.set_tab(tab);
            format!("{:?} editor", tab)
        }
        ShellCommand::Connect(from, to) => match editor.connect(&from, &to) {
            Ok(id) => format!("connected {}", id),
            Err(e) => format!("error: {}", e),
        },
        ShellCommand::Unlink(edge) => {
            if editor.remove_edge(&edge) {
                format!("removed {}", edge)
            } else {
                format!("no edge {}", edge)
            }
        }
        ShellCommand::MoveNode { id, x, y } => {
            if editor.move_node(&id, x, y) {
                format!("moved {} to ({}, {})", id, x, y)
            } else {
                format!("no node {}", id)
            }
        }
        ShellCommand::RemoveNode(id) => {
            if editor.remove_node(&id) {
                format!("removed {}, {} edges left", id, editor.flow().edge_count())
            } else {
                format!("no node {}", id)
            }
        }
        ShellCommand::Nodes => {
            let flow = editor.flow();
            let nodes = flow
                .nodes()
                .map(|n| format!("{} {:?} '{}' ({}, {})", n.id, n.kind, n.label, n.position.x, n.position.y));
            let edges = flow
                .edges()
                .map(|e| format!("{}: {} -> {}", e.id, e.source, e.target));
            nodes.chain(edges).collect::<Vec<_>>().join("\n")
        }
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => String::new(),
    }
}
