//! Diagram rendering
//!
//! Every diagram is first written as Graphviz DOT text. The DOT and JSON
//! formats are written as they are; SVG and PNG are laid out by the external
//! `dot` program.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use aowln_core::{DiagramEdge, DiagramGraph, EdgeKind, NodeKind};
use log::{debug, trace};

use crate::config::{OutputFormat, VizConfig};
use crate::error::{Error, Result};

/// Graphviz's default resolution, multiplied by the PNG scale factor.
const BASE_DPI: f64 = 72.0;

/// Writes one diagram to a file.
pub trait DiagramRenderer: Send + Sync {
    /// Render `diagram` into the file at `out`, replacing any existing file.
    fn render(&self, diagram: &DiagramGraph, out: &Path) -> Result<()>;

    /// File extension of the produced files.
    fn extension(&self) -> &'static str;
}

/// Create the renderer for the configured output format.
pub fn renderer_for(config: &VizConfig) -> Box<dyn DiagramRenderer> {
    match config.format {
        OutputFormat::Dot => Box::new(DotRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
        OutputFormat::Svg | OutputFormat::Png => Box::new(GraphvizRenderer::new(config)),
    }
}

/// Produce the Graphviz DOT text for a diagram.
///
/// Nodes are named by position (`n0`, `n1`, ...) so ids that are not valid DOT
/// identifiers need no quoting; the node label carries the display text.
pub fn to_dot(diagram: &DiagramGraph) -> Result<String> {
    write_dot(diagram).map_err(|e| Error::Render(format!("cannot format DOT text: {}", e)))
}

fn write_dot(diagram: &DiagramGraph) -> std::result::Result<String, std::fmt::Error> {
    let mut s = String::new();
    writeln!(s, "digraph {{")?;
    for (index, node) in diagram.nodes.iter().enumerate() {
        writeln!(
            s,
            "  n{} [label=\"{}\", shape={}];",
            index,
            escape(&node.label),
            node.kind.shape()
        )?;
    }
    for edge in &diagram.edges {
        let attributes = edge_attributes(diagram, edge);
        if attributes.is_empty() {
            writeln!(s, "  n{} -> n{};", edge.from, edge.to)?;
        } else {
            writeln!(s, "  n{} -> n{} [{}];", edge.from, edge.to, attributes.join(", "))?;
        }
    }
    writeln!(s, "}}")?;
    Ok(s)
}

fn edge_attributes(diagram: &DiagramGraph, edge: &DiagramEdge) -> Vec<String> {
    let mut attributes = Vec::new();
    let kinds = diagram
        .endpoints(edge)
        .map(|(from, to)| (from.kind, to.kind));

    if let Some((from, to)) = kinds {
        let touches_property = from == NodeKind::Property || to == NodeKind::Property;
        match edge.kind {
            EdgeKind::ObjectProperty if touches_property => {
                attributes.push("style=dashed".to_string())
            }
            EdgeKind::Normal if from == NodeKind::Class && to == NodeKind::Property => {
                attributes.push("style=solid".to_string())
            }
            _ => {}
        }
    }
    if let Some(label) = &edge.label {
        attributes.push(format!("label=\"{}\"", escape(label)));
    }
    attributes
}

/// Escape text for a quoted DOT string. Line breaks become `\n` escapes.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Writes Graphviz DOT source files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl DiagramRenderer for DotRenderer {
    fn render(&self, diagram: &DiagramGraph, out: &Path) -> Result<()> {
        std::fs::write(out, to_dot(diagram)?)?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        OutputFormat::Dot.extension()
    }
}

/// Writes the exported node and edge lists as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl DiagramRenderer for JsonRenderer {
    fn render(&self, diagram: &DiagramGraph, out: &Path) -> Result<()> {
        std::fs::write(out, diagram.to_json()?)?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        OutputFormat::Json.extension()
    }
}

/// Lays diagrams out with the Graphviz `dot` program.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: PathBuf,
    format: OutputFormat,
    scale: f64,
}

impl GraphvizRenderer {
    /// Create a renderer from the configured program, format and scale.
    pub fn new(config: &VizConfig) -> Self {
        Self {
            program: config.graphviz.clone(),
            format: config.format,
            scale: config.png_scale,
        }
    }

    fn command(&self, out: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(format!("-T{}", self.format.extension()));
        if self.format == OutputFormat::Png {
            command.arg(format!("-Gdpi={}", BASE_DPI * self.scale));
        }
        command
            .arg("-o")
            .arg(out)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl DiagramRenderer for GraphvizRenderer {
    fn render(&self, diagram: &DiagramGraph, out: &Path) -> Result<()> {
        let source = to_dot(diagram)?;
        trace!("graphviz input for {}:\n{}", out.display(), source);

        let mut child = self.command(out).spawn().map_err(|e| {
            Error::Render(format!(
                "cannot start '{}': {}",
                self.program.display(),
                e
            ))
        })?;
        // stderr must be drained while the input is still being written.
        let stdin = child.stdin.take();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(source.as_bytes())?;
            }
            Ok(())
        });

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| Error::Render("graphviz input writer panicked".into()))?;
        if !output.status.success() {
            return Err(Error::Render(format!(
                "'{}' failed with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written?;
        debug!("wrote {}", out.display());
        Ok(())
    }

    fn extension(&self) -> &'static str {
        self.format.extension()
    }
}
