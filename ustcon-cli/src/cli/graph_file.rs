//! Loading adjacency mappings from JSON files.
//!
//! A graph file is a single JSON object whose keys are vertex labels and
//! whose values are arrays of neighbour labels:
//!
//! ```json
//! {"A": ["B", "C"], "B": ["A"], "C": ["A"], "D": []}
//! ```
//!
//! Vertices are ordered by label; neighbour order is kept as written.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{Span, field, instrument};
use ustcon_core::{Graph, GraphBuilder};

use super::commands::CliError;

/// Reads and builds the graph stored at `path`.
///
/// When `strict` is set the graph must store every edge in both directions
/// and may not reference unlisted vertices.
///
/// # Errors
/// Returns [`CliError::Io`] when the file cannot be opened,
/// [`CliError::Parse`] when it is not a JSON object of string arrays, and
/// [`CliError::Graph`] when strict validation fails.
#[instrument(name = "cli.load_graph", err, skip(path), fields(path = field::Empty, vertices = field::Empty))]
pub fn load_graph(path: &Path, strict: bool) -> Result<Graph<String>, CliError> {
    let span = Span::current();
    span.record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_graph(BufReader::new(file), strict).map_err(|err| match err {
        ParseFailure::Json(source) => CliError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Graph(error) => CliError::Graph(error),
    })?;
    span.record("vertices", graph.vertex_count());
    Ok(graph)
}

pub(super) enum ParseFailure {
    Json(serde_json::Error),
    Graph(ustcon_core::GraphError),
}

pub(super) fn parse_graph(reader: impl Read, strict: bool) -> Result<Graph<String>, ParseFailure> {
    let adjacency: BTreeMap<String, Vec<String>> =
        serde_json::from_reader(reader).map_err(ParseFailure::Json)?;
    adjacency
        .into_iter()
        .fold(GraphBuilder::new(), |builder, (vertex, neighbours)| {
            builder.with_adjacency(vertex, neighbours)
        })
        .with_symmetry_check(strict)
        .build()
        .map_err(ParseFailure::Graph)
}
