//! Error types for the AOWLN core.

use thiserror::Error;

/// A specialized `Result` type for AOWLN graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur while turning rule fragments into diagram graphs.
///
/// Construction itself is infallible; these errors only surface when a graph
/// violates its own consistency invariants or when serialization fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An edge points at a node id that is not part of the graph.
    ///
    /// Indicates a defect in graph construction rather than bad user input.
    #[error("Edge {edge} references unknown node '{node}'")]
    DanglingEdge { edge: u64, node: String },

    /// An error occurred during data serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_edge_display() {
        let err = Error::DanglingEdge {
            edge: 3,
            node: "p1".to_string(),
        };
        assert_eq!(err.to_string(), "Edge 3 references unknown node 'p1'");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = json_result.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
