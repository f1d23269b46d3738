//! Error types for the ustcon core library.
//!
//! Defines the graph lookup and harness configuration failures exposed by the
//! public API, each paired with a stable machine-readable code.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::harness::ExecutionStrategy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while looking up or validating a [`crate::Graph`].
///
/// Vertex identifiers are rendered with their `Debug` representation so the
/// error type stays independent of the vertex type.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// The requested vertex is not a key of the adjacency mapping.
    #[error("vertex {vertex} is not present in the graph")]
    UnknownVertex {
        /// Rendered identifier of the missing vertex.
        vertex: Arc<str>,
    },
    /// An adjacency list names a vertex that has no adjacency list of its own.
    #[error("vertex {vertex} lists neighbour {neighbour}, which is not present in the graph")]
    DanglingNeighbour {
        /// Vertex whose adjacency list contains the dangling entry.
        vertex: Arc<str>,
        /// Rendered identifier of the missing neighbour.
        neighbour: Arc<str>,
    },
    /// `from` lists `to` as a neighbour but `to` does not list `from`.
    #[error("edge {from} -> {to} has no matching edge {to} -> {from}")]
    AsymmetricEdge {
        /// Vertex holding the one-directional entry.
        from: Arc<str>,
        /// Vertex missing the reverse entry.
        to: Arc<str>,
    },
}

impl GraphError {
    pub(crate) fn unknown_vertex<V: fmt::Debug>(vertex: &V) -> Self {
        Self::UnknownVertex {
            vertex: render_vertex(vertex),
        }
    }
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The requested vertex is not a key of the adjacency mapping.
        UnknownVertex => UnknownVertex { .. } => "GRAPH_UNKNOWN_VERTEX",
        /// An adjacency list names a vertex that has no adjacency list of its own.
        DanglingNeighbour => DanglingNeighbour { .. } => "GRAPH_DANGLING_NEIGHBOUR",
        /// An edge is stored in one direction only.
        AsymmetricEdge => AsymmetricEdge { .. } => "GRAPH_ASYMMETRIC_EDGE",
    }
}

/// Error type produced when configuring or running a [`crate::TrialHarness`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HarnessError {
    /// Trial count must be greater than zero.
    #[error("trials must be at least 1 (got {got})")]
    InvalidTrialCount {
        /// The invalid trial count supplied by the caller.
        got: usize,
    },
    /// The cover-time step budget does not fit in a `u64`.
    #[error("step budget for a component of {component_size} vertices overflows u64")]
    StepBudgetOverflow {
        /// Size of the component the budget was resolved against.
        component_size: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
    /// A graph lookup failed while running trials.
    #[error("graph lookup failed: {error}")]
    Graph {
        #[source]
        /// Underlying graph error bubbled up by the walk or the oracle.
        error: GraphError,
    },
}

define_error_codes! {
    /// Stable codes describing [`HarnessError`] variants.
    enum HarnessErrorCode for HarnessError {
        /// Trial count must be greater than zero.
        InvalidTrialCount => InvalidTrialCount { .. } => "HARNESS_INVALID_TRIAL_COUNT",
        /// The cover-time step budget does not fit in a `u64`.
        StepBudgetOverflow => StepBudgetOverflow { .. } => "HARNESS_STEP_BUDGET_OVERFLOW",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "HARNESS_BACKEND_UNAVAILABLE",
        /// A graph lookup failed while running trials.
        GraphFailure => Graph { .. } => "HARNESS_GRAPH_FAILURE",
    }
}

impl HarnessError {
    /// Retrieve the inner [`GraphErrorCode`] when the error originated in a graph lookup.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph { error } => Some(error.code()),
            _ => None,
        }
    }
}

impl From<GraphError> for HarnessError {
    fn from(error: GraphError) -> Self {
        Self::Graph { error }
    }
}

/// Convenient alias for results returned by graph queries.
pub type Result<T> = core::result::Result<T, GraphError>;

pub(crate) fn render_vertex<V: fmt::Debug>(vertex: &V) -> Arc<str> {
    Arc::from(format!("{vertex:?}"))
}
