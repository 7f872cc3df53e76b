use crate::element::Orbit;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Attributes.
    #[error("an attribute named `{name}` already exists on {orbit}")]
    DuplicateName { orbit: Orbit, name: String },
    #[error("attribute `{name}` stores `{found}`, requested as `{expected}`")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("no attribute named `{0}`")]
    AttributeNotFound(String),
    /// The handle refers to a column that was removed from its container.
    #[error("the attribute was removed from its container")]
    RemovedAttribute,
    #[error("the attribute belongs to another container")]
    ForeignAttribute,
    // Embeddings.
    #[error("{0} cells are already embedded")]
    AlreadyEmbedded(Orbit),
    #[error("{0} cells are not embedded")]
    NotEmbedded(Orbit),
    #[error("index {index} is out of range for a container of {len} rows")]
    IndexOutOfRange { index: u32, len: usize },
    #[error("index {0} is not allocated")]
    IndexNotAllocated(u32),
    #[error("dart {0} has been removed from the map")]
    DeadCell(u32),
    // Construction.
    #[error("a face needs at least 3 vertices, got {0}")]
    InvalidFaceSize(usize),
    #[error("vertex index {0} is out of range")]
    InvalidVertexIndex(u32),
    #[error("vertex {0} appears more than once in the same face")]
    RepeatedVertex(u32),
    #[error("edge ({0}, {1}) is used twice with the same orientation")]
    NonManifoldEdge(u32, u32),
    #[error("vertex {0} is not manifold")]
    NonManifoldVertex(u32),
    // Consistency checks.
    #[error("phi1 and phi_1 disagree at dart {0}")]
    InvalidPhi1(u32),
    #[error("phi2 is not an involution at dart {0}")]
    InvalidPhi2(u32),
    #[error("the boundary flag of dart {0} is inconsistent")]
    InconsistentBoundary(u32),
    #[error("dart {dart} does not carry the index of its {orbit}")]
    InconsistentEmbedding { orbit: Orbit, dart: u32 },
    #[error("index {index} is used by two {orbit} cells")]
    SharedIndex { orbit: Orbit, index: u32 },
    #[error("the {0} container holds indices no cell uses")]
    DanglingIndices(Orbit),
}
