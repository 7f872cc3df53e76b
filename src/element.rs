use std::fmt::{Debug, Display};
use std::hash::Hash;

/**
 * The atomic element of a combinatorial map. Every cell is a set of darts,
 * and any dart of that set can stand in for the cell.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dart {
    idx: u32,
}

impl Dart {
    pub fn index(self) -> u32 {
        self.idx
    }
}

impl From<u32> for Dart {
    fn from(idx: u32) -> Self {
        Dart { idx }
    }
}

impl From<&u32> for Dart {
    fn from(idx: &u32) -> Self {
        Dart { idx: *idx }
    }
}

impl Display for Dart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.idx)
    }
}

impl Debug for Dart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.idx)
    }
}

/// Classification of the cells of a 2-map.
///
/// Each orbit is the set of darts reachable from a dart through a fixed group
/// of permutations: `phi21` for vertices, `phi2` for edges, `phi1` for faces,
/// and `<phi1, phi2>` for volumes, i.e. connected components.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Orbit {
    Vertex,
    Edge,
    Face,
    Volume,
}

pub(crate) const NUM_ORBITS: usize = 4;

impl Orbit {
    pub const ALL: [Orbit; NUM_ORBITS] = [Orbit::Vertex, Orbit::Edge, Orbit::Face, Orbit::Volume];

    pub(crate) fn slot(self) -> usize {
        match self {
            Orbit::Vertex => 0,
            Orbit::Edge => 1,
            Orbit::Face => 2,
            Orbit::Volume => 3,
        }
    }

    pub fn dimension(self) -> usize {
        self.slot()
    }

    /// The orbit of the cells bounding a cell of this orbit, if any.
    pub fn lower(self) -> Option<Orbit> {
        match self {
            Orbit::Vertex => None,
            Orbit::Edge => Some(Orbit::Vertex),
            Orbit::Face => Some(Orbit::Edge),
            Orbit::Volume => Some(Orbit::Face),
        }
    }
}

impl Display for Orbit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Orbit::Vertex => "vertex",
            Orbit::Edge => "edge",
            Orbit::Face => "face",
            Orbit::Volume => "volume",
        };
        write!(f, "{name}")
    }
}

/**
 * Implemented by the cell handles of the map. A handle is a dart tagged with
 * the orbit it represents.
 *
 * Only the cell types of this crate implement this trait, so asking a mesh
 * for a cell type it does not know about is rejected by the compiler.
 */
pub trait CellType: Copy + Eq + Hash + Debug + Send + Sync + sealed::Sealed + 'static {
    const ORBIT: Orbit;

    fn dart(self) -> Dart;

    fn from_dart(d: Dart) -> Self;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! cell_type {
    ($name:ident, $orbit:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Copy, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            dart: Dart,
        }

        impl sealed::Sealed for $name {}

        impl CellType for $name {
            const ORBIT: Orbit = $orbit;

            fn dart(self) -> Dart {
                self.dart
            }

            fn from_dart(dart: Dart) -> Self {
                $name { dart }
            }
        }

        impl From<Dart> for $name {
            fn from(dart: Dart) -> Self {
                $name { dart }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.dart)
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.dart)
            }
        }
    };
}

cell_type!(Vertex, Orbit::Vertex, "Vertex handle.");
cell_type!(Edge, Orbit::Edge, "Edge handle.");
cell_type!(Face, Orbit::Face, "Face handle.");
cell_type!(
    Volume,
    Orbit::Volume,
    "Volume handle. In a 2-map a volume is a connected component."
);
