use crate::{
    cmap2::CMap2,
    element::{Dart, Orbit},
};

/// Remembers which darts a traversal has already visited.
///
/// The dense variant holds one flag per dart slot of the map and is used when
/// a traversal may touch a large part of the map. The sparse variant only
/// records the visited darts, which is cheaper for the small orbits walked
/// while listing incident cells.
pub(crate) enum DartMarker {
    Dense(Vec<bool>),
    Sparse(Vec<Dart>),
}

impl DartMarker {
    pub fn dense(map: &CMap2) -> Self {
        DartMarker::Dense(vec![false; map.dart_capacity()])
    }

    pub fn sparse() -> Self {
        DartMarker::Sparse(Vec::new())
    }

    pub fn is_marked(&self, d: Dart) -> bool {
        match self {
            DartMarker::Dense(flags) => flags[d.index() as usize],
            DartMarker::Sparse(darts) => darts.contains(&d),
        }
    }

    /// Marks the dart and returns whether it was already marked.
    pub fn mark(&mut self, d: Dart) -> bool {
        match self {
            DartMarker::Dense(flags) => std::mem::replace(&mut flags[d.index() as usize], true),
            DartMarker::Sparse(darts) => {
                if darts.contains(&d) {
                    true
                } else {
                    darts.push(d);
                    false
                }
            }
        }
    }

    pub fn mark_orbit(&mut self, map: &CMap2, orbit: Orbit, d: Dart) {
        map.foreach_dart_of_orbit(orbit, d, |x| {
            self.mark(x);
            true
        });
    }
}
