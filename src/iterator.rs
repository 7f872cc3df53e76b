use crate::{cmap2::CMap2, element::Dart};

/// Walks one cycle of a permutation of the darts. With `AROUND_VERTEX` the
/// permutation is `phi1 . phi2`, which visits the darts leaving a vertex,
/// otherwise it is `phi1`, which visits the darts of a face in order.
struct DartCycleIter<'a, const AROUND_VERTEX: bool> {
    map: &'a CMap2,
    dstart: Dart,
    dcurrent: Option<Dart>,
}

impl Iterator for DartCycleIter<'_, false> {
    type Item = Dart;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.dcurrent?;
        let next = self.map.phi1(current);
        self.dcurrent = if next == self.dstart {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

impl Iterator for DartCycleIter<'_, true> {
    type Item = Dart;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.dcurrent?;
        let next = self.map.phi1(self.map.phi2(current));
        self.dcurrent = if next == self.dstart {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

pub(crate) fn face_darts(map: &CMap2, d: Dart) -> impl Iterator<Item = Dart> + use<'_> {
    DartCycleIter::<false> {
        map,
        dstart: d,
        dcurrent: Some(d),
    }
}

pub(crate) fn vertex_darts(map: &CMap2, d: Dart) -> impl Iterator<Item = Dart> + use<'_> {
    DartCycleIter::<true> {
        map,
        dstart: d,
        dcurrent: Some(d),
    }
}

pub(crate) fn edge_darts(map: &CMap2, d: Dart) -> impl Iterator<Item = Dart> + use<'_> {
    let opp = map.phi2(d);
    std::iter::once(d).chain((opp != d).then_some(opp))
}
