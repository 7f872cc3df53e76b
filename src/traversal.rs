use crate::{
    cmap2::CMap2,
    element::{CellType, Dart, Orbit},
    marker::DartMarker,
    mesh::Mesh,
};

/**
 * Visits the cells of type `C` selected by `mesh`, once each, in increasing
 * order of their representative dart. The representative of a cell is its
 * first live, non-boundary dart. Stops when `f` returns false.
 */
pub(crate) fn foreach_cell<M, C, F>(mesh: &M, mut f: F)
where
    M: Mesh + ?Sized,
    C: CellType,
    F: FnMut(C) -> bool,
{
    let map = mesh.map();
    let mut marker = DartMarker::dense(map);
    for d in map.darts() {
        if map.is_boundary(d) || marker.is_marked(d) {
            continue;
        }
        marker.mark_orbit(map, C::ORBIT, d);
        let c = C::from_dart(d);
        if mesh.selects(c) && !f(c) {
            break;
        }
    }
}

/// A dart of the cell of `orbit` containing `d`, chosen away from the
/// boundary so it can represent the cell.
pub(crate) fn interior_representative(map: &CMap2, orbit: Orbit, d: Dart) -> Dart {
    if !map.is_boundary(d) {
        return d;
    }
    match orbit {
        Orbit::Vertex => map.phi1(map.phi2(d)),
        Orbit::Edge | Orbit::Volume => map.phi2(d),
        Orbit::Face => d,
    }
}

/**
 * Calls `f` with one representative dart per cell of orbit `target` that is
 * incident to the cell of orbit `source` containing `d`.
 *
 * Faces around a face or a vertex come in cycle order, which for the vertices
 * of a face is the `phi1` order. Boundary faces are skipped.
 */
pub(crate) fn foreach_incident_dart<F>(map: &CMap2, source: Orbit, d: Dart, target: Orbit, mut f: F)
where
    F: FnMut(Dart) -> bool,
{
    if target == Orbit::Volume {
        // Every cell lies in exactly one connected component.
        f(interior_representative(map, Orbit::Volume, d));
        return;
    }
    let mut marker = match source {
        Orbit::Volume => DartMarker::dense(map),
        _ => DartMarker::sparse(),
    };
    map.foreach_dart_of_orbit(source, d, |x| {
        if (target == Orbit::Face && map.is_boundary(x)) || marker.is_marked(x) {
            return true;
        }
        marker.mark_orbit(map, target, x);
        f(interior_representative(map, target, x))
    });
}

#[cfg(test)]
mod test {
    use super::{foreach_incident_dart, interior_representative};
    use crate::{
        cmap2::test::{open_pyramid, quad_box},
        element::{CellType, Dart, Edge, Face, Orbit, Vertex, Volume},
        mesh::Mesh,
    };

    #[test]
    fn t_each_cell_once() {
        let (map, _) = quad_box();
        for orbit in Orbit::ALL {
            let mut seen = vec![false; map.dart_capacity()];
            let mut count = 0;
            let mut visit = |d: Dart| {
                count += 1;
                map.foreach_dart_of_orbit(orbit, d, |x| {
                    assert!(!std::mem::replace(&mut seen[x.index() as usize], true));
                    true
                });
                true
            };
            match orbit {
                Orbit::Vertex => map.foreach_cell(|c: Vertex| visit(c.dart())),
                Orbit::Edge => map.foreach_cell(|c: Edge| visit(c.dart())),
                Orbit::Face => map.foreach_cell(|c: Face| visit(c.dart())),
                Orbit::Volume => map.foreach_cell(|c: Volume| visit(c.dart())),
            }
            assert!(seen.iter().all(|s| *s), "{orbit} traversal missed darts");
            assert_eq!(count, [8, 12, 6, 1][orbit.slot()]);
        }
    }

    #[test]
    fn t_early_stop() {
        let (map, _) = quad_box();
        let mut count = 0;
        map.foreach_cell(|_: Edge| {
            count += 1;
            count < 5
        });
        assert_eq!(count, 5);
    }

    #[test]
    fn t_representatives_are_interior() {
        let (map, _) = open_pyramid();
        for d in map.darts() {
            for orbit in Orbit::ALL {
                // Boundary faces have no interior dart.
                if orbit == Orbit::Face && map.is_boundary(d) {
                    continue;
                }
                let r = interior_representative(&map, orbit, d);
                assert!(!map.is_boundary(r));
                let mut found = false;
                map.foreach_dart_of_orbit(orbit, d, |x| {
                    found |= x == r;
                    !found
                });
                assert!(found, "{r} is not in the {orbit} of {d}");
            }
        }
    }

    #[test]
    fn t_boundary_faces_are_skipped() {
        let (map, verts) = open_pyramid();
        // A base vertex touches two triangles and the open bottom.
        let mut faces = Vec::new();
        foreach_incident_dart(&map, Orbit::Vertex, verts[0].dart(), Orbit::Face, |d| {
            faces.push(d);
            true
        });
        assert_eq!(faces.len(), 2);
        assert!(faces.iter().all(|d| !map.is_boundary(*d)));
        let mut all = Vec::new();
        foreach_incident_dart(
            &map,
            Orbit::Volume,
            verts[0].dart(),
            Orbit::Face,
            |d| {
                all.push(d);
                true
            },
        );
        assert_eq!(all.len(), 4);
    }
}
