use rayon::prelude::*;

use crate::{element::CellType, mesh::Mesh};

/**
 * Call `f` on every cell of type `C` selected by `mesh`, spreading the work
 * over the rayon thread pool.
 *
 * The cells are collected with [`Mesh::foreach_cell`] first, so the same
 * cells are visited as in a sequential traversal. The order of the calls is
 * unspecified.
 */
pub fn parallel_foreach_cell<M, C, F>(mesh: &M, f: F)
where
    M: Mesh + Sync,
    C: CellType,
    F: Fn(C) + Send + Sync,
{
    mesh.cells::<C>().into_par_iter().for_each(f);
}

/**
 * Parallel fold over the cells of type `C`. Each worker folds a chunk of the
 * cells starting from `identity()`, and the partial results are combined
 * with `reduce`. For the result to match a sequential fold, `reduce` must be
 * associative and `identity()` neutral for it.
 */
pub fn parallel_fold_cells<M, C, T, ID, FOLD, RED>(mesh: &M, identity: ID, fold: FOLD, reduce: RED) -> T
where
    M: Mesh + Sync,
    C: CellType,
    T: Send,
    ID: Fn() -> T + Send + Sync,
    FOLD: Fn(T, C) -> T + Send + Sync,
    RED: Fn(T, T) -> T + Send + Sync,
{
    mesh.cells::<C>()
        .into_par_iter()
        .fold(&identity, fold)
        .reduce(&identity, reduce)
}
