//! Pathfinder collaborator boundary.
//!
//! The search algorithm itself lives outside this crate. The core only
//! consumes its contract: an ordered sequence of grid points from the
//! start to the target, start point included, or `None` when the target
//! is unreachable. Implementations must be pure with respect to the
//! scenario state.

use crate::math::MapPoint;
use crate::military::MilitaryKind;

/// Produces marching paths for the order engine.
pub trait PathFinder: std::fmt::Debug {
    /// Find a path for a unit kind from `from` to `to`.
    ///
    /// The returned sequence starts with `from` and ends with `to`.
    /// Returns `None` when no path exists.
    fn find_path(&self, kind: &MilitaryKind, from: MapPoint, to: MapPoint) -> Option<Vec<MapPoint>>;
}

/// Baseline collaborator that walks straight toward the target.
///
/// Steps one axis per node, x before y. Good enough for the headless
/// runner and for tests; a real embedding supplies a terrain-aware
/// search instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPathFinder;

impl PathFinder for DirectPathFinder {
    fn find_path(&self, _kind: &MilitaryKind, from: MapPoint, to: MapPoint) -> Option<Vec<MapPoint>> {
        let mut path = vec![from];
        let mut current = from;
        while current != to {
            if current.x != to.x {
                current.x += (to.x - current.x).signum();
            } else {
                current.y += (to.y - current.y).signum();
            }
            path.push(current);
        }
        Some(path)
    }
}
