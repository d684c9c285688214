//! Even-odd point-in-polygon test.
//!
//! Comparisons are exact. Timezone boundaries share vertices and edges with
//! their neighbours, so coincident points must resolve the same way on every
//! call rather than through a tolerance band.

use crate::types::Vertex;

/// Returns whether `point` lies inside the closed ring `ring`.
///
/// Each edge `(vi, vj)`, with the last vertex wrapping to the first, toggles
/// the result when either
///
/// - the edge runs along the point's meridian and spans its latitude, or
/// - the edge straddles the point's latitude and crosses it east of the point.
///
/// An empty ring contains nothing.
///
/// # Examples
///
/// ```
/// use geotz::Vertex;
/// use geotz::compute::ray_cast::contains;
///
/// let square = [
///     Vertex::new(0.0, 0.0),
///     Vertex::new(0.0, 10.0),
///     Vertex::new(10.0, 10.0),
///     Vertex::new(10.0, 0.0),
/// ];
/// assert!(contains(&square, Vertex::new(5.0, 5.0)));
/// assert!(!contains(&square, Vertex::new(15.0, 5.0)));
/// ```
pub fn contains(ring: &[Vertex], point: Vertex) -> bool {
    let n = ring.len();
    let mut inside = false;

    for i in 0..n {
        let vi = ring[i];
        let vj = ring[(i + 1) % n];

        let on_meridian_edge = vi.lng == vj.lng
            && vi.lng == point.lng
            && point.lat >= vi.lat.min(vj.lat)
            && point.lat <= vi.lat.max(vj.lat);

        let straddles = (vi.lat < point.lat && point.lat <= vj.lat)
            || (vj.lat < point.lat && point.lat <= vi.lat);

        // straddling guarantees vi.lat != vj.lat, so the division is safe
        if on_meridian_edge
            || (straddles
                && point.lng
                    < (vj.lng - vi.lng) * (point.lat - vi.lat) / (vj.lat - vi.lat) + vi.lng)
        {
            inside = !inside;
        }
    }

    inside
}
