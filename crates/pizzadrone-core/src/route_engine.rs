//! A* route engine over the sixteen-heading movement model.
//!
//! Positions are generated by repeatedly adding the same fixed step vectors to
//! the origin, so identical move sequences reproduce bit-identical
//! coordinates. The best-cost map relies on that and keys positions by their
//! exact bit pattern.

use crate::error::GeometryError;
use crate::heading::Heading;
use crate::models::{LngLat, NamedRegion};
use crate::rules::FlightRules;
use crate::spatial::{distance, is_close};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Origin first, destination last; empty when no route exists
    pub path: Vec<LngLat>,
    pub nodes_visited: usize,
    pub nodes_created: usize,
    /// The search stopped at `FlightRules::max_expansions` rather than
    /// exhausting the frontier
    pub budget_exhausted: bool,
}

impl RoutePlan {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    point: LngLat,
    g_score: f64,
    h_score: f64,
    parent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey {
    lng_bits: u64,
    lat_bits: u64,
}

impl From<LngLat> for PointKey {
    fn from(point: LngLat) -> Self {
        Self {
            lng_bits: point.lng.to_bits(),
            lat_bits: point.lat.to_bits(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Frontier entry. Equal `f` scores pop in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f_score: FloatOrd,
    seq: u64,
    slot: usize,
    g_score: FloatOrd,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

struct Frontier {
    heap: BinaryHeap<Reverse<OpenNode>>,
    next_seq: u64,
}

impl Frontier {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, slot: usize, node: &SearchNode) {
        self.heap.push(Reverse(OpenNode {
            f_score: FloatOrd(node.g_score + node.h_score),
            seq: self.next_seq,
            slot,
            g_score: FloatOrd(node.g_score),
        }));
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<OpenNode> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }
}

/// Plan a route and return only the positions.
///
/// An empty vector means no route exists under the given constraints.
pub fn plan_route(
    origin: LngLat,
    destination: LngLat,
    no_fly_zones: &[NamedRegion],
    central_area: &NamedRegion,
    rules: &FlightRules,
) -> Result<Vec<LngLat>, GeometryError> {
    plan_route_detailed(origin, destination, no_fly_zones, central_area, rules)
        .map(|plan| plan.path)
}

/// Plan a route from `origin` to `destination`.
///
/// The route never steps onto a no-fly zone (edges included) and, once a
/// visited position lies in the central area, never steps out of it again
/// for the rest of the run. Regions are expected to have passed
/// [`NamedRegion::validate`]; an empty region surfaces as
/// [`GeometryError::EmptyPolygon`].
pub fn plan_route_detailed(
    origin: LngLat,
    destination: LngLat,
    no_fly_zones: &[NamedRegion],
    central_area: &NamedRegion,
    rules: &FlightRules,
) -> Result<RoutePlan, GeometryError> {
    let mut arena: Vec<SearchNode> = Vec::new();
    let mut best_slot: HashMap<PointKey, usize> = HashMap::new();
    let mut open_set = Frontier::new();

    let start = SearchNode {
        point: origin,
        g_score: 0.0,
        h_score: distance(origin, destination),
        parent: None,
    };
    arena.push(start);
    best_slot.insert(PointKey::from(origin), 0);
    open_set.push(0, &start);

    let mut inside_central = false;
    let mut nodes_visited = 0usize;
    let mut budget_exhausted = false;
    let mut terminal: Option<usize> = None;

    while let Some(entry) = open_set.pop() {
        let current = arena[entry.slot];
        if entry.g_score.0 > current.g_score {
            // A cheaper node replaced this slot after the entry was queued.
            continue;
        }

        if let Some(limit) = rules.max_expansions {
            if nodes_visited >= limit {
                budget_exhausted = true;
                break;
            }
        }
        nodes_visited += 1;

        if !inside_central && central_area.contains(current.point)? {
            inside_central = true;
            tracing::trace!(
                lng = current.point.lng,
                lat = current.point.lat,
                "route search entered {}",
                central_area.name
            );
        }

        if is_close(current.point, destination, rules.proximity_threshold) {
            arena.push(SearchNode {
                point: destination,
                g_score: current.g_score,
                h_score: 0.0,
                parent: Some(entry.slot),
            });
            terminal = Some(arena.len() - 1);
            break;
        }

        for heading in Heading::COMPASS {
            let next_point = heading.step(current.point, rules.step_length);

            if inside_central && !central_area.contains(next_point)? {
                continue;
            }
            if in_any_region(no_fly_zones, next_point)? {
                continue;
            }

            let tentative_g = current.g_score + distance(current.point, next_point);
            let key = PointKey::from(next_point);
            let slot = match best_slot.get(&key).copied() {
                Some(slot) if arena[slot].g_score <= tentative_g => continue,
                Some(slot) => {
                    let node = &mut arena[slot];
                    node.g_score = tentative_g;
                    node.h_score = distance(next_point, destination);
                    node.parent = Some(entry.slot);
                    slot
                }
                None => {
                    arena.push(SearchNode {
                        point: next_point,
                        g_score: tentative_g,
                        h_score: distance(next_point, destination),
                        parent: Some(entry.slot),
                    });
                    let slot = arena.len() - 1;
                    best_slot.insert(key, slot);
                    slot
                }
            };
            open_set.push(slot, &arena[slot]);
        }
    }

    let path = match terminal {
        Some(slot) => reconstruct_path(&arena, slot),
        None => Vec::new(),
    };

    if budget_exhausted {
        tracing::warn!(
            nodes_visited,
            limit = ?rules.max_expansions,
            "route search stopped at expansion limit"
        );
    } else if path.is_empty() {
        tracing::debug!(nodes_visited, "route search exhausted the frontier");
    } else {
        tracing::debug!(
            nodes_visited,
            nodes_created = arena.len(),
            moves = path.len() - 1,
            "route found"
        );
    }

    Ok(RoutePlan {
        path,
        nodes_visited,
        nodes_created: arena.len(),
        budget_exhausted,
    })
}

fn in_any_region(regions: &[NamedRegion], point: LngLat) -> Result<bool, GeometryError> {
    for region in regions {
        if region.contains(point)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn reconstruct_path(arena: &[SearchNode], terminal: usize) -> Vec<LngLat> {
    let mut path = Vec::new();
    let mut cursor = Some(terminal);
    while let Some(slot) = cursor {
        let node = &arena[slot];
        path.push(node.point);
        cursor = node.parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(name: &str, min: (f64, f64), max: (f64, f64)) -> NamedRegion {
        NamedRegion::new(
            name,
            vec![
                LngLat::new(min.0, max.1),
                LngLat::new(min.0, min.1),
                LngLat::new(max.0, min.1),
                LngLat::new(max.0, max.1),
                LngLat::new(min.0, max.1),
            ],
        )
    }

    fn edinburgh_central() -> NamedRegion {
        rect("central", (-3.192473, 55.942617), (-3.184319, 55.946233))
    }

    fn george_square() -> NamedRegion {
        NamedRegion::new(
            "George Square Area",
            vec![
                LngLat::new(-3.19057881832123, 55.9440241257753),
                LngLat::new(-3.18998873233795, 55.9428465054091),
                LngLat::new(-3.1870973110199, 55.9432881172426),
                LngLat::new(-3.18768203258514, 55.9444777403937),
                LngLat::new(-3.19057881832123, 55.9440241257753),
            ],
        )
    }

    fn assert_route_constraints(
        path: &[LngLat],
        origin: LngLat,
        destination: LngLat,
        no_fly: &[NamedRegion],
        central: &NamedRegion,
        rules: &FlightRules,
    ) {
        assert!(!path.is_empty(), "expected a route");
        assert_eq!(path[0], origin);
        assert_eq!(*path.last().unwrap(), destination);

        let last_move = path[path.len() - 2];
        assert!(is_close(last_move, destination, rules.proximity_threshold));

        for point in path {
            for zone in no_fly {
                assert!(
                    !zone.contains(*point).unwrap(),
                    "{point:?} is inside no-fly zone {}",
                    zone.name
                );
            }
        }

        let first_entry = path
            .iter()
            .position(|point| central.contains(*point).unwrap());
        if let Some(entry) = first_entry {
            for point in &path[entry..] {
                assert!(central.contains(*point).unwrap(), "{point:?} left central");
            }
        }

        for pair in path[..path.len() - 1].windows(2) {
            let hop = distance(pair[0], pair[1]);
            assert!((hop - rules.step_length).abs() < 1e-12, "irregular hop {hop}");
        }
    }

    #[test]
    fn origin_at_destination_returns_trivial_path() {
        let rules = FlightRules::default();
        let point = LngLat::new(-3.186874, 55.944494);
        let path = plan_route(point, point, &[], &edinburgh_central(), &rules).unwrap();
        assert_eq!(path, vec![point, point]);

        let nearby = LngLat::new(point.lng + 0.00005, point.lat);
        let path = plan_route(nearby, point, &[], &edinburgh_central(), &rules).unwrap();
        assert_eq!(path.len(), 2);
        let total: f64 = path.windows(2).map(|w| distance(w[0], w[1])).sum();
        assert!(total < rules.proximity_threshold);
    }

    #[test]
    fn routes_around_no_fly_zone_inside_central_area() {
        let rules = FlightRules {
            step_length: 0.001,
            proximity_threshold: 0.001,
            ..FlightRules::default()
        };
        let central = rect("central", (-3.20, 55.94), (-3.18, 55.96));
        let no_fly = vec![rect("block", (-3.193, 55.947), (-3.187, 55.953))];
        let origin = LngLat::new(-3.197, 55.95);
        let destination = LngLat::new(-3.183, 55.95);

        let plan = plan_route_detailed(origin, destination, &no_fly, &central, &rules).unwrap();
        assert!(plan.found());
        assert!(!plan.budget_exhausted);
        assert!(plan.nodes_visited > 1);
        assert_route_constraints(&plan.path, origin, destination, &no_fly, &central, &rules);
        // The straight line is blocked, so the route must be longer than it.
        assert!(plan.moves() as f64 * rules.step_length > distance(origin, destination));
    }

    #[test]
    fn edinburgh_delivery_route() {
        let rules = FlightRules::default();
        let origin = LngLat::new(-3.202541, 55.943285);
        let destination = LngLat::new(-3.186874, 55.944494);
        let central = edinburgh_central();
        let no_fly = vec![george_square()];

        let plan = plan_route_detailed(origin, destination, &no_fly, &central, &rules).unwrap();
        assert!(plan.found());
        assert!(plan.path.len() <= rules.max_moves);
        assert_route_constraints(&plan.path, origin, destination, &no_fly, &central, &rules);
    }

    #[test]
    fn enclosed_origin_has_no_route() {
        let rules = FlightRules::default();
        let central = edinburgh_central();
        // Covers the whole central area with margin on every side.
        let no_fly = vec![rect("ring", (-3.20, 55.94), (-3.18, 55.95))];
        let origin = LngLat::new(-3.19, 55.944);
        let destination = LngLat::new(-3.25, 55.90);

        let plan = plan_route_detailed(origin, destination, &no_fly, &central, &rules).unwrap();
        assert!(plan.path.is_empty());
        assert!(!plan.budget_exhausted);
        assert_eq!(plan.nodes_visited, 1);
    }

    #[test]
    fn central_area_cannot_be_left_once_entered() {
        let rules = FlightRules::default();
        let origin = LngLat::new(-3.19, 55.944);
        // Every neighbour of the origin falls outside this sliver.
        let central = NamedRegion::new(
            "central",
            vec![
                LngLat::new(origin.lng - 0.00005, origin.lat - 0.00005),
                LngLat::new(origin.lng + 0.00005, origin.lat - 0.00005),
                LngLat::new(origin.lng, origin.lat + 0.00005),
            ],
        );
        let destination = LngLat::new(-3.18, 55.944);

        let path = plan_route(origin, destination, &[], &central, &rules).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn expansion_limit_stops_search() {
        let rules = FlightRules::default().with_max_expansions(10);
        let central = edinburgh_central();
        let origin = LngLat::new(-3.30, 55.90);
        let destination = LngLat::new(-3.186874, 55.944494);

        let plan = plan_route_detailed(origin, destination, &[], &central, &rules).unwrap();
        assert!(plan.path.is_empty());
        assert!(plan.budget_exhausted);
        assert_eq!(plan.nodes_visited, 10);
    }

    #[test]
    fn empty_region_is_reported() {
        let rules = FlightRules::default();
        let central = NamedRegion::new("central", Vec::new());
        let result = plan_route(
            LngLat::new(0.0, 0.0),
            LngLat::new(0.01, 0.0),
            &[],
            &central,
            &rules,
        );
        assert_eq!(result, Err(GeometryError::EmptyPolygon));
    }

    #[test]
    fn frontier_pops_equal_scores_in_insertion_order() {
        let node = SearchNode {
            point: LngLat::new(0.0, 0.0),
            g_score: 1.0,
            h_score: 1.0,
            parent: None,
        };
        let mut frontier = Frontier::new();
        frontier.push(7, &node);
        frontier.push(3, &node);
        frontier.push(
            9,
            &SearchNode {
                h_score: 0.5,
                ..node
            },
        );

        assert_eq!(frontier.pop().map(|entry| entry.slot), Some(9));
        assert_eq!(frontier.pop().map(|entry| entry.slot), Some(7));
        assert_eq!(frontier.pop().map(|entry| entry.slot), Some(3));
        assert!(frontier.pop().is_none());
    }
}
