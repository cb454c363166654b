//! Container resolution for dropped and dragged nodes.
//!
//! When a node lands on the canvas the editor looks for the container it
//! belongs to: the smallest container whose padded bounds hold the node's
//! center and whose rules accept the node's shape. The resolver only decides;
//! the graph store applies the resulting [`Placement`].

use indexmap::IndexMap;
use log::debug;

use flowboard_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    shape::ShapeKind,
};

/// Which child shapes each container shape refuses.
///
/// A container shape with no rule accepts nothing. The built-in rules let a
/// pool hold anything but another pool, and a lane hold anything but pools
/// and lanes.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainmentRules {
    rejects: IndexMap<ShapeKind, Vec<ShapeKind>>,
}

impl Default for ContainmentRules {
    fn default() -> Self {
        Self::empty()
            .with_rule(ShapeKind::Pool, [ShapeKind::Pool])
            .with_rule(ShapeKind::Lane, [ShapeKind::Pool, ShapeKind::Lane])
    }
}

impl ContainmentRules {
    /// Rules under which no container accepts anything.
    pub fn empty() -> Self {
        Self {
            rejects: IndexMap::new(),
        }
    }

    /// Adds or replaces the rule for `container`.
    pub fn with_rule(
        mut self,
        container: ShapeKind,
        rejects: impl IntoIterator<Item = ShapeKind>,
    ) -> Self {
        self.rejects.insert(container, rejects.into_iter().collect());
        self
    }

    /// Returns true if a `container` may hold a `child`.
    pub fn accepts(&self, container: &ShapeKind, child: &ShapeKind) -> bool {
        self.rejects
            .get(container)
            .is_some_and(|rejected| !rejected.contains(child))
    }
}

/// A container that a node might be placed into.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    id: Id,
    shape: ShapeKind,
    bounds: Bounds,
}

impl Candidate {
    /// Creates a candidate from a container's id, shape and absolute bounds.
    pub fn new(id: Id, shape: ShapeKind, bounds: Bounds) -> Self {
        Self { id, shape, bounds }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Where a node ends up: its parent and its position relative to that parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    parent: Option<Id>,
    position: Point,
}

impl Placement {
    /// The chosen container, if any.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Local position inside the parent, or the absolute position when unparented.
    pub fn position(&self) -> Point {
        self.position
    }
}

/// Picks the container a node belongs to.
#[derive(Debug, Clone)]
pub struct ContainmentResolver {
    rules: ContainmentRules,
    padding: f32,
}

impl Default for ContainmentResolver {
    fn default() -> Self {
        Self::new(ContainmentRules::default(), 8.0)
    }
}

impl ContainmentResolver {
    pub fn new(rules: ContainmentRules, padding: f32) -> Self {
        Self { rules, padding }
    }

    pub fn rules(&self) -> &ContainmentRules {
        &self.rules
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Returns the best container for a node with the given
    /// absolute bounds and shape.
    ///
    /// A candidate qualifies when it has a positive area, its rules accept
    /// `shape`, and the node's center lies strictly inside its bounds inset
    /// by the padding. Among qualifying candidates the smallest area wins;
    /// ties keep the earliest candidate.
    pub fn resolve<'a>(
        &self,
        moving: Bounds,
        shape: &ShapeKind,
        candidates: impl IntoIterator<Item = &'a Candidate>,
    ) -> Option<&'a Candidate> {
        let center = moving.center();
        candidates
            .into_iter()
            .filter(|candidate| candidate.bounds.width() > 0.0 && candidate.bounds.height() > 0.0)
            .filter(|candidate| self.rules.accepts(&candidate.shape, shape))
            .filter(|candidate| candidate.bounds.contains_point_inset(center, self.padding))
            .fold(None, |best: Option<&'a Candidate>, candidate| match best {
                Some(current) if current.bounds.area() <= candidate.bounds.area() => Some(current),
                _ => Some(candidate),
            })
    }

    /// Resolves the container and computes the node's resulting position.
    pub fn place<'a>(
        &self,
        moving: Bounds,
        shape: &ShapeKind,
        candidates: impl IntoIterator<Item = &'a Candidate>,
    ) -> Placement {
        let absolute = moving.min_point();
        match self.resolve(moving, shape, candidates) {
            Some(container) => {
                debug!(container:% = container.id, shape:% = shape; "Placing node inside container");
                Placement {
                    parent: Some(container.id),
                    position: absolute.sub_point(container.bounds.min_point()),
                }
            }
            None => Placement {
                parent: None,
                position: absolute,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use flowboard_core::geometry::Size;

    use super::*;

    fn candidate(id: &str, shape: ShapeKind, x: f32, y: f32, w: f32, h: f32) -> Candidate {
        Candidate::new(
            Id::new(id),
            shape,
            Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)),
        )
    }

    fn task_at(x: f32, y: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(160.0, 80.0))
    }

    #[test]
    fn test_default_rules() {
        let rules = ContainmentRules::default();
        assert!(rules.accepts(&ShapeKind::Pool, &ShapeKind::Lane));
        assert!(rules.accepts(&ShapeKind::Pool, &ShapeKind::Task));
        assert!(!rules.accepts(&ShapeKind::Pool, &ShapeKind::Pool));
        assert!(rules.accepts(&ShapeKind::Lane, &ShapeKind::Task));
        assert!(!rules.accepts(&ShapeKind::Lane, &ShapeKind::Lane));
        assert!(!rules.accepts(&ShapeKind::Lane, &ShapeKind::Pool));
        assert!(!rules.accepts(&ShapeKind::Task, &ShapeKind::Task));
    }

    #[test]
    fn test_smallest_container_wins() {
        let resolver = ContainmentResolver::default();
        let candidates = [
            candidate("pool", ShapeKind::Pool, 0.0, 0.0, 800.0, 300.0),
            candidate("lane", ShapeKind::Lane, 0.0, 0.0, 600.0, 200.0),
        ];

        let placement = resolver.place(task_at(100.0, 50.0), &ShapeKind::Task, &candidates);
        assert_eq!(placement.parent(), Some(Id::new("lane")));
        assert_approx_eq!(f32, placement.position().x(), 100.0);
        assert_approx_eq!(f32, placement.position().y(), 50.0);
    }

    #[test]
    fn test_local_position_is_relative_to_container() {
        let resolver = ContainmentResolver::default();
        let candidates = [candidate("pool", ShapeKind::Pool, 100.0, 200.0, 800.0, 300.0)];

        let placement = resolver.place(task_at(150.0, 260.0), &ShapeKind::Task, &candidates);
        assert_eq!(placement.parent(), Some(Id::new("pool")));
        assert_approx_eq!(f32, placement.position().x(), 50.0);
        assert_approx_eq!(f32, placement.position().y(), 60.0);
    }

    #[test]
    fn test_rejected_shape_stays_unparented() {
        let resolver = ContainmentResolver::default();
        let candidates = [candidate("lane", ShapeKind::Lane, 0.0, 0.0, 600.0, 200.0)];
        let pool = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(100.0, 50.0));

        let placement = resolver.place(pool, &ShapeKind::Pool, &candidates);
        assert_eq!(placement.parent(), None);
        assert_approx_eq!(f32, placement.position().x(), 10.0);
        assert_approx_eq!(f32, placement.position().y(), 10.0);
    }

    #[test]
    fn test_center_within_padding_is_outside() {
        let resolver = ContainmentResolver::default();
        let candidates = [candidate("lane", ShapeKind::Lane, 0.0, 0.0, 600.0, 200.0)];

        // Center at (84, 44).
        let inside = resolver.resolve(task_at(4.0, 4.0), &ShapeKind::Task, &candidates);
        assert!(inside.is_some());

        // Center at (596, 100): within the 8 unit padding band on the right.
        let near_edge = resolver.resolve(task_at(516.0, 60.0), &ShapeKind::Task, &candidates);
        assert!(near_edge.is_none());

        // Center exactly on the inset boundary (592) does not qualify.
        let on_boundary = resolver.resolve(task_at(512.0, 60.0), &ShapeKind::Task, &candidates);
        assert!(on_boundary.is_none());
    }

    #[test]
    fn test_degenerate_candidates_are_ignored() {
        let resolver = ContainmentResolver::default();
        let candidates = [candidate("flat", ShapeKind::Pool, 0.0, 0.0, 800.0, 0.0)];
        assert!(resolver.resolve(task_at(10.0, 0.0), &ShapeKind::Task, &candidates).is_none());
    }

    #[test]
    fn test_equal_areas_keep_candidate_order() {
        let resolver = ContainmentResolver::default();
        let candidates = [
            candidate("first", ShapeKind::Pool, 0.0, 0.0, 800.0, 300.0),
            candidate("second", ShapeKind::Pool, 0.0, 0.0, 800.0, 300.0),
        ];
        let chosen = resolver.resolve(task_at(100.0, 100.0), &ShapeKind::Task, &candidates);
        assert_eq!(chosen.map(Candidate::id), Some(Id::new("first")));
    }
}
