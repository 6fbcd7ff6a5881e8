//! Attribute domains: the element granularity an attribute is stored on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A domain is only meaningful relative to a component: the same tag can have a different
/// element count on every component, and most components support only a few domains.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeDomain {
    Point,
    Edge,
    Corner,
    Face,
    Curve,
    Instance,
}

impl AttributeDomain {
    pub const ALL: [AttributeDomain; 6] = [
        AttributeDomain::Point,
        AttributeDomain::Edge,
        AttributeDomain::Corner,
        AttributeDomain::Face,
        AttributeDomain::Curve,
        AttributeDomain::Instance,
    ];

    /// Fixed total order used when several inputs disagree on a domain. Higher wins:
    /// corner > point > edge > face > curve > instance.
    pub fn priority(self) -> u8 {
        match self {
            AttributeDomain::Instance => 0,
            AttributeDomain::Curve => 1,
            AttributeDomain::Face => 2,
            AttributeDomain::Edge => 3,
            AttributeDomain::Point => 4,
            AttributeDomain::Corner => 5,
        }
    }

    /// The highest priority domain in `domains`, or `None` when empty.
    pub fn highest_priority(
        domains: impl IntoIterator<Item = AttributeDomain>,
    ) -> Option<AttributeDomain> {
        domains.into_iter().max_by_key(|d| d.priority())
    }

    pub fn name(self) -> &'static str {
        match self {
            AttributeDomain::Point => "Point",
            AttributeDomain::Edge => "Edge",
            AttributeDomain::Corner => "Face Corner",
            AttributeDomain::Face => "Face",
            AttributeDomain::Curve => "Spline",
            AttributeDomain::Instance => "Instance",
        }
    }
}

impl fmt::Display for AttributeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_a_total_order() {
        let mut seen: Vec<u8> = AttributeDomain::ALL.iter().map(|d| d.priority()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), AttributeDomain::ALL.len());
    }

    #[test]
    fn corner_beats_point_beats_face() {
        use AttributeDomain::*;
        assert_eq!(AttributeDomain::highest_priority([Face, Point]), Some(Point));
        assert_eq!(AttributeDomain::highest_priority([Point, Corner, Edge]), Some(Corner));
        assert_eq!(AttributeDomain::highest_priority([Edge, Face]), Some(Edge));
        assert_eq!(AttributeDomain::highest_priority([]), None);
    }
}
