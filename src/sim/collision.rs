//! Spatial queries shared by every subsystem
//!
//! Both predicates are pure. Disabled entities never collide, so a parked
//! slot is invisible to every check even if two parked slots share a spot.

use super::entity::Entity;

/// Margin-free AABB overlap between two enabled entities
#[inline]
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    if !a.enabled || !b.enabled {
        return false;
    }
    let d = (a.pos - b.pos).abs();
    d.x < a.half_extents.x + b.half_extents.x && d.y < a.half_extents.y + b.half_extents.y
}

/// True if `a` is horizontally within `margin` (plus its own half width) of
/// `b`, whatever their vertical positions
#[inline]
pub fn is_above(a: &Entity, b: &Entity, margin: f32) -> bool {
    (a.pos.x - b.pos.x).abs() < a.half_extents.x + margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Visual;
    use glam::Vec2;
    use proptest::prelude::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Entity {
        Entity::new(Visual::Hidden, Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap_touching_edges_is_not_overlap() {
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        let b = boxed(1.0, 0.0, 1.0, 1.0);
        assert!(!overlaps(&a, &b));

        let c = boxed(0.9, 0.9, 1.0, 1.0);
        assert!(overlaps(&a, &c));
    }

    #[test]
    fn test_disabled_never_overlaps() {
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        let mut b = a;
        assert!(overlaps(&a, &b));
        b.park();
        assert!(!overlaps(&a, &b));
        // Two parked entities share a spot but stay invisible
        let mut c = a;
        c.park();
        assert!(!overlaps(&b, &c));
    }

    #[test]
    fn test_is_above_ignores_height() {
        let invader = boxed(0.5, 2.5, 0.25, 0.25);
        let ship = boxed(0.0, -2.75, 0.25, 0.25);
        // |dx| = 0.5 < 0.125 + 0.3 is false, 0.5 < 0.125 + 0.4 is true
        assert!(!is_above(&invader, &ship, 0.3));
        assert!(is_above(&invader, &ship, 0.4));
    }

    fn arb_entity() -> impl Strategy<Value = Entity> {
        (-4.0f32..4.0, -4.0f32..4.0, 0.0f32..2.0, 0.0f32..2.0, any::<bool>()).prop_map(
            |(x, y, w, h, enabled)| {
                let mut e = boxed(x, y, w, h);
                if !enabled {
                    e.park();
                }
                e
            },
        )
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_entity(), b in arb_entity()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_despawned_is_collision_invisible(a in arb_entity(), b in arb_entity()) {
            let mut a = a;
            a.park();
            prop_assert!(!overlaps(&a, &b));
            prop_assert!(!overlaps(&b, &a));
        }
    }
}
