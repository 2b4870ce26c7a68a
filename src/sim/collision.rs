//! Collision detection and response against static platforms
//!
//! Dynamic bodies are axis-aligned boxes. Overlaps are resolved along the
//! axis of least penetration (minimum translation), which is enough for the
//! handful of bodies alive at once; there is no broad-phase structure.

use glam::Vec2;

use super::rect::Rect;

/// Outcome of a resolution pass for one body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Pushed up out of a platform (standing on it)
    pub ground: bool,
    /// Pushed down out of a platform (head bump)
    pub ceiling: bool,
    /// Pushed sideways out of a platform
    pub wall: bool,
}

/// Push a body out of every platform it overlaps.
///
/// Platforms are visited in order and the body rectangle is rebuilt after
/// each push. The velocity component along the resolved axis is zeroed.
pub fn resolve_platforms(
    pos: &mut Vec2,
    vel: &mut Vec2,
    size: Vec2,
    platforms: &[Rect],
) -> Contacts {
    let mut contacts = Contacts::default();

    for platform in platforms {
        let body = Rect::from_pos_size(*pos, size);
        let Some(depth) = body.overlap_depth(platform) else {
            continue;
        };

        if depth.x < depth.y {
            if pos.x < platform.x {
                pos.x = platform.x - size.x;
            } else {
                pos.x = platform.right();
            }
            vel.x = 0.0;
            contacts.wall = true;
        } else if pos.y < platform.y {
            pos.y = platform.y - size.y;
            vel.y = 0.0;
            contacts.ground = true;
        } else {
            pos.y = platform.bottom();
            vel.y = 0.0;
            contacts.ceiling = true;
        }
    }

    contacts
}

/// Land a falling body on platforms; horizontal contact is ignored.
///
/// Returns true when the body is standing on something after the pass.
pub fn land_on_platforms(pos: &mut Vec2, vel: &mut Vec2, size: Vec2, platforms: &[Rect]) -> bool {
    let mut grounded = false;

    for platform in platforms {
        let body = Rect::from_pos_size(*pos, size);
        if body.overlaps(platform) && vel.y > 0.0 && body.bottom() < platform.bottom() {
            pos.y = platform.y - size.y;
            vel.y = 0.0;
            grounded = true;
        }
    }

    grounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GROUND: Rect = Rect::new(0.0, 540.0, 5000.0, 60.0);

    #[test]
    fn test_resting_body_lands() {
        let size = Vec2::new(26.0, 34.0);
        let mut pos = Vec2::new(40.0, 506.6);
        let mut vel = Vec2::new(0.0, 0.6);

        let contacts = resolve_platforms(&mut pos, &mut vel, size, &[GROUND]);
        assert!(contacts.ground);
        assert_eq!(pos.y, 506.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_side_push() {
        let wall = Rect::new(100.0, 0.0, 20.0, 200.0);
        let size = Vec2::new(26.0, 34.0);
        let mut pos = Vec2::new(78.0, 50.0);
        let mut vel = Vec2::new(3.0, 0.0);

        let contacts = resolve_platforms(&mut pos, &mut vel, size, &[wall]);
        assert!(contacts.wall);
        assert!(!contacts.ground);
        assert_eq!(pos.x, 74.0);
        assert_eq!(vel.x, 0.0);
    }

    #[test]
    fn test_head_bump() {
        let ledge = Rect::new(0.0, 100.0, 200.0, 20.0);
        let size = Vec2::new(26.0, 34.0);
        let mut pos = Vec2::new(50.0, 118.0);
        let mut vel = Vec2::new(0.0, -8.0);

        let contacts = resolve_platforms(&mut pos, &mut vel, size, &[ledge]);
        assert!(contacts.ceiling);
        assert_eq!(pos.y, 120.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_no_contact_in_air() {
        let mut pos = Vec2::new(40.0, 100.0);
        let mut vel = Vec2::new(0.0, 2.0);
        let contacts = resolve_platforms(&mut pos, &mut vel, Vec2::new(26.0, 34.0), &[GROUND]);
        assert_eq!(contacts, Contacts::default());
        assert_eq!(vel.y, 2.0);
    }

    #[test]
    fn test_landing_ignores_rising_body() {
        let size = Vec2::new(24.0, 24.0);
        let mut pos = Vec2::new(10.0, 520.0);
        let mut vel = Vec2::new(0.0, -3.0);
        assert!(!land_on_platforms(&mut pos, &mut vel, size, &[GROUND]));
        assert_eq!(pos.y, 520.0);

        let mut vel = Vec2::new(0.0, 3.0);
        assert!(land_on_platforms(&mut pos, &mut vel, size, &[GROUND]));
        assert_eq!(pos.y, 516.0);
    }

    proptest! {
        #[test]
        fn prop_resolution_fully_ejects(
            px in -500i32..500, py in -500i32..500,
            pw in 1i32..400, ph in 1i32..400,
            bw in 1i32..60, bh in 1i32..60,
            fx in 0.0f32..1.0, fy in 0.0f32..1.0,
        ) {
            let platform = Rect::new(px as f32, py as f32, pw as f32, ph as f32);
            let size = Vec2::new(bw as f32, bh as f32);
            // Any top-left corner that yields an overlap
            let mut pos = Vec2::new(
                platform.x - size.x + 0.01 + fx * (platform.w + size.x - 0.02),
                platform.y - size.y + 0.01 + fy * (platform.h + size.y - 0.02),
            );
            let mut vel = Vec2::new(1.0, 1.0);
            prop_assume!(Rect::from_pos_size(pos, size).overlaps(&platform));

            let contacts = resolve_platforms(&mut pos, &mut vel, size, &[platform]);

            prop_assert!(!Rect::from_pos_size(pos, size).overlaps(&platform));
            prop_assert!(contacts.ground || contacts.ceiling || contacts.wall);
            if contacts.ground {
                prop_assert_eq!(vel.y, 0.0);
                prop_assert_eq!(pos.y + size.y, platform.y);
            }
        }

        #[test]
        fn prop_ground_only_when_pushed_up(
            y in 300.0f32..700.0,
            vy in -10.0f32..10.0,
        ) {
            let size = Vec2::new(26.0, 34.0);
            let mut pos = Vec2::new(40.0, y);
            let before = pos;
            let mut vel = Vec2::new(0.0, vy);
            let contacts = resolve_platforms(&mut pos, &mut vel, size, &[GROUND]);
            prop_assert_eq!(contacts.ground, pos.y < before.y);
        }
    }
}
