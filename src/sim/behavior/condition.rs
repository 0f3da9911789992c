//! Boolean predicates that pick a branch.

use crate::sim::grid::has_line_of_sight;

use super::BehaviorContext;

/// Predicates over the agent, the player and the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Player within the agent's detection radius
    Detected,
    /// Nothing blocks the line from the agent to the player
    Visible,
    /// Player close enough for melee engagement (within combat radius)
    CloseCombat,
    /// Player far enough for ranged engagement (beyond combat radius)
    RangedCombat,
}

impl Condition {
    pub fn name(&self) -> &'static str {
        match self {
            Condition::Detected => "Detected",
            Condition::Visible => "Visible",
            Condition::CloseCombat => "CloseCombat",
            Condition::RangedCombat => "RangedCombat",
        }
    }

    pub fn evaluate(&self, ctx: &BehaviorContext<'_>) -> bool {
        let enemy = &*ctx.enemy;
        let distance = enemy.distance_to(ctx.player);
        match self {
            Condition::Detected => distance <= enemy.detection_radius,
            Condition::Visible => {
                has_line_of_sight(enemy.body.pos, ctx.player.body.pos, &ctx.world.obstacles)
            }
            Condition::CloseCombat => distance <= enemy.combat_radius,
            Condition::RangedCombat => distance > enemy.combat_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::behavior::test_support::Fixture;
    use crate::sim::collision::Circle;

    #[test]
    fn test_detected_uses_detection_radius() {
        let mut fixture = Fixture::new();
        fixture.place_player(Vec2::new(450.0, 100.0));
        assert!(Condition::Detected.evaluate(&fixture.ctx()));

        fixture.place_player(Vec2::new(501.0, 100.0));
        assert!(!Condition::Detected.evaluate(&fixture.ctx()));
    }

    #[test]
    fn test_visible_blocked_by_obstacle() {
        let mut fixture = Fixture::new();
        fixture.place_player(Vec2::new(400.0, 100.0));
        assert!(Condition::Visible.evaluate(&fixture.ctx()));

        fixture.world.obstacles.push(Circle::new(Vec2::new(250.0, 100.0), 30.0));
        assert!(!Condition::Visible.evaluate(&fixture.ctx()));
    }

    #[test]
    fn test_combat_ranges_are_complementary() {
        let mut fixture = Fixture::new();
        for x in [150.0, 300.0, 399.0, 400.0, 401.0, 480.0] {
            fixture.place_player(Vec2::new(x, 100.0));
            let ctx = fixture.ctx();
            assert_ne!(
                Condition::CloseCombat.evaluate(&ctx),
                Condition::RangedCombat.evaluate(&ctx)
            );
        }

        fixture.place_player(Vec2::new(350.0, 100.0));
        assert!(Condition::CloseCombat.evaluate(&fixture.ctx()));
        fixture.place_player(Vec2::new(450.0, 100.0));
        assert!(Condition::RangedCombat.evaluate(&fixture.ctx()));
    }
}
