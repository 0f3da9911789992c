//! Per-agent decision trees
//!
//! Each enemy owns a shared reference to an immutable [`BehaviorTree`]. Every
//! tick the tree is walked from the root: conditions pick a branch, the
//! reached action writes steering and attack requests into the agent. No
//! state is kept between walks except what actions write into the agent.

pub mod action;
pub mod condition;
pub mod tree;

pub use action::{Action, ActionOutcome, AttackKind, AttackProfile};
pub use condition::Condition;
pub use tree::{BehaviorTree, Node, NodeId, Trace, TreeBuilder, TreeError};

use super::state::{Enemy, GameEvent, Player, World};

/// Everything a node may read or write during one walk
pub struct BehaviorContext<'a> {
    pub enemy: &'a mut Enemy,
    pub player: &'a Player,
    pub world: &'a mut World,
    pub events: &'a mut Vec<GameEvent>,
    pub dt: f32,
}


#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::test_support::Fixture;
    use super::*;
    use crate::sim::collision::Circle;
    use crate::sim::scenario::{close_combat_tree, ranged_combat_tree};

    /// Node names along the walked path
    fn walk(tree: &BehaviorTree, fixture: &mut Fixture) -> Vec<&'static str> {
        let trace = tree.traverse(&mut fixture.ctx());
        trace
            .path
            .iter()
            .filter_map(|&id| tree.node(id).map(Node::name))
            .collect()
    }

    /// Fixture tuned like the stock ranged enemy
    fn ranged_fixture() -> Fixture {
        let mut fixture = Fixture::new();
        fixture.enemy.detection_radius = 600.0;
        fixture.enemy.combat_radius = 400.0;
        fixture
    }

    #[test]
    fn test_undetected_player_patrols() {
        let tree = close_combat_tree().unwrap();
        let mut fixture = Fixture::new();
        assert_eq!(walk(&tree, &mut fixture), ["Detected", "Patrol"]);
    }

    #[test]
    fn test_close_player_is_attacked() {
        let tree = close_combat_tree().unwrap();
        let mut fixture = Fixture::new();
        fixture.place_player(Vec2::new(250.0, 100.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "CloseCombat", "CloseAttack"]
        );
        assert!(!fixture.world.projectiles.is_empty());
    }

    #[test]
    fn test_attack_out_of_range_falls_back_to_arrive() {
        let tree = close_combat_tree().unwrap();
        let mut fixture = Fixture::new();
        // Inside combat radius (300) but beyond melee range (200)
        fixture.place_player(Vec2::new(350.0, 100.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "CloseCombat", "CloseAttack", "Arrive"]
        );
        assert!(fixture.world.projectiles.is_empty());
    }

    #[test]
    fn test_detected_beyond_combat_radius_arrives() {
        let tree = close_combat_tree().unwrap();
        let mut fixture = Fixture::new();
        fixture.place_player(Vec2::new(450.0, 100.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "CloseCombat", "Arrive"]
        );
    }

    #[test]
    fn test_hidden_player_seeks_visibility_then_patrols() {
        let tree = close_combat_tree().unwrap();
        let mut fixture = Fixture::new();
        fixture.place_player(Vec2::new(400.0, 100.0));
        fixture.world.obstacles.push(Circle::new(Vec2::new(250.0, 100.0), 60.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "FindVisibility"]
        );

        // Player buried in an obstacle: no vantage point, fall back to patrol
        fixture.world.obstacles.push(Circle::new(Vec2::new(400.0, 100.0), 2000.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "FindVisibility", "Patrol"]
        );
    }

    #[test]
    fn test_ranged_enemy_flees_when_crowded() {
        let tree = ranged_combat_tree().unwrap();
        let mut fixture = ranged_fixture();
        fixture.place_player(Vec2::new(300.0, 100.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "RangedCombat", "Flee"]
        );
        assert!(fixture.world.projectiles.is_empty());
        // Accelerating away from the player
        assert!(fixture.enemy.body.acc.x < 0.0);
    }

    #[test]
    fn test_ranged_enemy_shoots_inside_band() {
        let tree = ranged_combat_tree().unwrap();
        let mut fixture = ranged_fixture();
        fixture.place_player(Vec2::new(550.0, 100.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "RangedCombat", "RangedAttack"]
        );
        assert_eq!(fixture.world.projectiles.len(), 1);
    }

    #[test]
    fn test_ranged_attack_out_of_reach_falls_back_to_patrol() {
        let tree = ranged_combat_tree().unwrap();
        let mut fixture = ranged_fixture();
        // Detected (600) but beyond the shot range
        fixture.place_player(Vec2::new(650.0, 100.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "RangedCombat", "RangedAttack", "Patrol"]
        );
        assert!(fixture.world.projectiles.is_empty());
    }

    #[test]
    fn test_ranged_hidden_player_falls_back_to_patrol() {
        let tree = ranged_combat_tree().unwrap();
        let mut fixture = ranged_fixture();
        fixture.place_player(Vec2::new(500.0, 100.0));
        fixture.world.obstacles.push(Circle::new(Vec2::new(500.0, 100.0), 2000.0));
        assert_eq!(
            walk(&tree, &mut fixture),
            ["Detected", "Visible", "FindVisibility", "Patrol"]
        );
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let tree = close_combat_tree().unwrap();
        let mut first = Fixture::new();
        first.place_player(Vec2::new(250.0, 140.0));
        first.world.obstacles.push(Circle::new(Vec2::new(600.0, 600.0), 40.0));
        first.world.waypoints = vec![Vec2::new(500.0, 500.0), Vec2::new(50.0, 700.0)];
        let mut second = Fixture::new();
        second.player = first.player.clone();
        second.world = first.world.clone();

        let trace_a = tree.traverse(&mut first.ctx());
        let trace_b = tree.traverse(&mut second.ctx());

        assert_eq!(trace_a, trace_b);
        assert_eq!(first.enemy.body, second.enemy.body);
        assert_eq!(first.enemy.point, second.enemy.point);
        assert_eq!(first.world.projectiles, second.world.projectiles);
        assert_eq!(first.events, second.events);
    }

    #[test]
    fn test_path_visits_each_node_once() {
        for tree in [close_combat_tree().unwrap(), ranged_combat_tree().unwrap()] {
            for x in [150.0, 250.0, 350.0, 450.0, 550.0, 650.0, 900.0] {
                let mut fixture = ranged_fixture();
                fixture.place_player(Vec2::new(x, 100.0));
                let trace = tree.traverse(&mut fixture.ctx());
                let mut seen = trace.path.clone();
                seen.sort();
                seen.dedup();
                assert_eq!(seen.len(), trace.path.len());
                assert!(trace.path.len() <= tree.len());
            }
        }
    }
}
