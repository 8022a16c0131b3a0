#[cfg(test)]
mod tests {
    use crate::battle::engine::{resolve_turn, TurnResolution};
    use crate::battle::state::{ActionRejection, BattleEnd, BattleEvent, EventBus};
    use crate::battle::tests::common::{
        enemy_acted, run_turn, scripted_rng, test_catalogs, test_roster, wild_session,
        TestCombatantBuilder,
    };
    use crate::config::BattleConfig;
    use crate::errors::BattleError;
    use crate::player::PlayerAction;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forced_replacement_then_defeat() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![
            TestCombatantBuilder::new("Striker", 10).build(&data),
            TestCombatantBuilder::new("Medic", 10).build(&data),
        ]);
        let mut session = wild_session(TestCombatantBuilder::new("Bruiser", 10).build(&data));
        let mut rng = scripted_rng(&[0.99]);

        let (resolution, events) =
            run_turn(&mut session, &mut roster, PlayerAction::Attack(1), &data, &mut rng);

        assert_eq!(resolution, TurnResolution::Continue);
        assert!(roster.team()[0].is_fainted());
        assert_eq!(roster.active_index, 1);
        assert!(events.contains(&BattleEvent::CombatantSwitched {
            old: "Striker".to_string(),
            new: "Medic".to_string(),
            forced: true,
        }));
        // The replacement is the one ticking at turn end.
        assert_eq!(roster.team()[1].battle_turn_counter, 1);

        let (resolution, events) =
            run_turn(&mut session, &mut roster, PlayerAction::Flee, &data, &mut rng);

        assert_eq!(resolution, TurnResolution::Finished(BattleEnd::PlayerDefeat));
        assert!(enemy_acted(&events));
        assert!(!roster.has_living_member());
    }

    #[test]
    fn test_revive_skill_brings_back_first_fainted_ally() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![
            TestCombatantBuilder::new("Striker", 10).with_hp(0).build(&data),
            TestCombatantBuilder::new("Medic", 10).with_sp(20).build(&data),
        ]);
        roster.active_index = 1;
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (resolution, events) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::Attack(0),
            &data,
            &mut scripted_rng(&[]),
        );

        assert_eq!(resolution, TurnResolution::Continue);
        assert!(events.contains(&BattleEvent::Revived {
            target: "Striker".to_string(),
            hp: 15,
        }));
        assert_eq!(roster.team()[0].hp(), 15);
        assert_eq!(roster.team()[1].sp(), 0);
        assert!(enemy_acted(&events));
    }

    #[test]
    fn test_revive_skill_without_fainted_ally_is_rejected() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![
            TestCombatantBuilder::new("Striker", 10).build(&data),
            TestCombatantBuilder::new("Medic", 10).with_sp(20).build(&data),
        ]);
        roster.active_index = 1;
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (resolution, _) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::Attack(0),
            &data,
            &mut scripted_rng(&[]),
        );

        assert_eq!(
            resolution,
            TurnResolution::Rejected(ActionRejection::NoFaintedAlly {
                skill: "Second Wind".to_string()
            })
        );
        assert_eq!(roster.team()[1].sp(), 20);
    }

    #[test]
    fn test_revive_item_targets_fainted_member_not_active() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![
            TestCombatantBuilder::new("Striker", 10).with_hp(0).build(&data),
            TestCombatantBuilder::new("Medic", 10).with_hp(3).build(&data),
        ]);
        roster.active_index = 1;
        roster.inventory.add(data.items.get("Revive").unwrap().clone());
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (resolution, events) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::UseItem(0),
            &data,
            &mut scripted_rng(&[]),
        );

        assert_eq!(resolution, TurnResolution::Continue);
        assert_eq!(roster.team()[0].hp(), 15);
        assert_eq!(roster.team()[1].hp(), 3);
        assert!(events.contains(&BattleEvent::ItemUsed {
            item: "Revive".to_string(),
            target: "Striker".to_string(),
        }));
        assert!(!enemy_acted(&events));
        assert!(roster.inventory.is_empty());
    }

    #[test]
    fn test_fainted_active_at_turn_start_is_a_fault() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![
            TestCombatantBuilder::new("Striker", 10).with_hp(0).build(&data),
            TestCombatantBuilder::new("Medic", 10).build(&data),
        ]);
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));
        let mut bus = EventBus::new();

        let result = resolve_turn(
            &mut session,
            &mut roster,
            PlayerAction::Flee,
            &data,
            &BattleConfig::default(),
            &mut scripted_rng(&[]),
            &mut bus,
        );

        assert!(matches!(result, Err(BattleError::InconsistentState(_))));
        assert_eq!(session.turn_counter, 0);
    }
}
