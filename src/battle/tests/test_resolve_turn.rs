#[cfg(test)]
mod tests {
    use crate::battle::engine::TurnResolution;
    use crate::battle::skill_effects::{use_skill, SkillOutcome};
    use crate::battle::state::{
        ActionRejection, BattleCategory, BattleEnd, BattleEvent, BattleSession, EventBus,
        RejectionKind, Side, TurnPhase,
    };
    use crate::battle::tests::common::{
        enemy_acted, run_turn, scripted_rng, test_catalogs, test_roster, wild_session,
        TestCombatantBuilder,
    };
    use crate::config::BattleConfig;
    use crate::player::{BallType, PlayerAction};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_lethal_hit_ends_battle_before_enemy_acts() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![TestCombatantBuilder::new("Striker", 10).build(&data)]);
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).with_hp(5).build(&data));
        let mut rng = scripted_rng(&[]);

        let (resolution, events) =
            run_turn(&mut session, &mut roster, PlayerAction::Attack(0), &data, &mut rng);

        assert_eq!(resolution, TurnResolution::Finished(BattleEnd::PlayerVictory));
        assert_eq!(session.phase, TurnPhase::Terminal(BattleEnd::PlayerVictory));
        assert_eq!(session.enemy.hp(), 0);
        assert!(events.contains(&BattleEvent::Fainted {
            side: Side::Enemy,
            target: "Dummy".to_string(),
        }));
        assert!(!enemy_acted(&events));
        assert!(!events.contains(&BattleEvent::TurnEnded));
    }

    #[test]
    fn test_damage_formula_and_sp_exchange() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![TestCombatantBuilder::new("Striker", 10).build(&data)]);
        let mut session = wild_session(TestCombatantBuilder::new("Bruiser", 10).build(&data));
        // Bruiser answers with Slam, so give the player a bench to fall back on.
        roster
            .add_member(TestCombatantBuilder::new("Medic", 10).build(&data))
            .unwrap();
        let mut rng = scripted_rng(&[]);

        let (_, events) = run_turn(&mut session, &mut roster, PlayerAction::Attack(1), &data, &mut rng);

        // Jab: 50 * 0.3 = 15 raw, minus half of 20 defense.
        assert!(events.contains(&BattleEvent::DamageDealt {
            target: "Bruiser".to_string(),
            damage: 5,
            remaining_hp: 25,
        }));
        assert!(events.contains(&BattleEvent::SpGained {
            target: "Striker".to_string(),
            amount: 15,
            new_sp: 15,
        }));
        // Defender's share for taking Jab plus the attacker's share for Slam.
        // Striker fainted to Slam and gets nothing back.
        assert_eq!(session.enemy.sp(), 10 + 15);
        assert_eq!(roster.team()[0].sp(), 15);
        assert_eq!(roster.active_index, 1);
    }

    #[test]
    fn test_insufficient_sp_is_rejected_without_using_the_turn() {
        let data = test_catalogs();
        let mut roster =
            test_roster(vec![TestCombatantBuilder::new("Medic", 10).with_sp(10).build(&data)]);
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));
        let enemy_before = session.enemy.clone();
        let roster_before = roster.clone();
        let mut rng = scripted_rng(&[]);

        let (resolution, events) =
            run_turn(&mut session, &mut roster, PlayerAction::Attack(3), &data, &mut rng);

        let expected = ActionRejection::InsufficientSp {
            skill: "Big Finish".to_string(),
            required: 50,
            available: 10,
        };
        assert_eq!(expected.kind(), RejectionKind::InsufficientResource);
        assert_eq!(resolution, TurnResolution::Rejected(expected.clone()));
        assert_eq!(events, vec![BattleEvent::ActionRejected { rejection: expected }]);
        assert_eq!(session.turn_counter, 0);
        assert_eq!(session.phase, TurnPhase::AwaitingPlayerAction);
        assert_eq!(session.enemy, enemy_before);
        assert_eq!(roster, roster_before);
    }

    #[test]
    fn test_unaffordable_skill_changes_nothing_when_cast_directly() {
        let data = test_catalogs();
        let mut allies = vec![TestCombatantBuilder::new("Medic", 10).with_sp(49).build(&data)];
        let mut target = TestCombatantBuilder::new("Dummy", 10).build(&data);
        let allies_before = allies.clone();
        let target_before = target.clone();
        let skill = data.skills.lookup("Big Finish").unwrap();
        let mut bus = EventBus::new();

        let outcome = use_skill(
            skill,
            0,
            &mut allies,
            &mut target,
            Side::Player,
            &BattleConfig::default(),
            &mut scripted_rng(&[]),
            &mut bus,
        )
        .unwrap();

        assert_eq!(
            outcome,
            SkillOutcome::InsufficientSp {
                required: 50,
                available: 49
            }
        );
        assert_eq!(allies, allies_before);
        assert_eq!(target, target_before);
    }

    #[rstest]
    #[case::no_such_slot(PlayerAction::Attack(4), ActionRejection::InvalidMoveSlot(4))]
    #[case::no_such_item(PlayerAction::UseItem(0), ActionRejection::InvalidInventorySlot(0))]
    #[case::no_balls(
        PlayerAction::Catch(BallType::Normal),
        ActionRejection::NoCaptureBalls { ball: BallType::Normal }
    )]
    fn test_malformed_actions_are_rejected(
        #[case] action: PlayerAction,
        #[case] expected: ActionRejection,
    ) {
        let data = test_catalogs();
        let mut roster = test_roster(vec![TestCombatantBuilder::new("Striker", 10).build(&data)]);
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (resolution, _) = run_turn(&mut session, &mut roster, action, &data, &mut scripted_rng(&[]));

        assert_eq!(resolution, TurnResolution::Rejected(expected));
        assert_eq!(session.turn_counter, 0);
    }

    #[test]
    fn test_skill_missing_from_catalog_is_rejected() {
        let data = test_catalogs();
        let striker = TestCombatantBuilder::new("Striker", 10)
            .with_moves(&["Strike", "Filibuster"])
            .build(&data);
        let mut roster = test_roster(vec![striker]);
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (resolution, _) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::Attack(1),
            &data,
            &mut scripted_rng(&[]),
        );

        let expected = ActionRejection::UnknownSkill {
            skill: "Filibuster".to_string(),
        };
        assert_eq!(expected.kind(), RejectionKind::UnknownSkill);
        assert_eq!(resolution, TurnResolution::Rejected(expected));
    }

    #[test]
    fn test_finished_battle_refuses_further_actions() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![TestCombatantBuilder::new("Striker", 10).build(&data)]);
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).with_hp(1).build(&data));
        let mut rng = scripted_rng(&[]);
        run_turn(&mut session, &mut roster, PlayerAction::Attack(0), &data, &mut rng);

        let (resolution, _) =
            run_turn(&mut session, &mut roster, PlayerAction::Attack(0), &data, &mut rng);

        assert_eq!(
            resolution,
            TurnResolution::Rejected(ActionRejection::NoBattleInProgress)
        );
        assert_eq!(session.turn_counter, 1);
    }

    #[test]
    fn test_item_use_skips_enemy_phase() {
        let data = test_catalogs();
        let mut roster =
            test_roster(vec![TestCombatantBuilder::new("Striker", 10).with_hp(10).build(&data)]);
        roster.inventory.add(data.items.get("Potion").unwrap().clone());
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (resolution, events) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::UseItem(0),
            &data,
            &mut scripted_rng(&[]),
        );

        assert_eq!(resolution, TurnResolution::Continue);
        assert!(events.contains(&BattleEvent::Healed {
            target: "Striker".to_string(),
            amount: 20,
            new_hp: 30,
        }));
        assert!(!enemy_acted(&events));
        assert!(events.contains(&BattleEvent::TurnEnded));
        assert!(roster.inventory.is_empty());
        assert_eq!(session.turn_counter, 1);
    }

    #[test]
    fn test_useless_item_is_rejected_and_kept() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![TestCombatantBuilder::new("Striker", 10).build(&data)]);
        roster.inventory.add(data.items.get("Potion").unwrap().clone());
        roster.inventory.add(data.items.get("Revive").unwrap().clone());
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        for slot in [0, 1] {
            let (resolution, _) = run_turn(
                &mut session,
                &mut roster,
                PlayerAction::UseItem(slot),
                &data,
                &mut scripted_rng(&[]),
            );
            assert!(matches!(
                resolution,
                TurnResolution::Rejected(ActionRejection::ItemHasNoEffect { .. })
            ));
        }
        assert_eq!(roster.inventory.len(), 2);
    }

    #[test]
    fn test_ball_pack_in_battle_adds_balls() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![TestCombatantBuilder::new("Striker", 10).build(&data)]);
        roster
            .inventory
            .add(data.items.get("Capture Ball Pack").unwrap().clone());
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (_, events) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::UseItem(0),
            &data,
            &mut scripted_rng(&[]),
        );

        assert_eq!(roster.capture_balls, 3);
        assert!(events.contains(&BattleEvent::BallsReceived {
            ball: BallType::Normal,
            count: 3,
            total: 3,
        }));
        assert!(!enemy_acted(&events));
    }

    #[test]
    fn test_voluntary_switch_skips_enemy_phase() {
        let data = test_catalogs();
        let mut roster = test_roster(vec![
            TestCombatantBuilder::new("Striker", 10).build(&data),
            TestCombatantBuilder::new("Medic", 10).build(&data),
        ]);
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (resolution, events) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::SwitchActiveCombatant(1),
            &data,
            &mut scripted_rng(&[]),
        );

        assert_eq!(resolution, TurnResolution::Continue);
        assert_eq!(roster.active_index, 1);
        assert!(events.contains(&BattleEvent::CombatantSwitched {
            old: "Striker".to_string(),
            new: "Medic".to_string(),
            forced: false,
        }));
        assert!(!enemy_acted(&events));
        // Only the new active member ticks at turn end.
        assert_eq!(roster.team()[0].battle_turn_counter, 0);
        assert_eq!(roster.team()[1].battle_turn_counter, 1);
    }

    #[rstest]
    #[case::already_active(0, ActionRejection::AlreadyActive { name: "Striker".to_string() })]
    #[case::fainted(2, ActionRejection::CombatantFainted { name: "Bruiser".to_string() })]
    #[case::out_of_range(7, ActionRejection::InvalidRosterIndex(7))]
    fn test_invalid_switch_targets(#[case] index: usize, #[case] expected: ActionRejection) {
        let data = test_catalogs();
        let mut roster = test_roster(vec![
            TestCombatantBuilder::new("Striker", 10).build(&data),
            TestCombatantBuilder::new("Medic", 10).build(&data),
            TestCombatantBuilder::new("Bruiser", 10).with_hp(0).build(&data),
        ]);
        let mut session = wild_session(TestCombatantBuilder::new("Dummy", 10).build(&data));

        let (resolution, _) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::SwitchActiveCombatant(index),
            &data,
            &mut scripted_rng(&[]),
        );

        assert_eq!(expected.kind(), RejectionKind::InvalidTarget);
        assert_eq!(resolution, TurnResolution::Rejected(expected));
        assert_eq!(roster.active_index, 0);
    }

    #[rstest]
    #[case::wild_escape(BattleCategory::Wild, 0.49, true)]
    #[case::wild_caught(BattleCategory::Wild, 0.51, false)]
    #[case::boss_escape(BattleCategory::MiniBoss, 0.05, true)]
    #[case::boss_caught(BattleCategory::StageBoss, 0.2, false)]
    fn test_flee(#[case] category: BattleCategory, #[case] draw: f64, #[case] escapes: bool) {
        let data = test_catalogs();
        let mut roster = test_roster(vec![TestCombatantBuilder::new("Striker", 10).build(&data)]);
        let enemy = TestCombatantBuilder::new("Dummy", 10).build(&data);
        let mut session = BattleSession::new(category, enemy, None);

        let (resolution, events) = run_turn(
            &mut session,
            &mut roster,
            PlayerAction::Flee,
            &data,
            &mut scripted_rng(&[draw]),
        );

        if escapes {
            assert_eq!(resolution, TurnResolution::Finished(BattleEnd::FleeSuccess));
            assert!(events.contains(&BattleEvent::FleeSucceeded));
            assert!(!enemy_acted(&events));
        } else {
            assert_eq!(resolution, TurnResolution::Continue);
            assert!(events.contains(&BattleEvent::FleeFailed));
            assert!(enemy_acted(&events));
        }
    }
}
