use crewmon::battle::ai::GreedyAutopilot;
use crewmon::battle::controller::{BattleController, EncounterRequest};
use crewmon::battle::state::{BattleEvent, TurnRng};
use crewmon::config::BattleConfig;
use crewmon::game_data::GameData;
use crewmon::player::{BallType, BattlePlayerRoster};
use crewmon::species::SpeciesSummary;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEMO_SEED: u64 = 20_241_019;
const MAX_DEMO_TURNS: u32 = 100;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crewmon=info")),
        )
        .with_target(false)
        .init();

    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), String> {
    let data = GameData::embedded().map_err(|e| format!("Error loading game data: {}", e))?;
    let config = BattleConfig::embedded().map_err(|e| format!("Error loading config: {}", e))?;

    let team = ["Intern", "Office Cat", "Night Owl"]
        .iter()
        .map(|name| data.species.create_combatant(name, 12))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Error building demo team: {}", e))?;
    let lead = data
        .species
        .lookup(&team[0].species_name)
        .map_err(|e| format!("Error reading lead species: {}", e))?;
    println!("{}", SpeciesSummary(lead));

    let mut roster = BattlePlayerRoster::new("Demo", team);
    roster.add_balls(BallType::Normal, 3);

    let mut controller = BattleController::new(roster, data, config, TurnRng::from_seed(DEMO_SEED));
    let autopilot = GreedyAutopilot::new();

    for request in [EncounterRequest::wild(), EncounterRequest::mini_boss()] {
        controller
            .start_battle(request)
            .map_err(|e| format!("Error starting battle: {}", e))?;
        let outcome = controller
            .run_with_autopilot(&autopilot, MAX_DEMO_TURNS)
            .map_err(|e| format!("Battle failed: {}", e))?;

        match outcome {
            Some(outcome) => {
                for line in outcome.event_log.iter().filter_map(BattleEvent::format) {
                    println!("{}", line);
                }
                println!();
                println!(
                    "Result: {:?} | exp each: {} | loot: {:?} | currency: +{}",
                    outcome.result, outcome.exp_gained, outcome.loot_items, outcome.currency_gained
                );
                println!();
            }
            None => {
                println!("Battle still running after {} turns; stopping demo.", MAX_DEMO_TURNS);
                return Ok(());
            }
        }
    }

    let roster = controller.roster();
    println!("{}'s team:", roster.player_name);
    for member in roster.team() {
        println!(
            "  {} Lv.{} HP {}/{} SP {}",
            member.species_name,
            member.level,
            member.hp(),
            member.max_hp(),
            member.sp()
        );
    }
    Ok(())
}
