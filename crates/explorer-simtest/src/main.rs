//! Lonely Explorer Headless Scenario Harness
//!
//! Plays scripted scenarios against the colony engine and checks the
//! economy rules end to end. Runs entirely in-process: no UI, no timers.
//!
//! Usage:
//!   cargo run -p explorer-simtest
//!   cargo run -p explorer-simtest -- --verbose
//!   cargo run -p explorer-simtest -- --config my_colony.json

use explorer_core::persistence::{self, SaveData, SaveError, SaveFormat, SAVE_VERSION};
use explorer_core::prelude::*;
use explorer_logic::config::{ProductionGate, PurchaseDeduction};
use explorer_logic::constants::{buildings, crafting, materials, research, resources};
use explorer_logic::model::{cost_table, ColonyState, Material};
use explorer_logic::starting::starting_colony;

// ── Bundled config (the defaults hosts ship with) ──────────────────────
const BUNDLED_CONFIG_JSON: &str = include_str!("../../../data/colony_config.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1));

    println!("=== Lonely Explorer Scenario Harness ===\n");

    let config = match config_path {
        Some(path) => match ColonyConfig::from_json_file(path) {
            Ok(config) => {
                println!("Using config {}\n", path);
                config
            }
            Err(e) => {
                println!("Cannot load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => ColonyConfig::default(),
    };

    let mut results = Vec::new();

    // 1. Config parsing and validation
    results.extend(validate_config(&config, verbose));

    // 2. Starting colony table
    results.extend(validate_starting_colony(verbose));

    // 3. Manual clicks and the coal roll
    results.extend(validate_manual_generation(&config));

    // 4. Periodic passes
    results.extend(validate_passes(&config));

    // 5. Purchases, crafting, research, explorers
    results.extend(validate_purchases(&config));

    // 6. Rule switches
    results.extend(validate_rule_switches(&config));

    // 7. Scheduler-driven session
    results.extend(validate_session(&config, verbose));

    // 8. Save / load
    results.extend(validate_persistence(&config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

/// Engine over the starting colony after `edit`, with a fixed seed.
fn engine_with(config: &ColonyConfig, edit: impl FnOnce(&mut ColonyState)) -> ColonyEngine {
    let mut state = starting_colony();
    edit(&mut state);
    ColonyEngine::from_state(state, config.clone()).with_seed(7)
}

fn set_amount(state: &mut ColonyState, id: &str, amount: f64) {
    if let Some(resource) = state.resources.get_mut(id) {
        resource.amount = amount;
    }
}

fn set_homes(state: &mut ColonyState, homes: u32) {
    if let Some(home) = state.buildings.get_mut(buildings::HOME) {
        home.owned = homes;
    }
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config(config: &ColonyConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Config ---");
    let mut results = Vec::new();

    let bundled = match ColonyConfig::from_json_str(BUNDLED_CONFIG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "config_bundled_parse".into(),
                passed: false,
                detail: format!("bundled config rejected: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "config_bundled_is_default".into(),
        passed: bundled == ColonyConfig::default(),
        detail: "bundled JSON matches built-in defaults".into(),
    });

    // Unknown keys are silently defaulted, so compare the raw JSON tree
    // with what the parsed config writes back.
    let raw: Result<serde_json::Value, _> = serde_json::from_str(BUNDLED_CONFIG_JSON);
    let written = bundled
        .to_json_string()
        .ok()
        .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).ok());
    let same_keys = matches!((&raw, &written), (Ok(a), Some(b)) if a == b);
    results.push(TestResult {
        name: "config_bundled_no_unknown_keys".into(),
        passed: same_keys,
        detail: "every bundled key is read back".into(),
    });

    let roundtrip = config
        .to_json_string()
        .ok()
        .and_then(|s| ColonyConfig::from_json_str(&s).ok());
    results.push(TestResult {
        name: "config_active_roundtrip".into(),
        passed: roundtrip.as_ref() == Some(config),
        detail: "active config survives JSON write + read".into(),
    });

    let classic = ColonyConfig::classic();
    results.push(TestResult {
        name: "config_classic_rules".into(),
        passed: classic.rules.purchase_deduction == PurchaseDeduction::ResourcesOnly
            && classic.rules.production_gate == ProductionGate::ProducedResourceKey
            && !classic.rules.clamp_manual_generation
            && !classic.rules.clamp_happiness_generation
            && !classic.rules.clamp_crafted_materials,
        detail: "classic config keeps every quirk".into(),
    });

    let rejected = [
        r#"{ "coal_chance": 1.5 }"#,
        r#"{ "periods": { "wood_consumption": 0.0 } }"#,
        r#"{ "wood_per_heated_home": 0.0 }"#,
        r#"{ "rules": { "explorer_cost_growth": { "kind": "additive", "step": -1.0 } } }"#,
    ];
    let all_rejected = rejected
        .iter()
        .all(|json| ColonyConfig::from_json_str(json).is_err());
    results.push(TestResult {
        name: "config_rejects_invalid".into(),
        passed: all_rejected,
        detail: format!("{} invalid configs rejected", rejected.len()),
    });

    if verbose {
        println!("  Active rules: {:?}", config.rules);
    }

    results
}

// ── 2. Starting Colony ──────────────────────────────────────────────────

fn validate_starting_colony(verbose: bool) -> Vec<TestResult> {
    println!("--- Starting Colony ---");
    let mut results = Vec::new();
    let state = starting_colony();

    results.push(TestResult {
        name: "start_table_sizes".into(),
        passed: state.resources.len() == 6
            && state.buildings.len() == 3
            && state.crafting.len() == 1
            && state.materials.len() == 5
            && state.research.len() == 3,
        detail: format!(
            "{} resources, {} buildings, {} stations, {} materials, {} research",
            state.resources.len(),
            state.buildings.len(),
            state.crafting.len(),
            state.materials.len(),
            state.research.len()
        ),
    });

    let problems = state.invariant_violations();
    results.push(TestResult {
        name: "start_consistent".into(),
        passed: problems.is_empty(),
        detail: if problems.is_empty() {
            "no invariant violations".into()
        } else {
            problems.join("; ")
        },
    });

    let wood = &state.resources[resources::WOOD];
    results.push(TestResult {
        name: "start_wood".into(),
        passed: wood.amount == 90.0 && wood.max_amount == Some(500.0),
        detail: format!("wood {} / {:?}", wood.amount, wood.max_amount),
    });

    let engine = ColonyEngine::from_state(state.clone(), ColonyConfig::default());
    results.push(TestResult {
        name: "start_nothing_to_buy".into(),
        passed: !engine.can_afford_building(buildings::HOME)
            && !engine.can_afford_building(buildings::WOODCUTTER)
            && !engine.can_afford_crafting(crafting::CONSTRUCTOR),
        detail: "home short on wood, woodcutter and constructor locked".into(),
    });

    results.push(TestResult {
        name: "start_ingot_uncraftable".into(),
        passed: !engine.can_craft_material(materials::INGOT)
            && engine.can_craft_material(materials::BRICK),
        detail: "ingots need steel, bricks need clay".into(),
    });

    if verbose {
        println!("  Starting resources:");
        for (id, r) in &state.resources {
            println!("    {:10} {:>6} / {:?}", id, r.amount, r.max_amount);
        }
    }

    results
}

// ── 3. Manual Generation ────────────────────────────────────────────────

fn validate_manual_generation(config: &ColonyConfig) -> Vec<TestResult> {
    println!("--- Manual Generation ---");
    let mut results = Vec::new();

    let mut engine = engine_with(config, |_| {});
    engine.manual_generate(resources::WOOD);
    let wood = engine.state().resource_amount(resources::WOOD);
    let expected = if config.rules.clamp_manual_generation {
        (90.0 + config.manual_yield).min(500.0)
    } else {
        90.0 + config.manual_yield
    };
    results.push(TestResult {
        name: "manual_wood_click".into(),
        passed: wood == expected,
        detail: format!("wood 90 → {} after one click", wood),
    });

    let mut engine = engine_with(config, |s| set_amount(s, resources::IRON, 149.0));
    engine.manual_generate(resources::IRON);
    let iron = engine.state().resource_amount(resources::IRON);
    results.push(TestResult {
        name: "manual_click_cap_rule".into(),
        passed: (iron > 150.0) != config.rules.clamp_manual_generation
            || config.manual_yield <= 1.0,
        detail: format!(
            "iron 149 → {} (clamp_manual_generation={})",
            iron, config.rules.clamp_manual_generation
        ),
    });

    let mut engine = engine_with(config, |_| {});
    let rejected = !engine.manual_generate(resources::HAPPINESS)
        && !engine.manual_generate(resources::COAL)
        && !engine.manual_generate("gold");
    results.push(TestResult {
        name: "manual_only_four_actions".into(),
        passed: rejected && engine.state() == &starting_colony(),
        detail: "happiness, coal and unknown ids have no click action".into(),
    });

    let clicks = 4000;
    let mut engine = engine_with(config, |_| {});
    for _ in 0..clicks {
        engine.manual_generate(resources::STONE);
    }
    let coal = engine.state().resource_amount(resources::COAL);
    let finds = if config.manual_yield > 0.0 {
        (coal - 10.0) / config.manual_yield
    } else {
        0.0
    };
    let rate = finds / f64::from(clicks);
    results.push(TestResult {
        name: "manual_coal_rate".into(),
        passed: config.manual_yield <= 0.0 || (rate - config.coal_chance).abs() < 0.02,
        detail: format!(
            "{} coal finds in {} stone clicks ({:.3} vs {:.3})",
            finds, clicks, rate, config.coal_chance
        ),
    });

    results
}

// ── 4. Passes ───────────────────────────────────────────────────────────

fn validate_passes(config: &ColonyConfig) -> Vec<TestResult> {
    println!("--- Periodic Passes ---");
    let mut results = Vec::new();

    // 5 homes, 47 wood, 2 explorers
    let mut engine = engine_with(config, |s| {
        set_homes(s, 5);
        set_amount(s, resources::WOOD, 47.0);
        s.explorers = 2;
    });
    engine.tick(Pass::HappinessGeneration, 1.0);
    let gained = engine.state().happiness();
    let expected = (47.0 / config.wood_per_heated_home).floor().min(5.0);
    results.push(TestResult {
        name: "pass_heated_homes".into(),
        passed: gained == expected,
        detail: format!("happiness +{} from 5 homes on 47 wood", gained),
    });

    let mut engine = engine_with(config, |s| {
        set_homes(s, 3);
        set_amount(s, resources::WOOD, 2.0);
    });
    let changed = engine.tick(Pass::WoodConsumption, 10.0);
    results.push(TestResult {
        name: "pass_wood_all_or_nothing".into(),
        passed: !changed && engine.state().resource_amount(resources::WOOD) == 2.0,
        detail: "3 homes on 2 wood burn nothing".into(),
    });

    let mut engine = engine_with(config, |s| {
        set_homes(s, 4);
        set_amount(s, resources::HAPPINESS, 999.0);
    });
    engine.tick(Pass::ResourceGeneration, 1.0);
    let happiness = engine.state().happiness();
    results.push(TestResult {
        name: "pass_generation_clamped".into(),
        passed: happiness == 1000.0,
        detail: format!("happiness 999 + 4 × 0.5 → {}", happiness),
    });

    let mut engine = engine_with(config, |s| {
        set_homes(s, 3);
        set_amount(s, resources::WOOD, 90.0);
        set_amount(s, resources::HAPPINESS, 999.0);
    });
    engine.tick(Pass::HappinessGeneration, 1.0);
    let happiness = engine.state().happiness();
    results.push(TestResult {
        name: "pass_happiness_cap_rule".into(),
        passed: (happiness > 1000.0) != config.rules.clamp_happiness_generation,
        detail: format!(
            "happiness 999 → {} (clamp_happiness_generation={})",
            happiness, config.rules.clamp_happiness_generation
        ),
    });

    results
}

// ── 5. Purchases ────────────────────────────────────────────────────────

fn validate_purchases(config: &ColonyConfig) -> Vec<TestResult> {
    println!("--- Purchases & Progression ---");
    let mut results = Vec::new();

    let mut engine = engine_with(config, |_| {});
    let bought = engine.purchase_building(buildings::HOME);
    results.push(TestResult {
        name: "purchase_refused_when_unaffordable".into(),
        passed: !bought && engine.state() == &starting_colony(),
        detail: "home at 90 wood is refused with no change".into(),
    });

    // Invite scenario: 2 homes, 1 explorer, 150 happiness
    let mut engine = engine_with(config, |s| {
        set_homes(s, 2);
        set_amount(s, resources::HAPPINESS, 150.0);
    });
    let cost = engine.explorer_invite_cost();
    let first = engine.invite_explorer();
    let after_first = engine.state().clone();
    let second = engine.invite_explorer();
    results.push(TestResult {
        name: "invite_explorer_scenario".into(),
        passed: first
            && !second
            && after_first.explorers == 2
            && (after_first.happiness() - (150.0 - cost)).abs() < 1e-9
            && engine.state() == &after_first,
        detail: format!(
            "explorers {}, happiness {}, multiplier {:.2}",
            after_first.explorers,
            after_first.happiness(),
            after_first.explorer_multiplier
        ),
    });

    let mut engine = engine_with(config, |s| {
        if let Some(station) = s.crafting.get_mut(crafting::CONSTRUCTOR) {
            station.owned = 1;
        }
        s.materials.insert(
            "plank".into(),
            Material::new(
                "Plank",
                0.0,
                cost_table(&[(resources::WOOD, 50.0), (resources::STONE, 500.0)]),
            ),
        );
    });
    let before = engine.state().clone();
    let crafted = engine.craft_material("plank");
    results.push(TestResult {
        name: "craft_all_or_nothing".into(),
        passed: !crafted && engine.state() == &before,
        detail: "short on stone leaves wood untouched".into(),
    });

    let mut engine = engine_with(config, |s| set_amount(s, resources::HAPPINESS, 250.0));
    let once = engine.research(research::WOOD_CUTTER);
    let after_once = engine.state().clone();
    let twice = engine.research(research::WOOD_CUTTER);
    results.push(TestResult {
        name: "research_idempotent".into(),
        passed: once && !twice && engine.state() == &after_once,
        detail: format!("happiness left {}", after_once.happiness()),
    });

    results
}

// ── 6. Rule Switches ────────────────────────────────────────────────────

fn validate_rule_switches(config: &ColonyConfig) -> Vec<TestResult> {
    println!("--- Rule Switches ---");
    let mut results = Vec::new();

    for gate in [ProductionGate::BuildingResearch, ProductionGate::ProducedResourceKey] {
        let mut rules = config.rules;
        rules.production_gate = gate;
        let switched = ColonyConfig {
            rules,
            ..config.clone()
        };
        let mut engine = engine_with(&switched, |s| {
            if let Some(miner) = s.buildings.get_mut(buildings::MINER) {
                miner.owned = 1;
            }
        });
        let produced = engine.tick(Pass::ResourceGeneration, 1.0);
        let expect_output = gate == ProductionGate::ProducedResourceKey;
        results.push(TestResult {
            name: format!("gate_{:?}", gate).to_lowercase(),
            passed: produced == expect_output,
            detail: format!("locked miner produced: {}", produced),
        });
    }

    for deduction in [PurchaseDeduction::MatchAffordability, PurchaseDeduction::ResourcesOnly] {
        let mut rules = config.rules;
        rules.purchase_deduction = deduction;
        let switched = ColonyConfig {
            rules,
            ..config.clone()
        };
        let mut engine = engine_with(&switched, |s| {
            if let Some(entry) = s.research.get_mut(research::WOOD_CUTTER) {
                entry.unlocked = true;
            }
        });
        let bought = engine.purchase_building(buildings::WOODCUTTER);
        let beams = engine.state().material_amount(materials::BEAM);
        let expected_beams = match deduction {
            PurchaseDeduction::MatchAffordability => 0.0,
            PurchaseDeduction::ResourcesOnly => 1.0,
        };
        results.push(TestResult {
            name: format!("deduction_{:?}", deduction).to_lowercase(),
            passed: bought && beams == expected_beams,
            detail: format!("beams left after woodcutter: {}", beams),
        });
    }

    results
}

// ── 7. Session ──────────────────────────────────────────────────────────

fn validate_session(config: &ColonyConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Scheduled Session ---");
    let mut results = Vec::new();

    let mut engine = engine_with(config, |s| {
        set_amount(s, resources::WOOD, 100.0);
        set_amount(s, resources::CLAY, 100.0);
    });
    let mut scheduler = PassScheduler::new(config.periods, 0.0);
    engine.set_player_name("Harness");
    let home = engine.purchase_building(buildings::HOME);
    for _ in 0..5 {
        engine.manual_generate(resources::WOOD);
    }

    // Play one second at a time until the woodcutter research is affordable.
    let mut consistent = true;
    let mut t = 0u32;
    while !engine.research(research::WOOD_CUTTER) && t < 100_000 {
        t += 1;
        scheduler.drive_engine(&mut engine, f64::from(t));
        consistent &= engine.state().invariant_violations().is_empty();
    }
    let researched = engine.state().is_unlocked(research::WOOD_CUTTER);
    results.push(TestResult {
        name: "session_reaches_research".into(),
        passed: home && researched && consistent,
        detail: format!("woodCutter researched after {} s", t),
    });

    let woodcutter = engine.purchase_building(buildings::WOODCUTTER);
    let wood_before = engine.state().resource_amount(resources::WOOD);
    let start = t;
    while t < start + 60 {
        t += 1;
        scheduler.drive_engine(&mut engine, f64::from(t));
        consistent &= engine.state().invariant_violations().is_empty();
    }
    let wood_after = engine.state().resource_amount(resources::WOOD);
    results.push(TestResult {
        name: "session_woodcutter_feeds_homes".into(),
        passed: woodcutter && wood_after > wood_before && consistent,
        detail: format!("wood {} → {} over 60 s", wood_before, wood_after),
    });

    if verbose {
        let snapshot = engine.snapshot();
        println!("  Session end at t={} s: {:?}", t, snapshot.status);
        for line in &snapshot.resources {
            println!("    {:10} {:>8.1}", line.id, line.amount);
        }
    }

    results
}

// ── 8. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(config: &ColonyConfig) -> Vec<TestResult> {
    println!("--- Save / Load ---");
    let mut results = Vec::new();

    let mut engine = engine_with(config, |s| {
        set_homes(s, 2);
        set_amount(s, resources::HAPPINESS, 321.5);
    });
    engine.set_player_name("Harness");

    let saved_at = persistence::unix_timestamp();
    for format in [SaveFormat::Binary, SaveFormat::Json] {
        let mut buffer = Vec::new();
        let saved = engine.save(&mut buffer, format, saved_at);
        let mut loaded = ColonyEngine::from_state(starting_colony(), config.clone());
        let load = saved.and_then(|_| loaded.load(&buffer[..], format));
        let stamp = persistence::load_colony(&buffer[..], format).map(|data| data.saved_at);
        results.push(TestResult {
            name: format!("save_roundtrip_{:?}", format).to_lowercase(),
            passed: load.is_ok()
                && loaded.state() == engine.state()
                && matches!(stamp, Ok(at) if at == saved_at && at > 0),
            detail: format!("{} bytes, saved at {}", buffer.len(), saved_at),
        });
    }

    let future = SaveData {
        version: SAVE_VERSION + 1,
        player_name: "Harness".into(),
        saved_at: 0,
        state: engine.state().clone(),
    };
    let rejected = serde_json::to_vec(&future)
        .map(|bytes| persistence::load_colony(&bytes[..], SaveFormat::Json))
        .map(|r| matches!(r, Err(SaveError::VersionMismatch { .. })))
        .unwrap_or(false);
    results.push(TestResult {
        name: "save_version_checked".into(),
        passed: rejected,
        detail: format!("version {} rejected", SAVE_VERSION + 1),
    });

    results
}
