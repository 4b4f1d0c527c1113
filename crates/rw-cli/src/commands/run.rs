use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use rw_core::{ControlFlags, EntityRecord};
use rw_engine::{EngineEventKind, TickReport};

pub fn run(scenario_path: &Path, ticks: u64, verbose: bool, json: bool) -> Result<(), String> {
    let (scenario, dir) = super::load_scenario(scenario_path)?;
    let (mut engine, _) = super::build_engine(&scenario, &dir)?;

    let reports = engine.run(ticks);

    if json {
        let snapshot = serde_json::to_string_pretty(engine.entities())
            .map_err(|e| format!("cannot serialize records: {e}"))?;
        println!("{snapshot}");
        return Ok(());
    }

    let faults: usize = reports.iter().map(|r| r.faults.len()).sum();

    // Header
    println!(
        "  {} '{}' {}",
        "Run".bold(),
        scenario.name,
        format!("({ticks} ticks, {} actors)", engine.entities().len()).dimmed()
    );
    println!(
        "  {} events logged, {} entity ticks aborted",
        engine.events().len(),
        faults
    );
    println!();

    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in engine.events().events() {
            let tick_label = format!("[tick {:>3}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if engine.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        print_notable(&reports, engine.events().events());
    }

    println!("  {}", "Actor Status".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Actor", "Mode", "Flags", "Yaw", "Roll", "Altitude", "Velocity", "Turn", "Bank", "Path",
    ]);
    for record in engine.entities() {
        table.add_row(status_row(record));
    }

    println!("{table}");
    println!();

    Ok(())
}

fn print_notable(reports: &[TickReport], events: &[rw_engine::EngineEvent]) {
    let failed_loads: Vec<_> = events
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                EngineEventKind::AssetUnavailable { .. } | EngineEventKind::CopyFailed { .. }
            )
        })
        .collect();
    let faulted = reports.iter().any(|r| !r.is_clean());

    if !faulted && failed_loads.is_empty() {
        return;
    }

    println!("  {}", "Notable Events".bold().underline());
    for report in reports {
        for (_, error) in &report.faults {
            println!(
                "  {}  [tick {:>3}] {error}",
                "FAULT".red().bold(),
                report.tick
            );
        }
    }
    for event in &failed_loads {
        println!(
            "  {}   [tick {:>3}] {}",
            "WARN".yellow().bold(),
            event.tick,
            event.description
        );
    }
    println!();
}

fn status_row(record: &EntityRecord) -> Vec<String> {
    let altitude = if record.altitude.is_settled() {
        record.altitude.current.to_string().green().to_string()
    } else {
        format!("{} -> {}", record.altitude.current, record.altitude.target)
    };
    let mode = if record.test_flag(ControlFlags::DIVISION_SAFE) {
        record.mode().to_string()
    } else {
        record.mode().to_string().red().to_string()
    };

    vec![
        record.name.clone(),
        mode,
        format_flags(record.flags),
        record.orientation.yaw.raw().to_string(),
        record.orientation.roll.raw().to_string(),
        altitude,
        record.derived.velocity.to_string(),
        record.derived.turn_rate.to_string(),
        record.derived.bank.to_string(),
        format!("{} B", record.path_len),
    ]
}

fn format_flags(flags: ControlFlags) -> String {
    let names: Vec<&str> = flags
        .iter_names()
        .filter(|(_, f)| *f != ControlFlags::SUB_MODE)
        .map(|(name, _)| name)
        .collect();
    let sub_mode = flags.sub_mode();
    if names.is_empty() {
        format!("sub={sub_mode}")
    } else {
        format!("{} sub={sub_mode}", names.join(" "))
    }
}

fn colorize_event(kind: &EngineEventKind, description: &str) -> colored::ColoredString {
    match kind {
        EngineEventKind::DivisionFault { .. } => description.red().bold(),
        EngineEventKind::AssetUnavailable { .. } | EngineEventKind::CopyFailed { .. } => {
            description.yellow()
        }
        EngineEventKind::Forwarded { .. } => description.cyan(),
        EngineEventKind::Spawned { .. } | EngineEventKind::Despawned { .. } => {
            description.green()
        }
        EngineEventKind::Custom { .. } => description.normal(),
    }
}
