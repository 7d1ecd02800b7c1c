use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use roster_core::domain::{Employee, Machine, MachineStatus, Shift};
use roster_core::impls::{InMemoryAssignmentStore, InMemoryDirectory};
use roster_core::{
    EmployeeId, EngineConfig, MachineId, NewAssignment, RosterEngine, RosterEngineBuilder,
    ShiftId, WeekWindow,
};

#[derive(Debug, Parser)]
#[command(name = "roster-cli", about = "Weekly roster assignment engine (in-memory demo)")]
struct Cli {
    /// JSON file with slot_capacity / removal / copy_policy
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Seed a small roster, trip both conflict rules and copy the week forward
    Demo {
        #[arg(long, default_value = "2024-01-01")]
        date: NaiveDate,
    },
    /// Seed a small roster and print the week containing --date
    Week {
        #[arg(long)]
        date: NaiveDate,
    },
}

/// デモ用のマスタ
struct Seed {
    e1: EmployeeId,
    e2: EmployeeId,
    m1: MachineId,
    m2: MachineId,
    s1: ShiftId,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
}

fn employee(number: &str, name: &str) -> Employee {
    Employee {
        id: EmployeeId::random(),
        display_name: name.to_string(),
        employee_number: number.to_string(),
        department: "Press".to_string(),
        position: "Operator".to_string(),
        active: true,
    }
}

fn machine(code: &str, name: &str) -> Machine {
    Machine {
        id: MachineId::random(),
        code: code.to_string(),
        name: name.to_string(),
        machine_type: "press".to_string(),
        department: "Press".to_string(),
        status: MachineStatus::Active,
    }
}

fn build(config: EngineConfig) -> anyhow::Result<(RosterEngine, Arc<InMemoryAssignmentStore>, Seed)> {
    let (e1, e2) = (employee("E-001", "Aiko"), employee("E-002", "Kenji"));
    let (m1, m2) = (machine("M-01", "Press 1"), machine("M-02", "Press 2"));
    let s1 = Shift {
        id: ShiftId::random(),
        name: "Day".to_string(),
        start_time: NaiveTime::from_hms_opt(8, 0, 0).context("shift start")?,
        end_time: NaiveTime::from_hms_opt(16, 0, 0).context("shift end")?,
    };
    let seed = Seed {
        e1: e1.id,
        e2: e2.id,
        m1: m1.id,
        m2: m2.id,
        s1: s1.id,
    };

    let directory = InMemoryDirectory::new()
        .with_employee(e1)
        .with_employee(e2)
        .with_machine(m1)
        .with_machine(m2)
        .with_shift(s1);
    let store = Arc::new(InMemoryAssignmentStore::new(config));

    let engine = RosterEngineBuilder::new()
        .store(store.clone())
        .directory(Arc::new(directory))
        .config(config)
        .build()?;
    Ok((engine, store, seed))
}

fn print_json(label: &str, value: &impl Serialize) -> anyhow::Result<()> {
    println!("{label}:\n{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn demo(config: EngineConfig, date: NaiveDate) -> anyhow::Result<()> {
    let (engine, store, seed) = build(config)?;

    let first = engine
        .assign(NewAssignment::new(seed.e1, seed.m1, seed.s1, date).with_notes("opening"))
        .await?;
    println!("assigned {} to slot {} / {}", first.id, date, seed.s1);

    // 同じ週・同じシフトに E1 をもう一度
    let later = date
        .checked_add_days(Days::new(2))
        .context("--date is too close to the end of the calendar")?;
    match engine
        .assign(NewAssignment::new(seed.e1, seed.m2, seed.s1, later))
        .await
    {
        Ok(record) => println!("unexpectedly assigned {}", record.id),
        Err(err) => println!("rejected: {err}"),
    }

    // 同じスロットに E2（SlotCapacity 次第で通る）
    match engine
        .assign(NewAssignment::new(seed.e2, seed.m1, seed.s1, date))
        .await
    {
        Ok(record) => println!("assigned {} (slot shared)", record.id),
        Err(err) => println!("rejected: {err}"),
    }

    print_json("week", &engine.list_week(date).await?)?;

    let copied = engine.copy_week(date).await?;
    print_json("copy", &copied)?;
    print_json("counts", &store.counts_by_status().await)?;
    Ok(())
}

async fn week(config: EngineConfig, date: NaiveDate) -> anyhow::Result<()> {
    let (engine, _store, seed) = build(config)?;
    let week = WeekWindow::containing(date)
        .with_context(|| format!("no full week around {date} fits in the calendar"))?;
    let monday = week.start();

    engine
        .assign(NewAssignment::new(seed.e1, seed.m1, seed.s1, monday))
        .await?;
    engine
        .assign(NewAssignment::new(seed.e2, seed.m2, seed.s1, week.dates()[1]))
        .await?;

    print_json("week", &engine.list_week(date).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "engine config loaded");

    match cli.command {
        Command::Demo { date } => demo(config, date).await,
        Command::Week { date } => week(config, date).await,
    }
}
