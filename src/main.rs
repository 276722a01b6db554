use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use rentbook::config::{config_dir, load_config, Config, SettingsUpdate, CONFIG_TEMPLATE};
use rentbook::error::{RentError, Result};
use rentbook::ledger::{
    Ledger, MonthKey, MonthRecord, Room, RoomId, Submission, DEFAULT_ROOM_COUNT,
};
use rentbook::report::{overview, write_csv, MonthTotals, OverviewRow};
use rentbook::store::{open_store, RoomStore};

#[derive(Parser)]
#[command(name = "rentbook")]
#[command(version, about = "Monthly rent and electricity ledger", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory and seed the rooms
    Init {
        /// Number of rooms to create
        #[arg(long, default_value_t = DEFAULT_ROOM_COUNT)]
        rooms: u32,
    },

    /// Show every room for a month
    Rooms {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<MonthKey>,
    },

    /// Show one room's rent and electricity for a month
    Show {
        /// Room id (see 'rooms')
        room: RoomId,

        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<MonthKey>,
    },

    /// Record rent paid and meter readings for a month
    Record {
        /// Room id (see 'rooms')
        room: RoomId,

        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<MonthKey>,

        /// Tenant name (default: current tenant)
        #[arg(long)]
        tenant: Option<String>,

        /// Rent paid this month
        #[arg(long, allow_negative_numbers = true)]
        rent_paid: Option<f64>,

        /// Rent payment date (YYYY-MM-DD)
        #[arg(long)]
        rent_date: Option<String>,

        /// Rent notes
        #[arg(long)]
        rent_notes: Option<String>,

        /// Meter reading at the start of the month (default: last month's reading)
        #[arg(long, allow_negative_numbers = true)]
        previous: Option<f64>,

        /// Meter reading now
        #[arg(long, allow_negative_numbers = true)]
        current: Option<f64>,

        /// Electricity paid this month
        #[arg(long, allow_negative_numbers = true)]
        electricity_paid: Option<f64>,

        /// Electricity payment date (YYYY-MM-DD)
        #[arg(long)]
        electricity_date: Option<String>,

        /// Electricity notes
        #[arg(long)]
        electricity_notes: Option<String>,
    },

    /// Change a room's tenant
    Tenant {
        /// Room id (see 'rooms')
        room: RoomId,

        /// New tenant name
        name: String,
    },

    /// Show or update base rent and electricity unit rate
    Settings {
        /// Monthly base rent
        #[arg(long, allow_negative_numbers = true)]
        base_rent: Option<f64>,

        /// Price per electricity unit
        #[arg(long, allow_negative_numbers = true)]
        unit_rate: Option<f64>,
    },

    /// Show collected and outstanding totals for a month
    Status {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<MonthKey>,
    },

    /// Export a month as CSV
    Export {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<MonthKey>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete one month's records from every room
    ResetMonth {
        /// Month as YYYY-MM
        month: MonthKey,
    },

    /// Delete all monthly records and restore default settings
    ResetAll,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    if let Commands::Init { rooms } = cli.command {
        return cmd_init(&cfg_dir, rooms);
    }

    let config = load_config(&cfg_dir)?;
    let mut ledger = Ledger::new(open_store(&config.store, &cfg_dir)?);
    let month = |m: Option<MonthKey>| m.unwrap_or_else(MonthKey::current);

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Rooms { month: m } => cmd_rooms(&mut ledger, &config, month(m)),
        Commands::Show { room, month: m } => cmd_show(&mut ledger, &config, room, month(m)),
        Commands::Record {
            room,
            month: m,
            tenant,
            rent_paid,
            rent_date,
            rent_notes,
            previous,
            current,
            electricity_paid,
            electricity_date,
            electricity_notes,
        } => {
            let input = RecordInput {
                tenant,
                rent_paid,
                rent_date: parse_date(rent_date)?,
                rent_notes,
                previous,
                current,
                electricity_paid,
                electricity_date: parse_date(electricity_date)?,
                electricity_notes,
            };
            cmd_record(&mut ledger, &config, room, month(m), input)
        }
        Commands::Tenant { room, name } => {
            let room = ledger.rename_tenant(room, &name)?;
            println!("{} tenant is now {}", room.room_number, room.tenant_name);
            Ok(())
        }
        Commands::Settings {
            base_rent,
            unit_rate,
        } => cmd_settings(&mut ledger, &config, SettingsUpdate { base_rent, unit_rate }),
        Commands::Status { month: m } => cmd_status(&mut ledger, &config, &cfg_dir, month(m)),
        Commands::Export { month: m, output } => cmd_export(&ledger, month(m), output),
        Commands::ResetMonth { month } => {
            let cleared = ledger.reset_month(month)?;
            println!("Reset {} for {} room(s)", month.label(), cleared);
            Ok(())
        }
        Commands::ResetAll => {
            let settings = ledger.reset_all()?;
            println!("All monthly data cleared");
            println!(
                "Settings restored: base rent {}, unit rate {}",
                format_money(settings.base_rent, &config.building.currency_symbol),
                format_money(settings.unit_rate, &config.building.currency_symbol)
            );
            Ok(())
        }
    }
}

fn parse_date(input: Option<String>) -> Result<Option<NaiveDate>> {
    input
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| RentError::InvalidDate(s)))
        .transpose()
}

/// Initialize config directory and seed the store
fn cmd_init(cfg_dir: &PathBuf, rooms: u32) -> Result<()> {
    if cfg_dir.exists() {
        return Err(RentError::AlreadyInitialized(cfg_dir.clone()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    let config = load_config(cfg_dir)?;
    let mut ledger = Ledger::new(open_store(&config.store, cfg_dir)?);
    let seeded = ledger.seed(rooms)?;

    println!("Initialized rentbook at: {}", cfg_dir.display());
    println!("  Rooms:  {}", seeded.len());
    println!();
    println!("Next steps:");
    println!(
        "  1. Name your building:   $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Set your rates:       rentbook settings --base-rent 3000 --unit-rate 10");
    println!("  3. Record a month:       rentbook record 1 --rent-paid 3000 --current 120");

    Ok(())
}

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "#")]
    id: RoomId,
    #[tabled(rename = "ROOM")]
    room: String,
    #[tabled(rename = "TENANT")]
    tenant: String,
    #[tabled(rename = "RENT")]
    rent_due: String,
    #[tabled(rename = "PAID")]
    rent_paid: String,
    #[tabled(rename = "STATUS")]
    rent_status: String,
    #[tabled(rename = "UNITS")]
    units: String,
    #[tabled(rename = "ELECTRICITY")]
    electricity_due: String,
    #[tabled(rename = "BILL")]
    electricity_status: String,
}

impl RoomRow {
    fn new(row: &OverviewRow, symbol: &str) -> Self {
        Self {
            id: row.id,
            room: row.room_number.clone(),
            tenant: row.tenant_name.clone(),
            rent_due: format_money(row.rent_due, symbol),
            rent_paid: format_money(row.rent_paid, symbol),
            rent_status: row.rent_status.to_string(),
            units: row.units_consumed.to_string(),
            electricity_due: format_money(row.electricity_due, symbol),
            electricity_status: row.electricity_status.to_string(),
        }
    }
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "")]
    label: String,
    #[tabled(rename = "RENT")]
    rent: String,
    #[tabled(rename = "ELECTRICITY")]
    electricity: String,
}

fn format_money(value: f64, currency_symbol: &str) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as i64;
    let whole = format_grouped_int(cents / 100);
    let sign = if negative && cents != 0 { "-" } else { "" };

    if cents % 100 == 0 {
        format!("{sign}{currency_symbol}{whole}")
    } else {
        format!("{sign}{currency_symbol}{whole}.{:02}", cents % 100)
    }
}

fn format_grouped_int(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

fn month_rows<S: RoomStore>(ledger: &mut Ledger<S>, month: MonthKey) -> Result<Vec<OverviewRow>> {
    let view = ledger.month_view(month)?;
    Ok(overview(view.iter().map(|(room, record)| (room, record))))
}

/// List every room for a month
fn cmd_rooms<S: RoomStore>(ledger: &mut Ledger<S>, config: &Config, month: MonthKey) -> Result<()> {
    let rows = month_rows(ledger, month)?;
    if rows.is_empty() {
        println!("No rooms configured. Run 'rentbook init' first.");
        return Ok(());
    }

    let symbol = &config.building.currency_symbol;
    let table_rows: Vec<RoomRow> = rows.iter().map(|r| RoomRow::new(r, symbol)).collect();

    println!("{} - {}", config.building.name, month.label());
    println!("{}", Table::new(table_rows).with(Style::rounded()));

    let totals = MonthTotals::from_rows(&rows);
    println!();
    println!(
        "Rent paid: {}/{} rooms   Outstanding: {}",
        totals.rent_paid_rooms,
        totals.rooms,
        format_money(totals.total_outstanding(), symbol)
    );
    println!("Use the # column with show/record (e.g., 'rentbook show 1')");

    Ok(())
}

fn print_month(room: &Room, month: MonthKey, record: &MonthRecord, symbol: &str) {
    println!("{} - {} - {}", room.room_number, room.tenant_name, month.label());

    if record.is_empty() {
        println!("  Nothing recorded. Use 'rentbook record {}' to enter this month.", room.id);
        return;
    }

    let money = |v: f64| format_money(v, symbol);
    let mut lines = Vec::new();

    let rent = record.rent.as_ref();
    let electricity = record.electricity.as_ref();
    let pick = |r: Option<f64>, e: Option<f64>| LineRow {
        label: String::new(),
        rent: r.map(money).unwrap_or_else(|| "-".to_string()),
        electricity: e.map(money).unwrap_or_else(|| "-".to_string()),
    };

    let rows: [(&str, Option<f64>, Option<f64>); 4] = [
        (
            "Carried forward",
            rent.map(|r| r.carry_forward),
            electricity.map(|e| e.carry_forward),
        ),
        ("Due", rent.map(|r| r.amount_due), electricity.map(|e| e.amount_due)),
        ("Paid", rent.map(|r| r.amount_paid), electricity.map(|e| e.amount_paid)),
        ("Balance", rent.map(|r| r.balance), electricity.map(|e| e.balance)),
    ];
    for (label, r, e) in rows {
        lines.push(LineRow {
            label: label.to_string(),
            ..pick(r, e)
        });
    }
    lines.push(LineRow {
        label: "Status".to_string(),
        rent: rent.map_or("-".to_string(), |r| r.status.to_string()),
        electricity: electricity.map_or("-".to_string(), |e| e.status.to_string()),
    });

    println!("{}", Table::new(lines).with(Style::rounded()));

    if let Some(e) = electricity {
        println!(
            "  Meter:  {} -> {} ({} units)",
            e.previous_reading, e.current_reading, e.units_consumed
        );
    }
    for from in [
        rent.and_then(|r| r.carry_forward_from.as_deref()).map(|f| ("Rent", f)),
        electricity
            .and_then(|e| e.carry_forward_from.as_deref())
            .map(|f| ("Electricity", f)),
    ]
    .into_iter()
    .flatten()
    {
        println!("  {} includes unpaid balance from {}", from.0, from.1);
    }
    for note in [
        rent.and_then(|r| r.notes.as_deref()),
        electricity.and_then(|e| e.notes.as_deref()),
    ]
    .into_iter()
    .flatten()
    {
        println!("  Note:   {note}");
    }
}

/// Show one room's month, materializing carry-forward if needed
fn cmd_show<S: RoomStore>(
    ledger: &mut Ledger<S>,
    config: &Config,
    id: RoomId,
    month: MonthKey,
) -> Result<()> {
    let (room, record) = ledger.month(id, month)?;
    print_month(&room, month, &record, &config.building.currency_symbol);
    Ok(())
}

struct RecordInput {
    tenant: Option<String>,
    rent_paid: Option<f64>,
    rent_date: Option<NaiveDate>,
    rent_notes: Option<String>,
    previous: Option<f64>,
    current: Option<f64>,
    electricity_paid: Option<f64>,
    electricity_date: Option<NaiveDate>,
    electricity_notes: Option<String>,
}

/// Record a submission. Omitted flags keep what the month already shows.
///
/// The prefill is read with `peek`, so a submission that fails validation
/// leaves the store untouched.
fn cmd_record<S: RoomStore>(
    ledger: &mut Ledger<S>,
    config: &Config,
    id: RoomId,
    month: MonthKey,
    input: RecordInput,
) -> Result<()> {
    let (room, record) = ledger.peek(id, month)?;
    let rent = record.rent.as_ref();
    let electricity = record.electricity.as_ref();

    let previous = input
        .previous
        .unwrap_or_else(|| electricity.map_or(0.0, |e| e.previous_reading));
    let current = input.current.unwrap_or_else(|| {
        electricity
            .map(|e| e.current_reading)
            .filter(|r| *r > 0.0)
            .unwrap_or(previous)
    });

    let submission = Submission {
        tenant_name: input.tenant.unwrap_or_else(|| room.tenant_name.clone()),
        rent_paid: input
            .rent_paid
            .unwrap_or_else(|| rent.map_or(0.0, |r| r.amount_paid)),
        rent_date: input.rent_date.or_else(|| rent.and_then(|r| r.date)),
        rent_notes: input.rent_notes.or_else(|| rent.and_then(|r| r.notes.clone())),
        previous_reading: previous,
        current_reading: current,
        electricity_paid: input
            .electricity_paid
            .unwrap_or_else(|| electricity.map_or(0.0, |e| e.amount_paid)),
        electricity_date: input
            .electricity_date
            .or_else(|| electricity.and_then(|e| e.date)),
        electricity_notes: input
            .electricity_notes
            .or_else(|| electricity.and_then(|e| e.notes.clone())),
    };

    let room = ledger.submit(id, month, &submission)?;
    let record = room.month(month).cloned().unwrap_or_default();

    println!("Recorded {} for {}", room.room_number, month.label());
    print_month(&room, month, &record, &config.building.currency_symbol);
    Ok(())
}

/// Show or update settings
fn cmd_settings<S: RoomStore>(
    ledger: &mut Ledger<S>,
    config: &Config,
    update: SettingsUpdate,
) -> Result<()> {
    let symbol = &config.building.currency_symbol;
    let settings = if update.is_empty() {
        ledger.settings()?
    } else {
        let settings = ledger.update_settings(update)?;
        println!("Settings updated (existing months keep their amounts)");
        settings
    };

    println!("Base rent:  {}", format_money(settings.base_rent, symbol));
    println!("Unit rate:  {}", format_money(settings.unit_rate, symbol));
    Ok(())
}

/// Show month totals
fn cmd_status<S: RoomStore>(
    ledger: &mut Ledger<S>,
    config: &Config,
    cfg_dir: &Path,
    month: MonthKey,
) -> Result<()> {
    let settings = ledger.settings()?;
    let rows = month_rows(ledger, month)?;
    let totals = MonthTotals::from_rows(&rows);
    let symbol = &config.building.currency_symbol;
    let money = |v: f64| format_money(v, symbol);

    println!("Rentbook Status - {}", month.label());
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Building:         {}", config.building.name);
    println!("Store:            {}", ledger.store().backend());
    println!("Rooms:            {}", totals.rooms);
    println!("Base rent:        {}", money(settings.base_rent));
    println!("Unit rate:        {}", money(settings.unit_rate));

    let lines = vec![
        LineRow {
            label: "Due".to_string(),
            rent: money(totals.rent_due),
            electricity: money(totals.electricity_due),
        },
        LineRow {
            label: "(-) Paid".to_string(),
            rent: money(totals.rent_paid),
            electricity: money(totals.electricity_paid),
        },
        LineRow {
            label: "(=) Outstanding".to_string(),
            rent: money(totals.rent_outstanding),
            electricity: money(totals.electricity_outstanding),
        },
    ];
    println!();
    println!("{}", Table::new(lines).with(Style::rounded()));
    println!(
        "Rent paid in full: {}/{} rooms",
        totals.rent_paid_rooms, totals.rooms
    );
    println!(
        "Electricity bills settled: {}/{} rooms",
        totals.electricity_paid_rooms, totals.rooms
    );

    Ok(())
}

/// Export stored records for a month without materializing anything
fn cmd_export<S: RoomStore>(
    ledger: &Ledger<S>,
    month: MonthKey,
    output: Option<PathBuf>,
) -> Result<()> {
    let rooms = ledger.rooms()?;
    let bare = MonthRecord::default();
    let rows = overview(
        rooms
            .iter()
            .map(|room| (room, room.month(month).unwrap_or(&bare))),
    );

    match output {
        Some(path) => {
            write_csv(fs::File::create(&path)?, &rows)?;
            eprintln!("Exported {} room(s) to {}", rows.len(), path.display());
        }
        None => write_csv(io::stdout().lock(), &rows)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_groups_and_trims_cents() {
        assert_eq!(format_money(3500.0, "₹"), "₹3,500");
        assert_eq!(format_money(1234567.5, "₹"), "₹1,234,567.50");
        assert_eq!(format_money(-100.0, "₹"), "-₹100");
        assert_eq!(format_money(0.0, "$"), "$0");
    }
}
