use clap::{Parser, Subcommand, ValueEnum};
use guest_rsvp_client::calendar::{CalendarCell, EventMonth, WEEKDAY_SHORT_NAMES};
use guest_rsvp_client::dashboard::{AccommodationMajority, DashboardStats};
use guest_rsvp_client::form::{FormEdit, FormStatus, SubmissionForm};
use guest_rsvp_client::gesture::{EasterEgg, GestureSample, ShakeDetector};
use guest_rsvp_client::responses::response_cards;
use guest_rsvp_client::settings::ClientSettings;
use guest_rsvp_client::{ClientError, GuestApi, HttpGuestApi};
use guest_rsvp_config::{get_client_config, ClientConfig, ConfigError};
use guest_rsvp_model::{DayOfMonth, TimeSlot};
use guest_rsvp_telemetry::setup_telemetry;
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tracing::warn;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("event month {month}/{year} does not exist")]
    EventMonth { year: i32, month: u32 },
    #[error("day {day} is not in {month_name} {year}")]
    DayOutsideMonth {
        day: DayOfMonth,
        month_name: &'static str,
        year: i32,
    },
    #[error("submission failed")]
    Submission,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send an answer to the event questionnaire
    Submit {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        diet: String,
        #[arg(long)]
        accommodation: bool,
        /// Day of the event month, may be repeated
        #[arg(long = "day", value_parser = parse_day)]
        days: Vec<DayOfMonth>,
        /// `Après-midi` or `Soir`, may be repeated
        #[arg(long = "time", value_parser = parse_time_slot)]
        times: Vec<TimeSlot>,
    },
    /// Aggregated statistics over all answers
    Dashboard,
    /// Every answer, newest first
    Responses,
    /// The event month as a calendar grid
    Calendar,
    /// Show or change the experimental flag
    Experimental {
        #[arg(value_enum)]
        action: Option<FlagAction>,
    },
    /// Classify `motion x y z t` / `pointer x y t` / `touch x y t` lines from stdin
    Gesture,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FlagAction {
    On,
    Off,
    Toggle,
}

fn parse_day(value: &str) -> Result<DayOfMonth, String> {
    let day: u8 = value.parse().map_err(|err| format!("{err}"))?;
    DayOfMonth::try_from(day)
}

fn parse_time_slot(value: &str) -> Result<TimeSlot, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn event_month(config: &ClientConfig) -> Result<EventMonth, CliError> {
    EventMonth::new(config.event_year, config.event_month).ok_or(CliError::EventMonth {
        year: config.event_year,
        month: config.event_month,
    })
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    setup_telemetry();

    let args = Args::parse();
    let config = get_client_config()?;

    match args.command {
        Command::Submit {
            name,
            diet,
            accommodation,
            days,
            times,
        } => submit(&config, name, diet, accommodation, days, times).await,
        Command::Dashboard => dashboard(&config).await,
        Command::Responses => responses(&config).await,
        Command::Calendar => calendar(&config),
        Command::Experimental { action } => experimental(&config, action),
        Command::Gesture => gesture(&config).await,
    }
}

fn check_days(month: &EventMonth, days: &[DayOfMonth]) -> Result<(), CliError> {
    match days.iter().find(|day| !month.contains(**day)) {
        Some(&day) => Err(CliError::DayOutsideMonth {
            day,
            month_name: month.month_name(),
            year: month.year(),
        }),
        None => Ok(()),
    }
}

async fn submit(
    config: &ClientConfig,
    name: String,
    diet: String,
    accommodation: bool,
    days: Vec<DayOfMonth>,
    times: Vec<TimeSlot>,
) -> Result<(), CliError> {
    let api = HttpGuestApi::new(&config.api_base_url)?;
    check_days(&event_month(config)?, &days)?;
    let mut form = SubmissionForm::default();
    form.apply(FormEdit::Name(name));
    form.apply(FormEdit::AllergiesAndDiet(diet));
    form.apply(FormEdit::NeedsAccommodation(accommodation));
    for day in days {
        if !form.draft().available_days.contains(&day) {
            form.apply(FormEdit::ToggleDay(day));
        }
    }
    for slot in times {
        if !form.draft().available_time.contains(&slot) {
            form.apply(FormEdit::ToggleTime(slot));
        }
    }

    let status = form.submit(&api).await;
    println!("{}", status.message());
    if status == FormStatus::Success {
        Ok(())
    } else {
        Err(CliError::Submission)
    }
}

async fn dashboard(config: &ClientConfig) -> Result<(), CliError> {
    let api = HttpGuestApi::new(&config.api_base_url)?;
    let month = event_month(config)?;
    let stats = DashboardStats::compute(&api.list().await?);

    println!("Tableau de bord ({} réponse(s))", stats.total);
    println!();
    let majority = match stats.accommodation.majority() {
        AccommodationMajority::Needed => "Oui",
        AccommodationMajority::NotNeeded => "Non",
    };
    println!(
        "Hébergement : Oui {} / Non {} (majorité : {majority})",
        stats.accommodation.needed, stats.accommodation.not_needed
    );

    println!();
    println!("Disponibilités par jour :");
    for (day, count) in &stats.day_counts {
        println!("  {:<16} {count}", month.day_label(*day));
    }

    println!();
    println!("Disponibilités par horaire :");
    for (slot, count) in &stats.time_counts {
        println!("  {slot:<16} {count}");
    }

    println!();
    if stats.best_days.is_empty() {
        println!("Meilleur(s) jour(s) : aucun");
    } else {
        let labels: Vec<String> = stats.best_days.iter().map(|day| month.day_label(*day)).collect();
        println!(
            "Meilleur(s) jour(s) : {} ({} personne(s))",
            labels.join(", "),
            stats.best_day_count
        );
    }

    println!();
    println!("Allergies / régimes :");
    if stats.diet_notes.is_empty() {
        println!("  aucun");
    }
    for note in &stats.diet_notes {
        println!("  {}. {}", note.index + 1, note.text);
    }
    Ok(())
}

async fn responses(config: &ClientConfig) -> Result<(), CliError> {
    let api = HttpGuestApi::new(&config.api_base_url)?;
    let month = event_month(config)?;
    let guests = api.list().await?;

    println!("{} réponse(s) enregistrée(s)", guests.len());
    if guests.is_empty() {
        println!("Aucune réponse pour le moment");
    }
    for card in response_cards(&guests, &month, &chrono::Local) {
        println!();
        println!("Réponse #{}  {}", card.number, card.created_at);
        if let Some(name) = &card.name {
            println!("  Nom : {name}");
        }
        if let Some(diet) = &card.allergies_and_diet {
            println!("  Allergies / Régime : {diet}");
        }
        println!("  Hébergement : {}", card.accommodation);
        if !card.days.is_empty() {
            println!("  Jours disponibles : {}", card.days.join(", "));
        }
        if !card.times.is_empty() {
            let times: Vec<&str> = card.times.iter().map(|slot| slot.as_str()).collect();
            println!("  Horaires disponibles : {}", times.join(", "));
        }
    }
    Ok(())
}

fn calendar(config: &ClientConfig) -> Result<(), CliError> {
    let month = event_month(config)?;
    println!("{} {}", month.month_name(), month.year());
    println!("{}", WEEKDAY_SHORT_NAMES.map(|name| format!("{name:>4}")).concat());

    let mut line = String::new();
    for (position, cell) in month.cells().into_iter().enumerate() {
        match cell {
            CalendarCell::Blank => line.push_str("    "),
            CalendarCell::Day { day, weekend, .. } => {
                let marker = if weekend { "*" } else { " " };
                line.push_str(&format!("{:>3}{marker}", day.get()));
            }
        }
        if position % 7 == 6 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn experimental(config: &ClientConfig, action: Option<FlagAction>) -> Result<(), CliError> {
    let mut settings = ClientSettings::load(&config.state_file);
    match action {
        None => {}
        Some(FlagAction::On) => settings.set_experimental(true)?,
        Some(FlagAction::Off) => settings.set_experimental(false)?,
        Some(FlagAction::Toggle) => {
            settings.toggle_experimental()?;
        }
    }
    let state = if settings.experimental() { "on" } else { "off" };
    println!("experimental: {state}");
    Ok(())
}

async fn gesture(config: &ClientConfig) -> Result<(), CliError> {
    let settings = ClientSettings::load(&config.state_file);
    let mut detector = ShakeDetector::default();
    let mut egg = EasterEgg::default();
    let mut was_shaking = false;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let sample: GestureSample = match line.parse() {
            Ok(sample) => sample,
            Err(err) => {
                warn!("skipping `{line}`: {err}");
                continue;
            }
        };
        let at_ms = sample.at_ms();
        if was_shaking && !detector.is_shaking(at_ms) {
            println!("{at_ms} shake stopped");
            was_shaking = false;
        }

        let shaking = detector.observe(sample);
        if shaking && !was_shaking {
            println!("{at_ms} shake started");
        }
        was_shaking = shaking;

        let was_broken = egg.is_broken();
        if egg.update(shaking, settings.experimental()) && !was_broken {
            println!("{at_ms} page broken");
        }
    }
    Ok(())
}
