//! cowin-watch - CoWIN slot watcher
//!
//! Polls the public CoWIN API for a district or pincode, filters sessions
//! by age and capacity, and raises a desktop notification (optionally an
//! OTP request) when a bookable slot shows up.

mod config;
mod error;
mod models;
mod services;
mod utils;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{report, CowinClient, DesktopNotifier, Monitor, SearchArea, SlotFilter, WatchOptions};

/// cowin-watch - CoWIN vaccination slot watcher
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Config file path (default: ~/.config/cowin-watch/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll for open slots until one appears
    Watch(WatchArgs),
    /// List states and their ids
    States,
    /// List the districts of a state
    Districts {
        /// State id (see `states`)
        state_id: u32,
    },
    /// One-off search for sessions
    Sessions(SessionsArgs),
    /// OTP operations
    Otp {
        #[command(subcommand)]
        sub: OtpCommand,
    },
}

/// Where to search. District wins when both are given.
#[derive(ClapArgs, Debug, Default)]
struct AreaArgs {
    /// District id (see `districts`)
    #[arg(long)]
    district: Option<u32>,

    /// Six digit pincode
    #[arg(long)]
    pincode: Option<u32>,
}

#[derive(ClapArgs, Debug)]
struct WatchArgs {
    #[command(flatten)]
    area: AreaArgs,

    /// Age of the person booking
    #[arg(long)]
    min_age: Option<u32>,

    /// Only accept this vaccine
    #[arg(long)]
    vaccine: Option<String>,

    /// Minutes between polls
    #[arg(long)]
    interval_minutes: Option<u64>,

    /// Exit after the first poll with matches
    #[arg(long)]
    stop_if_found: bool,

    /// Don't raise desktop notifications
    #[arg(long)]
    no_notify: bool,

    /// Mobile number registered with CoWIN
    #[arg(long)]
    mobile: Option<String>,

    /// Request an OTP for --mobile when slots appear
    #[arg(long)]
    request_otp: bool,

    /// Stop after this many polls
    #[arg(long)]
    max_polls: Option<u64>,
}

#[derive(ClapArgs, Debug)]
struct SessionsArgs {
    #[command(flatten)]
    area: AreaArgs,

    /// Start date, dd-mm-YYYY or YYYY-MM-DD (default: today)
    #[arg(long, value_parser = utils::parse_user_date)]
    date: Option<chrono::NaiveDate>,

    /// Search seven days instead of one
    #[arg(long)]
    week: bool,

    /// Only show sessions open to this age
    #[arg(long)]
    min_age: Option<u32>,

    /// Only show this vaccine
    #[arg(long)]
    vaccine: Option<String>,

    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum OtpCommand {
    /// Send an OTP to a mobile number
    Generate {
        /// Ten digit mobile number
        mobile: String,
    },
    /// Confirm an OTP and print the session token
    Confirm {
        /// Transaction id printed by `otp generate`
        txn_id: String,
        /// OTP received by SMS
        otp: String,
    },
}

impl AreaArgs {
    fn resolve(&self) -> Option<SearchArea> {
        match (self.district, self.pincode) {
            (Some(id), _) => Some(SearchArea::District(id)),
            (None, Some(pin)) => Some(SearchArea::Pincode(pin)),
            (None, None) => None,
        }
    }
}

/// Apply command line overrides on top of the loaded config.
fn apply_watch_overrides(config: &mut Config, args: &WatchArgs) {
    let watch = &mut config.watch;
    if let Some(id) = args.area.district {
        watch.district_id = Some(id);
    }
    if let Some(pin) = args.area.pincode {
        watch.pincode = Some(pin);
        if args.area.district.is_none() {
            watch.district_id = None;
        }
    }
    if let Some(age) = args.min_age {
        watch.min_age_limit = age;
    }
    if args.vaccine.is_some() {
        watch.vaccine = args.vaccine.clone();
    }
    if let Some(minutes) = args.interval_minutes {
        watch.interval_minutes = minutes;
    }
    if args.stop_if_found {
        watch.stop_if_found = true;
    }
    if args.no_notify {
        watch.notify = false;
    }
    if args.mobile.is_some() {
        watch.mobile = args.mobile.clone();
    }
    if args.request_otp {
        watch.request_otp = true;
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let filter = if args.debug {
        "cowin_watch=debug,info"
    } else {
        "cowin_watch=info,warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut config = if let Some(path) = &args.config {
        Config::from_file(path).with_context(|| format!("Failed to load config from {}", path))?
    } else {
        Config::load()?
    };

    match args.command {
        Command::Watch(watch_args) => {
            apply_watch_overrides(&mut config, &watch_args);
            config.validate()?;

            let mut options = WatchOptions::from_config(&config)?;
            options.max_polls = watch_args.max_polls;

            let client = CowinClient::new(&config.api)?;
            let notifier = DesktopNotifier::new(&config.notification);
            let summary = Monitor::new(client, notifier, options).run().await;

            tracing::info!(
                "Watch finished after {} polls ({} with matches, {} centers open at last match)",
                summary.polls,
                summary.matched_polls,
                summary.last_matches.len()
            );
        }
        Command::States => {
            let client = CowinClient::new(&config.api)?;
            let states = client.get_states().await?;
            print!("{}", report::render_states(&states));
        }
        Command::Districts { state_id } => {
            let client = CowinClient::new(&config.api)?;
            let districts = client.get_districts(state_id).await?;
            print!("{}", report::render_districts(&districts));
        }
        Command::Sessions(sessions_args) => {
            let area = sessions_args
                .area
                .resolve()
                .context("Pass --district or --pincode")?;
            let date = utils::resolve_date(sessions_args.date);
            let client = CowinClient::new(&config.api)?;

            let centers = match (area, sessions_args.week) {
                (SearchArea::District(id), true) => client.calendar_by_district(id, date).await?,
                (SearchArea::District(id), false) => client.find_by_district(id, date).await?,
                (SearchArea::Pincode(pin), true) => client.calendar_by_pin(pin, date).await?,
                (SearchArea::Pincode(pin), false) => client.find_by_pin(pin, date).await?,
            };

            // Unfiltered unless an age or vaccine is asked for
            let centers = if sessions_args.min_age.is_some() || sessions_args.vaccine.is_some() {
                SlotFilter::new(sessions_args.min_age.unwrap_or(u32::MAX))
                    .with_vaccine(sessions_args.vaccine)
                    .apply(centers)
            } else {
                centers
            };

            if sessions_args.json {
                print_json(&centers)?;
            } else {
                report::print_centers(&centers);
            }
        }
        Command::Otp { sub } => {
            let client = CowinClient::new(&config.api)?;
            match sub {
                OtpCommand::Generate { mobile } => {
                    if !config::is_valid_mobile(&mobile) {
                        anyhow::bail!("mobile number '{}' must be ten digits", mobile);
                    }
                    let response = client.generate_otp(&mobile).await?;
                    println!("OTP sent to {}. txnId: {}", mobile, response.txn_id);
                }
                OtpCommand::Confirm { txn_id, otp } => {
                    let response = client.confirm_otp(&otp, &txn_id).await?;
                    println!("{}", response.token);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_watch() {
        let args = Args::try_parse_from([
            "cowin-watch",
            "watch",
            "--district",
            "395",
            "--min-age",
            "45",
            "--stop-if-found",
            "--no-notify",
        ])
        .unwrap();

        let Command::Watch(watch_args) = args.command else {
            panic!("expected watch command");
        };
        let mut config = Config::default();
        apply_watch_overrides(&mut config, &watch_args);

        assert_eq!(config.watch.district_id, Some(395));
        assert_eq!(config.watch.min_age_limit, 45);
        assert!(config.watch.stop_if_found);
        assert!(!config.watch.notify);
    }

    #[test]
    fn test_pincode_flag_replaces_configured_district() {
        let args = Args::try_parse_from(["cowin-watch", "watch", "--pincode", "400067"]).unwrap();
        let Command::Watch(watch_args) = args.command else {
            panic!("expected watch command");
        };

        let mut config = Config::default();
        config.watch.district_id = Some(395);
        apply_watch_overrides(&mut config, &watch_args);

        assert_eq!(config.watch.district_id, None);
        assert_eq!(config.watch.pincode, Some(400067));
    }

    #[test]
    fn test_sessions_date_accepts_api_format() {
        let args = Args::try_parse_from([
            "cowin-watch",
            "sessions",
            "--pincode",
            "400067",
            "--date",
            "04-05-2021",
        ])
        .unwrap();
        let Command::Sessions(sessions_args) = args.command else {
            panic!("expected sessions command");
        };
        assert_eq!(
            sessions_args.date,
            chrono::NaiveDate::from_ymd_opt(2021, 5, 4)
        );
        assert_eq!(sessions_args.area.resolve(), Some(SearchArea::Pincode(400067)));
    }
}
