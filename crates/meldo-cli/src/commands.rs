use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::{Result, bail};

use meldo_core::models::category::Category;
use meldo_core::models::location::Location;
use meldo_core::models::report::{Report, Status};
use meldo_core::models::subscription::SubscriptionKind;
use meldo_core::policy;
use meldo_export::{export_filename, reports_to_csv};
use meldo_geocode::resolver;
use meldo_storage::StateDir;
use meldo_store::{AppState, Notification, NotificationSink, ReportDraft};
use meldo_view::{SortOrder, ViewQuery, compute_kpis, visible_reports};

use crate::config;

/// Municipal issue reporting for the Saalekreis region.
#[derive(Parser, Debug)]
#[command(name = "meldo")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// File a new report
    Submit {
        #[arg(long)]
        category: Category,
        #[arg(long)]
        description: String,
        /// Free-text address, resolved through the configured geocoder
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        address: Option<String>,
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
        #[arg(long)]
        area: Option<String>,
        #[arg(long)]
        zip: Option<String>,
        /// Reference to a locally stored photo
        #[arg(long)]
        image: Option<String>,
    },
    /// List visible reports
    List {
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        area: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Only reports filed from this device/user
        #[arg(long)]
        mine: bool,
        /// Include unapproved reports (moderators only)
        #[arg(long)]
        unapproved: bool,
        #[arg(long)]
        oldest_first: bool,
    },
    /// Dashboard KPIs
    Stats,
    /// Cycle a report's status forward
    Advance { id: i64 },
    /// Upvote a report
    Vote { id: i64 },
    /// Approve a report for public view
    Approve { id: i64 },
    /// Reject and delete a report
    Reject {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Mark a report as routed to an authority
    Forward { id: i64, authority: String },
    /// Delete a report
    Remove { id: i64 },
    /// Watch an area or postal code
    Subscribe {
        kind: SubscriptionKind,
        value: String,
    },
    /// Drop a subscription by list index
    Unsubscribe { index: usize },
    /// Show current subscriptions
    Subscriptions,
    /// Sign in as a demo user
    Login {
        name: String,
        #[arg(long)]
        admin: bool,
        #[arg(long)]
        moderator: bool,
    },
    /// Sign out
    Logout,
    /// Show the current identity
    Whoami,
    /// Write all reports to a CSV file (admins only)
    Export {
        /// Target directory; defaults to the working directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Toggle status-change notifications
    Notify { mode: Toggle },
    /// Show or change the stored configuration
    Config {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Choose the geocoding strategy
    Geocoder { mode: GeocoderMode },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GeocoderMode {
    /// Offline gazetteer lookup
    Static,
    /// Remote lookup against the configured endpoint
    Live,
}

/// Prints notifications straight to the terminal; the browser build
/// hands these to the Notifications API instead.
struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn notify(&self, notification: &Notification) {
        println!("[notification] {}: {}", notification.title, notification.body);
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = config::load_or_default()?;
    let storage = match &config.data_dir {
        Some(dir) => StateDir::new(dir),
        None => StateDir::default_dir()?,
    };
    let mut state = AppState::load(storage);
    let sink = StdoutSink;

    match cli.command {
        Command::Submit {
            category,
            description,
            address,
            lat,
            lng,
            area,
            zip,
            image,
        } => {
            let location = match (address, lat, lng) {
                (Some(query), _, _) => {
                    let geocoder =
                        resolver(state.live_geocoder, &config.geocoder_endpoint, &config.region);
                    match geocoder.resolve(&query) {
                        Some(location) => Some(location),
                        None => bail!("address not found in {}: {query}", config.region),
                    }
                }
                (None, Some(lat), Some(lng)) => Some(Location::new(
                    lat,
                    lng,
                    area.unwrap_or_default(),
                    zip.unwrap_or_default(),
                )),
                _ => None,
            };
            let id = state.submit(
                ReportDraft {
                    category: Some(category),
                    description,
                    image,
                    location,
                },
                &sink,
            )?;
            println!("report {id} submitted (pending moderation)");
        }
        Command::List {
            status,
            category,
            area,
            search,
            mine,
            unapproved,
            oldest_first,
        } => {
            let query = ViewQuery {
                status,
                category,
                area,
                search,
                only_mine: mine,
                show_unapproved: unapproved,
                sort: if oldest_first {
                    SortOrder::OldestFirst
                } else {
                    SortOrder::NewestFirst
                },
            };
            let visible = visible_reports(
                &state.reports,
                state.current_user.as_ref(),
                state.identity(),
                &query,
            );
            if visible.is_empty() {
                println!("no reports match");
            }
            for report in visible {
                print_report(report);
            }
        }
        Command::Stats => {
            let kpis = compute_kpis(&state.reports, jiff::Timestamp::now());
            let json = serde_json::to_string_pretty(&kpis)?;
            println!("{json}");
        }
        Command::Advance { id } => {
            let status = state.advance_status(id, &sink)?;
            println!("report {id} is now {status}");
        }
        Command::Vote { id } => {
            let count = state.vote(id)?;
            println!("report {id} has {count} vote(s)");
        }
        Command::Approve { id } => {
            state.approve(id)?;
            println!("report {id} approved");
        }
        Command::Reject { id, yes } => {
            if !yes && !confirm(&format!("reject and delete report {id}?"))? {
                println!("cancelled");
                return Ok(());
            }
            state.reject(id)?;
            println!("report {id} rejected and deleted");
        }
        Command::Forward { id, authority } => {
            state.forward(id, &authority)?;
            println!("report {id} forwarded to {authority}");
        }
        Command::Remove { id } => {
            state.remove(id)?;
            println!("report {id} deleted");
        }
        Command::Subscribe { kind, value } => {
            state.subscribe(kind, &value)?;
            println!("subscribed to {kind} \"{}\"", value.trim());
        }
        Command::Unsubscribe { index } => {
            let removed = state.unsubscribe(index)?;
            println!("unsubscribed from {} \"{}\"", removed.kind, removed.value);
        }
        Command::Subscriptions => {
            if state.subscriptions.is_empty() {
                println!("no subscriptions");
            }
            for (index, subscription) in state.subscriptions.iter().enumerate() {
                println!("{index}: {} \"{}\"", subscription.kind, subscription.value);
            }
        }
        Command::Login {
            name,
            admin,
            moderator,
        } => {
            let user = state.login(&name, admin, moderator);
            println!("signed in as {} ({})", user.name, role_label(&user));
        }
        Command::Logout => {
            state.logout();
            println!("signed out");
        }
        Command::Whoami => match &state.current_user {
            Some(user) => println!("{} ({}), device {}", user.name, role_label(user), state.device_id),
            None => println!("guest, device {}", state.device_id),
        },
        Command::Export { out } => {
            if !policy::can_moderate(state.current_user.as_ref()) {
                bail!("the CSV export is available to admins and moderators only");
            }
            let csv = reports_to_csv(&state.reports);
            let filename = export_filename(&config.region, jiff::Timestamp::now());
            let path = out.unwrap_or_else(|| PathBuf::from(".")).join(&filename);
            std::fs::write(&path, csv.as_bytes())?;
            println!("wrote {} report(s) to {}", state.reports.len(), path.display());
        }
        Command::Notify { mode } => {
            let enabled = matches!(mode, Toggle::On);
            state.set_notify_on_status_change(enabled);
            println!(
                "status-change notifications {}",
                if enabled { "on" } else { "off" }
            );
        }
        Command::Config {
            region,
            endpoint,
            data_dir,
        } => {
            if region.is_none() && endpoint.is_none() && data_dir.is_none() {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            let mut updated = config.clone();
            if let Some(region) = region {
                updated.region = region;
            }
            if let Some(endpoint) = endpoint {
                updated.geocoder_endpoint = endpoint;
            }
            if let Some(data_dir) = data_dir {
                updated.data_dir = Some(data_dir);
            }
            config::save_config(&updated)?;
            println!("config saved");
        }
        Command::Geocoder { mode } => {
            let live = matches!(mode, GeocoderMode::Live);
            state.set_live_geocoder(live);
            println!(
                "geocoder set to {}",
                if live { "live" } else { "static" }
            );
        }
    }

    Ok(())
}

fn role_label(user: &meldo_core::models::user::User) -> &'static str {
    if user.is_admin {
        "admin"
    } else if user.is_moderator {
        "moderator"
    } else {
        "citizen"
    }
}

fn print_report(report: &Report) {
    let place = match &report.location {
        Some(location) => format!("{} {} ({})", location.zip, location.area, location.coordinate_string()),
        None => "no location".to_string(),
    };
    let flags = format!(
        "{}{}",
        if report.approved { "" } else { " [unapproved]" },
        if report.forwarded { " [forwarded]" } else { "" },
    );
    println!(
        "#{} {} | {} | {} | {} vote(s){}\n    {}",
        report.id,
        report.category,
        report.status,
        place,
        report.votes.count(),
        flags,
        report.description,
    );
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
