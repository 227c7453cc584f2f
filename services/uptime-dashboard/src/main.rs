//! Uptime Dashboard CLI
//!
//! Terminal front end for the service-uptime monitoring backend.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::Level;
use uptime_dashboard::config::API_URL_ENV;
use uptime_dashboard::forms::{
    LoginForm, NotificationForm, ServiceForm, SignUpForm, ValidationErrors,
};
use uptime_dashboard::models::TimeRange;
use uptime_dashboard::render;
use uptime_dashboard::views::{
    AddServiceView, ChartView, LoginView, Navigation, NotificationView, ServiceListView,
    SignUpView, ViewState,
};
use uptime_dashboard::{load_config, Config, Dashboard, DashboardBuilder, DashboardError};

#[derive(Parser)]
#[command(name = "uptime-dashboard")]
#[command(about = "Service uptime monitoring dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    SignUp {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check that the backend is reachable
    Health,
    /// Manage monitored services
    Services {
        #[command(subcommand)]
        command: ServicesCommand,
    },
    /// Response-time history for one service
    Stats {
        id: String,
        /// 1h, 24h, 7d or 30d
        #[arg(short, long)]
        range: Option<TimeRange>,
        /// Keep polling until interrupted
        #[arg(short, long)]
        follow: bool,
    },
    /// Webhook notification settings
    Notify {
        #[command(subcommand)]
        command: NotifyCommand,
    },
    /// Live summary and service table until Ctrl-C
    Watch,
}

#[derive(Subcommand)]
enum ServicesCommand {
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        url: String,
        /// API, Landing Page or Server
        #[arg(short = 't', long = "type", default_value = "API")]
        service_type: String,
        /// 1 minute, 10 minutes or 1 hour
        #[arg(short = 'f', long, default_value = "1 minute")]
        frequency: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum NotifyCommand {
    Show {
        id: String,
    },
    Set {
        id: String,
        #[arg(short, long)]
        webhook_url: String,
        /// daily or always
        #[arg(short, long, default_value = "always")]
        alert_frequency: String,
    },
    Remove {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, api_url={:?}, log_level={:?}",
        args.config,
        args.api_url,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.apply_env(std::env::var(API_URL_ENV).ok());
    if let Some(api_url) = args.api_url {
        config.api.base_url = api_url;
    }

    let dashboard = DashboardBuilder::new(config).build();
    run(&dashboard, args.command).await?;
    Ok(())
}

async fn run(dashboard: &Dashboard, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Login { username, password } => {
            let mut view = LoginView::new(dashboard.auth());
            view.form = LoginForm {
                username,
                password: password_or_prompt(password)?,
            };
            match view.submit().await {
                Some(Navigation::Dashboard) => println!("Logged in"),
                _ => return Err(form_failure(view.error, view.field_errors)),
            }
        }
        Command::SignUp { username, password } => {
            let mut view = SignUpView::new(dashboard.auth());
            view.form = SignUpForm {
                username,
                password: password_or_prompt(password)?,
            };
            match view.submit().await {
                Some(Navigation::Login { registered: true }) => {
                    println!("Account created. You can now log in.")
                }
                _ => return Err(form_failure(view.error, view.field_errors)),
            }
        }
        Command::Logout => {
            dashboard.auth().logout()?;
            println!("Logged out");
        }
        Command::Whoami => {
            let user = dashboard.api().current_user().await?;
            println!("{}", render::format_user(&user));
        }
        Command::Health => {
            if dashboard.api().health().await? {
                println!("Backend at {} is healthy", dashboard.config().api.base_url);
            } else {
                return Err(format!(
                    "Backend at {} is unhealthy",
                    dashboard.config().api.base_url
                )
                .into());
            }
        }
        Command::Services { command } => run_services(dashboard, command).await?,
        Command::Stats { id, range, follow } => {
            let range = range.unwrap_or(dashboard.config().dashboard.default_range);
            let mut view = ChartView::new(dashboard.api(), id, range);
            if follow {
                let cancel = cancel_on_ctrl_c();
                view.run(dashboard.poll_interval(), cancel, |view| {
                    println!("{}", format_chart_state(view));
                })
                .await;
                if view.session_expired() {
                    return Err(session_expired());
                }
            } else {
                view.load().await;
                view_failure(view.state())?;
                println!("{}", format_chart_state(&view));
            }
        }
        Command::Notify { command } => run_notify(dashboard, command).await?,
        Command::Watch => {
            let cancel = cancel_on_ctrl_c();
            dashboard
                .watch(cancel, |cards, list| {
                    println!(
                        "{}",
                        render::format_state(cards.state(), "No services yet", |summary| {
                            render::format_summary(summary)
                        })
                    );
                    println!(
                        "{}",
                        render::format_state(list.state(), "No services yet", |services| {
                            render::format_services_table(services)
                        })
                    );
                })
                .await;
            if !dashboard.auth().is_authenticated() {
                return Err(session_expired());
            }
        }
    }
    Ok(())
}

async fn run_services(
    dashboard: &Dashboard,
    command: ServicesCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ServicesCommand::List { json } => {
            if json {
                let services = dashboard.api().list_services().await?;
                println!("{}", render::format_services_json(&services)?);
            } else {
                let mut view = ServiceListView::new(dashboard.api());
                view.load().await;
                view_failure(view.state())?;
                println!(
                    "{}",
                    render::format_state(view.state(), "No services yet", |services| {
                        render::format_services_table(services)
                    })
                );
            }
        }
        ServicesCommand::Add {
            name,
            url,
            service_type,
            frequency,
            description,
        } => {
            let mut view = AddServiceView::new(dashboard.api());
            view.form = ServiceForm {
                name,
                url,
                service_type,
                refresh_frequency: frequency,
                description,
            };
            match view.submit().await {
                Some(service) => println!("Added service '{}' ({})", service.name, service.id),
                None => return Err(form_failure(view.error, view.field_errors)),
            }
        }
        ServicesCommand::Delete { id } => {
            let mut view = ServiceListView::new(dashboard.api());
            view.delete(&id).await?;
            println!("Deleted service {}", id);
        }
    }
    Ok(())
}

async fn run_notify(
    dashboard: &Dashboard,
    command: NotifyCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        NotifyCommand::Show { id } => {
            let preference = dashboard.api().notification(&id).await?;
            println!("{}", render::format_notification(&id, preference.as_ref()));
        }
        NotifyCommand::Set {
            id,
            webhook_url,
            alert_frequency,
        } => {
            let mut view = NotificationView::new(dashboard.api(), id);
            view.open().await?;
            view.form = NotificationForm {
                webhook_url,
                alert_frequency,
            };
            if !view.save().await {
                return Err(form_failure(view.error, view.field_errors));
            }
            println!(
                "{}",
                render::format_notification(view.service_id(), view.existing())
            );
        }
        NotifyCommand::Remove { id } => {
            let mut view = NotificationView::new(dashboard.api(), id);
            if !view.remove().await {
                return Err(form_failure(view.error, ValidationErrors::new()));
            }
            println!("Notifications removed for {}", view.service_id());
        }
    }
    Ok(())
}

fn format_chart_state(view: &ChartView) -> String {
    render::format_state(
        view.state(),
        &format!("No checks recorded in the last {}", view.range()),
        render::format_chart,
    )
}

/// A view left in its error state fails the command with the inline message
fn view_failure<T>(state: &ViewState<T>) -> Result<(), Box<dyn std::error::Error>> {
    match state.error() {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}

fn session_expired() -> Box<dyn std::error::Error> {
    DashboardError::AuthenticationExpired.inline_message().into()
}

fn password_or_prompt(password: Option<String>) -> uptime_dashboard::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

/// Field errors win over the request error; either becomes the command's failure
fn form_failure(error: Option<String>, field_errors: ValidationErrors) -> Box<dyn std::error::Error> {
    if !field_errors.is_empty() {
        return Box::new(field_errors);
    }
    error.unwrap_or_else(|| "Request failed".to_string()).into()
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });
    cancel
}
