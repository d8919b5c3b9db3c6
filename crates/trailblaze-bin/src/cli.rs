// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `login` / `logout` / `register`: session lifecycle
//! - `whoami`: decoded roles and capabilities of the stored session
//! - `check-password`: local password strength check
//! - `open`: open a page, switch section and print its data
//! - `account`: account operations, user lists and own-profile changes
//! - `worksheet`: import, edit and delete worksheets
//! - `event`: manage events and event sign-ups
//! - `notifications`: notification list
//! - `validate`: validate the configuration file
//! - `version`: version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use trailblaze_client::{AccountOperation, EventForm, InstitutionalForm, UserFilter};
use trailblaze_config::{ClientConfig, ConfigLoader, ConfigResult};
use trailblaze_view::PageKind;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Trailblaze command-line client
///
/// Logs in against the Trailblaze REST backend, keeps the session on disk
/// and shows what the stored roles allow.
#[derive(Parser, Debug)]
#[command(
    name = "trailblaze",
    author = "Sylvex <contact@sylvex.io>",
    version = trailblaze_client::VERSION,
    about = "Trailblaze command-line client",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "trailblaze.yaml",
        env = "TRAILBLAZE_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format; defaults to the configured format
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginArgs),

    /// End the stored session
    Logout,

    /// Create a civic account
    Register(RegisterArgs),

    /// Show the stored session's user, roles and capabilities
    ///
    /// This is the default command when no subcommand is specified.
    Whoami(OutputArgs),

    /// Check a password against the strength rules
    #[command(name = "check-password")]
    CheckPassword(CheckPasswordArgs),

    /// Open a page and load a section
    Open(OpenArgs),

    /// Account operations
    Account(AccountArgs),

    /// Worksheet management
    Worksheet(WorksheetArgs),

    /// Events and sign-ups
    Event(EventArgs),

    /// List notifications
    Notifications(OutputArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `login` command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,

    /// Password
    #[arg(short, long, conflicts_with = "password_stdin", required_unless_present = "password_stdin")]
    pub password: Option<String>,

    /// Read the password from stdin
    #[arg(long)]
    pub password_stdin: bool,
}

/// Arguments for the `register` command.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Full name
    #[arg(short, long)]
    pub name: String,

    /// Password
    #[arg(short, long)]
    pub password: String,

    /// Password confirmation; defaults to the password
    #[arg(long)]
    pub confirm: Option<String>,

    /// Make the profile public
    #[arg(long)]
    pub public: bool,
}

/// Arguments for the `check-password` command.
#[derive(Args, Debug, Clone)]
pub struct CheckPasswordArgs {
    /// Password to check
    pub password: String,

    /// Confirmation to compare against
    #[arg(long)]
    pub confirm: Option<String>,
}

/// Arguments for the `open` command.
#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    /// Page (dashboard, userpage, events, worksheets)
    #[arg(value_parser = parse_page)]
    pub page: PageKind,

    /// Section to switch to; defaults to the page's initial section
    pub section: Option<String>,

    /// Open a worksheet in the details section (worksheets page)
    #[arg(long, conflicts_with = "section")]
    pub worksheet: Option<String>,

    /// Use the detailed worksheet view
    #[arg(long, requires = "worksheet")]
    pub detailed: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `account` command.
#[derive(Args, Debug, Clone)]
pub struct AccountArgs {
    /// Operation to run
    #[command(subcommand)]
    pub action: AccountAction,
}

/// Account operations.
#[derive(Subcommand, Debug, Clone)]
pub enum AccountAction {
    /// Activate an account
    Activate {
        /// Target username
        target: String,
    },
    /// Deactivate an account
    Deactivate {
        /// Target username
        target: String,
    },
    /// Suspend an account
    Suspend {
        /// Target username
        target: String,
    },
    /// Remove an account
    Remove {
        /// Target username
        target: String,
    },
    /// End another user's session
    #[command(name = "force-logout")]
    ForceLogout {
        /// Target username
        target: String,
    },
    /// Ask for the logged-in account to be removed
    #[command(name = "request-removal")]
    RequestRemoval,
    /// List users, optionally filtered
    Users(UserFilterArgs),
    /// Show a user's state and profile visibility
    Details {
        /// Target username
        target: String,
    },
    /// Create an institutional account
    #[command(name = "create-user")]
    CreateUser(InstitutionalArgs),
    /// Flip the logged-in profile between public and private
    #[command(name = "toggle-visibility")]
    ToggleVisibility,
}

/// User list filters. At most one applies.
#[derive(Args, Debug, Default, Clone)]
pub struct UserFilterArgs {
    /// Users holding this role
    #[arg(long, conflicts_with_all = ["state", "profile"])]
    pub role: Option<String>,

    /// Users in this account state
    #[arg(long, conflicts_with = "profile")]
    pub state: Option<String>,

    /// Users with this profile visibility
    #[arg(long)]
    pub profile: Option<String>,
}

impl UserFilterArgs {
    /// Returns the filter to apply.
    pub fn filter(&self) -> UserFilter {
        match (&self.role, &self.state, &self.profile) {
            (Some(role), _, _) => UserFilter::Role(role.clone()),
            (None, Some(state), _) => UserFilter::State(state.clone()),
            (None, None, Some(profile)) => UserFilter::Profile(profile.clone()),
            (None, None, None) => UserFilter::All,
        }
    }
}

/// Arguments for `account create-user`.
#[derive(Args, Debug, Clone)]
pub struct InstitutionalArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,

    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Full name
    #[arg(short, long)]
    pub name: String,

    /// Initial password
    #[arg(short, long)]
    pub password: String,

    /// Role (SYSADMIN, SYSBO, SMBO, SDVBO, PRBO, PO, RU, ADLU)
    #[arg(short, long)]
    pub role: String,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Make the profile public
    #[arg(long)]
    pub public: bool,
}

impl InstitutionalArgs {
    /// Builds the form.
    pub fn form(&self) -> InstitutionalForm {
        let mut form = InstitutionalForm::new(
            self.username.trim(),
            self.email.trim(),
            self.password.clone(),
            self.name.trim(),
            self.role.trim(),
        );
        form.phone = self.phone.clone().filter(|p| !p.trim().is_empty());
        form.public_profile = self.public;
        form
    }
}

/// Arguments for the `worksheet` command.
#[derive(Args, Debug, Clone)]
pub struct WorksheetArgs {
    /// Operation to run
    #[command(subcommand)]
    pub action: WorksheetAction,
}

/// Worksheet operations.
#[derive(Subcommand, Debug, Clone)]
pub enum WorksheetAction {
    /// Import a GeoJSON feature collection
    Import {
        /// GeoJSON file
        file: PathBuf,
    },
    /// Replace a worksheet's editable fields
    Update {
        /// Worksheet id
        id: String,
        /// JSON file with the fields
        file: PathBuf,
    },
    /// Delete a worksheet
    Delete {
        /// Worksheet id
        id: String,
    },
}

/// Arguments for the `event` command.
#[derive(Args, Debug, Clone)]
pub struct EventArgs {
    /// Operation to run
    #[command(subcommand)]
    pub action: EventAction,
}

/// Event operations.
#[derive(Subcommand, Debug, Clone)]
pub enum EventAction {
    /// Create an event
    Create(EventFormArgs),
    /// Replace an event
    Update {
        /// Event id
        id: String,
        /// New event fields
        #[command(flatten)]
        form: EventFormArgs,
    },
    /// Delete an event
    Delete {
        /// Event id
        id: String,
    },
    /// Sign up for an event
    Register {
        /// Event id
        id: String,
    },
    /// Withdraw from an event
    Unregister {
        /// Event id
        id: String,
    },
    /// List who signed up for an event
    Registrations {
        /// Event id
        id: String,
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Event fields.
#[derive(Args, Debug, Clone)]
pub struct EventFormArgs {
    /// Title
    #[arg(short, long)]
    pub title: String,

    /// Description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Start time in milliseconds since the Unix epoch
    #[arg(long)]
    pub at: i64,

    /// Location as `lat,lng`
    #[arg(long)]
    pub location: String,

    /// Worksheet id
    #[arg(short, long)]
    pub worksheet: String,
}

impl EventFormArgs {
    /// Builds the form.
    pub fn form(&self) -> EventForm {
        EventForm::new(
            self.title.trim(),
            self.at,
            self.location.trim(),
            self.worksheet.trim(),
        )
        .with_description(self.description.trim())
    }
}

impl AccountAction {
    /// Returns the administrative operation and its target, if this is one.
    pub fn operation(&self) -> Option<(AccountOperation, &str)> {
        match self {
            AccountAction::Activate { target } => Some((AccountOperation::Activate, target.as_str())),
            AccountAction::Deactivate { target } => Some((AccountOperation::Deactivate, target.as_str())),
            AccountAction::Suspend { target } => Some((AccountOperation::Suspend, target.as_str())),
            AccountAction::Remove { target } => Some((AccountOperation::Remove, target.as_str())),
            AccountAction::ForceLogout { .. }
            | AccountAction::RequestRemoval
            | AccountAction::Users(_)
            | AccountAction::Details { .. }
            | AccountAction::CreateUser(_)
            | AccountAction::ToggleVisibility => None,
        }
    }
}

/// Arguments for commands that only choose an output format.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<trailblaze_config::LogFormat> for LogFormat {
    fn from(format: trailblaze_config::LogFormat) -> Self {
        match format {
            trailblaze_config::LogFormat::Text => LogFormat::Text,
            trailblaze_config::LogFormat::Json => LogFormat::Json,
            trailblaze_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

fn parse_page(s: &str) -> Result<PageKind, String> {
    PageKind::parse(s).ok_or_else(|| {
        let known: Vec<&str> = PageKind::all().iter().map(PageKind::as_str).collect();
        format!("unknown page '{}' (expected one of: {})", s, known.join(", "))
    })
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `whoami`.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Whoami(OutputArgs::default()))
    }

    /// Loads the configuration file, using defaults when it does not exist.
    pub fn load_config(&self) -> ConfigResult<ClientConfig> {
        ConfigLoader::new().load_or_default(&self.config)
    }

    /// Get the effective log level based on flags and configuration.
    pub fn effective_log_level(&self, configured: trailblaze_config::LogLevel) -> String {
        if self.quiet {
            "warn".to_string()
        } else if self.verbose {
            "debug".to_string()
        } else {
            self.log_level
                .clone()
                .unwrap_or_else(|| configured.as_str().to_string())
        }
    }

    /// Get the effective log format based on flags and configuration.
    pub fn effective_log_format(&self, configured: trailblaze_config::LogFormat) -> LogFormat {
        self.log_format.unwrap_or_else(|| configured.into())
    }
}

// =============================================================================
// Tests
// =============================================================================
