//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use kinfolk_core::{Gender, Relation};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "kinfolk", version, about = "Household member register", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the member database and logs.
    #[arg(long, global = true, env = "KINFOLK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true, env = "KINFOLK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a family member.
    Add(AddArgs),

    /// Update fields of an existing member.
    Update {
        id: Uuid,

        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete a member.
    #[command(alias = "rm")]
    Delete {
        id: Uuid,

        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List members, optionally searched and filtered.
    #[command(alias = "ls")]
    List {
        /// Case-insensitive match on name or relation.
        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long, value_parser = parse_gender)]
        gender: Option<Gender>,

        #[arg(long, value_parser = parse_relation)]
        relation: Option<Relation>,
    },

    /// Show one member.
    Show { id: Uuid },

    /// Validate registration form input.
    CheckRegistration(RegistrationArgs),
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    /// Date of birth, YYYY-MM-DD.
    #[arg(long)]
    pub dob: Option<String>,

    #[arg(long)]
    pub gender: String,

    #[arg(long)]
    pub relation: String,

    #[arg(long)]
    pub education: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Date of birth, YYYY-MM-DD; pass an empty string to clear.
    #[arg(long)]
    pub dob: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub relation: Option<String>,

    #[arg(long)]
    pub education: Option<String>,
}

#[derive(Args)]
pub struct RegistrationArgs {
    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub password: String,

    #[arg(long, default_value = "")]
    pub confirm_password: String,

    #[arg(long, default_value = "")]
    pub address: String,

    /// Terms and conditions accepted.
    #[arg(long)]
    pub terms: bool,
}

fn parse_gender(value: &str) -> Result<Gender, String> {
    Gender::parse(value).ok_or_else(|| {
        let known: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();
        format!("unknown gender `{value}`; expected one of {}", known.join("|"))
    })
}

fn parse_relation(value: &str) -> Result<Relation, String> {
    Relation::parse(value).ok_or_else(|| {
        let known: Vec<&str> = Relation::ALL.iter().map(|r| r.as_str()).collect();
        format!("unknown relation `{value}`; expected one of {}", known.join("|"))
    })
}
