//! kinfolk command-line entry point.
//!
//! # Responsibility
//! - Translate subcommands into `FormController` commands.
//! - Report non-fatal notices (e.g. an unwritable store) on stderr.

mod args;
mod table;

use anyhow::{bail, Context, Result};
use args::{AddArgs, Cli, Command, RegistrationArgs, UpdateArgs};
use clap::Parser;
use kinfolk_core::{
    validate_registration, AppConfig, FormController, MemberForm, MemberRepository, MemoryStore,
    RegistrationForm, RegistrationValidator, Store, SystemClock,
};
use log::warn;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use table::{member_table, TableSink};
use uuid::Uuid;

type Controller = FormController<Box<dyn Store>, SystemClock, TableSink>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::CheckRegistration(registration) = &cli.command {
        return check_registration(registration, cli.json);
    }

    let config = resolve_config(&cli)?;
    if let Err(err) = config.init_logging() {
        eprintln!("warning: file logging disabled: {err}");
    }

    let store: Box<dyn Store> = match config.open_store() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!("event=cli_open module=cli status=degraded error={}", err);
            eprintln!(
                "warning: cannot open {} ({err}); changes will not be saved",
                config.db_path().display()
            );
            Box::new(MemoryStore::new())
        }
    };
    let mut controller = FormController::new(MemberRepository::open(store), TableSink::default());
    report_notices(&mut controller);

    let outcome = dispatch(&mut controller, cli.command, cli.json);
    report_notices(&mut controller);
    outcome
}

fn dispatch(controller: &mut Controller, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Add(add) => add_member(controller, add, json),
        Command::Update { id, fields } => update_member(controller, id, fields, json),
        Command::Delete { id, yes } => delete_member(controller, id, yes, json),
        Command::List {
            search,
            gender,
            relation,
        } => {
            controller.search(search.unwrap_or_default());
            controller.filter(gender, relation);
            controller.sink().print(json)
        }
        Command::Show { id } => {
            let member = controller
                .repository()
                .find_by_id(id)
                .with_context(|| format!("member {id} not found"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&member)?);
            } else {
                println!("{}", member_table(std::slice::from_ref(&member)));
            }
            Ok(())
        }
        Command::CheckRegistration(registration) => check_registration(&registration, json),
    }
}

fn add_member(controller: &mut Controller, add: AddArgs, json: bool) -> Result<()> {
    let form = MemberForm {
        name: add.name,
        date_of_birth: add.dob.unwrap_or_default(),
        gender: add.gender,
        relation: add.relation,
        education: add.education.unwrap_or_default(),
        ..MemberForm::default()
    };
    let member = controller
        .add_or_update(form)
        .context("failed to add member")?;
    print_saved("Added", &member, json)
}

fn update_member(
    controller: &mut Controller,
    id: Uuid,
    fields: UpdateArgs,
    json: bool,
) -> Result<()> {
    controller.edit(id)?;
    if let Some(dob) = fields.dob {
        controller.set_date_of_birth(dob);
    }
    let form = controller.fields_mut();
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(gender) = fields.gender {
        form.gender = gender;
    }
    if let Some(relation) = fields.relation {
        form.relation = relation;
    }
    if let Some(education) = fields.education {
        form.education = education;
    }

    let member = controller.submit().context("failed to update member")?;
    print_saved("Updated", &member, json)
}

fn delete_member(controller: &mut Controller, id: Uuid, yes: bool, json: bool) -> Result<()> {
    let removed = controller.delete(id, |member| {
        yes || confirm(&format!("Delete {} ({})?", member.name, member.relation))
    })?;

    if json {
        println!("{}", serde_json::json!({ "id": id, "deleted": removed }));
    } else if removed {
        println!("Deleted {id}");
    } else if controller.repository().find_by_id(id).is_none() {
        bail!("member {id} not found");
    } else {
        println!("Kept {id}");
    }
    Ok(())
}

fn check_registration(registration: &RegistrationArgs, json: bool) -> Result<()> {
    let form = RegistrationForm {
        first_name: registration.first_name.clone(),
        last_name: registration.last_name.clone(),
        phone: registration.phone.clone(),
        email: registration.email.clone(),
        password: registration.password.clone(),
        confirm_password: registration.confirm_password.clone(),
        address: registration.address.clone(),
        terms_accepted: registration.terms,
    };
    let report = validate_registration(&RegistrationValidator, &form);
    let invalid: Vec<&str> = report.invalid.iter().map(|kind| kind.as_str()).collect();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "valid": report.is_valid(),
                "invalid_fields": invalid,
                "terms_accepted": report.terms_accepted,
            })
        );
    } else if report.is_valid() {
        println!("Registration details are valid.");
    } else {
        for field in &invalid {
            println!("invalid: {field}");
        }
        if !report.terms_accepted {
            println!("terms and conditions must be accepted");
        }
    }

    if !report.is_valid() {
        bail!("registration form is invalid");
    }
    Ok(())
}

fn print_saved(verb: &str, member: &kinfolk_core::Member, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(member)?);
    } else {
        println!("{verb} {} ({})", member.name, member.id);
    }
    Ok(())
}

fn report_notices(controller: &mut Controller) {
    for notice in controller.drain_notices() {
        eprintln!("warning: {}", notice.message);
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    let mut config = AppConfig::new(data_dir);
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level.clone());
    }
    Ok(config)
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("kinfolk"))
        .context("no local data directory on this platform; pass --data-dir")
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
