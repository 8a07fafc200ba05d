use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "splitit_admin")]
#[command(about = "Admin utilities for Split-it (bootstrap users/groups)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./splitit.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Group(Group),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct Group {
    #[command(subcommand)]
    command: GroupCommand,
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    Create(GroupCreateArgs),
    AddMember(AddMemberArgs),
}

#[derive(Args, Debug)]
struct GroupCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct AddMemberArgs {
    #[arg(long)]
    group: Uuid,
    /// An active member of the group performing the addition.
    #[arg(long)]
    by: String,
    #[arg(long)]
    username: String,
}

/// Keeps the terminal in raw mode until dropped.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Replace the current stderr line with `text`.
fn notice(out: &mut impl Write, text: &str) -> std::io::Result<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(text)
    )?;
    out.flush()
}

/// Read a password without echoing it, one `*` per character.
fn read_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawMode::enable()?;
    let mut out = std::io::stderr();
    notice(&mut out, prompt)?;

    let mut password = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let control = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if control => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !control => {
                password.push(ch);
                execute!(out, Print("*"))?;
            }
            KeyCode::Backspace if password.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            _ => continue,
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    out.flush()?;
    Ok(password)
}

fn ask_new_password() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let password = read_password("Password: ")?;
        if password.trim().is_empty() {
            notice(&mut out, "Password must not be blank.\r\n")?;
            continue;
        }
        if read_password("Confirm password: ")? == password {
            return Ok(password);
        }
        notice(&mut out, "Passwords do not match. Try again.\r\n")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Print the error and exit with a status that tells input errors apart.
fn exit_with(err: EngineError) -> ! {
    eprintln!("{err}");
    let code = match err {
        EngineError::Database(_) => 1,
        _ => 2,
    };
    std::process::exit(code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = ask_new_password()?;
            let user = engine
                .register_user(&args.username, &args.email, &password)
                .await
                .unwrap_or_else(|err| exit_with(err));
            println!("created user: {} <{}>", user.username, user.email);
        }
        Command::Group(Group {
            command: GroupCommand::Create(args),
        }) => {
            let group = engine
                .create_group(&args.name, args.description.as_deref(), &args.owner)
                .await
                .unwrap_or_else(|err| exit_with(err));
            println!("created group: {} ({})", group.name, group.id);
        }
        Command::Group(Group {
            command: GroupCommand::AddMember(args),
        }) => {
            engine
                .add_member(args.group, &args.username, &args.by)
                .await
                .unwrap_or_else(|err| exit_with(err));
            println!("added {} to group {}", args.username, args.group);
        }
    }

    Ok(())
}
