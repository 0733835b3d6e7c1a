//! Account and liked-item commands.

use clap::Subcommand;

use crate::{model::NewUser, register, session::Session, storage::Storage};

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        /// At least 8 characters with upper and lower case, a number and a symbol.
        #[arg(long)]
        password: String,
    },

    /// Sign in to an existing account.
    Login {
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out.
    Logout,

    /// Show who is signed in.
    Status,
}

pub(super) fn run(command: AccountCommand, storage: &Storage) -> Result<(), String> {
    let mut session = load_session(storage)?;
    match command {
        AccountCommand::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            let user = NewUser {
                first_name,
                last_name,
                email,
                password,
            };
            register::register(storage, &mut session, &user).map_err(|e| e.to_string())?;
            eprintln!("Welcome, {}", user.first_name.trim());
        }
        AccountCommand::Login { email, password } => {
            let ok = storage
                .verify_password(&email, &password)
                .map_err(|e| format!("failed to check credentials: {e}"))?;
            if !ok {
                return Err("incorrect email or password".to_string());
            }
            session
                .login(&email)
                .map_err(|e| format!("failed to save session: {e}"))?;
            eprintln!("Signed in");
        }
        AccountCommand::Logout => {
            session
                .logout()
                .map_err(|e| format!("failed to save session: {e}"))?;
            eprintln!("Signed out");
        }
        AccountCommand::Status => match session.user() {
            Some(email) => println!("Signed in as {email}"),
            None => println!("Not signed in"),
        },
    }
    Ok(())
}

pub(super) fn cmd_like(storage: &Storage, item: &str) -> Result<(), String> {
    let added = load_session(storage)?
        .like(item)
        .map_err(|e| format!("failed to save like: {e}"))?;
    if !added {
        eprintln!("{item} was already liked");
    }
    Ok(())
}

pub(super) fn cmd_unlike(storage: &Storage, item: &str) -> Result<(), String> {
    let removed = load_session(storage)?
        .unlike(item)
        .map_err(|e| format!("failed to save like: {e}"))?;
    if !removed {
        return Err(format!("{item} is not liked"));
    }
    Ok(())
}

pub(super) fn cmd_likes(storage: &Storage) -> Result<(), String> {
    let session = load_session(storage)?;
    let mut any = false;
    for item in session.liked() {
        println!("{item}");
        any = true;
    }
    if !any {
        println!("No liked items");
    }
    Ok(())
}

fn load_session(storage: &Storage) -> Result<Session<'_>, String> {
    Session::load(storage).map_err(|e| format!("failed to load session: {e}"))
}
