//! Post wizard commands.

use clap::{Subcommand, ValueEnum};

use crate::{
    gate::SubmissionGate,
    model::{Fields, PostKind, Step},
    schema,
    storage::Storage,
    wizard::Wizard,
};

use super::format::{format_record, format_wizard};

#[derive(Debug, Subcommand)]
pub enum PostCommand {
    /// Show the current step, the draft and what the step still needs.
    Show,

    /// Start a new post, restoring the kind's saved draft if there is one.
    Start {
        #[arg(long, value_enum, default_value_t = KindArg::Item)]
        kind: KindArg,
    },

    /// Set draft fields: `name=value` pairs.
    ///
    /// List fields take comma-separated values. Flags take yes/no.
    /// Setting both category and subcategory on Basic Info moves on to Details.
    Set {
        /// Field assignments, e.g. `title=Lamp preferredCategories=books,toys`.
        #[arg(required = true)]
        assignments: Vec<String>,
    },

    /// Save the draft without changing step.
    Save,

    /// Check the current step, save the draft and move to the next step.
    Next,

    /// Go back one step.
    Back,

    /// Jump back to an earlier step (1-4).
    Goto {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        step: u8,
    },

    /// Switch between item and service posts. Returns to step 1.
    Switch {
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// Accept or decline the terms and privacy policy.
    Terms {
        #[arg(value_enum)]
        decision: TermsArg,
    },

    /// Submit the post from the Review step.
    Submit,

    /// Leave the success view and return to the listing.
    Done,
}

/// CLI-facing post kind, mapped to the domain `PostKind`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// A physical item.
    Item,
    /// A service.
    Service,
}

impl KindArg {
    fn to_domain(self) -> PostKind {
        match self {
            Self::Item => PostKind::Item,
            Self::Service => PostKind::Service,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TermsArg {
    Accept,
    Decline,
}

pub(super) fn run(command: PostCommand, storage: &Storage) -> Result<(), String> {
    let open = || Wizard::open(storage).map_err(|e| e.to_string());

    match command {
        PostCommand::Start { kind } => {
            let wizard = Wizard::start(storage, kind.to_domain()).map_err(|e| e.to_string())?;
            println!("{}", format_wizard(&wizard));
        }
        PostCommand::Show => {
            println!("{}", format_wizard(&open()?));
        }
        PostCommand::Set { assignments } => {
            let mut wizard = open()?;
            let partial = parse_assignments(wizard.kind(), &assignments)?;
            let stepped = wizard.update_data(partial).map_err(|e| e.to_string())?;
            if let Some(step) = stepped {
                eprintln!("Draft saved, moved on to {step}");
            }
            println!("{}", format_wizard(&wizard));
        }
        PostCommand::Save => {
            let wizard = open()?;
            let saved_at = wizard.save_draft().map_err(|e| e.to_string())?;
            eprintln!("Draft {} saved at {saved_at}", wizard.draft().key());
        }
        PostCommand::Next => {
            let mut wizard = open()?;
            if wizard.next().map_err(|e| e.to_string())? {
                eprintln!("Draft saved");
            } else {
                eprintln!("Already at Review; submit with `tradepost post submit`");
            }
            println!("{}", format_wizard(&wizard));
        }
        PostCommand::Back => {
            let mut wizard = open()?;
            if !wizard.previous().map_err(|e| e.to_string())? {
                eprintln!("Already at the first step");
            }
            println!("{}", format_wizard(&wizard));
        }
        PostCommand::Goto { step } => {
            let step = Step::from_number(step).ok_or("step must be between 1 and 4")?;
            let mut wizard = open()?;
            wizard.jump_to(step).map_err(|e| e.to_string())?;
            println!("{}", format_wizard(&wizard));
        }
        PostCommand::Switch { kind } => {
            let mut wizard = open()?;
            wizard
                .switch_post_type(kind.to_domain())
                .map_err(|e| e.to_string())?;
            println!("{}", format_wizard(&wizard));
        }
        PostCommand::Terms { decision } => {
            let accepted = matches!(decision, TermsArg::Accept);
            open()?.set_terms(accepted).map_err(|e| e.to_string())?;
            eprintln!("Terms {}", if accepted { "accepted" } else { "declined" });
        }
        PostCommand::Submit => {
            let gate = SubmissionGate::new(storage, storage);
            let record = open()?.submit(&gate).map_err(|e| e.to_string())?;
            eprintln!("Posted! Finish with `tradepost post done`.");
            println!("{}", format_record(&record));
        }
        PostCommand::Done => {
            open()?.done().map_err(|e| e.to_string())?;
            eprintln!("Back to the listing");
        }
    }
    Ok(())
}

/// Parses `name=value` pairs into a partial field mapping.
fn parse_assignments(kind: PostKind, assignments: &[String]) -> Result<Fields, String> {
    let mut partial = Fields::new();
    for assignment in assignments {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got '{assignment}'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing field name in '{assignment}'"));
        }
        let value = schema::parse_value(kind, name, raw)?;
        partial.insert(name.to_string(), value);
    }
    Ok(partial)
}
