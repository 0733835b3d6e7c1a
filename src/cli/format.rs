//! Output formatting for CLI display.

use std::fmt::Write;

use crate::{
    model::{PostKind, PostRecord, PostsStatus, Step},
    schema,
    wizard::{Phase, Wizard},
};

/// The step indicator, current step bracketed:
/// `1 Basic Info > [2 Details] > 3 Trade Options > 4 Review`.
pub(super) fn format_steps(current: Step) -> String {
    Step::ALL
        .iter()
        .map(|step| {
            if *step == current {
                format!("[{step}]")
            } else {
                step.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Full view of the wizard: kind, steps, draft fields and what is missing.
pub(super) fn format_wizard(wizard: &Wizard<'_>) -> String {
    let mut out = String::new();
    let kind = match wizard.kind() {
        PostKind::Item => "an item",
        PostKind::Service => "a service",
    };

    if wizard.phase() == Phase::Submitted {
        let _ = write!(out, "Posted {kind}. Run `tradepost post done` to finish.");
        return out;
    }

    let _ = writeln!(out, "Posting {kind}");
    let _ = writeln!(out, "{}", format_steps(wizard.step()));

    let fields = wizard.draft().fields();
    if fields.is_empty() {
        let _ = writeln!(out, "\n  (empty draft)");
    } else {
        let _ = writeln!(out);
        for (name, value) in fields {
            let _ = writeln!(out, "  {name}: {value}");
        }
    }

    let check = if wizard.step() == Step::Review {
        schema::validate_through(wizard.kind(), Step::Review, fields)
    } else {
        schema::validate_stage(wizard.kind(), wizard.step(), fields)
    };
    if let Err(errors) = check {
        let _ = writeln!(out, "\nStill needed:");
        for error in errors {
            let _ = writeln!(out, "  {error}");
        }
    }

    if wizard.step() == Step::Review {
        let terms = if wizard.terms_accepted() {
            "accepted"
        } else {
            "not accepted (submit is disabled)"
        };
        let _ = writeln!(out, "\nTerms: {terms}");
    }

    out.trim_end().to_string()
}

/// Short summary of a submitted post.
pub(super) fn format_record(record: &PostRecord) -> String {
    let mut out = format!("{} ({}", record.title, record.kind);
    if let Some(condition) = record.condition {
        let _ = write!(out, ", {}", condition.as_str());
    }
    let _ = write!(
        out,
        ")\n  {} / {}, {}\n  Wants: {}",
        record.category, record.subcategory, record.location, record.preferred_swaps
    );
    out
}

pub(super) fn format_status(status: &PostsStatus) -> String {
    format!(
        "{} free, {} paid posts remaining",
        status.remaining_free_posts, status.remaining_paid_posts
    )
}
