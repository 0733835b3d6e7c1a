//! Submission gate: the checks between the Review step and the post service.

use crate::{
    model::{Condition, FieldValue, Fields, PostKind, PostRecord, Step},
    schema::{self, FieldError},
    services::{PostService, QuotaService, ServiceError},
};

/// Why a submission did not go through.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Submit is disabled until the terms are accepted.
    #[error("accept the terms and privacy policy before submitting")]
    TermsNotAccepted,

    #[error(
        "you have no posts remaining ({free} free, {paid} paid); upgrade your plan to post more"
    )]
    QuotaExhausted { free: u32, paid: u32 },

    #[error("the draft is incomplete: {}", join_errors(.0))]
    Incomplete(Vec<FieldError>),

    #[error("post service failed: {0}")]
    Service(#[from] ServiceError),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Guards the post service behind the terms checkbox and the quota.
pub struct SubmissionGate<'a> {
    quota: &'a dyn QuotaService,
    posts: &'a dyn PostService,
}

impl<'a> SubmissionGate<'a> {
    pub fn new(quota: &'a dyn QuotaService, posts: &'a dyn PostService) -> Self {
        Self { quota, posts }
    }

    /// Checks terms then quota, builds the record and hands it to the post
    /// service.
    ///
    /// Nothing is called when the terms are not accepted. The post service is
    /// not called when no posts remain.
    pub fn submit(
        &self,
        kind: PostKind,
        terms_accepted: bool,
        fields: &Fields,
    ) -> Result<PostRecord, GateError> {
        if !terms_accepted {
            tracing::warn!(%kind, "submit refused: terms not accepted");
            return Err(GateError::TermsNotAccepted);
        }

        let status = self.quota.check_posts_status()?;
        if !status.has_remaining() {
            tracing::warn!(%kind, "submit refused: no posts remaining");
            return Err(GateError::QuotaExhausted {
                free: status.remaining_free_posts,
                paid: status.remaining_paid_posts,
            });
        }

        let record = build_record(kind, fields).map_err(GateError::Incomplete)?;
        self.posts.create_post(&record)?;
        Ok(record)
    }
}

/// Normalizes a draft into the record the post service expects.
///
/// Every stage is validated first; optional fields that are absent become
/// empty values.
pub fn build_record(kind: PostKind, fields: &Fields) -> Result<PostRecord, Vec<FieldError>> {
    schema::validate_through(kind, Step::LAST, fields)?;

    let text = |name: &str| {
        fields
            .get(name)
            .and_then(FieldValue::as_text)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let condition = match kind {
        PostKind::Item => text("condition").parse::<Condition>().ok(),
        PostKind::Service => None,
    };

    Ok(PostRecord {
        kind,
        category: text("category"),
        subcategory: text("subcategory"),
        title: text("title"),
        description: text("description"),
        condition,
        location: text("location"),
        images: fields
            .get("images")
            .and_then(FieldValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default(),
        preferred_swaps: text("preferredSwaps"),
    })
}
