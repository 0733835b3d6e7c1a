//! Field schema for each post kind.
//!
//! The draft store accepts any value for any field. The schema is applied at
//! stage boundaries: before the wizard leaves a step, that step's fields must
//! be present (when required) and of the declared type.

use std::fmt;

use crate::model::{Condition, FieldValue, Fields, PostKind, Step};

/// Declared type of a draft field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Flag,
    List,
    Number,
}

impl FieldType {
    fn accepts(self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Text, FieldValue::Text(_))
            | (Self::Flag, FieldValue::Flag(_))
            | (Self::List, FieldValue::List(_)) => true,
            // Non-finite numbers cannot be stored as JSON.
            (Self::Number, FieldValue::Number(n)) => n.is_finite(),
            _ => false,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Flag => "yes/no",
            Self::List => "list",
            Self::Number => "number",
        }
    }
}

/// One field of a post kind's schema.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub step: Step,
    pub ty: FieldType,
    pub required: bool,
}

const fn field(name: &'static str, step: Step, ty: FieldType, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        step,
        ty,
        required,
    }
}

const ITEM_FIELDS: &[FieldSpec] = &[
    field("category", Step::BasicInfo, FieldType::Text, true),
    field("subcategory", Step::BasicInfo, FieldType::Text, true),
    field("title", Step::Details, FieldType::Text, true),
    field("description", Step::Details, FieldType::Text, true),
    field("condition", Step::Details, FieldType::Text, true),
    field("location", Step::Details, FieldType::Text, true),
    field("images", Step::Details, FieldType::List, false),
    field("estimatedValue", Step::Details, FieldType::Number, false),
    field("preferredSwaps", Step::TradeOptions, FieldType::Text, true),
    field("preferredCategories", Step::TradeOptions, FieldType::List, false),
    field("openToDonation", Step::TradeOptions, FieldType::Flag, false),
];

const SERVICE_FIELDS: &[FieldSpec] = &[
    field("category", Step::BasicInfo, FieldType::Text, true),
    field("subcategory", Step::BasicInfo, FieldType::Text, true),
    field("title", Step::Details, FieldType::Text, true),
    field("description", Step::Details, FieldType::Text, true),
    field("location", Step::Details, FieldType::Text, true),
    field("availability", Step::Details, FieldType::Text, false),
    field("images", Step::Details, FieldType::List, false),
    field("preferredSwaps", Step::TradeOptions, FieldType::Text, true),
    field("preferredCategories", Step::TradeOptions, FieldType::List, false),
];

/// All fields declared for `kind`, in step order.
pub fn fields_for(kind: PostKind) -> &'static [FieldSpec] {
    match kind {
        PostKind::Item => ITEM_FIELDS,
        PostKind::Service => SERVICE_FIELDS,
    }
}

/// Looks up a declared field by name.
pub fn lookup(kind: PostKind, name: &str) -> Option<&'static FieldSpec> {
    fields_for(kind).iter().find(|f| f.name == name)
}

/// What is wrong with a field at a stage boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    Missing,
    WrongType { expected: FieldType },
    UnknownCondition(String),
}

/// A field that failed stage validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            FieldProblem::Missing => write!(f, "{}: required", self.field),
            FieldProblem::WrongType { expected } => {
                write!(f, "{}: expected {}", self.field, expected.name())
            }
            FieldProblem::UnknownCondition(value) => write!(
                f,
                "{}: '{value}' is not one of {}",
                self.field,
                Condition::NAMES.join(", ")
            ),
        }
    }
}

/// Checks the fields that belong to `step`.
pub fn validate_stage(kind: PostKind, step: Step, fields: &Fields) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = fields_for(kind)
        .iter()
        .filter(|spec| spec.step == step)
        .filter_map(|spec| check_field(spec, fields.get(spec.name)))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks every stage up to and including `through`.
pub fn validate_through(
    kind: PostKind,
    through: Step,
    fields: &Fields,
) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = Step::ALL
        .into_iter()
        .filter(|step| *step <= through)
        .filter_map(|step| validate_stage(kind, step, fields).err())
        .flatten()
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_field(spec: &FieldSpec, value: Option<&FieldValue>) -> Option<FieldError> {
    let problem = match value {
        None => spec.required.then_some(FieldProblem::Missing)?,
        Some(v) if !spec.ty.accepts(v) => FieldProblem::WrongType { expected: spec.ty },
        Some(v) if spec.required && !v.is_set() => FieldProblem::Missing,
        Some(FieldValue::Text(s)) if spec.name == "condition" => {
            s.parse::<Condition>().err().map(|_| FieldProblem::UnknownCondition(s.clone()))?
        }
        Some(_) => return None,
    };
    Some(FieldError {
        field: spec.name,
        problem,
    })
}

/// Parses command-line input into a value for `name`.
///
/// Declared fields are parsed by their type; list values are split on commas.
/// Undeclared fields are kept as text.
pub fn parse_value(kind: PostKind, name: &str, raw: &str) -> Result<FieldValue, String> {
    let Some(spec) = lookup(kind, name) else {
        return Ok(FieldValue::Text(raw.to_string()));
    };
    match spec.ty {
        FieldType::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldType::List => Ok(FieldValue::List(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )),
        FieldType::Flag => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(FieldValue::Flag(true)),
            "false" | "no" | "n" | "0" => Ok(FieldValue::Flag(false)),
            _ => Err(format!("{name}: expected yes or no, got '{raw}'")),
        },
        FieldType::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(FieldValue::Number)
            .ok_or_else(|| format!("{name}: expected a number, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, FieldValue)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn basic_info_requires_category_and_subcategory() {
        let errors = validate_stage(PostKind::Item, Step::BasicInfo, &Fields::new()).unwrap_err();

        let missing: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(missing, ["category", "subcategory"]);
        assert!(errors.iter().all(|e| e.problem == FieldProblem::Missing));
    }

    #[test]
    fn blank_required_text_is_missing() {
        let f = fields(&[("category", "  ".into()), ("subcategory", "lamps".into())]);

        let errors = validate_stage(PostKind::Item, Step::BasicInfo, &f).unwrap_err();

        assert_eq!(
            errors,
            [FieldError {
                field: "category",
                problem: FieldProblem::Missing,
            }]
        );
    }

    #[test]
    fn wrong_type_is_reported() {
        let f = fields(&[("preferredSwaps", "Books".into()), ("openToDonation", "sure".into())]);

        let errors = validate_stage(PostKind::Item, Step::TradeOptions, &f).unwrap_err();

        assert_eq!(
            errors,
            [FieldError {
                field: "openToDonation",
                problem: FieldProblem::WrongType {
                    expected: FieldType::Flag,
                },
            }]
        );
    }

    #[test]
    fn non_finite_number_is_wrong_type() {
        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let f = fields(&[
                ("title", "Lamp".into()),
                ("description", "Brass".into()),
                ("condition", "good".into()),
                ("location", "Lisbon".into()),
                ("estimatedValue", n.into()),
            ]);

            let errors = validate_stage(PostKind::Item, Step::Details, &f).unwrap_err();

            assert_eq!(
                errors,
                [FieldError {
                    field: "estimatedValue",
                    problem: FieldProblem::WrongType {
                        expected: FieldType::Number,
                    },
                }]
            );
        }
    }

    #[test]
    fn item_condition_must_be_known() {
        let f = fields(&[
            ("title", "Lamp".into()),
            ("description", "Brass".into()),
            ("condition", "mint".into()),
            ("location", "Lisbon".into()),
        ]);

        let errors = validate_stage(PostKind::Item, Step::Details, &f).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].problem,
            FieldProblem::UnknownCondition("mint".into())
        );
    }

    #[test]
    fn service_details_have_no_condition() {
        let f = fields(&[
            ("title", "Guitar lessons".into()),
            ("description", "Beginners".into()),
            ("location", "Porto".into()),
        ]);

        assert!(validate_stage(PostKind::Service, Step::Details, &f).is_ok());
        assert!(validate_stage(PostKind::Item, Step::Details, &f).is_err());
    }

    #[test]
    fn review_has_no_fields() {
        assert!(validate_stage(PostKind::Item, Step::Review, &Fields::new()).is_ok());
    }

    #[test]
    fn validate_through_collects_earlier_stages() {
        let f = fields(&[("category", "home".into()), ("subcategory", "lamps".into())]);

        let errors = validate_through(PostKind::Service, Step::TradeOptions, &f).unwrap_err();

        let names: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(names, ["title", "description", "location", "preferredSwaps"]);
    }

    #[test]
    fn parse_value_follows_declared_type() {
        assert_eq!(
            parse_value(PostKind::Item, "preferredCategories", "books, toys,").unwrap(),
            FieldValue::List(vec!["books".into(), "toys".into()])
        );
        assert_eq!(
            parse_value(PostKind::Item, "openToDonation", "Yes").unwrap(),
            FieldValue::Flag(true)
        );
        assert_eq!(
            parse_value(PostKind::Item, "estimatedValue", "12.5").unwrap(),
            FieldValue::Number(12.5)
        );
        assert!(parse_value(PostKind::Item, "estimatedValue", "cheap").is_err());
        for raw in ["NaN", "inf", "-inf", "infinity"] {
            assert!(parse_value(PostKind::Item, "estimatedValue", raw).is_err(), "{raw}");
        }
        assert_eq!(
            parse_value(PostKind::Service, "notes", "a,b").unwrap(),
            FieldValue::Text("a,b".into())
        );
    }
}
