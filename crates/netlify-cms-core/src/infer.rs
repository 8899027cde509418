//! Field inference.
//!
//! Maps one schema field to at most one document [`Field`]. Rules, first hit
//! wins:
//!
//! 1. `ignore` in the field annotation drops the field.
//! 2. An annotation widget is taken as is, merged with the annotation's
//!    label, comment, hint, required flag and pattern.
//! 3. Otherwise the widget is inferred from the field type, with the owner
//!    resolved along the chain of enclosing fields appended to the hint.
//!
//! Message fields recurse into the referenced message. Objects and lists
//! whose children are all dropped are dropped themselves.

use std::iter;

use netlify_cms_proto::descriptor::v1::FieldBehavior;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::conversions::{FieldOverride, owner_from_proto};
use crate::document::{
    Field, ListWidget, NumberKind, ObjectWidget, Owner, Pattern, SelectOption, Widget, WidgetKind,
};
use crate::error::{Error, Result};
use crate::options::{
    Annotated, CollectionOption, FieldBehaviorOption, FieldOption, ResourceOption,
};
use crate::schema::{Cardinality, FieldDef, FieldType, MessageDef, SchemaSet};

/// Fields carrying revision metadata, never editable in the CMS.
const REVISION_FIELDS: [&str; 2] = ["revision_id", "revision_create_time"];

const TIMESTAMP_MESSAGE: &str = "google.protobuf.Timestamp";
const CREATE_TIME_FIELD: &str = "create_time";
const DATE_FORMAT: &str = "YYYY-MM-DD";
const TIME_FORMAT: &str = "HH:mm";

const RESOURCE_NAME_FIELD: &str = "name";
const RESOURCE_NAME_LABEL: &str = "RESOURCE NAME";
const RESOURCE_ID_SEGMENT: &str = "[a-z0-9][a-z0-9-]{0,61}[a-z0-9]";

const UNSPECIFIED_SUFFIX: &str = "_UNSPECIFIED";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("placeholder regex is valid"));

/// One step from a collection message down to a nested field: `field` is
/// declared in `message`.
#[derive(Debug, Clone, Copy)]
pub struct Link<'a> {
    pub message: &'a MessageDef,
    pub field: &'a FieldDef,
}

pub struct FieldInference<'a> {
    schema: &'a SchemaSet,
}

impl<'a> FieldInference<'a> {
    pub fn new(schema: &'a SchemaSet) -> Self {
        Self { schema }
    }

    /// Infers the document field for `field` of `message`. `chain` holds the
    /// enclosing fields, outermost first; it is empty for collection fields.
    pub fn infer(
        &self,
        message: &'a MessageDef,
        field: &'a FieldDef,
        chain: &[Link<'a>],
    ) -> Result<Option<Field>> {
        let required = is_required(field);
        let mut draft = Draft {
            name: field.name.clone(),
            label: infer_label(&field.name),
            comment: field.comments.clone(),
            hint: field.comments.clone(),
            required,
            pattern: None,
        };

        if let Some(annotation) = field.option::<FieldOption>() {
            let annotation = FieldOverride::from(annotation);
            if annotation.ignore {
                trace!(message = %message.full_name, field = %field.name, "Field ignored");
                return Ok(None);
            }
            if let Some(kind) = draft.merge(annotation) {
                return Ok(Some(draft.finish(kind)));
            }
        }

        let link = Link { message, field };
        if let Some(owner) = resolve_owner(chain, link) {
            draft
                .hint
                .push_str(&format!(" **[[{}]]({})**", owner.display_name, owner.uri));
        }

        if REVISION_FIELDS.contains(&field.name.as_str()) {
            return Ok(None);
        }

        let kind = match &field.field_type {
            FieldType::Message(name) if name == TIMESTAMP_MESSAGE && !field.is_list() => {
                if field.name == CREATE_TIME_FIELD {
                    draft.required = true;
                }
                WidgetKind::DateTime {
                    date_format: DATE_FORMAT.to_string(),
                    time_format: TIME_FORMAT.to_string(),
                }
            }
            FieldType::Bool if !field.is_list() => WidgetKind::Boolean,
            FieldType::String if field.is_list() => WidgetKind::List(ListWidget {
                allow_add: true,
                ..Default::default()
            }),
            FieldType::String => {
                let mut default = String::new();
                if let Some(resource) = message.option::<ResourceOption>()
                    && field.name == RESOURCE_NAME_FIELD
                {
                    draft.label = RESOURCE_NAME_LABEL.to_string();
                    draft.required = true;
                    if let Some(pattern) = resource.pattern.first() {
                        let regexp = resource_name_regexp(pattern);
                        draft.pattern = Some(Pattern {
                            error_message: format!("Must match {regexp}"),
                            regexp,
                        });
                        default = resource_name_prefix(pattern).to_string();
                    }
                }
                WidgetKind::String { default }
            }
            FieldType::Enum(name) => {
                let values = self
                    .schema
                    .enum_def(name)
                    .map(|e| e.values.as_slice())
                    .unwrap_or_default();
                WidgetKind::Select {
                    options: values
                        .iter()
                        .filter(|value| !(required && value.ends_with(UNSPECIFIED_SUFFIX)))
                        .map(|value| SelectOption {
                            label: value.replace('_', " "),
                            value: value.clone(),
                        })
                        .collect(),
                    default: None,
                }
            }
            FieldType::Message(name) if field.cardinality == Cardinality::Single => {
                let fields = self.infer_children(link, chain, name)?;
                if fields.is_empty() {
                    return Ok(None);
                }
                WidgetKind::Object(ObjectWidget {
                    collapsed: true,
                    summary: String::new(),
                    fields,
                })
            }
            FieldType::Message(name) if field.is_list() => {
                let fields = self.infer_children(link, chain, name)?;
                if fields.is_empty() {
                    return Ok(None);
                }
                WidgetKind::List(ListWidget {
                    allow_add: true,
                    collapsed: true,
                    minimize_collapsed: true,
                    summary: String::new(),
                    fields,
                })
            }
            t if t.is_floating_point() && !field.is_list() => WidgetKind::Number(NumberKind::Float),
            t if t.is_integer() && !field.is_list() => WidgetKind::Number(NumberKind::Int),
            _ => {
                trace!(message = %message.full_name, field = %field.name, "No widget for field");
                return Ok(None);
            }
        };
        Ok(Some(draft.finish(kind)))
    }

    /// Infers the fields of `target`, the message type of `link.field`.
    fn infer_children(
        &self,
        link: Link<'a>,
        chain: &[Link<'a>],
        target: &str,
    ) -> Result<Vec<Field>> {
        let expanding = chain.iter().chain(iter::once(&link));
        if expanding.clone().any(|l| l.message.full_name == target) {
            return Err(Error::SchemaCycle {
                path: field_path(expanding),
                message: target.to_string(),
            });
        }
        let Some(child) = self.schema.message(target) else {
            return Err(Error::UnresolvedType {
                field: format!("{}.{}", link.message.full_name, link.field.name),
                type_name: target.to_string(),
            });
        };

        let mut next = chain.to_vec();
        next.push(link);
        let mut fields = Vec::with_capacity(child.fields.len());
        for child_field in &child.fields {
            if let Some(field) = self.infer(child, child_field, &next)? {
                fields.push(field);
            }
        }
        Ok(fields)
    }
}

/// Inferred values, overwritten piecewise by an annotation.
struct Draft {
    name: String,
    label: String,
    comment: String,
    hint: String,
    required: bool,
    pattern: Option<Pattern>,
}

impl Draft {
    /// Applies the annotation and hands back its widget, if it declares one.
    fn merge(&mut self, annotation: FieldOverride) -> Option<WidgetKind> {
        if !annotation.name.is_empty() {
            self.name = annotation.name;
        }
        if !annotation.label.is_empty() {
            self.label = annotation.label;
        }
        if !annotation.comment.is_empty() {
            self.comment = annotation.comment;
        }
        if !annotation.hint.is_empty() {
            self.hint = annotation.hint;
        }
        if let Some(required) = annotation.required {
            self.required = required;
        }
        if annotation.pattern.is_some() {
            self.pattern = annotation.pattern;
        }
        annotation.kind
    }

    fn finish(self, kind: WidgetKind) -> Field {
        Field {
            name: self.name,
            label: self.label,
            comment: self.comment,
            widget: Widget {
                required: self.required,
                hint: self.hint,
                pattern: self.pattern,
                kind,
            },
        }
    }
}

/// `REQUIRED` field behavior.
pub fn is_required(field: &FieldDef) -> bool {
    field
        .option::<FieldBehaviorOption>()
        .is_some_and(|behaviors| behaviors.contains(&(FieldBehavior::Required as i32)))
}

/// `display_name` -> `DISPLAY NAME`
pub fn infer_label(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

/// Owner for `link`: the collection's owner, overridden by any field
/// annotation owner along the chain, last one winning.
pub fn resolve_owner<'a>(chain: &[Link<'a>], link: Link<'a>) -> Option<Owner> {
    let root = chain.first().unwrap_or(&link);
    let mut owner = root
        .message
        .option::<CollectionOption>()
        .and_then(|collection| collection.owner.as_ref());
    for step in chain.iter().chain(iter::once(&link)) {
        if let Some(field_owner) = step
            .field
            .option::<FieldOption>()
            .and_then(|field| field.owner.as_ref())
        {
            owner = Some(field_owner);
        }
    }
    owner.map(owner_from_proto)
}

/// Validation expression for a resource name pattern such as
/// `shippers/{shipper}/sites/{site}`. Each placeholder becomes one id segment
/// and the expression is anchored as a whole, `^...$`.
pub fn resource_name_regexp(pattern: &str) -> String {
    let mut regexp = String::from("^");
    let mut last = 0;
    for placeholder in PLACEHOLDER.find_iter(pattern) {
        push_escaped(&mut regexp, &pattern[last..placeholder.start()]);
        regexp.push_str(RESOURCE_ID_SEGMENT);
        last = placeholder.end();
    }
    push_escaped(&mut regexp, &pattern[last..]);
    regexp.push('$');
    regexp
}

/// Pattern text through the first `/`, empty when there is none.
pub fn resource_name_prefix(pattern: &str) -> &str {
    pattern.find('/').map_or("", |i| &pattern[..=i])
}

fn push_escaped(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
}

fn field_path<'b, 'a: 'b>(links: impl Iterator<Item = &'b Link<'a>>) -> String {
    let mut path = String::new();
    for (i, link) in links.enumerate() {
        if i == 0 {
            path.push_str(&link.message.full_name);
        }
        path.push('.');
        path.push_str(&link.field.name);
    }
    path
}
