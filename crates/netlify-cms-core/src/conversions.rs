//! Conversions from the option messages to the document tree.
//!
//! All conversions borrow the option value and build fresh document values,
//! so the descriptor set is never modified by generation.

use netlify_cms_proto::v1 as cms;
use netlify_cms_proto::v1::config::PublishMode as ProtoPublishMode;
use netlify_cms_proto::v1::config::slug::Encoding;
use netlify_cms_proto::v1::number_widget::ValueType;
use netlify_cms_proto::v1::widget::WidgetType;
use tracing::warn;

use crate::document::{
    Backend, Collection, CommitMessages, Document, Field, ListWidget, NumberKind, ObjectWidget,
    Owner, Pattern, PublishMode, RelationWidget, SelectOption, Slug, SlugEncoding, Widget,
    WidgetKind,
};

/// Document settings from the file-level option, with its declared collections.
pub fn document_from_config(config: &cms::Config) -> Document {
    Document {
        backend: config.backend.as_ref().map(backend_from_proto).unwrap_or_default(),
        slug: config.slug.as_ref().map(slug_from_proto).unwrap_or_default(),
        publish_mode: match config.publish_mode() {
            ProtoPublishMode::EditorialWorkflow => PublishMode::EditorialWorkflow,
            ProtoPublishMode::Unspecified => PublishMode::Simple,
        },
        media_folder: config.media_folder.clone(),
        logo_url: config.logo_url.clone(),
        collections: config.collections.iter().map(collection_from_proto).collect(),
    }
}

fn backend_from_proto(backend: &cms::config::Backend) -> Backend {
    Backend {
        name: backend.name.clone(),
        repo: backend.repo.clone(),
        branch: backend.branch.clone(),
        squash_merges: backend.squash_merges,
        base_url: backend.base_url.clone(),
        site_domain: backend.site_domain.clone(),
        commit_messages: backend.commit_messages.as_ref().map(|m| CommitMessages {
            create: m.create.clone(),
            update: m.update.clone(),
            delete: m.delete.clone(),
            upload_media: m.upload_media.clone(),
            delete_media: m.delete_media.clone(),
        }),
    }
}

fn slug_from_proto(slug: &cms::config::Slug) -> Slug {
    Slug {
        encoding: match slug.encoding() {
            Encoding::Ascii => SlugEncoding::Ascii,
            Encoding::Unicode | Encoding::Unspecified => SlugEncoding::Unicode,
        },
        clean_accents: slug.clean_accents,
        sanitize_replacement: slug.sanitize_replacement.clone(),
    }
}

pub fn owner_from_proto(owner: &cms::Owner) -> Owner {
    Owner {
        display_name: owner.display_name.clone(),
        uri: owner.uri.clone(),
    }
}

/// Collection settings and declared fields. The description is taken as
/// declared; filling it from comments is up to the collector.
pub fn collection_from_proto(collection: &cms::Collection) -> Collection {
    Collection {
        name: collection.name.clone(),
        label: collection.label.clone(),
        label_singular: collection.label_singular.clone(),
        folder: collection.folder.clone(),
        create: collection.create,
        identifier_field: collection.identifier_field.clone(),
        format: collection.format.clone(),
        description: collection.description.clone(),
        summary: collection.summary.clone(),
        editor_preview: collection.editor.as_ref().is_some_and(|e| e.preview),
        owner: collection.owner.as_ref().map(owner_from_proto),
        fields: declared_fields(&collection.fields),
    }
}

/// Fields spelled out in full inside an option. Entries that are ignored or
/// lack a widget cannot be rendered and are skipped.
pub fn declared_fields(fields: &[cms::Field]) -> Vec<Field> {
    fields.iter().filter_map(declared_field).collect()
}

fn declared_field(field: &cms::Field) -> Option<Field> {
    if field.ignore {
        return None;
    }
    let Some(widget) = field.widget.as_ref() else {
        warn!(field = %field.name, "Skipping declared field without a widget");
        return None;
    };
    let Some(widget_type) = widget.widget_type.as_ref() else {
        warn!(field = %field.name, "Skipping declared field without a widget type");
        return None;
    };
    Some(Field {
        name: field.name.clone(),
        label: field.label.clone(),
        comment: field.comment.clone(),
        widget: Widget {
            required: widget.required.unwrap_or(false),
            hint: widget.hint.clone(),
            pattern: widget.pattern.as_ref().map(pattern_from_proto),
            kind: widget_kind_from_proto(widget_type),
        },
    })
}

fn pattern_from_proto(pattern: &cms::widget::Pattern) -> Pattern {
    Pattern {
        regexp: pattern.regexp.clone(),
        error_message: pattern.error_message.clone(),
    }
}

pub fn widget_kind_from_proto(widget_type: &WidgetType) -> WidgetKind {
    match widget_type {
        WidgetType::StringWidget(w) => WidgetKind::String {
            default: w.default_value.clone(),
        },
        WidgetType::TextWidget(w) => WidgetKind::Text {
            default: w.default_value.clone(),
        },
        WidgetType::BooleanWidget(_) => WidgetKind::Boolean,
        WidgetType::SelectWidget(w) => WidgetKind::Select {
            options: w
                .options
                .iter()
                .map(|o| SelectOption {
                    label: o.label.clone(),
                    value: o.value.clone(),
                })
                .collect(),
            default: match w.default_value.as_slice() {
                [single] => Some(single.clone()),
                _ => None,
            },
        },
        WidgetType::DateTimeWidget(w) => WidgetKind::DateTime {
            date_format: w.date_format.clone(),
            time_format: w.time_format.clone(),
        },
        WidgetType::ObjectWidget(w) => WidgetKind::Object(ObjectWidget {
            collapsed: w.collapsed,
            summary: w.summary.clone(),
            fields: declared_fields(&w.fields),
        }),
        WidgetType::ListWidget(w) => WidgetKind::List(ListWidget {
            allow_add: w.allow_add,
            collapsed: w.collapsed,
            minimize_collapsed: w.minimize_collapsed,
            summary: w.summary.clone(),
            fields: declared_fields(&w.fields),
        }),
        WidgetType::NumberWidget(w) => WidgetKind::Number(match w.value_type() {
            ValueType::Float => NumberKind::Float,
            ValueType::Int | ValueType::Unspecified => NumberKind::Int,
        }),
        WidgetType::RelationWidget(w) => WidgetKind::Relation(RelationWidget {
            collection: w.collection.clone(),
            value_field: w.value_field.clone(),
            search_fields: w.search_fields.clone(),
            display_fields: w.display_fields.clone(),
            multiple: w.multiple,
        }),
    }
}

/// The parts of a field annotation that are merged over an inferred field.
/// Empty strings leave the inferred value in place.
#[derive(Debug, Clone, Default)]
pub struct FieldOverride {
    pub ignore: bool,
    pub name: String,
    pub label: String,
    pub comment: String,
    pub hint: String,
    pub required: Option<bool>,
    pub pattern: Option<Pattern>,
    pub kind: Option<WidgetKind>,
}

impl From<&cms::Field> for FieldOverride {
    fn from(field: &cms::Field) -> Self {
        let widget = field.widget.as_ref();
        Self {
            ignore: field.ignore,
            name: field.name.clone(),
            label: field.label.clone(),
            comment: field.comment.clone(),
            hint: widget.map(|w| w.hint.clone()).unwrap_or_default(),
            required: widget.and_then(|w| w.required),
            pattern: widget.and_then(|w| w.pattern.as_ref()).map(pattern_from_proto),
            kind: widget
                .and_then(|w| w.widget_type.as_ref())
                .map(widget_kind_from_proto),
        }
    }
}
