//! Document assembly and rendering.
//!
//! [`assemble`] merges the file-level settings with the collections found in
//! the package; [`render`] writes the result as the CMS `config.yml`.

use crate::collect::collect;
use crate::conversions::document_from_config;
use crate::document::{
    Backend, Collection, Document, Field, PublishMode, Slug, WidgetKind,
};
use crate::error::Result;
use crate::schema::SchemaSet;
use crate::writer::{YamlWriter, quote};
use netlify_cms_proto::v1 as cms;

pub const FILE_HEADER: &str = "# Generated by protoc-gen-netlify-cms. DO NOT EDIT.";

/// Document for a file whose config option is `config`: declared collections
/// first, then the collections discovered in `package`.
pub fn assemble(config: &cms::Config, schema: &SchemaSet, package: &str) -> Result<Document> {
    let mut document = document_from_config(config);
    collect(&mut document, schema, package)?;
    Ok(document)
}

pub fn render(document: &Document) -> String {
    let mut w = YamlWriter::new();
    w.line(&[FILE_HEADER]);
    write_backend(&mut w, &document.backend);
    w.blank();
    write_slug(&mut w, &document.slug);

    if document.publish_mode == PublishMode::EditorialWorkflow {
        w.blank();
        w.line(&["publish_mode: editorial_workflow"]);
    }
    if !document.media_folder.is_empty() {
        w.blank();
        w.string("media_folder", &document.media_folder);
    }
    if !document.logo_url.is_empty() {
        w.blank();
        w.string("logo_url", &document.logo_url);
    }

    w.blank();
    w.line(&["collections:"]);
    w.indented(|w| {
        for collection in &document.collections {
            write_collection(w, collection);
        }
    });
    w.finish()
}

fn write_backend(w: &mut YamlWriter, backend: &Backend) {
    w.line(&["backend:"]);
    w.indented(|w| {
        w.non_empty("name", &backend.name);
        w.non_empty("repo", &backend.repo);
        w.non_empty("branch", &backend.branch);
        if backend.squash_merges {
            w.boolean("squash_merges", true);
        }
        w.non_empty("base_url", &backend.base_url);
        w.non_empty("site_domain", &backend.site_domain);
        if let Some(messages) = &backend.commit_messages {
            w.line(&["commit_messages:"]);
            w.indented(|w| {
                w.non_empty("create", &messages.create);
                w.non_empty("update", &messages.update);
                w.non_empty("delete", &messages.delete);
                w.non_empty("uploadMedia", &messages.upload_media);
                w.non_empty("deleteMedia", &messages.delete_media);
            });
        }
    });
}

fn write_slug(w: &mut YamlWriter, slug: &Slug) {
    w.line(&["slug:"]);
    w.indented(|w| {
        w.string("encoding", &slug.encoding.to_string());
        w.boolean("clean_accents", slug.clean_accents);
        w.non_empty("sanitize_replacement", &slug.sanitize_replacement);
    });
}

fn write_collection(w: &mut YamlWriter, collection: &Collection) {
    w.blank();
    w.line(&["- name: ", &quote(&collection.name)]);
    w.indented(|w| {
        w.non_empty("label", &collection.label);
        w.non_empty("label_singular", &collection.label_singular);
        w.non_empty("folder", &collection.folder);
        w.boolean("create", collection.create);
        w.non_empty("identifier_field", &collection.identifier_field);
        w.non_empty("format", &collection.format);
        w.non_empty("description", &collection.description);
        w.non_empty("summary", &collection.summary);
        w.line(&["editor:"]);
        w.indented(|w| w.boolean("preview", collection.editor_preview));
        write_fields(w, &collection.fields);
    });
}

fn write_fields(w: &mut YamlWriter, fields: &[Field]) {
    w.line(&["fields:"]);
    w.indented(|w| {
        for field in fields {
            write_field(w, field);
        }
    });
}

fn write_field(w: &mut YamlWriter, field: &Field) {
    let widget = &field.widget;
    w.blank();
    w.line(&["- name: ", &quote(&field.name)]);
    w.indented(|w| {
        w.non_empty("label", &field.label);
        w.non_empty("comment", &field.comment);
        w.boolean("required", widget.required);
        if !widget.hint.is_empty() {
            w.string("hint", widget.hint.trim());
        }
        if let Some(pattern) = &widget.pattern {
            w.line(&["pattern:"]);
            w.indented(|w| {
                w.item(&pattern.regexp);
                w.item(&pattern.error_message);
            });
        }
        w.string("widget", widget.kind.name());
        write_widget_settings(w, &widget.kind);
    });
}

fn write_widget_settings(w: &mut YamlWriter, kind: &WidgetKind) {
    match kind {
        WidgetKind::String { default } | WidgetKind::Text { default } => {
            w.string("default", default);
        }
        WidgetKind::Boolean => {}
        WidgetKind::Select { options, default } => {
            if let Some(default) = default {
                w.string("default", default);
            }
            w.line(&["options:"]);
            w.indented(|w| {
                for option in options {
                    w.line(&["- label: ", &quote(&option.label)]);
                    w.indented(|w| w.string("value", &option.value));
                }
            });
        }
        WidgetKind::DateTime {
            date_format,
            time_format,
        } => {
            w.non_empty("date_format", date_format);
            w.non_empty("time_format", time_format);
        }
        WidgetKind::Object(object) => {
            w.boolean("collapsed", object.collapsed);
            w.non_empty("summary", &object.summary);
            write_fields(w, &object.fields);
        }
        WidgetKind::List(list) => {
            if !list.allow_add {
                w.boolean("allow_add", false);
            }
            w.boolean("collapsed", list.collapsed);
            w.boolean("minimize_collapsed", list.minimize_collapsed);
            w.non_empty("summary", &list.summary);
            if !list.fields.is_empty() {
                write_fields(w, &list.fields);
            }
        }
        WidgetKind::Number(value_type) => {
            w.string("value_type", &value_type.to_string());
        }
        WidgetKind::Relation(relation) => {
            w.string("collection", &relation.collection);
            w.string("value_field", &relation.value_field);
            w.line(&["search_fields:"]);
            w.indented(|w| {
                for name in &relation.search_fields {
                    w.item(name);
                }
            });
            if !relation.display_fields.is_empty() {
                w.line(&["display_fields:"]);
                w.indented(|w| {
                    for name in &relation.display_fields {
                        w.item(name);
                    }
                });
            }
            w.boolean("multiple", relation.multiple);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        CommitMessages, ListWidget, NumberKind, ObjectWidget, Owner, Pattern, RelationWidget,
        SelectOption, SlugEncoding, Widget,
    };

    fn field(name: &str, kind: WidgetKind) -> Field {
        Field {
            name: name.to_string(),
            label: String::new(),
            comment: String::new(),
            widget: Widget::new(kind),
        }
    }

    fn render_fields(fields: Vec<Field>) -> String {
        let document = Document {
            collections: vec![Collection {
                name: "c".to_string(),
                fields,
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = render(&document);
        let start = out.find("    fields:\n").unwrap() + "    fields:\n".len();
        out[start..].to_string()
    }

    #[test]
    fn renders_minimal_document() {
        assert_eq!(
            render(&Document::default()),
            "# Generated by protoc-gen-netlify-cms. DO NOT EDIT.\n\
             backend:\n\
             \n\
             slug:\n  encoding: \"unicode\"\n  clean_accents: false\n\
             \n\
             collections:\n"
        );
    }

    #[test]
    fn renders_settings_blocks() {
        let document = Document {
            backend: Backend {
                name: "github".to_string(),
                repo: "acme/site".to_string(),
                branch: "main".to_string(),
                squash_merges: true,
                commit_messages: Some(CommitMessages {
                    create: "Create {{slug}}".to_string(),
                    upload_media: "Upload {{path}}".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            slug: Slug {
                encoding: SlugEncoding::Ascii,
                clean_accents: true,
                sanitize_replacement: "_".to_string(),
            },
            publish_mode: PublishMode::EditorialWorkflow,
            media_folder: "static/img".to_string(),
            logo_url: String::new(),
            collections: Vec::new(),
        };
        assert_eq!(
            render(&document),
            r#"# Generated by protoc-gen-netlify-cms. DO NOT EDIT.
backend:
  name: "github"
  repo: "acme/site"
  branch: "main"
  squash_merges: true
  commit_messages:
    create: "Create {{slug}}"
    uploadMedia: "Upload {{path}}"

slug:
  encoding: "ascii"
  clean_accents: true
  sanitize_replacement: "_"

publish_mode: editorial_workflow

media_folder: "static/img"

collections:
"#
        );
    }

    #[test]
    fn renders_collection_header() {
        let document = Document {
            collections: vec![Collection {
                name: "posts".to_string(),
                label: "Posts".to_string(),
                folder: "content/posts".to_string(),
                create: true,
                description: "Blog posts.".to_string(),
                editor_preview: true,
                owner: Some(Owner::default()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = render(&document);
        assert!(out.ends_with(
            r#"collections:

  - name: "posts"
    label: "Posts"
    folder: "content/posts"
    create: true
    description: "Blog posts."
    editor:
      preview: true
    fields:
"#
        ));
    }

    #[test]
    fn renders_field_common_keys() {
        let mut title = field(
            "name",
            WidgetKind::String {
                default: "merchants/".to_string(),
            },
        );
        title.label = "RESOURCE NAME".to_string();
        title.widget.required = true;
        title.widget.hint = " **[[A]](https://a)**".to_string();
        title.widget.pattern = Some(Pattern {
            regexp: "^a$".to_string(),
            error_message: "Must match ^a$".to_string(),
        });
        assert_eq!(
            render_fields(vec![title]),
            r#"
      - name: "name"
        label: "RESOURCE NAME"
        required: true
        hint: "**[[A]](https://a)**"
        pattern:
          - "^a$"
          - "Must match ^a$"
        widget: "string"
        default: "merchants/"
"#
        );
    }

    #[test]
    fn renders_select_options() {
        let options = vec![
            SelectOption {
                label: "DARK RED".to_string(),
                value: "DARK_RED".to_string(),
            },
            SelectOption {
                label: "BLUE".to_string(),
                value: "BLUE".to_string(),
            },
        ];
        assert_eq!(
            render_fields(vec![field(
                "color",
                WidgetKind::Select {
                    options,
                    default: Some("BLUE".to_string()),
                }
            )]),
            r#"
      - name: "color"
        required: false
        widget: "select"
        default: "BLUE"
        options:
          - label: "DARK RED"
            value: "DARK_RED"
          - label: "BLUE"
            value: "BLUE"
"#
        );
    }

    #[test]
    fn renders_nested_object_and_list() {
        let object = field(
            "details",
            WidgetKind::Object(ObjectWidget {
                collapsed: true,
                summary: String::new(),
                fields: vec![field("count", WidgetKind::Number(NumberKind::Int))],
            }),
        );
        let tags = field(
            "tags",
            WidgetKind::List(ListWidget {
                allow_add: true,
                ..Default::default()
            }),
        );
        let locked = field(
            "locked",
            WidgetKind::List(ListWidget {
                allow_add: false,
                collapsed: true,
                minimize_collapsed: true,
                summary: "{{fields.title}}".to_string(),
                fields: vec![field("on", WidgetKind::Boolean)],
            }),
        );
        assert_eq!(
            render_fields(vec![object, tags, locked]),
            r#"
      - name: "details"
        required: false
        widget: "object"
        collapsed: true
        fields:

          - name: "count"
            required: false
            widget: "number"
            value_type: "int"

      - name: "tags"
        required: false
        widget: "list"
        collapsed: false
        minimize_collapsed: false

      - name: "locked"
        required: false
        widget: "list"
        allow_add: false
        collapsed: true
        minimize_collapsed: true
        summary: "{{fields.title}}"
        fields:

          - name: "on"
            required: false
            widget: "boolean"
"#
        );
    }

    #[test]
    fn renders_datetime_and_relation() {
        let when = field(
            "when",
            WidgetKind::DateTime {
                date_format: "YYYY-MM-DD".to_string(),
                time_format: String::new(),
            },
        );
        let author = field(
            "author",
            WidgetKind::Relation(RelationWidget {
                collection: "authors".to_string(),
                value_field: "name".to_string(),
                search_fields: vec!["name".to_string(), "email".to_string()],
                display_fields: Vec::new(),
                multiple: false,
            }),
        );
        assert_eq!(
            render_fields(vec![when, author]),
            r#"
      - name: "when"
        required: false
        widget: "datetime"
        date_format: "YYYY-MM-DD"

      - name: "author"
        required: false
        widget: "relation"
        collection: "authors"
        value_field: "name"
        search_fields:
          - "name"
          - "email"
        multiple: false
"#
        );
    }
}
