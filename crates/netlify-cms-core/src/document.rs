//! The CMS configuration tree.
//!
//! Built once per generated file and rendered by [`crate::assemble`].

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub backend: Backend,
    pub slug: Slug,
    pub publish_mode: PublishMode,
    pub media_folder: String,
    pub logo_url: String,
    pub collections: Vec<Collection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Backend {
    pub name: String,
    pub repo: String,
    pub branch: String,
    pub squash_merges: bool,
    pub base_url: String,
    pub site_domain: String,
    pub commit_messages: Option<CommitMessages>,
}

/// Commit message templates. Empty templates are left to the CMS default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitMessages {
    pub create: String,
    pub update: String,
    pub delete: String,
    pub upload_media: String,
    pub delete_media: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slug {
    pub encoding: SlugEncoding,
    pub clean_accents: bool,
    pub sanitize_replacement: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SlugEncoding {
    #[default]
    Unicode,
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishMode {
    #[default]
    Simple,
    EditorialWorkflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Owner {
    pub display_name: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Collection {
    pub name: String,
    pub label: String,
    pub label_singular: String,
    pub folder: String,
    pub create: bool,
    pub identifier_field: String,
    pub format: String,
    pub description: String,
    pub summary: String,
    pub editor_preview: bool,
    pub owner: Option<Owner>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub comment: String,
    pub widget: Widget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub required: bool,
    pub hint: String,
    pub pattern: Option<Pattern>,
    pub kind: WidgetKind,
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            required: false,
            hint: String::new(),
            pattern: None,
            kind,
        }
    }
}

/// Validation applied by the CMS editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub regexp: String,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    String {
        default: String,
    },
    Text {
        default: String,
    },
    Boolean,
    Select {
        options: Vec<SelectOption>,
        default: Option<String>,
    },
    DateTime {
        date_format: String,
        time_format: String,
    },
    Object(ObjectWidget),
    List(ListWidget),
    Number(NumberKind),
    Relation(RelationWidget),
}

impl WidgetKind {
    /// Name of the widget in the CMS config.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::String { .. } => "string",
            WidgetKind::Text { .. } => "text",
            WidgetKind::Boolean => "boolean",
            WidgetKind::Select { .. } => "select",
            WidgetKind::DateTime { .. } => "datetime",
            WidgetKind::Object(_) => "object",
            WidgetKind::List(_) => "list",
            WidgetKind::Number(_) => "number",
            WidgetKind::Relation(_) => "relation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectWidget {
    pub collapsed: bool,
    pub summary: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListWidget {
    pub allow_add: bool,
    pub collapsed: bool,
    pub minimize_collapsed: bool,
    pub summary: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NumberKind {
    Int,
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationWidget {
    pub collection: String,
    pub value_field: String,
    pub search_fields: Vec<String>,
    pub display_fields: Vec<String>,
    pub multiple: bool,
}
