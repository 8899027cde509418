//! Indexed view over the file descriptors of a `CodeGeneratorRequest`.
//!
//! Type references are resolved up front so inference never deals with
//! dangling names, and leading comments are pulled out of `SourceCodeInfo`
//! onto the messages and fields they document.

use std::collections::{HashMap, HashSet};

use netlify_cms_proto::descriptor::v1 as pb;
use pb::field_descriptor_proto::{Label, Type};
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::Annotated;

// Field numbers used in SourceCodeInfo paths.
const FILE_MESSAGE_TYPE: i32 = 4;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED_TYPE: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    /// Fully-qualified enum name, without the leading dot.
    Enum(String),
    /// Fully-qualified message name, without the leading dot.
    Message(String),
}

impl FieldType {
    pub fn is_floating_point(&self) -> bool {
        matches!(self, FieldType::Double | FieldType::Float)
    }

    /// `int32` and `int64` only; the unsigned, zigzag and fixed-width kinds
    /// have no widget.
    pub fn is_integer(&self) -> bool {
        matches!(self, FieldType::Int32 | FieldType::Int64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    List,
    Map,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    /// Trimmed leading comment.
    pub comments: String,
    pub field_type: FieldType,
    pub cardinality: Cardinality,
    options: Option<pb::FieldOptions>,
}

impl FieldDef {
    pub fn is_list(&self) -> bool {
        self.cardinality == Cardinality::List
    }
}

impl Annotated for FieldDef {
    type Options = pb::FieldOptions;

    fn options(&self) -> Option<&pb::FieldOptions> {
        self.options.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct MessageDef {
    /// Fully-qualified name, without the leading dot.
    pub full_name: String,
    pub name: String,
    /// Trimmed leading comment.
    pub comments: String,
    pub fields: Vec<FieldDef>,
    options: Option<pb::MessageOptions>,
}

impl Annotated for MessageDef {
    type Options = pb::MessageOptions;

    fn options(&self) -> Option<&pb::MessageOptions> {
        self.options.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub full_name: String,
    /// Value names in declaration order.
    pub values: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FileDef {
    pub name: String,
    pub package: String,
    /// Listed in `file_to_generate`.
    pub generate: bool,
    messages: Vec<usize>,
    options: Option<pb::FileOptions>,
}

impl Annotated for FileDef {
    type Options = pb::FileOptions;

    fn options(&self) -> Option<&pb::FileOptions> {
        self.options.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    files: Vec<FileDef>,
    messages: Vec<MessageDef>,
    message_index: HashMap<String, usize>,
    enums: HashMap<String, EnumDef>,
}

impl SchemaSet {
    pub fn from_request(request: &pb::CodeGeneratorRequest) -> Result<Self> {
        Self::from_files(&request.proto_file, &request.file_to_generate)
    }

    pub fn from_files(files: &[pb::FileDescriptorProto], file_to_generate: &[String]) -> Result<Self> {
        let mut names = TypeNames::default();
        for file in files {
            names.register_file(file);
        }

        let mut schema = Self::default();
        for file in files {
            let comments = Comments::new(file.source_code_info.as_ref());
            let package = file.package().to_string();
            let mut top_level = Vec::with_capacity(file.message_type.len());
            for (i, message) in file.message_type.iter().enumerate() {
                let path = vec![FILE_MESSAGE_TYPE, i as i32];
                top_level.push(schema.add_message(&package, message, path, &comments, &names)?);
            }
            schema.files.push(FileDef {
                name: file.name().to_string(),
                package,
                generate: file_to_generate.iter().any(|name| name == file.name()),
                messages: top_level,
                options: file.options.clone(),
            });
        }
        schema.enums = names.enums;

        debug!(
            files = schema.files.len(),
            messages = schema.messages.len(),
            enums = schema.enums.len(),
            "Indexed descriptor set"
        );
        Ok(schema)
    }

    pub fn files(&self) -> &[FileDef] {
        &self.files
    }

    /// Top-level messages of `file`, in declaration order.
    pub fn messages_of<'a>(&'a self, file: &'a FileDef) -> impl Iterator<Item = &'a MessageDef> + 'a {
        file.messages.iter().map(|&i| &self.messages[i])
    }

    pub fn message(&self, full_name: &str) -> Option<&MessageDef> {
        self.message_index.get(full_name).map(|&i| &self.messages[i])
    }

    pub fn enum_def(&self, full_name: &str) -> Option<&EnumDef> {
        self.enums.get(full_name)
    }

    fn add_message(
        &mut self,
        scope: &str,
        message: &pb::DescriptorProto,
        path: Vec<i32>,
        comments: &Comments,
        names: &TypeNames,
    ) -> Result<usize> {
        let full_name = qualify(scope, message.name());

        let mut fields = Vec::with_capacity(message.field.len());
        for (i, field) in message.field.iter().enumerate() {
            let mut field_path = path.clone();
            field_path.extend([MESSAGE_FIELD, i as i32]);
            fields.push(FieldDef {
                name: field.name().to_string(),
                comments: comments.leading(&field_path),
                field_type: resolve_type(&full_name, field, names)?,
                cardinality: resolve_cardinality(field, names),
                options: field.options.clone(),
            });
        }

        let index = self.messages.len();
        self.messages.push(MessageDef {
            full_name: full_name.clone(),
            name: message.name().to_string(),
            comments: comments.leading(&path),
            fields,
            options: message.options.clone(),
        });
        self.message_index.insert(full_name.clone(), index);

        for (i, nested) in message.nested_type.iter().enumerate() {
            let mut nested_path = path.clone();
            nested_path.extend([MESSAGE_NESTED_TYPE, i as i32]);
            self.add_message(&full_name, nested, nested_path, comments, names)?;
        }
        Ok(index)
    }
}

/// Names declared anywhere in the request, gathered before fields are resolved.
#[derive(Default)]
struct TypeNames {
    messages: HashSet<String>,
    map_entries: HashSet<String>,
    enums: HashMap<String, EnumDef>,
}

impl TypeNames {
    fn register_file(&mut self, file: &pb::FileDescriptorProto) {
        let package = file.package();
        for message in &file.message_type {
            self.register_message(package, message);
        }
        for enum_type in &file.enum_type {
            self.register_enum(package, enum_type);
        }
    }

    fn register_message(&mut self, scope: &str, message: &pb::DescriptorProto) {
        let full_name = qualify(scope, message.name());
        if message.options.as_ref().is_some_and(|o| o.map_entry()) {
            self.map_entries.insert(full_name.clone());
        }
        for nested in &message.nested_type {
            self.register_message(&full_name, nested);
        }
        for enum_type in &message.enum_type {
            self.register_enum(&full_name, enum_type);
        }
        self.messages.insert(full_name);
    }

    fn register_enum(&mut self, scope: &str, enum_type: &pb::EnumDescriptorProto) {
        let full_name = qualify(scope, enum_type.name());
        let values = enum_type.value.iter().map(|v| v.name().to_string()).collect();
        self.enums.insert(full_name.clone(), EnumDef { full_name, values });
    }
}

/// Leading comments of one file, keyed by SourceCodeInfo path.
struct Comments(HashMap<Vec<i32>, String>);

impl Comments {
    fn new(info: Option<&pb::SourceCodeInfo>) -> Self {
        let map = info
            .into_iter()
            .flat_map(|info| &info.location)
            .filter_map(|location| {
                location
                    .leading_comments
                    .as_ref()
                    .map(|comment| (location.path.clone(), comment.trim().to_string()))
            })
            .collect();
        Self(map)
    }

    fn leading(&self, path: &[i32]) -> String {
        self.0.get(path).cloned().unwrap_or_default()
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

fn resolve_type(
    message_name: &str,
    field: &pb::FieldDescriptorProto,
    names: &TypeNames,
) -> Result<FieldType> {
    let field_type = match field.r#type() {
        Type::Double => FieldType::Double,
        Type::Float => FieldType::Float,
        Type::Int64 => FieldType::Int64,
        Type::Uint64 => FieldType::Uint64,
        Type::Int32 => FieldType::Int32,
        Type::Fixed64 => FieldType::Fixed64,
        Type::Fixed32 => FieldType::Fixed32,
        Type::Bool => FieldType::Bool,
        Type::String => FieldType::String,
        Type::Bytes => FieldType::Bytes,
        Type::Uint32 => FieldType::Uint32,
        Type::Sfixed32 => FieldType::Sfixed32,
        Type::Sfixed64 => FieldType::Sfixed64,
        Type::Sint32 => FieldType::Sint32,
        Type::Sint64 => FieldType::Sint64,
        Type::Enum => {
            let name = referenced_name(field);
            if !names.enums.contains_key(name) {
                return Err(unresolved(message_name, field));
            }
            FieldType::Enum(name.to_string())
        }
        Type::Message | Type::Group => {
            let name = referenced_name(field);
            if !names.messages.contains(name) {
                return Err(unresolved(message_name, field));
            }
            FieldType::Message(name.to_string())
        }
    };
    Ok(field_type)
}

fn resolve_cardinality(field: &pb::FieldDescriptorProto, names: &TypeNames) -> Cardinality {
    if field.label() != Label::Repeated {
        return Cardinality::Single;
    }
    if names.map_entries.contains(referenced_name(field)) {
        Cardinality::Map
    } else {
        Cardinality::List
    }
}

fn referenced_name(field: &pb::FieldDescriptorProto) -> &str {
    field.type_name().trim_start_matches('.')
}

fn unresolved(message_name: &str, field: &pb::FieldDescriptorProto) -> Error {
    Error::UnresolvedType {
        field: format!("{message_name}.{}", field.name()),
        type_name: field.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FileBuilder, MessageBuilder, enum_type, field, map_field};

    #[test]
    fn indexes_nested_messages_and_enums() {
        let file = FileBuilder::new("shop/v1/shop.proto", "shop.v1")
            .message(
                MessageBuilder::new("Shop")
                    .field(field("status", Type::Enum).type_name(".shop.v1.Shop.Status"))
                    .field(field("address", Type::Message).type_name(".shop.v1.Shop.Address"))
                    .nested(MessageBuilder::new("Address").field(field("line", Type::String)))
                    .nested_enum(enum_type("Status", &["STATUS_UNSPECIFIED", "OPEN"])),
            )
            .build();
        let schema = SchemaSet::from_files(&[file], &[]).unwrap();

        let shop = schema.message("shop.v1.Shop").unwrap();
        assert_eq!(
            shop.fields[0].field_type,
            FieldType::Enum("shop.v1.Shop.Status".to_string())
        );
        assert_eq!(
            shop.fields[1].field_type,
            FieldType::Message("shop.v1.Shop.Address".to_string())
        );
        assert!(schema.message("shop.v1.Shop.Address").is_some());
        assert_eq!(
            schema.enum_def("shop.v1.Shop.Status").unwrap().values,
            vec!["STATUS_UNSPECIFIED", "OPEN"]
        );

        // only top-level messages belong to the file listing
        let file = &schema.files()[0];
        let names: Vec<_> = schema.messages_of(file).map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Shop"]);
        assert!(!file.generate);
    }

    #[test]
    fn detects_map_and_list_cardinality() {
        let file = FileBuilder::new("a.proto", "a")
            .message(
                MessageBuilder::new("Holder")
                    .field(field("tags", Type::String).repeated())
                    .field(map_field("labels", ".a.Holder.LabelsEntry"))
                    .nested(
                        MessageBuilder::new("LabelsEntry")
                            .field(field("key", Type::String))
                            .field(field("value", Type::String))
                            .map_entry(),
                    ),
            )
            .build();
        let schema = SchemaSet::from_files(&[file], &["a.proto".to_string()]).unwrap();
        let holder = schema.message("a.Holder").unwrap();
        assert_eq!(holder.fields[0].cardinality, Cardinality::List);
        assert_eq!(holder.fields[1].cardinality, Cardinality::Map);
        assert!(schema.files()[0].generate);
    }

    #[test]
    fn reads_leading_comments() {
        let file = FileBuilder::new("a.proto", "a")
            .message(
                MessageBuilder::new("Thing")
                    .comment(" A thing.\n")
                    .field(field("title", Type::String).comment(" The title.\n")),
            )
            .build();
        let schema = SchemaSet::from_files(&[file], &[]).unwrap();
        let thing = schema.message("a.Thing").unwrap();
        assert_eq!(thing.comments, "A thing.");
        assert_eq!(thing.fields[0].comments, "The title.");
    }

    #[test]
    fn unresolved_type_is_an_error() {
        let file = FileBuilder::new("a.proto", "a")
            .message(
                MessageBuilder::new("Thing")
                    .field(field("other", Type::Message).type_name(".b.Missing")),
            )
            .build();
        let err = SchemaSet::from_files(&[file], &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedType { field, type_name }
                if field == "a.Thing.other" && type_name == ".b.Missing"
        ));
    }
}
