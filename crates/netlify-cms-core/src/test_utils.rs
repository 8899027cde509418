//! Descriptor builders for tests.
//!
//! Builders keep comments next to the element they document and lay out
//! `SourceCodeInfo` paths when the file is built.

use netlify_cms_proto::descriptor::v1 as pb;
use netlify_cms_proto::v1 as cms;
use pb::field_descriptor_proto::{Label, Type};
use pb::source_code_info::Location;

const FILE_MESSAGE_TYPE: i32 = 4;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED_TYPE: i32 = 3;

pub struct FileBuilder {
    file: pb::FileDescriptorProto,
    messages: Vec<MessageBuilder>,
}

impl FileBuilder {
    pub fn new(name: &str, package: &str) -> Self {
        Self {
            file: pb::FileDescriptorProto {
                name: Some(name.to_string()),
                package: Some(package.to_string()),
                syntax: Some("proto3".to_string()),
                ..Default::default()
            },
            messages: Vec::new(),
        }
    }

    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message);
        self
    }

    pub fn enum_type(mut self, enum_type: pb::EnumDescriptorProto) -> Self {
        self.file.enum_type.push(enum_type);
        self
    }

    pub fn dependency(mut self, name: &str) -> Self {
        self.file.dependency.push(name.to_string());
        self
    }

    pub fn config(mut self, config: cms::Config) -> Self {
        self.file
            .options
            .get_or_insert_with(Default::default)
            .config = Some(config);
        self
    }

    pub fn build(mut self) -> pb::FileDescriptorProto {
        let mut locations = Vec::new();
        for (i, message) in self.messages.into_iter().enumerate() {
            let path = vec![FILE_MESSAGE_TYPE, i as i32];
            self.file
                .message_type
                .push(message.build_at(path, &mut locations));
        }
        if !locations.is_empty() {
            self.file.source_code_info = Some(pb::SourceCodeInfo { location: locations });
        }
        self.file
    }
}

pub struct MessageBuilder {
    message: pb::DescriptorProto,
    comment: Option<String>,
    fields: Vec<FieldBuilder>,
    nested: Vec<MessageBuilder>,
}

impl MessageBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            message: pb::DescriptorProto {
                name: Some(name.to_string()),
                ..Default::default()
            },
            comment: None,
            fields: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn nested(mut self, message: MessageBuilder) -> Self {
        self.nested.push(message);
        self
    }

    pub fn nested_enum(mut self, enum_type: pb::EnumDescriptorProto) -> Self {
        self.message.enum_type.push(enum_type);
        self
    }

    pub fn map_entry(mut self) -> Self {
        self.options().map_entry = Some(true);
        self
    }

    pub fn collection(mut self, collection: cms::Collection) -> Self {
        self.options().collection = Some(collection);
        self
    }

    pub fn resource(mut self, patterns: &[&str]) -> Self {
        self.options().resource = Some(pb::ResourceDescriptor {
            r#type: None,
            pattern: patterns.iter().map(ToString::to_string).collect(),
        });
        self
    }

    fn options(&mut self) -> &mut pb::MessageOptions {
        self.message.options.get_or_insert_with(Default::default)
    }

    fn build_at(self, path: Vec<i32>, locations: &mut Vec<Location>) -> pb::DescriptorProto {
        let mut message = self.message;
        if let Some(comment) = self.comment {
            locations.push(location(path.clone(), comment));
        }
        for (i, field) in self.fields.into_iter().enumerate() {
            if let Some(comment) = field.comment {
                let mut field_path = path.clone();
                field_path.extend([MESSAGE_FIELD, i as i32]);
                locations.push(location(field_path, comment));
            }
            let mut proto = field.field;
            proto.number = Some(i as i32 + 1);
            message.field.push(proto);
        }
        for (i, nested) in self.nested.into_iter().enumerate() {
            let mut nested_path = path.clone();
            nested_path.extend([MESSAGE_NESTED_TYPE, i as i32]);
            message.nested_type.push(nested.build_at(nested_path, locations));
        }
        message
    }
}

pub struct FieldBuilder {
    field: pb::FieldDescriptorProto,
    comment: Option<String>,
}

impl FieldBuilder {
    /// Fully-qualified reference, with the leading dot.
    pub fn type_name(mut self, type_name: &str) -> Self {
        self.field.type_name = Some(type_name.to_string());
        self
    }

    pub fn repeated(mut self) -> Self {
        self.field.label = Some(Label::Repeated as i32);
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn behavior(mut self, behavior: pb::FieldBehavior) -> Self {
        self.options().field_behavior.push(behavior as i32);
        self
    }

    pub fn annotation(mut self, field: cms::Field) -> Self {
        self.options().field = Some(field);
        self
    }

    fn options(&mut self) -> &mut pb::FieldOptions {
        self.field.options.get_or_insert_with(Default::default)
    }
}

pub fn field(name: &str, field_type: Type) -> FieldBuilder {
    FieldBuilder {
        field: pb::FieldDescriptorProto {
            name: Some(name.to_string()),
            label: Some(Label::Optional as i32),
            r#type: Some(field_type as i32),
            ..Default::default()
        },
        comment: None,
    }
}

/// Map field referring to the nested `*Entry` message `entry`.
pub fn map_field(name: &str, entry: &str) -> FieldBuilder {
    field(name, Type::Message).type_name(entry).repeated()
}

pub fn enum_type(name: &str, values: &[&str]) -> pb::EnumDescriptorProto {
    pb::EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .enumerate()
            .map(|(i, value)| pb::EnumValueDescriptorProto {
                name: Some(value.to_string()),
                number: Some(i as i32),
            })
            .collect(),
    }
}

pub fn owner(display_name: &str, uri: &str) -> cms::Owner {
    cms::Owner {
        display_name: display_name.to_string(),
        uri: uri.to_string(),
    }
}

/// `google/protobuf/timestamp.proto` as protoc passes it along.
pub fn timestamp_file() -> pb::FileDescriptorProto {
    FileBuilder::new("google/protobuf/timestamp.proto", "google.protobuf")
        .message(
            MessageBuilder::new("Timestamp")
                .field(field("seconds", Type::Int64))
                .field(field("nanos", Type::Int32)),
        )
        .build()
}

pub fn request(
    files: Vec<pb::FileDescriptorProto>,
    file_to_generate: &[&str],
    parameter: Option<&str>,
) -> pb::CodeGeneratorRequest {
    pb::CodeGeneratorRequest {
        file_to_generate: file_to_generate.iter().map(ToString::to_string).collect(),
        parameter: parameter.map(ToString::to_string),
        proto_file: files,
        compiler_version: Some(pb::Version {
            major: Some(3),
            minor: Some(21),
            patch: Some(12),
            suffix: Some(String::new()),
        }),
    }
}

fn location(path: Vec<i32>, comment: String) -> Location {
    Location {
        path,
        span: Vec::new(),
        leading_comments: Some(comment),
        trailing_comments: None,
    }
}
