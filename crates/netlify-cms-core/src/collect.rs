//! Collection discovery.

use tracing::debug;

use crate::conversions::collection_from_proto;
use crate::document::{Collection, Document};
use crate::error::Result;
use crate::infer::FieldInference;
use crate::options::{Annotated, CollectionOption};
use crate::schema::{MessageDef, SchemaSet};

/// Appends a collection to `document` for every top-level message in
/// `package` carrying the collection option. Files and messages are visited
/// in request order.
pub fn collect(document: &mut Document, schema: &SchemaSet, package: &str) -> Result<()> {
    let inference = FieldInference::new(schema);
    for file in schema.files().iter().filter(|f| f.package == package) {
        for message in schema.messages_of(file) {
            if let Some(collection) = collection_for(&inference, message)? {
                debug!(
                    collection = %collection.name,
                    message = %message.full_name,
                    fields = collection.fields.len(),
                    "Collected"
                );
                document.collections.push(collection);
            }
        }
    }
    Ok(())
}

fn collection_for<'a>(
    inference: &FieldInference<'a>,
    message: &'a MessageDef,
) -> Result<Option<Collection>> {
    let Some(option) = message.option::<CollectionOption>() else {
        return Ok(None);
    };
    let mut collection = collection_from_proto(option);

    if collection.description.is_empty() {
        collection.description = message.comments.clone();
    }
    if let Some(owner) = &collection.owner {
        if !collection.description.is_empty() {
            collection.description.push(' ');
        }
        collection.description.push_str(&format!("[{}]", owner.display_name));
    }

    for field in &message.fields {
        if let Some(inferred) = inference.infer(message, field, &[])? {
            collection.fields.push(inferred);
        }
    }
    Ok(Some(collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FileBuilder, MessageBuilder, field, owner};
    use netlify_cms_proto::descriptor::v1::FileDescriptorProto;
    use netlify_cms_proto::descriptor::v1::field_descriptor_proto::Type;
    use netlify_cms_proto::v1 as cms;
    use netlify_cms_proto::v1::widget::WidgetType;

    fn collection(name: &str) -> cms::Collection {
        cms::Collection {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn collected(files: &[FileDescriptorProto], package: &str) -> Document {
        let schema = SchemaSet::from_files(files, &[]).unwrap();
        let mut document = Document::default();
        collect(&mut document, &schema, package).unwrap();
        document
    }

    #[test]
    fn collects_annotated_messages_across_package_files() {
        let first = FileBuilder::new("shop/v1/a.proto", "shop.v1")
            .message(
                MessageBuilder::new("Order")
                    .collection(collection("orders"))
                    .field(field("title", Type::String)),
            )
            .message(MessageBuilder::new("Plain").field(field("title", Type::String)))
            .build();
        let second = FileBuilder::new("shop/v1/b.proto", "shop.v1")
            .message(MessageBuilder::new("Item").collection(collection("items")))
            .build();
        let other = FileBuilder::new("other/v1/c.proto", "other.v1")
            .message(MessageBuilder::new("Foreign").collection(collection("foreign")))
            .build();

        let document = collected(&[first, second, other], "shop.v1");
        let names: Vec<_> = document.collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["orders", "items"]);
        assert_eq!(document.collections[0].fields.len(), 1);
    }

    #[test]
    fn description_falls_back_to_comment_and_gets_owner() {
        let file = FileBuilder::new("a.proto", "a")
            .message(
                MessageBuilder::new("Post")
                    .comment(" Blog posts.\n")
                    .collection(cms::Collection {
                        owner: Some(owner("Editorial", "https://example.com/editorial")),
                        ..collection("posts")
                    }),
            )
            .message(
                MessageBuilder::new("Page")
                    .comment(" Ignored.\n")
                    .collection(cms::Collection {
                        description: "Static pages".to_string(),
                        ..collection("pages")
                    }),
            )
            .message(MessageBuilder::new("Tag").collection(cms::Collection {
                owner: Some(owner("Taxonomy", "https://example.com/taxonomy")),
                ..collection("tags")
            }))
            .build();

        let document = collected(&[file], "a");
        assert_eq!(document.collections[0].description, "Blog posts. [Editorial]");
        assert_eq!(document.collections[1].description, "Static pages");
        assert_eq!(document.collections[2].description, "[Taxonomy]");
    }

    #[test]
    fn declared_fields_come_first() {
        let declared = cms::Field {
            name: "body".to_string(),
            widget: Some(cms::Widget {
                widget_type: Some(WidgetType::TextWidget(cms::TextWidget::default())),
                ..Default::default()
            }),
            ..Default::default()
        };
        let file = FileBuilder::new("a.proto", "a")
            .message(
                MessageBuilder::new("Post")
                    .collection(cms::Collection {
                        fields: vec![declared],
                        ..collection("posts")
                    })
                    .field(field("title", Type::String))
                    .field(field("payload", Type::Bytes)),
            )
            .build();

        let document = collected(&[file], "a");
        let names: Vec<_> = document.collections[0]
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["body", "title"]);
    }
}
