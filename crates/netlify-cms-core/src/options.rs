//! Typed lookup of declared options.
//!
//! Each option the generator understands is a zero-sized key type naming the
//! options message it lives on and the value it yields. Schema elements
//! implement [`Annotated`], so a lookup reads as
//! `field.option::<FieldBehaviorOption>()`.

use netlify_cms_proto::descriptor::v1 as pb;
use netlify_cms_proto::v1 as cms;

pub trait OptionKey {
    /// Options message the key is declared on.
    type Target;
    type Value: ?Sized;
    /// Fully-qualified extension name.
    const NAME: &'static str;

    fn get(options: &Self::Target) -> Option<&Self::Value>;
}

pub trait Annotated {
    type Options;

    fn options(&self) -> Option<&Self::Options>;

    fn option<K>(&self) -> Option<&K::Value>
    where
        K: OptionKey<Target = Self::Options>,
    {
        self.options().and_then(K::get)
    }
}

/// `(netlify.cms.v1.config)` on a file.
pub struct ConfigOption;

impl OptionKey for ConfigOption {
    type Target = pb::FileOptions;
    type Value = cms::Config;
    const NAME: &'static str = "netlify.cms.v1.config";

    fn get(options: &pb::FileOptions) -> Option<&cms::Config> {
        options.config.as_ref()
    }
}

/// `(netlify.cms.v1.collection)` on a message.
pub struct CollectionOption;

impl OptionKey for CollectionOption {
    type Target = pb::MessageOptions;
    type Value = cms::Collection;
    const NAME: &'static str = "netlify.cms.v1.collection";

    fn get(options: &pb::MessageOptions) -> Option<&cms::Collection> {
        options.collection.as_ref()
    }
}

/// `(google.api.resource)` on a message.
pub struct ResourceOption;

impl OptionKey for ResourceOption {
    type Target = pb::MessageOptions;
    type Value = pb::ResourceDescriptor;
    const NAME: &'static str = "google.api.resource";

    fn get(options: &pb::MessageOptions) -> Option<&pb::ResourceDescriptor> {
        options.resource.as_ref()
    }
}

/// `(netlify.cms.v1.field)` on a field.
pub struct FieldOption;

impl OptionKey for FieldOption {
    type Target = pb::FieldOptions;
    type Value = cms::Field;
    const NAME: &'static str = "netlify.cms.v1.field";

    fn get(options: &pb::FieldOptions) -> Option<&cms::Field> {
        options.field.as_ref()
    }
}

/// `(google.api.field_behavior)` on a field. Absent when no behavior is listed.
pub struct FieldBehaviorOption;

impl OptionKey for FieldBehaviorOption {
    type Target = pb::FieldOptions;
    type Value = [i32];
    const NAME: &'static str = "google.api.field_behavior";

    fn get(options: &pb::FieldOptions) -> Option<&[i32]> {
        (!options.field_behavior.is_empty()).then_some(options.field_behavior.as_slice())
    }
}
