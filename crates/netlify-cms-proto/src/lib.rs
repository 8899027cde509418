//! Generated protobuf types.
//!
//! [`v1`] holds the option messages schema authors attach to their files,
//! messages and fields. [`descriptor::v1`] mirrors the descriptor and plugin
//! protocol messages with those options declared as regular fields, which is
//! what lets a plain prost decode of a `CodeGeneratorRequest` keep them.

pub mod v1 {
    include!(concat!(env!("OUT_DIR"), "/netlify.cms.v1.rs"));
}

pub mod descriptor {
    pub mod v1 {
        include!(concat!(env!("OUT_DIR"), "/netlify.cms.descriptor.v1.rs"));
    }
}

pub use prost_types::compiler::{CodeGeneratorResponse, code_generator_response};
