//! Netlify CMS config generation from annotated protobuf schemas.
//!
//! The pipeline runs per generated file: [`schema`] indexes the request,
//! [`infer`] turns fields into widgets, [`collect`] gathers collections,
//! and [`assemble`] renders the document through [`writer`].

pub mod assemble;
pub mod collect;
pub mod config;
pub mod conversions;
pub mod document;
pub mod error;
pub mod generator;
pub mod infer;
pub mod options;
pub mod schema;
pub mod writer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, Result};
pub use generator::{decode_request, encode_response, generate, respond};
