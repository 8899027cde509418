//! Request driver: one CMS config file per generated proto file that
//! carries the config option.

use netlify_cms_proto::code_generator_response::{Feature, File};
use netlify_cms_proto::descriptor::v1 as pb;
use netlify_cms_proto::CodeGeneratorResponse;
use prost::Message;
use tracing::{debug, error, info};

use crate::assemble::{assemble, render};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::options::{Annotated, ConfigOption, OptionKey};
use crate::schema::SchemaSet;

pub fn decode_request(bytes: &[u8]) -> Result<pb::CodeGeneratorRequest> {
    Ok(pb::CodeGeneratorRequest::decode(bytes)?)
}

pub fn encode_response(response: &CodeGeneratorResponse) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(response.encoded_len());
    response.encode(&mut buf)?;
    Ok(buf)
}

/// Generates the files for `request`. Errors are returned as is; see
/// [`respond`] for the protocol-level handling.
pub fn generate(request: &pb::CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
    if let Some(version) = &request.compiler_version {
        debug!(
            major = version.major(),
            minor = version.minor(),
            patch = version.patch(),
            "Compiler version"
        );
    }
    let config = GeneratorConfig::from_parameter(request.parameter())?;
    let schema = SchemaSet::from_request(request)?;

    let mut response = empty_response();
    for file in schema.files().iter().filter(|f| f.generate) {
        let Some(cms_config) = file.option::<ConfigOption>() else {
            debug!(file = %file.name, option = ConfigOption::NAME, "Skipping file without option");
            continue;
        };
        let document = assemble(cms_config, &schema, &file.package)?;
        let name = config.output_name(&file.name);
        info!(
            file = %file.name,
            output = %name,
            collections = document.collections.len(),
            "Generated CMS config"
        );
        response.file.push(File {
            name: Some(name),
            content: Some(render(&document)),
            ..Default::default()
        });
    }
    Ok(response)
}

/// Like [`generate`], but reports generation errors through
/// `CodeGeneratorResponse.error` so protoc can show them. Only errors outside
/// the request's control are returned.
pub fn respond(request: &pb::CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
    match generate(request) {
        Ok(response) => Ok(response),
        Err(err) if err.is_generation_error() => {
            error!("Generation failed: {err}");
            Ok(error_response(&err))
        }
        Err(err) => Err(err),
    }
}

pub fn error_response(err: &Error) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(err.to_string()),
        ..empty_response()
    }
}

fn empty_response() -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FileBuilder, MessageBuilder, field, request};
    use netlify_cms_proto::descriptor::v1::field_descriptor_proto::Type;
    use netlify_cms_proto::v1 as cms;

    fn site_file(name: &str) -> pb::FileDescriptorProto {
        FileBuilder::new(name, "site.v1")
            .config(cms::Config::default())
            .message(
                MessageBuilder::new("Post")
                    .collection(cms::Collection {
                        name: "posts".to_string(),
                        ..Default::default()
                    })
                    .field(field("title", Type::String)),
            )
            .build()
    }

    #[test]
    fn skips_files_without_config_or_not_requested() {
        let plain = FileBuilder::new("site/v1/plain.proto", "site.v1").build();
        let unrequested = FileBuilder::new("site/v1/other.proto", "site.v1")
            .config(cms::Config::default())
            .build();
        let req = request(
            vec![site_file("site/v1/site.proto"), plain, unrequested],
            &["site/v1/site.proto", "site/v1/plain.proto"],
            None,
        );
        let response = generate(&req).unwrap();
        assert_eq!(response.error, None);
        assert_eq!(
            response.supported_features,
            Some(Feature::Proto3Optional as u64)
        );
        let names: Vec<_> = response.file.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["site/v1/site.yml"]);
    }

    #[test]
    fn applies_parameter() {
        let req = request(
            vec![site_file("site/v1/site.proto")],
            &["site/v1/site.proto"],
            Some("extension=yaml,paths=flat"),
        );
        let response = generate(&req).unwrap();
        assert_eq!(response.file[0].name(), "site.yaml");
    }

    #[test]
    fn bad_parameter_is_reported_in_response() {
        let req = request(
            vec![site_file("site/v1/site.proto")],
            &["site/v1/site.proto"],
            Some("colour=blue"),
        );
        let response = respond(&req).unwrap();
        assert!(response.file.is_empty());
        assert_eq!(response.error.as_deref(), Some("Unknown parameter 'colour'"));
    }

    #[test]
    fn undecodable_request_is_fatal() {
        assert!(matches!(
            decode_request(&[0xff, 0xff, 0xff]),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn request_round_trips_through_bytes() {
        let req = request(vec![site_file("site/v1/site.proto")], &["site/v1/site.proto"], None);
        let decoded = decode_request(&req.encode_to_vec()).unwrap();
        assert_eq!(decoded, req);

        let bytes = encode_response(&respond(&decoded).unwrap()).unwrap();
        let response = CodeGeneratorResponse::decode(bytes.as_slice()).unwrap();
        assert_eq!(response.file.len(), 1);
    }
}
