use clap::Parser;
use std::path::PathBuf;

pub const LOG_ENV: &str = "PROTOC_GEN_NETLIFY_CMS_LOG";

/// protoc plugin that generates Netlify CMS configuration from annotated
/// protobuf schemas.
///
/// protoc runs the plugin without arguments, writing a CodeGeneratorRequest
/// to stdin and reading the CodeGeneratorResponse from stdout. The flags are
/// for running it by hand against a saved request.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Read the serialized CodeGeneratorRequest from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Write the generated files into a directory instead of replying on stdout
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Log filter directive, e.g. 'debug' or 'netlify_cms_core=trace'. Logs go to stderr.
    #[arg(long, env = LOG_ENV, default_value = "warn")]
    pub log_level: String,
}
