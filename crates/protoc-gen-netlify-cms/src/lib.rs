pub mod cli;
pub mod logging;

pub use cli::Cli;

use eyre::{Result, WrapErr, bail};
use netlify_cms_proto::CodeGeneratorResponse;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Reads the serialized request from `path`, or stdin when absent.
pub fn read_request(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).wrap_err_with(|| format!("Failed to read request {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .wrap_err("Failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

/// Decodes `input` and produces the response. Generation errors end up in
/// the response; decode errors are returned.
pub fn run(input: &[u8]) -> Result<CodeGeneratorResponse> {
    let request = netlify_cms_core::decode_request(input)?;
    Ok(netlify_cms_core::respond(&request)?)
}

/// Writes every generated file below `out_dir`, the way protoc would.
pub fn write_files(response: &CodeGeneratorResponse, out_dir: &Path) -> Result<()> {
    if let Some(error) = &response.error {
        bail!("{error}");
    }
    for file in &response.file {
        let path = out_dir.join(file.name());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, file.content())
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote file");
    }
    Ok(())
}
