use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get the manifest directory (where Cargo.toml is located)
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    let manifest_path = PathBuf::from(manifest_dir);

    // Navigate to the proto directory from the crate root
    let proto_dir = manifest_path
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.join("proto"))
        .ok_or("Failed to find proto directory")?;

    println!("cargo:rerun-if-changed={}", proto_dir.display());

    let cms_proto = proto_dir.join("netlify/cms/v1/cms.proto");
    let descriptor_proto = proto_dir.join("netlify/cms/descriptor/v1/descriptor.proto");

    // descriptor.proto imports are resolved from the vendored well-known types
    let well_known = protoc_bin_vendored::include_path()?;

    prost_build::Config::new()
        .protoc_executable(protoc_bin_vendored::protoc_bin_path()?)
        .compile_protos(&[cms_proto, descriptor_proto], &[proto_dir, well_known])?;
    Ok(())
}
