use clap::Parser;
use eyre::{Result, WrapErr};
use std::io::Write;

use protoc_gen_netlify_cms::{Cli, logging, read_request, run, write_files};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let input = read_request(cli.request.as_deref())?;
    let response = run(&input)?;

    match &cli.out_dir {
        Some(out_dir) => write_files(&response, out_dir)?,
        None => {
            let bytes = netlify_cms_core::encode_response(&response)?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .wrap_err("Failed to write response to stdout")?;
        }
    }
    Ok(())
}
