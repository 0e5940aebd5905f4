mod convert {
    pub mod cli;
    pub mod handlers;
}
mod validate {
    pub mod cli;
    pub mod handlers;
}
mod utils;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "flatseq";
    pub const BIN_NAME: &str = "flatseq";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Read, validate and convert EMBL, GenBank, AGP and FASTA sequence records.")
        .subcommand_required(true)
        .subcommand(convert::cli::create_convert_cli())
        .subcommand(validate::cli::create_validate_cli())
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // CONVERT
        //
        Some((convert::cli::CONVERT_CMD, matches)) => {
            convert::handlers::run_convert(matches)?;
        }

        //
        // VALIDATE
        //
        Some((validate::cli::VALIDATE_CMD, matches)) => {
            validate::handlers::run_validate(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
