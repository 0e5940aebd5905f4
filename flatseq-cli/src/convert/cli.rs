use clap::{Arg, ArgAction, Command, arg};

pub const CONVERT_CMD: &str = "convert";

pub fn create_convert_cli() -> Command {
    Command::new(CONVERT_CMD)
        .about("Convert EMBL, GenBank, AGP or FASTA records to EMBL, GenBank, XML or GFF3.")
        .arg(Arg::new("inputs").required(true).num_args(1..))
        .arg(arg!(--to <format> "Output format: embl, genbank, xml or gff3"))
        .arg(arg!(--from <format> "Input format: embl, genbank, agp or fasta (default: by extension)"))
        .arg(arg!(--outdir <dir> "Write one converted file per input into this directory"))
        .arg(arg!(--config <file> "TOML conversion config"))
        .arg(arg!(--sort "Write features in position order, source first").action(ArgAction::SetTrue))
}
