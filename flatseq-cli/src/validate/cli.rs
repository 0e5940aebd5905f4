use clap::{Arg, ArgAction, Command, arg};

pub const VALIDATE_CMD: &str = "validate";

pub fn create_validate_cli() -> Command {
    Command::new(VALIDATE_CMD)
        .about("Parse every record and report the validation messages.")
        .arg(Arg::new("inputs").required(true).num_args(1..))
        .arg(arg!(--from <format> "Input format: embl, genbank, agp or fasta (default: by extension)"))
        .arg(arg!(--json "Print the messages as a JSON array").action(ArgAction::SetTrue))
}
