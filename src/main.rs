use std::process;

use modscan::cli::{Args, Command};

fn main() {
    let args = Args::parse_args();
    let command = Command::from_args(args);

    process::exit(command.run());
}
