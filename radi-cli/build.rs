use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &[
    "token-raw-simple",
    "token-raw-json",
    "token-simple",
    "token-json",
];

const FORMATS: &[&str] = &[
    "html",
    "xhtml",
    "latex",
    "latex-book",
    "markdown",
    "radi",
    "beamer",
    "prosper",
    "s5",
];

fn to_arg() -> Arg {
    Arg::new("to")
        .long("to")
        .required(true)
        .value_parser(clap::builder::PossibleValuesParser::new(FORMATS))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("radi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for rendering and exporting radi wiki pages")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .value_hint(ValueHint::DirPath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .arg(Arg::new("page").required(true).index(1))
                .arg(to_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("export")
                .arg(Arg::new("page").required(true).index(1))
                .arg(to_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .required(true)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(Arg::new("css").long("css"))
                .arg(
                    Arg::new("template")
                        .long("template")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no-assets")
                        .long("no-assets")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .arg(Arg::new("page").required(true).index(1))
                .arg(
                    Arg::new("transform")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2),
                ),
        );

    generate_to(Bash, &mut cmd, "radi", &outdir)?;
    generate_to(Zsh, &mut cmd, "radi", &outdir)?;
    generate_to(Fish, &mut cmd, "radi", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
