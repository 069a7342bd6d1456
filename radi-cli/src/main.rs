// Command-line interface for radi
//
// This binary renders and exports pages of a radi wiki page database.
//
// A page database is a directory of `<page>.radi` files. Pages are named
// without the extension; `Start` and `Start.radi` refer to the same page.
//
// Usage:
//  radi render <page> --to <format> [--db <dir>] [-o <file>]   - Render one page
//  radi export <page> --to <format> --output <dir> [--db <dir>]  - Export a page and everything it links to
//  radi tokens <page> [<transform>]       - Dump the token stream of a page
//  radi --list-formats                    - List output formats
//  radi --list-transforms                 - List token transforms
//
// Configuration:
//
// Settings are read from the built-in defaults, then `radi.toml` in the
// working directory, then the file given by --config. Command-line flags win.

mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use radi_babel::{export_with, Format, FormatRegistry, PageStore};
use radi_config::{Loader, RadiConfig};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    Command::new("radi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for rendering and exporting radi wiki pages")
        .long_about(
            "radi is a command-line tool for working with radi wiki page databases.\n\n\
            Commands:\n  \
            - render: Render a single page to stdout or a file\n  \
            - export: Render a page and every page it links to\n  \
            - tokens: View the token stream of a page\n\n\
            Examples:\n  \
            radi render Start --to html                 # HTML body on stdout\n  \
            radi export Start --to html --output site   # Linked HTML pages\n  \
            radi export Start --to latex --output doc   # One combined Start.tex\n  \
            radi tokens Start token-json                # Normalized tokens as JSON"
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available token transforms")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a radi.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("DIR")
                .help("Page database directory (overrides store.root)")
                .value_hint(ValueHint::DirPath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Render a single page")
                .arg(page_arg())
                .arg(to_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export a page and every page reachable through its links")
                .long_about(
                    "Walk the link graph from a start page and render every reachable page.\n\n\
                    Per-page formats (html, xhtml, markdown, radi) write one file per page.\n\
                    Combined formats (latex, latex-book, beamer, prosper, s5) write a single\n\
                    document named after the start page. Local images are copied along."
                )
                .arg(page_arg())
                .arg(to_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Target directory")
                        .required(true)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("css")
                        .long("css")
                        .value_name("URL")
                        .help("Stylesheet linked from HTML pages"),
                )
                .arg(
                    Arg::new("template")
                        .long("template")
                        .value_name("FILE")
                        .help("Slide template (beamer, prosper, s5)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no-assets")
                        .long("no-assets")
                        .help("Do not copy images into the target directory")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Dump the token stream of a page")
                .arg(page_arg())
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'token-simple'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn page_arg() -> Arg {
    Arg::new("page")
        .help("Page name, with or without the page extension")
        .required(true)
        .index(1)
}

fn to_arg() -> Arg {
    Arg::new("to")
        .long("to")
        .help("Target format (see --list-formats)")
        .required(true)
        .value_hint(ValueHint::Other)
}

fn main() {
    let matches = build_cli().get_matches();

    let filter = if matches.get_flag("verbose") {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        matches.get_one::<String>("db").map(|s| s.as_str()),
    );

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&config);
        return;
    }
    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    match matches.subcommand() {
        Some(("render", sub_matches)) => handle_render_command(sub_matches, &config),
        Some(("export", sub_matches)) => handle_export_command(sub_matches, &config),
        Some(("tokens", sub_matches)) => {
            let page = required(sub_matches, "page");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("token-simple");
            handle_tokens_command(page, transform, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Error: missing argument '{name}'");
            std::process::exit(1);
        })
}

/// Handle the render command
fn handle_render_command(matches: &ArgMatches, config: &RadiConfig) {
    let page = required(matches, "page");
    let to = required(matches, "to");
    let registry = load_registry(config);
    let format = registry.get(to).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let store = config.store.page_store();
    let name = store.page_name(page);
    let source = store.processed_source(&name).unwrap_or_else(|e| {
        eprintln!("Error reading page '{name}': {e}");
        std::process::exit(1);
    });
    let rendered = format.render(&source, Some(&name)).unwrap_or_else(|e| {
        eprintln!("Render error: {e}");
        std::process::exit(1);
    });

    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, rendered.body).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{}", rendered.body),
    }
}

/// Handle the export command
fn handle_export_command(matches: &ArgMatches, config: &RadiConfig) {
    let page = required(matches, "page");
    let to = required(matches, "to");
    let output = PathBuf::from(required(matches, "output"));
    let registry = load_registry(config);
    let format = registry.get(to).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let mut spec = config.export.spec(to, page, &output);
    if let Some(css) = matches.get_one::<String>("css") {
        spec = spec.with_css(css.clone());
    }
    if let Some(template) = matches.get_one::<String>("template") {
        spec = spec.with_template(template);
    }
    if matches.get_flag("no-assets") {
        spec = spec.with_copy_assets(false);
    }

    let store = config.store.page_store();
    let report = export_with(format, &spec, &store).unwrap_or_else(|e| {
        eprintln!("Export error: {e}");
        std::process::exit(1);
    });
    for artifact in &report.artifacts {
        println!("{}", artifact.display());
    }
    tracing::info!(
        pages = report.pages.len(),
        assets = report.assets.len(),
        "export finished"
    );
}

/// Handle the tokens command
fn handle_tokens_command(page: &str, transform: &str, config: &RadiConfig) {
    let store = config.store.page_store();
    let name = store.page_name(page);
    let source = store.processed_source(&name).unwrap_or_else(|e| {
        eprintln!("Error reading page '{name}': {e}");
        std::process::exit(1);
    });

    let output = transforms::execute_transform(&source, transform).unwrap_or_else(|e| {
        eprintln!("Execution error: {e}");
        std::process::exit(1);
    });
    print!("{output}");
}

/// Handle the list-formats command
fn handle_list_formats_command(config: &RadiConfig) {
    let registry = load_registry(config);
    println!("Available formats:\n");
    for name in registry.list_formats() {
        match registry.get(&name) {
            Ok(format) => println!("  {name:<12} {}", format.description()),
            Err(_) => println!("  {name}"),
        }
    }
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  token-raw   - Tokens as produced by the lexer");
    println!("  token       - Tokens after structural normalization\n");
    println!("Formats:");
    println!("  simple      - One token kind per line");
    println!("  json        - JSON with token text and position\n");
    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>, db: Option<&str>) -> RadiConfig {
    let loader = Loader::new().with_optional_file("radi.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    let loader = match db {
        Some(dir) => loader.set_override("store.root", dir).unwrap_or_else(|err| {
            eprintln!("Failed to apply --db: {err}");
            std::process::exit(1);
        }),
        None => loader,
    };
    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn load_registry(config: &RadiConfig) -> FormatRegistry {
    config.render.registry().unwrap_or_else(|err| {
        eprintln!("Failed to load tag maps: {err}");
        std::process::exit(1);
    })
}
