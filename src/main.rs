use tracing::info;

#[derive(Debug, Default)]
struct CliArgs {
    library: Option<String>,
    log: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;

    let mut settings = tunes::config::load_settings()?;
    if let Some(library) = args.library {
        settings.library_source = library;
    }

    let filter = tunes::logging::resolve_filter(args.log.as_deref(), &settings.log_filter)?;
    let _log_guard = tunes::logging::init(filter)?;
    info!(library = %settings.library_source, "starting");

    tunes::app::run(settings)
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--library" => {
                index += 1;
                out.library = Some(required_value(&args, index, "--library")?);
            }
            "--log" => {
                index += 1;
                out.log = Some(required_value(&args, index, "--log")?);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn required_value(args: &[String], index: usize, flag: &str) -> anyhow::Result<String> {
    let Some(value) = args.get(index) else {
        anyhow::bail!("{flag} requires a value");
    };
    if value.trim().is_empty() {
        anyhow::bail!("{flag} cannot be empty");
    }
    Ok(value.trim().to_string())
}

fn print_help() {
    println!("Tunes");
    println!("  --library <url|path>  Album listing to load (http(s) url or JSON file)");
    println!("  --log <filter>        Log filter, e.g. info or tunes=debug");
}
