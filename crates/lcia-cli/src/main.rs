use lcia_cli::{build_cli, init_tracing, run, EXIT_FATAL};

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("json"));

    let stdout = std::io::stdout();
    let code = match run(&matches, &mut stdout.lock()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            EXIT_FATAL
        }
    };
    std::process::exit(code);
}
