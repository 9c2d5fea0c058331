use cmdtree::tools::build_cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match build_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Invalid command definition: {}", e);
            std::process::exit(2);
        }
    };
    cmdtree::run_and_exit(&cli)
}
