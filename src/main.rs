mod cli;
mod commands;
mod env_loader;

fn main() {
    env_loader::load_dotenv();

    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
