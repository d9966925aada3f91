use std::env;

const DEFAULT_CONFIG_DIR: &str = "config";

fn main() -> anyhow::Result<()> {
    match env::args().nth(1) {
        Some(arg) if arg == "-h" || arg == "--help" => {
            let name = env::args().next().unwrap_or_else(|| "squares".to_string());
            eprintln!("usage: {} [config-dir]", name);
            Ok(())
        }
        Some(dir) => squares::run(dir),
        None => squares::run(DEFAULT_CONFIG_DIR),
    }
}
