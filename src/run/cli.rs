use anyhow::Result;
use std::path::Path;

use crate::config::Settings;

pub(crate) fn as_cli(args: &[String], settings: Settings) -> Result<()> {
    match args[1].as_str() {
        "run" => {
            let Some(script) = args.get(2) else {
                anyhow::bail!("Usage: clientbooks run <script>");
            };
            super::run_script(Path::new(script), settings)
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("clientbooks {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("clientbooks - consolidate bank statements per client");
    println!();
    println!("Usage: clientbooks [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Start an interactive session");
    println!("  run <script>                  Run session commands from a file");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Type `help` inside a session for the list of session commands.");
}
