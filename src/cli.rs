// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.

pub fn print_help() {
    println!(
        "Semtask v{} - stages this week's university tasks to your task service",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    semtask [--root <path>] [--date <YYYY-MM-DD>] [--dry-run]");
    println!("    semtask --help");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    --date <YYYY-MM-DD>   Schedule as if today were the given date.");
    println!("    --dry-run             Log what would be staged without contacting the service.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("DATA FILES (in the data directory, or `data_dir` from config.toml):");
    println!("    semester.toml         Calendar window: start/end plus the [break] window.");
    println!("    schedule.toml         [[subjects]], [generators.<name>] curriculum lists,");
    println!("                          and [[tasks.<weekday>]] recurring task definitions.");
    println!();
    println!("AUTHENTICATION:");
    println!("    Set SEMTASK_API_TOKEN, or the `token` key in config.toml.");
    println!();
    println!("Each run is stateless: running twice on the same day stages the");
    println!("same tasks twice. Schedule it once per day.");
    println!();
    println!("License: GPL-3.0-or-later");
}
