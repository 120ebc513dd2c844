use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // STOREFRONT_ADMIN_PASSWORD is deliberately left out
    const DISPLAY_ENVS: [&str; 11] = [
        "RUST_LOG",
        "STOREFRONT_HOST",
        "STOREFRONT_PORT",
        "STOREFRONT_DATABASE_URL",
        "STOREFRONT_DB_MAX_CONNECTIONS",
        "STOREFRONT_SESSION_COOKIE",
        "STOREFRONT_SESSION_TTL_HOURS",
        "STOREFRONT_SECURE_COOKIES",
        "STOREFRONT_RESTOCK_POLICY",
        "STOREFRONT_EVENT_BUFFER",
        "STOREFRONT_ADMIN_USERNAME",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
