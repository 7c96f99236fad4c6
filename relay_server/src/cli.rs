use std::env::{self, VarError};

const HELP: &str = include_str!("./cli-help.txt");

// RELAY_COMMERCE_ACCESS_TOKEN is never printed
const DISPLAY_ENVS: [&str; 11] = [
    "RUST_LOG",
    "RELAY_HOST",
    "RELAY_PORT",
    "RELAY_SENT_FILE",
    "RELAY_TARGET_URL",
    "RELAY_POLL_INTERVAL_MS",
    "RELAY_PAGE_SIZE",
    "RELAY_HTTP_TIMEOUT_SECS",
    "RELAY_ORDER_ID_FIELD",
    "RELAY_DUMMY_TARGET",
    "RELAY_COMMERCE_BASE_URL",
];

/// The server takes no arguments. If any are given, print the help text and the current configuration, and return
/// true so that `main` exits instead of starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{HELP}\n");
    println!("Current environment values (EXCLUDING variables that contain secrets):");
    for name in DISPLAY_ENVS {
        println!("  {name:<35} {}", describe_var(name));
    }
    true
}

fn describe_var(name: &str) -> String {
    match env::var(name) {
        Ok(s) => s,
        Err(VarError::NotPresent) => "Not set".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}
