//! Line protocol for the interactive prompt.

use skycast_weather::UnitSystem;

/// One user action
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Search-box content changed; triggers a debounced suggestion lookup
    Input(String),
    /// Submit a free-text search, taking the best-ranked match
    Search(String),
    /// Pick a suggestion from the list (0-based)
    Pick(usize),
    /// Switch the unit system
    Units(UnitSystem),
    /// Select a day from the daily list (0-based)
    Day(usize),
    /// Use the machine's current position
    Locate,
    /// Reload the forecast for the current place
    Refresh,
    Help,
    Quit,
}

/// Usage text shown for `help` and rejected input
pub const USAGE: &str = "commands: type <text> | search <place> | pick <n> | units metric|imperial | day <n> | locate | refresh | quit";

/// Parse one input line. List positions in the protocol are 1-based, as
/// rendered; they are converted to 0-based indices here.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "type" => Ok(Command::Input(rest.to_string())),
        "search" => {
            if rest.is_empty() {
                Err("usage: search <place>".to_string())
            } else {
                Ok(Command::Search(rest.to_string()))
            }
        }
        "pick" => parse_position(rest, "pick").map(Command::Pick),
        "units" => rest
            .parse::<UnitSystem>()
            .map(Command::Units)
            .map_err(|_| "usage: units metric|imperial".to_string()),
        "day" => parse_position(rest, "day").map(Command::Day),
        "locate" => Ok(Command::Locate),
        "refresh" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err(USAGE.to_string()),
        other => Err(format!("unknown command: {} ({})", other, USAGE)),
    }
}

fn parse_position(text: &str, verb: &str) -> Result<usize, String> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("usage: {} <number>", verb)),
    }
}
