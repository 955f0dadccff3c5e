/// A line typed at the tracker prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    List,
    Show(Vec<String>),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let input = line.trim().to_lowercase();
        let parts: Vec<&str> = input.split_whitespace().collect();

        let Some(first) = parts.first() else {
            return Command::Empty;
        };

        match *first {
            "r" | "refresh" | "update" => Command::Refresh,
            "l" | "list" => Command::List,
            "show" => Command::Show(parts[1..].iter().map(|s| s.to_uppercase()).collect()),
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub const HELP: &str = "Commands: refresh (r), list (l), show <symbol>..., help (h), quit (q)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(Command::parse("r"), Command::Refresh);
        assert_eq!(Command::parse("  Refresh \n"), Command::Refresh);
        assert_eq!(Command::parse("list"), Command::List);
        assert_eq!(Command::parse("EXIT"), Command::Quit);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(
            Command::parse("show btc eth"),
            Command::Show(vec!["BTC".to_string(), "ETH".to_string()])
        );
        assert_eq!(Command::parse("show"), Command::Show(Vec::new()));
        assert_eq!(Command::parse("buy"), Command::Unknown("buy".to_string()));
    }
}
