/// One line typed at the review prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A finished drag, negative is left
    Swipe(f64),
    Keep,
    Delete,
    Bin,
    /// Toggle the selection of the n:th photo in the bin, counted from 1
    Select(usize),
    SelectAll,
    ClearSelection,
    /// Restore one bin entry, or every selected one when no index is given
    Restore(Option<usize>),
    Commit,
    Status,
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "\
  <number>      finish a drag by that many points (negative = left)
  k, keep       keep the current photo
  d, delete     move the current photo to the bin
  bin           list the bin
  select <n>    toggle selection of bin entry n
  all           select every bin entry
  clear         clear the bin selection
  restore [n]   restore bin entry n, or all selected entries
  commit        permanently delete the selected bin entries
  status        show review progress
  reset         review the current photos again
  help          show this help
  q, quit       stop reviewing";

fn parse_index(value: Option<&str>, command: &str) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("{} needs an entry number", command))?;
    match value.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(format!("Not a bin entry number: {}", value)),
    }
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Err("Empty command, type help for the list of commands".to_string());
    };
    let argument = parts.next();

    let command = match word.to_lowercase().as_str() {
        "k" | "keep" => Command::Keep,
        "d" | "delete" => Command::Delete,
        "bin" => Command::Bin,
        "select" => Command::Select(parse_index(argument, "select")?),
        "all" => Command::SelectAll,
        "clear" => Command::ClearSelection,
        "restore" => match argument {
            Some(_) => Command::Restore(Some(parse_index(argument, "restore")?)),
            None => Command::Restore(None),
        },
        "commit" => Command::Commit,
        "status" => Command::Status,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => match other.parse::<f64>() {
            Ok(distance) if distance.is_finite() => Command::Swipe(distance),
            _ => return Err(format!("Unknown command: {}", word)),
        },
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("-150"), Ok(Command::Swipe(-150.0)));
        assert_eq!(parse_command(" 42.5 "), Ok(Command::Swipe(42.5)));
        assert_eq!(parse_command("K"), Ok(Command::Keep));
        assert_eq!(parse_command("delete"), Ok(Command::Delete));
        assert_eq!(parse_command("select 2"), Ok(Command::Select(2)));
        assert_eq!(parse_command("restore"), Ok(Command::Restore(None)));
        assert_eq!(parse_command("restore 3"), Ok(Command::Restore(Some(3))));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_command_rejects_bad_input() {
        assert!(parse_command("").is_err());
        assert!(parse_command("select").is_err());
        assert!(parse_command("select 0").is_err());
        assert!(parse_command("restore x").is_err());
        assert!(parse_command("nan").is_err());
        assert!(parse_command("dance").is_err());
    }
}
