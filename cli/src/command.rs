use minefield_core::{Coord, Coord2};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    /// Abandon the current board and start a fresh one
    Restart,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command, try `r X Y`, `f X Y`, `n` or `q`")]
    Empty,
    #[error("unknown command `{0}`, try `r X Y`, `f X Y`, `n` or `q`")]
    Unknown(String),
    #[error("expected two coordinates, like `{0} 3 4`")]
    MissingCoords(char),
    #[error("`{0}` is not a valid coordinate")]
    BadCoord(String),
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(CommandError::Empty);
    };

    let key = match verb.to_ascii_lowercase().as_str() {
        "q" | "quit" => return Ok(Command::Quit),
        "n" | "new" => return Ok(Command::Restart),
        "r" | "reveal" => 'r',
        "f" | "flag" => 'f',
        _ => return Err(CommandError::Unknown(verb.to_owned())),
    };

    let (Some(x), Some(y), None) = (words.next(), words.next(), words.next()) else {
        return Err(CommandError::MissingCoords(key));
    };
    let coords = (coord(x)?, coord(y)?);

    Ok(if key == 'r' {
        Command::Reveal(coords)
    } else {
        Command::Flag(coords)
    })
}

fn coord(word: &str) -> Result<Coord, CommandError> {
    word.parse().map_err(|_| CommandError::BadCoord(word.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse("r 3 4"), Ok(Command::Reveal((3, 4))));
        assert_eq!(parse("  FLAG 0 12 "), Ok(Command::Flag((0, 12))));
        assert_eq!(parse("q"), Ok(Command::Quit));
        assert_eq!(parse("new"), Ok(Command::Restart));
        assert_eq!(parse(" N "), Ok(Command::Restart));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(parse(""), Err(CommandError::Empty));
        assert_eq!(parse("x 1 1"), Err(CommandError::Unknown("x".into())));
        assert_eq!(parse("r 1"), Err(CommandError::MissingCoords('r')));
        assert_eq!(parse("f 1 2 3"), Err(CommandError::MissingCoords('f')));
        assert_eq!(parse("r -1 2"), Err(CommandError::BadCoord("-1".into())));
        assert_eq!(parse("r 1 300"), Err(CommandError::BadCoord("300".into())));
    }
}
