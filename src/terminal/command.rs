//! Input line parsing.

use crate::engine::types::{ChessError, PieceType, Square};

pub const HELP: &str = "\
Commands:
  e2 e4 [q|r|b|n]   move a piece (promotion piece optional, queen by default)
  e2e4, e7e8n       the same without the space
  moves <square>    list legal destinations from a square
  hint              suggest a move
  undo              take back your last move
  reset             start a new game
  board             redraw the board
  state             print the game state as JSON
  help              show this text
  quit              leave";

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move {
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    },
    Moves(Square),
    Hint,
    Undo,
    Reset,
    Board,
    State,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,

    #[error("unknown command: {0} (type 'help')")]
    Unknown(String),

    #[error("'{0}' expects a square, e.g. '{0} e2'")]
    MissingSquare(&'static str),

    #[error("invalid promotion piece '{0}', use q, r, b or n")]
    InvalidPromotion(String),

    #[error(transparent)]
    Chess(#[from] ChessError),
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        parse(line)
    }
}

/// Parse one input line. Case-insensitive.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let lower = line.trim().to_ascii_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();

    match tokens.as_slice() {
        [] => Err(CommandError::Empty),
        ["hint"] => Ok(Command::Hint),
        ["undo"] => Ok(Command::Undo),
        ["reset" | "new"] => Ok(Command::Reset),
        ["board"] => Ok(Command::Board),
        ["state" | "json"] => Ok(Command::State),
        ["help" | "?"] => Ok(Command::Help),
        ["quit" | "exit"] => Ok(Command::Quit),
        ["moves"] => Err(CommandError::MissingSquare("moves")),
        ["moves", sq] => Ok(Command::Moves(sq.parse()?)),
        [compact] if looks_like_move(compact) => {
            let (from, rest) = compact.split_at(2);
            let (to, promo) = rest.split_at(2);
            let promo = (!promo.is_empty()).then_some(promo);
            move_command(from, to, promo)
        }
        [from, to] if looks_like_square(from) => move_command(from, to, None),
        [from, to, promo] if looks_like_square(from) => move_command(from, to, Some(promo)),
        [first, ..] => Err(CommandError::Unknown(first.to_string())),
    }
}

fn move_command(from: &str, to: &str, promo: Option<&str>) -> Result<Command, CommandError> {
    Ok(Command::Move {
        from: from.parse()?,
        to: to.parse()?,
        promotion: promo.map(parse_promotion).transpose()?,
    })
}

fn parse_promotion(s: &str) -> Result<PieceType, CommandError> {
    let kind = match s {
        "queen" => Some(PieceType::Queen),
        "rook" => Some(PieceType::Rook),
        "bishop" => Some(PieceType::Bishop),
        "knight" => Some(PieceType::Knight),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => PieceType::from_char(c).map(|(_, kind)| kind),
                _ => None,
            }
        }
    };
    kind.filter(|k| PieceType::PROMOTIONS.contains(k))
        .ok_or_else(|| CommandError::InvalidPromotion(s.to_string()))
}

fn looks_like_square(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 2 && b[0].is_ascii_lowercase() && b[1].is_ascii_digit()
}

fn looks_like_move(s: &str) -> bool {
    (s.len() == 4 || s.len() == 5) && s.is_ascii() && looks_like_square(&s[..2])
}
