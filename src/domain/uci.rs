//! UCI (Universal Chess Interface) protocol types and utilities.
//!
//! Command rendering and output parsing only. Process handling lives in
//! `models::engine`.

use crate::domain::chess::ChessMove;

/// UCI commands that can be sent to an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    /// Initialize UCI mode
    Uci,
    /// Check if engine is ready
    IsReady,
    /// Set a new game
    UciNewGame,
    /// Set an engine option
    SetOption { name: String, value: String },
    /// Set position (startpos or FEN, with optional moves)
    Position { fen: Option<String>, moves: Vec<String> },
    /// Search for a fixed amount of time (milliseconds)
    GoMoveTime(u64),
    /// Stop searching and report the best move so far
    Stop,
    /// Quit the engine
    Quit,
}

impl UciCommand {
    /// Convert command to UCI protocol string
    pub fn to_uci_string(&self) -> String {
        match self {
            UciCommand::Uci => "uci".to_string(),
            UciCommand::IsReady => "isready".to_string(),
            UciCommand::UciNewGame => "ucinewgame".to_string(),
            UciCommand::SetOption { name, value } => {
                format!("setoption name {} value {}", name, value)
            }
            UciCommand::Position { fen, moves } => {
                let mut cmd = match fen {
                    Some(f) => format!("position fen {}", f),
                    None => "position startpos".to_string(),
                };
                if !moves.is_empty() {
                    cmd.push_str(" moves ");
                    cmd.push_str(&moves.join(" "));
                }
                cmd
            }
            UciCommand::GoMoveTime(ms) => format!("go movetime {}", ms),
            UciCommand::Stop => "stop".to_string(),
            UciCommand::Quit => "quit".to_string(),
        }
    }
}

/// Categorized engine output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOutputKind {
    UciOk,
    ReadyOk,
    /// "info ..." - the part after the keyword
    Info(String),
    /// "bestmove ..." - the part after the keyword
    BestMove(String),
    Id(String),
    Option(String),
    Other(String),
}

impl UciOutputKind {
    /// Parse a raw UCI output line into a categorized type
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line == "uciok" {
            UciOutputKind::UciOk
        } else if line == "readyok" {
            UciOutputKind::ReadyOk
        } else if let Some(rest) = line.strip_prefix("info ") {
            UciOutputKind::Info(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("bestmove") {
            UciOutputKind::BestMove(rest.trim().to_string())
        } else if let Some(rest) = line.strip_prefix("id ") {
            UciOutputKind::Id(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("option ") {
            UciOutputKind::Option(rest.to_string())
        } else {
            UciOutputKind::Other(line.to_string())
        }
    }
}

/// The engine's answer to `go`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestMove {
    Move {
        best: ChessMove,
        ponder: Option<ChessMove>,
    },
    /// `bestmove (none)` / `bestmove 0000`: the engine sees nothing to play
    NoMove,
}

impl BestMove {
    /// Parse the part after the `bestmove` keyword. `None` on garbage.
    pub fn parse(rest: &str) -> Option<Self> {
        let mut tokens = rest.split_whitespace();
        let best = tokens.next()?;
        if best == "(none)" || best == "0000" {
            return Some(BestMove::NoMove);
        }
        let best = ChessMove::from_uci(best)?;
        let ponder = match (tokens.next(), tokens.next()) {
            (Some("ponder"), Some(p)) => ChessMove::from_uci(p),
            _ => None,
        };
        Some(BestMove::Move { best, ponder })
    }
}

/// Engine evaluation score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawn score from the engine's point of view
    Centipawns(i32),
    /// Mate in N moves (negative: getting mated)
    Mate(i32),
}

/// The subset of an `info` line that is worth logging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UciInfo {
    pub depth: Option<u32>,
    pub score: Option<Score>,
    pub nodes: Option<u64>,
    pub time: Option<u64>,
    pub pv: Vec<String>,
}

impl UciInfo {
    /// Parse a UCI info string (the part after "info ")
    pub fn parse(info_str: &str) -> Self {
        let mut info = UciInfo::default();
        let mut tokens = info_str.split_whitespace();

        while let Some(token) = tokens.next() {
            match token {
                "depth" => info.depth = tokens.next().and_then(|t| t.parse().ok()),
                "nodes" => info.nodes = tokens.next().and_then(|t| t.parse().ok()),
                "time" => info.time = tokens.next().and_then(|t| t.parse().ok()),
                "score" => {
                    let kind = tokens.next();
                    let value = tokens.next().and_then(|t| t.parse::<i32>().ok());
                    info.score = match (kind, value) {
                        (Some("cp"), Some(cp)) => Some(Score::Centipawns(cp)),
                        (Some("mate"), Some(m)) => Some(Score::Mate(m)),
                        _ => info.score,
                    };
                }
                // pv runs to the end of the line
                "pv" => info.pv = tokens.by_ref().map(str::to_string).collect(),
                // free text, nothing after it is structured
                "string" => break,
                _ => {}
            }
        }

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Role, Square};

    #[test]
    fn test_position_startpos() {
        let cmd = UciCommand::Position { fen: None, moves: vec![] };
        assert_eq!(cmd.to_uci_string(), "position startpos");
    }

    #[test]
    fn test_position_fen() {
        let cmd = UciCommand::Position {
            fen: Some("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".to_string()),
            moves: vec![],
        };
        assert_eq!(
            cmd.to_uci_string(),
            "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn test_go_movetime() {
        assert_eq!(UciCommand::GoMoveTime(100).to_uci_string(), "go movetime 100");
    }

    #[test]
    fn test_parse_output_kinds() {
        assert_eq!(UciOutputKind::parse("uciok"), UciOutputKind::UciOk);
        assert_eq!(UciOutputKind::parse("readyok\r"), UciOutputKind::ReadyOk);
        assert_eq!(
            UciOutputKind::parse("bestmove e2e4 ponder e7e5"),
            UciOutputKind::BestMove("e2e4 ponder e7e5".to_string())
        );
        assert!(matches!(
            UciOutputKind::parse("id name Stockfish 17"),
            UciOutputKind::Id(_)
        ));
        assert!(matches!(
            UciOutputKind::parse("Stockfish 17 by the Stockfish developers"),
            UciOutputKind::Other(_)
        ));
    }

    #[test]
    fn test_parse_bestmove_with_ponder() {
        let parsed = BestMove::parse("e7e5 ponder g1f3").unwrap();
        assert_eq!(
            parsed,
            BestMove::Move {
                best: ChessMove::new(Square::E7, Square::E5),
                ponder: Some(ChessMove::new(Square::G1, Square::F3)),
            }
        );
    }

    #[test]
    fn test_parse_bestmove_promotion() {
        let Some(BestMove::Move { best, ponder }) = BestMove::parse("a2a1n") else {
            panic!("expected a move");
        };
        assert_eq!(best.promotion, Some(Role::Knight));
        assert_eq!(ponder, None);
    }

    #[test]
    fn test_parse_bestmove_none() {
        assert_eq!(BestMove::parse("(none)"), Some(BestMove::NoMove));
        assert_eq!(BestMove::parse("0000"), Some(BestMove::NoMove));
        assert_eq!(BestMove::parse(""), None);
        assert_eq!(BestMove::parse("xyz"), None);
    }

    #[test]
    fn test_parse_uci_info() {
        let info = UciInfo::parse(
            "depth 24 seldepth 31 multipv 1 score cp 28 nodes 2847613 nps 2431482 time 1171 pv e2e4 e7e5 g1f3",
        );
        assert_eq!(info.depth, Some(24));
        assert_eq!(info.score, Some(Score::Centipawns(28)));
        assert_eq!(info.nodes, Some(2847613));
        assert_eq!(info.time, Some(1171));
        assert_eq!(info.pv, vec!["e2e4", "e7e5", "g1f3"]);
    }

    #[test]
    fn test_parse_uci_info_mate_and_string() {
        let info = UciInfo::parse("depth 5 score mate -2 pv g8f6");
        assert_eq!(info.score, Some(Score::Mate(-2)));

        let info = UciInfo::parse("string NNUE evaluation using nn.nnue depth 3");
        assert_eq!(info.depth, None);
    }
}
