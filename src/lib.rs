//! Xiangqi 规则引擎
//!
//! 中国象棋走法生成与对局状态管理 - 支持 FEN 输入输出

pub mod board;
pub mod fen;
pub mod game;
pub mod test_positions;
pub mod types;

pub use board::{legal_moves_from_fen, Board, Piece};
pub use fen::{apply_move_to_fen, board_fen, game_fen, parse_fen, FenState, START_FEN};
pub use game::Game;
pub use types::{Color, EngineError, GameResult, Move, PieceType, Position};
