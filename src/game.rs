//! 对局状态机
//!
//! 管理回合顺序、走法历史与终局判定。棋盘占位只能通过
//! `apply_move`/`undo` 变更，终局状态是吸收态。

use std::collections::HashMap;

use crate::board::{Board, Piece};
use crate::fen::{game_fen, parse_fen};
use crate::types::{Color, EngineError, GameResult, Move};

/// 历史条目：走法与被吃的棋子，撤销时用于还原占位
#[derive(Debug, Clone, Copy)]
struct HistoryEntry {
    mv: Move,
    captured: Option<Piece>,
}

/// 一盘对局
///
/// 单线程使用：`apply_move`/`undo` 原地修改占位，并发调用方需自行串行化
pub struct Game {
    board: Board,
    turn: Color,
    history: Vec<HistoryEntry>,
    result: GameResult,
    /// (局面, 回合) 签名出现次数，用于三次重复判和
    repetition: HashMap<String, u32>,
}

impl Game {
    /// 标准开局，红先
    pub fn new() -> Game {
        let mut game = Game {
            board: Board::opening(),
            turn: Color::Red,
            history: Vec::new(),
            result: GameResult::Ongoing,
            repetition: HashMap::new(),
        };
        game.record_position();
        game
    }

    /// 从 FEN 字符串创建对局
    pub fn from_fen(fen: &str) -> Result<Game, EngineError> {
        let state = parse_fen(fen)?;
        let mut game = Game {
            board: Board::from_fen(fen)?,
            turn: state.turn,
            history: Vec::new(),
            result: GameResult::Ongoing,
            repetition: HashMap::new(),
        };
        game.record_position();
        game.result = Self::position_result(&game.board, game.turn);
        Ok(game)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn result(&self) -> GameResult {
        self.result
    }

    /// 已执行的走法数
    #[inline]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// 当前局面的完整 FEN
    pub fn to_fen(&self) -> String {
        game_fen(&self.board, self.turn)
    }

    /// 当前轮走方的合法走法；对局结束后为空
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.result.is_over() {
            return Vec::new();
        }
        self.board.legal_moves(self.turn)
    }

    /// 执行走法
    ///
    /// 走法必须属于当前轮走方的合法走法集合。执行后切换回合并
    /// 重新判定终局，返回新的对局结果
    pub fn apply_move(&mut self, mv: Move) -> Result<GameResult, EngineError> {
        if self.result.is_over() {
            return Err(EngineError::GameOver(self.result));
        }
        if !self.board.legal_moves(self.turn).contains(&mv) {
            return Err(EngineError::IllegalMove(mv));
        }

        let captured = self.board.make_move(mv);
        self.history.push(HistoryEntry { mv, captured });
        self.turn = self.turn.opposite();

        let occurrences = self.record_position();
        self.result = if occurrences >= 3 {
            GameResult::DrawByRepetition
        } else {
            Self::position_result(&self.board, self.turn)
        };

        Ok(self.result)
    }

    /// 撤销最后一步
    ///
    /// 恢复走之前的占位、回合与对局结果，返回被撤销的走法
    pub fn undo(&mut self) -> Result<Move, EngineError> {
        let entry = self.history.pop().ok_or(EngineError::NoHistory)?;

        // 当前局面的签名计数回退
        let sig = self.to_fen();
        if let Some(count) = self.repetition.get_mut(&sig) {
            *count -= 1;
            if *count == 0 {
                self.repetition.remove(&sig);
            }
        }

        self.board.undo_move(entry.mv, entry.captured);
        self.turn = self.turn.opposite();
        // 历史中的局面在走棋时都处于进行中状态
        self.result = GameResult::Ongoing;
        Ok(entry.mv)
    }

    /// 记录当前 (局面, 回合) 签名，返回出现次数
    fn record_position(&mut self) -> u32 {
        let sig = self.to_fen();
        let count = self.repetition.entry(sig).or_insert(0);
        *count += 1;
        *count
    }

    /// 判定某局面下轮走方的结果：无合法走法时为将死或困毙
    fn position_result(board: &Board, turn: Color) -> GameResult {
        if board.legal_moves(turn).is_empty() {
            if board.is_in_check(turn) {
                GameResult::Checkmate(turn.opposite())
            } else {
                GameResult::Stalemate
            }
        } else {
            GameResult::Ongoing
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;
    use crate::types::Position;

    fn mv(s: &str) -> Move {
        Move::from_fen_str(s).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(game.result(), GameResult::Ongoing);
        assert_eq!(game.legal_moves().len(), 44);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.to_fen(), crate::fen::START_FEN);
    }

    #[test]
    fn test_apply_flips_turn_and_records_history() {
        let mut game = Game::new();
        let result = game.apply_move(mv("b7e7")).unwrap();
        assert_eq!(result, GameResult::Ongoing);
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.move_count(), 1);
        // 炮已到 (7,4)
        assert!(game.board().piece_at(Position::new(7, 4)).is_some());
        assert!(game.board().piece_at(Position::new(7, 1)).is_none());
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut game = Game::new();
        // 车隔着马不能走
        let err = game.apply_move(mv("a9a0")).unwrap_err();
        assert_eq!(err, EngineError::IllegalMove(mv("a9a0")));
        // 轮到红方，黑子不能动
        assert!(matches!(
            game.apply_move(mv("b2e2")),
            Err(EngineError::IllegalMove(_))
        ));
        // 局面未被改动
        assert_eq!(game.to_fen(), crate::fen::START_FEN);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_apply_undo_roundtrip() {
        let mut game = Game::new();
        let before = game.to_fen();

        game.apply_move(mv("b7e7")).unwrap();
        game.apply_move(mv("h0g2")).unwrap();
        // 炮五进四吃中卒
        game.apply_move(mv("e7e3")).unwrap();
        assert_eq!(game.move_count(), 3);

        assert_eq!(game.undo().unwrap(), mv("e7e3"));
        assert_eq!(game.undo().unwrap(), mv("h0g2"));
        assert_eq!(game.undo().unwrap(), mv("b7e7"));

        assert_eq!(game.to_fen(), before);
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.undo().unwrap_err(), EngineError::NoHistory);
    }

    #[test]
    fn test_capture_restored_on_undo() {
        let mut game = Game::from_fen(test_positions::CANNON_SCREEN_CAPTURE).unwrap();
        let before = game.to_fen();

        game.apply_move(mv("b7b0")).unwrap();
        assert_eq!(game.board().pieces(Some(Color::Black)).len(), 1);

        game.undo().unwrap();
        assert_eq!(game.to_fen(), before);
        // 黑车回到 (0,1)
        assert!(game.board().piece_at(Position::new(0, 1)).is_some());
    }

    #[test]
    fn test_checkmate_ends_game() {
        // 黑车平中路照将，另一车封锁红方底线，形成双车杀
        let mut game = Game::from_fen("3k5/9/9/9/9/3r5/9/9/9/r3K4 b").unwrap();
        let result = game.apply_move(mv("d5e5")).unwrap();
        assert_eq!(result, GameResult::Checkmate(Color::Black));
        assert_eq!(game.result(), GameResult::Checkmate(Color::Black));
        assert!(game.legal_moves().is_empty());

        // 终局是吸收态
        assert_eq!(
            game.apply_move(mv("e9e8")),
            Err(EngineError::GameOver(GameResult::Checkmate(Color::Black)))
        );

        // 撤销后恢复进行中
        game.undo().unwrap();
        assert_eq!(game.result(), GameResult::Ongoing);
        assert!(!game.legal_moves().is_empty());
    }

    #[test]
    fn test_loaded_checkmate_position() {
        let game = Game::from_fen(test_positions::MATE_1).unwrap();
        assert_eq!(game.result(), GameResult::Checkmate(Color::Black));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_loaded_stalemate_position() {
        let game = Game::from_fen(test_positions::STALEMATE_1).unwrap();
        assert_eq!(game.result(), GameResult::Stalemate);
    }

    #[test]
    fn test_draw_by_repetition() {
        let mut game = Game::from_fen(test_positions::REPETITION_SHUFFLE).unwrap();

        // 双方车来回平移，初始局面第三次出现时判和
        let shuffle = ["a5a4", "i3i4", "a4a5", "i4i3"];
        for round in 0..2 {
            for (i, s) in shuffle.iter().enumerate() {
                let result = game.apply_move(mv(s)).unwrap();
                if round == 1 && i == shuffle.len() - 1 {
                    assert_eq!(result, GameResult::DrawByRepetition);
                } else {
                    assert_eq!(result, GameResult::Ongoing);
                }
            }
        }
        assert_eq!(game.result(), GameResult::DrawByRepetition);

        // 撤销一步即回到进行中
        game.undo().unwrap();
        assert_eq!(game.result(), GameResult::Ongoing);
    }

    #[test]
    fn test_flying_general_never_reachable() {
        let mut game = Game::from_fen(test_positions::KING_FACE_OFF_PIN).unwrap();
        // 挡在中间的马完全被牵制
        for m in game.legal_moves() {
            assert_ne!(m.from, Position::new(5, 4));
        }
        // 帅平移一步后，马的走法解禁
        game.apply_move(mv("e9d9")).unwrap();
        game.apply_move(mv("e0e1")).unwrap();
        assert!(game.legal_moves().iter().any(|m| m.from == Position::new(5, 4)));
    }
}
