//! FEN 解析与生成
//!
//! 格式: `<棋盘> <回合>`
//!
//! 棋盘符号：
//! - 红方棋子：K(帅) A(仕) E(相) H(马) R(车) C(炮) P(兵)
//! - 黑方棋子：k a e h r c p
//! - 空格：数字 (1-9)
//!
//! 第一行是黑方底线 (row 0)，最后一行是红方底线 (row 9)

use crate::board::{Board, Piece};
use crate::types::{Color, EngineError, Move, PieceType, Position};

/// 标准象棋初始局面
pub const START_FEN: &str =
    "rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR r";

/// FEN 解析后的状态
#[derive(Debug, Clone)]
pub struct FenState {
    pub pieces: Vec<Piece>,
    pub turn: Color,
}

/// 解析 FEN 字符串
pub fn parse_fen(fen: &str) -> Result<FenState, EngineError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(EngineError::InvalidFen(format!(
            "expected '<board> <turn>', got: {}",
            fen
        )));
    }

    let pieces = parse_board(parts[0])?;
    let turn = parts[1]
        .chars()
        .next()
        .and_then(Color::from_fen_char)
        .ok_or_else(|| EngineError::InvalidFen(format!("invalid turn: {}", parts[1])))?;

    Ok(FenState { pieces, turn })
}

/// 解析棋盘字符串
fn parse_board(board_str: &str) -> Result<Vec<Piece>, EngineError> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != 10 {
        return Err(EngineError::InvalidFen(format!(
            "expected 10 rows, got {}",
            rows.len()
        )));
    }

    let mut pieces = Vec::new();

    for (row_idx, row_str) in rows.iter().enumerate() {
        // FEN 从上往下就是 row 0 到 row 9
        let row = row_idx as i8;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if col >= 9 {
                return Err(EngineError::InvalidFen(format!(
                    "row {} overflows 9 columns",
                    row
                )));
            }

            if ch.is_ascii_digit() {
                col += (ch as i8) - ('0' as i8);
            } else if ch.is_ascii_alphabetic() {
                let piece_type = PieceType::from_fen_char(ch).ok_or_else(|| {
                    EngineError::InvalidFen(format!("invalid piece char: {}", ch))
                })?;
                let color = if ch.is_ascii_uppercase() {
                    Color::Red
                } else {
                    Color::Black
                };
                pieces.push(Piece::new(piece_type, color, Position::new(row, col)));
                col += 1;
            } else {
                return Err(EngineError::InvalidFen(format!(
                    "invalid character in board: {}",
                    ch
                )));
            }
        }

        if col != 9 {
            return Err(EngineError::InvalidFen(format!(
                "row {} has {} columns, expected 9",
                row, col
            )));
        }
    }

    Ok(pieces)
}

/// 生成棋盘字符串（不含回合字段）
pub fn board_fen(board: &Board) -> String {
    let mut rows = Vec::with_capacity(10);

    for row in 0..10 {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for col in 0..9 {
            if let Some(piece) = board.piece_at(Position::new(row, col)) {
                if empty_count > 0 {
                    row_str.push_str(&empty_count.to_string());
                    empty_count = 0;
                }
                let ch = piece.piece_type.to_fen_char();
                row_str.push(match piece.color {
                    Color::Red => ch.to_ascii_uppercase(),
                    Color::Black => ch,
                });
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }

        rows.push(row_str);
    }

    rows.join("/")
}

/// 生成完整 FEN 字符串
pub fn game_fen(board: &Board, turn: Color) -> String {
    format!("{} {}", board_fen(board), turn.to_fen_char())
}

/// 在 FEN 上执行走法，返回新的 FEN
///
/// 走法必须是当前轮走方的合法走法，否则返回 `IllegalMove`
pub fn apply_move_to_fen(fen: &str, move_str: &str) -> Result<String, EngineError> {
    let state = parse_fen(fen)?;
    let mut board = Board::from_fen(fen)?;
    let mv = Move::from_fen_str(move_str)?;

    if !board.legal_moves(state.turn).contains(&mv) {
        return Err(EngineError::IllegalMove(mv));
    }

    board.make_move(mv);
    Ok(game_fen(&board, state.turn.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_initial_fen() {
        let state = parse_fen(START_FEN).unwrap();

        assert_eq!(state.pieces.len(), 32);
        assert_eq!(state.turn, Color::Red);

        let red_count = state.pieces.iter().filter(|p| p.color == Color::Red).count();
        assert_eq!(red_count, 16);

        let kings: Vec<&Piece> = state
            .pieces
            .iter()
            .filter(|p| p.piece_type == PieceType::King)
            .collect();
        assert_eq!(kings.len(), 2);
    }

    #[test]
    fn test_fen_roundtrip() {
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(game_fen(&board, Color::Red), START_FEN);

        let mid = "rheakae1r/9/1c4hc1/p1p1p1p1p/9/9/P1P1P1P1P/4C1HC1/9/RHEAKAE1R b";
        let board = Board::from_fen(mid).unwrap();
        assert_eq!(game_fen(&board, Color::Black), mid);
    }

    #[test]
    fn test_parse_invalid_fen() {
        // 缺少回合字段
        assert!(parse_fen("rheakaehr/9/9/9/9/9/9/9/9/RHEAKAEHR").is_err());
        // 行数不对
        assert!(parse_fen("9/9/9 r").is_err());
        // 非法棋子字符
        assert!(parse_fen("zheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR r").is_err());
        // 列数不足
        assert!(parse_fen("rheakaeh/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR r").is_err());
        // 非法回合字符
        assert!(parse_fen("rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR x").is_err());
    }

    #[test]
    fn test_apply_move_to_fen() {
        // 炮二平五
        let new_fen = apply_move_to_fen(START_FEN, "b7e7").unwrap();
        assert_eq!(
            new_fen,
            "rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/4C2C1/9/RHEAKAEHR b"
        );

        // 黑方不能替红方走
        assert!(matches!(
            apply_move_to_fen(START_FEN, "b2e2"),
            Err(EngineError::IllegalMove(_))
        ));
        // 非法走法字符串
        assert!(matches!(
            apply_move_to_fen(START_FEN, "b7"),
            Err(EngineError::InvalidMove(_))
        ));
    }
}
