//! 象棋核心类型定义
//!
//! 定义棋盘坐标、棋子类型、走法、对局结果与错误类型

use std::fmt;

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opposite(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    /// 将/帅
    King,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马
    Horse,
    /// 车
    Rook,
    /// 炮
    Cannon,
    /// 卒/兵
    Pawn,
}

impl PieceType {
    /// 从 FEN 字符解析（大小写均可）
    pub fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceType::King),
            'a' => Some(PieceType::Advisor),
            'e' => Some(PieceType::Elephant),
            'h' => Some(PieceType::Horse),
            'r' => Some(PieceType::Rook),
            'c' => Some(PieceType::Cannon),
            'p' => Some(PieceType::Pawn),
            _ => None,
        }
    }

    /// 转换为 FEN 字符（小写）
    pub fn to_fen_char(&self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Advisor => 'a',
            PieceType::Elephant => 'e',
            PieceType::Horse => 'h',
            PieceType::Rook => 'r',
            PieceType::Cannon => 'c',
            PieceType::Pawn => 'p',
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::King => "King",
            PieceType::Advisor => "Advisor",
            PieceType::Elephant => "Elephant",
            PieceType::Horse => "Horse",
            PieceType::Rook => "Rook",
            PieceType::Cannon => "Cannon",
            PieceType::Pawn => "Pawn",
        };
        write!(f, "{}", name)
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-9 (0 是黑方底线，9 是红方底线)
/// col: 0-8 (从左到右)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..=9).contains(&self.row) && (0..=8).contains(&self.col)
    }

    /// 检查位置是否在九宫格内
    pub fn is_in_palace(&self, color: Color) -> bool {
        if !(3..=5).contains(&self.col) {
            return false;
        }
        match color {
            Color::Red => (7..=9).contains(&self.row),
            Color::Black => (0..=2).contains(&self.row),
        }
    }

    /// 检查位置是否在己方半场（未过河）
    pub fn is_on_own_side(&self, color: Color) -> bool {
        match color {
            Color::Red => (5..=9).contains(&self.row),
            Color::Black => (0..=4).contains(&self.row),
        }
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 转换为 90 格数组下标
    #[inline]
    pub fn to_index(&self) -> usize {
        (self.row as usize) * 9 + (self.col as usize)
    }

    /// 从数组下标还原位置
    #[inline]
    pub fn from_index(idx: usize) -> Position {
        Position {
            row: (idx / 9) as i8,
            col: (idx % 9) as i8,
        }
    }

    /// 从 FEN 坐标解析（如 "a0"）
    pub fn from_fen_str(s: &str) -> Option<Position> {
        if s.len() != 2 {
            return None;
        }
        let chars: Vec<char> = s.chars().collect();
        let col = match chars[0] {
            'a'..='i' => (chars[0] as i8) - ('a' as i8),
            _ => return None,
        };
        let row = match chars[1] {
            '0'..='9' => (chars[1] as i8) - ('0' as i8),
            _ => return None,
        };
        Some(Position { row, col })
    }

    /// 转换为 FEN 坐标（如 "a0"）
    pub fn to_fen_str(&self) -> String {
        let col_char = (b'a' + self.col as u8) as char;
        format!("{}{}", col_char, self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_str())
    }
}

/// 走法（起点与终点）
///
/// 被吃的棋子由引擎在执行时记入历史，调用方不需要提供
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }

    /// 从走法字符串解析（如 "e9e8"）
    pub fn from_fen_str(s: &str) -> Result<Move, EngineError> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return Err(EngineError::InvalidMove(s.to_string()));
        }
        let from = Position::from_fen_str(&s[0..2])
            .ok_or_else(|| EngineError::InvalidMove(s.to_string()))?;
        let to = Position::from_fen_str(&s[2..4])
            .ok_or_else(|| EngineError::InvalidMove(s.to_string()))?;
        Ok(Move { from, to })
    }

    /// 转换为走法字符串
    pub fn to_fen_str(&self) -> String {
        format!("{}{}", self.from.to_fen_str(), self.to.to_fen_str())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_str())
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    /// 将死，参数为胜方
    Checkmate(Color),
    /// 困毙：轮走方无子可动但未被将军
    Stalemate,
    /// 同一局面第三次出现判和
    DrawByRepetition,
}

impl GameResult {
    /// 对局是否已结束
    #[inline]
    pub fn is_over(&self) -> bool {
        !matches!(self, GameResult::Ongoing)
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Ongoing => write!(f, "ongoing"),
            GameResult::Checkmate(winner) => write!(f, "checkmate ({} wins)", winner),
            GameResult::Stalemate => write!(f, "stalemate"),
            GameResult::DrawByRepetition => write!(f, "draw by repetition"),
        }
    }
}

/// 引擎错误
///
/// 所有错误都作为返回值显式传出，由 UI 层转换为用户提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 走法不在合法走法集合内
    IllegalMove(Move),
    /// 对局已结束，不再接受走法
    GameOver(GameResult),
    /// 无历史记录可撤销
    NoHistory,
    /// 将/帅已不在棋盘上
    KingNotFound(Color),
    /// 两点不在同一行或同一列
    NotCollinear(Position, Position),
    /// FEN 解析失败
    InvalidFen(String),
    /// 走法字符串解析失败
    InvalidMove(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::IllegalMove(mv) => write!(f, "illegal move: {}", mv),
            EngineError::GameOver(result) => write!(f, "game is over: {}", result),
            EngineError::NoHistory => write!(f, "no move to undo"),
            EngineError::KingNotFound(color) => write!(f, "{} king not found on board", color),
            EngineError::NotCollinear(from, to) => {
                write!(f, "{} and {} do not share a row or column", from, to)
            }
            EngineError::InvalidFen(msg) => write!(f, "invalid FEN: {}", msg),
            EngineError::InvalidMove(s) => write!(f, "invalid move string: {}", s),
        }
    }
}

impl std::error::Error for EngineError {}
