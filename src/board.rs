//! 棋盘与走法生成
//!
//! 使用 90 格数组存储棋子。走法生成分两层：先按棋子走法规则枚举
//! 伪合法走法，再通过克隆模拟过滤掉送将与将帅对脸的走法。

use crate::fen::{parse_fen, START_FEN};
use crate::types::{Color, EngineError, Move, PieceType, Position};

/// 棋盘上的棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub position: Position,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color, position: Position) -> Self {
        Piece {
            piece_type,
            color,
            position,
        }
    }
}

lazy_static::lazy_static! {
    /// 初始局面，解析一次后按需克隆
    static ref OPENING: Board = Board::from_fen(START_FEN)
        .expect("start position FEN must parse");
}

/// 棋盘（10 行 x 9 列）
///
/// 只负责棋子占位，回合与历史由对局状态机管理
#[derive(Clone)]
pub struct Board {
    /// 90 个格子的棋子数组
    squares: [Option<Piece>; 90],
    /// 缓存红方帅的位置
    red_king_pos: Option<Position>,
    /// 缓存黑方将的位置
    black_king_pos: Option<Position>,
}

impl Board {
    /// 空棋盘
    pub fn empty() -> Board {
        Board {
            squares: [None; 90],
            red_king_pos: None,
            black_king_pos: None,
        }
    }

    /// 标准开局棋盘
    pub fn opening() -> Board {
        OPENING.clone()
    }

    /// 从 FEN 字符串创建棋盘（忽略回合字段）
    pub fn from_fen(fen: &str) -> Result<Board, EngineError> {
        let state = parse_fen(fen)?;
        let mut board = Board::empty();
        for piece in state.pieces {
            board.place_piece(piece);
        }
        Ok(board)
    }

    /// 获取某位置的棋子
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()].as_ref()
    }

    /// 检查位置是否有棋子
    #[inline]
    fn has_piece(&self, pos: Position) -> bool {
        pos.is_valid() && self.squares[pos.to_index()].is_some()
    }

    /// 放置棋子，更新将帅位置缓存
    pub fn place_piece(&mut self, piece: Piece) {
        if piece.piece_type == PieceType::King {
            match piece.color {
                Color::Red => self.red_king_pos = Some(piece.position),
                Color::Black => self.black_king_pos = Some(piece.position),
            }
        }
        self.squares[piece.position.to_index()] = Some(piece);
    }

    /// 移除棋子，更新将帅位置缓存
    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        let removed = self.squares[pos.to_index()].take();
        if let Some(piece) = removed {
            if piece.piece_type == PieceType::King {
                match piece.color {
                    Color::Red => self.red_king_pos = None,
                    Color::Black => self.black_king_pos = None,
                }
            }
        }
        removed
    }

    /// 获取所有棋子，可按颜色过滤
    pub fn pieces(&self, color: Option<Color>) -> Vec<&Piece> {
        self.squares
            .iter()
            .filter_map(|p| p.as_ref())
            .filter(|p| color.map_or(true, |c| p.color == c))
            .collect()
    }

    /// 将帅位置（缓存）
    #[inline]
    fn king_pos(&self, color: Color) -> Option<Position> {
        match color {
            Color::Red => self.red_king_pos,
            Color::Black => self.black_king_pos,
        }
    }

    /// 找到将帅的位置
    ///
    /// 将帅已被吃时返回 `KingNotFound`，正常流程中只会在终局后出现
    pub fn find_king(&self, color: Color) -> Result<Position, EngineError> {
        self.king_pos(color).ok_or(EngineError::KingNotFound(color))
    }

    /// 统计两点之间（不含端点）的棋子数
    ///
    /// 两点必须同行或同列，否则返回 `NotCollinear`
    pub fn count_pieces_between(
        &self,
        from: Position,
        to: Position,
    ) -> Result<usize, EngineError> {
        if from.row != to.row && from.col != to.col {
            return Err(EngineError::NotCollinear(from, to));
        }
        let dr = (to.row - from.row).signum();
        let dc = (to.col - from.col).signum();
        let mut count = 0;
        let mut pos = from.offset(dr, dc);
        while pos != to {
            if self.has_piece(pos) {
                count += 1;
            }
            pos = pos.offset(dr, dc);
        }
        Ok(count)
    }

    /// 执行走法，返回被吃的棋子
    ///
    /// 不做合法性校验，调用方（对局状态机）保证走法合法
    pub fn make_move(&mut self, mv: Move) -> Option<Piece> {
        let mut piece = self.remove_piece(mv.from)?;
        let captured = self.remove_piece(mv.to);
        piece.position = mv.to;
        self.place_piece(piece);
        captured
    }

    /// 撤销走法，恢复被吃的棋子
    pub fn undo_move(&mut self, mv: Move, captured: Option<Piece>) {
        if let Some(mut piece) = self.remove_piece(mv.to) {
            piece.position = mv.from;
            self.place_piece(piece);
        }
        if let Some(cap) = captured {
            self.place_piece(cap);
        }
    }

    #[inline]
    fn can_move_to(&self, piece: &Piece, pos: Position) -> bool {
        if !pos.is_valid() {
            return false;
        }
        match self.piece_at(pos) {
            None => true,
            Some(target) => target.color != piece.color,
        }
    }

    /// 单个棋子的伪合法目标位置
    pub fn piece_moves(&self, piece: &Piece) -> Vec<Position> {
        match piece.piece_type {
            PieceType::King => self.king_moves(piece),
            PieceType::Advisor => self.advisor_moves(piece),
            PieceType::Elephant => self.elephant_moves(piece),
            PieceType::Horse => self.horse_moves(piece),
            PieceType::Rook => self.rook_moves(piece),
            PieceType::Cannon => self.cannon_moves(piece),
            PieceType::Pawn => self.pawn_moves(piece),
        }
    }

    fn king_moves(&self, piece: &Piece) -> Vec<Position> {
        let mut moves = Vec::with_capacity(4);
        let pos = piece.position;

        // 帅在九宫内走直线一步；将帅对脸由合法性过滤处理
        let directions: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

        for (dr, dc) in directions {
            let new_pos = pos.offset(dr, dc);
            if new_pos.is_in_palace(piece.color) && self.can_move_to(piece, new_pos) {
                moves.push(new_pos);
            }
        }

        moves
    }

    fn advisor_moves(&self, piece: &Piece) -> Vec<Position> {
        let mut moves = Vec::with_capacity(4);
        let pos = piece.position;

        // 士在九宫内走斜线一步
        let directions: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

        for (dr, dc) in directions {
            let new_pos = pos.offset(dr, dc);
            if new_pos.is_in_palace(piece.color) && self.can_move_to(piece, new_pos) {
                moves.push(new_pos);
            }
        }

        moves
    }

    fn elephant_moves(&self, piece: &Piece) -> Vec<Position> {
        let mut moves = Vec::with_capacity(4);
        let pos = piece.position;

        // 象走田字，象眼被塞或过河均不可走
        let directions: [((i8, i8), (i8, i8)); 4] = [
            ((2, 2), (1, 1)),
            ((2, -2), (1, -1)),
            ((-2, 2), (-1, 1)),
            ((-2, -2), (-1, -1)),
        ];

        for ((dr, dc), (er, ec)) in directions {
            let new_pos = pos.offset(dr, dc);
            let eye_pos = pos.offset(er, ec);

            if !new_pos.is_on_own_side(piece.color) {
                continue;
            }
            if self.has_piece(eye_pos) {
                continue;
            }
            if new_pos.is_valid() && self.can_move_to(piece, new_pos) {
                moves.push(new_pos);
            }
        }

        moves
    }

    fn horse_moves(&self, piece: &Piece) -> Vec<Position> {
        let mut moves = Vec::with_capacity(8);
        let pos = piece.position;

        // 马走日字，马腿被蹩不可走；目标格占位不影响路径
        let directions: [((i8, i8), (i8, i8)); 8] = [
            ((2, 1), (1, 0)),
            ((2, -1), (1, 0)),
            ((-2, 1), (-1, 0)),
            ((-2, -1), (-1, 0)),
            ((1, 2), (0, 1)),
            ((1, -2), (0, -1)),
            ((-1, 2), (0, 1)),
            ((-1, -2), (0, -1)),
        ];

        for ((dr, dc), (lr, lc)) in directions {
            let new_pos = pos.offset(dr, dc);
            let leg_pos = pos.offset(lr, lc);

            if self.has_piece(leg_pos) {
                continue;
            }
            if new_pos.is_valid() && self.can_move_to(piece, new_pos) {
                moves.push(new_pos);
            }
        }

        moves
    }

    fn rook_moves(&self, piece: &Piece) -> Vec<Position> {
        let mut moves = Vec::with_capacity(17);
        let pos = piece.position;

        // 车走直线任意距离，遇第一个棋子停下，是敌子则可吃
        let directions: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

        for (dr, dc) in directions {
            let mut new_pos = pos.offset(dr, dc);
            while new_pos.is_valid() {
                match self.piece_at(new_pos) {
                    None => {
                        moves.push(new_pos);
                    }
                    Some(target) => {
                        if target.color != piece.color {
                            moves.push(new_pos);
                        }
                        break;
                    }
                }
                new_pos = new_pos.offset(dr, dc);
            }
        }

        moves
    }

    fn cannon_moves(&self, piece: &Piece) -> Vec<Position> {
        let mut moves = Vec::with_capacity(17);
        let pos = piece.position;

        // 炮平移时路径必须全空，吃子时恰好隔一个炮架
        let directions: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

        for (dr, dc) in directions {
            let mut new_pos = pos.offset(dr, dc);
            let mut found_screen = false;

            while new_pos.is_valid() {
                match self.piece_at(new_pos) {
                    None => {
                        if !found_screen {
                            moves.push(new_pos);
                        }
                    }
                    Some(target) => {
                        if !found_screen {
                            found_screen = true;
                        } else {
                            if target.color != piece.color {
                                moves.push(new_pos);
                            }
                            break;
                        }
                    }
                }
                new_pos = new_pos.offset(dr, dc);
            }
        }

        moves
    }

    fn pawn_moves(&self, piece: &Piece) -> Vec<Position> {
        let mut moves = Vec::with_capacity(3);
        let pos = piece.position;

        let forward: i8 = if piece.color == Color::Red { -1 } else { 1 };
        let crossed_river = !pos.is_on_own_side(piece.color);

        // 向前一步，永不后退
        let forward_pos = pos.offset(forward, 0);
        if forward_pos.is_valid() && self.can_move_to(piece, forward_pos) {
            moves.push(forward_pos);
        }

        // 过河后可以左右平移
        if crossed_river {
            for dc in [-1, 1] {
                let side_pos = pos.offset(0, dc);
                if side_pos.is_valid() && self.can_move_to(piece, side_pos) {
                    moves.push(side_pos);
                }
            }
        }

        moves
    }

    /// 某方的全部伪合法走法
    ///
    /// 每次调用重新枚举，符合几何与占位规则但未过滤送将
    pub fn pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(50);
        for square in self.squares.iter() {
            if let Some(piece) = square {
                if piece.color != color {
                    continue;
                }
                for to in self.piece_moves(piece) {
                    moves.push(Move::new(piece.position, to));
                }
            }
        }
        moves
    }

    /// 检查某方是否被将军
    ///
    /// 枚举对方全部伪合法走法，看是否有走法落在己方将帅所在格
    pub fn is_in_check(&self, color: Color) -> bool {
        let king_pos = match self.king_pos(color) {
            Some(pos) => pos,
            None => return true, // 没有将就是已被将死
        };
        self.pseudo_legal_moves(color.opposite())
            .iter()
            .any(|mv| mv.to == king_pos)
    }

    /// 将帅是否在同一列上无遮挡对脸
    pub fn kings_facing(&self) -> bool {
        let (red, black) = match (self.red_king_pos, self.black_king_pos) {
            (Some(r), Some(b)) => (r, b),
            _ => return false,
        };
        red.col == black.col && matches!(self.count_pieces_between(red, black), Ok(0))
    }

    /// 某方的全部合法走法
    ///
    /// 逐个克隆棋盘模拟执行，丢弃走后仍被将军或造成将帅对脸的走法
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(50);
        for mv in self.pseudo_legal_moves(color) {
            let mut next = self.clone();
            next.make_move(mv);
            if next.is_in_check(color) || next.kings_facing() {
                continue;
            }
            moves.push(mv);
        }
        moves
    }

    /// 是否被将死：被将军且无合法走法
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && self.legal_moves(color).is_empty()
    }

    /// 是否被困毙：未被将军但无合法走法
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && self.legal_moves(color).is_empty()
    }
}

/// 从 FEN 获取当前轮走方的所有合法走法（字符串格式）
pub fn legal_moves_from_fen(fen: &str) -> Result<Vec<String>, EngineError> {
    let state = parse_fen(fen)?;
    let board = Board::from_fen(fen)?;
    Ok(board
        .legal_moves(state.turn)
        .iter()
        .map(|m| m.to_fen_str())
        .collect())
}
