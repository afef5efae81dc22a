//! 测试局面库
//!
//! 提供命名的 FEN 测试局面，方便测试和调试
//!
//! 命名规范:
//! - START: 初始局面
//! - MID_n: 中局
//! - CHECK_n: 将军测试
//! - MATE_n: 杀棋测试
//! - 其余按场景命名

// =============================================================================
// 开局与中局
// =============================================================================

/// 标准初始局面
pub const START: &str = crate::fen::START_FEN;

/// 中炮对屏风马的早期中局：红炮五、马七，黑马已起
pub const MID_1: &str =
    "rheakae1r/9/1c4hc1/p1p1p1p1p/9/9/P1P1P1P1P/4C1HC1/9/RHEAKAE1R b";

// =============================================================================
// 将军与杀棋
// =============================================================================

/// 红车在黑将脸上照将，黑方不能吃（吃则将帅对脸）
pub const CHECK_1: &str = "4k4/4R4/9/9/9/9/9/9/9/4K4 b";

/// 双车杀：中路车照将，底线车封锁九宫，红方无解
pub const MATE_1: &str = "4k4/9/9/9/9/4r4/9/9/9/r3K4 r";

/// 困毙：红帅未被将军但三个落点分别被对脸、车、卒封死
pub const STALEMATE_1: &str = "3k5/9/9/9/9/5r3/9/4p4/9/4K4 r";

// =============================================================================
// 特殊走法规则
// =============================================================================

/// 塞象眼：黑卒在 (8,1)，红相不能从 (9,2) 飞 (7,0)
pub const ELEPHANT_EYE_BLOCKED: &str = "3k5/9/9/9/9/9/9/9/1p7/2E1K4 r";

/// 炮打隔子：红炮 (7,1) 隔着 (4,1) 的兵吃 (0,1) 的黑车
pub const CANNON_SCREEN_CAPTURE: &str = "1r1k5/9/9/9/1P7/9/9/1C7/9/4K4 r";

/// 将帅对脸牵制：(5,4) 的红马一步都不能动
pub const KING_FACE_OFF_PIN: &str = "4k4/9/9/9/9/4H4/9/9/9/4K4 r";

/// 双车来回平移可触发三次重复判和的底板局面
pub const REPETITION_SHUFFLE: &str = "3k5/9/9/8r/9/R8/9/9/9/4K4 r";
