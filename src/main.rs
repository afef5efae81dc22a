//! Xiangqi 规则引擎 CLI
//!
//! 命令行界面，用于查询走法与推演局面
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信

use clap::{Parser, Subcommand};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use xiangqi_engine::{legal_moves_from_fen, Color, Game, Move};

#[derive(Parser)]
#[command(name = "xiangqi-engine")]
#[command(about = "Xiangqi rule engine with FEN interface", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取当前轮走方的合法走法
    Moves {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 执行走法并输出新局面
    Apply {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// 走法（如 e9e8）
        #[arg(long = "move")]
        mv: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 查询局面状态（回合、将军、终局）
    State {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    fen: String,
    #[serde(default, rename = "move")]
    mv: Option<String>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_check: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_moves(moves: Vec<String>) -> Self {
        Self {
            ok: true,
            total: Some(moves.len()),
            legal_moves: Some(moves),
            ..Default::default()
        }
    }

    fn success_apply(fen: String, result: String) -> Self {
        Self {
            ok: true,
            fen: Some(fen),
            result: Some(result),
            ..Default::default()
        }
    }

    fn success_state(game: &Game) -> Self {
        Self {
            ok: true,
            fen: Some(game.to_fen()),
            turn: Some(color_to_str(game.turn()).to_string()),
            in_check: Some(game.board().is_in_check(game.turn())),
            result: Some(game.result().to_string()),
            total: Some(game.legal_moves().len()),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn color_to_str(color: Color) -> &'static str {
    if color == Color::Red {
        "red"
    } else {
        "black"
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen, json } => match legal_moves_from_fen(&fen) {
            Ok(moves) => {
                if json {
                    let response = ServerResponse::success_moves(moves);
                    println!("{}", serde_json::to_string_pretty(&response).unwrap());
                } else {
                    println!("Legal moves ({}):", moves.len());
                    for mv in &moves {
                        println!("  {}", mv);
                    }
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Apply { fen, mv, json } => match apply_move(&fen, &mv) {
            Ok((new_fen, result)) => {
                if json {
                    let response = ServerResponse::success_apply(new_fen, result);
                    println!("{}", serde_json::to_string_pretty(&response).unwrap());
                } else {
                    println!("{}", new_fen);
                    println!("Result: {}", result);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::State { fen, json } => match Game::from_fen(&fen) {
            Ok(game) => {
                if json {
                    let response = ServerResponse::success_state(&game);
                    println!("{}", serde_json::to_string_pretty(&response).unwrap());
                } else {
                    println!("Turn: {}", game.turn());
                    println!("In check: {}", game.board().is_in_check(game.turn()));
                    println!("Result: {}", game.result());
                    println!("Legal moves: {}", game.legal_moves().len());
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Server => {
            run_server();
        }
    }
}

/// 执行走法，返回新 FEN 与对局结果
fn apply_move(fen: &str, move_str: &str) -> Result<(String, String), String> {
    let mut game = Game::from_fen(fen).map_err(|e| e.to_string())?;
    let mv = Move::from_fen_str(move_str).map_err(|e| e.to_string())?;
    let result = game.apply_move(mv).map_err(|e| e.to_string())?;
    Ok((game.to_fen(), result.to_string()))
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        debug!("request: {}", line);

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", serde_json::to_string(&response).unwrap());
                let _ = stdout.flush();
                continue;
            }
        };

        // 处理命令
        let response = match request.cmd.as_str() {
            "moves" => handle_moves_request(&request),
            "apply" => handle_apply_request(&request),
            "state" => handle_state_request(&request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        // 返回响应
        println!("{}", serde_json::to_string(&response).unwrap());
        let _ = stdout.flush();
    }
}

/// 处理 moves 命令
fn handle_moves_request(request: &ServerRequest) -> ServerResponse {
    match legal_moves_from_fen(&request.fen) {
        Ok(moves) => ServerResponse::success_moves(moves),
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}

/// 处理 apply 命令
fn handle_apply_request(request: &ServerRequest) -> ServerResponse {
    let move_str = match request.mv.as_deref() {
        Some(s) => s,
        None => return ServerResponse::error("Missing move"),
    };
    match apply_move(&request.fen, move_str) {
        Ok((fen, result)) => ServerResponse::success_apply(fen, result),
        Err(e) => ServerResponse::error(&e),
    }
}

/// 处理 state 命令
fn handle_state_request(request: &ServerRequest) -> ServerResponse {
    match Game::from_fen(&request.fen) {
        Ok(game) => ServerResponse::success_state(&game),
        Err(e) => ServerResponse::error(&format!("Invalid FEN: {}", e)),
    }
}
