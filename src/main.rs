// ==========================================
// 货运撮合系统 - 命令行入口
// ==========================================
// 子命令: rank / list / status
// 输出: stdout 为 JSON, 日志写 stderr
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use freight_match::api::MatchApi;
use freight_match::config::{ConfigManager, StaticMatchConfig};
use freight_match::db::open_and_init;
use freight_match::domain::MatchStatus;
use freight_match::importer::{load_announcement_pool, load_freight_json};
use freight_match::repository::MatchRepository;
use freight_match::{logging, VERSION};

/// 数据库路径环境变量
const DB_PATH_ENV: &str = "FREIGHT_MATCH_DB_PATH";

#[derive(Parser)]
#[command(name = "freight-match")]
#[command(version)]
#[command(about = "Rank return-trip truck announcements against a freight request")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank a candidate pool for one freight request
    Rank {
        /// Freight request JSON file
        #[arg(long)]
        freight: PathBuf,

        /// Announcement pool (.csv or .json)
        #[arg(long)]
        pool: PathBuf,

        /// Minimum total score (0-100). Uses config value if not specified.
        #[arg(long)]
        min_score: Option<i32>,

        /// SQLite database path (only with --persist; otherwise FREIGHT_MATCH_DB_PATH or the default)
        #[arg(long, requires = "persist")]
        db: Option<PathBuf>,

        /// Persist ranked matches and read config from the database
        #[arg(long)]
        persist: bool,
    },

    /// List persisted matches for a freight request
    List {
        #[arg(long)]
        freight_id: String,

        /// SQLite database path
        #[arg(long, env = DB_PATH_ENV)]
        db: Option<PathBuf>,
    },

    /// Move a persisted match out of PENDING
    Status {
        #[arg(long)]
        freight_id: String,

        #[arg(long)]
        announcement_id: String,

        #[arg(long = "set", value_enum)]
        status: StatusArg,

        /// SQLite database path
        #[arg(long, env = DB_PATH_ENV)]
        db: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Accepted,
    Rejected,
    Expired,
}

impl From<StatusArg> for MatchStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Accepted => MatchStatus::Accepted,
            StatusArg::Rejected => MatchStatus::Rejected,
            StatusArg::Expired => MatchStatus::Expired,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }
    info!(version = VERSION, "货运撮合系统启动");

    match cli.command {
        Commands::Rank {
            freight,
            pool,
            min_score,
            db,
            persist,
        } => run_rank(&freight, &pool, min_score, db, persist).await,
        Commands::List { freight_id, db } => {
            let api = open_db_api(db)?;
            let records = api.list_matches(&freight_id)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Commands::Status {
            freight_id,
            announcement_id,
            status,
            db,
        } => {
            let api = open_db_api(db)?;
            let record = match MatchStatus::from(status) {
                MatchStatus::Accepted => api.accept_match(&freight_id, &announcement_id)?,
                MatchStatus::Rejected => api.reject_match(&freight_id, &announcement_id)?,
                _ => api.expire_match(&freight_id, &announcement_id)?,
            };
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    }
}

async fn run_rank(
    freight_path: &Path,
    pool_path: &Path,
    min_score: Option<i32>,
    db: Option<PathBuf>,
    persist: bool,
) -> anyhow::Result<()> {
    let freight = load_freight_json(freight_path)
        .with_context(|| format!("读取货运需求失败: {}", freight_path.display()))?;
    let candidates = load_announcement_pool(pool_path)
        .with_context(|| format!("读取公告池失败: {}", pool_path.display()))?;

    let matches = if persist {
        open_db_api(db)?
            .find_matches(freight, candidates, min_score)
            .await?
    } else {
        // 不落库: 内存配置 + 内存数据库
        let repo = MatchRepository::new(":memory:")?;
        MatchApi::new(Arc::new(StaticMatchConfig::default()), Arc::new(repo))
            .find_matches(freight, candidates, min_score)
            .await?
    };

    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

/// 打开数据库并构建 API (配置与仓储共享同一连接)
fn open_db_api(db: Option<PathBuf>) -> anyhow::Result<MatchApi<ConfigManager>> {
    let db_path = resolve_db_path(db, std::env::var_os(DB_PATH_ENV).map(PathBuf::from));
    let db_path = db_path.to_string_lossy().to_string();
    info!(db_path = %db_path, "使用数据库");

    let conn = open_and_init(&db_path).with_context(|| format!("无法打开数据库: {}", db_path))?;
    let conn = Arc::new(Mutex::new(conn));

    let config = ConfigManager::from_connection(Arc::clone(&conn))?;
    let repo = MatchRepository::from_connection(conn);
    Ok(MatchApi::new(Arc::new(config), Arc::new(repo)))
}

/// 数据库路径优先级: --db > 环境变量 > 默认路径
fn resolve_db_path(flag: Option<PathBuf>, env: Option<PathBuf>) -> PathBuf {
    flag.or(env).unwrap_or_else(default_db_path)
}

/// 默认数据库路径: 用户数据目录下 freight-match/freight_match.db
fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => {
            let dir = data_dir.join("freight-match");
            // 目录创建失败不中断, 由 open 给出最终错误
            if let Err(e) = std::fs::create_dir_all(&dir) {
                warn!(dir = %dir.display(), error = %e, "数据目录创建失败");
            }
            dir.join("freight_match.db")
        }
        None => PathBuf::from("./freight_match.db"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    const RANK_ARGS: [&str; 6] = [
        "freight-match",
        "rank",
        "--freight",
        "freight.json",
        "--pool",
        "pool.csv",
    ];

    #[test]
    fn test_rank_db_without_persist_is_rejected() {
        let args = RANK_ARGS.iter().copied().chain(["--db", "matches.db"]);
        let err = Cli::try_parse_from(args).err().expect("--db without --persist must fail");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_rank_db_with_persist_is_accepted() {
        let args = RANK_ARGS
            .iter()
            .copied()
            .chain(["--db", "matches.db", "--persist"]);
        let cli = Cli::try_parse_from(args).expect("parse failed");
        match cli.command {
            Commands::Rank { db, persist, .. } => {
                assert!(persist);
                assert_eq!(db, Some(PathBuf::from("matches.db")));
            }
            _ => panic!("expected rank subcommand"),
        }
    }

    #[test]
    fn test_rank_without_db_parses() {
        let cli = Cli::try_parse_from(RANK_ARGS).expect("parse failed");
        assert!(matches!(cli.command, Commands::Rank { db: None, persist: false, .. }));
    }

    #[test]
    fn test_db_path_precedence() {
        let flag = PathBuf::from("flag.db");
        let env = PathBuf::from("env.db");
        assert_eq!(resolve_db_path(Some(flag.clone()), Some(env.clone())), flag);
        assert_eq!(resolve_db_path(None, Some(env.clone())), env);
        assert!(resolve_db_path(None, None).ends_with("freight_match.db"));
    }

    #[test]
    fn test_default_db_path_file_name() {
        let path = default_db_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("freight_match.db"));
    }
}
