//! subst-cli：盘符映射命令行工具
//!
//! 目前支持：
//! - `list`：列出 A: ~ Z: 的状态与映射的文件夹（`--json` 输出快照）
//! - `assign`：把本地文件夹分配给盘符
//! - `clear`：解除盘符的映射
//! - `show`：查看单个盘符

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use subst_core::{
    Drive, DriveName, DriveRegistry, DriveSnapshot, DriveStatus, SystemDriveService,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "subst-cli")]
#[command(version)]
#[command(about = "盘符映射工具（为空闲盘符分配本地文件夹）", long_about = None)]
struct Cli {
    /// 输出调试日志（忽略 RUST_LOG）
    #[arg(short = 'v', long = "verbose", global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出所有盘符
    List(ListArgs),
    /// 把文件夹分配给盘符（物理磁盘/光驱不可分配）
    Assign(AssignArgs),
    /// 解除盘符的映射
    Clear(DriveArgs),
    /// 查看单个盘符
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// 以 JSON 输出
    #[arg(long = "json", default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct AssignArgs {
    /// 盘符（例如 E: 或 E 或 E:\\）
    drive: String,

    /// 要分配的文件夹（相对路径按当前目录解析）
    folder: PathBuf,
}

#[derive(Args, Debug)]
struct DriveArgs {
    /// 盘符（例如 E: 或 E 或 E:\\）
    drive: String,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// 盘符（例如 E: 或 E 或 E:\\）
    drive: String,

    /// 以 JSON 输出
    #[arg(long = "json", default_value_t = false)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let res = match cli.command {
        Commands::List(args) => list_drives(args),
        Commands::Assign(args) => assign_drive(args),
        Commands::Clear(args) => clear_drive(args),
        Commands::Show(args) => show_drive(args),
    };

    if let Err(e) = res {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 规范化盘符参数：`e` / `E` / `e:` / `E:\` -> `E:`，其余交给严格校验
fn normalize_drive_arg(input: &str) -> Result<DriveName, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("drive 不能为空".to_string());
    }
    let bare = s.strip_suffix('\\').unwrap_or(s);
    let bare = bare.strip_suffix(':').unwrap_or(bare);
    let mut chars = bare.chars();
    let name = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            DriveName::from_letter(c.to_ascii_uppercase())
        }
        _ => DriveName::parse(s),
    };
    name.map_err(|e| e.to_string())
}

fn absolute_folder(folder: &Path) -> Result<PathBuf, String> {
    if folder.is_absolute() {
        return Ok(folder.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| format!("无法获取当前目录: {}", e))?;
    Ok(cwd.join(folder))
}

/// 分配前的文件夹检查：不存在的文件夹直接报错，不交给引擎（引擎会走解除分支）
fn existing_folder(folder: &Path) -> Result<PathBuf, String> {
    let folder = absolute_folder(folder)?;
    if !folder.is_dir() {
        return Err(format!("文件夹不存在: {}", folder.display()));
    }
    Ok(folder)
}

fn open_drive(input: &str) -> Result<Drive, String> {
    let name = normalize_drive_arg(input)?;
    Ok(Drive::with_name(
        Arc::new(SystemDriveService::default()),
        name,
    ))
}

/// 与图形界面一致：物理磁盘/光驱不提供分配
fn ensure_selectable(drive: &Drive) -> Result<(), String> {
    if drive.status() == DriveStatus::Disable {
        return Err(format!(
            "{} 是物理磁盘或光驱，不能分配文件夹",
            drive.name()
        ));
    }
    Ok(())
}

fn list_drives(args: ListArgs) -> Result<(), String> {
    let registry = DriveRegistry::system();
    let rows = registry.snapshot();
    if args.json {
        return print_json(&rows);
    }
    print_header();
    for row in &rows {
        print_row(row);
    }
    Ok(())
}

fn show_drive(args: ShowArgs) -> Result<(), String> {
    let drive = open_drive(&args.drive)?;
    let row = drive.snapshot();
    if args.json {
        return print_json(&row);
    }
    print_header();
    print_row(&row);
    Ok(())
}

fn assign_drive(args: AssignArgs) -> Result<(), String> {
    let mut drive = open_drive(&args.drive)?;
    ensure_selectable(&drive)?;

    let folder = existing_folder(&args.folder)?;

    let mut events = drive.subscribe();
    drive.assign(&folder);
    while let Ok(ev) = events.try_recv() {
        debug!(drive = %ev.drive, field = ?ev.field, "drive changed");
    }

    print_header();
    print_row(&drive.snapshot());
    if drive.status() != DriveStatus::Busy {
        return Err(format!(
            "分配未生效：{} 当前状态为 {}",
            drive.name(),
            drive.status()
        ));
    }
    Ok(())
}

fn clear_drive(args: DriveArgs) -> Result<(), String> {
    let mut drive = open_drive(&args.drive)?;
    ensure_selectable(&drive)?;

    let mut events = drive.subscribe();
    drive.clear();
    while let Ok(ev) = events.try_recv() {
        debug!(drive = %ev.drive, field = ?ev.field, "drive changed");
    }

    print_header();
    print_row(&drive.snapshot());
    if drive.status() == DriveStatus::Busy {
        return Err(format!("解除未生效：{} 仍然有映射", drive.name()));
    }
    Ok(())
}

fn print_header() {
    println!("{:<6} {:<8} {}", "Drive", "Status", "Assigned folder");
}

fn print_row(row: &DriveSnapshot) {
    println!("{:<6} {:<8} {}", row.name, row.status, row.description);
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let s = serde_json::to_string_pretty(value).map_err(|e| format!("序列化失败: {}", e))?;
    println!("{s}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_drive_arguments() {
        for input in ["e", "E", "e:", "E:", "E:\\", " E: "] {
            assert_eq!(
                normalize_drive_arg(input).map(|n| n.to_string()),
                Ok("E:".to_string()),
                "{input:?}"
            );
        }
    }

    #[test]
    fn rejects_bad_drive_arguments() {
        for input in ["", "1", "1:", "AB:", "E:\\dir"] {
            assert!(normalize_drive_arg(input).is_err(), "{input:?}");
        }
    }

    #[test]
    fn relative_folder_is_resolved_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            absolute_folder(Path::new("data")).unwrap(),
            cwd.join("data")
        );
        let abs = cwd.join("x");
        assert_eq!(absolute_folder(&abs).unwrap(), abs);
    }

    #[test]
    fn assign_requires_an_existing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(existing_folder(dir.path()).unwrap(), dir.path());

        let missing = dir.path().join("missing");
        let err = existing_folder(&missing).unwrap_err();
        assert!(err.contains("文件夹不存在"), "{err}");

        // 普通文件也不能作为映射目标
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(existing_folder(&file).is_err());
    }

    #[test]
    fn cli_parses_assign() {
        let cli = Cli::try_parse_from(["subst-cli", "assign", "E", "some/dir"]).unwrap();
        match cli.command {
            Commands::Assign(args) => {
                assert_eq!(args.drive, "E");
                assert_eq!(args.folder, PathBuf::from("some/dir"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
