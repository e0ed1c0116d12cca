use std::fs;
use crate::config_gen;

use std::fs::OpenOptions;
use std::io::Write;
use env_logger::{Builder, Target};
use cosmic_core::config::SystemConfig;

pub const CONFIG_PATH: &str = "config.toml";

pub fn init(is_tui: bool) {
    config_gen::ensure_config_exists(CONFIG_PATH);

    if let Err(e) = cosmic_shared::config::init(CONFIG_PATH) {
        eprintln!("Config load warning: {}", e);
    }

    init_logger(is_tui);
}

fn init_logger(is_tui: bool) {
    let sys_cfg: SystemConfig = cosmic_shared::config::get("system");
    if let Err(e) = fs::create_dir_all(&sys_cfg.log_path) {
        eprintln!("Failed to create log dir: {}", e);
    }

    let log_file_path = std::path::Path::new(&sys_cfg.log_path).join("cosmic.log");

    struct TeeWriter<W1, W2>(W1, W2);
    impl<W1: Write, W2: Write> Write for TeeWriter<W1, W2> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = self.0.write(buf)?;
            self.1.write_all(&buf[..n])?;
            Ok(n)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            self.0.flush()?;
            self.1.flush()?;
            Ok(())
        }
    }

    let mut builder = Builder::from_env(env_logger::Env::default().default_filter_or(&sys_cfg.log_level));

    match OpenOptions::new().create(true).append(true).open(&log_file_path) {
        Ok(log_file) if is_tui => {
            builder.target(Target::Pipe(Box::new(log_file)));
        }
        Ok(log_file) => {
            builder.target(Target::Pipe(Box::new(TeeWriter(std::io::stdout(), log_file))));
        }
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_file_path, e);
            // 终端界面下日志不能写到屏幕上
            if is_tui {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    builder.init();
}
