use std::sync::RwLock;
use std::path::Path;
use std::fs;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
pub use toml::Table;

static GLOBAL_CONFIG: OnceCell<RwLock<Table>> = OnceCell::new();

/// 读取配置文件并安装为进程内唯一的配置表
pub fn init<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();

    let content = if path.exists() {
        log::info!("Loading config from {:?}", path);
        fs::read_to_string(path)?
    } else {
        log::warn!("Config file not found at {:?}, using defaults.", path);
        String::new()
    };

    GLOBAL_CONFIG.set(RwLock::new(parse(&content)))
        .map_err(|_| anyhow::anyhow!("Config already initialized"))?;

    Ok(())
}

/// 语法错误时退回空表，所有分节都会使用默认值
pub fn parse(content: &str) -> Table {
    toml::from_str(content).unwrap_or_else(|e| {
        log::error!("Config syntax error: {}, using empty config.", e);
        Table::new()
    })
}

/// 从任意配置表中取出一个分节
pub fn section<T: DeserializeOwned + Default>(table: &Table, key: &str) -> T {
    match table.get(key) {
        Some(value) => value.clone().try_into().unwrap_or_else(|e| {
            log::warn!("Config section '[{}]' mismatch: {}. Using default.", key, e);
            T::default()
        }),
        None => T::default(),
    }
}

pub fn get<T: DeserializeOwned + Default>(key: &str) -> T {
    let Some(store) = GLOBAL_CONFIG.get() else {
        log::warn!("Config not initialized, section '[{}]' uses defaults.", key);
        return T::default();
    };

    match store.read() {
        Ok(guard) => section(&guard, key),
        Err(_) => {
            log::error!("Config lock poisoned, section '[{}]' uses defaults.", key);
            T::default()
        }
    }
}

pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
