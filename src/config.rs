use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 计时范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerScope {
    /// 每道题独立计时，换题时重置
    PerQuestion,
    /// 整场测验共用一个时间预算
    PerSession,
}

impl FromStr for TimerScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_question" | "question" => Ok(TimerScope::PerQuestion),
            "per_session" | "session" => Ok(TimerScope::PerSession),
            _ => Err(()),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 计时时长（秒）
    pub timer_duration_secs: u32,
    /// 计时范围
    pub timer_scope: TimerScope,
    /// 计时器节拍间隔（毫秒）
    pub tick_interval_ms: u64,
    /// 题库存储目录
    pub store_dir: String,
    /// 题库在存储中的键
    pub catalog_key: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer_duration_secs: 10,
            timer_scope: TimerScope::PerQuestion,
            tick_interval_ms: 1000,
            store_dir: "quiz_store".to_string(),
            catalog_key: "quiz_questions".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// 读取 TOML 配置文件（可选），再应用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => {
                Self::load_with(path, |name| std::env::var(name).ok())
            }
            _ => Self::from_env(),
        }
    }

    /// 文件中的值可能被覆盖，校验在覆盖之后统一进行
    fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::read_toml_file(path)?.with_overrides(lookup)
    }

    /// 从 TOML 文件解析配置，缺失的字段使用默认值（不校验）
    fn read_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(config)
    }

    /// 按变量名查找覆盖值
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("QUIZ_TIMER_SECS") {
            self.timer_duration_secs = parse_var("QUIZ_TIMER_SECS", &v, "u32")?;
        }
        if let Some(v) = lookup("QUIZ_TIMER_SCOPE") {
            self.timer_scope = parse_var("QUIZ_TIMER_SCOPE", &v, "per_question|per_session")?;
        }
        if let Some(v) = lookup("QUIZ_TICK_MS") {
            self.tick_interval_ms = parse_var("QUIZ_TICK_MS", &v, "u64")?;
        }
        if let Some(v) = lookup("QUIZ_STORE_DIR") {
            self.store_dir = v;
        }
        if let Some(v) = lookup("QUIZ_CATALOG_KEY") {
            self.catalog_key = v;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timer_duration_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timer_duration_secs".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_interval_ms".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.catalog_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog_key".to_string(),
                reason: "不能为空".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = Config::default()
            .with_overrides(lookup(&[
                ("QUIZ_TIMER_SECS", "5"),
                ("QUIZ_TIMER_SCOPE", "per_session"),
                ("VERBOSE_LOGGING", "true"),
            ]))
            .unwrap();
        assert_eq!(config.timer_duration_secs, 5);
        assert_eq!(config.timer_scope, TimerScope::PerSession);
        assert!(config.verbose_logging);
        assert_eq!(config.catalog_key, "quiz_questions");
    }

    #[test]
    fn bad_number_is_reported_with_variable_name() {
        let err = Config::default()
            .with_overrides(lookup(&[("QUIZ_TIMER_SECS", "ten")]))
            .unwrap_err();
        match err {
            ConfigError::EnvVarParseFailed { var_name, .. } => {
                assert_eq!(var_name, "QUIZ_TIMER_SECS")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = Config::default()
            .with_overrides(lookup(&[("QUIZ_TIMER_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            timer_duration_secs = 30
            timer_scope = "per_session"
            "#,
        )
        .unwrap();
        assert_eq!(config.timer_duration_secs, 30);
        assert_eq!(config.timer_scope, TimerScope::PerSession);
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.store_dir, "quiz_store");
    }

    fn write_toml(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "quiz_config_{}_{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn env_override_rescues_zero_duration_in_file() {
        let path = write_toml("rescued", "timer_duration_secs = 0\n");
        let config = Config::load_with(&path, lookup(&[("QUIZ_TIMER_SECS", "5")])).unwrap();
        assert_eq!(config.timer_duration_secs, 5);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn zero_duration_in_file_without_override_is_rejected() {
        let path = write_toml("unrescued", "timer_duration_secs = 0\n");
        let err = Config::load_with(&path, lookup(&[])).unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "timer_duration_secs"),
            other => panic!("unexpected error: {other}"),
        }
        let _ = std::fs::remove_file(path);
    }
}
