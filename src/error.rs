use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 当前阶段不允许该操作
    #[error("状态错误: {0}")]
    State(#[from] StateError),
    /// 会话任务已停止
    #[error("会话已关闭")]
    SessionClosed,
}

/// 输入校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 参与者名字为空
    #[error("参与者名字不能为空")]
    EmptyParticipantName,
    /// 题库为空
    #[error("题库不能为空")]
    EmptyCatalog,
    /// 选项索引超出范围
    #[error("选项索引 {index} 超出范围 [0, {option_count})")]
    OptionOutOfRange { index: usize, option_count: usize },
    /// 计时时长为 0
    #[error("计时时长必须大于 0")]
    ZeroDuration,
    /// 题目不合法
    #[error("第 {index} 题不合法: {reason}")]
    InvalidQuestion { index: usize, reason: String },
}

/// 状态错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// 当前阶段不允许执行该操作
    #[error("阶段 {phase} 不允许执行 {operation}")]
    InvalidPhase {
        operation: &'static str,
        phase: &'static str,
    },
}

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 读写失败
    #[error("读写键 {key} 失败: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// 键不合法
    #[error("键不合法: {0}")]
    InvalidKey(String),
}

/// 题库错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 内置题库为空（程序缺陷）
    #[error("内置题库为空")]
    EmptyBuiltIn,
    /// 内置题目不合法（程序缺陷）
    #[error("内置题库不合法: {0}")]
    InvalidBuiltIn(#[source] ValidationError),
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyCatalog => CatalogError::EmptyBuiltIn,
            other => CatalogError::InvalidBuiltIn(other),
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建阶段错误
    pub fn invalid_phase(operation: &'static str, phase: &'static str) -> Self {
        AppError::State(StateError::InvalidPhase { operation, phase })
    }

    /// 创建选项越界错误
    pub fn option_out_of_range(index: usize, option_count: usize) -> Self {
        AppError::Validation(ValidationError::OptionOutOfRange {
            index,
            option_count,
        })
    }

    /// 是否为校验错误
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// 是否为状态错误
    pub fn is_state(&self) -> bool {
        matches!(self, AppError::State(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
