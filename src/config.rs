use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::{AppError, AppResult, ConfigError};
use crate::workflow::quiz_session::clamp_time_limit;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待解析的题目文件
    pub input_file: Option<String>,
    /// 答题时长（分钟），不设置则按每题 2 分钟计算
    pub time_limit_minutes: Option<u32>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 解析结果（QuizData）保存位置
    pub quiz_data_file: Option<String>,
    /// 成绩单保存位置
    pub report_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: None,
            time_limit_minutes: None,
            verbose_logging: false,
            output_log_file: "quiz_log.txt".to_string(),
            quiz_data_file: None,
            report_file: None,
        }
    }
}

impl Config {
    /// 默认值 -> TOML 配置文件（QUIZ_CONFIG_FILE）-> 环境变量
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("QUIZ_CONFIG_FILE") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(&path_str, e))?;
        Self::from_toml_str(&content).map_err(|e| AppError::toml_parse_failed(&path_str, e))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用 `lookup` 给出的变量覆盖已有配置，无法解析的值直接报错
    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        Ok(Self {
            input_file: lookup("QUIZ_INPUT_FILE").or(self.input_file),
            time_limit_minutes: parse_var(&lookup, "QUIZ_TIME_LIMIT_MINUTES", "u32")?
                .or(self.time_limit_minutes),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            quiz_data_file: lookup("QUIZ_DATA_FILE").or(self.quiz_data_file),
            report_file: lookup("QUIZ_REPORT_FILE").or(self.report_file),
        })
    }

    /// 命令行第一个参数优先作为输入文件
    pub fn with_input_file(mut self, input_file: Option<String>) -> Self {
        if input_file.is_some() {
            self.input_file = input_file;
        }
        self
    }

    /// 截断到 [5, 180] 之后的时长
    pub fn effective_time_limit(&self) -> Option<u32> {
        self.time_limit_minutes.map(clamp_time_limit)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &'static str,
) -> AppResult<Option<T>> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type,
            }
            .into()),
        },
    }
}
