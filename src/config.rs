use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ValidationError;
use crate::export::DecimalSeparator;
use crate::i18n::Language;
use crate::integration::IntegrationSettings;
use crate::vessel::VesselInput;

pub const CONFIG_FILE: &str = "config.toml";

/// CSV 소수점 선택. Auto 는 언어를 따른다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorChoice {
    #[default]
    Auto,
    Point,
    Comma,
}

impl SeparatorChoice {
    pub fn resolve(self, language: Language) -> DecimalSeparator {
        match self {
            SeparatorChoice::Auto => language.decimal_separator(),
            SeparatorChoice::Point => DecimalSeparator::Point,
            SeparatorChoice::Comma => DecimalSeparator::Comma,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// auto / en / de / ko
    pub language: String,
    pub decimal_separator: SeparatorChoice,
    /// 적분 간격 [mm]
    pub step_mm: f64,
    /// 언어팩 디렉터리
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_dir: Option<String>,
    /// 마지막으로 계산한 입력값. 폼과 프롬프트의 기본값이 된다.
    pub last_input: VesselInput,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            decimal_separator: SeparatorChoice::Auto,
            step_mm: IntegrationSettings::default().step_mm(),
            locale_dir: None,
            last_input: VesselInput::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_FILE))
}

/// 지정한 경로에서 설정을 읽는다. 파일이 없으면 기본값으로 만든다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 저장된 `step_mm` 을 검증한다. 손으로 고친 설정 파일의 잘못된 간격은 여기서 걸린다.
    pub fn integration_settings(&self) -> Result<IntegrationSettings, ValidationError> {
        IntegrationSettings::new(self.step_mm)
    }
}
