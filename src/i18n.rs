use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::export::DecimalSeparator;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const APP_TITLE: &str = "general.app_title";
    pub const ERROR_PREFIX: &str = "general.error_prefix";

    pub const LABEL_VESSEL_TYPE: &str = "form.vessel_type";
    pub const LABEL_HEAD_TYPE: &str = "form.head_type";
    pub const LABEL_OUTER_DIAMETER: &str = "form.outer_diameter";
    pub const LABEL_WALL_THICKNESS: &str = "form.wall_thickness";
    pub const LABEL_LENGTH: &str = "form.length";
    pub const VESSEL_VERTICAL: &str = "form.vessel_vertical";
    pub const VESSEL_HORIZONTAL: &str = "form.vessel_horizontal";
    pub const HEAD_DIN28011: &str = "form.head_din28011";
    pub const HEAD_DIN28013: &str = "form.head_din28013";

    pub const BUTTON_CALCULATE: &str = "button.calculate";
    pub const BUTTON_EXPORT: &str = "button.export";
    pub const BUTTON_CANCEL: &str = "button.cancel";
    pub const PROGRESS: &str = "result.progress";
    pub const COLUMN_LEVEL: &str = "result.column_level";
    pub const COLUMN_VOLUME: &str = "result.column_volume";
    pub const RESULT_HEAD_PARAMETERS: &str = "result.head_parameters";
    pub const RESULT_TOTAL_VOLUME: &str = "result.total_volume";

    pub const STATUS_INVALID_INPUT: &str = "status.invalid_input";
    pub const STATUS_EXPORT_OK: &str = "status.export_ok";
    pub const STATUS_EXPORT_FAILED: &str = "status.export_failed";
    pub const STATUS_NOTHING_TO_EXPORT: &str = "status.nothing_to_export";
    pub const STATUS_CANCELLED: &str = "status.cancelled";

    pub const PROMPT_VESSEL_TYPE: &str = "prompt.vessel_type";
    pub const PROMPT_HEAD_TYPE: &str = "prompt.head_type";
    pub const PROMPT_OUTER_DIAMETER: &str = "prompt.outer_diameter";
    pub const PROMPT_WALL_THICKNESS: &str = "prompt.wall_thickness";
    pub const PROMPT_LENGTH: &str = "prompt.length";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    De,
    Ko,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("de") {
            Language::De
        } else if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Ko => "ko",
        }
    }

    /// 내보내기용 소수점. 독일어 환경은 쉼표를 쓴다.
    pub fn decimal_separator(&self) -> DecimalSeparator {
        match self {
            Language::De => DecimalSeparator::Comma,
            Language::En | Language::Ko => DecimalSeparator::Point,
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(en/de/ko)에 따라 번역기를 생성한다. 알 수 없는 코드는 en 으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 → 영어 순으로 찾는다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        let built_in = match self.lang {
            Language::En => en(key),
            Language::De => de(key).or_else(|| en(key)),
            Language::Ko => ko(key).or_else(|| en(key)),
        };
        built_in.unwrap_or(key)
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("en") => Some("en".into()),
        other if other.starts_with("de") => Some("de".into()),
        other if other.starts_with("ko") => Some("ko".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "en" | "de" | "ko" => Some(lang),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LC_ALL", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&value) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key = "value".
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        APP_TITLE => "Filling-curve calculator",
        ERROR_PREFIX => "Error",
        LABEL_VESSEL_TYPE => "Vessel type",
        LABEL_HEAD_TYPE => "Head type",
        LABEL_OUTER_DIAMETER => "Outer diameter (mm)",
        LABEL_WALL_THICKNESS => "Wall thickness (mm)",
        LABEL_LENGTH => "Length (mm)",
        VESSEL_VERTICAL => "Vertical Tank",
        VESSEL_HORIZONTAL => "Horizontal Tank",
        HEAD_DIN28011 => "Torospherical Head (DIN 28011)",
        HEAD_DIN28013 => "Torospherical Head (DIN 28013)",
        BUTTON_CALCULATE => "Calculate",
        BUTTON_EXPORT => "Export (CSV)",
        BUTTON_CANCEL => "Cancel",
        PROGRESS => "Progress",
        COLUMN_LEVEL => "Level (cm)",
        COLUMN_VOLUME => "Volume (m³)",
        RESULT_HEAD_PARAMETERS => "Head parameters",
        RESULT_TOTAL_VOLUME => "Total volume",
        STATUS_INVALID_INPUT => "Please check your input parameters!",
        STATUS_EXPORT_OK => "File successfully saved:",
        STATUS_EXPORT_FAILED => "Saving failed:",
        STATUS_NOTHING_TO_EXPORT => "Nothing to export yet. Calculate first.",
        STATUS_CANCELLED => "Calculation cancelled.",
        PROMPT_VESSEL_TYPE => "Vessel type (1=vertical, 2=horizontal): ",
        PROMPT_HEAD_TYPE => "Head type (1=DIN 28011, 2=DIN 28013): ",
        PROMPT_OUTER_DIAMETER => "Outer diameter (mm): ",
        PROMPT_WALL_THICKNESS => "Wall thickness (mm): ",
        PROMPT_LENGTH => "Length (mm): ",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        INVALID_SELECTION_RETRY => "Invalid selection, please try again.",
        _ => return None,
    })
}

fn de(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        APP_TITLE => "Füllkurvenrechner",
        ERROR_PREFIX => "Fehler",
        LABEL_VESSEL_TYPE => "Behälterart",
        LABEL_HEAD_TYPE => "Bodenform",
        LABEL_OUTER_DIAMETER => "Außendurchmesser (mm)",
        LABEL_WALL_THICKNESS => "Wandstärke (mm)",
        LABEL_LENGTH => "Länge (mm)",
        VESSEL_VERTICAL => "Stehender Behälter",
        VESSEL_HORIZONTAL => "Liegender Behälter",
        HEAD_DIN28011 => "Klöpperboden (DIN 28011)",
        HEAD_DIN28013 => "Korbbogenboden (DIN 28013)",
        BUTTON_CALCULATE => "Berechnen",
        BUTTON_EXPORT => "Export (CSV)",
        BUTTON_CANCEL => "Abbrechen",
        PROGRESS => "Fortschritt",
        COLUMN_LEVEL => "Füllstand (cm)",
        COLUMN_VOLUME => "Volumen (m³)",
        RESULT_HEAD_PARAMETERS => "Bodenparameter",
        RESULT_TOTAL_VOLUME => "Gesamtvolumen",
        STATUS_INVALID_INPUT => "Bitte die Eingabeparameter prüfen!",
        STATUS_EXPORT_OK => "Datei erfolgreich gespeichert:",
        STATUS_EXPORT_FAILED => "Speichern fehlgeschlagen:",
        STATUS_NOTHING_TO_EXPORT => "Noch keine Ergebnisse. Bitte zuerst berechnen.",
        STATUS_CANCELLED => "Berechnung abgebrochen.",
        PROMPT_VESSEL_TYPE => "Behälterart (1=stehend, 2=liegend): ",
        PROMPT_HEAD_TYPE => "Bodenform (1=DIN 28011, 2=DIN 28013): ",
        PROMPT_OUTER_DIAMETER => "Außendurchmesser (mm): ",
        PROMPT_WALL_THICKNESS => "Wandstärke (mm): ",
        PROMPT_LENGTH => "Länge (mm): ",
        ERROR_INVALID_NUMBER => "Bitte eine Zahl eingeben.",
        INVALID_SELECTION_RETRY => "Ungültige Auswahl, bitte erneut versuchen.",
        _ => return None,
    })
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        APP_TITLE => "충전 곡선 계산기",
        ERROR_PREFIX => "오류",
        LABEL_VESSEL_TYPE => "용기 형식",
        LABEL_HEAD_TYPE => "경판 형식",
        LABEL_OUTER_DIAMETER => "외경 (mm)",
        LABEL_WALL_THICKNESS => "두께 (mm)",
        LABEL_LENGTH => "전장 (mm)",
        VESSEL_VERTICAL => "수직형 탱크",
        VESSEL_HORIZONTAL => "수평형 탱크",
        HEAD_DIN28011 => "접시형 경판 (DIN 28011)",
        HEAD_DIN28013 => "접시형 경판 (DIN 28013)",
        BUTTON_CALCULATE => "계산",
        BUTTON_EXPORT => "내보내기 (CSV)",
        BUTTON_CANCEL => "취소",
        PROGRESS => "진행률",
        COLUMN_LEVEL => "액위 (cm)",
        COLUMN_VOLUME => "용적 (m³)",
        RESULT_HEAD_PARAMETERS => "경판 파라미터",
        RESULT_TOTAL_VOLUME => "총 용적",
        STATUS_INVALID_INPUT => "입력값을 확인하세요!",
        STATUS_EXPORT_OK => "파일을 저장했습니다:",
        STATUS_EXPORT_FAILED => "저장 실패:",
        STATUS_NOTHING_TO_EXPORT => "내보낼 결과가 없습니다. 먼저 계산하세요.",
        STATUS_CANCELLED => "계산을 취소했습니다.",
        PROMPT_VESSEL_TYPE => "용기 형식 (1=수직형, 2=수평형): ",
        PROMPT_HEAD_TYPE => "경판 형식 (1=DIN 28011, 2=DIN 28013): ",
        PROMPT_OUTER_DIAMETER => "외경 (mm): ",
        PROMPT_WALL_THICKNESS => "두께 (mm): ",
        PROMPT_LENGTH => "전장 (mm): ",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_uses_comma() {
        let tr = Translator::new("de-DE");
        assert_eq!(tr.language(), Language::De);
        assert_eq!(tr.language().decimal_separator(), DecimalSeparator::Comma);
        assert_eq!(
            Translator::new("en-us").language().decimal_separator(),
            DecimalSeparator::Point
        );
    }

    #[test]
    fn falls_back_to_english_then_key() {
        let tr = Translator::new("fr");
        assert_eq!(tr.language(), Language::En);
        assert_eq!(tr.t(keys::BUTTON_CALCULATE), "Calculate");
        assert_eq!(tr.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn explicit_language_wins() {
        assert_eq!(resolve_language("de", Some("ko")), "de");
        assert_eq!(resolve_language("auto", Some("ko-KR")), "ko");
    }

    #[test]
    fn locale_strings_are_normalized() {
        assert_eq!(normalize_locale_string("de_DE.UTF-8"), Some("de".into()));
        assert_eq!(normalize_locale_string("en-GB"), Some("en".into()));
        assert_eq!(normalize_locale_string("C"), None);
    }

    #[test]
    fn nested_pack_tables_become_dotted_keys() {
        let map = parse_toml_to_map("[button]\ncalculate = \"Go\"\n").unwrap();
        assert_eq!(map.get("button.calculate").map(String::as_str), Some("Go"));
    }
}
