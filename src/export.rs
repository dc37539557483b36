//! 결과 표 표시/CSV 내보내기.
//!
//! 내부 수치는 항상 `.` 소수점을 쓰고, 로케일에 따른 `,` 치환은 여기서만 한다.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::integration::FillingCurve;

pub const CSV_HEADER: [&str; 2] = ["Level (cm)", "Volume (m3)"];
const DELIMITER: char = ';';
const LINE_END: &str = "\r\n";

/// 소수점 문자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    Point,
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(&self) -> char {
        match self {
            DecimalSeparator::Point => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

impl FromStr for DecimalSeparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "point" | "dot" | "." => Ok(DecimalSeparator::Point),
            "comma" | "," => Ok(DecimalSeparator::Comma),
            other => Err(format!("unknown decimal separator: {other}")),
        }
    }
}

/// 화면/CSV 한 행. 액위는 정수 cm, 용적은 소수 둘째 자리 문자열.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub level_cm: i64,
    pub volume_m3: String,
}

impl TableRow {
    /// 용적 문자열을 지정한 소수점으로 바꾼다.
    pub fn volume_with(&self, separator: DecimalSeparator) -> String {
        match separator {
            DecimalSeparator::Point => self.volume_m3.clone(),
            DecimalSeparator::Comma => self.volume_m3.replace('.', ","),
        }
    }
}

pub fn table_rows(curve: &FillingCurve) -> Vec<TableRow> {
    curve
        .points()
        .iter()
        .map(|p| TableRow {
            level_cm: p.level_cm.round() as i64,
            volume_m3: format!("{:.2}", p.volume_m3),
        })
        .collect()
}

/// 세미콜론 구분 CSV 를 쓴다. 헤더 한 줄 + 행마다 한 줄.
pub fn write_csv<W: Write>(
    writer: &mut W,
    curve: &FillingCurve,
    separator: DecimalSeparator,
) -> io::Result<()> {
    write!(writer, "{}{DELIMITER}{}{LINE_END}", CSV_HEADER[0], CSV_HEADER[1])?;
    for row in table_rows(curve) {
        write!(
            writer,
            "{}{DELIMITER}{}{LINE_END}",
            row.level_cm,
            row.volume_with(separator)
        )?;
    }
    Ok(())
}

pub fn to_csv_string(curve: &FillingCurve, separator: DecimalSeparator) -> String {
    let mut buf = Vec::new();
    // Vec<u8> 에 대한 쓰기는 실패하지 않는다.
    let _ = write_csv(&mut buf, curve, separator);
    String::from_utf8_lossy(&buf).into_owned()
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 파일로 내보낸다. 실패해도 메모리의 표는 그대로 남는다.
pub fn export_csv(
    path: &Path,
    curve: &FillingCurve,
    separator: DecimalSeparator,
) -> Result<(), ExportError> {
    let wrap = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, curve, separator).map_err(wrap)?;
    writer.flush().map_err(wrap)?;
    tracing::info!(path = %path.display(), rows = curve.len(), "exported filling curve");
    Ok(())
}
