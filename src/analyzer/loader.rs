//! シュートログ（CSV）の読み込みを担当するモジュール
//!
//! NBAのショットログ形式の列名を`ShotRecord`のフィールドに対応付け、
//! 不変条件を満たさない行は警告を出してスキップします。

use super::error::AnalyzerError;
use super::record::{GameClock, Location, ShotRecord, ShotResult, ShotType};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// 入力CSVに必須の列
pub const REQUIRED_COLUMNS: &[&str] = &[
    "GAME_ID",
    "PERIOD",
    "GAME_CLOCK",
    "FINAL_MARGIN",
    "SHOT_DIST",
    "CLOSE_DEF_DIST",
    "DRIBBLES",
    "TOUCH_TIME",
    "PTS_TYPE",
    "PTS",
    "SHOT_RESULT",
    "LOCATION",
];

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawShot {
    GAME_ID: String,
    PERIOD: i32,
    GAME_CLOCK: String,
    FINAL_MARGIN: i32,
    SHOT_DIST: f64,
    CLOSE_DEF_DIST: f64,
    DRIBBLES: u32,
    TOUCH_TIME: f64,
    PTS_TYPE: u32,
    PTS: u32,
    SHOT_RESULT: String,
    LOCATION: String,
}

impl TryFrom<RawShot> for ShotRecord {
    type Error = String;

    fn try_from(raw: RawShot) -> Result<Self, Self::Error> {
        let game_id = raw.GAME_ID.trim().to_string();
        if game_id.is_empty() {
            return Err("GAME_ID is empty".to_string());
        }

        let game_clock: GameClock = raw.GAME_CLOCK.parse().map_err(|e: AnalyzerError| e.to_string())?;
        let shot_type = ShotType::from_points(raw.PTS_TYPE)
            .ok_or_else(|| format!("PTS_TYPE must be 2 or 3, got {}", raw.PTS_TYPE))?;

        let record = ShotRecord {
            game_id,
            period: raw.PERIOD,
            game_clock,
            final_margin: raw.FINAL_MARGIN,
            shot_distance: raw.SHOT_DIST,
            close_def_distance: raw.CLOSE_DEF_DIST,
            dribbles: raw.DRIBBLES,
            touch_time: raw.TOUCH_TIME,
            shot_type,
            points: raw.PTS,
            result: raw.SHOT_RESULT.parse::<ShotResult>()?,
            location: raw.LOCATION.parse::<Location>()?,
        };
        record.validate()?;

        Ok(record)
    }
}

/// 指定されたパスのCSVファイルからシュート記録を読み込みます
///
/// # エラー
///
/// 以下の場合にエラーを返します：
/// - ファイルのオープンに失敗
/// - 必須列が欠けている、または有効な行が1行もない
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<ShotRecord>, AnalyzerError> {
    let path = path.as_ref();
    debug!("loading shot log from {}", path.display());
    let file = File::open(path)?;
    load_from_reader(file)
}

/// 任意のリーダーからシュート記録を読み込みます
///
/// 解析できない行や不変条件に違反する行はスキップされ、
/// `warn!`で行番号と理由が記録されます。
pub fn load_from_reader<R: Read>(rdr: R) -> Result<Vec<ShotRecord>, AnalyzerError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AnalyzerError::MissingData(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (index, result) in reader.deserialize::<RawShot>().enumerate() {
        let row = index + 1;
        let outcome = result
            .map_err(|e| e.to_string())
            .and_then(ShotRecord::try_from)
            .map_err(|reason| AnalyzerError::InvalidRecord { row, reason });

        match outcome {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("skipping row: {}", e);
                skipped += 1;
            }
        }
    }

    if records.is_empty() {
        return Err(AnalyzerError::MissingData(format!(
            "no usable shot records ({} row(s) skipped)",
            skipped
        )));
    }

    debug!("loaded {} shot record(s), skipped {}", records.len(), skipped);
    Ok(records)
}
