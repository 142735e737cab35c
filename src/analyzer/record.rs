//! シュート記録を表現するモジュール
//!
//! 読み込み後のシュート記録は不変であり、すべてのビュー計算は
//! このモジュールの型を借用して集計を行います。

use super::category::MAX_TOUCH_TIME_SECONDS;
use super::error::AnalyzerError;
use chrono::Duration;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// 1本のフィールドゴール試投を表す構造体
///
/// # フィールド
///
/// - `game_id`: 試合を識別するトークン（順序は持たない）
/// - `period`: クォーター番号（5以上はオーバータイム）
/// - `game_clock`: ピリオド内の残り時間
/// - `final_margin`: シューター側から見た試合の最終得点差
/// - `shot_distance`: ゴールからの距離（フィート）
/// - `close_def_distance`: 最も近いディフェンダーまでの距離（フィート）
/// - `dribbles`: シュート前のドリブル数
/// - `touch_time`: シュート前のボール保持時間（秒）
/// - `shot_type`: 2点シュートか3点シュートか
/// - `points`: この試投で実際に得た得点
/// - `result`: 成功か失敗か
/// - `location`: ホームかアウェイか
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    pub game_id: String,
    pub period: i32,
    pub game_clock: GameClock,
    pub final_margin: i32,
    pub shot_distance: f64,
    pub close_def_distance: f64,
    pub dribbles: u32,
    pub touch_time: f64,
    pub shot_type: ShotType,
    pub points: u32,
    pub result: ShotResult,
    pub location: Location,
}

impl ShotRecord {
    pub fn is_made(&self) -> bool {
        self.result == ShotResult::Made
    }

    /// レコードの不変条件を検証します
    ///
    /// # エラー
    ///
    /// 以下の場合に理由を表す文字列を返します：
    /// - 距離やタッチタイムが負の値、または有限でない
    /// - タッチタイムが`MAX_TOUCH_TIME_SECONDS`を超える
    /// - 得点が0でもシュートの点数でもない
    /// - 得点の有無とシュート結果が一致しない
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("SHOT_DIST", self.shot_distance),
            ("CLOSE_DEF_DIST", self.close_def_distance),
            ("TOUCH_TIME", self.touch_time),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }

        if self.touch_time > MAX_TOUCH_TIME_SECONDS {
            return Err(format!(
                "TOUCH_TIME must be at most {} seconds, got {}",
                MAX_TOUCH_TIME_SECONDS, self.touch_time
            ));
        }

        if self.points != 0 && self.points != self.shot_type.points() {
            return Err(format!(
                "PTS {} does not match PTS_TYPE {}",
                self.points,
                self.shot_type.points()
            ));
        }

        if (self.points > 0) != self.is_made() {
            return Err(format!(
                "PTS {} is inconsistent with SHOT_RESULT {}",
                self.points, self.result
            ));
        }

        Ok(())
    }
}

/// シュートの種類（2点 / 3点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShotType {
    TwoPointer,
    ThreePointer,
}

impl ShotType {
    /// 表示順
    pub const ALL: [ShotType; 2] = [ShotType::TwoPointer, ShotType::ThreePointer];

    pub fn points(self) -> u32 {
        match self {
            ShotType::TwoPointer => 2,
            ShotType::ThreePointer => 3,
        }
    }

    pub fn from_points(points: u32) -> Option<Self> {
        match points {
            2 => Some(ShotType::TwoPointer),
            3 => Some(ShotType::ThreePointer),
            _ => None,
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            ShotType::TwoPointer => "2PT",
            ShotType::ThreePointer => "3PT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotResult {
    Made,
    Missed,
}

impl FromStr for ShotResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "made" => Ok(ShotResult::Made),
            "missed" => Ok(ShotResult::Missed),
            other => Err(format!("unknown SHOT_RESULT '{}'", other)),
        }
    }
}

impl fmt::Display for ShotResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotResult::Made => write!(f, "made"),
            ShotResult::Missed => write!(f, "missed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Home,
    Away,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::Home, Location::Away];

    pub fn label(self) -> &'static str {
        match self {
            Location::Home => "Home",
            Location::Away => "Away",
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "home" => Ok(Location::Home),
            "a" | "away" => Ok(Location::Away),
            other => Err(format!("unknown LOCATION '{}'", other)),
        }
    }
}

/// ピリオド内の時計（`M:SS`形式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GameClock(Duration);

impl GameClock {
    pub fn new(minutes: i64, seconds: i64) -> Self {
        GameClock(Duration::minutes(minutes) + Duration::seconds(seconds))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

fn clock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2}):([0-5]\d)$").expect("valid clock pattern"))
}

impl FromStr for GameClock {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = clock_pattern()
            .captures(trimmed)
            .ok_or_else(|| AnalyzerError::InvalidClock(trimmed.to_string()))?;

        // 正規表現で桁数を制限しているのでパースは失敗しない
        let minutes: i64 = caps[1]
            .parse()
            .map_err(|_| AnalyzerError::InvalidClock(trimmed.to_string()))?;
        let seconds: i64 = caps[2]
            .parse()
            .map_err(|_| AnalyzerError::InvalidClock(trimmed.to_string()))?;

        Ok(GameClock::new(minutes, seconds))
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.num_seconds();
        write!(f, "{}:{:02}", total / 60, total % 60)
    }
}
