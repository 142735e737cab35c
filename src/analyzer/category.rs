//! 集計に使うカテゴリとビン分割の補助関数
//!
//! 表示順が固定されたカテゴリはすべて列挙型で表現し、`ALL`定数が表示順を定義します。
//! 境界値はすべて上側のビンに含まれます（左閉・右開区間）。

use std::fmt;

/// シュート距離のカテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceCategory {
    /// [0, 8)
    PaintArea,
    /// [8, 22)
    MidRange,
    /// [22, 30)
    ThreePoint,
    /// [30, ∞)
    DeepThree,
}

impl DistanceCategory {
    pub const ALL: [DistanceCategory; 4] = [
        DistanceCategory::PaintArea,
        DistanceCategory::MidRange,
        DistanceCategory::ThreePoint,
        DistanceCategory::DeepThree,
    ];

    /// 距離（フィート）をカテゴリに分類します
    pub fn from_distance(feet: f64) -> Self {
        if feet < 8.0 {
            DistanceCategory::PaintArea
        } else if feet < 22.0 {
            DistanceCategory::MidRange
        } else if feet < 30.0 {
            DistanceCategory::ThreePoint
        } else {
            DistanceCategory::DeepThree
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistanceCategory::PaintArea => "Paint Area",
            DistanceCategory::MidRange => "Mid-Range 2PT",
            DistanceCategory::ThreePoint => "3PT",
            DistanceCategory::DeepThree => "Deep 3PT",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// ピリオドのカテゴリ
///
/// 1〜4クォーターと、最初のオーバータイム（ピリオド5）だけを表現します。
/// 2回目以降のオーバータイムはラベルが存在しないため、呼び出し側で
/// 不整合として扱う必要があります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    First,
    Second,
    Third,
    Fourth,
    Overtime,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::First,
        Period::Second,
        Period::Third,
        Period::Fourth,
        Period::Overtime,
    ];

    pub fn from_number(period: i32) -> Option<Self> {
        match period {
            1 => Some(Period::First),
            2 => Some(Period::Second),
            3 => Some(Period::Third),
            4 => Some(Period::Fourth),
            5 => Some(Period::Overtime),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::First => "1st",
            Period::Second => "2nd",
            Period::Third => "3rd",
            Period::Fourth => "4th",
            Period::Overtime => "OTs",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// 最も近いディフェンダーとの距離によるカテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefenderCoverage {
    /// [0, 2)
    Contested,
    /// [2, 4)
    SemiContested,
    /// [4, ∞)
    WideOpen,
}

impl DefenderCoverage {
    pub const ALL: [DefenderCoverage; 3] = [
        DefenderCoverage::Contested,
        DefenderCoverage::SemiContested,
        DefenderCoverage::WideOpen,
    ];

    pub fn from_distance(feet: f64) -> Self {
        if feet < 2.0 {
            DefenderCoverage::Contested
        } else if feet < 4.0 {
            DefenderCoverage::SemiContested
        } else {
            DefenderCoverage::WideOpen
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DefenderCoverage::Contested => "Contested",
            DefenderCoverage::SemiContested => "Semi-Contested",
            DefenderCoverage::WideOpen => "Wide Open",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// タッチタイムのバケット
///
/// # フィールド
///
/// - `start`: バケットの開始秒（この値を含む）
/// - `open_ended`: `true`の場合は`start`以上すべてを含む最後のバケット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchTimeBucket {
    pub start: u32,
    pub open_ended: bool,
}

impl TouchTimeBucket {
    pub fn contains(&self, seconds: f64) -> bool {
        let start = self.start as f64;
        if self.open_ended {
            seconds >= start
        } else {
            seconds >= start && seconds < start + 1.0
        }
    }
}

impl fmt::Display for TouchTimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.open_ended {
            write!(f, "{}+", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.start + 1)
        }
    }
}

/// タッチタイムとして受け付ける上限（秒）
pub const MAX_TOUCH_TIME_SECONDS: f64 = 60.0;

/// 観測された最大タッチタイムからバケット境界を求めます
///
/// `0-1`, `1-2`, ... `(⌊max⌋-1)-⌊max⌋` の幅1秒のバケットと、
/// 最後に`⌊max⌋+`の上限なしバケットを返します。
///
/// # 引数
///
/// - `max_seconds`: テーブル全体で観測された最大タッチタイム
///
/// # 戻り値
///
/// 開始秒の昇順に並んだバケットのベクター（常に1つ以上）。
/// バケット数は`MAX_TOUCH_TIME_SECONDS`で頭打ちになります。
pub fn buckets_for(max_seconds: f64) -> Vec<TouchTimeBucket> {
    let top = if max_seconds.is_finite() && max_seconds > 0.0 {
        max_seconds.min(MAX_TOUCH_TIME_SECONDS).floor() as u32
    } else {
        0
    };

    (0..top)
        .map(|start| TouchTimeBucket {
            start,
            open_ended: false,
        })
        .chain(std::iter::once(TouchTimeBucket {
            start: top,
            open_ended: true,
        }))
        .collect()
}

/// 値が属するバケットの位置を返します（負の値は`None`）
///
/// `buckets`は`buckets_for`が返す、0から1秒刻みで連続したバケットであることが前提です。
pub fn bucket_index(buckets: &[TouchTimeBucket], seconds: f64) -> Option<usize> {
    if buckets.is_empty() || seconds.is_nan() || seconds < 0.0 {
        return None;
    }
    let last = buckets.len() - 1;
    Some((seconds.floor() as usize).min(last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_boundaries_go_up() {
        let test_cases = [
            (0.0, DistanceCategory::PaintArea),
            (7.99, DistanceCategory::PaintArea),
            (8.0, DistanceCategory::MidRange),
            (21.9, DistanceCategory::MidRange),
            (22.0, DistanceCategory::ThreePoint),
            (29.99, DistanceCategory::ThreePoint),
            (30.0, DistanceCategory::DeepThree),
            (75.0, DistanceCategory::DeepThree),
        ];

        for (distance, expected) in test_cases {
            assert_eq!(
                DistanceCategory::from_distance(distance),
                expected,
                "distance {} should map to {:?}",
                distance,
                expected
            );
        }
    }

    #[test]
    fn test_distance_partition_is_total() {
        // 0.0〜40.0を0.1刻みで走査し、どの値もちょうど1つのカテゴリに属することを確認
        for step in 0..=400 {
            let distance = step as f64 / 10.0;
            let category = DistanceCategory::from_distance(distance);
            assert!(DistanceCategory::ALL.contains(&category));
        }
        let labels: Vec<_> = DistanceCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["Paint Area", "Mid-Range 2PT", "3PT", "Deep 3PT"]);
    }

    #[test]
    fn test_period_mapping() {
        assert_eq!(Period::from_number(1), Some(Period::First));
        assert_eq!(Period::from_number(5), Some(Period::Overtime));
        assert_eq!(Period::from_number(6), None);
        assert_eq!(Period::from_number(0), None);
        let labels: Vec<_> = Period::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["1st", "2nd", "3rd", "4th", "OTs"]);
    }

    #[test]
    fn test_defender_coverage() {
        assert_eq!(DefenderCoverage::from_distance(0.0), DefenderCoverage::Contested);
        assert_eq!(DefenderCoverage::from_distance(1.9), DefenderCoverage::Contested);
        assert_eq!(DefenderCoverage::from_distance(2.0), DefenderCoverage::SemiContested);
        assert_eq!(DefenderCoverage::from_distance(4.0), DefenderCoverage::WideOpen);
        assert_eq!(DefenderCoverage::from_distance(12.5), DefenderCoverage::WideOpen);
    }

    fn labels(buckets: &[TouchTimeBucket]) -> Vec<String> {
        buckets.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_buckets_for() {
        assert_eq!(labels(&buckets_for(3.2)), vec!["0-1", "1-2", "2-3", "3+"]);
        assert_eq!(
            labels(&buckets_for(5.0)),
            vec!["0-1", "1-2", "2-3", "3-4", "4-5", "5+"]
        );
        assert_eq!(labels(&buckets_for(0.4)), vec!["0+"]);
        assert_eq!(labels(&buckets_for(f64::NAN)), vec!["0+"]);
    }

    #[test]
    fn test_bucket_index() {
        let buckets = buckets_for(3.2);
        assert_eq!(bucket_index(&buckets, 0.0), Some(0));
        assert_eq!(bucket_index(&buckets, 0.99), Some(0));
        assert_eq!(bucket_index(&buckets, 1.0), Some(1));
        assert_eq!(bucket_index(&buckets, 3.0), Some(3));
        assert_eq!(bucket_index(&buckets, 3.2), Some(3));
        assert_eq!(bucket_index(&buckets, -0.1), None);
        assert_eq!(bucket_index(&buckets, 1.0e10), Some(3));
        assert_eq!(bucket_index(&buckets, f64::INFINITY), Some(3));
        assert_eq!(bucket_index(&buckets, f64::NAN), None);
    }

    #[test]
    fn test_bucket_count_is_bounded() {
        let buckets = buckets_for(2.0e6);
        assert_eq!(buckets.len(), MAX_TOUCH_TIME_SECONDS as usize + 1);
        assert_eq!(buckets.last().unwrap().to_string(), "60+");

        let buckets = buckets_for(1.0e10);
        assert_eq!(buckets.len(), MAX_TOUCH_TIME_SECONDS as usize + 1);
    }

    #[test]
    fn test_bucket_index_matches_contains() {
        let buckets = buckets_for(5.0);
        for step in 0..=80 {
            let seconds = step as f64 / 10.0;
            let index = bucket_index(&buckets, seconds).unwrap();
            assert!(
                buckets[index].contains(seconds),
                "{} should fall in {}",
                seconds,
                buckets[index]
            );
        }
    }
}
