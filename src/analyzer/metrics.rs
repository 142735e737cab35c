//! 集計結果の表現を担当するモジュール
//!
//! このモジュールは、各ビューの集計結果（ラベルと値の系列）を表現するためのデータ構造と、
//! 結果のシリアライズに関する機能を提供します。

use serde::{Deserialize, Serialize};

/// 値の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Count,
    Percentage,
    Average,
}

impl ValueKind {
    /// 注釈用に値を整形します
    ///
    /// 件数は整数、平均は小数点以下1桁、割合は小数点以下1桁と`%`で表示します。
    pub fn format(self, value: f64) -> String {
        match self {
            ValueKind::Count => format!("{:.0}", value),
            ValueKind::Percentage => format!("{:.1}%", value),
            ValueKind::Average => format!("{:.1}", value),
        }
    }
}

/// 描画方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    Bar,
    Line,
}

/// 系列中の1点
///
/// `value`が`None`の場合は未定義（試投数0）であり、描画時は欠損として扱われます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    #[serde(serialize_with = "round_option_to_3")]
    pub value: Option<f64>,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// 1つのビューの集計結果
///
/// # フィールド
///
/// - `title`: グラフのタイトル
/// - `x_label`: 横軸のラベル
/// - `y_label`: 縦軸のラベル
/// - `kind`: 値の種類（件数・割合・平均）
/// - `style`: 棒グラフか折れ線グラフか
/// - `points`: 表示順に並んだデータ点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ValueKind,
    pub style: ChartStyle,
    pub points: Vec<DataPoint>,
}

impl AggregateView {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// 定義済みの値の最大値（定義済みの値がなければ`None`）
    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|p| p.value)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    pub fn is_all_undefined(&self) -> bool {
        self.points.iter().all(|p| p.value.is_none())
    }
}

/// 浮動小数点数を3桁に丸める補助関数（未定義値は`null`）
///
/// # 引数
///
/// - `value`: 丸める浮動小数点数
/// - `serializer`: serdeシリアライザ
fn round_option_to_3<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(v) => serializer.serialize_some(&((*v * 1000.0).round() / 1000.0)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_view() -> AggregateView {
        AggregateView {
            title: "Accuracy Based On Distance".to_string(),
            x_label: "Distance Category".to_string(),
            y_label: "Accuracy".to_string(),
            kind: ValueKind::Percentage,
            style: ChartStyle::Bar,
            points: vec![
                DataPoint::new("Paint Area", Some(66.66666)),
                DataPoint::new("Mid-Range 2PT", None),
                DataPoint::new("3PT", Some(41.23456)),
            ],
        }
    }

    #[test]
    fn test_aggregate_view_serialization() {
        let view = sample_view();

        let json = serde_json::to_string(&view).unwrap();
        let deserialized: AggregateView = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.title, view.title);
        assert_eq!(deserialized.kind, ValueKind::Percentage);
        assert_eq!(deserialized.labels(), vec!["Paint Area", "Mid-Range 2PT", "3PT"]);

        // 丸められた値の検証
        assert!((deserialized.points[0].value.unwrap() - 66.667).abs() < 0.0001);
        assert_eq!(deserialized.points[1].value, None);
        assert!((deserialized.points[2].value.unwrap() - 41.235).abs() < 0.0001);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "percentage");
        assert_eq!(value["style"], "bar");
        assert!(value["points"][1]["value"].is_null());
    }

    #[test]
    fn test_max_value_skips_undefined() {
        let view = sample_view();
        assert!((view.max_value().unwrap() - 66.66666).abs() < 0.0001);
        assert!(!view.is_all_undefined());

        let empty = AggregateView {
            points: vec![DataPoint::new("2PTs", None), DataPoint::new("3PTs", None)],
            ..sample_view()
        };
        assert_eq!(empty.max_value(), None);
        assert!(empty.is_all_undefined());
    }

    #[test]
    fn test_value_kind_format() {
        let test_cases = vec![
            (ValueKind::Count, 812.0, "812"),
            (ValueKind::Percentage, 48.6543, "48.7%"),
            (ValueKind::Average, 5.04, "5.0"),
        ];

        for (kind, value, expected) in test_cases {
            assert_eq!(kind.format(value), expected);
        }
    }
}
