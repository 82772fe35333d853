//! Data models for prize table rows

use serde::{Deserialize, Serialize};

/// One row as the page reports it; either field may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPrizeItem {
    #[serde(default)]
    pub prize: String,
    #[serde(rename = "move", default)]
    pub move_number: String,
}

impl RawPrizeItem {
    pub fn new(move_number: impl Into<String>, prize: impl Into<String>) -> Self {
        Self {
            prize: prize.into(),
            move_number: move_number.into(),
        }
    }
}

/// A complete row ready for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrizeRow {
    pub move_number: String,
    pub prize: String,
}

/// Trim every item and drop the ones missing a move or a prize.
///
/// Returns the kept rows in page order and the number of dropped items.
pub fn keep_complete(items: Vec<RawPrizeItem>) -> (Vec<PrizeRow>, usize) {
    let total = items.len();

    let rows: Vec<PrizeRow> = items
        .into_iter()
        .filter_map(|item| {
            let move_number = item.move_number.trim();
            let prize = item.prize.trim();

            if move_number.is_empty() || prize.is_empty() {
                return None;
            }

            Some(PrizeRow {
                move_number: move_number.to_string(),
                prize: prize.to_string(),
            })
        })
        .collect();

    let skipped = total - rows.len();
    (rows, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_complete_rows_in_order() {
        let items = vec![
            RawPrizeItem::new("1", "1 000 000 ₽"),
            RawPrizeItem::new("", "500 ₽"),
            RawPrizeItem::new("3", "   "),
            RawPrizeItem::new(" 4 ", " 100 ₽\n"),
        ];

        let (rows, skipped) = keep_complete(items);

        assert_eq!(skipped, 2);
        assert_eq!(
            rows,
            vec![
                PrizeRow {
                    move_number: "1".into(),
                    prize: "1 000 000 ₽".into()
                },
                PrizeRow {
                    move_number: "4".into(),
                    prize: "100 ₽".into()
                },
            ]
        );
    }

    #[test]
    fn deserializes_page_field_names() {
        let item: RawPrizeItem = serde_json::from_str(r#"{"prize":"50 ₽","move":"12"}"#).unwrap();
        assert_eq!(item, RawPrizeItem::new("12", "50 ₽"));

        let partial: RawPrizeItem = serde_json::from_str(r#"{"prize":"50 ₽"}"#).unwrap();
        assert!(partial.move_number.is_empty());
    }
}
