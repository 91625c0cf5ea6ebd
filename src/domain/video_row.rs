use std::collections::BTreeMap;

use serde_json::Value;

use super::raw_item::RawItem;

/// Spreadsheet columns. Declaration order is the export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    VideoId,
    VideoUrl,
    Caption,
    CreateTime,
    Views,
    Likes,
    Comments,
    Shares,
    Username,
    Nickname,
    Followers,
    Following,
    TotalVideos,
    MusicName,
    MusicAuthor,
}

impl Column {
    pub const ALL: [Column; 15] = [
        Column::VideoId,
        Column::VideoUrl,
        Column::Caption,
        Column::CreateTime,
        Column::Views,
        Column::Likes,
        Column::Comments,
        Column::Shares,
        Column::Username,
        Column::Nickname,
        Column::Followers,
        Column::Following,
        Column::TotalVideos,
        Column::MusicName,
        Column::MusicAuthor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::VideoId => "video_id",
            Column::VideoUrl => "video_url",
            Column::Caption => "caption",
            Column::CreateTime => "create_time",
            Column::Views => "views",
            Column::Likes => "likes",
            Column::Comments => "comments",
            Column::Shares => "shares",
            Column::Username => "username",
            Column::Nickname => "nickname",
            Column::Followers => "followers",
            Column::Following => "following",
            Column::TotalVideos => "total_videos",
            Column::MusicName => "music_name",
            Column::MusicAuthor => "music_author",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn from_json(value: &Value) -> Cell {
        match value {
            Value::String(s) => Cell::Text(s.clone()),
            Value::Number(n) => n
                .as_f64()
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::Text(n.to_string())),
            Value::Bool(b) => Cell::Bool(*b),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

#[derive(Debug, Clone, Copy)]
enum Fallback {
    Empty,
    Zero,
}

impl Fallback {
    fn cell(self) -> Cell {
        match self {
            Fallback::Empty => Cell::Text(String::new()),
            Fallback::Zero => Cell::Number(0.0),
        }
    }
}

struct FieldSpec {
    column: Column,
    /// Tried in order; the first present value wins.
    sources: &'static [&'static [&'static str]],
    fallback: Fallback,
}

const FIELD_MAP: [FieldSpec; 15] = [
    FieldSpec {
        column: Column::VideoId,
        sources: &[&["id"]],
        fallback: Fallback::Empty,
    },
    FieldSpec {
        column: Column::VideoUrl,
        sources: &[&["webVideoUrl"], &["url"]],
        fallback: Fallback::Empty,
    },
    FieldSpec {
        column: Column::Caption,
        sources: &[&["text"]],
        fallback: Fallback::Empty,
    },
    FieldSpec {
        column: Column::CreateTime,
        sources: &[&["createTime"]],
        fallback: Fallback::Empty,
    },
    FieldSpec {
        column: Column::Views,
        sources: &[&["playCount"]],
        fallback: Fallback::Zero,
    },
    FieldSpec {
        column: Column::Likes,
        sources: &[&["diggCount"]],
        fallback: Fallback::Zero,
    },
    FieldSpec {
        column: Column::Comments,
        sources: &[&["commentCount"]],
        fallback: Fallback::Zero,
    },
    FieldSpec {
        column: Column::Shares,
        sources: &[&["shareCount"]],
        fallback: Fallback::Zero,
    },
    FieldSpec {
        column: Column::Username,
        sources: &[&["authorMeta", "name"]],
        fallback: Fallback::Empty,
    },
    FieldSpec {
        column: Column::Nickname,
        sources: &[&["authorMeta", "nickName"]],
        fallback: Fallback::Empty,
    },
    FieldSpec {
        column: Column::Followers,
        sources: &[&["authorMeta", "fans"]],
        fallback: Fallback::Zero,
    },
    FieldSpec {
        column: Column::Following,
        sources: &[&["authorMeta", "following"]],
        fallback: Fallback::Zero,
    },
    FieldSpec {
        column: Column::TotalVideos,
        sources: &[&["authorMeta", "video"]],
        fallback: Fallback::Zero,
    },
    FieldSpec {
        column: Column::MusicName,
        sources: &[&["musicMeta", "musicName"]],
        fallback: Fallback::Empty,
    },
    FieldSpec {
        column: Column::MusicAuthor,
        sources: &[&["musicMeta", "musicAuthor"]],
        fallback: Fallback::Empty,
    },
];

/// A flat row keyed by column. Rows built from items carry every column;
/// hand-built rows may carry a subset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    cells: BTreeMap<Column, Cell>,
}

impl NormalizedRow {
    pub fn from_item(item: &RawItem) -> Self {
        let cells = FIELD_MAP
            .iter()
            .map(|field| {
                let cell = field
                    .sources
                    .iter()
                    .find_map(|path| item.lookup(path))
                    .map(Cell::from_json)
                    .unwrap_or_else(|| field.fallback.cell());
                (field.column, cell)
            })
            .collect();

        NormalizedRow { cells }
    }

    pub fn from_cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = (Column, C)>,
        C: Into<Cell>,
    {
        NormalizedRow {
            cells: cells.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }

    pub fn get(&self, column: Column) -> Option<&Cell> {
        self.cells.get(&column)
    }

    pub fn text(&self, column: Column) -> Option<&str> {
        match self.get(column)? {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn number(&self, column: Column) -> Option<f64> {
        match self.get(column)? {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn contains(&self, column: Column) -> bool {
        self.cells.contains_key(&column)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTable {
    rows: Vec<NormalizedRow>,
}

impl OutputTable {
    pub fn new(rows: Vec<NormalizedRow>) -> Self {
        OutputTable { rows }
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Schema columns present in at least one row, in schema order.
    pub fn columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.rows.iter().any(|row| row.contains(*column)))
            .collect()
    }
}

/// Projects every item onto the fixed schema. Never fails; row order follows
/// item order.
pub fn normalize(items: &[RawItem]) -> OutputTable {
    OutputTable::new(items.iter().map(NormalizedRow::from_item).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> RawItem {
        RawItem::try_from(value).unwrap()
    }

    fn full_item() -> RawItem {
        item(json!({
            "id": "7545305469414411576",
            "webVideoUrl": "https://www.tiktok.com/@idealis92/video/7545305469414411576",
            "text": "hello #fyp",
            "createTime": 1756700000,
            "playCount": 1200,
            "diggCount": 300,
            "commentCount": 12,
            "shareCount": 4,
            "authorMeta": {
                "name": "idealis92",
                "nickName": "Idealis",
                "fans": 5000,
                "following": 20,
                "video": 88
            },
            "musicMeta": {
                "musicName": "original sound",
                "musicAuthor": "Idealis"
            }
        }))
    }

    #[test]
    fn column_names_follow_schema_order() {
        let names: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            [
                "video_id",
                "video_url",
                "caption",
                "create_time",
                "views",
                "likes",
                "comments",
                "shares",
                "username",
                "nickname",
                "followers",
                "following",
                "total_videos",
                "music_name",
                "music_author",
            ]
        );
        let mut sorted = Column::ALL;
        sorted.sort();
        assert_eq!(sorted, Column::ALL);
    }

    #[test]
    fn every_column_is_mapped_once() {
        let mapped: Vec<Column> = FIELD_MAP.iter().map(|s| s.column).collect();
        assert_eq!(mapped, Column::ALL);
    }

    #[test]
    fn full_item_maps_every_field() {
        let row = NormalizedRow::from_item(&full_item());

        assert_eq!(row.text(Column::VideoId), Some("7545305469414411576"));
        assert_eq!(
            row.text(Column::VideoUrl),
            Some("https://www.tiktok.com/@idealis92/video/7545305469414411576")
        );
        assert_eq!(row.text(Column::Caption), Some("hello #fyp"));
        assert_eq!(row.number(Column::CreateTime), Some(1756700000.0));
        assert_eq!(row.number(Column::Views), Some(1200.0));
        assert_eq!(row.number(Column::Likes), Some(300.0));
        assert_eq!(row.number(Column::Comments), Some(12.0));
        assert_eq!(row.number(Column::Shares), Some(4.0));
        assert_eq!(row.text(Column::Username), Some("idealis92"));
        assert_eq!(row.text(Column::Nickname), Some("Idealis"));
        assert_eq!(row.number(Column::Followers), Some(5000.0));
        assert_eq!(row.number(Column::Following), Some(20.0));
        assert_eq!(row.number(Column::TotalVideos), Some(88.0));
        assert_eq!(row.text(Column::MusicName), Some("original sound"));
        assert_eq!(row.text(Column::MusicAuthor), Some("Idealis"));
    }

    #[test]
    fn empty_item_gets_all_defaults() {
        let row = NormalizedRow::from_item(&RawItem::default());

        for field in FIELD_MAP.iter() {
            match field.fallback {
                Fallback::Empty => assert_eq!(row.text(field.column), Some("")),
                Fallback::Zero => assert_eq!(row.number(field.column), Some(0.0)),
            }
        }
    }

    #[test]
    fn partial_item_defaults_the_rest() {
        let row = NormalizedRow::from_item(&item(json!({
            "id": "123",
            "webVideoUrl": "u",
            "playCount": 50
        })));

        assert_eq!(row.text(Column::VideoId), Some("123"));
        assert_eq!(row.text(Column::VideoUrl), Some("u"));
        assert_eq!(row.number(Column::Views), Some(50.0));
        assert_eq!(row.number(Column::Likes), Some(0.0));
        assert_eq!(row.text(Column::Username), Some(""));
    }

    #[test]
    fn video_url_falls_back_to_url() {
        let row = NormalizedRow::from_item(&item(json!({"url": "fallback"})));
        assert_eq!(row.text(Column::VideoUrl), Some("fallback"));

        let row = NormalizedRow::from_item(&item(json!({"url": "fallback", "webVideoUrl": null})));
        assert_eq!(row.text(Column::VideoUrl), Some("fallback"));
    }

    #[test]
    fn broken_nested_records_default() {
        let row = NormalizedRow::from_item(&item(json!({
            "authorMeta": null,
            "musicMeta": ["not", "an", "object"]
        })));

        assert_eq!(row.text(Column::Username), Some(""));
        assert_eq!(row.number(Column::Followers), Some(0.0));
        assert_eq!(row.text(Column::MusicName), Some(""));
    }

    #[test]
    fn normalize_keeps_item_order() {
        let a = item(json!({"id": "a"}));
        let b = item(json!({"id": "b"}));

        let both = normalize(&[a.clone(), b.clone()]);
        let first = normalize(&[a]);
        let second = normalize(&[b]);

        assert_eq!(both.len(), 2);
        assert_eq!(both.rows()[0], first.rows()[0]);
        assert_eq!(both.rows()[1], second.rows()[0]);
    }

    #[test]
    fn normalize_keeps_duplicates() {
        let table = normalize(&[full_item(), full_item(), full_item()]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn columns_are_the_present_subset_in_schema_order() {
        let table = OutputTable::new(vec![
            NormalizedRow::from_cells([(Column::Views, Cell::from(3.0))]),
            NormalizedRow::from_cells([(Column::VideoId, Cell::from("x"))]),
        ]);
        assert_eq!(table.columns(), vec![Column::VideoId, Column::Views]);

        assert_eq!(normalize(&[RawItem::default()]).columns(), Column::ALL.to_vec());
        assert!(normalize(&[]).columns().is_empty());
    }
}
