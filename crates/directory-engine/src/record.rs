//! Winery record schema and the field-level normalization rules applied to
//! every raw upload cell before anything reaches the store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Exact header names of the upload schema. Matching is case-sensitive and
/// whitespace-sensitive; `pet-friendly` is not `Pet-Friendly`.
pub mod columns {
    pub const NAME: &str = "name";
    pub const SITE_URL: &str = "siteUrl";
    pub const PHONE: &str = "phone";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const RATING: &str = "rating";
    pub const PHOTO_URL: &str = "photoUrl";
    pub const COUPLES: &str = "Couples";
    pub const GROUPS: &str = "Groups of Friends";
    pub const FAMILIES: &str = "Families";
    pub const PET_FRIENDLY: &str = "Pet-Friendly";
    pub const OUTDOOR_SEATING: &str = "Outdoor Seating";
    pub const LIVE_MUSIC: &str = "Live Music on Weekends";
    pub const DESCRIPTION: &str = "Description";

    /// Fields a record cannot be persisted without.
    pub const REQUIRED: [&str; 4] = [NAME, ADDRESS, CITY, STATE];
}

/// One data row of an upload: exact header text mapped to the raw cell text.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// 1-based position among data rows; the header row and blank lines do
    /// not count.
    pub row: usize,
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            cells: HashMap::new(),
        }
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        self.cells.insert(column.to_string(), value.to_string());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// A single winery document as persisted in the `wineries` collection.
///
/// Serialized field names are the directory's persisted vocabulary
/// (`siteUrl`, `imageUrl`, `goodForCouples`, ...). The upload column
/// `photoUrl` lands in `image_url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Winery {
    /// Store-assigned identifier. `None` until the record is committed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub site_url: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rating: f64,
    pub image_url: String,
    pub good_for_couples: bool,
    pub good_for_groups: bool,
    pub good_for_families: bool,
    pub pet_friendly: bool,
    pub outdoor_seating: bool,
    pub live_music: bool,
    pub description: String,
    pub featured: bool,
}

impl Winery {
    /// A record with the four required fields set and everything else at its
    /// import default.
    pub fn new(name: &str, address: &str, city: &str, state: &str) -> Self {
        Self {
            name: name.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            ..Self::default()
        }
    }
}

/// Names of `fields` that are absent or blank (after trimming) in `row`.
///
/// Validation trims; a cell of `"   "` does not satisfy a required field.
pub fn require_fields(row: &RawRow, fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .filter(|field| row.get(field).map_or(true, |v| v.trim().is_empty()))
        .map(|field| field.to_string())
        .collect()
}

/// Required fields that are blank on an already-built record.
pub fn missing_required(record: &Winery) -> Vec<String> {
    let values = [
        (columns::NAME, &record.name),
        (columns::ADDRESS, &record.address),
        (columns::CITY, &record.city),
        (columns::STATE, &record.state),
    ];
    values
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field.to_string())
        .collect()
}

/// `true` iff the cell is the literal token `true`, compared
/// case-insensitively. No trimming: `"TRUE "` is not affirmative. Anything
/// else, `"yes"` and `"1"` included, is `false`.
pub fn coerce_boolean(raw: Option<&str>) -> bool {
    raw.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Parse a decimal rating, coercing anything unusable to `0.0` instead of
/// erroring: unparsable text, the empty cell, negative and non-finite
/// values all land on `0.0`.
pub fn coerce_rating(raw: Option<&str>) -> f64 {
    let parsed = raw
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0);
    if parsed.is_finite() && parsed >= 0.0 {
        parsed
    } else {
        0.0
    }
}

/// Trim surrounding whitespace; an absent cell becomes the empty string.
pub fn trim_or_empty(raw: Option<&str>) -> String {
    raw.unwrap_or("").trim().to_string()
}

/// Map one validated raw row onto a [`Winery`].
///
/// Every expected column is read explicitly, so a column absent from the
/// file falls back to the same default as an empty cell rather than
/// propagating silently. Imported records are never featured; the id is
/// left for the store to assign at commit time.
pub fn normalize_row(row: &RawRow) -> Winery {
    Winery {
        id: None,
        name: trim_or_empty(row.get(columns::NAME)),
        site_url: trim_or_empty(row.get(columns::SITE_URL)),
        phone: trim_or_empty(row.get(columns::PHONE)),
        address: trim_or_empty(row.get(columns::ADDRESS)),
        city: trim_or_empty(row.get(columns::CITY)),
        state: trim_or_empty(row.get(columns::STATE)),
        rating: coerce_rating(row.get(columns::RATING)),
        image_url: trim_or_empty(row.get(columns::PHOTO_URL)),
        good_for_couples: coerce_boolean(row.get(columns::COUPLES)),
        good_for_groups: coerce_boolean(row.get(columns::GROUPS)),
        good_for_families: coerce_boolean(row.get(columns::FAMILIES)),
        pet_friendly: coerce_boolean(row.get(columns::PET_FRIENDLY)),
        outdoor_seating: coerce_boolean(row.get(columns::OUTDOOR_SEATING)),
        live_music: coerce_boolean(row.get(columns::LIVE_MUSIC)),
        description: trim_or_empty(row.get(columns::DESCRIPTION)),
        featured: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        let mut row = RawRow::new(1);
        for (column, value) in cells {
            row.insert(column, value);
        }
        row
    }

    #[test]
    fn boolean_accepts_only_the_true_token() {
        assert!(coerce_boolean(Some("true")));
        assert!(coerce_boolean(Some("TRUE")));
        assert!(coerce_boolean(Some("True")));
        assert!(!coerce_boolean(Some("false")));
        assert!(!coerce_boolean(Some("yes")));
        assert!(!coerce_boolean(Some("1")));
        assert!(!coerce_boolean(Some("")));
        assert!(!coerce_boolean(None));
    }

    #[test]
    fn boolean_does_not_trim() {
        assert!(!coerce_boolean(Some("TRUE ")));
        assert!(!coerce_boolean(Some(" true")));
    }

    #[test]
    fn rating_parses_plain_decimals() {
        assert_eq!(coerce_rating(Some("4.6")), 4.6);
        assert_eq!(coerce_rating(Some(" 3.5 ")), 3.5);
        assert_eq!(coerce_rating(Some("0")), 0.0);
    }

    #[test]
    fn rating_coerces_garbage_to_zero() {
        assert_eq!(coerce_rating(Some("N/A")), 0.0);
        assert_eq!(coerce_rating(Some("")), 0.0);
        assert_eq!(coerce_rating(None), 0.0);
        assert_eq!(coerce_rating(Some("four")), 0.0);
    }

    #[test]
    fn rating_rejects_negative_and_non_finite() {
        assert_eq!(coerce_rating(Some("-2.5")), 0.0);
        assert_eq!(coerce_rating(Some("inf")), 0.0);
        assert_eq!(coerce_rating(Some("NaN")), 0.0);
    }

    #[test]
    fn required_fields_trim_before_checking() {
        let r = row(&[
            (columns::NAME, "Cellar Door"),
            (columns::ADDRESS, "   "),
            (columns::CITY, ""),
            (columns::STATE, "CA"),
        ]);
        assert_eq!(
            require_fields(&r, &columns::REQUIRED),
            vec!["address".to_string(), "city".to_string()]
        );
    }

    #[test]
    fn required_fields_report_absent_columns() {
        let r = row(&[(columns::NAME, "Cellar Door")]);
        assert_eq!(
            require_fields(&r, &columns::REQUIRED),
            vec![
                "address".to_string(),
                "city".to_string(),
                "state".to_string()
            ]
        );
    }

    #[test]
    fn normalize_maps_photo_url_and_defaults_featured_off() {
        let r = row(&[
            (columns::NAME, " Cellar Door "),
            (columns::ADDRESS, "1 Vine St"),
            (columns::CITY, "Napa"),
            (columns::STATE, "California"),
            (columns::RATING, "4.2"),
            (columns::PHOTO_URL, "https://example.com/p.jpg"),
            (columns::PET_FRIENDLY, "TRUE"),
        ]);
        let winery = normalize_row(&r);
        assert_eq!(winery.name, "Cellar Door");
        assert_eq!(winery.image_url, "https://example.com/p.jpg");
        assert_eq!(winery.rating, 4.2);
        assert!(winery.pet_friendly);
        assert!(!winery.outdoor_seating);
        assert!(!winery.featured);
        assert!(winery.id.is_none());
        assert_eq!(winery.site_url, "");
    }

    #[test]
    fn persisted_vocabulary_is_camel_case() {
        let mut winery = Winery::new("Cellar Door", "1 Vine St", "Napa", "California");
        winery.id = Some("abc".to_string());
        winery.image_url = "https://example.com/p.jpg".to_string();
        winery.good_for_couples = true;
        let json = serde_json::to_value(&winery).unwrap();
        assert_eq!(json["imageUrl"], "https://example.com/p.jpg");
        assert_eq!(json["goodForCouples"], true);
        assert_eq!(json["siteUrl"], "");
        assert_eq!(json["featured"], false);
    }
}
