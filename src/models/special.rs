use serde::{Deserialize, Serialize};

/// Upper bound on food or drink specials per venue.
pub const MAX_SPECIALS: usize = 3;

/// A single food or drink special. Stored as a JSON array in the venue's
/// `hh_food_details` / `hh_drink_details` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HhItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Which specials list a save targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialsKind {
    Food,
    Drink,
}

impl SpecialsKind {
    pub(crate) fn column(self) -> &'static str {
        match self {
            SpecialsKind::Food => "hh_food_details",
            SpecialsKind::Drink => "hh_drink_details",
        }
    }
}

/// A raw editor row; empty strings mean "not provided".
#[derive(Debug, Clone, Default)]
pub struct ItemInput {
    pub name: String,
    pub price: String,
    pub notes: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpecialsError {
    #[error("item {row} needs a name")]
    MissingName { row: usize },
    #[error("at most {MAX_SPECIALS} items are allowed")]
    TooMany,
}

/// Trims and normalizes editor rows into storable items. Rows left
/// entirely blank are dropped; a row with a price or notes but no name is
/// an error, as is exceeding the item limit.
pub fn normalize_specials(rows: &[ItemInput]) -> Result<Vec<HhItem>, SpecialsError> {
    let mut items = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let name = row.name.trim();
        let price = row.price.trim();
        let notes = row.notes.trim();

        if name.is_empty() && price.is_empty() && notes.is_empty() {
            continue;
        }
        if name.is_empty() {
            return Err(SpecialsError::MissingName { row: idx + 1 });
        }

        items.push(HhItem {
            name: name.to_string(),
            price: (!price.is_empty()).then(|| price.to_string()),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        });
    }

    if items.len() > MAX_SPECIALS {
        return Err(SpecialsError::TooMany);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, price: &str, notes: &str) -> ItemInput {
        ItemInput {
            name: name.to_string(),
            price: price.to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn test_normalize_trims_and_drops_blank_rows() {
        let items = normalize_specials(&[
            row(" Smash Burger ", "13", "GF"),
            row("", "", ""),
            row("House Pint", "", ""),
        ])
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Smash Burger");
        assert_eq!(items[0].price.as_deref(), Some("13"));
        assert_eq!(items[0].notes.as_deref(), Some("GF"));
        assert_eq!(items[1].name, "House Pint");
        assert!(items[1].price.is_none());
    }

    #[test]
    fn test_name_required_when_row_has_content() {
        let err = normalize_specials(&[row("", "5", "")]).unwrap_err();
        assert_eq!(err, SpecialsError::MissingName { row: 1 });
    }

    #[test]
    fn test_item_limit() {
        let rows: Vec<ItemInput> = (0..4).map(|i| row(&format!("Item {i}"), "", "")).collect();
        assert_eq!(normalize_specials(&rows).unwrap_err(), SpecialsError::TooMany);
    }

    #[test]
    fn test_json_omits_empty_optionals() {
        let items = normalize_specials(&[row("House Pint", "5", "")]).unwrap();
        let json = serde_json::to_string(&items).unwrap();
        assert_eq!(json, r#"[{"name":"House Pint","price":"5"}]"#);

        let back: Vec<HhItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, items);
    }
}
