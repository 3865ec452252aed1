//! Tagged cell values produced by the tabular source

/// Types of cell data in the measurement table. Header and data cells are
/// treated uniformly through this tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    /// The vendor NaN marker
    NotANumber,
    /// Text values, including the header row markers
    Text(String),
    /// Numeric measurement values
    Number(f64),
}

impl Cell {
    /// Tag a raw textual cell the way the acquisition layer does: empty
    /// string, the literal "NaN", a parseable number, or free text.
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            Cell::Empty
        } else if raw == "NaN" {
            Cell::NotANumber
        } else if let Ok(value) = raw.parse::<f64>() {
            Cell::Number(value)
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Render the cell as the string the assembly stages operate on
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::NotANumber => "NaN".to_string(),
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => crate::limits::unit::trim_number(&format!("{}", value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }
}
