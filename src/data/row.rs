//! Spreadsheet rows and their mapping to testimonials
//!
//! Form responses arrive as positional string cells. `RawRow` gives each
//! column a name; cells past the end of a short row are simply absent.

use tracing::debug;

use super::{Author, Avatar, Testimonial};

/// Placeholder author name for rows with a blank name
const ANONYMOUS_NAME: &str = "Anonymous";

/// Placeholder author description when neither position nor company is set
const DEFAULT_DESCRIPTION: &str = "Client";

/// Sheet row number of the first data row (row 1 holds the form headers)
const FIRST_DATA_ROW: usize = 2;

/// One form response, column by column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Column A: submission timestamp
    pub timestamp: Option<String>,
    /// Column B: full name
    pub name: Option<String>,
    /// Column C: position or title
    pub position: Option<String>,
    /// Column D: company or organization
    pub company: Option<String>,
    /// Column E: overall experience rating
    pub experience_rating: Option<String>,
    /// Column F: key qualities
    pub key_qualities: Option<String>,
    /// Column G: area of value
    pub area_of_value: Option<String>,
    /// Column H: understanding rating
    pub understanding_rating: Option<String>,
    /// Column I: what working together felt like
    pub working_experience: Option<String>,
    /// Column J: tangible impact of the work
    pub tangible_impact: Option<String>,
    /// Column K: would recommend
    pub recommend: Option<String>,
}

/// Returns the trimmed field if it holds any non-whitespace text
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl RawRow {
    /// Builds a row from positional cells, leaving missing columns empty
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let cell = |index: usize| cells.get(index).map(|c| c.as_ref().to_string());

        Self {
            timestamp: cell(0),
            name: cell(1),
            position: cell(2),
            company: cell(3),
            experience_rating: cell(4),
            key_qualities: cell(5),
            area_of_value: cell(6),
            understanding_rating: cell(7),
            working_experience: cell(8),
            tangible_impact: cell(9),
            recommend: cell(10),
        }
    }

    /// Whether the row carries a non-blank name
    pub fn has_name(&self) -> bool {
        present(&self.name).is_some()
    }

    /// The quote text: working experience, tangible impact, or both joined by a space
    pub fn quote(&self) -> Option<String> {
        match (
            present(&self.working_experience),
            present(&self.tangible_impact),
        ) {
            (Some(experience), Some(impact)) => Some(format!("{experience} {impact}")),
            (Some(text), None) | (None, Some(text)) => Some(text.to_string()),
            (None, None) => None,
        }
    }

    /// "<position> at <company>", whichever part is present, or "Client"
    pub fn description(&self) -> String {
        match (present(&self.position), present(&self.company)) {
            (Some(position), Some(company)) => format!("{position} at {company}"),
            (Some(part), None) | (None, Some(part)) => part.to_string(),
            (None, None) => DEFAULT_DESCRIPTION.to_string(),
        }
    }

    /// Maps the row to a testimonial, or `None` when it has no quote text
    pub fn to_testimonial(&self) -> Option<Testimonial> {
        let quote = self.quote()?;
        let name = present(&self.name).unwrap_or(ANONYMOUS_NAME);

        Some(Testimonial {
            quote,
            author: Author {
                name: name.to_string(),
                description: self.description(),
                avatar: Avatar::for_name(name),
            },
        })
    }
}

/// Filters and maps sheet rows into testimonials, preserving row order.
///
/// Rows without a name or without any quote text are dropped individually.
pub fn testimonials_from_rows(rows: &[RawRow]) -> Vec<Testimonial> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let row_number = index + FIRST_DATA_ROW;

            if !row.has_name() {
                debug!(row = row_number, "Row filtered out: missing name");
                return None;
            }

            let testimonial = row.to_testimonial();
            if testimonial.is_none() {
                debug!(
                    row = row_number,
                    name = row.name.as_deref().unwrap_or_default(),
                    "Row filtered out: no quote text"
                );
            }
            testimonial
        })
        .collect()
}
