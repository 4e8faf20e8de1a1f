//! Editable table of search entries.
//!
//! The table always holds at least one row. Row ids come from a counter that
//! only ever grows, so a stale id can never address a newer row.

use std::fmt;

use crate::protocol::{BulkSearchRequest, SearchEntry};

pub type RowId = u64;

pub const MIN_IMAGES_PER_CLASS: u32 = 1;
pub const MAX_IMAGES_PER_CLASS: u32 = 500;
pub const DEFAULT_IMAGES_PER_CLASS: &str = "100";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowField {
    Keyword,
    ClassName,
    DestinationFolder,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRow {
    pub id: RowId,
    pub keyword: String,
    pub class_name: String,
    pub destination_folder: String,
}

impl SearchRow {
    fn new(id: RowId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn trimmed(&self) -> (&str, &str, &str) {
        (
            self.keyword.trim(),
            self.class_name.trim(),
            self.destination_folder.trim(),
        )
    }

    pub fn is_complete(&self) -> bool {
        let (keyword, class_name, _) = self.trimmed();
        !keyword.is_empty() && !class_name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    LastRow,
    UnknownRow(RowId),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::LastRow => write!(f, "You must have at least one search entry."),
            TableError::UnknownRow(id) => write!(f, "no search entry with id {id}"),
        }
    }
}

impl std::error::Error for TableError {}

/// A single inline validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub row: RowId,
    pub field: RowField,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub field_errors: Vec<FieldError>,
    pub images_per_class_error: Option<&'static str>,
    pub complete_rows: usize,
}

impl ValidationReport {
    pub fn missing_entries(&self) -> bool {
        self.complete_rows == 0
    }

    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.images_per_class_error.is_none() && !self.missing_entries()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTable {
    rows: Vec<SearchRow>,
    last_row_id: RowId,
}

impl Default for SearchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchTable {
    pub fn new() -> Self {
        let mut table = Self {
            rows: Vec::new(),
            last_row_id: 0,
        };
        table.add_row();
        table
    }

    pub fn rows(&self) -> &[SearchRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add_row(&mut self) -> RowId {
        self.last_row_id += 1;
        self.rows.push(SearchRow::new(self.last_row_id));
        self.last_row_id
    }

    pub fn delete_row(&mut self, id: RowId) -> Result<(), TableError> {
        if self.rows.len() <= 1 {
            return Err(TableError::LastRow);
        }
        let index = self
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(TableError::UnknownRow(id))?;
        self.rows.remove(index);
        Ok(())
    }

    pub fn set_field(&mut self, id: RowId, field: RowField, value: String) -> Result<(), TableError> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(TableError::UnknownRow(id))?;
        match field {
            RowField::Keyword => row.keyword = value,
            RowField::ClassName => row.class_name = value,
            RowField::DestinationFolder => row.destination_folder = value,
        }
        Ok(())
    }

    /// Drops every row and starts over with a single empty one.
    ///
    /// Ids keep counting from where they were.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.add_row();
    }

    pub fn validate(&self, images_per_class: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        for row in &self.rows {
            let (keyword, class_name, destination) = row.trimmed();
            match (keyword.is_empty(), class_name.is_empty()) {
                (false, false) => report.complete_rows += 1,
                (true, false) => report.field_errors.push(FieldError {
                    row: row.id,
                    field: RowField::Keyword,
                    message: "Please enter a keyword",
                }),
                (false, true) => report.field_errors.push(FieldError {
                    row: row.id,
                    field: RowField::ClassName,
                    message: "Please enter a class name",
                }),
                // Blank rows are not errors; collect() skips them.
                (true, true) => {}
            }

            if !destination.is_empty() && !is_valid_destination(destination) {
                report.field_errors.push(FieldError {
                    row: row.id,
                    field: RowField::DestinationFolder,
                    message: "Folder may only contain letters, digits, spaces, - _ / \\",
                });
            }
        }

        if parse_images_per_class(images_per_class).is_none() {
            report.images_per_class_error = Some("Please enter a number between 1 and 500");
        }

        report
    }

    /// Builds the request payload from complete rows only.
    pub fn collect(&self, images_per_class: u32, destination_folder: &str) -> BulkSearchRequest {
        let search_entries = self
            .rows
            .iter()
            .filter(|row| row.is_complete())
            .map(|row| {
                let (keyword, class_name, destination) = row.trimmed();
                SearchEntry {
                    keyword: keyword.to_string(),
                    class_name: class_name.to_string(),
                    destination_folder: (!destination.is_empty()).then(|| destination.to_string()),
                }
            })
            .collect();

        BulkSearchRequest {
            search_entries,
            images_per_class,
            destination_folder: destination_folder.trim().to_string(),
        }
    }
}

/// Parses the images-per-class input; `None` unless it is an integer in
/// `[1, 500]`.
pub fn parse_images_per_class(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|count| (MIN_IMAGES_PER_CLASS..=MAX_IMAGES_PER_CLASS).contains(count))
}

pub fn is_valid_destination(folder: &str) -> bool {
    folder
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '/' | '\\'))
}
