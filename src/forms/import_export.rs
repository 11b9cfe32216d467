use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use calamine::{Data, Reader, open_workbook_auto};
use thiserror::Error;

/// Kind of content an uploaded file carries, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSource {
    Delimited,
    Workbook,
}

impl TryFrom<&str> for UploadSource {
    type Error = UploadParseError;

    fn try_from(file_name: &str) -> Result<Self, Self::Error> {
        let file_name = file_name.trim().to_ascii_lowercase();
        match file_name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("csv" | "txt") | None => Ok(Self::Delimited),
            Some("xlsx" | "xls" | "ods") => Ok(Self::Workbook),
            Some(other) => Err(UploadParseError::UnsupportedFile(other.to_string())),
        }
    }
}

/// Bulk link upload: a spreadsheet file or pasted comma-separated text.
///
/// A non-empty file wins over the text area.
#[derive(MultipartForm)]
pub struct UploadLinksForm {
    #[multipart(limit = "10MB")]
    pub file: Option<TempFile>,
    pub text: Option<Text<String>>,
}

#[derive(Debug, Error)]
pub enum UploadParseError {
    #[error("Please select a file or paste CSV data")]
    Empty,
    #[error("unsupported file type: .{0}")]
    UnsupportedFile(String),
    #[error("failed to read uploaded file")]
    ReadFailed,
    #[error("failed to parse CSV")]
    CsvParseFailed,
    #[error("failed to parse spreadsheet")]
    WorkbookParseFailed,
    #[error("uploaded spreadsheet has no worksheet")]
    MissingSheet,
}

impl From<std::io::Error> for UploadParseError {
    fn from(_: std::io::Error) -> Self {
        Self::ReadFailed
    }
}

impl From<csv::Error> for UploadParseError {
    fn from(_: csv::Error) -> Self {
        Self::CsvParseFailed
    }
}

impl From<calamine::Error> for UploadParseError {
    fn from(_: calamine::Error) -> Self {
        Self::WorkbookParseFailed
    }
}

impl UploadLinksForm {
    /// Reads the submission into rows of cells, header row first.
    ///
    /// Blank lines are dropped before the header is picked, so the first
    /// non-empty line always becomes the header.
    pub fn parse(&mut self) -> Result<Vec<Vec<String>>, UploadParseError> {
        let rows = match self.file.as_mut().filter(|file| file.size > 0) {
            Some(file) => parse_uploaded_file(file)?,
            None => match self.text.as_ref().map(|text| text.0.as_str()) {
                Some(text) if !text.trim().is_empty() => parse_delimited_text(text)?,
                _ => return Err(UploadParseError::Empty),
            },
        };

        if rows.is_empty() {
            return Err(UploadParseError::Empty);
        }
        Ok(rows)
    }
}

fn parse_uploaded_file(file: &mut TempFile) -> Result<Vec<Vec<String>>, UploadParseError> {
    let source = UploadSource::try_from(file.file_name.as_deref().unwrap_or_default())?;
    match source {
        UploadSource::Delimited => {
            let handle = file.file.as_file_mut();
            handle.seek(SeekFrom::Start(0))?;

            let mut content = String::new();
            handle.read_to_string(&mut content)?;
            parse_delimited_text(&content)
        }
        UploadSource::Workbook => parse_workbook(file.file.path()),
    }
}

/// Splits comma-separated text into trimmed cells.
///
/// Quotes carry no meaning and stay part of the cell, rows may differ in
/// length and lines without any content are skipped.
pub fn parse_delimited_text(text: &str) -> Result<Vec<Vec<String>>, UploadParseError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

/// Reads the first worksheet of a workbook, rendering every cell as text.
pub fn parse_workbook(path: &Path) -> Result<Vec<Vec<String>>, UploadParseError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(UploadParseError::MissingSheet)??;

    Ok(range
        .rows()
        .map(|row| {
            let mut cells = row.iter().map(cell_to_string).collect::<Vec<_>>();
            // Ranges are padded to the sheet width; padding is not a field.
            while cells.last().is_some_and(String::is_empty) {
                cells.pop();
            }
            cells
        })
        .filter(|row| !row.is_empty())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        _ => cell.to_string().trim().to_string(),
    }
}
