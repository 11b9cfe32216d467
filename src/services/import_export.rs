//! Bulk link upload and the spreadsheet template download.

use thiserror::Error;

use crate::domain::import::reconcile;
use crate::domain::platform::PlatformSet;
use crate::forms::import_export::UploadLinksForm;
use crate::repository::{LinkReader, LinkWriter, ProductReader};
use crate::services::catalog::{CatalogState, ensure_catalog, load_catalog};
use crate::services::{ServiceError, ServiceResult};

/// File name of the upload template, without extension.
pub const TEMPLATE_BASE_NAME: &str = "platform_links_template";

/// Outcome of a bulk upload, shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records the backend reports as written.
    pub updated: usize,
}

/// Parses an upload, reconciles it against the catalog and submits the
/// resulting batch.
///
/// The batch is sent even when no row matched. After a successful submit the
/// catalog is reloaded from the backend rather than patched locally.
pub async fn upload_platform_links<R>(
    form: &mut UploadLinksForm,
    repo: &R,
    state: &CatalogState,
    platforms: &PlatformSet,
) -> ServiceResult<ImportSummary>
where
    R: ProductReader + LinkReader + LinkWriter,
{
    let records = form.parse().map_err(|e| {
        log::warn!("Rejected link upload: {e}");
        ServiceError::from(e)
    })?;

    let catalog = ensure_catalog(repo, state, platforms).await?;
    let plan = reconcile(&records, catalog.products(), platforms);
    log::info!(
        "Link upload: {} rows, {} marketplace columns, {} matched products, {} short rows, {} unmatched SKUs",
        plan.rows_total,
        plan.platforms_matched,
        plan.links.len(),
        plan.rows_short,
        plan.rows_unmatched
    );

    let outcome = match repo.bulk_update_links(&plan.links).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Failed to submit link batch: {e}");
            return Err(ServiceError::Backend);
        }
    };

    if !outcome.success {
        log::error!("Backend refused link batch of {} records", plan.links.len());
        return Err(ServiceError::Backend);
    }

    let reload = load_catalog(repo, state, platforms).await?;
    if reload.stale {
        log::warn!("Catalog reload after link upload failed, snapshot is stale");
    }

    let submitted = plan.links.len();
    Ok(ImportSummary {
        updated: if outcome.updated_count == 0 {
            submitted
        } else {
            outcome.updated_count
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Csv,
    Xlsx,
}

impl TryFrom<&str> for DownloadFormat {
    type Error = DownloadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(DownloadError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid download format: {0}")]
    InvalidFormat(String),
    #[error("failed to render csv")]
    CsvRender,
    #[error("failed to render xlsx")]
    XlsxRender,
}

/// Header row plus one example row for the configured marketplaces.
pub fn download_template(format: &str, platforms: &PlatformSet) -> ServiceResult<DownloadFile> {
    let format = DownloadFormat::try_from(format)?;
    let file = render_download_file(
        TEMPLATE_BASE_NAME,
        format,
        &platforms.template_headers(),
        &[platforms.template_example_row()],
    )
    .map_err(|e| {
        log::error!("Failed to render link template: {e}");
        ServiceError::from(e)
    })?;
    Ok(file)
}

pub fn render_download_file(
    base_name: &str,
    format: DownloadFormat,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<DownloadFile, DownloadError> {
    match format {
        DownloadFormat::Csv => {
            let mut writer = csv::Writer::from_writer(vec![]);
            writer
                .write_record(headers)
                .map_err(|_| DownloadError::CsvRender)?;
            for row in rows {
                let escaped_row: Vec<String> =
                    row.iter().map(|value| escape_csv_cell(value)).collect();
                writer
                    .write_record(&escaped_row)
                    .map_err(|_| DownloadError::CsvRender)?;
            }
            let bytes = writer.into_inner().map_err(|_| DownloadError::CsvRender)?;
            Ok(DownloadFile {
                file_name: format!("{base_name}.csv"),
                content_type: "text/csv; charset=utf-8",
                bytes,
            })
        }
        DownloadFormat::Xlsx => {
            let mut workbook = rust_xlsxwriter::Workbook::new();
            let worksheet = workbook.add_worksheet();

            for (col_idx, header) in headers.iter().enumerate() {
                worksheet
                    .write_string(0, col_idx as u16, header)
                    .map_err(|_| DownloadError::XlsxRender)?;
            }

            for (row_idx, row) in rows.iter().enumerate() {
                let sheet_row = (row_idx + 1) as u32;
                for (col_idx, value) in row.iter().enumerate() {
                    worksheet
                        .write_string(sheet_row, col_idx as u16, value)
                        .map_err(|_| DownloadError::XlsxRender)?;
                }
            }

            let bytes = workbook
                .save_to_buffer()
                .map_err(|_| DownloadError::XlsxRender)?;
            Ok(DownloadFile {
                file_name: format!("{base_name}.xlsx"),
                content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                bytes,
            })
        }
    }
}

fn escape_csv_cell(value: &str) -> String {
    match value.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}
