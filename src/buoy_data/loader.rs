use crate::buoy_data::error::BuoyDataError;
use crate::types::schema;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::task;

/// Public-export endpoint of the durable file store holding the combined CSV.
pub const DRIVE_EXPORT_URL: &str = "https://drive.google.com/uc";

/// Wall-clock format of the `Timestamp (GMT+7)` column in the stored CSV.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct HistoricalLoader {
    base_url: String,
    download_client: Client,
}

impl HistoricalLoader {
    pub fn new(base_url: impl Into<String>) -> HistoricalLoader {
        HistoricalLoader {
            base_url: base_url.into(),
            download_client: Client::new(),
        }
    }

    /// Downloads and parses the combined historical CSV for a storage file id.
    ///
    /// Rows whose timestamp fails to parse are dropped entirely; an
    /// entirely-empty result after parsing is an error, as is any storage
    /// fetch failure. No retry on either.
    pub async fn load_frame(&self, file: &str) -> Result<DataFrame, BuoyDataError> {
        let raw_bytes = self.download(file).await?;
        let df = Self::csv_to_dataframe(raw_bytes, file).await?;
        let df = Self::normalize_timestamps(df, file)?;
        info!("Loaded {} historical rows for file {}", df.height(), file);
        Ok(df)
    }

    /// Downloads the raw CSV bytes for a storage file id.
    async fn download(&self, file: &str) -> Result<Vec<u8>, BuoyDataError> {
        let url = format!("{}?export=download&id={}", self.base_url, file);
        info!("Downloading historical data from {}", url);

        let response = self
            .download_client
            .get(&url)
            .send()
            .await
            .map_err(|e| BuoyDataError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    BuoyDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    BuoyDataError::NetworkRequest(url, e)
                });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BuoyDataError::NetworkRequest(url, e))?;
        info!("Downloaded {} bytes for file {}", bytes.len(), file);
        Ok(bytes.to_vec())
    }

    /// Parses raw CSV bytes (with header row) into a DataFrame using a
    /// blocking task, and checks the canonical columns are all present.
    async fn csv_to_dataframe(bytes: Vec<u8>, file: &str) -> Result<DataFrame, BuoyDataError> {
        let file_owned = file.to_string();

        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new().map_err(|e| BuoyDataError::CsvReadIo {
                file: file_owned.clone(),
                source: e,
            })?;
            temp_file
                .write_all(&bytes)
                .map_err(|e| BuoyDataError::CsvReadIo {
                    file: file_owned.clone(),
                    source: e,
                })?;
            temp_file.flush().map_err(|e| BuoyDataError::CsvReadIo {
                file: file_owned.clone(),
                source: e,
            })?;

            let df = CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(|e| BuoyDataError::CsvReadPolars {
                    file: file_owned.clone(),
                    source: e,
                })?
                .finish()
                .map_err(|e| BuoyDataError::CsvReadPolars {
                    file: file_owned.clone(),
                    source: e,
                })?;

            for column in schema::dataset_columns() {
                if df.column(column).is_err() {
                    warn!("CSV for file {} is missing column '{}'", file_owned, column);
                    return Err(BuoyDataError::MissingColumn {
                        file: file_owned,
                        column: column.to_string(),
                    });
                }
            }

            Ok(df)
        })
        .await?
    }

    /// Parses the timestamp column into target-zone datetimes, drops rows
    /// that fail to parse and casts value columns to their canonical dtypes.
    fn normalize_timestamps(df: DataFrame, file: &str) -> Result<DataFrame, BuoyDataError> {
        let parsed = col(schema::TIMESTAMP_COL).str().to_datetime(
            Some(TimeUnit::Milliseconds),
            None,
            StrptimeOptions {
                format: Some(TIMESTAMP_FORMAT.into()),
                strict: false,
                exact: true,
                cache: true,
            },
            lit("raise"),
        );

        let canonical: Vec<Expr> = schema::dataset_columns().iter().map(|c| col(*c)).collect();
        let df = df
            .lazy()
            .with_column(parsed.alias(schema::TIMESTAMP_COL))
            .filter(col(schema::TIMESTAMP_COL).is_not_null())
            .with_columns([
                col(schema::TEMPERATURE_COL).cast(DataType::Float64),
                col(schema::PH_COL).cast(DataType::Float64),
                col(schema::EC_RAW_COL).cast(DataType::Int64),
                col(schema::DO_RAW_COL).cast(DataType::Float64),
                col(schema::SALINITY_COL).cast(DataType::Float64),
                col(schema::CONDUCTIVITY_COL).cast(DataType::Float64),
            ])
            .select(canonical)
            .collect()
            .map_err(|e| BuoyDataError::TimestampParse {
                file: file.to_string(),
                source: e,
            })?;

        if df.height() == 0 {
            return Err(BuoyDataError::EmptyDataset {
                file: file.to_string(),
            });
        }
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::schema::{EC_RAW_COL, TEMPERATURE_COL, TIMESTAMP_COL};
    use httpmock::prelude::*;

    const CSV_HEADER: &str =
        "Timestamp (GMT+7),Temperature (°C),pH,EC Raw,DO Raw,Salinity (ppt),EC (mS/cm)";

    fn csv_body(rows: &[&str]) -> String {
        let mut body = String::from(CSV_HEADER);
        for row in rows {
            body.push('\n');
            body.push_str(row);
        }
        body
    }

    async fn serve_csv(server: &MockServer, file: &str, body: String) {
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/uc")
                    .query_param("export", "download")
                    .query_param("id", file);
                then.status(200)
                    .header("content-type", "text/csv")
                    .body(body);
            })
            .await;
    }

    fn loader_for(server: &MockServer) -> HistoricalLoader {
        HistoricalLoader::new(server.url("/uc"))
    }

    #[tokio::test]
    async fn loads_and_normalizes_the_combined_csv() {
        let server = MockServer::start_async().await;
        serve_csv(
            &server,
            "combined",
            csv_body(&[
                "2025-01-17 08:00:00,28.5,7.1,2400,1.2,0.9,1.2",
                "2025-01-17 08:10:00,28.6,7.0,2420,1.3,0.9,1.21",
            ]),
        )
        .await;

        let df = loader_for(&server).load_frame("combined").await.unwrap();

        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, schema::dataset_columns());
        assert_eq!(
            df.column(TIMESTAMP_COL).unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(df.column(EC_RAW_COL).unwrap().dtype(), &DataType::Int64);
        let temps = df.column(TEMPERATURE_COL).unwrap().f64().unwrap();
        assert_eq!(temps.get(0), Some(28.5));
    }

    #[tokio::test]
    async fn drops_rows_with_unparseable_timestamps() {
        let server = MockServer::start_async().await;
        serve_csv(
            &server,
            "combined",
            csv_body(&[
                "2025-01-17 08:00:00,28.5,7.1,2400,1.2,0.9,1.2",
                "not-a-timestamp,99.0,9.9,9999,9.9,9.9,9.9",
                "2025-01-17 08:20:00,28.7,7.2,2410,1.2,0.9,1.205",
            ]),
        )
        .await;

        let df = loader_for(&server).load_frame("combined").await.unwrap();

        // The malformed row is gone entirely, other fields included.
        assert_eq!(df.height(), 2);
        let temps = df.column(TEMPERATURE_COL).unwrap().f64().unwrap();
        assert_eq!(temps.get(0), Some(28.5));
        assert_eq!(temps.get(1), Some(28.7));
    }

    #[tokio::test]
    async fn all_timestamps_unparseable_is_an_error() {
        let server = MockServer::start_async().await;
        serve_csv(
            &server,
            "combined",
            csv_body(&["garbage,1.0,1.0,1,1.0,1.0,1.0"]),
        )
        .await;

        let err = loader_for(&server).load_frame("combined").await.unwrap_err();
        assert!(matches!(err, BuoyDataError::EmptyDataset { .. }));
    }

    #[tokio::test]
    async fn missing_column_is_an_error() {
        let server = MockServer::start_async().await;
        serve_csv(
            &server,
            "combined",
            "Timestamp (GMT+7),Temperature (°C)\n2025-01-17 08:00:00,28.5".to_string(),
        )
        .await;

        let err = loader_for(&server).load_frame("combined").await.unwrap_err();
        assert!(matches!(err, BuoyDataError::MissingColumn { .. }));
    }

    #[tokio::test]
    async fn storage_fetch_failure_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/uc");
                then.status(403);
            })
            .await;

        let err = loader_for(&server).load_frame("combined").await.unwrap_err();
        assert!(matches!(
            err,
            BuoyDataError::HttpStatus { status, .. } if status == reqwest::StatusCode::FORBIDDEN
        ));
    }
}
