use crate::data_fetcher::models::{DATE_COLUMN, Dataset, RecordKey, StatRecord};
use crate::data_fetcher::processors::time_parsing::parse_game_datetime;
use crate::error::AppError;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

/// Rows dropped while reading because they could not be turned into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkippedRows {
    /// Empty or unparseable `gameDateTimeEst`
    pub bad_timestamp: usize,
    /// Empty entity id or game id
    pub missing_key: usize,
}

impl SkippedRows {
    pub fn total(&self) -> usize {
        self.bad_timestamp + self.missing_key
    }
}

/// Streaming reader that turns a dataset CSV into [`StatRecord`]s.
///
/// Headers are validated up front: every expected column of the dataset
/// must be present (extra columns are fine and are dropped). Rows are then
/// produced lazily so the caller can filter without holding the whole
/// multi-million row file in memory.
pub struct DatasetReader<R: Read> {
    reader: csv::Reader<R>,
    row: csv::StringRecord,
    /// For each expected header, its position in the CSV
    column_map: Vec<usize>,
    date_index: usize,
    entity_index: usize,
    game_index: usize,
    skipped: SkippedRows,
}

impl<R: Read> DatasetReader<R> {
    /// Reads and validates the header row.
    ///
    /// # Errors
    /// * `AppError::MissingColumns` - one or more expected columns are absent
    /// * `AppError::Csv` - the header row could not be read
    pub fn new(dataset: Dataset, input: R) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

        let positions: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().trim_start_matches('\u{feff}').to_string(), i))
            .collect();
        let csv_columns = positions.len();

        let expected = dataset.expected_headers();
        let missing: Vec<&str> = expected
            .iter()
            .copied()
            .filter(|h| !positions.contains_key(*h))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::missing_columns(missing));
        }

        let column_map: Vec<usize> = expected.iter().map(|h| positions[*h]).collect();
        let layout = dataset.key_layout();
        let date_index = positions[DATE_COLUMN];

        info!("CSV headers validated OK ({csv_columns} columns).");

        Ok(DatasetReader {
            reader,
            row: csv::StringRecord::new(),
            entity_index: column_map[layout.entity_index],
            game_index: column_map[layout.game_index],
            column_map,
            date_index,
            skipped: SkippedRows::default(),
        })
    }

    /// Rows skipped so far.
    pub fn skipped(&self) -> SkippedRows {
        self.skipped
    }

    /// Reads the next usable record, skipping rows without a timestamp or key.
    pub fn next_record(&mut self) -> Result<Option<StatRecord>, AppError> {
        loop {
            if !self.reader.read_record(&mut self.row)? {
                return Ok(None);
            }

            let cell = |i: usize| self.row.get(i).unwrap_or("");

            let Some(game_time) = parse_game_datetime(cell(self.date_index)) else {
                self.skipped.bad_timestamp += 1;
                debug!(
                    "Skipping row {}: unparseable {DATE_COLUMN} '{}'",
                    self.row.position().map_or(0, |p| p.line()),
                    cell(self.date_index)
                );
                continue;
            };

            let key = RecordKey::new(cell(self.entity_index), cell(self.game_index));
            if key.is_incomplete() {
                self.skipped.missing_key += 1;
                continue;
            }

            let values = self
                .column_map
                .iter()
                .map(|&i| cell(i).to_string())
                .collect();

            return Ok(Some(StatRecord {
                key,
                game_time,
                values,
            }));
        }
    }
}

impl<R: Read> Iterator for DatasetReader<R> {
    type Item = Result<StatRecord, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Reads every usable record of a dataset into memory.
pub fn parse_records<R: Read>(
    dataset: Dataset,
    input: R,
) -> Result<(Vec<StatRecord>, SkippedRows), AppError> {
    let mut reader = DatasetReader::new(dataset, input)?;
    let records = reader.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((records, reader.skipped()))
}
