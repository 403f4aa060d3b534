use crate::core::ids::next_id;
use crate::domain::model::{Entity, FileFormat, Identified};
use crate::domain::ports::Storage;
use crate::utils::error::{GymError, Result};
use serde_json::ser::{PrettyFormatter, Serializer};

/// A collection loaded for a read-modify-write cycle.
///
/// CSV rows that do not decode into `E` are kept verbatim, projected onto
/// `E::FIELDS`, and written back after the decoded records on save. Their id
/// column still counts for [`Table::next_id`].
#[derive(Debug, Clone, PartialEq)]
pub struct Table<E> {
    pub records: Vec<E>,
    unreadable: Vec<Vec<String>>,
}

impl<E> Table<E> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            unreadable: Vec::new(),
        }
    }

    fn unreadable_ids(&self) -> impl Iterator<Item = &str> {
        self.unreadable
            .iter()
            .filter_map(|row| row.first().map(String::as_str))
    }
}

impl<E: Identified> Table<E> {
    pub fn next_id(&self) -> String {
        next_id(
            self.records
                .iter()
                .map(|record| record.id())
                .chain(self.unreadable_ids()),
        )
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut E> {
        self.records.iter_mut().find(|record| record.id() == id)
    }

    /// True when `id` only exists as a row that could not be decoded.
    pub fn is_unreadable(&self, id: &str) -> bool {
        self.unreadable_ids().any(|raw| raw == id)
    }

    /// Drops every row with this id, decoded or not. Returns whether any was dropped.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len() + self.unreadable.len();
        self.records.retain(|record| record.id() != id);
        self.unreadable
            .retain(|row| row.first().map(String::as_str) != Some(id));
        self.records.len() + self.unreadable.len() < before
    }
}

/// Whole-collection persistence over a [`Storage`] backend.
///
/// Reads never fail: a missing or corrupt file is reported as an empty
/// collection. Writes replace the entire file and surface errors.
#[derive(Debug, Clone)]
pub struct RecordStore<S: Storage> {
    storage: S,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Creates `path` with an empty collection of `E` if it does not exist yet.
    pub fn initialize<E: Entity>(&self, path: &str) -> Result<()> {
        if self.storage.exists(path) {
            return Ok(());
        }

        tracing::debug!("Initializing {} file at {}", E::KIND, path);
        let data = encode::<E>(&[], &[])?;
        self.storage.write_file(path, &data)
    }

    pub fn load<E: Entity>(&self, path: &str) -> Vec<E> {
        self.load_table(path).records
    }

    pub fn load_table<E: Entity>(&self, path: &str) -> Table<E> {
        if let Err(e) = self.initialize::<E>(path) {
            tracing::warn!("Could not initialize {}: {}", path, e);
            return Table::empty();
        }

        let data = match self.storage.read_file(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path, e);
                return Table::empty();
            }
        };

        match decode::<E>(&data) {
            Ok(table) => {
                tracing::debug!(
                    "Loaded {} {} records from {} ({} unreadable)",
                    table.records.len(),
                    E::KIND,
                    path,
                    table.unreadable.len()
                );
                table
            }
            Err(e) => {
                tracing::warn!("Treating {} as empty, could not parse it: {}", path, e);
                Table::empty()
            }
        }
    }

    pub fn save<E: Entity>(&self, path: &str, records: &[E]) -> Result<()> {
        let data = encode(records, &[])?;
        self.storage.write_file(path, &data)?;
        tracing::debug!("Saved {} {} records to {}", records.len(), E::KIND, path);
        Ok(())
    }

    pub fn save_table<E: Entity>(&self, path: &str, table: &Table<E>) -> Result<()> {
        let data = encode(&table.records, &table.unreadable)?;
        self.storage.write_file(path, &data)?;
        tracing::debug!(
            "Saved {} {} records to {}",
            table.records.len() + table.unreadable.len(),
            E::KIND,
            path
        );
        Ok(())
    }
}

fn encode<E: Entity>(records: &[E], unreadable: &[Vec<String>]) -> Result<Vec<u8>> {
    match E::FORMAT {
        FileFormat::Csv => {
            // Header is written by hand so that an empty collection still has one.
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(Vec::new());
            writer.write_record(E::FIELDS)?;
            for record in records {
                writer.serialize(record)?;
            }
            for row in unreadable {
                writer.write_record(row)?;
            }
            writer
                .into_inner()
                .map_err(|e| GymError::IoError(e.into_error()))
        }
        FileFormat::Json => {
            let mut data = Vec::new();
            let mut serializer =
                Serializer::with_formatter(&mut data, PrettyFormatter::with_indent(b"    "));
            serde::Serialize::serialize(records, &mut serializer)?;
            Ok(data)
        }
    }
}

fn decode<E: Entity>(data: &[u8]) -> Result<Table<E>> {
    match E::FORMAT {
        FileFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_reader(data);
            let headers = reader.byte_headers()?.clone();
            let columns: Vec<Option<usize>> = E::FIELDS
                .iter()
                .map(|field| headers.iter().position(|h| h == field.as_bytes()))
                .collect();

            let mut table = Table::empty();
            for (line, row) in reader.byte_records().enumerate() {
                let row = row?;
                match row.deserialize::<E>(Some(&headers)) {
                    Ok(record) => table.records.push(record),
                    Err(e) => {
                        tracing::warn!("Keeping unreadable {} row {} as is: {}", E::KIND, line + 1, e);
                        let raw = columns
                            .iter()
                            .map(|column| {
                                column
                                    .and_then(|i| row.get(i))
                                    .map(|value| String::from_utf8_lossy(value).into_owned())
                                    .unwrap_or_default()
                            })
                            .collect();
                        table.unreadable.push(raw);
                    }
                }
            }
            Ok(table)
        }
        // A root that is not a list fails to deserialize into Vec<E>.
        FileFormat::Json => Ok(Table {
            records: serde_json::from_slice(data)?,
            unreadable: Vec::new(),
        }),
    }
}
