//! Flat-file record store.
//!
//! Every table is a single CSV file with a header row. Reads tolerate a
//! missing file (empty table) and skip rows that fail to deserialize.
//! Mutations hold the table lock for the whole read-modify-rewrite and
//! commit by renaming a fully written temporary file over the original.
use std::fmt;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ServiceError;

/// canonical form of a participant name, used for every comparison
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A row type that can live in a `Table`
pub trait Record: Serialize + DeserializeOwned + fmt::Debug {
    /// identity of a row, the target of upserts and deletes
    type Key: PartialEq + fmt::Display + fmt::Debug;

    /// human readable name used in error messages
    const NAME: &'static str;
    const FILE_NAME: &'static str;
    const HEADERS: &'static [&'static str];

    fn key(&self) -> Self::Key;

    /// normalize the row, called on every row read from and written to disk
    fn canonicalize(&mut self);
}

pub struct Table<T> {
    path: PathBuf,
    lock: Mutex<()>,
    record: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table").field("path", &self.path).finish()
    }
}

impl<T: Record> Table<T> {
    /// open the table in `dir`, nothing is read or created yet
    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        Table {
            path: dir.as_ref().join(T::FILE_NAME),
            lock: Mutex::new(()),
            record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// write an empty table with headers when the file doesn't exist yet
    pub fn ensure_exists(&self) -> Result<(), ServiceError> {
        let _guard = self.acquire()?;

        if !self.path.exists() {
            info!("creating {}", self.path.display());
            self.write(&[])?;
        }

        Ok(())
    }

    #[tracing::instrument(name = "Table::list", skip(self), fields(table = T::FILE_NAME))]
    pub fn list(&self) -> Result<Vec<T>, ServiceError> {
        let _guard = self.acquire()?;
        self.read()
    }

    /// Read the table, apply `change` and rewrite the table.
    ///
    /// Nothing is written when `change` returns an error.
    pub fn modify<R, F>(&self, change: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let _guard = self.acquire()?;

        let mut records = self.read()?;
        let result = change(&mut records)?;

        for record in records.iter_mut() {
            record.canonicalize();
        }
        self.write(&records)?;

        Ok(result)
    }

    /// Replace the first row sharing the key of `record`, or append it.
    ///
    /// Returns `true` when the record was appended.
    #[tracing::instrument(name = "Table::upsert", skip(self, record), fields(table = T::FILE_NAME))]
    pub fn upsert(&self, mut record: T) -> Result<bool, ServiceError> {
        record.canonicalize();

        self.modify(|records| {
            let key = record.key();
            match records.iter_mut().find(|existing| existing.key() == key) {
                Some(existing) => {
                    *existing = record;
                    Ok(false)
                }
                None => {
                    records.push(record);
                    Ok(true)
                }
            }
        })
    }

    /// Append `record`, failing with a conflict when its key is taken
    #[tracing::instrument(name = "Table::insert", skip(self, record), fields(table = T::FILE_NAME))]
    pub fn insert(&self, mut record: T) -> Result<(), ServiceError> {
        record.canonicalize();

        self.modify(|records| {
            let key = record.key();
            if records.iter().any(|existing| existing.key() == key) {
                conflict!(format!("{} \"{}\" already exists", T::NAME, key));
            }
            records.push(record);
            Ok(())
        })
    }

    /// Apply `change` to the first row matching `key`
    #[tracing::instrument(name = "Table::update", skip(self, change), fields(table = T::FILE_NAME))]
    pub fn update<F>(&self, key: &T::Key, change: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut T),
        T: Clone,
    {
        self.modify(|records| match records.iter_mut().find(|row| row.key() == *key) {
            Some(row) => {
                change(row);
                row.canonicalize();
                Ok(row.clone())
            }
            None => Err(not_found::<T>(key)),
        })
    }

    /// Remove every row matching `key`, returns how many were removed
    #[tracing::instrument(name = "Table::delete", skip(self), fields(table = T::FILE_NAME))]
    pub fn delete(&self, key: &T::Key) -> Result<usize, ServiceError> {
        self.modify(|records| {
            let before = records.len();
            records.retain(|row| row.key() != *key);

            match before - records.len() {
                0 => Err(not_found::<T>(key)),
                removed => Ok(removed),
            }
        })
    }

    /// Keep only the rows matching `keep`, returns how many were removed
    pub fn retain<F>(&self, mut keep: F) -> Result<usize, ServiceError>
    where
        F: FnMut(&T) -> bool,
    {
        self.modify(|records| {
            let before = records.len();
            records.retain(|row| keep(row));
            Ok(before - records.len())
        })
    }

    /// the file contents as stored, a missing file exports as the header row
    #[tracing::instrument(name = "Table::export", skip(self), fields(table = T::FILE_NAME))]
    pub fn export(&self) -> Result<Vec<u8>, ServiceError> {
        let _guard = self.acquire()?;

        match fs::read(&self.path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(T::HEADERS)?;
                writer.into_inner().map_err(|e| {
                    error!("unable to export {}: {}", T::FILE_NAME, e);
                    ServiceError::InternalServerError
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn acquire(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.lock.lock().map_err(|_| {
            error!("the lock on {} is poisoned", T::FILE_NAME);
            ServiceError::InternalServerError
        })
    }

    fn read(&self) -> Result<Vec<T>, ServiceError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} doesn't exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<T>().enumerate() {
            match row {
                Ok(mut record) => {
                    record.canonicalize();
                    records.push(record);
                }
                Err(e) if e.is_io_error() => return Err(e.into()),
                // the header is line 1
                Err(e) => warn!(
                    "skipping malformed row on line {} of {}: {}",
                    index + 2,
                    T::FILE_NAME,
                    e
                ),
            }
        }

        Ok(records)
    }

    fn write(&self, records: &[T]) -> Result<(), ServiceError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let temporary = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&temporary)?;

            writer.write_record(T::HEADERS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&temporary, &self.path)?;

        debug!("wrote {} rows to {}", records.len(), self.path.display());

        Ok(())
    }
}

fn not_found<T: Record>(key: &T::Key) -> ServiceError {
    ServiceError::NotFound(format!("{} \"{}\" not found", T::NAME, key))
}
