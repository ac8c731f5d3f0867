//! File-backed session storage.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use storefront::storage::{SessionStorage, StorageError};

/// Session storage kept in one JSON object file.
///
/// Every call re-reads the file, so two processes sharing a session file
/// see each other's writes. A missing file is an empty session.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Use the session file at `path`. Nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(error.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|error| {
            StorageError::Backend(format!(
                "session file {} is not a JSON object of strings: {error}",
                self.path.display()
            ))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|error| StorageError::Backend(error.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, json)?;

        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;

        entries.insert(key.to_string(), value.to_string());

        self.write_entries(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;

        if entries.remove(key).is_none() {
            return Ok(());
        }

        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use storefront::{
        cart::{CART_STORAGE_KEY, CartStore, NewCartItem},
        products::ProductId,
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_file_is_an_empty_session() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("session.json"));

        assert_eq!(storage.get_item(CART_STORAGE_KEY)?, None);
        storage.remove_item(CART_STORAGE_KEY)?;
        assert!(!storage.path().exists());

        Ok(())
    }

    #[test]
    fn set_get_remove() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("nested").join("session.json"));

        storage.set_item("a", "1")?;
        storage.set_item("b", "2")?;
        storage.set_item("a", "3")?;

        assert_eq!(storage.get_item("a")?.as_deref(), Some("3"));
        assert_eq!(storage.get_item("b")?.as_deref(), Some("2"));

        storage.remove_item("a")?;

        assert_eq!(storage.get_item("a")?, None);
        assert_eq!(storage.get_item("b")?.as_deref(), Some("2"));

        Ok(())
    }

    #[test]
    fn corrupt_file_reports_backend_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");

        fs::write(&path, "[1, 2, 3]")?;

        let storage = FileStorage::new(&path);

        assert!(matches!(
            storage.get_item(CART_STORAGE_KEY),
            Err(StorageError::Backend(_))
        ));

        Ok(())
    }

    #[test]
    fn cart_survives_between_processes() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");

        let mut first = CartStore::new(FileStorage::new(&path));
        first.add_item(NewCartItem {
            id: ProductId::from(9),
            title: "Drive".to_string(),
            price: Decimal::new(64, 0),
            image: None,
        });
        first.add_item(NewCartItem {
            id: ProductId::from(9),
            title: "Drive".to_string(),
            price: Decimal::new(64, 0),
            image: None,
        });

        let mut second = CartStore::new(FileStorage::new(&path));
        second.hydrate_from_session();

        assert_eq!(second.total_items(), 2);
        assert_eq!(second.total_price(), Decimal::new(12800, 2));

        Ok(())
    }
}
