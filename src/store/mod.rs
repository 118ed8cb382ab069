//! Page storage module
//!
//! One file per title under the data directory, named `{title}.txt` and
//! holding the raw body bytes. Saves are last-write-wins with no locking.

mod error;
mod page;

pub use error::StoreError;
pub use page::Page;

use crate::routing::Title;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Extension of page files
const PAGE_EXTENSION: &str = "txt";

/// Filesystem-backed page store
#[derive(Debug, Clone)]
pub struct PageStore {
    data_dir: PathBuf,
    placeholder: String,
}

impl PageStore {
    /// Create a store rooted at `data_dir`; `placeholder` names a directory
    /// entry that is never listed (e.g. `.gitkeep`)
    pub fn new(data_dir: impl Into<PathBuf>, placeholder: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            placeholder: placeholder.into(),
        }
    }

    /// Create the data directory if it does not exist yet
    pub fn ensure_data_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::io(&self.data_dir, e))
    }

    /// Path of the backing file for `title`
    pub fn page_path(&self, title: &Title) -> PathBuf {
        self.data_dir
            .join(format!("{}.{PAGE_EXTENSION}", title.as_str()))
    }

    /// Read the persisted body for `title`
    pub fn load(&self, title: &Title) -> Result<Page, StoreError> {
        let path = self.page_path(title);
        match fs::read(&path) {
            Ok(body) => Ok(Page::new(title.clone(), body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(title.clone()))
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Write `page`, replacing any previous body
    ///
    /// The body goes to a temporary file in the data directory which is then
    /// renamed over the page file, so readers never observe a partial body.
    pub fn save(&self, page: &Page) -> Result<(), StoreError> {
        let path = self.page_path(&page.title);

        let mut tmp = tempfile::Builder::new()
            .prefix(".page-")
            .suffix(".tmp")
            .tempfile_in(&self.data_dir)
            .map_err(|e| StoreError::io(&self.data_dir, e))?;
        tmp.write_all(&page.body)
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;

        tmp.persist(&path)
            .map_err(|e| StoreError::io(&path, e.error))?;
        Ok(())
    }

    /// Remove the record for `title`; a missing record is `NotFound`
    pub fn delete(&self, title: &Title) -> Result<(), StoreError> {
        let path = self.page_path(title);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(title.clone()))
            }
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Load every persisted page, in directory order
    ///
    /// The placeholder entry, non-files, files without the page extension
    /// and files whose stem is not a valid title are skipped.
    pub fn list_all(&self) -> Result<Vec<Page>, StoreError> {
        let entries =
            fs::read_dir(&self.data_dir).map_err(|e| StoreError::io(&self.data_dir, e))?;

        let mut pages = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.data_dir, e))?;
            let path = entry.path();

            if entry.file_name() == self.placeholder.as_str() {
                continue;
            }
            let file_type = entry.file_type().map_err(|e| StoreError::io(&path, e))?;
            if !file_type.is_file() {
                continue;
            }
            let Some(title) = title_from_path(&path) else {
                continue;
            };

            let body = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
            pages.push(Page::new(title, body));
        }

        Ok(pages)
    }
}

/// Recover the title from `{title}.txt`
fn title_from_path(path: &Path) -> Option<Title> {
    if path.extension()? != PAGE_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Title::parse(stem).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, PageStore) {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path(), ".gitkeep");
        (dir, store)
    }

    fn title(s: &str) -> Title {
        Title::parse(s).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = test_store();
        store.save(&Page::new(title("Home"), b"Hello".to_vec())).unwrap();

        let page = store.load(&title("Home")).unwrap();
        assert_eq!(page, Page::new(title("Home"), b"Hello".to_vec()));
    }

    #[test]
    fn test_round_trip_arbitrary_bytes() {
        let (_dir, store) = test_store();
        let bodies: [&[u8]; 4] = [b"", b"\0\xff\xfe binary", "ünïcode\r\n".as_bytes(), &[0u8; 4096]];
        for body in bodies {
            store.save(&Page::new(title("My Page"), body.to_vec())).unwrap();
            assert_eq!(store.load(&title("My Page")).unwrap().body, body);
        }
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, store) = test_store();
        store.save(&Page::new(title("Home"), b"first version".to_vec())).unwrap();
        store.save(&Page::new(title("Home"), b"v2".to_vec())).unwrap();

        assert_eq!(store.load(&title("Home")).unwrap().body, b"v2");
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_persisted_as_txt_file() {
        let (dir, store) = test_store();
        store.save(&Page::new(title("Home"), b"raw".to_vec())).unwrap();
        assert_eq!(std::fs::read(dir.path().join("Home.txt")).unwrap(), b"raw");
    }

    #[test]
    fn test_load_missing() {
        let (_dir, store) = test_store();
        let err = store.load(&title("Missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_then_load_is_not_found() {
        let (_dir, store) = test_store();
        store.save(&Page::new(title("Gone"), b"x".to_vec())).unwrap();

        store.delete(&title("Gone")).unwrap();
        assert!(store.load(&title("Gone")).unwrap_err().is_not_found());

        // Never existed
        assert!(store.delete(&title("Never")).unwrap_err().is_not_found());
        assert!(store.load(&title("Never")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_skips_placeholder() {
        let (dir, store) = test_store();
        std::fs::write(dir.path().join(".gitkeep"), b"").unwrap();

        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_loads_bodies() {
        let (dir, store) = test_store();
        std::fs::write(dir.path().join(".gitkeep"), b"").unwrap();
        store.save(&Page::new(title("Alpha"), b"a".to_vec())).unwrap();
        store.save(&Page::new(title("Beta Page"), b"b".to_vec())).unwrap();

        let mut pages = store.list_all().unwrap();
        pages.sort_by(|a, b| a.title.cmp(&b.title));
        assert_eq!(
            pages,
            vec![
                Page::new(title("Alpha"), b"a".to_vec()),
                Page::new(title("Beta Page"), b"b".to_vec()),
            ]
        );
    }

    #[test]
    fn test_list_ignores_foreign_entries() {
        let (dir, store) = test_store();
        std::fs::write(dir.path().join("notes.md"), b"").unwrap();
        std::fs::write(dir.path().join("bad.name.txt"), b"").unwrap();
        std::fs::write(dir.path().join(".page-abc.tmp"), b"").unwrap();
        std::fs::create_dir(dir.path().join("Sub.txt")).unwrap();

        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path().join("absent"), ".gitkeep");

        let err = store.list_all().unwrap_err();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn test_save_into_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path().join("absent"), ".gitkeep");

        let result = store.save(&Page::new(title("Home"), b"x".to_vec()));
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_ensure_data_dir() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("nested/data");
        let store = PageStore::new(&data_dir, ".gitkeep");
        store.ensure_data_dir().unwrap();
        assert!(data_dir.is_dir());
        assert!(store.list_all().unwrap().is_empty());
    }
}
