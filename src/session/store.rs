use crate::session::Message;
use crate::shelf::SelectedProduct;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SELECTION_KEY: &str = "selection";
const TRANSCRIPT_KEY: &str = "transcript";

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Durable key-value store for session state. Each logical key maps to one
/// JSON file under the root directory and is rewritten in full on save.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    pub fn open_default() -> Self {
        Self::with_root(home_dir().join(".shelfie"))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn load_selection(&self) -> (Vec<SelectedProduct>, Option<String>) {
        self.load_entry(SELECTION_KEY)
    }

    pub fn save_selection(&self, items: &[SelectedProduct]) -> io::Result<()> {
        self.write_entry(SELECTION_KEY, &items)
    }

    pub fn load_transcript(&self) -> (Vec<Message>, Option<String>) {
        self.load_entry(TRANSCRIPT_KEY)
    }

    pub fn save_transcript(&self, messages: &[Message]) -> io::Result<()> {
        self.write_entry(TRANSCRIPT_KEY, &messages)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn load_entry<T: DeserializeOwned>(&self, key: &str) -> (Vec<T>, Option<String>) {
        match read_entries(&self.entry_path(key)) {
            Ok(Some(entries)) => (entries, None),
            Ok(None) => (Vec::new(), None),
            Err(warning) => (Vec::new(), Some(warning)),
        }
    }

    fn write_entry<T: Serialize>(&self, key: &str, value: &T) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let final_path = self.entry_path(key);
        let tmp_path = self.root.join(format!("{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

        fs::write(&tmp_path, bytes)?;
        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path)?;
                    fs::rename(&tmp_path, &final_path)?;
                    Ok(())
                } else {
                    Err(rename_err)
                }
            }
        }
    }
}

fn read_entries<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, String> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(format!("failed to read {}: {err}", path.display())),
    };

    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::StateStore;
    use crate::session::Message;
    use crate::shelf::SelectedProduct;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "shelfie_state_store_{prefix}_{}_{}",
            std::process::id(),
            nanos
        ))
    }

    fn sample_selection() -> Vec<SelectedProduct> {
        vec![
            SelectedProduct {
                id: "1".to_string(),
                name: "Gentle Oat Cleanser".to_string(),
                brand: "Botaniq".to_string(),
            },
            SelectedProduct {
                id: "4".to_string(),
                name: "Daily Shield SPF 50".to_string(),
                brand: "Solance".to_string(),
            },
        ]
    }

    #[test]
    fn selection_round_trips_in_order() {
        let root = temp_root("selection");
        let store = StateStore::with_root(&root);
        let selection = sample_selection();

        store
            .save_selection(&selection)
            .expect("selection should save");
        let (restored, warning) = store.load_selection();

        assert!(warning.is_none());
        assert_eq!(restored, selection);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn transcript_round_trips_in_order() {
        let root = temp_root("transcript");
        let store = StateStore::with_root(&root);
        let transcript = vec![
            Message::user("I have dry skin, what helps?"),
            Message::assistant("A richer **moisturizer** in the evening."),
        ];

        store
            .save_transcript(&transcript)
            .expect("transcript should save");
        let (restored, warning) = store.load_transcript();

        assert!(warning.is_none());
        assert_eq!(restored, transcript);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_files_load_as_empty_without_warning() {
        let store = StateStore::with_root(temp_root("missing"));

        let (selection, selection_warning) = store.load_selection();
        let (transcript, transcript_warning) = store.load_transcript();

        assert!(selection.is_empty());
        assert!(selection_warning.is_none());
        assert!(transcript.is_empty());
        assert!(transcript_warning.is_none());
    }

    #[test]
    fn corrupt_file_loads_as_empty_with_warning() {
        let root = temp_root("corrupt");
        fs::create_dir_all(&root).expect("temp root should create");
        fs::write(root.join("selection.json"), b"not json").expect("fixture should write");

        let store = StateStore::with_root(&root);
        let (selection, warning) = store.load_selection();

        assert!(selection.is_empty());
        assert!(warning.expect("corrupt file should warn").contains("failed to parse"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn save_overwrites_previous_value_in_full() {
        let root = temp_root("overwrite");
        let store = StateStore::with_root(&root);

        store
            .save_selection(&sample_selection())
            .expect("first save should succeed");
        store
            .save_selection(&[])
            .expect("second save should succeed");

        let (restored, warning) = store.load_selection();
        assert!(warning.is_none());
        assert!(restored.is_empty());

        let _ = fs::remove_dir_all(root);
    }
}
