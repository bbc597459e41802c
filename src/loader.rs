//! This module provides the `MachineLoader` struct, responsible for reading
//! and writing machine document files and discovering saved documents in a
//! directory.

use crate::serializer::MachineFile;
use crate::types::MachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension used for saved machine documents.
const DOCUMENT_EXTENSION: &str = "json";

/// `MachineLoader` is a utility struct for loading and saving machine
/// documents. It provides methods to load a document from a file or string,
/// to save one, and to discover all documents within a directory.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine document from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineFile)` if the file is successfully read and parsed.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::SerializationError)` if the content is not a
    ///   valid document.
    pub fn load_document(path: &Path) -> Result<MachineFile, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        MachineFile::from_json(&content)
    }

    /// Parses a machine document from string content, e.g. from user input
    /// or an embedded preset.
    pub fn load_document_from_string(content: &str) -> Result<MachineFile, MachineError> {
        MachineFile::from_json(content)
    }

    /// Writes a machine document to the specified file path as pretty JSON.
    pub fn save_document(path: &Path, document: &MachineFile) -> Result<(), MachineError> {
        let json = document.to_json()?;
        fs::write(path, json).map_err(|e| {
            MachineError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })
    }

    /// Loads all machine document files (`.json` extension) from a given
    /// directory. Directories and files with other extensions are skipped;
    /// unparseable files are reported as per-file errors.
    pub fn load_documents(directory: &Path) -> Vec<Result<(PathBuf, MachineFile), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir()
                    || path
                        .extension()
                        .is_none_or(|ext| ext != DOCUMENT_EXTENSION)
                {
                    return None;
                }

                match Self::load_document(&path) {
                    Ok(document) => Some(Ok((path, document))),
                    Err(e) => Some(Err(MachineError::FileError(format!(
                        "Failed to load document from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TuringMachine;
    use crate::types::{Direction, State, StateRole};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample_document() -> MachineFile {
        let mut tm = TuringMachine::new();
        tm.add_transition(
            State::new("q0", StateRole::Start),
            'a',
            State::new("qAccept", StateRole::Accept),
            'b',
            Direction::Right,
        );
        tm.tape_mut().load_str("a");
        MachineFile::from_machine("Loader Sample", &tm).unwrap()
    }

    #[test]
    fn test_save_and_load_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.json");
        let document = sample_document();

        MachineLoader::save_document(&path, &document).unwrap();
        let loaded = MachineLoader::load_document(&path).unwrap();

        assert_eq!(loaded, document);
        let tm = loaded.to_machine().unwrap();
        assert_eq!(tm.current_state().unwrap().name(), "q0");
    }

    #[test]
    fn test_load_invalid_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.json");

        let mut file = File::create(&path).unwrap();
        file.write_all(b"This is not a machine document").unwrap();

        let result = MachineLoader::load_document(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = MachineLoader::load_document(Path::new("/nonexistent/machine.json"));
        assert!(matches!(result, Err(MachineError::FileError(_))));
    }

    #[test]
    fn test_load_documents_from_directory() {
        let dir = tempdir().unwrap();

        let valid_path = dir.path().join("valid.json");
        MachineLoader::save_document(&valid_path, &sample_document()).unwrap();

        let invalid_path = dir.path().join("broken.json");
        let mut invalid_file = File::create(&invalid_path).unwrap();
        invalid_file.write_all(b"{").unwrap();

        // A non-document file that should be ignored.
        let ignored_path = dir.path().join("notes.txt");
        let mut ignored_file = File::create(&ignored_path).unwrap();
        ignored_file.write_all(b"ignore me").unwrap();

        let results = MachineLoader::load_documents(dir.path());

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_load_documents_from_missing_directory() {
        let results = MachineLoader::load_documents(Path::new("/nonexistent/machines"));

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
