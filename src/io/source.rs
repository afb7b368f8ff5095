use std::path::{Path, PathBuf};

/// Bank name used when a statement file's base name yields nothing
pub const DEFAULT_BANK_NAME: &str = "General";

/// Derive a bank name from a statement file path
///
/// Takes the file's base name up to the first `.`, so `bca.csv` becomes `bca`
/// and `mandiri-2024.csv` becomes `mandiri-2024`. An empty stem such as
/// `.csv` falls back to [`DEFAULT_BANK_NAME`].
pub fn bank_name_from_path(path: impl AsRef<Path>) -> String {
    let base = path
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    match base.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => DEFAULT_BANK_NAME.to_string(),
    }
}

/// A bank statement file and the bank it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSource {
    pub bank: String,
    pub path: PathBuf,
}

impl StatementSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            bank: bank_name_from_path(&path),
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_name_is_stem_before_first_dot() {
        assert_eq!(bank_name_from_path("bca.csv"), "bca");
        assert_eq!(bank_name_from_path("/data/statements/mandiri.csv"), "mandiri");
        assert_eq!(bank_name_from_path("bni.2024-01.csv"), "bni");
        assert_eq!(bank_name_from_path("bri-jan.csv"), "bri-jan");
    }

    #[test]
    fn empty_stem_falls_back_to_general() {
        assert_eq!(bank_name_from_path(".csv"), DEFAULT_BANK_NAME);
        assert_eq!(bank_name_from_path("/"), DEFAULT_BANK_NAME);
        assert_eq!(bank_name_from_path(""), DEFAULT_BANK_NAME);
    }

    #[test]
    fn source_carries_derived_bank() {
        let source = StatementSource::from_path("files/bca.csv");
        assert_eq!(source.bank, "bca");
        assert_eq!(source.path, PathBuf::from("files/bca.csv"));
    }
}
