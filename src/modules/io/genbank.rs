//! GenBank file I/O
//!
//! Only the first record of a file is read. Files must carry a `.gb` or
//! `.gbk` extension.

use std::path::Path;

use super::{GenbankIoError, GenbankIoResult};
use crate::engines::storage::{GenbankParser, RecordParser};
use crate::engines::EngineError;
use crate::modules::query::QueryEngine;
use crate::modules::seq::GenbankRecord;

const EXTENSIONS: [&str; 2] = ["gb", "gbk"];

/// A record together with the name of the file it came from
#[derive(Debug, Clone)]
pub struct GenbankFile {
    /// File name without directories, reported by the summary query
    pub name: String,
    pub record: GenbankRecord,
}

impl GenbankFile {
    /// Query engine over this record, named after the file
    pub fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.record).with_source_name(&self.name)
    }
}

/// Read the first record of a GenBank file with default parser settings
pub fn read_genbank<P: AsRef<Path>>(path: P) -> GenbankIoResult<GenbankFile> {
    read_genbank_with(path, &GenbankParser::new())
}

/// Read the first record of a GenBank file with a configured parser
pub fn read_genbank_with<P: AsRef<Path>>(
    path: P,
    parser: &GenbankParser,
) -> GenbankIoResult<GenbankFile> {
    let path = path.as_ref();
    check_path(path)?;

    let record = parser.parse_file(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::info!("read {} from {}", record.accession(), path.display());
    Ok(GenbankFile { name, record })
}

/// Parse GenBank text that did not come from a file, e.g. an upload
pub fn read_genbank_string(name: &str, text: &str) -> GenbankIoResult<GenbankFile> {
    let record = GenbankParser::new()
        .parse(text)
        .map_err(EngineError::from)?;

    Ok(GenbankFile {
        name: name.to_string(),
        record,
    })
}

fn check_path(path: &Path) -> GenbankIoResult<()> {
    let genbank_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext));

    if path.is_file() && genbank_extension {
        Ok(())
    } else {
        log::warn!("rejected input path {}", path.display());
        Err(GenbankIoError::InvalidPath(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::ParseError;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = include_str!("../../../tests/data/sample.gbk");

    #[test]
    fn test_read_genbank() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thr_operon.gbk");
        fs::write(&path, SAMPLE).unwrap();

        let file = read_genbank(&path).unwrap();
        assert_eq!(file.name, "thr_operon.gbk");
        assert_eq!(file.record.accession(), "NC_SAMPLE1");
        assert_eq!(file.record.len(), 120);

        let summary: Vec<String> = file.engine().summary().collect();
        assert_eq!(summary[0], "file: thr_operon.gbk");
    }

    #[test]
    fn test_read_genbank_short_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thr_operon.gb");
        fs::write(&path, SAMPLE).unwrap();

        assert!(read_genbank(&path).is_ok());
    }

    #[test]
    fn test_rejected_paths() {
        let dir = tempdir().unwrap();

        let wrong_extension = dir.path().join("thr_operon.txt");
        fs::write(&wrong_extension, SAMPLE).unwrap();
        assert!(matches!(
            read_genbank(&wrong_extension),
            Err(GenbankIoError::InvalidPath(_))
        ));

        let directory = dir.path().join("folder.gbk");
        fs::create_dir(&directory).unwrap();
        assert!(matches!(
            read_genbank(&directory),
            Err(GenbankIoError::InvalidPath(_))
        ));

        let missing = dir.path().join("missing.gbk");
        assert!(matches!(
            read_genbank(&missing),
            Err(GenbankIoError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_read_genbank_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.gbk");
        fs::write(&path, "LOCUS       BROKEN\nDEFINITION  no accession here\n//\n").unwrap();

        let err = read_genbank(&path).unwrap_err();
        assert!(matches!(
            err,
            GenbankIoError::Engine(EngineError::Parse(ParseError::MissingSection("ACCESSION")))
        ));
    }

    #[test]
    fn test_read_genbank_size_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thr_operon.gbk");
        fs::write(&path, SAMPLE).unwrap();

        let parser = GenbankParser::new().with_size_limit(Some(100));
        let err = read_genbank_with(&path, &parser).unwrap_err();
        assert!(matches!(
            err,
            GenbankIoError::Engine(EngineError::Parse(ParseError::InputTooLarge { limit: 100, .. }))
        ));
    }

    #[test]
    fn test_read_genbank_string() {
        let file = read_genbank_string("upload", SAMPLE).unwrap();
        assert_eq!(file.name, "upload");
        assert_eq!(file.record.organism(), "Escherichia coli str. K-12 substr. MG1655");

        assert!(read_genbank_string("empty", "").is_err());
    }
}
