use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use super::{ElementRecord, StructureInfo};

/// Write to a temp file beside `path`, then rename it over `path`.
pub(crate) fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir: PathBuf = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).with_context(|| format!("creating {:?}", dir))?;

    let mut tmp =
        NamedTempFile::new_in(&dir).with_context(|| format!("creating temp file in {:?}", dir))?;
    fill(&mut tmp)?;
    tmp.as_file_mut()
        .sync_all()
        .with_context(|| format!("flushing temp file for {:?}", path))?;
    tmp.persist(path)
        .with_context(|| format!("renaming temp file -> {:?}", path))?;
    Ok(())
}

/// Write a header row plus one row per record as delimited text.
/// `None` fields become empty cells.
pub fn write_table<P, T>(path: P, delimiter: u8, records: &[T]) -> Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let path = path.as_ref();
    write_atomic(path, |tmp| {
        let mut wtr = WriterBuilder::new()
            .delimiter(delimiter)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(tmp);
        for rec in records {
            wtr.serialize(rec)
                .with_context(|| format!("writing row to {:?}", path))?;
        }
        wtr.flush()
            .with_context(|| format!("flushing {:?}", path))?;
        Ok(())
    })
}

/// Write the element catalog as TSV: `element`, `description`, `structure`.
pub fn write_elements<P: AsRef<Path>>(path: P, records: &[ElementRecord]) -> Result<()> {
    let path = path.as_ref();
    if records.is_empty() {
        // serialize() emits the header from the first record, so write it by hand
        return write_atomic(path, |tmp| {
            tmp.write_all(b"element\tdescription\tstructure\n")?;
            Ok(())
        });
    }
    write_table(path, b'\t', records)
}

/// Write the per-structure info as pretty JSON with a trailing newline.
pub fn write_structures<P: AsRef<Path>>(
    path: P,
    structures: &BTreeMap<String, StructureInfo>,
) -> Result<()> {
    let path = path.as_ref();
    write_atomic(path, |tmp| {
        serde_json::to_writer_pretty(&mut *tmp, structures)
            .with_context(|| format!("serializing JSON for {:?}", path))?;
        tmp.write_all(b"\n")?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rec(element: &str, description: Option<&str>, structure: &str) -> ElementRecord {
        ElementRecord {
            element: element.into(),
            description: description.map(Into::into),
            structure: structure.into(),
        }
    }

    #[test]
    fn writes_tsv_with_header() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("data_elements.tsv");
        write_elements(
            &path,
            &[
                rec("subjectkey", Some("GUID"), "abcd_mri01"),
                rec("sex", None, "pdem02"),
                rec("note", Some("has\ta tab"), "pdem02"),
            ],
        )?;

        let text = fs::read_to_string(&path)?;
        assert_eq!(
            text,
            "element\tdescription\tstructure\n\
subjectkey\tGUID\tabcd_mri01\n\
sex\t\tpdem02\n\
note\t\"has\ta tab\"\tpdem02\n"
        );
        Ok(())
    }

    #[test]
    fn empty_catalog_still_has_header() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("out").join("data_elements.tsv");
        write_elements(&path, &[])?;
        assert_eq!(
            fs::read_to_string(&path)?,
            "element\tdescription\tstructure\n"
        );
        Ok(())
    }

    #[test]
    fn rewrite_overwrites() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("data_elements.tsv");
        write_elements(&path, &[rec("a", Some("A"), "s1"), rec("b", Some("B"), "s1")])?;
        write_elements(&path, &[rec("c", Some("C"), "s2")])?;

        let text = fs::read_to_string(&path)?;
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("c\tC\ts2\n"));
        // no temp files left behind
        assert_eq!(fs::read_dir(tmp.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn structures_json_is_sorted_and_keeps_nulls() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("structures.json");
        let mut map = BTreeMap::new();
        map.insert("pdem02".to_string(), StructureInfo::default());
        map.insert(
            "abcd_mri01".to_string(),
            StructureInfo {
                title: Some("MRI Info".into()),
                event_names: Some(vec!["baseline_year_1_arm_1".into()]),
            },
        );
        write_structures(&path, &map)?;

        let text = fs::read_to_string(&path)?;
        assert!(text.ends_with("}\n"));
        assert!(text.find("abcd_mri01").unwrap() < text.find("pdem02").unwrap());
        let back: BTreeMap<String, StructureInfo> = serde_json::from_str(&text)?;
        assert_eq!(back, map);
        assert_eq!(back["pdem02"].event_names, None);
        Ok(())
    }
}
