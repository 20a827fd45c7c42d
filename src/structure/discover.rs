use anyhow::{anyhow, Context, Result};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;

/// List the files in `dir` whose names match `pattern` (e.g. `*.txt`),
/// sorted by file name. Directories are skipped.
pub fn list_structure_files(dir: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(anyhow!("data directory {:?} does not exist", dir));
    }

    let full = format!(
        "{}/{}",
        Pattern::escape(&dir.display().to_string()),
        pattern
    );
    let mut files = Vec::new();
    for entry in glob(&full).with_context(|| format!("bad file pattern {:?}", pattern))? {
        let path = entry.with_context(|| format!("listing {:?}", dir))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(dir = %dir.display(), count = files.len(), "found structure files");
    Ok(files)
}

/// The structure identifier for a file: its name without the extension,
/// e.g. `abcd_mri01.txt` -> `abcd_mri01`.
pub fn structure_name(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot derive a structure name from {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_matching_files_sorted() -> Result<()> {
        let tmp = tempdir()?;
        for name in ["pdem02.txt", "abcd_mri01.txt", "notes.md", "abcd_ksad01.txt"] {
            fs::write(tmp.path().join(name), "x\n")?;
        }
        fs::create_dir(tmp.path().join("nested.txt"))?;

        let files = list_structure_files(tmp.path(), "*.txt")?;
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["abcd_ksad01.txt", "abcd_mri01.txt", "pdem02.txt"]);
        Ok(())
    }

    #[test]
    fn empty_directory_lists_nothing() -> Result<()> {
        let tmp = tempdir()?;
        assert!(list_structure_files(tmp.path(), "*.txt")?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = list_structure_files(tmp.path().join("nope"), "*.txt").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn structure_name_strips_extension() -> Result<()> {
        assert_eq!(structure_name("/data/abcd_mri01.txt")?, "abcd_mri01");
        assert_eq!(structure_name("pdem02")?, "pdem02");
        assert!(structure_name("/").is_err());
        Ok(())
    }
}
