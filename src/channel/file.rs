use super::dotenv::{parse_env, update_env};
use super::{Channel, ChannelError, Snapshot};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Dotenv file store.
#[derive(Debug, Clone)]
pub struct FileChannel {
    path: PathBuf,
}

impl FileChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_content(&self) -> Result<String, ChannelError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(ChannelError::Read {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }
}

impl Channel for FileChannel {
    fn get(&self) -> Result<Snapshot, ChannelError> {
        Ok(parse_env(&self.read_content()?))
    }

    fn set(&mut self, values: &Snapshot) -> Result<(), ChannelError> {
        let body = update_env(&self.read_content()?, values);
        replace_file(&self.path, body.as_bytes())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Writes through a sibling temp file and renames it over the target.
fn replace_file(path: &Path, content: &[u8]) -> Result<(), ChannelError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|source| ChannelError::CreateDir {
        path: parent.display().to_string(),
        source,
    })?;
    let write_err = |source: std::io::Error| ChannelError::Write {
        path: path.display().to_string(),
        source,
    };
    let tmp_path = parent.join(format!(
        ".{}.envprompt-{}-{}",
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("env"),
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or(0),
    ));
    let written = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&tmp_path)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        });
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }
    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        write_err(source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty_snapshot() {
        let temp = tempfile::tempdir().expect("tempdir");
        let channel = FileChannel::new(temp.path().join(".env"));
        assert!(channel.get().expect("get").is_empty());
    }

    #[test]
    fn set_creates_parent_directories_and_leaves_no_temp_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested/.env");
        let mut channel = FileChannel::new(&path);
        channel
            .set(&Snapshot::from_iter([("A".to_string(), "1".to_string())]))
            .expect("set");
        assert_eq!(fs::read_to_string(&path).expect("read"), "A=1\n");
        let entries = fs::read_dir(path.parent().expect("parent"))
            .expect("read dir")
            .count();
        assert_eq!(entries, 1);
    }
}
