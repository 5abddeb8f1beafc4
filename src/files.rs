use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use crate::{error::PngError, pixel::Channel};

pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>, PngError> {
    Ok(fs::read(path)?)
}

/// Writes `bytes` to a sibling `.part` file first and renames it into place,
/// so a failed write never leaves a complete-looking file at `path`.
pub fn write_file(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), PngError> {
    let path = path.as_ref();
    let mut partial = OsString::from(path.as_os_str());
    partial.push(".part");
    let partial = PathBuf::from(partial);
    if let Err(e) = fs::write(&partial, bytes).and_then(|_| fs::rename(&partial, path)) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    Ok(())
}

/// `dir/image_r.png` for `image.png` and [`Channel::Red`]. Without `dir` the
/// output lands next to the input.
pub fn channel_path(input: &Path, dir: Option<&Path>, channel: Channel) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    let file_name = format!("{}_{}.png", stem, channel.suffix());
    match dir.or_else(|| input.parent()) {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{channel_path, read_file, write_file};
    use crate::{error::PngError, pixel::Channel};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("png-channels-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn output_names_follow_the_input() {
        assert_eq!(
            channel_path(Path::new("pics/brainbow.png"), None, Channel::Red),
            Path::new("pics/brainbow_r.png")
        );
        assert_eq!(
            channel_path(Path::new("brainbow.png"), Some(Path::new("out")), Channel::Blue),
            Path::new("out/brainbow_b.png")
        );
    }

    #[test]
    fn write_then_read() {
        let dir = scratch_dir("write");
        let path = dir.join("bytes.bin");
        write_file(&path, b"abc").unwrap();
        assert_eq!(read_file(&path).unwrap(), b"abc");
        assert!(!dir.join("bytes.bin.part").exists());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = scratch_dir("fail");
        let path = dir.join("missing").join("out.png");
        assert!(matches!(write_file(&path, b"abc"), Err(PngError::Io(_))));
        assert!(!path.exists());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_input() {
        match read_file("definitely/not/here.png") {
            Err(PngError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected a NotFound error, got {other:?}"),
        }
    }
}
