// src/app/cache.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use image::GenericImageView;
use reqwest::blocking::Client;
use tracing::warn;

use crate::config::load_config;

static CACHE_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static POSTER_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();

const POSTER_RETENTION_DAYS: u64 = 14;
const POSTER_RETENTION_SECS: u64 = POSTER_RETENTION_DAYS * 24 * 60 * 60;

pub fn cache_dir() -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let cfg = load_config();
            let mut path = PathBuf::from(
                cfg.cache_dir
                    .unwrap_or_else(|| ".smartstream_cache".to_string()),
            );
            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create cache dir {}: {e}", path.display());
                path = PathBuf::from(".smartstream_cache");
                let _ = fs::create_dir_all(&path);
            }
            path
        })
        .clone()
}

pub fn poster_cache_dir() -> PathBuf {
    POSTER_DIR_ONCE
        .get_or_init(|| {
            let mut path = cache_dir().join("posters");
            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create poster cache dir {}: {e}", path.display());
                path = cache_dir();
            }
            if let Err(err) = sweep_poster_dir(&path) {
                warn!("poster cache sweep failed: {err}");
            }
            path
        })
        .clone()
}

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

pub fn find_cached_by_key(key: &str) -> Option<PathBuf> {
    let p = poster_cache_dir().join(format!("{key}.jpg"));
    p.exists().then_some(p)
}

/// Decode an image file into (width, height, RGBA8 bytes) for texture upload.
pub fn load_rgba(path: &str) -> Result<(u32, u32, Vec<u8>), String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err("not found".into());
    }
    let img = image::ImageReader::open(p)
        .map_err(|e| format!("open image {}: {e}", p.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", p.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", p.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().to_vec()))
}

/// Download a poster with the shared client, resize to `max_width` (keeping
/// aspect), and store as JPEG at `<poster_cache_dir>/<key>.jpg`.
pub fn download_and_store_resized(
    client: &Client,
    url: &str,
    key: &str,
    max_width: u32,
    quality: u8,
) -> Result<PathBuf, String> {
    use image::{imageops::FilterType, DynamicImage};

    let dest = poster_cache_dir().join(format!("{key}.jpg"));
    if dest.exists() {
        return Ok(dest);
    }

    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| format!("download bytes: {e}"))?;

    let img =
        image::load_from_memory(&bytes).map_err(|e| format!("decode poster {url}: {e}"))?;

    let (w, h) = img.dimensions();
    let out: DynamicImage = if w > max_width {
        let new_h = ((h as f32) * (max_width as f32 / w as f32)).round().max(1.0) as u32;
        img.resize_exact(max_width, new_h, FilterType::CatmullRom)
    } else {
        img
    };

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    {
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality);
        encoder
            .encode_image(&out)
            .map_err(|e| format!("jpeg encode: {e}"))?;
    }

    // Write to a .part file then rename so a crash never leaves a torn jpg.
    if let Some(parent) = dest.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = dest.with_extension("jpg.part");
    {
        let mut f = fs::File::create(&tmp).map_err(|e| format!("create tmp: {e}"))?;
        f.write_all(&jpeg_bytes).map_err(|e| format!("write: {e}"))?;
    }
    fs::rename(&tmp, &dest).map_err(|e| format!("rename: {e}"))?;

    Ok(dest)
}

/// Remove leftover `.part` files, zero-length images and posters older than
/// the retention window. Runs once per launch.
pub(crate) fn sweep_poster_dir(dir: &Path) -> std::io::Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(POSTER_RETENTION_SECS))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let metadata = entry.metadata()?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase());

        let stale = match ext.as_deref() {
            Some("part") => true,
            Some("jpg") | Some("jpeg") | Some("png") | Some("webp") => {
                metadata.len() == 0
                    || metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH) < cutoff
            }
            _ => false,
        };

        if stale {
            let _ = fs::remove_file(&path);
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_stable_hex() {
        let a = url_to_cache_key("http://img/p.jpg");
        let b = url_to_cache_key("http://img/p.jpg");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, url_to_cache_key("http://img/q.jpg"));
    }

    #[test]
    fn sweep_removes_part_and_empty_files_only() {
        let dir = tempfile::tempdir().unwrap();

        fs::write(dir.path().join("dead.jpg.part"), b"half").unwrap();
        fs::write(dir.path().join("empty.jpg"), b"").unwrap();
        fs::write(dir.path().join("keep.jpg"), b"\xff\xd8\xff").unwrap();
        fs::write(dir.path().join("notes.txt"), b"leave me").unwrap();

        let removed = sweep_poster_dir(dir.path()).unwrap();
        assert_eq!(removed, 2);
        assert!(!dir.path().join("dead.jpg.part").exists());
        assert!(!dir.path().join("empty.jpg").exists());
        assert!(dir.path().join("keep.jpg").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
