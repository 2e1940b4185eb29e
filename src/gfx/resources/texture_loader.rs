//! Best-effort background texture loading
//!
//! Image files are decoded on background threads and handed back over a
//! channel that the frame loop drains once per frame. A load that fails, or
//! never finishes, leaves the material's placeholder texture in place; the
//! failure is logged and not surfaced any further.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;

use thiserror::Error;

use super::material::MaterialId;

#[derive(Debug, Error)]
pub enum TextureLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// A decoded image ready for GPU upload, tagged with its target material
pub struct LoadedTexture {
    pub material_id: MaterialId,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Spawns decode threads and collects their results without blocking
pub struct TextureLoader {
    sender: Sender<Result<LoadedTexture, TextureLoadError>>,
    receiver: Receiver<Result<LoadedTexture, TextureLoadError>>,
    in_flight: usize,
}

impl TextureLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Kicks off a fire-and-forget load for the given material
    pub fn request(&mut self, material_id: &str, path: impl AsRef<Path>) {
        let material_id = material_id.to_string();
        let path = path.as_ref().to_path_buf();
        let sender = self.sender.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            let result = decode(&path).map(|(pixels, width, height)| LoadedTexture {
                material_id,
                pixels,
                width,
                height,
            });
            // The receiver may be gone during shutdown; nothing to do then
            let _ = sender.send(result);
        });
    }

    /// Drains finished loads; called once per frame on the main thread
    pub fn poll(&mut self) -> Vec<LoadedTexture> {
        let mut completed = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(Ok(texture)) => {
                    self.in_flight -= 1;
                    log::debug!(
                        "texture for material '{}' loaded ({}x{})",
                        texture.material_id,
                        texture.width,
                        texture.height
                    );
                    completed.push(texture);
                }
                Ok(Err(err)) => {
                    self.in_flight -= 1;
                    log::warn!("texture load failed, keeping placeholder: {}", err);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        completed
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(path: &Path) -> Result<(Vec<u8>, u32, u32), TextureLoadError> {
    let bytes = std::fs::read(path).map_err(|source| TextureLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| TextureLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn missing_file_degrades_silently() {
        let mut loader = TextureLoader::new();
        loader.request("crate", "definitely/not/here.png");

        // The failure drains as a logged warning, never as a result
        let deadline = Instant::now() + Duration::from_secs(5);
        while loader.in_flight() > 0 && Instant::now() < deadline {
            assert!(loader.poll().is_empty());
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn decodes_a_png_from_disk() {
        let dir = std::env::temp_dir().join("scenelab_texture_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("red.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let mut loader = TextureLoader::new();
        loader.request("uv", &path);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut loaded = Vec::new();
        while loaded.is_empty() && Instant::now() < deadline {
            loaded = loader.poll();
            thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].material_id, "uv");
        assert_eq!((loaded[0].width, loaded[0].height), (2, 2));
        assert_eq!(loaded[0].pixels.len(), 16);
    }
}
