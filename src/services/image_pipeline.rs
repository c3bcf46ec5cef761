//! src/services/image_pipeline.rs
//!
//! ImagePipeline: stores uploaded originals under fresh identifiers in a flat
//! directory and derives a fixed-size PNG thumbnail next to each one.
//!
//! Layout inside `files_dir`:
//! - `<uuid><ext>`      the original bytes, unmodified
//! - `min_<uuid><ext>`  the thumbnail (always PNG-encoded, extension kept)
//!
//! There is no rollback: files written before a failure stay on disk.

use crate::models::upload::{StoredImage, UploadedImage};
use bytes::Bytes;
use futures::{Stream, StreamExt, pin_mut, stream};
use image::{ImageFormat, ImageReader, imageops::FilterType};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::{fs::File, io::AsyncWriteExt, task};
use tracing::{debug, info};
use uuid::Uuid;

/// Thumbnail box for images wider than they are tall.
pub const LANDSCAPE_THUMBNAIL: (u32, u32) = (120, 80);
/// Thumbnail box for everything else, squares included.
pub const PORTRAIT_THUMBNAIL: (u32, u32) = (80, 120);

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("`{name}` is not a decodable image: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write thumbnail `{name}`: {source}")]
    Encode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("thumbnail task failed: {0}")]
    Task(#[from] task::JoinError),
}

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Clone, Debug)]
pub struct ImagePipeline {
    files_dir: PathBuf,
}

impl ImagePipeline {
    /// The directory must already exist; `main` creates it at startup.
    pub fn new(files_dir: impl Into<PathBuf>) -> Self {
        Self {
            files_dir: files_dir.into(),
        }
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }

    /// Store every non-empty upload, then thumbnail each stored original.
    ///
    /// Returns the stored images in input order. Zero-length uploads are
    /// skipped and never receive an identifier.
    pub async fn process_uploads(
        &self,
        files: Vec<UploadedImage>,
    ) -> UploadResult<Vec<StoredImage>> {
        let mut stored = Vec::with_capacity(files.len());
        for UploadedImage { filename, content } in files {
            let chunks = stream::iter([Ok::<Bytes, io::Error>(content)]);
            if let Some(image) = self.store_original(&filename, chunks).await? {
                stored.push(image);
            }
        }

        self.generate_thumbnails(&stored).await?;
        Ok(stored)
    }

    /// Stream one upload to `<files_dir>/<uuid><ext>`.
    ///
    /// The identifier is minted and the file created only once the first
    /// non-empty chunk arrives, so an empty stream yields `None` and leaves
    /// nothing on disk. The handle is flushed and closed before returning.
    pub async fn store_original<S>(
        &self,
        filename: &str,
        stream: S,
    ) -> UploadResult<Option<StoredImage>>
    where
        S: Stream<Item = io::Result<Bytes>>,
    {
        pin_mut!(stream);
        let mut target: Option<(StoredImage, File)> = None;
        let mut size_bytes: u64 = 0;

        while let Some(chunk_res) = stream.next().await {
            let chunk = chunk_res?;
            if chunk.is_empty() {
                continue;
            }

            if target.is_none() {
                let stored = StoredImage::for_upload(Uuid::new_v4(), filename);
                let file = File::create(self.files_dir.join(&stored.original)).await?;
                target = Some((stored, file));
            }
            if let Some((_, file)) = target.as_mut() {
                file.write_all(&chunk).await?;
                size_bytes += chunk.len() as u64;
            }
        }

        match target {
            Some((stored, mut file)) => {
                file.flush().await?;
                debug!(
                    "stored original {} ({} bytes) from upload `{}`",
                    stored.original, size_bytes, filename
                );
                Ok(Some(stored))
            }
            None => {
                debug!("skipping empty upload `{}`", filename);
                Ok(None)
            }
        }
    }

    /// Thumbnail each stored original in order, stopping at the first failure.
    pub async fn generate_thumbnails(&self, stored: &[StoredImage]) -> UploadResult<()> {
        for image in stored {
            self.generate_thumbnail(image).await?;
        }
        info!("generated {} thumbnails", stored.len());
        Ok(())
    }

    /// Decode the original from disk and write its thumbnail. Returns the
    /// thumbnail's pixel dimensions.
    pub async fn generate_thumbnail(&self, stored: &StoredImage) -> UploadResult<(u32, u32)> {
        let source = self.files_dir.join(&stored.original);
        let target = self.files_dir.join(&stored.thumbnail);
        let name = stored.original.clone();

        // Decoding and resampling are CPU-bound.
        let dims = task::spawn_blocking(move || render_thumbnail(&source, &target, &name)).await??;
        debug!(
            "wrote thumbnail {} at {}x{}",
            stored.thumbnail, dims.0, dims.1
        );
        Ok(dims)
    }
}

/// Fixed target box chosen by orientation alone; aspect ratio is not preserved.
pub fn thumbnail_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width > height {
        LANDSCAPE_THUMBNAIL
    } else {
        PORTRAIT_THUMBNAIL
    }
}

fn render_thumbnail(source: &Path, target: &Path, name: &str) -> UploadResult<(u32, u32)> {
    let decoded = ImageReader::open(source)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| UploadError::Decode {
            name: name.to_string(),
            source,
        })?;

    let (width, height) = thumbnail_dimensions(decoded.width(), decoded.height());
    decoded
        .resize_exact(width, height, FilterType::CatmullRom)
        .save_with_format(target, ImageFormat::Png)
        .map_err(|source| UploadError::Encode {
            name: name.to_string(),
            source,
        })?;

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::upload::THUMBNAIL_PREFIX;
    use image::{GenericImageView, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn pipeline() -> (TempDir, ImagePipeline) {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path());
        (dir, pipeline)
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    async fn thumbnail_size_for(width: u32, height: u32) -> (u32, u32) {
        let (dir, pipeline) = pipeline();
        let stored = pipeline
            .process_uploads(vec![UploadedImage::new("photo.png", png_bytes(width, height))])
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);

        image::open(dir.path().join(&stored[0].thumbnail))
            .unwrap()
            .dimensions()
    }

    #[test]
    fn orientation_picks_fixed_box() {
        assert_eq!(thumbnail_dimensions(4000, 10), (120, 80));
        assert_eq!(thumbnail_dimensions(10, 4000), (80, 120));
        assert_eq!(thumbnail_dimensions(1, 1), (80, 120));
    }

    #[tokio::test]
    async fn landscape_becomes_120_by_80() {
        assert_eq!(thumbnail_size_for(200, 100).await, (120, 80));
    }

    #[tokio::test]
    async fn portrait_becomes_80_by_120() {
        assert_eq!(thumbnail_size_for(100, 200).await, (80, 120));
    }

    #[tokio::test]
    async fn square_is_treated_as_portrait() {
        assert_eq!(thumbnail_size_for(100, 100).await, (80, 120));
    }

    #[tokio::test]
    async fn small_images_are_upscaled_to_the_box() {
        assert_eq!(thumbnail_size_for(3, 2).await, (120, 80));
    }

    #[tokio::test]
    async fn each_upload_gets_original_and_prefixed_thumbnail() {
        let (dir, pipeline) = pipeline();
        let originals = vec![
            UploadedImage::new("a.png", png_bytes(30, 20)),
            UploadedImage::new("b.png", png_bytes(20, 30)),
            UploadedImage::new("c", png_bytes(10, 10)),
        ];
        let bytes_a = originals[0].content.clone();

        let stored = pipeline.process_uploads(originals).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(dir_entries(dir.path()).len(), 6);

        for image in &stored {
            assert_eq!(image.thumbnail, format!("{}{}", THUMBNAIL_PREFIX, image.original));
            assert!(image.original.starts_with(&image.id.to_string()));
            assert!(dir.path().join(&image.original).is_file());
            assert!(dir.path().join(&image.thumbnail).is_file());
        }
        assert_eq!(stored[2].original, stored[2].id.to_string());

        let on_disk = std::fs::read(dir.path().join(&stored[0].original)).unwrap();
        assert_eq!(on_disk, bytes_a.to_vec());
    }

    #[tokio::test]
    async fn zero_length_uploads_are_skipped() {
        let (dir, pipeline) = pipeline();
        let stored = pipeline
            .process_uploads(vec![
                UploadedImage::new("empty.png", Vec::<u8>::new()),
                UploadedImage::new("real.png", png_bytes(20, 10)),
                UploadedImage::new("also-empty.jpg", Vec::<u8>::new()),
            ])
            .await
            .unwrap();

        assert_eq!(stored.len(), 1);
        assert!(stored[0].original.ends_with(".png"));
        assert_eq!(dir_entries(dir.path()).len(), 2);
    }

    #[tokio::test]
    async fn only_empty_uploads_produce_nothing() {
        let (dir, pipeline) = pipeline();
        let stored = pipeline
            .process_uploads(vec![UploadedImage::new("empty.png", Vec::<u8>::new())])
            .await
            .unwrap();

        assert!(stored.is_empty());
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn thumbnail_is_png_even_with_jpeg_extension() {
        let (dir, pipeline) = pipeline();
        let stored = pipeline
            .process_uploads(vec![UploadedImage::new("shoe.jpg", png_bytes(50, 40))])
            .await
            .unwrap();

        assert!(stored[0].thumbnail.ends_with(".jpg"));
        let reader = ImageReader::open(dir.path().join(&stored[0].thumbnail))
            .unwrap()
            .with_guessed_format()
            .unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Png));
    }

    #[tokio::test]
    async fn decode_failure_keeps_earlier_files_on_disk() {
        let (dir, pipeline) = pipeline();
        let result = pipeline
            .process_uploads(vec![
                UploadedImage::new("good.png", png_bytes(40, 20)),
                UploadedImage::new("broken.png", b"definitely not an image".to_vec()),
                UploadedImage::new("later.png", png_bytes(20, 40)),
            ])
            .await;

        assert!(matches!(result, Err(UploadError::Decode { .. })));

        let entries = dir_entries(dir.path());
        let originals = entries
            .iter()
            .filter(|name| !name.starts_with(THUMBNAIL_PREFIX))
            .count();
        let thumbnails = entries
            .iter()
            .filter(|name| name.starts_with(THUMBNAIL_PREFIX))
            .count();
        assert_eq!(originals, 3);
        assert_eq!(thumbnails, 1);
    }

    #[tokio::test]
    async fn streamed_chunks_are_concatenated() {
        let (dir, pipeline) = pipeline();
        let chunks = stream::iter(vec![
            Ok(Bytes::new()),
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::new()),
            Ok(Bytes::from_static(b"world")),
        ]);

        let stored = pipeline
            .store_original("notes.txt", chunks)
            .await
            .unwrap()
            .unwrap();

        let on_disk = std::fs::read(dir.path().join(&stored.original)).unwrap();
        assert_eq!(on_disk, b"hello world");
        assert!(stored.original.ends_with(".txt"));
    }

    #[tokio::test]
    async fn stream_of_empty_chunks_creates_no_file() {
        let (dir, pipeline) = pipeline();
        let chunks = stream::iter(vec![Ok::<Bytes, io::Error>(Bytes::new())]);

        let stored = pipeline.store_original("empty.png", chunks).await.unwrap();
        assert!(stored.is_none());
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn write_into_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path().join("does-not-exist"));

        let result = pipeline
            .process_uploads(vec![UploadedImage::new("a.png", png_bytes(2, 2))])
            .await;
        assert!(matches!(result, Err(UploadError::Io(_))));
    }

    #[tokio::test]
    async fn interrupted_stream_keeps_earlier_originals() {
        let (dir, pipeline) = pipeline();
        let good = stream::iter([Ok::<Bytes, io::Error>(png_bytes(4, 2).into())]);
        let first = pipeline
            .store_original("first.png", good)
            .await
            .unwrap()
            .unwrap();

        let broken = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::other("connection reset")),
        ]);
        let result = pipeline.store_original("second.png", broken).await;
        assert!(matches!(result, Err(UploadError::Io(_))));

        assert_eq!(
            std::fs::read(dir.path().join(&first.original)).unwrap(),
            png_bytes(4, 2)
        );
        assert!(!dir.path().join(&first.thumbnail).exists());
    }
}
