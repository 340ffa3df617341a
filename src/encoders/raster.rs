use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::debug;
use tempfile::NamedTempFile;

use crate::{
    codec::{RasterDestination, RasterOptions},
    encoders::write_image,
    error::BackendError,
    format::ImageFormat,
    image::Image,
};

/// A raster image being written. The data goes to a temporary file next to the destination
/// and is only moved into place once encoding succeeded.
#[derive(Debug)]
pub struct RasterFile {
    file: NamedTempFile,
    destination: PathBuf,
    format: ImageFormat,
    encoded: Option<Result<(), BackendError>>,
}

impl RasterFile {
    pub fn create(path: &Path, format: ImageFormat) -> Result<Self, BackendError> {
        let writable = format
            .codec_format()
            .is_some_and(|codec_format| codec_format.writing_enabled());
        if !writable {
            return Err(format!("no {format} encoder in this build").into());
        }
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file = tempfile::Builder::new()
            .prefix(".imagetool")
            .tempfile_in(directory)?;
        Ok(Self {
            file,
            destination: path.to_owned(),
            format,
            encoded: None,
        })
    }
}

impl RasterDestination for RasterFile {
    fn add_image(&mut self, image: &Image, options: &RasterOptions<'_>) {
        if self.encoded.is_some() {
            debug!("{} holds a single image, ignoring another one", self.format);
            return;
        }
        // Wrap in BufWriter for performance
        let mut writer = BufWriter::new(self.file.as_file_mut());
        let result = write_image(&mut writer, image, self.format, options)
            .and_then(|()| writer.flush().map_err(BackendError::from));
        self.encoded = Some(result);
    }

    fn finalize(self) -> bool {
        let RasterFile {
            file,
            destination,
            format,
            encoded,
        } = self;
        match encoded {
            Some(Ok(())) => match file.persist(&destination) {
                Ok(_) => true,
                Err(error) => {
                    debug!("could not move {format} output into place: {error}");
                    false
                }
            },
            Some(Err(error)) => {
                debug!("{format} encoding failed: {error}");
                false
            }
            None => false,
        }
    }
}
