//! Converts still images from one format to another.
//!
//! A conversion decodes the source, picks the output format, applies the requested edits
//! and writes the result, carrying the source metadata over unless asked not to.
//! The pixel work is done by a [codec::Codec]; [encoders::ImageCodec] is the default one.
//!
//! ```no_run
//! use imagetool::{convert, ConvertOptions, ImageFormat, ImageSettings};
//!
//! let settings = ImageSettings::with_format(ImageFormat::Jpeg);
//! let info = convert("photo.png", "photo.jpg", &settings, ConvertOptions::default())?;
//! println!("wrote a {} image of {:?}", info.format, info.size);
//! # Ok::<(), imagetool::ConvertError>(())
//! ```

#![forbid(unsafe_code)]

pub mod codec;
mod convert;
mod decode;
pub mod encode;
pub mod encoders;
pub mod error;
pub mod exif;
pub mod format;
mod image;
pub mod metadata;
pub mod operations;
pub mod resolve;
pub mod settings;

pub use crate::convert::{convert, ConvertOptions, Converter};
pub use crate::encode::save_image;
pub use crate::error::{BackendError, ConvertError};
pub use crate::format::ImageFormat;
pub use crate::image::{Image, ImageInfo};
pub use crate::metadata::{MetadataBag, Properties, PropertyCategory};
pub use crate::settings::{Color, ImageFramework, ImageSettings, ImageSize, Rect, Size};
