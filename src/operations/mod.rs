//! Edits applied to the decoded image before it is encoded.

mod blur;
mod crop;
mod filter;
mod flip;
mod resize;
mod rotate;

use std::collections::BTreeMap;

use crate::{
    image::Image,
    settings::{Rect, Size},
};

pub use filter::ColorFilter;
pub use flip::Axis;
pub use rotate::Rotation;

#[derive(Debug, Copy, Clone, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(OperationKind), derive(PartialOrd, Ord, Hash))]
pub enum ImageOperation {
    Crop(Rect),
    Resize(Size),
    Rotate(Rotation),
    Flip(Axis),
    Filter(ColorFilter),
    /// Gaussian blur with the given sigma
    Blur(f32),
}

impl ImageOperation {
    pub fn kind(&self) -> OperationKind {
        OperationKind::from(self)
    }

    pub fn execute(&self, image: &mut Image) {
        match self {
            ImageOperation::Crop(rect) => crop::crop(image, rect),
            ImageOperation::Resize(size) => resize::resize(image, *size),
            ImageOperation::Rotate(rotation) => rotate::rotate(image, *rotation),
            ImageOperation::Flip(axis) => flip::flip(image, *axis),
            ImageOperation::Filter(filter) => filter::apply(image, *filter),
            ImageOperation::Blur(sigma) => blur::blur(image, *sigma),
        }
    }
}

/// Edits keyed by kind: inserting an operation replaces any earlier one of the same kind.
///
/// Iteration and application follow [OperationKind] order, so crops happen before resizes
/// and color filters last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSet {
    operations: BTreeMap<OperationKind, ImageOperation>,
}

impl EditSet {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the operation of the same kind that was replaced, if any
    pub fn insert(&mut self, operation: ImageOperation) -> Option<ImageOperation> {
        self.operations.insert(operation.kind(), operation)
    }

    pub fn with(mut self, operation: ImageOperation) -> Self {
        self.insert(operation);
        self
    }

    pub fn remove(&mut self, kind: OperationKind) -> Option<ImageOperation> {
        self.operations.remove(&kind)
    }

    pub fn get(&self, kind: OperationKind) -> Option<&ImageOperation> {
        self.operations.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageOperation> {
        self.operations.values()
    }
}

impl FromIterator<ImageOperation> for EditSet {
    fn from_iter<T: IntoIterator<Item = ImageOperation>>(iter: T) -> Self {
        let mut set = EditSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<ImageOperation> for EditSet {
    fn extend<T: IntoIterator<Item = ImageOperation>>(&mut self, iter: T) {
        for operation in iter {
            self.insert(operation);
        }
    }
}

/// Runs every edit in the set over the image
pub fn apply(image: &mut Image, edits: &EditSet) {
    for operation in edits.iter() {
        log::trace!("applying {operation:?}");
        operation.execute(image);
    }
}
