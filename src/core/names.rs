use crate::domain::model::PhotoDescriptor;
use crate::domain::ports::NameAllocator;
use std::collections::HashSet;

/// Keeps `<likes>.jpg` for the first occurrence of each like-count; later
/// collisions fall back to `<likes>_<timestamp>.jpg`.
pub struct UniqueNames;

impl NameAllocator for UniqueNames {
    fn allocate(&self, photos: Vec<PhotoDescriptor>) -> Vec<PhotoDescriptor> {
        let mut used = HashSet::new();
        photos
            .into_iter()
            .map(|mut photo| {
                if !used.insert(photo.file_name.clone()) {
                    photo.file_name = format!("{}_{}.jpg", photo.like_count, photo.timestamp);
                    used.insert(photo.file_name.clone());
                }
                photo
            })
            .collect()
    }
}

/// Identity allocator: duplicate names are allowed to overwrite each other
/// in the destination container.
pub struct Passthrough;

impl NameAllocator for Passthrough {
    fn allocate(&self, photos: Vec<PhotoDescriptor>) -> Vec<PhotoDescriptor> {
        photos
    }
}
