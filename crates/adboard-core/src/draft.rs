//! In-progress submission: collected photos and the caption.

use crate::transport::MediaItem;

/// Outcome of adding a photo to a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoAdd {
    /// Photo stored; carries the new photo count.
    Added(usize),
    /// Draft already holds the maximum number of photos.
    Full,
}

/// Photos and caption collected from one submitter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    photos: Vec<String>,
    caption: Option<String>,
}

impl Draft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a photo unless `max_photos` is reached.
    pub fn add_photo(&mut self, photo: impl Into<String>, max_photos: usize) -> PhotoAdd {
        if self.photos.len() >= max_photos {
            return PhotoAdd::Full;
        }
        self.photos.push(photo.into());
        PhotoAdd::Added(self.photos.len())
    }

    /// Sets the caption text.
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = Some(caption.into());
    }

    /// Photos in upload order.
    #[must_use]
    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    /// Caption, if already entered.
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Whether no photo has been collected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Builds the grouped post: photos in order, caption on the first item only.
    ///
    /// Returns `None` until the draft has at least one photo and a caption.
    ///
    /// # Examples
    ///
    /// ```
    /// use adboard_core::draft::Draft;
    ///
    /// let mut draft = Draft::new();
    /// draft.add_photo("a", 10);
    /// draft.add_photo("b", 10);
    /// draft.set_caption("Selling bike");
    ///
    /// let batch = draft.media_batch().unwrap_or_default();
    /// assert_eq!(batch[0].caption.as_deref(), Some("Selling bike"));
    /// assert_eq!(batch[1].caption, None);
    /// ```
    #[must_use]
    pub fn media_batch(&self) -> Option<Vec<MediaItem>> {
        self.media_batch_with_caption(self.caption.as_deref()?)
    }

    /// Same as [`Draft::media_batch`] but with a caption chosen by the caller.
    #[must_use]
    pub fn media_batch_with_caption(&self, caption: &str) -> Option<Vec<MediaItem>> {
        if self.photos.is_empty() {
            return None;
        }
        let batch = self
            .photos
            .iter()
            .enumerate()
            .map(|(i, photo)| MediaItem {
                photo: photo.clone(),
                caption: (i == 0).then(|| caption.to_string()),
            })
            .collect();
        Some(batch)
    }
}
