//! # Material Resolution
//!
//! Maps an attachment's backing atlas region to a renderable material.
//!
//! The renderer never creates materials. It asks a [`MaterialSource`] once per
//! renderable slot per frame and batches consecutive slots that resolve to the
//! same [`MaterialId`].

use std::collections::HashMap;

use crate::error::{RenderError, RenderResult};
use crate::skeleton::{Attachment, PageId, Slot};

/// Opaque material handle. Equality is identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Resolves the material an attachment renders with.
pub trait MaterialSource {
    /// Returns the material for `attachment` shown in `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment has no backing region or its page has
    /// no material.
    fn material_for(&self, attachment: &Attachment, slot: &Slot) -> RenderResult<MaterialId>;
}

impl<F> MaterialSource for F
where
    F: Fn(&Attachment, &Slot) -> RenderResult<MaterialId>,
{
    fn material_for(&self, attachment: &Attachment, slot: &Slot) -> RenderResult<MaterialId> {
        self(attachment, slot)
    }
}

/// Page table from atlas pages to materials. One material per page.
#[derive(Debug, Clone, Default)]
pub struct AtlasMaterials {
    pages: HashMap<PageId, MaterialId>,
}

impl AtlasMaterials {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the material for a page, replacing any previous one.
    pub fn register(&mut self, page: PageId, material: MaterialId) -> Option<MaterialId> {
        self.pages.insert(page, material)
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_page(mut self, page: PageId, material: MaterialId) -> Self {
        self.register(page, material);
        self
    }

    /// Number of registered pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if no page is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl MaterialSource for AtlasMaterials {
    fn material_for(&self, attachment: &Attachment, slot: &Slot) -> RenderResult<MaterialId> {
        let region = attachment
            .region()
            .ok_or_else(|| RenderError::MissingMaterial {
                slot: slot.name.clone(),
            })?;

        self.pages
            .get(&region.page)
            .copied()
            .ok_or_else(|| RenderError::UnknownAtlasPage {
                page: region.page.0,
                slot: slot.name.clone(),
            })
    }
}
