//! The transient pool caches textures between consecutive frame graphs.
//!
//! Textures are matched purely on their [`TextureDesc`] (format and dimensions). Views are added to a matched
//! texture on demand, so capability never decides whether a cached texture is eligible. A texture is only
//! kept alive for one build-to-build cycle: every graph build releases whatever it did not claim.
//!
//! Reused textures are not cleared. Passes must declare a clear or discard access instead of relying on
//! the contents of a previous frame.
//!
//! # Example
//! ```
//! # use framegraph::prelude::*;
//! # fn frame<D: Device>(device: &mut D) -> anyhow::Result<()> {
//! let pool = TransientPool::<D>::new();
//! let desc = TextureDesc::new(Format::R16G16B16A16Float, 1280, 720);
//! let texture = pool.find_or_create(device, "scene color", &desc, ViewCapabilities::RENDER_TARGET)?;
//! // Hand the texture back so the next request with the same description reuses it.
//! pool.take(texture)?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use crate::core::error::Error;
use crate::core::traits::Device;
use crate::resource::texture::{TextureDesc, ViewCapabilities, ViewSet};

/// A texture owned by the transient pool or by the graph that claimed it.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct TransientTexture<D: Device> {
    desc: TextureDesc,
    texture: D::Texture,
    views: ViewSet<D::View>,
}

impl<D: Device> TransientTexture<D> {
    /// Description this texture was created with.
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    /// The backend texture handle.
    pub fn texture(&self) -> &D::Texture {
        &self.texture
    }

    /// All views created on this texture so far.
    pub fn views(&self) -> &ViewSet<D::View> {
        &self.views
    }

    /// Create a view for every capability in `capabilities` that does not have one yet.
    fn ensure_views(&mut self, device: &mut D, name: &str, capabilities: ViewCapabilities) -> Result<()> {
        let missing = capabilities - self.views.capabilities();
        for capability in missing.iter() {
            let view = device.create_view(&self.texture, capability).with_context(|| Error::ViewCreationFailed {
                name: name.to_owned(),
                capability,
            })?;
            self.views.set(capability, view);
        }
        Ok(())
    }
}

struct PoolInner<D: Device> {
    items: Vec<TransientTexture<D>>,
}

/// Pool of transient textures, shared by all frame graphs that render with the same device.
///
/// Cloning the pool is cheap and yields a handle to the same storage. Access is serialized by a mutex,
/// so graphs on different threads can share a pool, but their builds never overlap.
pub struct TransientPool<D: Device> {
    inner: Arc<Mutex<PoolInner<D>>>,
}

impl<D: Device> Clone for TransientPool<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: Device> Default for TransientPool<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Device> PoolInner<D> {
    /// Remove the best structural match for `desc` from the pool. Among all textures with a matching
    /// description, the first one that already has every requested view is preferred, otherwise the first
    /// match is taken.
    fn claim(&mut self, desc: &TextureDesc, capabilities: ViewCapabilities) -> Option<TransientTexture<D>> {
        let mut candidates = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.desc == *desc);
        let first = candidates.next()?;
        let covering = std::iter::once(first)
            .chain(candidates)
            .find(|(_, item)| item.views.capabilities().contains(capabilities))
            .map(|(index, _)| index);
        let index = covering.unwrap_or(first.0);
        Some(self.items.remove(index))
    }
}

impl<D: Device> Drop for PoolInner<D> {
    fn drop(&mut self) {
        if !self.items.is_empty() {
            warn!(
                "Transient pool dropped with {} cached textures. Call release_unclaimed() before destroying the device.",
                self.items.len()
            );
        }
    }
}

impl<D: Device> TransientPool<D> {
    /// Create a new, empty pool.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PoolInner {
                items: Vec::new(),
            })),
        }
    }

    /// Get mutable access to the inner pool
    fn with<F: FnOnce(&mut PoolInner<D>) -> R, R>(&self, f: F) -> Result<R> {
        let mut inner = self.inner.lock().map_err(Error::from)?;
        Ok(f(&mut inner))
    }

    /// Obtain a texture matching `desc` that supports every view in `capabilities`.
    ///
    /// A cached texture with the same format and dimensions is removed from the pool and missing views are
    /// created on it. If there is none, a new texture is allocated with exactly the requested capabilities.
    /// `name` is only used for diagnostics.
    /// # Errors
    /// * Fails if the device cannot create the texture or one of the views. A texture that fails view creation
    ///   is released, it does not go back to the pool.
    pub fn find_or_create(
        &self,
        device: &mut D,
        name: &str,
        desc: &TextureDesc,
        capabilities: ViewCapabilities,
    ) -> Result<TransientTexture<D>> {
        let (mut texture, reused) = match self.with(|pool| pool.claim(desc, capabilities))? {
            Some(texture) => {
                debug!("Reusing pooled texture {desc:?} for resource `{name}`");
                (texture, true)
            }
            None => {
                let handle = device
                    .create_texture(desc, capabilities)
                    .with_context(|| Error::TextureCreationFailed(name.to_owned()))?;
                #[cfg(feature = "log-objects")]
                trace!("Created new transient texture {handle:?} ({desc:?})");
                (
                    TransientTexture {
                        desc: *desc,
                        texture: handle,
                        views: ViewSet::default(),
                    },
                    false,
                )
            }
        };

        if let Err(err) = texture.ensure_views(device, name, capabilities) {
            if reused {
                error!("Failed to add views to pooled texture for resource `{name}`, releasing it");
            }
            Self::destroy(device, texture);
            return Err(err);
        }
        Ok(texture)
    }

    /// Release a texture back into the pool, where the next [`find_or_create`](Self::find_or_create) can claim it.
    pub fn take(&self, texture: TransientTexture<D>) -> Result<()> {
        self.with(|pool| pool.items.push(texture))
    }

    /// Release every texture that is still in the pool to the device. Frame graphs call this after claiming
    /// their textures.
    /// Returns the amount of released textures.
    pub fn release_unclaimed(&self, device: &mut D) -> Result<usize> {
        let items = self.with(|pool| std::mem::take(&mut pool.items))?;
        let count = items.len();
        for texture in items {
            Self::destroy(device, texture);
        }
        if count > 0 {
            debug!("Released {count} unclaimed transient textures");
        }
        Ok(count)
    }

    /// Release every cached texture to the device. Call this before destroying the device.
    pub fn clear(&self, device: &mut D) -> Result<()> {
        self.release_unclaimed(device)?;
        Ok(())
    }

    /// Amount of textures currently cached.
    /// # Errors
    /// * Fails with [`Error::PoisonError`] if the pool lock was poisoned.
    pub fn len(&self) -> Result<usize> {
        self.with(|pool| pool.items.len())
    }

    /// Whether the pool currently caches no textures.
    /// # Errors
    /// * Fails with [`Error::PoisonError`] if the pool lock was poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        self.with(|pool| pool.items.is_empty())
    }

    fn destroy(device: &mut D, texture: TransientTexture<D>) {
        #[cfg(feature = "log-objects")]
        trace!("Destroying transient texture {:?}", texture.texture);
        device.release(texture.texture);
    }
}
