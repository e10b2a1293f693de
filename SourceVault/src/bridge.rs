//! Presentation hand-off contract
//!
//! The decode core never draws. It hands an assembled [`MeshBundle`] to
//! whatever owns the rendering surface and gets nothing back; camera
//! state, shading, and draw ordering all live on the other side of this
//! trait. If `present` is called again before a previous hand-off for the
//! same surface has been consumed, the bridge's own buffering policy
//! decides what happens.

use crate::mesh::MeshBundle;

/// A consumer of assembled geometry.
pub trait PresentationBridge {
    /// Handle to a live rendering surface (a canvas, a swapchain, a test
    /// recorder).
    type Surface;

    /// Hand over a bundle for display. Fire-and-forget.
    fn present(&mut self, bundle: &MeshBundle, surface: &Self::Surface);

    /// Blank the surface.
    fn clear(&mut self, surface: &Self::Surface);
}
