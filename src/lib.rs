//! # pixfit
//!
//! Resize planning and basic editing for JPEG, PNG and GIF images.
//!
//! The core is a pure planner that answers "what size should this image
//! become?" for two modes, without touching any pixels:
//!
//! ```text
//! fit within 500x500:  1000x500 → scale 500x250
//! fit exact  100x100:   300x200 → scale 150x100 → crop 100x100 at 25,0
//! ```
//!
//! Plans are executed against an image buffer by [`imaging::operations`],
//! and [`process`] applies one plan per file across a whole batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Planner (`plan_fit_within`, `plan_fit_exact`), the `ImageHost` boundary, and the `image`-crate [`ImageEditor`](imaging::ImageEditor) |
//! | [`process`] | Parallel batch resizing with progress events |
//! | [`config`] | `pixfit.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting: plans, image info, batch progress |
//!
//! # Design Decisions
//!
//! ## Plans Are Values
//!
//! The planner returns a [`ResizePlan`](imaging::ResizePlan) instead of
//! resizing directly. A plan says whether to do nothing, scale, or scale and
//! then center-crop, and carries every dimension involved. Callers can print
//! it (`pixfit plan-within`), serialize it (`--json`), or run it against any
//! [`ImageHost`](imaging::ImageHost). Unit tests check plans with plain
//! integers and a recording mock host; no image is decoded.
//!
//! ## Never Upscale When Fitting
//!
//! Fit-within only ever shrinks. An image already inside the bounds yields
//! `NoChange`, and rounding never pushes a dimension past its bound.
//! Fit-exact may enlarge, since the caller asked for an exact size.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling and encoding use the `image` crate only. Formats are
//! sniffed from file contents, never from extensions.
//!
//! ## Sparse Config Over Stock Defaults
//!
//! `pixfit.toml` is merged key-by-key over the stock defaults, so a file can
//! set a single value. Unknown keys are rejected.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
