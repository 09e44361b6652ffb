//! Fixed brand colors shared by the render passes.

use crate::foundation::core::Rgba8;

/// Brand gold: gradient start, patch ring, dark-theme text outline.
pub const BRAND_GOLD: Rgba8 = Rgba8::rgb(0xb3, 0x99, 0x5d);
/// Brand green: gradient end, primary fallback badge.
pub const BRAND_GREEN: Rgba8 = Rgba8::rgb(0x00, 0x48, 0x2b);
/// Secondary fallback badge fill.
pub const SLATE: Rgba8 = Rgba8::rgb(0x47, 0x55, 0x69);
/// Opaque black, the reset color of every pass.
pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);
/// Opaque white.
pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);
/// Error placeholder fill.
pub const ERROR_RED: Rgba8 = Rgba8::rgb(0xc6, 0x28, 0x28);
