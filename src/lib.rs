//! # qrcraft
//!
//! A Rust library for encoding text or binary data into QR Code Model 2 symbols.
//!
//! `qrcraft` covers the whole encoder pipeline: the input is split into numeric, alphanumeric
//! and byte segments, the smallest fitting version (1 to 40) is chosen, the bitstream is padded,
//! Reed-Solomon error correction is computed per block and interleaved, and the modules are placed
//! into a matrix together with the function patterns, the lowest-penalty mask and the format and
//! version information.
//!
//! ## Features
//!
//! - Encode data in numeric, alphanumeric or byte mode, with automatic segmentation.
//! - Support four error correction levels: Low, Medium, Quartile, High.
//! - Pin the version or mask, raise the ECC level when there is room, or fall back to a lower
//!   level when the data does not fit.
//! - Render QR codes as ASCII art, PNG images, SVGs, or in-memory image buffers.
//! - Optional `serde` support for [`EncodeOptions`].
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrcraft = "0.2"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qrcraft::{generate, EccLevel, EncodeOptions};
//!
//! let qr = generate("HELLO WORLD", &EncodeOptions::default().ecc_level(EccLevel::Q)).unwrap();
//! assert_eq!(qr.version().value(), 1);
//! assert_eq!(qr.size(), 21);
//! // x = 0, y = 0 is the corner of the top-left finder pattern
//! assert!(qr.get_module(0, 0));
//! ```
//!
//! Render the result:
//!
//! ```rust
//! use qrcraft::{generate, helper, EncodeOptions};
//!
//! let qr = generate("https://example.com", &EncodeOptions::default().quiet_zone(2)).unwrap();
//! let svg = helper::to_svg_string(&qr);
//! assert!(svg.contains("<svg"));
//! let img = helper::to_image_buffer(&qr, 4).unwrap();
//! assert_eq!(img.width(), (qr.size() as u32 + 4) * 4);
//! ```
//!
//! Check input up front without encoding:
//!
//! ```rust
//! use qrcraft::{validate_input, EncodeOptions, VersionChoice};
//!
//! let options = EncodeOptions::default().version(VersionChoice::Fixed(1));
//! assert!(validate_input("short", &options).is_empty());
//! assert_eq!(validate_input(&"long".repeat(20), &options).len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Core QR code generation.
//! - [`segment`] and [`bitstream`]: Mode segmentation and the padded data bitstream.
//! - [`gf`], [`polynomial`] and [`reed_solomon`]: GF(256) arithmetic and error correction.
//! - [`matrix`] and [`info`]: Module placement, masking and format/version information.
//! - [`helper`]: Utilities for rendering QR codes in various formats.

#![forbid(unsafe_code)]

pub mod bits;
pub mod bitstream;
pub mod error;
pub mod gf;
pub mod helper;
pub mod info;
pub mod matrix;
pub mod options;
pub mod polynomial;
pub mod qrcode;
pub mod reed_solomon;
pub mod segment;
pub mod version;

pub use error::{QrError, Result};
pub use matrix::{Module, QrMatrix};
pub use options::{validate_input, EncodeOptions, MaskChoice, VersionChoice};
pub use qrcode::{generate, generate_bytes, generate_segments, QrCode};
pub use segment::{segment_input, Mode, Segment};
pub use version::{EccLevel, Mask, Version};
