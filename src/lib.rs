//! Row-constrained yarn quantization and dithering for double-bed weft
//! knitting machines.
//!
//! Each row of an image is mapped to a sequence of yarn indices such
//! that every window of `use_within` stitches contains every yarn at
//! least once, and every window of `cross_within` stitches contains at
//! least one same-yarn "crossing" (two placements of the same yarn
//! separated by an odd stitch gap). Subject to those hard constraints,
//! the chosen yarns minimize total color difference from the source
//! image, optionally diffusing the residual error into rows below.
//!
//! [`YarnDitherer`] is the entry point:
//!
//! ```
//! use yarnwise::{CostMetric, LinearRgb, Palette, Srgb, YarnDitherer};
//!
//! let palette = Palette::new(vec![
//!     LinearRgb::from(Srgb::from_u8(200, 30, 30)),
//!     LinearRgb::from(Srgb::from_u8(230, 230, 230)),
//! ]).unwrap();
//!
//! let ditherer = YarnDitherer::new(palette)
//!     .use_within(4)
//!     .metric(CostMetric::Oklab);
//!
//! let pixels = vec![Srgb::from_u8(200, 30, 30); 8];
//! let result = ditherer.dither(&pixels, 8, 1).unwrap();
//! assert_eq!(result.raster.len(), 8);
//! ```

pub mod api;
pub mod color;
pub mod config;
pub mod cost;
pub mod diffuse;
pub mod error;
pub mod palette;
pub mod pool;
pub mod solver;
pub mod state;
pub mod table;
pub mod tie_break;

pub use api::{DitherResult, Method, YarnDitherer};
pub use color::{LinearRgb, Oklab, Srgb};
pub use config::{DitherConfig, MethodConfig, MetricConfig};
pub use cost::CostMetric;
pub use error::{ConfigError, DitherError, ParseColorError};
pub use palette::Palette;
pub use solver::RowMetrics;
