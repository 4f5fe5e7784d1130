//! [`YarnDitherer`]: the primary entry point for the crate.
//!
//! Mirrors a fluent builder: a reusable, immutable configuration object
//! whose [`dither`](YarnDitherer::dither) method takes `&self` so the
//! same settings can be applied to many images.

use tracing::info;

use crate::color::{LinearRgb, Srgb};
use crate::config::DitherConfig;
use crate::cost::CostMetric;
use crate::diffuse::diffuse_row;
use crate::error::{ConfigError, DitherError};
use crate::palette::Palette;
use crate::pool::WorkerPool;
use crate::solver::{self, optimal, beam, RowMetrics};
use crate::table::{build_tables, TableStack};
use crate::tie_break::TieBreaker;

/// Which row solver to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Exact, jointly-optimal solve via forward relaxation + backtrack.
    Optimal,
    /// Width-bounded beam search; faster, not guaranteed optimal.
    Beam { beam_width: usize },
}

/// The result of dithering one image: the yarn-index raster plus
/// per-row and per-image observability data.
#[derive(Debug, Clone)]
pub struct DitherResult {
    pub raster: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub row_metrics: Vec<RowMetrics>,
    pub total_ties: u64,
    pub elapsed: std::time::Duration,
    /// Only meaningful for [`Method::Beam`]: true if every row's beam
    /// search completed without ever truncating its frontier, meaning
    /// the result is provably identical to the exact solve.
    pub proven_optimal: bool,
}

impl DitherResult {
    pub fn row(&self, y: usize) -> &[u8] {
        &self.raster[y * self.width..(y + 1) * self.width]
    }
}

/// Row-constrained yarn dithering for double-bed weft knitting.
pub struct YarnDitherer {
    palette: Palette,
    metric: CostMetric,
    use_within: u32,
    cross_within: u32,
    diffuse: bool,
    seed: u32,
    threads: u32,
    method: Method,
}

impl YarnDitherer {
    /// Create a new ditherer with the given palette.
    ///
    /// Defaults: linear cost metric, no `use_within`/`cross_within`
    /// constraints, diffusion enabled, seed 0, auto thread count, exact
    /// (`Method::Optimal`) solving.
    ///
    /// # Example
    ///
    /// ```
    /// use yarnwise::{LinearRgb, Palette, YarnDitherer};
    ///
    /// let palette = Palette::new(vec![LinearRgb::new(0.0, 0.0, 0.0), LinearRgb::new(1.0, 1.0, 1.0)]).unwrap();
    /// let ditherer = YarnDitherer::new(palette);
    /// ```
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            metric: CostMetric::Linear,
            use_within: 0,
            cross_within: 0,
            diffuse: true,
            seed: 0,
            threads: 0,
            method: Method::Optimal,
        }
    }

    /// Build from a serializable [`DitherConfig`] plus the palette it
    /// can't sensibly carry itself.
    pub fn from_config(palette: Palette, config: &DitherConfig) -> Self {
        Self {
            palette,
            metric: config.metric.into(),
            use_within: config.use_within,
            cross_within: config.cross_within,
            diffuse: config.diffuse,
            seed: config.seed,
            threads: config.threads,
            method: config.method.into(),
        }
    }

    /// Set the color-difference metric used to score yarn choices.
    #[inline]
    pub fn metric(mut self, metric: CostMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Require every yarn to appear at least once in every window of
    /// `n` consecutive stitches. `0` disables the constraint.
    #[inline]
    pub fn use_within(mut self, n: u32) -> Self {
        self.use_within = n;
        self
    }

    /// Require a same-yarn crossing (two placements separated by an
    /// odd stitch gap) in every window of `n` consecutive stitches. `0`
    /// disables the constraint.
    #[inline]
    pub fn cross_within(mut self, n: u32) -> Self {
        self.cross_within = n;
        self
    }

    /// Enable or disable row-to-row error diffusion.
    #[inline]
    pub fn diffuse(mut self, enabled: bool) -> Self {
        self.diffuse = enabled;
        self
    }

    /// Set the tie-breaking seed (see [`crate::tie_break::TieBreaker`]).
    #[inline]
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Set the worker pool's thread count for the optimal solver's
    /// relaxation step. `0` means "use available parallelism".
    #[inline]
    pub fn threads(mut self, n: u32) -> Self {
        self.threads = n;
        self
    }

    /// Select the exact or beam row solver.
    #[inline]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Dither an sRGB image, row by row, top to bottom.
    ///
    /// Each row is solved under the windowed constraints independently,
    /// then (if enabled) its quantization error is diffused into the
    /// rows below before they are solved in turn.
    pub fn dither(&self, pixels: &[Srgb], width: usize, height: usize) -> Result<DitherResult, DitherError> {
        self.validate(pixels, width, height)?;
        let started = std::time::Instant::now();

        let mut image: Vec<LinearRgb> = pixels.iter().map(|&p| LinearRgb::from(p)).collect();

        // The beam solver walks the state graph live and never needs the
        // CSR tables or a thread pool; only build them for the exact
        // solver, which is the one that actually amortizes them across
        // every row of the image.
        let (tables, pool) = match self.method {
            Method::Optimal => {
                let pool = WorkerPool::new(self.threads);
                let mut tables = build_tables(width, self.use_within, self.cross_within, self.palette.len());
                tables.assign_worker_slices(pool.len());
                (Some(tables), Some(pool))
            }
            Method::Beam { .. } => (None, None),
        };

        self.dither_with_tables(&mut image, width, height, tables.as_ref(), pool.as_ref(), started)
    }

    fn dither_with_tables(
        &self,
        image: &mut [LinearRgb],
        width: usize,
        height: usize,
        tables: Option<&TableStack>,
        pool: Option<&WorkerPool>,
        started: std::time::Instant,
    ) -> Result<DitherResult, DitherError> {
        let mut tie_breaker = TieBreaker::new(self.seed);
        let mut raster = vec![0u8; width * height];
        let mut row_metrics = Vec::with_capacity(height);
        let mut total_ties = 0u64;
        let mut proven_optimal = true;

        for y in 0..height {
            let row_pixels = &image[y * width..(y + 1) * width];
            let costs = solver::precompute_row_costs(row_pixels, &self.palette, self.metric);

            let yarns = match self.method {
                Method::Optimal => {
                    let solution = optimal::solve_row(
                        tables.expect("tables are built whenever method is Optimal"),
                        &costs,
                        pool,
                        y,
                        self.use_within,
                        self.cross_within,
                        &mut tie_breaker,
                    )?;
                    total_ties += solution.metrics.ties;
                    row_metrics.push(solution.metrics);
                    solution.yarns
                }
                Method::Beam { beam_width } => {
                    let solution = beam::solve_row(
                        &costs,
                        self.use_within,
                        self.cross_within,
                        beam_width,
                        y,
                        &mut tie_breaker,
                    )?;
                    total_ties += solution.metrics.ties;
                    proven_optimal &= solution.proven_optimal;
                    row_metrics.push(solution.metrics);
                    solution.yarns
                }
            };

            raster[y * width..(y + 1) * width].copy_from_slice(&yarns);
            diffuse_row(image, width, height, y, &yarns, &self.palette, self.diffuse);

            info!(
                row = y,
                ties = row_metrics.last().unwrap().ties,
                cost = row_metrics.last().unwrap().terminal_cost,
                "row dithered"
            );
        }

        Ok(DitherResult {
            raster,
            width,
            height,
            row_metrics,
            total_ties,
            elapsed: started.elapsed(),
            proven_optimal,
        })
    }

    fn validate(&self, pixels: &[Srgb], width: usize, height: usize) -> Result<(), ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        let expected = width * height;
        if pixels.len() != expected {
            return Err(ConfigError::ImageSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        if let Method::Beam { beam_width } = self.method {
            if beam_width == 0 {
                return Err(ConfigError::ZeroBeamWidth);
            }
        }
        Ok(())
    }
}
