//! Ramachandran plot rendering to SVG.
//!
//! Scatter plots draw the angle pairs directly. Heatmap and contour plots first bin the
//! pairs into a [`DensityGrid`], log-scale the counts and optionally smooth them with a
//! Gaussian kernel.

use crate::cli::PlotStyle;
use crate::config::PlotSettings;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

pub const BINS: usize = 180;
const AXIS_MIN: f64 = -180.0;
const AXIS_MAX: f64 = 180.0;
const BIN_WIDTH: f64 = (AXIS_MAX - AXIS_MIN) / BINS as f64;
const TICKS: [f64; 5] = [-180.0, -90.0, 0.0, 90.0, 180.0];
const CONTOUR_LEVELS: usize = 7;
const KERNEL_TRUNCATE: f64 = 4.0;
const POINT_RADIUS: i32 = 2;

/// A square grid over [-180, 180) x [-180, 180), indexed as `[psi_bin][phi_bin]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    values: Vec<f64>,
}

/// Bin of an angle; 180 itself falls into the last bin, anything outside the axes is dropped.
fn bin_index(angle: f64) -> Option<usize> {
    if !(AXIS_MIN..=AXIS_MAX).contains(&angle) {
        return None;
    }
    let index = ((angle - AXIS_MIN) / BIN_WIDTH).floor() as usize;
    Some(index.min(BINS - 1))
}

fn bin_center(index: usize) -> f64 {
    AXIS_MIN + (index as f64 + 0.5) * BIN_WIDTH
}

fn reflect(index: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let folded = index.rem_euclid(period) as usize;
    if folded < len {
        folded
    } else {
        2 * len - 1 - folded
    }
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (KERNEL_TRUNCATE * sigma + 0.5) as usize;
    let weights: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-0.5 * (x / sigma).powi(2)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

impl DensityGrid {
    pub fn zeros() -> Self {
        Self {
            values: vec![0.0; BINS * BINS],
        }
    }

    /// Counts the (phi, psi) pairs per 2-degree bin.
    pub fn histogram(phis: &[f64], psis: &[f64]) -> Self {
        let mut grid = Self::zeros();
        for (&phi, &psi) in phis.iter().zip(psis) {
            if let (Some(col), Some(row)) = (bin_index(phi), bin_index(psi)) {
                grid.values[row * BINS + col] += 1.0;
            }
        }
        grid
    }

    /// Replaces every count by its base-10 logarithm; empty bins stay at zero.
    pub fn log_scaled(mut self) -> Self {
        for value in &mut self.values {
            *value = if *value > 0.0 { value.log10() } else { 0.0 };
        }
        self
    }

    /// Separable Gaussian smoothing with mirrored edges. `sigma` is measured in bins.
    pub fn blurred(&self, sigma: f64) -> Self {
        if sigma <= 0.0 {
            return self.clone();
        }
        let kernel = gaussian_kernel(sigma);
        let radius = (kernel.len() / 2) as isize;

        let convolve = |source: &[f64], along_rows: bool| -> Vec<f64> {
            let mut out = vec![0.0; BINS * BINS];
            for row in 0..BINS {
                for col in 0..BINS {
                    out[row * BINS + col] = kernel
                        .iter()
                        .enumerate()
                        .map(|(k, weight)| {
                            let offset = k as isize - radius;
                            let value = if along_rows {
                                source[row * BINS + reflect(col as isize + offset, BINS)]
                            } else {
                                source[reflect(row as isize + offset, BINS) * BINS + col]
                            };
                            weight * value
                        })
                        .sum();
                }
            }
            out
        };

        let horizontal = convolve(&self.values, true);
        Self {
            values: convolve(&horizontal, false),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * BINS + col]
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Evenly spaced levels strictly between zero and the grid maximum.
    pub fn contour_levels(&self, count: usize) -> Vec<f64> {
        let max = self.max();
        if max <= 0.0 {
            return Vec::new();
        }
        (1..=count)
            .map(|k| max * k as f64 / (count + 1) as f64)
            .collect()
    }

    /// Iso-line segments at `level` in (phi, psi) coordinates, traced with marching squares
    /// over the bin centers.
    pub fn iso_segments(&self, level: f64) -> Vec<[(f64, f64); 2]> {
        let mut segments = Vec::new();
        for row in 0..BINS - 1 {
            for col in 0..BINS - 1 {
                // Corners counter-clockwise from the lower-left bin center.
                let corners = [
                    (row, col),
                    (row, col + 1),
                    (row + 1, col + 1),
                    (row + 1, col),
                ];
                let values = corners.map(|(r, c)| self.get(r, c));
                let above = values.map(|v| v >= level);

                let crossings: Vec<(usize, (f64, f64))> = (0..4)
                    .filter(|&edge| above[edge] != above[(edge + 1) % 4])
                    .map(|edge| {
                        let next = (edge + 1) % 4;
                        let t = (level - values[edge]) / (values[next] - values[edge]);
                        let (r0, c0) = corners[edge];
                        let (r1, c1) = corners[next];
                        let phi = bin_center(c0) + t * (bin_center(c1) - bin_center(c0));
                        let psi = bin_center(r0) + t * (bin_center(r1) - bin_center(r0));
                        (edge, (phi, psi))
                    })
                    .collect();

                match crossings.as_slice() {
                    [(_, a), (_, b)] => segments.push([*a, *b]),
                    [(_, e0), (_, e1), (_, e2), (_, e3)] => {
                        let center = values.iter().sum::<f64>() / 4.0;
                        if (center >= level) != above[0] {
                            segments.push([*e3, *e0]);
                            segments.push([*e1, *e2]);
                        } else {
                            segments.push([*e0, *e1]);
                            segments.push([*e2, *e3]);
                        }
                    }
                    _ => {}
                }
            }
        }
        segments
    }
}

/// Maps `fraction` in [0, 1] onto a perceptually ordered dark-blue to yellow gradient.
fn density_color(fraction: f64) -> RGBColor {
    const STOPS: [(u8, u8, u8); 5] = [
        (68, 1, 84),
        (59, 82, 139),
        (33, 145, 140),
        (94, 201, 98),
        (253, 231, 37),
    ];
    let scaled = fraction.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(STOPS.len() - 2);
    let t = scaled - lower as f64;
    let mix = |a: u8, b: u8| (a as f64 + t * (b as f64 - a as f64)).round() as u8;
    let (r0, g0, b0) = STOPS[lower];
    let (r1, g1, b1) = STOPS[lower + 1];
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

fn density_grid(phis: &[f64], psis: &[f64], blur: Option<f64>) -> DensityGrid {
    let grid = DensityGrid::histogram(phis, psis).log_scaled();
    match blur {
        Some(sigma) => grid.blurred(sigma),
        None => grid,
    }
}

fn cell(row: usize, col: usize) -> [(f64, f64); 2] {
    let x0 = AXIS_MIN + col as f64 * BIN_WIDTH;
    let y0 = AXIS_MIN + row as f64 * BIN_WIDTH;
    [(x0, y0), (x0 + BIN_WIDTH, y0 + BIN_WIDTH)]
}

fn draw_plot(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    phis: &[f64],
    psis: &[f64],
    settings: &PlotSettings,
) -> anyhow::Result<()> {
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50);
    if let Some(title) = &settings.title {
        builder.caption(title, ("sans-serif", 20));
    }
    let mut chart = builder.build_cartesian_2d(
        (AXIS_MIN..AXIS_MAX).with_key_points(TICKS.to_vec()),
        (AXIS_MIN..AXIS_MAX).with_key_points(TICKS.to_vec()),
    )?;

    match settings.style {
        PlotStyle::Scatter => {
            chart.draw_series(
                phis.iter()
                    .zip(psis)
                    .map(|(&phi, &psi)| Circle::new((phi, psi), POINT_RADIUS, BLUE.filled())),
            )?;
        }
        PlotStyle::Heatmap => {
            let grid = density_grid(phis, psis, settings.blur);
            let max = grid.max();
            if max > 0.0 {
                chart.draw_series((0..BINS).flat_map(|row| {
                    let grid = &grid;
                    (0..BINS).map(move |col| {
                        Rectangle::new(
                            cell(row, col),
                            density_color(grid.get(row, col) / max).filled(),
                        )
                    })
                }))?;
            }
        }
        PlotStyle::Contour => {
            let grid = density_grid(phis, psis, settings.blur);
            let levels = grid.contour_levels(CONTOUR_LEVELS);
            if !levels.is_empty() {
                let band_count = levels.len() as f64;
                let mut cells = Vec::new();
                for row in 0..BINS {
                    for col in 0..BINS {
                        let band = levels.iter().filter(|&&l| grid.get(row, col) >= l).count();
                        if band > 0 {
                            cells.push((row, col, band as f64 / band_count));
                        }
                    }
                }
                chart.draw_series(cells.into_iter().map(|(row, col, fraction)| {
                    Rectangle::new(cell(row, col), density_color(fraction).filled())
                }))?;

                for level in &levels {
                    let segments = grid.iso_segments(*level);
                    chart.draw_series(segments.into_iter().map(|[a, b]| {
                        PathElement::new(vec![a, b], BLACK.stroke_width(1))
                    }))?;
                }
            }
        }
    }

    chart
        .configure_mesh()
        .x_desc("Phi")
        .y_desc("Psi")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Renders the plot into an SVG file at `path`.
pub fn render_svg(
    path: &Path,
    phis: &[f64],
    psis: &[f64],
    settings: &PlotSettings,
) -> anyhow::Result<()> {
    debug!(
        "Rendering {:?} plot of {} point(s) to {:?}",
        settings.style,
        phis.len(),
        path
    );
    let root = SVGBackend::new(path, (settings.width, settings.height)).into_drawing_area();
    draw_plot(&root, phis, psis, settings)
}

/// Renders the plot into an in-memory SVG document.
#[cfg(test)]
fn render_svg_string(
    phis: &[f64],
    psis: &[f64],
    settings: &PlotSettings,
) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let size = (settings.width, settings.height);
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_plot(&root, phis, psis, settings)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const TOLERANCE: f64 = 1e-9;

    impl DensityGrid {
        fn total(&self) -> f64 {
            self.values.iter().sum()
        }
    }

    fn settings(style: PlotStyle, blur: Option<f64>) -> PlotSettings {
        PlotSettings {
            output: PathBuf::from("unused.svg"),
            style,
            blur,
            width: 400,
            height: 400,
            title: Some("Test plot".to_string()),
        }
    }

    #[test]
    fn bin_index_covers_closed_axis_range() {
        assert_eq!(bin_index(-180.0), Some(0));
        assert_eq!(bin_index(-178.0), Some(1));
        assert_eq!(bin_index(0.0), Some(90));
        assert_eq!(bin_index(179.9), Some(179));
        assert_eq!(bin_index(180.0), Some(179));
        assert_eq!(bin_index(180.5), None);
        assert_eq!(bin_index(f64::NAN), None);
    }

    #[test]
    fn histogram_counts_pairs_by_psi_row_and_phi_column() {
        let phis = [-60.0, -61.0, 120.0];
        let psis = [-45.0, -44.5, 130.0];
        let grid = DensityGrid::histogram(&phis, &psis);

        assert_eq!(grid.get(bin_index(-45.0).unwrap(), bin_index(-60.0).unwrap()), 1.0);
        assert_eq!(grid.get(bin_index(-44.5).unwrap(), bin_index(-61.0).unwrap()), 1.0);
        assert_eq!(grid.get(bin_index(130.0).unwrap(), bin_index(120.0).unwrap()), 1.0);
        assert_eq!(grid.total(), 3.0);
    }

    #[test]
    fn log_scaling_keeps_empty_bins_at_zero() {
        let phis = [10.0; 100];
        let psis = [20.0; 100];
        let grid = DensityGrid::histogram(&phis, &psis).log_scaled();
        let (row, col) = (bin_index(20.0).unwrap(), bin_index(10.0).unwrap());
        assert!((grid.get(row, col) - 2.0).abs() < TOLERANCE);
        assert_eq!(grid.get(0, 0), 0.0);
        assert!((grid.total() - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(2.0);
        assert_eq!(kernel.len(), 17);
        assert!((kernel.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < TOLERANCE);
        }
        assert!(kernel[8] > kernel[7]);
    }

    #[test]
    fn reflect_mirrors_indices_at_both_edges() {
        assert_eq!(reflect(-1, 10), 0);
        assert_eq!(reflect(-2, 10), 1);
        assert_eq!(reflect(5, 10), 5);
        assert_eq!(reflect(10, 10), 9);
        assert_eq!(reflect(11, 10), 8);
    }

    #[test]
    fn blur_preserves_mass_and_spreads_peaks() {
        let grid = DensityGrid::histogram(&[0.0; 10], &[0.0; 10]);
        let blurred = grid.blurred(2.0);

        assert!((blurred.total() - grid.total()).abs() < 1e-6);
        assert!(blurred.max() < grid.max());
        assert!(blurred.get(90, 91) > 0.0);
        assert!((blurred.get(90, 89) - blurred.get(90, 91)).abs() < TOLERANCE);
        assert!((blurred.get(89, 90) - blurred.get(90, 89)).abs() < TOLERANCE);
    }

    #[test]
    fn zero_blur_is_identity() {
        let grid = DensityGrid::histogram(&[45.0, -90.0], &[0.0, 90.0]);
        assert_eq!(grid.blurred(0.0), grid);
    }

    #[test]
    fn contour_levels_are_evenly_spaced_below_maximum() {
        let grid = DensityGrid::histogram(&[0.0; 8], &[0.0; 8]);
        let levels = grid.contour_levels(3);
        assert_eq!(levels, vec![2.0, 4.0, 6.0]);
        assert!(DensityGrid::zeros().contour_levels(3).is_empty());
    }

    #[test]
    fn isolated_peak_is_enclosed_by_four_segments() {
        let grid = DensityGrid::histogram(&[0.0], &[0.0]);
        let segments = grid.iso_segments(0.5);
        assert_eq!(segments.len(), 4);
        for [a, b] in segments {
            for (phi, psi) in [a, b] {
                assert!((phi - 1.0).abs() <= 2.0 + TOLERANCE);
                assert!((psi - 1.0).abs() <= 2.0 + TOLERANCE);
            }
        }
    }

    #[test]
    fn density_color_spans_gradient_endpoints() {
        assert_eq!(density_color(0.0), RGBColor(68, 1, 84));
        assert_eq!(density_color(1.0), RGBColor(253, 231, 37));
        assert_eq!(density_color(2.0), RGBColor(253, 231, 37));
        assert_eq!(density_color(0.5), RGBColor(33, 145, 140));
    }

    #[test]
    fn every_style_renders_svg_document() {
        let phis = [-63.0, -120.0, 60.0, -65.0];
        let psis = [-42.0, 130.0, 45.0, -40.0];
        for style in [PlotStyle::Scatter, PlotStyle::Heatmap, PlotStyle::Contour] {
            let blur = (style == PlotStyle::Contour).then_some(2.0);
            let svg = render_svg_string(&phis, &psis, &settings(style, blur)).unwrap();
            assert!(svg.contains("<svg"), "{:?} produced no svg root", style);
            assert!(svg.contains("Phi"));
            assert!(svg.contains("Psi"));
        }
    }

    #[test]
    fn empty_data_still_renders_axes() {
        for style in [PlotStyle::Scatter, PlotStyle::Heatmap, PlotStyle::Contour] {
            let svg = render_svg_string(&[], &[], &settings(style, None)).unwrap();
            assert!(svg.contains("<svg"));
        }
    }

    #[test]
    fn render_svg_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        render_svg(&path, &[-60.0], &[-45.0], &settings(PlotStyle::Scatter, None)).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<circle"));
    }
}
