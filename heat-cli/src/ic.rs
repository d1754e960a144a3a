use clap::ValueEnum;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IcType {
    /// A single hot cell (see `--impulse`)
    Impulse,
    Gaussians,
    Rectangles,
    SmoothNoise,
    GradientMix,
}

impl IcType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IcType::Impulse => "impulse",
            IcType::Gaussians => "gaussians",
            IcType::Rectangles => "rectangles",
            IcType::SmoothNoise => "smooth_noise",
            IcType::GradientMix => "gradient_mix",
        }
    }
}

/// A single hot cell, given on the command line as `row,col,value`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impulse {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl std::str::FromStr for Impulse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [row, col, value] = parts[..] else {
            return Err(format!("expected `row,col,value`, got `{s}`"));
        };
        Ok(Impulse {
            row: row.parse().map_err(|e| format!("bad row `{row}`: {e}"))?,
            col: col.parse().map_err(|e| format!("bad col `{col}`: {e}"))?,
            value: value.parse().map_err(|e| format!("bad value `{value}`: {e}"))?,
        })
    }
}

/// Fill a `rows × cols` field (row-major) with a random pattern in `[0, 1]`.
pub fn generate_ic<R: Rng>(rng: &mut R, rows: usize, cols: usize, ic: IcType) -> Vec<f64> {
    let mut f = vec![0.0f64; rows * cols];
    let span_y = (rows as f64 - 1.0).max(1.0);
    let span_x = (cols as f64 - 1.0).max(1.0);

    match ic {
        IcType::Impulse => {}

        IcType::Gaussians => {
            let blobs = rng.gen_range(1..=3);
            for _ in 0..blobs {
                let cy = rng.gen_range(0.15..0.85) * span_y;
                let cx = rng.gen_range(0.15..0.85) * span_x;
                let sigma = rng.gen_range(0.1..0.3) * span_x.min(span_y).max(1.0);
                let amp = rng.gen_range(0.6..1.0);
                add_gaussian(&mut f, cols, (cy, cx), sigma, amp);
            }
        }

        IcType::Rectangles => {
            let rects = rng.gen_range(1..=4);
            for _ in 0..rects {
                let y0 = rng.gen_range(1..(rows / 2).max(2));
                let x0 = rng.gen_range(1..(cols / 2).max(2));
                let h = rng.gen_range(1..(rows / 2).max(2));
                let w = rng.gen_range(1..(cols / 2).max(2));
                let val = rng.gen_range(0.5..1.0);

                let y1 = (y0 + h).min(rows.saturating_sub(2));
                let x1 = (x0 + w).min(cols.saturating_sub(2));

                for y in y0..=y1 {
                    for x in x0..=x1 {
                        let c = &mut f[y * cols + x];
                        *c = c.max(val);
                    }
                }
            }
        }

        IcType::SmoothNoise => {
            for v in f.iter_mut() {
                *v = rng.gen_range(0.0..1.0);
            }
            f = box_blur(&f, rows, cols, 2);
        }

        IcType::GradientMix => {
            let dir = rng.gen_range(0..4);
            for y in 0..rows {
                for x in 0..cols {
                    let t = match dir {
                        0 => x as f64 / span_x,
                        1 => y as f64 / span_y,
                        2 => 1.0 - x as f64 / span_x,
                        _ => 1.0 - y as f64 / span_y,
                    };
                    f[y * cols + x] = 0.6 * t;
                }
            }
            let cy = rng.gen_range(0.2..0.8) * span_y;
            let cx = rng.gen_range(0.2..0.8) * span_x;
            let sigma = rng.gen_range(0.15..0.35) * span_x.min(span_y).max(1.0);
            let amp = rng.gen_range(0.4..0.9);
            add_gaussian(&mut f, cols, (cy, cx), sigma, amp);
        }
    }

    normalize_01(&mut f);
    f
}

fn add_gaussian(f: &mut [f64], cols: usize, (cy, cx): (f64, f64), sigma: f64, amp: f64) {
    for (k, v) in f.iter_mut().enumerate() {
        let dy = (k / cols) as f64 - cy;
        let dx = (k % cols) as f64 - cx;
        let r2 = dx * dx + dy * dy;
        *v += amp * (-0.5 * r2 / (sigma * sigma)).exp();
    }
}

fn normalize_01(f: &mut [f64]) {
    let mx = f.iter().copied().fold(0.0f64, f64::max);
    if mx > 0.0 {
        for v in f.iter_mut() {
            *v = (*v / mx).clamp(0.0, 1.0);
        }
    }
}

fn box_blur(src: &[f64], rows: usize, cols: usize, passes: usize) -> Vec<f64> {
    let mut cur = src.to_vec();
    let mut tmp = vec![0.0f64; rows * cols];

    for _ in 0..passes {
        for y in 0..rows {
            for x in 0..cols {
                let mut sum = 0.0;
                let mut cnt = 0.0;
                for yy in y.saturating_sub(1)..=(y + 1).min(rows - 1) {
                    for xx in x.saturating_sub(1)..=(x + 1).min(cols - 1) {
                        sum += cur[yy * cols + xx];
                        cnt += 1.0;
                    }
                }
                tmp[y * cols + x] = sum / cnt;
            }
        }
        std::mem::swap(&mut cur, &mut tmp);
    }
    cur
}
