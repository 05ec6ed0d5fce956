//! Writes a synthetic EUCAST-style MIC table (full schema) for trying the viewer.

use anyhow::{Context, Result};

use ecoff_viewer::data::model::{CONCENTRATION_LEVELS, LEVEL_COUNT};
use ecoff_viewer::mode::PresentationMode;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (antibiotic, species, wildtype mode level index, resistant share, has ECOFF)
const COMBINATIONS: [(&str, &str, usize, f64, bool); 6] = [
    ("Amoxicillin", "Escherichia coli", 11, 0.15, true),
    ("Amoxicillin", "Enterococcus faecalis", 8, 0.05, true),
    ("Ciprofloxacin", "Escherichia coli", 3, 0.20, true),
    ("Ciprofloxacin", "Pseudomonas aeruginosa", 7, 0.10, true),
    ("Ciprofloxacin", "Staphylococcus aureus", 7, 0.02, false),
    ("Vancomycin", "Staphylococcus aureus", 9, 0.0, true),
];

/// Draw one MIC as a level index around `mode`.
fn draw_level(rng: &mut SimpleRng, mode: usize, spread: f64) -> usize {
    let idx = rng.gauss(mode as f64, spread).round();
    idx.clamp(0.0, (LEVEL_COUNT - 1) as f64) as usize
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_data.csv";

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut header: Vec<&str> = PresentationMode::Full.required_columns().to_vec();
    header.extend(CONCENTRATION_LEVELS.iter().map(|l| l.label));
    writer.write_record(&header)?;

    for &(antibiotic, species, mode, resistant_share, has_cutoff) in &COMBINATIONS {
        let distributions = 1 + (rng.next_f64() * 12.0) as u32;
        let observations = distributions * (20 + (rng.next_f64() * 300.0) as u32);

        let mut counts = [0u32; LEVEL_COUNT];
        for _ in 0..observations {
            let idx = if rng.next_f64() < resistant_share {
                draw_level(&mut rng, (mode + 5).min(LEVEL_COUNT - 1), 1.2)
            } else {
                draw_level(&mut rng, mode, 0.8)
            };
            counts[idx] += 1;
        }

        // ECOFF two dilution steps above the wildtype mode.
        let cutoff = if has_cutoff {
            CONCENTRATION_LEVELS[(mode + 2).min(LEVEL_COUNT - 1)]
                .mg_per_l
                .to_string()
        } else {
            String::new()
        };
        let tentative = if distributions < 5 { "True" } else { "False" };

        let mut record = vec![
            antibiotic.to_string(),
            species.to_string(),
            distributions.to_string(),
            observations.to_string(),
            cutoff,
            tentative.to_string(),
            "2024-03-15".to_string(),
        ];
        record.extend(counts.iter().map(|c| c.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    println!(
        "Wrote {} antibiotic/species rows ({} concentration levels each) to {output_path}",
        COMBINATIONS.len(),
        LEVEL_COUNT
    );
    Ok(())
}
