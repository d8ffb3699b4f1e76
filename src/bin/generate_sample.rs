use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";
const ALLELES: [&str; 4] = ["HLA-A*01:01", "HLA-A*02:01", "HLA-B*07:02", "HLA-B*44:02"];
const PROBABILITIES: [u32; 5] = [60, 70, 80, 90, 100];

/// Deterministic splitmix64 generator, enough for reproducible sample files.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn random_peptide(rng: &mut SampleRng, len: usize) -> String {
    (0..len).map(|_| *rng.pick(AMINO_ACIDS) as char).collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let n_peptides = 40;
    let mut rng = SampleRng(42);

    let mut table =
        String::from("name,allele,start,end,length,core_peptide,peptide,ic50,rank,adjusted_rank\n");
    let mut allergen = String::from("AllerTOP v. 2.0\n\n");
    let mut immunogen = String::from("VaxiJen v2.0\n\n");

    for i in 1..=n_peptides {
        let id = format!("peptide_{i}");
        let peptide = random_peptide(&mut rng, 9);
        let start = i * 3;

        // One row per allele, as a binding predictor emits them.
        let alleles: Vec<&str> = ALLELES.iter().copied().filter(|_| rng.chance(0.5)).collect();
        for allele in alleles {
            let ic50 = 5.0 + rng.next_f64() * 500.0;
            let rank = rng.next_f64() * 2.0;
            writeln!(
                table,
                ">{id},{allele},{start},{},9,{peptide},{peptide},{ic50:.2},{rank:.2},{rank:.2}",
                start + 8
            )?;
        }

        let class = if rng.chance(0.6) { "NON-ALLERGEN" } else { "ALLERGEN" };
        writeln!(allergen, "Results for protein ({id}):")?;
        writeln!(allergen, "Classification based on the most similar protein: {class}\n")?;

        let label = if rng.chance(0.7) {
            "Probable IMMUNOGEN"
        } else {
            "Probable NON-IMMUNOGEN"
        };
        let probability = *rng.pick(&PROBABILITIES[..]);
        writeln!(immunogen, "Results for protein ({id}):")?;
        writeln!(immunogen, "Overall Prediction for the Protective Antigen")?;
        writeln!(immunogen, "{label} with a probability of {probability}%\n")?;
    }

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    for (file_name, content) in [
        ("sample_predictions.csv", &table),
        ("sample_allergen.txt", &allergen),
        ("sample_immunogen.txt", &immunogen),
    ] {
        let path = out_dir.join(file_name);
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    println!(
        "Wrote {n_peptides} peptides ({} table rows) to {}",
        table.lines().count() - 1,
        out_dir.display()
    );
    Ok(())
}
