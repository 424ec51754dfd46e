//! Writes `sample_salaries.csv`, a synthetic dataset in the dashboard's CSV
//! schema, for use offline via *File → Open*.

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct Row {
    ano: i32,
    senioridade: &'static str,
    contrato: &'static str,
    tamanho_empresa: &'static str,
    cargo: &'static str,
    usd: Option<f64>,
    remoto: &'static str,
    residencia_iso3: Option<&'static str>,
}

/// splitmix64; deterministic so the file is identical on every run.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const YEARS: [i32; 6] = [2020, 2021, 2022, 2023, 2024, 2025];
const SENIORITY: [(&str, f64); 4] = [
    ("junior", 0.6),
    ("pleno", 1.0),
    ("senior", 1.45),
    ("executivo", 1.9),
];
const CONTRACTS: [&str; 4] = ["integral", "contrato", "parcial", "freelancer"];
const SIZES: [&str; 3] = ["pequena", "media", "grande"];
const ROLES: [(&str, f64); 8] = [
    ("Data Scientist", 120_000.0),
    ("Data Engineer", 115_000.0),
    ("Data Analyst", 85_000.0),
    ("Machine Learning Engineer", 140_000.0),
    ("Analytics Engineer", 110_000.0),
    ("Research Scientist", 150_000.0),
    ("BI Developer", 80_000.0),
    ("Data Architect", 145_000.0),
];
const REMOTE: [&str; 3] = ["remoto", "presencial", "hibrido"];
const COUNTRIES: [Option<&str>; 8] = [
    Some("USA"),
    Some("USA"),
    Some("GBR"),
    Some("CAN"),
    Some("DEU"),
    Some("BRA"),
    Some("IND"),
    None,
];

fn main() -> Result<()> {
    let mut rng = Rng(42);
    let output_path = "sample_salaries.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let rows = 2_000;
    for _ in 0..rows {
        let year = rng.pick(&YEARS);
        let (seniority, level) = rng.pick(&SENIORITY);
        let (role, base) = rng.pick(&ROLES);
        let growth = 1.0 + 0.04 * (year - YEARS[0]) as f64;
        let noise = 0.7 + 0.6 * rng.unit();
        // About 1% of rows lack a salary, like the published data.
        let usd = (rng.unit() > 0.01).then(|| (base * level * growth * noise).round());

        writer.serialize(Row {
            ano: year,
            senioridade: seniority,
            contrato: rng.pick(&CONTRACTS),
            tamanho_empresa: rng.pick(&SIZES),
            cargo: role,
            usd,
            remoto: rng.pick(&REMOTE),
            residencia_iso3: rng.pick(&COUNTRIES),
        })?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} salary rows to {output_path}");
    Ok(())
}
