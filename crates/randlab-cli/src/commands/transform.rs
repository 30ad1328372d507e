use std::path::Path;

use randlab_core::Distribution;

use crate::error::Result;

pub struct TransformCommandConfig<'a> {
    pub path: &'a str,
    pub code: &'a str,
    pub params: &'a [f64],
    pub output_path: Option<&'a str>,
}

/// `distr-<code>.dat`, used when `-o` is not given.
pub fn default_output_path(dist: &Distribution) -> String {
    format!("distr-{}.dat", dist.code())
}

pub fn run(config: TransformCommandConfig<'_>) -> Result<()> {
    let dist = Distribution::parse(config.code, config.params)?;
    let unit = super::load_normalized(config.path)?;
    let samples = dist.transform(&unit);

    let output = config
        .output_path
        .map(str::to_string)
        .unwrap_or_else(|| default_output_path(&dist));
    randlab_core::write_sequence_file(Path::new(&output), &samples)?;

    println!(
        "{dist}: {} uniforms → {} samples, saved to: {output}",
        unit.len(),
        samples.len()
    );
    Ok(())
}
