use std::path::Path;

use randlab_core::{GeneratorParams, Method};

use crate::error::Result;

pub struct GenerateCommandConfig<'a> {
    pub method: &'a str,
    pub length: usize,
    pub params: &'a [String],
    pub file_path: Option<&'a str>,
    pub entropy: &'a str,
    pub entropy_seed: Option<u64>,
}

/// Join `-i` tokens into the `;`-separated parameter text.
pub fn join_params(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(";")
}

/// Parse the parameters and produce the sequence.
pub fn generate_sequence(config: &GenerateCommandConfig<'_>) -> Result<Vec<u64>> {
    let method: Method = config.method.parse()?;
    let params = GeneratorParams::parse(method, &join_params(config.params))?;
    let mut entropy = super::make_entropy(config.entropy, config.entropy_seed)?;
    Ok(randlab_core::generate(config.length, &params, entropy.as_mut())?)
}

pub fn run(config: GenerateCommandConfig<'_>) -> Result<()> {
    let values = generate_sequence(&config)?;

    let line: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    println!("{}", line.join(", "));

    if let Some(path) = config.file_path {
        randlab_core::write_sequence_file(Path::new(path), &values)?;
        println!("\nSaved {} values to: {path}", values.len());
    }
    Ok(())
}
