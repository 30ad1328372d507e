//! Generator method tags and their strongly typed parameter records.
//!
//! Parameters arrive from the outside as a `;`-delimited list of integers
//! (`"1;5;3;16"`). [`GeneratorParams::parse`] checks the arity for the chosen
//! [`Method`] and turns the list into the matching variant. Domain checks
//! (zero modulus, tap range, register width) happen when the generator state
//! is built, so hand-constructed records are validated too.

use std::fmt;
use std::str::FromStr;

use crate::error::GeneratorError;

/// The fixed set of generator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `seed = (a*seed + c) mod m`
    LinearCongruential,
    /// `seed = (seed + U(1, m-1)) mod m`, U from injected entropy.
    Additive,
    /// `seed = (a*seed + c + e) mod m`
    FiveParameter,
    /// Linear feedback shift register, taps counted from the low end.
    Lfsr,
    /// Feedback shift register with taps counted from the high end.
    Nfsr,
    /// Mersenne-Twister tempering over an entropy-sourced pool.
    MersenneTempering,
    /// RC4 keystream bytes.
    Rc4,
    /// `x = (x*x + c) mod m`
    BlumBlumShub,
    /// `x = x^e mod n`, chained.
    Rsa,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::LinearCongruential,
        Method::Additive,
        Method::FiveParameter,
        Method::Lfsr,
        Method::Nfsr,
        Method::MersenneTempering,
        Method::Rc4,
        Method::BlumBlumShub,
        Method::Rsa,
    ];

    /// Short tag used on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            Self::LinearCongruential => "lc",
            Self::Additive => "add",
            Self::FiveParameter => "5p",
            Self::Lfsr => "lfsr",
            Self::Nfsr => "nfsr",
            Self::MersenneTempering => "mt",
            Self::Rc4 => "rc4",
            Self::BlumBlumShub => "bbs",
            Self::Rsa => "rsa",
        }
    }

    /// Long, human-readable name.
    pub fn long_name(self) -> &'static str {
        match self {
            Self::LinearCongruential => "linear-congruential",
            Self::Additive => "additive",
            Self::FiveParameter => "five-parameter",
            Self::Lfsr => "lfsr",
            Self::Nfsr => "nfsr",
            Self::MersenneTempering => "mersenne-tempering",
            Self::Rc4 => "rc4",
            Self::BlumBlumShub => "blum-blum-shub",
            Self::Rsa => "rsa",
        }
    }

    /// Parameter layout in text order.
    pub fn schema(self) -> &'static str {
        match self {
            Self::LinearCongruential => "seed;a;c;m",
            Self::Additive => "seed;m",
            Self::FiveParameter => "seed;m;a;c;e",
            Self::Lfsr | Self::Nfsr => "seed;size;tap[;tap...]",
            Self::MersenneTempering => "(none)",
            Self::Rc4 => "k1[;k2...]",
            Self::BlumBlumShub => "c;m;x;l",
            Self::Rsa => "n;e;w;seed;n_count",
        }
    }

    /// Whether output depends on injected entropy rather than parameters alone.
    pub fn uses_entropy(self) -> bool {
        matches!(self, Self::Additive | Self::MersenneTempering)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Method {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Method::ALL
            .into_iter()
            .find(|m| m.tag() == needle || m.long_name() == needle)
            .ok_or_else(|| GeneratorError::UnknownMethod(s.to_string()))
    }
}

/// Seed, width and taps of a feedback shift register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterParams {
    pub seed: u64,
    /// Register width in bits, `1..=64`.
    pub size: u32,
    /// 1-indexed tap positions, `1..=size`.
    pub taps: Vec<u32>,
}

/// Parameter record for one generator family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorParams {
    LinearCongruential { seed: u64, a: u64, c: u64, m: u64 },
    Additive { seed: u64, m: u64 },
    FiveParameter { seed: u64, m: u64, a: u64, c: u64, e: u64 },
    Lfsr(RegisterParams),
    Nfsr(RegisterParams),
    MersenneTempering,
    Rc4 { key: Vec<u8> },
    /// `l` is carried for parity with the four-parameter scheme and never read.
    BlumBlumShub { c: u64, m: u64, x: u64, l: u64 },
    /// `w` and `n_count` are carried for parity with the five-parameter scheme
    /// and never read; the sequence length comes from the caller.
    Rsa { n: u64, e: u64, w: u64, seed: u64, n_count: u64 },
}

impl GeneratorParams {
    /// Parse a `;`-delimited parameter list for `method`.
    pub fn parse(method: Method, text: &str) -> Result<Self, GeneratorError> {
        let values = parse_values(text)?;
        Self::from_values(method, &values)
    }

    /// Build a parameter record from already-parsed integers.
    pub fn from_values(method: Method, values: &[u64]) -> Result<Self, GeneratorError> {
        let params = match method {
            Method::LinearCongruential => {
                let [seed, a, c, m] = exact::<4>(method, "4", values)?;
                Self::LinearCongruential { seed, a, c, m }
            }
            Method::Additive => {
                if values.len() < 2 {
                    return Err(arity(method, "at least 2", values.len()));
                }
                if values.len() > 2 {
                    log::warn!(
                        "additive: ignoring {} trailing parameter(s)",
                        values.len() - 2
                    );
                }
                Self::Additive {
                    seed: values[0],
                    m: values[1],
                }
            }
            Method::FiveParameter => {
                let [seed, m, a, c, e] = exact::<5>(method, "5", values)?;
                Self::FiveParameter { seed, m, a, c, e }
            }
            Method::Lfsr => Self::Lfsr(register(method, values)?),
            Method::Nfsr => Self::Nfsr(register(method, values)?),
            Method::MersenneTempering => {
                if !values.is_empty() {
                    log::debug!("mt: {} parameter(s) ignored", values.len());
                }
                Self::MersenneTempering
            }
            Method::Rc4 => {
                if values.is_empty() {
                    return Err(arity(method, "at least 1", 0));
                }
                let key = values
                    .iter()
                    .map(|&v| {
                        u8::try_from(v).map_err(|_| GeneratorError::InvalidParameter {
                            name: "key",
                            reason: format!("key byte {v} exceeds 255"),
                        })
                    })
                    .collect::<Result<Vec<u8>, _>>()?;
                Self::Rc4 { key }
            }
            Method::BlumBlumShub => {
                let [c, m, x, l] = exact::<4>(method, "4", values)?;
                Self::BlumBlumShub { c, m, x, l }
            }
            Method::Rsa => {
                let [n, e, w, seed, n_count] = exact::<5>(method, "5", values)?;
                Self::Rsa {
                    n,
                    e,
                    w,
                    seed,
                    n_count,
                }
            }
        };
        Ok(params)
    }

    /// The generator family this record belongs to.
    pub fn method(&self) -> Method {
        match self {
            Self::LinearCongruential { .. } => Method::LinearCongruential,
            Self::Additive { .. } => Method::Additive,
            Self::FiveParameter { .. } => Method::FiveParameter,
            Self::Lfsr(_) => Method::Lfsr,
            Self::Nfsr(_) => Method::Nfsr,
            Self::MersenneTempering => Method::MersenneTempering,
            Self::Rc4 { .. } => Method::Rc4,
            Self::BlumBlumShub { .. } => Method::BlumBlumShub,
            Self::Rsa { .. } => Method::Rsa,
        }
    }
}

/// Split a `;`-delimited list into integers.
pub fn parse_values(text: &str) -> Result<Vec<u64>, GeneratorError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(';')
        .enumerate()
        .map(|(index, token)| {
            let token = token.trim();
            token.parse::<u64>().map_err(|_| GeneratorError::InvalidNumber {
                index,
                token: token.to_string(),
            })
        })
        .collect()
}

fn arity(method: Method, expected: &'static str, got: usize) -> GeneratorError {
    GeneratorError::ParameterCount {
        method: method.tag(),
        expected,
        got,
    }
}

fn exact<const N: usize>(
    method: Method,
    expected: &'static str,
    values: &[u64],
) -> Result<[u64; N], GeneratorError> {
    <[u64; N]>::try_from(values).map_err(|_| arity(method, expected, values.len()))
}

fn register(method: Method, values: &[u64]) -> Result<RegisterParams, GeneratorError> {
    if values.len() < 3 {
        return Err(arity(method, "at least 3", values.len()));
    }
    let size = u32::try_from(values[1]).map_err(|_| GeneratorError::InvalidParameter {
        name: "size",
        reason: format!("{} is not a register width", values[1]),
    })?;
    let taps = values[2..]
        .iter()
        .map(|&t| {
            u32::try_from(t).map_err(|_| GeneratorError::InvalidParameter {
                name: "taps",
                reason: format!("{t} is not a tap position"),
            })
        })
        .collect::<Result<Vec<u32>, _>>()?;
    Ok(RegisterParams {
        seed: values[0],
        size,
        taps,
    })
}
