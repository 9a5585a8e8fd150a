use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DmError, Result};

/// A Zernike mode given by its radial degree `n` and azimuthal frequency `m`.
///
/// `m > 0` selects the cosine term, `m < 0` the sine term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZernikeMode {
    n: u32,
    m: i32,
}

pub fn is_valid(n: i32, m: i32) -> bool {
    n >= 0 && m.unsigned_abs() <= n as u32 && (n as u32 - m.unsigned_abs()) % 2 == 0
}

/// Number of modes with radial degree `<= n_max`.
pub fn modes_up_to(n_max: u32) -> usize {
    let n = n_max as usize;
    (n + 1) * (n + 2) / 2
}

impl ZernikeMode {
    pub fn new(n: i32, m: i32) -> Result<Self> {
        if !is_valid(n, m) {
            return Err(DmError::InvalidMode { n, m });
        }
        Ok(Self { n: n as u32, m })
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn m(&self) -> i32 {
        self.m
    }

    /// 1-based Noll index.
    ///
    /// Modes of degree `n` start at `n(n+1)/2 + 1`, pairs of equal `|m|` are
    /// consecutive and ordered by increasing `|m|`; inside a pair the even
    /// index carries the cosine term (`m > 0`) and the odd one the sine term.
    pub fn noll(&self) -> usize {
        let n = self.n as usize;
        let m_abs = self.m.unsigned_abs() as usize;
        let base = n * (n + 1) / 2 + 1;
        if m_abs == 0 {
            return base;
        }
        let k = (m_abs - n % 2) / 2;
        let first = if n % 2 == 0 {
            base + 2 * k - 1
        } else {
            base + 2 * k
        };
        if (self.m > 0) == (first % 2 == 0) {
            first
        } else {
            first + 1
        }
    }

    /// 0-based linear index into a basis.
    pub fn index(&self) -> usize {
        self.noll() - 1
    }

    pub fn from_noll(j: usize) -> Result<Self> {
        if j == 0 {
            return Err(DmError::InvalidMode { n: -1, m: 0 });
        }
        let mut n = 0u32;
        while modes_up_to(n) < j {
            n += 1;
        }
        let n = n as i32;
        (-n..=n)
            .step_by(2)
            .map(|m| Self { n: n as u32, m })
            .find(|mode| mode.noll() == j)
            .ok_or(DmError::InvalidMode { n, m: 0 })
    }
}

impl Ord for ZernikeMode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.noll().cmp(&other.noll())
    }
}

impl PartialOrd for ZernikeMode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ZernikeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.n, self.m)
    }
}

impl FromStr for ZernikeMode {
    type Err = DmError;

    /// Parses `"(n,m)"`, whitespace tolerated.
    fn from_str(s: &str) -> Result<Self> {
        let parse_err = || DmError::ModeParse(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(parse_err)?;
        let (n, m) = inner.split_once(',').ok_or_else(parse_err)?;
        let n: i32 = n.trim().parse().map_err(|_| parse_err())?;
        let m: i32 = m.trim().parse().map_err(|_| parse_err())?;
        Self::new(n, m)
    }
}

impl TryFrom<String> for ZernikeMode {
    type Error = DmError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ZernikeMode> for String {
    fn from(mode: ZernikeMode) -> Self {
        mode.to_string()
    }
}
