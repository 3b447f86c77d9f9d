use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::DriveError;

static DRIVE_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn drive_name_re() -> &'static Regex {
    DRIVE_NAME_RE.get_or_init(|| Regex::new(r"^[A-Z]:$").expect("drive name regex"))
}

/// 盘符（`A:` ~ `Z:`），构造后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriveName {
    letter: u8,
}

impl DriveName {
    /// 严格校验：单个大写字母 + 冒号。不做大小写或尾部 `\` 的容错。
    pub fn parse(input: &str) -> Result<Self, DriveError> {
        if input.is_empty() || !drive_name_re().is_match(input) {
            return Err(DriveError::InvalidArgument(input.to_string()));
        }
        Ok(Self {
            letter: input.as_bytes()[0],
        })
    }

    pub fn from_letter(letter: char) -> Result<Self, DriveError> {
        Self::parse(&format!("{letter}:"))
    }

    /// A: 到 Z:，按字母顺序
    pub fn all() -> impl Iterator<Item = DriveName> {
        (b'A'..=b'Z').map(|letter| DriveName { letter })
    }

    pub fn letter(&self) -> char {
        self.letter as char
    }

    pub fn as_str(&self) -> &str {
        // letter 恒为 ASCII 大写字母，见 parse / all
        const NAMES: &str = "A:B:C:D:E:F:G:H:I:J:K:L:M:N:O:P:Q:R:S:T:U:V:W:X:Y:Z:";
        let i = usize::from(self.letter - b'A') * 2;
        &NAMES[i..i + 2]
    }

    /// 卷查询用的根路径（`E:\`）
    pub fn root_path(&self) -> String {
        format!("{}\\", self.as_str())
    }
}

impl fmt::Display for DriveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DriveName {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for DriveName {
    type Error = DriveError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for DriveName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uppercase_letter_and_colon() {
        let name = DriveName::parse("C:").unwrap();
        assert_eq!(name.letter(), 'C');
        assert_eq!(name.as_str(), "C:");
        assert_eq!(name.root_path(), "C:\\");
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["", "1:", "AB:", "c:", "C", "C:\\", " C:", "[:", "Ä:"] {
            assert_eq!(
                DriveName::parse(bad),
                Err(DriveError::InvalidArgument(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn all_is_alphabetical_a_to_z() {
        let names: Vec<String> = DriveName::all().map(|n| n.to_string()).collect();
        assert_eq!(names.len(), 26);
        assert_eq!(names.first().map(String::as_str), Some("A:"));
        assert_eq!(names.last().map(String::as_str), Some("Z:"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn from_letter_goes_through_validation() {
        assert_eq!(DriveName::from_letter('Q').unwrap().as_str(), "Q:");
        assert!(DriveName::from_letter('q').is_err());
    }
}
