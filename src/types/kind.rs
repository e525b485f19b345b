use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three page kinds. `Home` is intended to be a singleton per tenant;
/// the store does not enforce this and takes the first match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Home,
    Page,
    Post,
}

impl PageKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Page => "page",
            PageKind::Post => "post",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(PageKind::Home),
            "page" => Ok(PageKind::Page),
            "post" => Ok(PageKind::Post),
            other => Err(format!("unknown page kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_str() {
        for kind in [PageKind::Home, PageKind::Page, PageKind::Post] {
            assert_eq!(kind.as_str().parse::<PageKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("draft".parse::<PageKind>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&PageKind::Post).unwrap(), "\"post\"");
        let kind: PageKind = serde_json::from_str("\"home\"").unwrap();
        assert_eq!(kind, PageKind::Home);
    }
}
