//! Status enums for layout panels and the viewport.

use serde::{Deserialize, Serialize};

/// Visibility of a sliding panel (cart, contributor area, image browser).
///
/// `Initial` means the panel has never been toggled; it renders closed but
/// lets the first toggle pick a viewport-dependent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PanelStatus {
    #[default]
    Initial,
    Open,
    Closed,
}

impl PanelStatus {
    /// Whether the panel is currently shown.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Open becomes closed, anything else becomes open.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Initial | Self::Closed => Self::Open,
        }
    }
}

impl std::fmt::Display for PanelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for PanelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Self::Initial),
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid panel status: {s}")),
        }
    }
}

/// Viewport class derived from the desktop media query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    Desktop,
    Mobile,
}

impl ViewportClass {
    /// Classify from the result of the desktop media query.
    #[must_use]
    pub const fn from_desktop_match(matches: bool) -> Self {
        if matches { Self::Desktop } else { Self::Mobile }
    }

    #[must_use]
    pub const fn is_desktop(self) -> bool {
        matches!(self, Self::Desktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipped() {
        assert_eq!(PanelStatus::Initial.flipped(), PanelStatus::Open);
        assert_eq!(PanelStatus::Open.flipped(), PanelStatus::Closed);
        assert_eq!(PanelStatus::Closed.flipped(), PanelStatus::Open);
    }

    #[test]
    fn test_panel_status_round_trips_through_text() {
        for status in [PanelStatus::Initial, PanelStatus::Open, PanelStatus::Closed] {
            assert_eq!(status.to_string().parse::<PanelStatus>(), Ok(status));
        }
        assert!("ajar".parse::<PanelStatus>().is_err());
    }

    #[test]
    fn test_viewport_from_match() {
        assert_eq!(ViewportClass::from_desktop_match(true), ViewportClass::Desktop);
        assert_eq!(ViewportClass::from_desktop_match(false), ViewportClass::Mobile);
        assert!(!ViewportClass::Mobile.is_desktop());
    }
}
