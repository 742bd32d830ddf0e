use std::fmt;

use fixed_map::Key;

/// The qualitative answer produced by [`InferenceEngine::infer`](crate::InferenceEngine::infer).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Key, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low Priority",
            Self::Medium => "Medium Priority",
            Self::High => "High Priority",
            Self::Urgent => "Urgent",
        }
    }

    /// Inverse of [`Priority::as_str`]. Matching is exact.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low Priority" => Some(Self::Low),
            "Medium Priority" => Some(Self::Medium),
            "High Priority" => Some(Self::High),
            "Urgent" => Some(Self::Urgent),
            _ => None,
        }
    }

    /// Ordinal used when averaging rule results.
    pub fn score(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Urgent => 3,
        }
    }

    /// Maps a weighted mean score back to a label.
    pub fn from_score(score: f64) -> Self {
        if score >= 2.5 {
            Self::Urgent
        } else if score >= 1.5 {
            Self::High
        } else if score >= 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[test]
fn test_labels_round_trip() {
    for priority in [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent] {
        assert_eq!(Priority::from_label(priority.as_str()), Some(priority));
        assert_eq!(priority.to_string(), priority.as_str());
    }

    assert_eq!(Priority::default(), Priority::Low);
    assert_eq!(Priority::from_label("urgent"), None);
    assert_eq!(Priority::from_label("High"), None);
}

#[test]
fn test_score_thresholds() {
    assert_eq!(Priority::from_score(3.), Priority::Urgent);
    assert_eq!(Priority::from_score(2.5), Priority::Urgent);
    assert_eq!(Priority::from_score(2.49), Priority::High);
    assert_eq!(Priority::from_score(1.5), Priority::High);
    assert_eq!(Priority::from_score(1.), Priority::Medium);
    assert_eq!(Priority::from_score(0.5), Priority::Medium);
    assert_eq!(Priority::from_score(0.49), Priority::Low);
    assert_eq!(Priority::from_score(0.), Priority::Low);
    assert_eq!(Priority::from_score(f64::NAN), Priority::Low);
}
