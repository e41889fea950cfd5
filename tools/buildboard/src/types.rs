use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Passed,
    Failed,
    Building,
    BuildingPassed,
    BuildingFailed,
    Inactive,
    Queued,
    Paused,
    Unknown,
}

impl StatusClass {
    pub fn parse_css(value: &str) -> Self {
        match value {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "building" => Self::Building,
            "building_passed" => Self::BuildingPassed,
            "building_failed" => Self::BuildingFailed,
            "inactive" => Self::Inactive,
            "queued" => Self::Queued,
            "paused" => Self::Paused,
            _ => Self::Unknown,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Building => "building",
            Self::BuildingPassed => "building_passed",
            Self::BuildingFailed => "building_failed",
            Self::Inactive => "inactive",
            Self::Queued => "queued",
            Self::Paused => "paused",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_building(self) -> bool {
        matches!(self, Self::Building | Self::BuildingPassed | Self::BuildingFailed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerState {
    #[default]
    Hidden,
    Shown,
}

impl BannerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Shown => "shown",
        }
    }
}

pub const BAR_SUFFIX: &str = "_bar";
pub const LAST_STATUS_SUFFIX: &str = "_last_status";
pub const BAR_LINK_SUFFIX: &str = "_bar_link";
pub const FORCE_BUILD_SUFFIX: &str = "_forcebuild";
pub const PROFILE_SUFFIX: &str = "_profile";

pub fn bar_element_id(project: &str) -> String {
    format!("{project}{BAR_SUFFIX}")
}

pub fn last_status_element_id(project: &str) -> String {
    format!("{project}{LAST_STATUS_SUFFIX}")
}

pub fn bar_link_element_id(project: &str) -> String {
    format!("{project}{BAR_LINK_SUFFIX}")
}

pub fn force_build_element_id(project: &str) -> String {
    format!("{project}{FORCE_BUILD_SUFFIX}")
}

pub fn profile_element_id(project: &str) -> String {
    format!("{project}{PROFILE_SUFFIX}")
}

pub fn project_from_profile_id(element_id: &str) -> Option<&str> {
    element_id.strip_suffix(PROFILE_SUFFIX)
}

pub fn project_from_force_build_id(element_id: &str) -> Option<&str> {
    element_id.strip_suffix(FORCE_BUILD_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_class_css_round_trip_is_stable() {
        for class in [
            StatusClass::Passed,
            StatusClass::Failed,
            StatusClass::Building,
            StatusClass::BuildingPassed,
            StatusClass::BuildingFailed,
            StatusClass::Inactive,
            StatusClass::Queued,
            StatusClass::Paused,
        ] {
            assert_eq!(StatusClass::parse_css(class.as_css()), class);
        }
        assert_eq!(StatusClass::parse_css("lava_lamp"), StatusClass::Unknown);
    }

    #[test]
    fn building_membership_covers_last_status_composites() {
        assert!(StatusClass::Building.is_building());
        assert!(StatusClass::BuildingPassed.is_building());
        assert!(StatusClass::BuildingFailed.is_building());
        assert!(!StatusClass::Passed.is_building());
        assert!(!StatusClass::Unknown.is_building());
    }

    #[test]
    fn element_ids_follow_the_suffix_convention() {
        assert_eq!(bar_element_id("cc"), "cc_bar");
        assert_eq!(last_status_element_id("cc"), "cc_last_status");
        assert_eq!(bar_link_element_id("cc"), "cc_bar_link");
        assert_eq!(force_build_element_id("cc"), "cc_forcebuild");
        assert_eq!(profile_element_id("cc"), "cc_profile");
    }

    #[test]
    fn suffix_stripping_recovers_the_project_name() {
        assert_eq!(project_from_profile_id("bar_profile"), Some("bar"));
        assert_eq!(project_from_force_build_id("bar_forcebuild"), Some("bar"));
        assert_eq!(project_from_profile_id("bar_forcebuild"), None);
        assert_eq!(project_from_force_build_id("bar"), None);
    }
}
