use crate::payload::ProjectStatus;

pub trait LinkBuilder: Send + Sync {
    fn detail_link(&self, record: &ProjectStatus) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLinkBuilder {
    pub base_url: String,
}

impl DashboardLinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl LinkBuilder for DashboardLinkBuilder {
    fn detail_link(&self, record: &ProjectStatus) -> String {
        format!(
            "{}/tab/build/detail/{}",
            self.base_url.trim_end_matches('/'),
            record.project_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardLinkBuilder, LinkBuilder};
    use crate::payload::ProjectStatus;

    fn record(project: &str) -> ProjectStatus {
        ProjectStatus {
            project_name: project.to_string(),
            css_class_name_for_dashboard: "passed".to_string(),
            css_class_name_considering_last_status: "passed".to_string(),
        }
    }

    #[test]
    fn detail_links_join_without_double_slashes() {
        let builder = DashboardLinkBuilder::new("http://cc.example:8080/dashboard/");
        assert_eq!(
            builder.detail_link(&record("connectfour")),
            "http://cc.example:8080/dashboard/tab/build/detail/connectfour"
        );
    }
}
