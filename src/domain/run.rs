use serde::{Deserialize, Serialize};

use crate::configuration::ScraperSettings;

/// Input document for the scraping actor. Every download toggle stays off.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInput {
    #[serde(rename = "postURLs")]
    pub post_urls: Vec<String>,
    pub results_per_page: u32,
    pub proxy_country_code: String,
    pub exclude_pinned_posts: bool,
    pub scrape_related_videos: bool,
    pub should_download_videos: bool,
    pub should_download_covers: bool,
    pub should_download_subtitles: bool,
    pub should_download_slideshow_images: bool,
    pub should_download_avatars: bool,
    pub should_download_music_covers: bool,
}

impl RunInput {
    pub fn new(post_urls: Vec<String>, settings: &ScraperSettings) -> Self {
        RunInput {
            post_urls,
            results_per_page: settings.results_per_page,
            proxy_country_code: settings.proxy_country_code.clone(),
            exclude_pinned_posts: false,
            scrape_related_videos: false,
            should_download_videos: false,
            should_download_covers: false,
            should_download_subtitles: false,
            should_download_slideshow_images: false,
            should_download_avatars: false,
            should_download_music_covers: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    #[serde(alias = "TIMED_OUT")]
    TimedOut,
    Aborting,
    Aborted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::TimedOut | RunStatus::Aborted
        )
    }

    pub fn is_failure(self) -> bool {
        self.is_terminal() && self != RunStatus::Succeeded
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run descriptor as reported by the actor service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInfo {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn run_input_uses_actor_field_names() {
        let input = RunInput::new(
            vec!["https://www.tiktok.com/@a/video/1".to_string()],
            &ScraperSettings::default(),
        );
        let value = serde_json::to_value(&input).unwrap();

        assert_eq!(
            value,
            json!({
                "postURLs": ["https://www.tiktok.com/@a/video/1"],
                "resultsPerPage": 100,
                "proxyCountryCode": "ID",
                "excludePinnedPosts": false,
                "scrapeRelatedVideos": false,
                "shouldDownloadVideos": false,
                "shouldDownloadCovers": false,
                "shouldDownloadSubtitles": false,
                "shouldDownloadSlideshowImages": false,
                "shouldDownloadAvatars": false,
                "shouldDownloadMusicCovers": false,
            })
        );
    }

    #[test]
    fn status_parses_service_vocabulary() {
        let parse = |s: &str| serde_json::from_value::<RunStatus>(json!(s)).unwrap();

        assert_eq!(parse("READY"), RunStatus::Ready);
        assert_eq!(parse("RUNNING"), RunStatus::Running);
        assert_eq!(parse("SUCCEEDED"), RunStatus::Succeeded);
        assert_eq!(parse("FAILED"), RunStatus::Failed);
        assert_eq!(parse("TIMING-OUT"), RunStatus::TimingOut);
        assert_eq!(parse("TIMED-OUT"), RunStatus::TimedOut);
        assert_eq!(parse("TIMED_OUT"), RunStatus::TimedOut);
        assert_eq!(parse("ABORTED"), RunStatus::Aborted);
        assert_eq!(parse("SOMETHING-NEW"), RunStatus::Unknown);
    }

    #[test]
    fn only_finished_states_are_terminal() {
        assert!(RunStatus::Succeeded.is_terminal());
        assert!(!RunStatus::Succeeded.is_failure());
        assert!(RunStatus::Failed.is_failure());
        assert!(RunStatus::TimedOut.is_failure());
        assert!(RunStatus::Aborted.is_failure());
        for status in [
            RunStatus::Ready,
            RunStatus::Running,
            RunStatus::TimingOut,
            RunStatus::Aborting,
            RunStatus::Unknown,
        ] {
            assert!(!status.is_terminal(), "{status} should not be terminal");
        }
    }

    #[test]
    fn run_info_reads_dataset_id() {
        let info: RunInfo = serde_json::from_value(json!({
            "id": "run-1",
            "actId": "act",
            "status": "SUCCEEDED",
            "defaultDatasetId": "ds-9",
        }))
        .unwrap();

        assert_eq!(info.id, "run-1");
        assert_eq!(info.status, RunStatus::Succeeded);
        assert_eq!(info.default_dataset_id.as_deref(), Some("ds-9"));
    }
}
