use crate::board::*;

use election_board::{CandidateOrder, GenderRatio, NoticeViewOptions, ResultsLayout};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "fragments";

pub const DEFAULT_CENTRAL_PANEL_FILES: [&str; 4] = [
    "president.json",
    "vice-president.json",
    "general-secretary.json",
    "joint-secretary.json",
];

pub const DEFAULT_COUNCILLOR_FILES: [&str; 15] = [
    "scns.json",
    "absvme.json",
    "amalgamate.json",
    "cslg.json",
    "saa.json",
    "sbt.json",
    "scis.json",
    "ssis.json",
    "scss.json",
    "ses.json",
    "sis.json",
    "sll-cs.json",
    "soe.json",
    "sps.json",
    "sss.json",
];

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct NoticeSettings {
    #[serde(rename = "textPath")]
    pub text_path: Option<String>,
    #[serde(rename = "jsonPath")]
    pub json_path: Option<String>,
    #[serde(rename = "homeLimit")]
    pub home_limit: Option<usize>,
    #[serde(rename = "attachmentBase")]
    pub attachment_base: Option<String>,
    #[serde(rename = "fullPage")]
    pub full_page: Option<String>,
}

impl NoticeSettings {
    pub fn text_path(&self) -> &str {
        self.text_path.as_deref().unwrap_or("notices.txt")
    }

    pub fn json_path(&self) -> &str {
        self.json_path.as_deref().unwrap_or("notices.json")
    }

    pub fn view_options(&self) -> NoticeViewOptions {
        let defaults = NoticeViewOptions::default();
        NoticeViewOptions {
            // A limit of 0 means no limit, as an absent one does.
            home_limit: match self.home_limit {
                Some(0) => None,
                Some(x) => Some(x),
                None => defaults.home_limit,
            },
            attachment_base: self
                .attachment_base
                .clone()
                .unwrap_or(defaults.attachment_base),
            full_page: self.full_page.clone().unwrap_or(defaults.full_page),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResultsSettings {
    pub layout: Option<ResultsLayout>,
    #[serde(rename = "candidateOrder")]
    pub candidate_order: Option<CandidateOrder>,
    #[serde(rename = "centralPanelDir")]
    pub central_panel_dir: Option<String>,
    #[serde(rename = "centralPanelFiles")]
    pub central_panel_files: Option<Vec<String>>,
    #[serde(rename = "councillorDir")]
    pub councillor_dir: Option<String>,
    #[serde(rename = "councillorFiles")]
    pub councillor_files: Option<Vec<String>>,
    #[serde(rename = "combinedFile")]
    pub combined_file: Option<String>,
}

impl ResultsSettings {
    pub fn layout(&self) -> ResultsLayout {
        self.layout.unwrap_or_default()
    }

    pub fn candidate_order(&self) -> CandidateOrder {
        self.candidate_order.unwrap_or_default()
    }

    pub fn combined_file(&self) -> &str {
        self.combined_file.as_deref().unwrap_or("results.json")
    }

    /// The paths of the central panel documents, relative to the data root.
    pub fn central_panel_paths(&self) -> Vec<String> {
        section_paths(
            self.central_panel_dir.as_deref().unwrap_or("central-panel"),
            &self.central_panel_files,
            &DEFAULT_CENTRAL_PANEL_FILES,
        )
    }

    pub fn councillor_paths(&self) -> Vec<String> {
        section_paths(
            self.councillor_dir.as_deref().unwrap_or("councillors"),
            &self.councillor_files,
            &DEFAULT_COUNCILLOR_FILES,
        )
    }
}

fn section_paths(dir: &str, files: &Option<Vec<String>>, defaults: &[&str]) -> Vec<String> {
    let names: Vec<String> = match files {
        Some(fs) => fs.clone(),
        None => defaults.iter().map(|s| s.to_string()).collect(),
    };
    let dir = dir.trim_end_matches('/');
    names
        .into_iter()
        .map(|name| {
            if dir.is_empty() {
                name
            } else {
                format!("{}/{}", dir, name)
            }
        })
        .collect()
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatisticsSettings {
    #[serde(rename = "centralPanel")]
    pub central_panel: Option<GenderRatio>,
    pub councillor: Option<GenderRatio>,
    pub voters: Option<GenderRatio>,
}

impl StatisticsSettings {
    /// The charts in page order: (element id, heading, ratio).
    pub fn charts(&self) -> Vec<(&'static str, &'static str, GenderRatio)> {
        vec![
            (
                "central-panel-chart",
                "Central Panel Candidates",
                self.central_panel.unwrap_or_default(),
            ),
            (
                "councillor-chart",
                "Councillor Candidates",
                self.councillor.unwrap_or_default(),
            ),
            ("voters-chart", "Voters", self.voters.unwrap_or_default()),
        ]
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "dataRoot")]
    pub data_root: String,
    #[serde(rename = "refreshIntervalSecs")]
    pub refresh_interval_secs: Option<u64>,
    #[serde(rename = "requestTimeoutSecs")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub notices: NoticeSettings,
    #[serde(default)]
    pub results: ResultsSettings,
    #[serde(default)]
    pub statistics: StatisticsSettings,
}

impl BoardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.unwrap_or(DEFAULT_REFRESH_SECS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.output_settings
            .as_ref()
            .and_then(|o| o.output_directory.as_deref())
    }

    /// Checks the options that would otherwise fail at runtime.
    pub fn validate(&self) -> BoardResult<()> {
        if self.refresh_interval_secs == Some(0) {
            whatever!("refreshIntervalSecs must be at least 1");
        }
        if self.request_timeout_secs == Some(0) {
            whatever!("requestTimeoutSecs must be at least 1");
        }
        if self.results.layout() == ResultsLayout::PerCategory
            && self.results.central_panel_paths().is_empty()
            && self.results.councillor_paths().is_empty()
        {
            whatever!("no result files configured");
        }
        for (id, _, ratio) in self.statistics.charts() {
            if (ratio.male + ratio.female - 100.0).abs() > 1e-9 {
                warn!(
                    "validate: chart {} does not add up to 100: {:?}",
                    id, ratio
                );
            }
        }
        Ok(())
    }
}

/// Where the data files live.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DataRoot {
    Http(Url),
    Dir(PathBuf),
}

impl DataRoot {
    /// Reads the `dataRoot` option. Relative directories are taken from `base_dir`.
    pub fn parse(raw: &str, base_dir: &Path) -> BoardResult<DataRoot> {
        let lower = raw.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            // Without the trailing slash, joining would replace the last segment.
            let with_slash = if raw.ends_with('/') {
                raw.to_string()
            } else {
                format!("{}/", raw)
            };
            let url = Url::parse(&with_slash).context(InvalidDataRootSnafu { root: raw })?;
            Ok(DataRoot::Http(url))
        } else if lower.starts_with("file://") {
            let url = Url::parse(raw).context(InvalidDataRootSnafu { root: raw })?;
            match url.to_file_path() {
                Ok(p) => Ok(DataRoot::Dir(p)),
                Err(_) => whatever!("dataRoot {:?} is not a local path", raw),
            }
        } else {
            Ok(DataRoot::Dir(base_dir.join(raw)))
        }
    }

    pub fn display(&self) -> String {
        match self {
            DataRoot::Http(url) => url.to_string(),
            DataRoot::Dir(p) => p.display().to_string(),
        }
    }
}

pub fn read_config(path: &str) -> BoardResult<BoardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read config: {:?}", contents);
    let config: BoardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: BoardConfig =
            serde_json::from_str(r#"{"dataRoot": "http://localhost:8000/data"}"#).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.output_directory(), None);
        assert_eq!(config.results.layout(), ResultsLayout::PerCategory);
        assert_eq!(config.results.candidate_order(), CandidateOrder::Source);
        assert_eq!(config.results.central_panel_paths()[0], "central-panel/president.json");
        assert_eq!(config.results.councillor_paths().len(), 15);
        assert_eq!(config.notices.text_path(), "notices.txt");
        assert_eq!(config.notices.view_options(), NoticeViewOptions::default());
        assert_eq!(config.statistics.charts()[2].2, GenderRatio::EVEN);
    }

    #[test]
    fn full_config_is_read() {
        let config: BoardConfig = serde_json::from_str(
            r#"{
                "outputSettings": {"outputDirectory": "public/fragments"},
                "dataRoot": "data",
                "refreshIntervalSecs": 30,
                "notices": {"homeLimit": 0, "attachmentBase": "files/"},
                "results": {"layout": "combined", "candidateOrder": "votesDescending",
                            "councillorDir": "", "councillorFiles": ["soe.json"]},
                "statistics": {"voters": {"male": 40, "female": 60}}
            }"#,
        )
        .unwrap();
        assert_eq!(config.output_directory(), Some("public/fragments"));
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.notices.view_options().home_limit, None);
        assert_eq!(config.notices.view_options().attachment_base, "files/");
        assert_eq!(config.results.layout(), ResultsLayout::Combined);
        assert_eq!(
            config.results.candidate_order(),
            CandidateOrder::VotesDescending
        );
        assert_eq!(config.results.councillor_paths(), vec!["soe.json"]);
        assert_eq!(
            config.statistics.charts()[2].2,
            GenderRatio {
                male: 40.0,
                female: 60.0
            }
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config: BoardConfig =
            serde_json::from_str(r#"{"dataRoot": "data", "refreshIntervalSecs": 0}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn data_root_forms() {
        let base = Path::new("/srv/site");
        match DataRoot::parse("http://localhost:8000/data", base).unwrap() {
            DataRoot::Http(url) => assert_eq!(url.as_str(), "http://localhost:8000/data/"),
            other => panic!("unexpected root {:?}", other),
        }
        assert_eq!(
            DataRoot::parse("data", base).unwrap(),
            DataRoot::Dir(PathBuf::from("/srv/site/data"))
        );
        assert_eq!(
            DataRoot::parse("file:///var/www/data", base).unwrap(),
            DataRoot::Dir(PathBuf::from("/var/www/data"))
        );
        assert!(DataRoot::parse("http://exa mple.com", base).is_err());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        fs::write(&path, r#"{"dataRoot": "data"}"#).unwrap();
        let config = read_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.data_root, "data");

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_config(missing.to_str().unwrap()),
            Err(BoardError::OpeningJson { .. })
        ));
        fs::write(&path, "{").unwrap();
        assert!(matches!(
            read_config(path.to_str().unwrap()),
            Err(BoardError::ParsingJson { .. })
        ));
    }
}
