// One fetch/render cycle: from data files to HTML fragments.

use election_board::notices::{convert_notices, sort_notices_latest_first};
use election_board::render::*;
use election_board::results::{collect_section, parse_combined, parse_contest, SectionView};
use election_board::*;
use futures::future::join_all;
use std::collections::BTreeMap;

use crate::board::config_reader::BoardConfig;
use crate::board::io_common::{failure, DataSource};
use crate::board::*;

pub const NOTICES_PAGE: &str = "notices.html";
pub const HOME_NOTICES: &str = "home-notices.html";
pub const CENTRAL_RESULTS: &str = "central-results.html";
pub const COUNCILLOR_RESULTS: &str = "councillor-results.html";
pub const LAST_UPDATED: &str = "last-updated.html";
pub const STATISTICS: &str = "statistics.html";

/// The rendered fragments of one cycle, by output file name.
pub type Fragments = BTreeMap<&'static str, String>;

/// Reads the notices: the text ledger first, the JSON document if the
/// ledger cannot be fetched.
pub async fn load_notices(
    source: &dyn DataSource,
    config: &BoardConfig,
) -> SourceOutcome<Vec<Notice>> {
    let text_path = config.notices.text_path();
    match source.fetch(text_path).await {
        Ok(bytes) => {
            let conv = convert_notices(&String::from_utf8_lossy(&bytes));
            info!(
                "load_notices: {} notices from {}, {} lines skipped",
                conv.notices.len(),
                text_path,
                conv.skipped.len()
            );
            return Ok(conv.notices);
        }
        Err(f) => {
            info!("load_notices: {}, trying the JSON document", f);
        }
    }
    let json_path = config.notices.json_path();
    let bytes = source.fetch(json_path).await?;
    let doc: NoticeDocument = serde_json::from_slice(&bytes)
        .map_err(|e| failure(source.locate(json_path), FailureKind::Parse, e))?;
    info!(
        "load_notices: {} notices from {}",
        doc.notices.len(),
        json_path
    );
    Ok(doc.notices)
}

/// The full notice list and the compact home list.
pub fn render_notices(loaded: SourceOutcome<Vec<Notice>>, config: &BoardConfig) -> (String, String) {
    let opts = config.notices.view_options();
    match loaded {
        Ok(mut notices) => {
            sort_notices_latest_first(&mut notices);
            (
                render_notice_cards(&notices, &opts),
                render_notice_links(&notices, &opts),
            )
        }
        Err(f) => {
            error!("render_notices: could not load notices: {}", f);
            let panel = render_notices_error();
            (panel.clone(), panel)
        }
    }
}

pub async fn fetch_contest(source: &dyn DataSource, path: &str) -> SourceOutcome<ContestResult> {
    let bytes = source.fetch(path).await?;
    parse_contest(&bytes).map_err(|e| failure(source.locate(path), FailureKind::Parse, e))
}

/// Fetches every document of a section at once. Each outcome lands in its
/// own slot, in the order of `paths`.
pub async fn load_section(
    source: &dyn DataSource,
    paths: &[String],
) -> Vec<SourceOutcome<ContestResult>> {
    join_all(paths.iter().map(|p| fetch_contest(source, p))).await
}

/// Both result sections, as (central panel, councillor).
pub async fn load_results(
    source: &dyn DataSource,
    config: &BoardConfig,
) -> (SectionView, SectionView) {
    let order = config.results.candidate_order();
    match config.results.layout() {
        ResultsLayout::PerCategory => {
            let central_paths = config.results.central_panel_paths();
            let councillor_paths = config.results.councillor_paths();
            let (central, councillor) = futures::join!(
                load_section(source, &central_paths),
                load_section(source, &councillor_paths)
            );
            (
                collect_section(central, order),
                collect_section(councillor, order),
            )
        }
        ResultsLayout::Combined => {
            let path = config.results.combined_file();
            let parsed = match source.fetch(path).await {
                Ok(bytes) => parse_combined(&bytes)
                    .map_err(|e| failure(source.locate(path), FailureKind::Parse, e)),
                Err(f) => Err(f),
            };
            match parsed {
                Ok(res) => (
                    collect_section(res.central_panel.into_iter().map(Ok).collect(), order),
                    collect_section(res.councillor.into_iter().map(Ok).collect(), order),
                ),
                // One document: its failure is the failure of both sections.
                Err(f) => (
                    collect_section(vec![Err(f.clone())], order),
                    collect_section(vec![Err(f)], order),
                ),
            }
        }
    }
}

pub fn render_statistics(config: &BoardConfig) -> String {
    config
        .statistics
        .charts()
        .iter()
        .map(|(id, title, ratio)| render_chart_card(id, title, ratio))
        .collect()
}

/// Runs one cycle. Never fails: whatever could not be loaded is rendered as
/// an error panel in its own fragment.
pub async fn run_cycle(source: &dyn DataSource, config: &BoardConfig) -> Fragments {
    let (notices, (central, councillor)) =
        futures::join!(load_notices(source, config), load_results(source, config));

    let mut fragments = Fragments::new();
    let (cards, links) = render_notices(notices, config);
    fragments.insert(NOTICES_PAGE, cards);
    fragments.insert(HOME_NOTICES, links);

    let root = source.root();
    fragments.insert(CENTRAL_RESULTS, render_section(&central, &root));
    fragments.insert(COUNCILLOR_RESULTS, render_section(&councillor, &root));
    fragments.insert(LAST_UPDATED, render_last_updated(&[&central, &councillor]));
    fragments.insert(STATISTICS, render_statistics(config));
    fragments
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::board::io_dir::DirSource;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serves files from memory; anything not listed gets the given failure.
    pub(crate) struct MemorySource {
        pub files: HashMap<String, SourceOutcome<Vec<u8>>>,
        pub missing: FailureKind,
    }

    impl MemorySource {
        pub fn new(missing: FailureKind) -> MemorySource {
            MemorySource {
                files: HashMap::new(),
                missing,
            }
        }

        pub fn with(mut self, path: &str, body: &str) -> MemorySource {
            self.files
                .insert(path.to_string(), Ok(body.as_bytes().to_vec()));
            self
        }

        pub fn failing(mut self, path: &str, kind: FailureKind) -> MemorySource {
            self.files
                .insert(path.to_string(), Err(failure(path.to_string(), kind, "test")));
            self
        }
    }

    #[async_trait]
    impl DataSource for MemorySource {
        fn locate(&self, path: &str) -> String {
            format!("mem://{}", path)
        }

        async fn fetch(&self, path: &str) -> SourceOutcome<Vec<u8>> {
            self.files
                .get(path)
                .cloned()
                .unwrap_or_else(|| Err(failure(self.locate(path), self.missing, "missing")))
        }

        fn root(&self) -> String {
            "mem://".to_string()
        }
    }

    pub(crate) fn contest_json(key: &str, title: &str) -> String {
        format!(
            r#"{{"{}": "{}", "lastUpdated": "2024-03-02T10:30:00Z",
                "candidates": [{{"name": "Asha", "votes": 1500}}, {{"name": "Bo", "votes": 2500}},
                               {{"name": "NOTA", "votes": 3}}]}}"#,
            key, title
        )
    }

    fn config(json: &str) -> BoardConfig {
        serde_json::from_str(json).unwrap()
    }

    fn five_schools() -> BoardConfig {
        config(
            r#"{"dataRoot": "mem://",
                "results": {"centralPanelFiles": [],
                            "councillorFiles": ["s1.json", "s2.json", "s3.json", "s4.json", "s5.json"]}}"#,
        )
    }

    #[tokio::test]
    async fn failing_source_is_excluded() {
        let mut source = MemorySource::new(FailureKind::Status(404));
        for i in [1, 2, 4, 5] {
            source = source.with(
                &format!("councillors/s{}.json", i),
                &contest_json("school", &format!("School {}", i)),
            );
        }
        let source = source.failing("councillors/s3.json", FailureKind::Status(500));

        let (_, councillor) = load_results(&source, &five_schools()).await;
        match &councillor {
            SectionView::Contests { contests, failures } => {
                let titles: Vec<&str> = contests.iter().map(|c| c.title.as_str()).collect();
                assert_eq!(titles, vec!["School 1", "School 2", "School 4", "School 5"]);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].kind, FailureKind::Status(500));
            }
            other => panic!("unexpected view {:?}", other),
        }
        let html = render_section(&councillor, "mem://");
        assert_eq!(html.matches("school-group").count(), 4);
        assert!(!html.contains("School 3"));
        assert!(!html.contains("error-message"));
    }

    #[tokio::test]
    async fn all_sources_failing_gives_one_panel() {
        let source = MemorySource::new(FailureKind::Unreachable);
        let fragments = run_cycle(&source, &five_schools()).await;
        let html = &fragments[COUNCILLOR_RESULTS];
        assert_eq!(html.matches("error-message").count(), 1);
        assert!(html.contains("python -m http.server"));
        assert!(!html.contains("school-group"));
        // Nothing configured for the central panel is a total failure too.
        assert_eq!(fragments[CENTRAL_RESULTS].matches("error-message").count(), 1);
        assert_eq!(fragments[LAST_UPDATED], "<span id=\"last-updated\">-</span>");
    }

    #[tokio::test]
    async fn missing_local_files_give_generic_panel() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(
            r#"{"dataRoot": ".",
                "results": {"centralPanelFiles": ["president.json"], "councillorFiles": ["soe.json"]}}"#,
        );
        let source = DirSource::new(dir.path().to_path_buf(), Duration::from_secs(5));
        let fragments = run_cycle(&source, &cfg).await;
        let central = &fragments[CENTRAL_RESULTS];
        assert_eq!(central.matches("error-message").count(), 1);
        assert!(!central.contains("must be served over HTTP"));
        assert!(central.contains("president.json is missing"));

        // Without the data directory itself, the server hint is still right.
        let gone = DirSource::new(dir.path().join("gone"), Duration::from_secs(5));
        let fragments = run_cycle(&gone, &cfg).await;
        assert!(fragments[COUNCILLOR_RESULTS].contains("must be served over HTTP"));
    }

    #[tokio::test]
    async fn notices_fall_back_to_json() {
        let doc = r#"{"notices": [
            {"id": "notice1", "title": "Old", "content": "a", "date": "2024-01-01"},
            {"id": "notice2", "title": "New", "content": "b", "date": "2024-02-01", "pdf": "b.pdf"}
        ]}"#;
        let source = MemorySource::new(FailureKind::Status(404)).with("notices.json", doc);
        let cfg = five_schools();
        let notices = load_notices(&source, &cfg).await.unwrap();
        assert_eq!(notices.len(), 2);

        let (cards, links) = render_notices(Ok(notices), &cfg);
        assert!(cards.find("New").unwrap() < cards.find("Old").unwrap());
        assert!(cards.contains("data/notices/b.pdf"));
        assert!(links.starts_with("<a class=\"notice-link-home latest\" href=\"notices.html#notice2\""));
    }

    #[tokio::test]
    async fn ledger_wins_over_json() {
        let source = MemorySource::new(FailureKind::Status(404))
            .with("notices.txt", "2024-01-15|Exam Schedule|Final exams begin next week|schedule.pdf\n")
            .with("notices.json", "{\"notices\": []}");
        let notices = load_notices(&source, &five_schools()).await.unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].pdf.as_deref(), Some("schedule.pdf"));
    }

    #[tokio::test]
    async fn unloadable_notices_render_error_panel() {
        let source = MemorySource::new(FailureKind::Status(404)).with("notices.json", "{oops");
        let cfg = five_schools();
        let loaded = load_notices(&source, &cfg).await;
        assert_eq!(loaded.as_ref().unwrap_err().kind, FailureKind::Parse);
        let (cards, links) = render_notices(loaded, &cfg);
        assert_eq!(cards, links);
        assert!(cards.contains("Unable to load notices"));
    }

    #[tokio::test]
    async fn combined_layout_feeds_both_sections() {
        let cfg = config(
            r#"{"dataRoot": "mem://",
                "results": {"layout": "combined", "candidateOrder": "votesDescending"}}"#,
        );
        let body = r#"{"lastUpdated": "2024-03-02T10:30:00Z",
            "centralPanel": [{"name": "Asha", "votes": 3}, {"name": "Bo", "votes": 30}],
            "councillor": [{"school": "SOE", "candidates": [{"name": "Ravi", "votes": 9}]}]}"#;
        let source = MemorySource::new(FailureKind::Status(404)).with("results.json", body);
        let fragments = run_cycle(&source, &cfg).await;
        let central = &fragments[CENTRAL_RESULTS];
        assert!(central.contains("<h3>Central Panel</h3>"));
        assert!(central.find("Bo").unwrap() < central.find("Asha").unwrap());
        assert!(fragments[COUNCILLOR_RESULTS].contains("<h3>SOE</h3>"));
        assert_eq!(
            fragments[LAST_UPDATED],
            "<span id=\"last-updated\">3/2/2024, 10:30:00 AM</span>"
        );

        let broken = MemorySource::new(FailureKind::Status(503));
        let (central, councillor) = load_results(&broken, &cfg).await;
        assert!(matches!(central, SectionView::Unavailable(_)));
        assert!(matches!(councillor, SectionView::Unavailable(_)));
    }

    #[tokio::test]
    async fn cycle_writes_every_fragment() {
        let source = MemorySource::new(FailureKind::Status(404))
            .with("notices.txt", "")
            .with("councillors/s1.json", &contest_json("school", "School 1"));
        let fragments = run_cycle(&source, &five_schools()).await;
        let names: Vec<&str> = fragments.keys().copied().collect();
        assert_eq!(
            names,
            vec![
                CENTRAL_RESULTS,
                COUNCILLOR_RESULTS,
                HOME_NOTICES,
                LAST_UPDATED,
                NOTICES_PAGE,
                STATISTICS
            ]
        );
        assert!(fragments[NOTICES_PAGE].contains("No notices available at this time."));
        assert!(fragments[COUNCILLOR_RESULTS].contains("2,500"));
        assert_eq!(fragments[STATISTICS].matches("<svg").count(), 3);
    }
}
