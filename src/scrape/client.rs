//! Conjugation scraper
//!
//! Looks every verb up on the conjugation site, one request at a time with
//! a short random pause in between, and rewrites the verb form table after
//! each verb so an interrupted run keeps what it already collected. A failed
//! request stops the run unless `continue_on_error` is set.

use crate::config::ScrapeConfig;
use crate::error::{ParlaMintError, Result};
use crate::progress::ProgressReporter;
use crate::scrape::parse_conjugation_page;
use crate::verbs::{load_verbs, VerbFormTable};
use rand::Rng;
use std::time::{Duration, Instant};

/// Scrape run result
#[derive(Debug, Default)]
pub struct ScrapeSummary {
    /// Distinct verbs in the input
    pub verbs_total: usize,
    /// Verbs with at least one form
    pub verbs_scraped: usize,
    /// Verbs the site does not know, or without any form
    pub not_found: Vec<String>,
    /// Verbs whose request failed, with the error
    pub failures: Vec<(String, String)>,
    /// Rows in the output table
    pub rows: usize,
    /// Total duration
    pub duration: Duration,
}

impl ScrapeSummary {
    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Scrape Summary ===");
        println!("Verbs:           {}", self.verbs_total);
        println!("Scraped:         {}", self.verbs_scraped);
        println!("Not found:       {}", self.not_found.len());
        println!("Rows:            {}", self.rows);
        println!(
            "Duration:        {}",
            humantime::format_duration(Duration::from_secs(self.duration.as_secs()))
        );

        if !self.failures.is_empty() {
            println!("\nFailures: {}", self.failures.len());
            for (verb, error) in &self.failures {
                println!("  {} - {}", verb, error);
            }
        }
    }
}

/// Conjugation site scraper
pub struct Scraper {
    config: ScrapeConfig,
    client: reqwest::Client,
    progress: Option<ProgressReporter>,
}

impl Scraper {
    /// Create a new scraper
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("parlamint/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ParlaMintError::http(&config.base_url, e.to_string()))?;

        Ok(Self {
            config,
            client,
            progress: None,
        })
    }

    /// Set progress reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Conjugation page address of a verb
    pub fn verb_url(&self, verb: &str) -> String {
        format!("{}/romana.php?conjugare={}", self.config.base_url, verb)
    }

    /// Download the conjugation page of a verb
    pub async fn fetch(&self, verb: &str) -> Result<String> {
        let url = self.verb_url(verb);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ParlaMintError::http(&url, e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| ParlaMintError::http(&url, e.to_string()))
    }

    /// Scrape all verbs of the input file
    pub async fn run(&self) -> Result<ScrapeSummary> {
        let start = Instant::now();
        let verbs = load_verbs(&self.config.verbs_file, self.config.delimiter)?;
        tracing::info!("Loaded {} distinct entries from verbs file.", verbs.len());

        let mut summary = ScrapeSummary {
            verbs_total: verbs.len(),
            ..Default::default()
        };
        let mut table = VerbFormTable::new();

        if let Some(progress) = &self.progress {
            progress.set_total(verbs.len() as u64);
        }

        tracing::info!("Start scraping verb forms.");
        for verb in &verbs {
            tracing::info!("Scraping forms for {}.", verb);
            if let Some(progress) = &self.progress {
                progress.set_current(verb);
            }

            let outcome = self.scrape_verb(verb, &mut table).await;
            if let Some(progress) = &self.progress {
                progress.increment(1);
            }

            match outcome {
                Ok(true) => summary.verbs_scraped += 1,
                Ok(false) => {
                    tracing::info!("No data found for {}.", verb);
                    summary.not_found.push(verb.clone());
                    continue;
                }
                Err(e) if self.config.continue_on_error && e.is_recoverable() => {
                    tracing::warn!("Skipping {}: {}", verb, e);
                    summary.failures.push((verb.clone(), e.to_string()));
                    continue;
                }
                Err(e) => {
                    if let Some(progress) = &self.progress {
                        progress.finish_error("Scraping failed");
                    }
                    return Err(e);
                }
            }

            self.pause().await;
        }

        if let Some(progress) = &self.progress {
            progress.finish_success(&format!("Scraped {} verbs", summary.verbs_scraped));
        }
        tracing::info!("That's all folks!");

        summary.rows = table.len();
        summary.duration = start.elapsed();
        Ok(summary)
    }

    /// Fetch, parse and store one verb; `false` when the site has no forms
    async fn scrape_verb(&self, verb: &str, table: &mut VerbFormTable) -> Result<bool> {
        let page = self.fetch(verb).await?;
        let forms = match parse_conjugation_page(&page) {
            Some(forms) if !forms.is_empty() => forms,
            _ => return Ok(false),
        };

        table.append(&forms);
        tracing::info!("Saving results to {}.", self.config.output_file.display());
        table.to_csv(&self.config.output_file)?;
        Ok(true)
    }

    async fn pause(&self) {
        let secs = rand::thread_rng().gen_range(0..=self.config.max_delay_secs);
        tracing::debug!("Sleeping for {} seconds.", secs);
        if secs > 0 {
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const MERGE: &str = r#"<html><body>
        <div class="box_conj"><b>Infinitiv</b><div class="cont_conj">a merge</div></div>
        <div class="box_conj"><b>Viitor</b>
            <div class="cont_conj">eu voi merge</div>
            <div class="cont_conj">tu vei merge</div>
        </div></body></html>"#;

    const NOT_FOUND: &str = "<html><body>Verbul nu a fost găsit.</body></html>";

    /// Serve canned conjugation pages on a local port
    async fn serve_pages() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let mut request = Vec::new();
                    loop {
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    let request = String::from_utf8_lossy(&request);
                    let (status, body) = if request.contains("conjugare=merge ") {
                        ("200 OK", MERGE)
                    } else if request.contains("conjugare=eroare ") {
                        ("500 Internal Server Error", "")
                    } else {
                        ("200 OK", NOT_FOUND)
                    };
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    fn config(dir: &Path, base_url: String) -> ScrapeConfig {
        let verbs_file = dir.join("dex-entries.csv");
        std::fs::write(&verbs_file, "lexem;tip\nmerge;verb\nzzz;verb\neroare;verb\nmerge;verb\n")
            .unwrap();
        ScrapeConfig {
            verbs_file,
            delimiter: b';',
            output_file: dir.join("verb-forms.csv"),
            base_url,
            max_delay_secs: 0,
            continue_on_error: true,
        }
    }

    #[test]
    fn test_verb_url() {
        let config = ScrapeConfig {
            base_url: "https://conjugare.ro".into(),
            ..Default::default()
        };
        let scraper = Scraper::new(config).unwrap();
        assert_eq!(
            scraper.verb_url("merge"),
            "https://conjugare.ro/romana.php?conjugare=merge"
        );
    }

    #[tokio::test]
    async fn test_run_against_local_site() {
        let dir = tempfile::tempdir().unwrap();
        let base_url = serve_pages().await;
        let config = config(dir.path(), base_url);
        let output = config.output_file.clone();

        let summary = Scraper::new(config).unwrap().run().await.unwrap();
        assert_eq!(summary.verbs_total, 3);
        assert_eq!(summary.verbs_scraped, 1);
        assert_eq!(summary.not_found, vec!["zzz"]);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].0, "eroare");
        assert_eq!(summary.rows, 2);

        let table = VerbFormTable::from_csv(&output).unwrap();
        assert_eq!(table.future_forms().unwrap(), vec!["voi merge", "vei merge"]);
        assert_eq!(table.infinitive_forms().unwrap(), vec!["a merge"]);
    }

    #[tokio::test]
    async fn test_failed_request_aborts_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let base_url = serve_pages().await;
        let config = ScrapeConfig {
            continue_on_error: false,
            ..config(dir.path(), base_url)
        };
        let output = config.output_file.clone();

        let err = Scraper::new(config).unwrap().run().await.unwrap_err();
        assert!(matches!(
            err,
            ParlaMintError::Http { ref url, .. } if url.ends_with("conjugare=eroare")
        ));

        // verbs before the failure are already saved
        let table = VerbFormTable::from_csv(&output).unwrap();
        assert_eq!(table.infinitive_forms().unwrap(), vec!["a merge"]);
    }

    #[tokio::test]
    async fn test_missing_verbs_file() {
        let config = ScrapeConfig {
            verbs_file: "/nonexistent/dex-entries.csv".into(),
            ..Default::default()
        };
        let err = Scraper::new(config).unwrap().run().await.unwrap_err();
        assert!(matches!(err, ParlaMintError::NotFound(_)));
    }
}
