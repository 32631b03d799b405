//! RunEngine — owns the config, word table, stores, and id source, and
//! runs the sequential per-window pipeline. Single-threaded within a
//! run; the only parallelism is inside the pure vectorisation stage.

use std::time::Instant;

use tracing::info;

use newsflow_core::config::NewsflowConfig;
use newsflow_core::errors::NewsflowResult;
use newsflow_core::models::{RunReport, RunWindow};
use newsflow_core::time::compact_time;
use newsflow_core::traits::{IArticleStore, IEventIdSource, IEventStore, SystemIdSource};
use newsflow_clustering::{history, merge, reevaluate, ClusterMode, ClusterStore};
use newsflow_embeddings::{Vectorizer, WordTable};
use newsflow_events::write_events;

use crate::dump;
use crate::log;

/// One engine per deployment; one `run` call per time window.
pub struct RunEngine {
    config: NewsflowConfig,
    word_table: WordTable,
    article_store: Box<dyn IArticleStore>,
    event_store: Box<dyn IEventStore>,
    id_source: Box<dyn IEventIdSource>,
}

impl RunEngine {
    /// Validate the config and load the word table. Both are fatal
    /// before any store I/O.
    pub fn new(
        config: NewsflowConfig,
        article_store: Box<dyn IArticleStore>,
        event_store: Box<dyn IEventStore>,
    ) -> NewsflowResult<Self> {
        config.validate()?;
        let word_table = WordTable::load(&config.embeddings_path, config.dim)?;
        Ok(Self {
            config,
            word_table,
            article_store,
            event_store,
            id_source: Box::new(SystemIdSource),
        })
    }

    /// Assemble an engine from pre-built parts. Tests inject a
    /// deterministic word table and id source through here.
    pub fn with_parts(
        config: NewsflowConfig,
        word_table: WordTable,
        article_store: Box<dyn IArticleStore>,
        event_store: Box<dyn IEventStore>,
        id_source: Box<dyn IEventIdSource>,
    ) -> NewsflowResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            word_table,
            article_store,
            event_store,
            id_source,
        })
    }

    /// Process one time window. With `debug_dump`, cluster memberships
    /// and the cos/cos_std distributions land under `output_path`.
    pub fn run(&self, window: &RunWindow, debug_dump: bool) -> NewsflowResult<RunReport> {
        let started = Instant::now();
        let date = compact_time(&window.start);

        let articles = self
            .article_store
            .query_many_by_time(&window.start, &window.end)?;
        let n_news = articles.len();
        info!(n_news, start = %window.start, end = %window.end, "run started");

        if articles.is_empty() {
            info!("no news in current time span");
            let report = self.report(window, started, n_news, 0, 0);
            log::write_run_log(&self.config.log_path, &date, &report)?;
            return Ok(report);
        }

        let vectorizer = Vectorizer::new(&self.word_table, self.config.short_article_threshold);
        let mut store = ClusterStore::new(self.config.dim);
        for article in &articles {
            store.cache_article(article.clone());
        }

        let vectors = vectorizer.vectorize_batch(&articles);
        let batch = newsflow_clustering::online_clustering(
            &vectors,
            self.config.sim_threshold,
            ClusterMode::Clustering,
            self.id_source.as_ref(),
        );
        info!(clusters = batch.len(), "clustering");

        let events = self
            .event_store
            .query_recent_events_by_time(&window.start)?;
        history::load_history(
            &mut store,
            &events,
            self.article_store.as_ref(),
            &vectorizer,
        )?;

        merge::merge_batch(&mut store, batch, self.config.merge_sim_threshold);

        let observations = reevaluate::reevaluate(
            &mut store,
            self.config.subevent_sim_threshold,
            self.config.cos_std_threshold,
            self.config.merge_sim_threshold,
            self.id_source.as_ref(),
        );

        let summary = write_events(
            &store,
            self.event_store.as_ref(),
            self.id_source.as_ref(),
            &window.start,
            self.config.cos_threshold,
        )?;

        if debug_dump {
            dump::write_debug_dump(&self.config.output_path, &date, &store, &observations)?;
        }

        let n_single_event = store.iter().filter(|(_, c)| c.len() == 1).count();
        let report = self.report(window, started, n_news, n_single_event, store.len());
        log::write_run_log(&self.config.log_path, &date, &report)?;

        info!(
            n_events = report.n_events,
            written = summary.written,
            skipped = summary.skipped,
            cost_seconds = report.cost_seconds,
            "run complete"
        );
        Ok(report)
    }

    fn report(
        &self,
        window: &RunWindow,
        started: Instant,
        n_news: usize,
        n_single_event: usize,
        n_events: usize,
    ) -> RunReport {
        RunReport {
            cost_seconds: started.elapsed().as_secs() as i64,
            start: window.start.clone(),
            end: window.end.clone(),
            clustering_sim: self.config.sim_threshold,
            merge_sim: self.config.merge_sim_threshold,
            subevent_sim: self.config.subevent_sim_threshold,
            cos: self.config.cos_threshold,
            n_news,
            n_single_event,
            n_events,
        }
    }
}
