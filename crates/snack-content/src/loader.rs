//! Fetch-and-dispatch loader.
//!
//! All resources are fetched concurrently. Each payload is applied to the page
//! as soon as its fetch settles; a failing resource is logged and recorded
//! without affecting the others. The completion callback runs exactly once,
//! after every fetch attempt has settled.

use futures::stream::{FuturesUnordered, StreamExt};

use crate::descriptor::{check_unique_kinds, ContentDescriptor, ContentKind};
use crate::dom::Page;
use crate::error::ContentError;
use crate::payload::Payload;
use crate::source::ContentSource;

/// A resource whose payload was applied to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedResource {
    /// Resource path of the descriptor
    pub resource_path: String,

    /// Kind that applied it
    pub kind: ContentKind,
}

/// A resource that could not be applied.
#[derive(Debug)]
pub struct LoadFailure {
    /// Resource path of the failing descriptor
    pub resource_path: String,

    /// Kind of the failing descriptor
    pub kind: ContentKind,

    /// What went wrong
    pub error: ContentError,
}

/// Outcome of a load cycle.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Resources applied and their kinds, in the order they settled
    pub applied: Vec<AppliedResource>,

    /// Resources that failed to fetch or decode
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Kinds that were applied, in settle order.
    pub fn applied_kinds(&self) -> Vec<ContentKind> {
        self.applied.iter().map(|a| a.kind).collect()
    }

    /// Whether every resource was applied.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads a fixed set of content descriptors from a source.
#[derive(Debug, Clone)]
pub struct Loader<S> {
    source: S,
    descriptors: Vec<ContentDescriptor>,
}

impl<S: ContentSource> Loader<S> {
    /// Create a loader over a descriptor list.
    ///
    /// Fails if two descriptors share a kind.
    pub fn new(source: S, descriptors: Vec<ContentDescriptor>) -> Result<Self, ContentError> {
        check_unique_kinds(&descriptors)?;
        Ok(Self {
            source,
            descriptors,
        })
    }

    pub fn descriptors(&self) -> &[ContentDescriptor] {
        &self.descriptors
    }

    /// Fetch every resource, apply each payload to `page`, then call `on_complete`.
    pub async fn load_site_assets<F>(&self, page: &mut Page, on_complete: F) -> LoadReport
    where
        F: FnOnce(),
    {
        let mut report = LoadReport::default();

        let mut pending: FuturesUnordered<_> = self
            .descriptors
            .iter()
            .map(|descriptor| async move {
                let result = self.fetch_payload(descriptor).await;
                (descriptor, result)
            })
            .collect();

        while let Some((descriptor, result)) = pending.next().await {
            match result {
                Ok(payload) => {
                    tracing::debug!(
                        "Applying {} content from {}",
                        descriptor.kind(),
                        descriptor.resource_path()
                    );
                    payload.apply(page);
                    report.applied.push(AppliedResource {
                        resource_path: descriptor.resource_path().to_string(),
                        kind: descriptor.kind(),
                    });
                }
                Err(error) => {
                    tracing::warn!("Failed to load {}: {}", descriptor.resource_path(), error);
                    report.failures.push(LoadFailure {
                        resource_path: descriptor.resource_path().to_string(),
                        kind: descriptor.kind(),
                        error,
                    });
                }
            }
        }

        on_complete();

        report
    }

    /// Fetch, parse and decode a single resource.
    async fn fetch_payload(&self, descriptor: &ContentDescriptor) -> Result<Payload, ContentError> {
        let path = descriptor.resource_path();

        let bytes = self
            .source
            .fetch(path)
            .await
            .map_err(|source| ContentError::Fetch {
                path: path.to_string(),
                source,
            })?;

        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| ContentError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        descriptor.kind().decode(value)
    }
}

/// Load `descriptors` from `source` into `page` in one call.
pub async fn load_site_assets<S, F>(
    source: S,
    descriptors: Vec<ContentDescriptor>,
    page: &mut Page,
    on_complete: F,
) -> Result<LoadReport, ContentError>
where
    S: ContentSource,
    F: FnOnce(),
{
    let loader = Loader::new(source, descriptors)?;
    Ok(loader.load_site_assets(page, on_complete).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::descriptor::default_descriptors;
    use crate::source::{MemorySource, SourceError};
    use pretty_assertions::assert_eq;

    const HERO: &str = r#"{"title": "A", "subtitle": "B"}"#;
    const SOCIAL: &str =
        r#"{"links": [{"url": "https://x", "platform": "X", "icon": "icon-x"}]}"#;

    fn site_source() -> MemorySource {
        MemorySource::new()
            .with("hero.json", HERO)
            .with("social.json", SOCIAL)
    }

    /// Delays each fetch so later descriptors settle first.
    struct SlowSource {
        inner: MemorySource,
        delays: Vec<(&'static str, u64)>,
        settled: Arc<AtomicUsize>,
    }

    impl ContentSource for SlowSource {
        fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send {
            let delay = self
                .delays
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(_, ms)| *ms)
                .unwrap_or(0);
            let path = path.to_string();
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                let result = self.inner.fetch(&path).await;
                self.settled.fetch_add(1, Ordering::SeqCst);
                result
            }
        }
    }

    #[tokio::test]
    async fn applies_every_descriptor() {
        let mut page = Page::default();

        let report = load_site_assets(site_source(), default_descriptors(), &mut page, || {})
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.applied.len(), 2);
        assert_eq!(page.hero_title().text(), "A");
        assert_eq!(page.hero_subtitle().text(), "B");
        assert_eq!(page.social_links().children().len(), 1);
    }

    #[tokio::test]
    async fn completion_runs_once_after_all_fetches_settle() {
        let settled = Arc::new(AtomicUsize::new(0));
        let source = SlowSource {
            inner: site_source(),
            delays: vec![("hero.json", 30), ("social.json", 5)],
            settled: Arc::clone(&settled),
        };

        let calls = AtomicUsize::new(0);
        let mut seen_at_completion = 0;
        let mut page = Page::default();

        Loader::new(source, default_descriptors())
            .unwrap()
            .load_site_assets(&mut page, || {
                calls.fetch_add(1, Ordering::SeqCst);
                seen_at_completion = settled.load(Ordering::SeqCst);
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(seen_at_completion, 2);
    }

    #[tokio::test]
    async fn missing_resource_does_not_block_others() {
        let source = MemorySource::new().with("social.json", SOCIAL);
        let calls = AtomicUsize::new(0);
        let mut page = Page::default();

        let report = load_site_assets(source, default_descriptors(), &mut page, || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.applied_kinds(), vec![ContentKind::Social]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].resource_path, "hero.json");
        assert!(matches!(
            report.failures[0].error,
            ContentError::Fetch {
                source: SourceError::NotFound(_),
                ..
            }
        ));
        assert_eq!(page.hero_title().text(), Page::default().hero_title().text());
        assert_eq!(page.social_links().children().len(), 1);
    }

    #[tokio::test]
    async fn invalid_json_does_not_block_others() {
        let source = MemorySource::new()
            .with("hero.json", "{ not json")
            .with("social.json", SOCIAL);
        let mut page = Page::default();

        let report = load_site_assets(source, default_descriptors(), &mut page, || {})
            .await
            .unwrap();

        assert_eq!(
            report.applied,
            vec![AppliedResource {
                resource_path: "social.json".to_string(),
                kind: ContentKind::Social,
            }]
        );
        assert!(matches!(
            report.failures[0].error,
            ContentError::Parse { .. }
        ));
        assert_eq!(page.social_links().children().len(), 1);
    }

    #[tokio::test]
    async fn shape_mismatch_is_reported_as_failure() {
        let source = MemorySource::new().with("hero.json", r#"{"title": 42}"#);
        let descriptors = vec![ContentDescriptor::new("hero.json", ContentKind::Hero).unwrap()];
        let mut page = Page::default();

        let report = load_site_assets(source, descriptors, &mut page, || {})
            .await
            .unwrap();

        assert!(matches!(
            report.failures[0].error,
            ContentError::Shape { kind: "hero", .. }
        ));
        assert_eq!(page, Page::default());
    }

    #[tokio::test]
    async fn empty_descriptor_list_still_completes() {
        let calls = AtomicUsize::new(0);
        let mut page = Page::default();

        let report = load_site_assets(MemorySource::new(), vec![], &mut page, || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(report.applied.is_empty());
    }

    #[tokio::test]
    async fn settle_order_does_not_change_final_page() {
        let hero_first = SlowSource {
            inner: site_source(),
            delays: vec![("hero.json", 0), ("social.json", 20)],
            settled: Arc::default(),
        };
        let social_first = SlowSource {
            inner: site_source(),
            delays: vec![("hero.json", 20), ("social.json", 0)],
            settled: Arc::default(),
        };

        let mut a = Page::default();
        let report_a = load_site_assets(hero_first, default_descriptors(), &mut a, || {})
            .await
            .unwrap();
        let mut b = Page::default();
        let report_b = load_site_assets(social_first, default_descriptors(), &mut b, || {})
            .await
            .unwrap();

        assert_eq!(
            report_a.applied_kinds(),
            vec![ContentKind::Hero, ContentKind::Social]
        );
        assert_eq!(
            report_b.applied_kinds(),
            vec![ContentKind::Social, ContentKind::Hero]
        );
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn two_descriptors_of_one_kind_are_rejected() {
        let source = MemorySource::new()
            .with("a.json", r#"{"title": "A"}"#)
            .with("b.json", r#"{"title": "B"}"#);
        let descriptors = vec![
            ContentDescriptor::new("a.json", ContentKind::Hero).unwrap(),
            ContentDescriptor::new("b.json", ContentKind::Hero).unwrap(),
        ];
        let calls = AtomicUsize::new(0);
        let mut page = Page::default();

        let result = load_site_assets(source, descriptors, &mut page, || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        assert!(matches!(
            result,
            Err(ContentError::DuplicateKind { kind: "hero", .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(page, Page::default());
    }
}
