use serde_json::Value;
use tracing::{debug, info, warn};

/// Result of a single page request.
#[derive(Debug)]
pub enum PageFetch {
    Records(Vec<Value>),
    /// Upstream answered "no content" for this offset.
    Empty,
    Failed(PageFetchError),
}

/// A page request that did not succeed. Absorbed by the paginator.
#[derive(Debug, thiserror::Error)]
pub enum PageFetchError {
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected page payload: {0}")]
    Payload(String),
}

/// The count request failed, so no page plan can be built.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("count request for {source_name} failed: {detail}")]
    Count {
        source_name: &'static str,
        detail: String,
    },
}

/// A counted, offset-addressed record source.
pub trait PagedSource {
    fn name(&self) -> &'static str;
    fn page_size(&self) -> u64;
    fn fetch_count(&self) -> Result<u64, SourceError>;
    fn fetch_page(&self, offset: u64, page_size: u64) -> PageFetch;
}

/// Round `total` up to the next multiple of `page_size`.
pub fn page_plan_total(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size) * page_size
}

/// Lazy walk over every page of a source, in increasing offset order.
///
/// Failed pages are logged and skipped; the walk never restarts.
pub struct Paginator<'a, S: ?Sized> {
    source: &'a S,
    page_size: u64,
    offset: u64,
    target: u64,
}

impl<'a, S: PagedSource + ?Sized> Paginator<'a, S> {
    pub fn new(source: &'a S) -> Result<Self, SourceError> {
        let page_size = source.page_size();
        let total = source.fetch_count()?;
        let target = page_plan_total(total, page_size);
        info!(
            source = source.name(),
            total,
            planned = target,
            page_size,
            "starting paginated pull"
        );

        Ok(Self {
            source,
            page_size,
            offset: 0,
            target,
        })
    }

    /// Drain every remaining page into one flat record list.
    pub fn collect_records(self) -> Vec<Value> {
        self.flatten().collect()
    }
}

impl<S: PagedSource + ?Sized> Iterator for Paginator<'_, S> {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.offset < self.target {
            let offset = self.offset;
            self.offset += self.page_size;

            debug!(
                source = self.source.name(),
                "requesting records {} to {} of {}",
                offset + 1,
                offset + self.page_size,
                self.target
            );

            match self.source.fetch_page(offset, self.page_size) {
                PageFetch::Records(records) => return Some(records),
                PageFetch::Empty => {
                    debug!(source = self.source.name(), offset, "page returned no content");
                }
                PageFetch::Failed(err) => {
                    warn!(
                        source = self.source.name(),
                        offset,
                        error = %err,
                        "failed to retrieve page, skipping"
                    );
                }
            }
        }

        None
    }
}
