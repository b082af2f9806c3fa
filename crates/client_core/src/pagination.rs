use shared::protocol::PageMeta;

/// A page/size pair the fetch coordinator should load. Produced only by
/// [`PaginationController`] request methods; this is the narrow event that
/// triggers fetches, deliberately decoupled from list-content changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTarget {
    pub page: u32,
    pub size: u32,
}

/// Owns the pagination state mirrored from the last successfully fetched
/// page. Out-of-range page requests are silent no-ops, matching the
/// bound-check semantics of prev/next navigation.
#[derive(Debug, Clone)]
pub struct PaginationController {
    page: u32,
    size: u32,
    total_pages: u32,
    total_items: u64,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PaginationController {
    pub fn new(size: u32) -> Self {
        Self {
            page: 1,
            size: size.max(1),
            total_pages: 1,
            total_items: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Accepts the request only for `1 <= n <= total_pages`. The returned
    /// target is what the fetch coordinator loads; `page` itself only moves
    /// once a fetch for it succeeds.
    pub fn request_page(&self, n: u32) -> Option<FetchTarget> {
        if n >= 1 && n <= self.total_pages {
            Some(FetchTarget {
                page: n,
                size: self.size,
            })
        } else {
            None
        }
    }

    pub fn request_previous(&self) -> Option<FetchTarget> {
        self.page.checked_sub(1).and_then(|n| self.request_page(n))
    }

    pub fn request_next(&self) -> Option<FetchTarget> {
        self.request_page(self.page + 1)
    }

    /// A size change restarts from page 1: the current page number may not
    /// exist under the new page size.
    pub fn request_size(&self, size: u32) -> Option<FetchTarget> {
        if size == 0 {
            return None;
        }
        Some(FetchTarget { page: 1, size })
    }

    /// The page currently displayed, as a target for re-reads.
    pub fn current_target(&self) -> FetchTarget {
        FetchTarget {
            page: self.page,
            size: self.size,
        }
    }

    /// Wholesale replacement from a successful fetch response. The server
    /// reports at least one page even for an empty collection.
    pub fn apply_page_meta(&mut self, meta: &PageMeta) {
        self.page = meta.page.max(1);
        self.size = meta.size.max(1);
        self.total_pages = meta.total_pages.max(1);
        self.total_items = meta.total_items;
    }

    pub fn snapshot(&self) -> PageMeta {
        PageMeta {
            page: self.page,
            size: self.size,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}
