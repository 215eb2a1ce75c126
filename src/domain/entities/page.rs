pub const DEFAULT_PAGE_SIZE: u32 = 15;
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [15, 25, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    First,
    Previous,
    Next,
    Last,
}

/// Everything the navigation bar needs, derived from a `PageState` and the
/// total row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
    pub start: u64,
    pub end: u64,
}

impl PageState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self, total_count: u64) -> u32 {
        total_pages(total_count, self.page_size)
    }

    pub fn go_to(&mut self, page: u32, total_count: u64) {
        self.page = page.clamp(1, self.total_pages(total_count));
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn window(&self, total_count: u64) -> PageWindow {
        let page_size = u64::from(self.page_size);
        let page = u64::from(self.page);
        PageWindow {
            page: self.page,
            page_size: self.page_size,
            total_count,
            total_pages: self.total_pages(total_count),
            start: (page - 1) * page_size + 1,
            end: (page * page_size).min(total_count),
        }
    }

    /// Zero-based row offset of the first row on the current page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total_count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

impl PageWindow {
    pub fn is_enabled(&self, target: NavTarget) -> bool {
        match target {
            NavTarget::First | NavTarget::Previous => self.page > 1,
            NavTarget::Next | NavTarget::Last => self.page < self.total_pages,
        }
    }

    /// The page a control would navigate to, or `None` when the control is
    /// disabled.
    pub fn resolve(&self, target: NavTarget) -> Option<u32> {
        if !self.is_enabled(target) {
            return None;
        }
        Some(match target {
            NavTarget::First => 1,
            NavTarget::Previous => self.page - 1,
            NavTarget::Next => self.page + 1,
            NavTarget::Last => self.total_pages,
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} entries",
            self.start, self.end, self.total_count
        )
    }
}
