use resume_search_core::contract::ResumeRecord;
use resume_search_core::cursor::PageCursor;
use resume_search_core::filter::SkillFilter;

use crate::error::StoreError;

/// One scan call. `limit` caps the number of items the table inspects,
/// not the number of matches returned.
#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    pub table_name: &'a str,
    pub filter: &'a SkillFilter,
    pub limit: usize,
    pub exclusive_start_key: Option<&'a PageCursor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanPage {
    pub items: Vec<ResumeRecord>,
    /// Present whenever the scan stopped before the end of the table.
    pub last_evaluated_key: Option<PageCursor>,
    pub scanned_count: usize,
}

pub trait ResumeTable {
    fn scan_page(&self, request: &ScanRequest<'_>) -> Result<ScanPage, StoreError>;
}
