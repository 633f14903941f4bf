use anyhow::Result;

use crate::post::PostSummary;
use crate::prismic::{Client, Order, SearchResponse};

/// The accumulated post listing: every result loaded so far plus the
/// cursor of the page that would come next.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub results: Vec<PostSummary>,
    pub next_page: Option<String>,
}

impl ListingPage {
    pub fn from_response(response: &SearchResponse) -> Self {
        ListingPage {
            results: response
                .results
                .iter()
                .map(PostSummary::from_document)
                .collect(),
            next_page: response.next_page.clone(),
        }
    }

    /// Whether a "load more" action is still available.
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Concatenate `incoming` onto `current`, keeping the incoming cursor.
///
/// Results stay in service order and are not de-duplicated; an item the
/// service returns on two pages shows up twice.
pub fn append_page(current: ListingPage, incoming: ListingPage) -> ListingPage {
    let mut results = current.results;
    results.extend(incoming.results);
    ListingPage {
        results,
        next_page: incoming.next_page,
    }
}

/// Where listing pages come from. `Client` is the real source; tests drive
/// the paginator over canned pages.
pub trait PostSource {
    /// The first listing page, newest posts first.
    fn first_page(&self, page_size: u32) -> Result<SearchResponse>;

    /// The page behind a `next_page` cursor.
    fn page_at(&self, cursor: &str) -> Result<SearchResponse>;
}

impl PostSource for Client {
    fn first_page(&self, page_size: u32) -> Result<SearchResponse> {
        self.query_posts(page_size, None, Some(Order::Newest))
    }

    fn page_at(&self, cursor: &str) -> Result<SearchResponse> {
        self.fetch_page(cursor)
    }
}

/// Drives "load more" pagination over the post listing.
///
/// The accumulated page is owned here and only replaced through
/// `append_page`; fetches are synchronous, so a second request cannot
/// start while one is in flight.
pub struct Paginator<'a, S: PostSource> {
    source: &'a S,
    page_size: u32,
    page: ListingPage,
}

impl<'a, S: PostSource> Paginator<'a, S> {
    pub fn new(source: &'a S, page_size: u32) -> Self {
        Paginator {
            source,
            page_size,
            page: ListingPage::default(),
        }
    }

    /// Fetch the first listing page, replacing any accumulated state.
    pub fn load_initial(&mut self) -> Result<()> {
        let response = self.source.first_page(self.page_size)?;
        self.page = ListingPage::from_response(&response);
        Ok(())
    }

    /// Fetch the next page and append it to the accumulated listing.
    ///
    /// Returns `false` without issuing a request when no cursor is left.
    /// A failed fetch leaves the accumulated page untouched.
    pub fn request_more(&mut self) -> Result<bool> {
        let Some(cursor) = self.page.next_page.clone() else {
            return Ok(false);
        };
        let response = self.source.page_at(&cursor)?;
        let incoming = ListingPage::from_response(&response);
        self.page = append_page(std::mem::take(&mut self.page), incoming);
        Ok(true)
    }

    /// Everything loaded so far.
    pub fn page(&self) -> &ListingPage {
        &self.page
    }
}
