/// Token listing: page windows over the on-chain token range
///
/// Listing views fetch fresh on every page turn; nothing is cached between
/// pages. Tokens are fetched one at a time, keeping gateway load and result
/// ordering predictable.
use serde::{Deserialize, Serialize};

use crate::chain::TokenInfo;
use crate::contracts::{MarketContract, NftContract};
use crate::errors::MarketResult;
use crate::metadata::{MetadataClient, TokenMetadata};

/// Loading state surfaced to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Tracks the idle → loading → loaded | error cycle of listing fetches.
#[derive(Debug)]
pub struct PageLoader {
    phase: LoadPhase,
}

impl PageLoader {
    pub fn new() -> Self {
        Self {
            phase: LoadPhase::Idle,
        }
    }

    pub fn begin(&mut self) {
        self.phase = LoadPhase::Loading;
    }

    pub fn finish(&mut self) {
        self.phase = LoadPhase::Loaded;
    }

    pub fn fail(&mut self) {
        self.phase = LoadPhase::Error;
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }
}

impl Default for PageLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Half-open token index range covered by one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u64,
    pub end: u64,
}

/// Compute the index window for a page, or `None` when the page starts
/// beyond the available range.
pub fn page_window(page: u64, rows_per_page: u64, total: u64) -> Option<PageWindow> {
    if total == 0 || rows_per_page == 0 {
        return None;
    }

    let start = page.checked_mul(rows_per_page)?;
    if start >= total {
        return None;
    }

    let end = start.saturating_add(rows_per_page).min(total);
    Some(PageWindow { start, end })
}

/// One token row of a listing view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    #[serde(flatten)]
    pub info: TokenInfo,
    /// Price formatted in whole tokens for display
    pub display_price: String,
    /// Present on views that resolve metadata eagerly
    pub metadata: Option<TokenMetadata>,
}

impl TokenRecord {
    fn from_info(info: TokenInfo, metadata: Option<TokenMetadata>) -> MarketResult<Self> {
        let display_price = info.price_amount()?.to_display_string(5);
        Ok(Self {
            info,
            display_price,
            metadata,
        })
    }
}

/// One fetched page of a listing view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub tokens: Vec<TokenRecord>,
    pub page: u64,
    pub rows_per_page: u64,
    pub total: u64,
}

impl ListingPage {
    fn empty(page: u64, rows_per_page: u64, total: u64) -> Self {
        Self {
            tokens: Vec::new(),
            page,
            rows_per_page,
            total,
        }
    }
}

/// Fetch the for-sale view: a window over the full token range, keeping
/// tokens flagged for sale, with metadata resolved per kept token.
pub async fn fetch_sale_page(
    market: &MarketContract,
    nft: &NftContract,
    metadata_client: &MetadataClient,
    page: u64,
    rows_per_page: u64,
) -> MarketResult<ListingPage> {
    let total = nft.current_token_id().await?;
    let window = match page_window(page, rows_per_page, total) {
        Some(window) => window,
        None => return Ok(ListingPage::empty(page, rows_per_page, total)),
    };

    let mut tokens = Vec::new();
    for token_id in window.start..window.end {
        let info = market.token_info(token_id).await?;
        if !info.for_sale {
            continue;
        }

        let uri = nft.token_uri(token_id).await?;
        let metadata = metadata_client.fetch(&uri).await?;
        tokens.push(TokenRecord::from_info(info, Some(metadata))?);
    }

    Ok(ListingPage {
        tokens,
        page,
        rows_per_page,
        total,
    })
}

/// Fetch the owned view: a window over the account's holdings, metadata
/// deferred to the detail view.
pub async fn fetch_owned_page(
    market: &MarketContract,
    nft: &NftContract,
    account: &str,
    page: u64,
    rows_per_page: u64,
) -> MarketResult<ListingPage> {
    let balance = nft.balance_of(account).await?;
    let window = match page_window(page, rows_per_page, balance) {
        Some(window) => window,
        None => return Ok(ListingPage::empty(page, rows_per_page, balance)),
    };

    let mut tokens = Vec::new();
    for index in window.start..window.end {
        let token_id = nft.token_of_owner_by_index(account, index).await?;
        let info = market.token_info(token_id).await?;
        tokens.push(TokenRecord::from_info(info, None)?);
    }

    Ok(ListingPage {
        tokens,
        page,
        rows_per_page,
        total: balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_clamps_to_total() {
        let window = page_window(0, 10, 4).unwrap();
        assert_eq!(window, PageWindow { start: 0, end: 4 });
    }

    #[test]
    fn window_covers_middle_pages() {
        let window = page_window(2, 10, 35).unwrap();
        assert_eq!(window, PageWindow { start: 20, end: 30 });
    }

    #[test]
    fn window_empty_past_the_end() {
        assert!(page_window(4, 10, 35).is_none());
        assert!(page_window(1, 10, 10).is_none());
    }

    #[test]
    fn window_empty_for_zero_total() {
        assert!(page_window(0, 10, 0).is_none());
    }

    #[test]
    fn loader_walks_the_state_machine() {
        let mut loader = PageLoader::new();
        assert_eq!(loader.phase(), LoadPhase::Idle);
        assert!(!loader.is_loading());

        loader.begin();
        assert!(loader.is_loading());

        loader.finish();
        assert_eq!(loader.phase(), LoadPhase::Loaded);

        loader.begin();
        loader.fail();
        assert_eq!(loader.phase(), LoadPhase::Error);
    }
}
