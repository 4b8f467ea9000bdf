pub mod api;
pub mod config;
pub mod models;
pub mod store;
pub mod utils;

pub use api::*;
pub use models::*;
pub use utils::*;

use api::client::{ApiError, BetApiClient};
use utils::aggregation::{summarize, Summary};
use utils::derivation::{enrich, BetView};
use utils::filtering::BetFilter;
use utils::sorting::{sort_views, SortState};

/// Everything one render of the ledger screen needs: the enriched,
/// sorted rows plus the summary tiles
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub bets: Vec<BetView>,
    pub summary: Summary,
}

/// Assemble the dashboard from already-fetched records: narrow with the
/// filter, enrich each bet, order by the sort selection, and fold the
/// filtered set into a summary.
pub fn build_dashboard(
    records: &[models::Bet],
    filter: &BetFilter,
    sort: &SortState,
) -> DashboardData {
    let filtered = filter.apply(records);
    let mut views: Vec<BetView> = filtered.iter().map(enrich).collect();
    sort_views(&mut views, sort);

    DashboardData {
        summary: summarize(&filtered),
        bets: views,
    }
}

/// Fetch matching records from the bets API and assemble the dashboard.
/// The server applies the filter; sorting and aggregation happen here.
pub async fn fetch_dashboard(
    client: &BetApiClient,
    filter: &BetFilter,
    sort: &SortState,
) -> Result<DashboardData, ApiError> {
    let records = client.list_bets(filter).await?;

    let mut views: Vec<BetView> = records.iter().map(enrich).collect();
    sort_views(&mut views, sort);

    Ok(DashboardData {
        summary: summarize(&records),
        bets: views,
    })
}
