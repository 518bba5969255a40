use super::listing::{ListingRecord, RankedListing};

/// Sort ascending by numeric price and number the result 1..N.
///
/// The sort is stable, so equal prices (including every unparsable one)
/// keep their discovery order.
pub fn rank_listings(records: Vec<ListingRecord>) -> Vec<RankedListing> {
    let mut records = records;
    records.sort_by(|a, b| a.numeric_price.total_cmp(&b.numeric_price));

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| RankedListing { rank: idx + 1, record })
        .collect()
}
