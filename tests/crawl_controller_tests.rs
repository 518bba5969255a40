//! Crawl controller behavior per category profile
mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{CannedExtractor, StubFetcher, ad_url, detail, page_url, probe_url, search_page, url_builder};
use listing_harvester::application::crawl_controller::{CrawlController, CrawlSettings};
use listing_harvester::application::search::SearchParameters;
use listing_harvester::domain::crawl_state::{CrawlOutcome, CrawlStatus, StopReason};
use listing_harvester::domain::listing::NO_DESCRIPTION;
use listing_harvester::domain::variant::{CrawlProfile, ListingCategory, TransportErrorPolicy};

fn car_params() -> SearchParameters {
    SearchParameters {
        brand: Some("BMW".into()),
        ..SearchParameters::default()
    }
}

async fn crawl_with(
    fetcher: &Arc<StubFetcher>,
    profile: &CrawlProfile,
    params: &SearchParameters,
    pages: u32,
    settings: CrawlSettings,
) -> CrawlOutcome {
    let controller = CrawlController::new(fetcher.clone(), Arc::new(CannedExtractor), settings);
    controller
        .run(profile, &url_builder(profile.category), params, pages)
        .await
}

async fn crawl(fetcher: &Arc<StubFetcher>, category: ListingCategory, params: &SearchParameters, pages: u32) -> CrawlOutcome {
    crawl_with(
        fetcher,
        &CrawlProfile::for_category(category),
        params,
        pages,
        CrawlSettings::default(),
    )
    .await
}

fn urls(outcome: &CrawlOutcome) -> Vec<&str> {
    outcome.records.iter().map(|r| r.url.as_str()).collect()
}

#[tokio::test]
async fn bike_stops_after_page_repeating_seen_listings() {
    let bike = ListingCategory::Bike;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(bike, &params, 1), search_page(&[("a", "100 €"), ("b", "50 €")]))
            .page(page_url(bike, &params, 2), search_page(&[("a", "100 €"), ("b", "50 €")]))
            .page(page_url(bike, &params, 3), search_page(&[("c", "10 €")]))
            .page(ad_url("a"), detail("Quadro L"))
            .page(ad_url("b"), detail("Quadro M"))
            .page(ad_url("c"), detail("Quadro S")),
    );

    let outcome = crawl(&fetcher, bike, &params, 5).await;

    assert_eq!(outcome.status, CrawlStatus::Stopped(StopReason::DuplicateFound));
    assert_eq!(urls(&outcome), [ad_url("a"), ad_url("b")]);
    assert_eq!(outcome.pages_fetched, 2);
    assert!(!fetcher.was_requested(&page_url(bike, &params, 3)));
    // Duplicates never trigger a second detail fetch
    assert_eq!(fetcher.requests().iter().filter(|u| **u == ad_url("a")).count(), 1);
}

#[tokio::test]
async fn bike_finishes_the_page_before_duplicate_stop() {
    let bike = ListingCategory::Bike;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(bike, &params, 1), search_page(&[("a", "100 €"), ("a", "100 €"), ("b", "5 €")]))
            .page(ad_url("a"), detail("Quadro L"))
            .page(ad_url("b"), detail("Quadro M")),
    );

    let outcome = crawl(&fetcher, bike, &params, 3).await;

    assert_eq!(outcome.status, CrawlStatus::Stopped(StopReason::DuplicateFound));
    assert_eq!(urls(&outcome), [ad_url("a"), ad_url("b")]);
    assert!(!fetcher.was_requested(&page_url(bike, &params, 2)));
}

#[tokio::test]
async fn bike_excludes_descriptions_mentioning_26() {
    let bike = ListingCategory::Bike;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(bike, &params, 1), search_page(&[("a", "100 €"), ("b", "50 €")]))
            .page(ad_url("a"), detail("Rodas 26 polegadas"))
            .page(ad_url("b"), detail("Rodas 29")),
    );

    let outcome = crawl(&fetcher, bike, &params, 1).await;

    assert_eq!(outcome.status, CrawlStatus::Done);
    assert_eq!(urls(&outcome), [ad_url("b")]);
}

#[tokio::test]
async fn bike_skips_failed_search_page_and_continues() {
    let bike = ListingCategory::Bike;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(bike, &params, 1), search_page(&[("a", "100 €")]))
            .status(page_url(bike, &params, 2), 503)
            .page(page_url(bike, &params, 3), search_page(&[("c", "10 €")]))
            .page(ad_url("a"), detail("Quadro L"))
            .page(ad_url("c"), detail("Quadro S")),
    );

    let outcome = crawl(&fetcher, bike, &params, 3).await;

    assert_eq!(outcome.status, CrawlStatus::Done);
    assert_eq!(urls(&outcome), [ad_url("a"), ad_url("c")]);
    assert_eq!(outcome.pages_fetched, 3);
    assert!(fetcher.was_requested(&page_url(bike, &params, 3)));
}

#[tokio::test]
async fn motorcycle_aborts_on_failed_search_page() {
    let moto = ListingCategory::Motorcycle;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(moto, &params, 1), search_page(&[("a", "2 000 €")]))
            .status(page_url(moto, &params, 2), 503)
            .page(page_url(moto, &params, 3), search_page(&[("c", "900 €")]))
            .page(ad_url("a"), detail("125cc")),
    );

    let outcome = crawl(&fetcher, moto, &params, 3).await;

    assert_eq!(outcome.status, CrawlStatus::Stopped(StopReason::TransportError));
    assert_eq!(urls(&outcome), [ad_url("a")]);
    assert!(!fetcher.was_requested(&page_url(moto, &params, 3)));
}

#[tokio::test]
async fn bike_drops_listing_when_detail_fetch_fails() {
    let bike = ListingCategory::Bike;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(bike, &params, 1), search_page(&[("a", "100 €"), ("b", "50 €")]))
            .network_failure(ad_url("a"))
            .page(ad_url("b"), detail("Quadro M")),
    );

    let outcome = crawl(&fetcher, bike, &params, 1).await;
    assert_eq!(urls(&outcome), [ad_url("b")]);
}

#[tokio::test]
async fn car_crawl_is_bounded_by_site_total() {
    let car = ListingCategory::Car;
    let params = car_params();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(probe_url(car, &params), "TOTAL 2")
            .page(page_url(car, &params, 1), search_page(&[("a", "9 000 €")]))
            .page(page_url(car, &params, 2), search_page(&[("a", "9 000 €"), ("b", "7 500 €")]))
            .page(page_url(car, &params, 3), search_page(&[("c", "1 €")]))
            .page(ad_url("a"), detail("Diesel"))
            .page(ad_url("b"), detail("Gasolina")),
    );

    let outcome = crawl(&fetcher, car, &params, 5).await;

    assert_eq!(outcome.status, CrawlStatus::Done);
    assert_eq!(outcome.page_limit, 2);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(urls(&outcome), [ad_url("a"), ad_url("b")]);
    assert!(!fetcher.was_requested(&page_url(car, &params, 3)));
}

#[tokio::test]
async fn car_requested_pages_cap_site_total() {
    let car = ListingCategory::Car;
    let params = car_params();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(probe_url(car, &params), "TOTAL 40")
            .page(page_url(car, &params, 1), search_page(&[("a", "9 000 €")]))
            .page(ad_url("a"), detail("Diesel")),
    );

    let outcome = crawl(&fetcher, car, &params, 1).await;

    assert_eq!(outcome.page_limit, 1);
    assert_eq!(outcome.status, CrawlStatus::Done);
    assert!(!fetcher.was_requested(&page_url(car, &params, 2)));
}

#[tokio::test]
async fn car_skips_failed_page_and_keeps_placeholder_descriptions() {
    let car = ListingCategory::Car;
    let params = car_params();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(probe_url(car, &params), "TOTAL 3")
            .page(page_url(car, &params, 1), search_page(&[("a", "9 000 €")]))
            .network_failure(page_url(car, &params, 2))
            .page(page_url(car, &params, 3), search_page(&[("c", "3 000 €")]))
            .page(ad_url("a"), detail("Diesel"))
            .status(ad_url("c"), 500),
    );

    let outcome = crawl(&fetcher, car, &params, 3).await;

    assert_eq!(outcome.status, CrawlStatus::Done);
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(urls(&outcome), [ad_url("a"), ad_url("c")]);
    assert_eq!(outcome.records[1].description, NO_DESCRIPTION);
}

#[tokio::test]
async fn car_probe_failure_ends_run_without_listings() {
    let car = ListingCategory::Car;
    let params = car_params();
    let fetcher = Arc::new(
        StubFetcher::new()
            .status(probe_url(car, &params), 500)
            .page(page_url(car, &params, 1), search_page(&[("a", "9 000 €")])),
    );

    let outcome = crawl(&fetcher, car, &params, 3).await;

    assert_eq!(outcome.status, CrawlStatus::Stopped(StopReason::TransportError));
    assert!(outcome.records.is_empty());
    assert_eq!(fetcher.requests(), [probe_url(car, &params)]);
}

#[tokio::test]
async fn motorcycle_stops_when_page_brings_nothing_new() {
    let moto = ListingCategory::Motorcycle;
    let params = SearchParameters {
        brand: Some("honda".into()),
        ..SearchParameters::default()
    };
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(moto, &params, 1), search_page(&[("a", "2 000 €"), ("b", "1 500 €")]))
            .page(page_url(moto, &params, 2), search_page(&[("b", "1 500 €"), ("c", "900 €")]))
            .page(page_url(moto, &params, 3), search_page(&[("a", "2 000 €"), ("c", "900 €")]))
            .page(page_url(moto, &params, 4), search_page(&[("d", "1 €")]))
            .page(ad_url("a"), detail("125cc"))
            .page(ad_url("b"), detail("50cc"))
            .page(ad_url("c"), detail("300cc")),
    );

    let outcome = crawl(&fetcher, moto, &params, 10).await;

    // Page 2 repeats "b" but also brings "c", so only page 3 ends the crawl
    assert_eq!(outcome.status, CrawlStatus::Stopped(StopReason::NoNewListings));
    assert_eq!(urls(&outcome), [ad_url("a"), ad_url("b"), ad_url("c")]);
    assert!(!fetcher.was_requested(&page_url(moto, &params, 4)));
}

#[tokio::test]
async fn empty_results_page_stops_with_no_content() {
    let moto = ListingCategory::Motorcycle;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(moto, &params, 1), search_page(&[("a", "2 000 €")]))
            .page(page_url(moto, &params, 2), "")
            .page(ad_url("a"), detail("125cc")),
    );

    let outcome = crawl(&fetcher, moto, &params, 5).await;

    assert_eq!(outcome.status, CrawlStatus::Stopped(StopReason::NoContent));
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn transport_policy_override_aborts_bike_crawl() {
    let bike = ListingCategory::Bike;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(bike, &params, 1), search_page(&[("a", "100 €")]))
            .network_failure(page_url(bike, &params, 2))
            .page(page_url(bike, &params, 3), search_page(&[("c", "10 €")]))
            .page(ad_url("a"), detail("Quadro L"))
            .page(ad_url("c"), detail("Quadro S")),
    );
    let profile = CrawlProfile::for_category(bike).with_transport_error_policy(TransportErrorPolicy::Abort);

    let outcome = crawl_with(&fetcher, &profile, &params, 3, CrawlSettings::default()).await;

    assert_eq!(outcome.status, CrawlStatus::Stopped(StopReason::TransportError));
    assert_eq!(urls(&outcome), [ad_url("a")]);
    assert!(!fetcher.was_requested(&page_url(bike, &params, 3)));
}

#[tokio::test]
async fn concurrent_detail_fetches_keep_discovery_order() {
    let moto = ListingCategory::Motorcycle;
    let params = SearchParameters::default();
    let fetcher = Arc::new(
        StubFetcher::new()
            .page(page_url(moto, &params, 1), search_page(&[("a", "1 €"), ("b", "2 €"), ("c", "3 €")]))
            .slow_page(ad_url("a"), detail("lento"), 60)
            .slow_page(ad_url("b"), detail("médio"), 30)
            .page(ad_url("c"), detail("rápido")),
    );
    let settings = CrawlSettings {
        request_delay: Duration::ZERO,
        detail_concurrency: 3,
    };

    let outcome = crawl_with(&fetcher, &CrawlProfile::for_category(moto), &params, 1, settings).await;

    assert_eq!(urls(&outcome), [ad_url("a"), ad_url("b"), ad_url("c")]);
    let descriptions: Vec<_> = outcome.records.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, ["lento", "médio", "rápido"]);
}
