//! Tests for preview fetching and delivery

mod common;

use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{builder, pump_until, wait_until, FixtureFetcher, Row};
use etera_services::icon::{BuiltinIcons, Glyphs, NoTheme, ICON_SIZES};
use etera_services::item::{ListItem, MediaType, Resource};
use etera_services::preview::PreviewWaker;
use etera_services::settings::Settings;

fn as_list_item(row: &Rc<Row>) -> Rc<dyn ListItem> {
    row.clone()
}

fn badge() -> etera_services::icon::Icon {
    Glyphs::load(&NoTheme, &BuiltinIcons::new()).link
}

fn counting_waker() -> (Arc<AtomicUsize>, PreviewWaker) {
    let wakes = Arc::new(AtomicUsize::new(0));
    let counter = wakes.clone();
    let waker: PreviewWaker = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (wakes, waker)
}

#[test]
fn test_item_without_preview_gets_regular_icon() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();
    let row = Row::new(Resource::file("photo.jpg").with_media_type(MediaType::Image));

    assert!(!provider.preview(&as_list_item(&row)));
    assert_eq!(row.received(), 1);
    assert_eq!(row.last_icon(), provider.media_icon(MediaType::Image, false));
    assert_eq!(provider.pending_previews(), 0);
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(fetcher.calls(), 0);
}

#[test]
fn test_preview_is_fetched_then_cached() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();
    let row = Row::new(Resource::file("photo.jpg").with_preview("ok/photo"));
    let item = as_list_item(&row);

    assert!(!provider.preview(&item));
    assert_eq!(row.received(), 1, "placeholder is set right away");
    assert_eq!(provider.pending_previews(), 1);

    assert!(pump_until(&provider, || row.received() == 2));
    let preview = row.last_icon().unwrap();
    assert_eq!(preview.sizes(), ICON_SIZES.to_vec());
    assert_eq!(provider.pending_previews(), 0);
    assert_eq!(provider.cached_previews(), 1);

    let again = Row::new(Resource::file("copy.jpg").with_preview("ok/photo"));
    assert!(provider.preview(&as_list_item(&again)));
    assert_eq!(again.last_icon(), Some(preview));
    assert_eq!(fetcher.calls(), 1);
}

#[test]
fn test_shared_preview_is_derived_without_refetch() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();

    let plain = Row::new(Resource::file("a.png").with_preview("ok/a"));
    provider.preview(&as_list_item(&plain));
    assert!(pump_until(&provider, || plain.received() == 2));
    let plain_icon = plain.last_icon().unwrap();

    let shared = Row::new(
        Resource::file("a.png")
            .with_preview("ok/a")
            .with_public_url("https://disk/d/a"),
    );
    assert!(provider.preview(&as_list_item(&shared)));
    assert_eq!(shared.last_icon(), Some(plain_icon.with_badge(&badge())));
    assert_eq!(fetcher.calls(), 1);
}

#[test]
fn test_shared_waiter_receives_overlay() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();
    let shared = Row::new(
        Resource::file("b.png")
            .with_preview("ok/b")
            .with_public_url("https://disk/d/b"),
    );

    assert!(!provider.preview(&as_list_item(&shared)));
    assert!(pump_until(&provider, || shared.received() == 2));

    let plain = Row::new(Resource::file("b.png").with_preview("ok/b"));
    assert!(provider.preview(&as_list_item(&plain)));
    let plain_icon = plain.last_icon().unwrap();
    assert_eq!(shared.last_icon(), Some(plain_icon.with_badge(&badge())));
    assert_eq!(fetcher.calls(), 1);
}

#[test]
fn test_superseded_waiter_gets_nothing() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();
    let first = Row::new(Resource::file("c.png").with_preview("ok/c"));
    let second = Row::new(Resource::file("c.png").with_preview("ok/c"));

    provider.preview(&as_list_item(&first));
    provider.preview(&as_list_item(&second));
    assert_eq!(provider.pending_previews(), 1);

    // Every miss starts its own fetch; only the latest row is served.
    assert!(pump_until(&provider, || second.received() == 2));
    assert!(pump_until(&provider, || fetcher.calls() == 2));
    std::thread::sleep(Duration::from_millis(50));
    provider.process_events();

    assert_eq!(first.received(), 1, "only the placeholder");
    assert_eq!(second.received(), 2);
    assert_eq!(provider.cached_previews(), 1);
}

#[test]
fn test_request_after_unprocessed_failure_fetches_again() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let (wakes, waker) = counting_waker();
    let provider = builder(fetcher.clone()).on_event(waker).build().unwrap();
    let first = Row::new(Resource::file("j.png").with_preview("flaky/j"));
    let second = Row::new(Resource::file("j.png").with_preview("flaky/j"));

    provider.preview(&as_list_item(&first));
    // The failure is queued but not yet handled.
    assert!(wait_until(|| wakes.load(Ordering::SeqCst) == 1));

    assert!(!provider.preview(&as_list_item(&second)));
    assert!(pump_until(&provider, || second.received() == 2));

    assert_eq!(fetcher.calls(), 2);
    assert_eq!(first.received(), 1);
    assert_eq!(provider.pending_previews(), 0);
    assert_eq!(provider.cached_previews(), 1);
}

#[test]
fn test_request_after_unprocessed_success_goes_to_latest_row() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let (wakes, waker) = counting_waker();
    let provider = builder(fetcher.clone()).on_event(waker).build().unwrap();
    let first = Row::new(Resource::file("k.png").with_preview("ok/k"));
    let second = Row::new(Resource::file("k.png").with_preview("ok/k"));

    provider.preview(&as_list_item(&first));
    assert!(wait_until(|| wakes.load(Ordering::SeqCst) == 1));

    // Not cached until the event is handled, so this is a miss.
    assert!(!provider.preview(&as_list_item(&second)));
    assert_eq!(provider.pending_previews(), 1);

    assert!(wait_until(|| wakes.load(Ordering::SeqCst) == 2));
    assert_eq!(provider.process_events(), 2);

    assert_eq!(first.received(), 1, "only the placeholder");
    assert_eq!(second.received(), 2, "placeholder, then one preview");
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(provider.pending_previews(), 0);
    assert_eq!(provider.cached_previews(), 1);
}

#[test]
fn test_cancel_suppresses_delivery() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();
    let row = Row::new(Resource::file("d.png").with_preview("ok/d"));

    provider.preview(&as_list_item(&row));
    provider.cancel_preview(row.as_ref());
    assert_eq!(provider.pending_previews(), 0);

    // The fetch still completes and fills the cache.
    assert!(pump_until(&provider, || provider.cached_previews() == 1));
    assert_eq!(row.received(), 1);
}

#[test]
fn test_dropped_row_is_skipped() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();
    let row = Row::new(Resource::file("e.png").with_preview("ok/e"));

    provider.preview(&as_list_item(&row));
    drop(row);

    assert!(pump_until(&provider, || provider.cached_previews() == 1));
    assert_eq!(provider.pending_previews(), 0);
}

#[test]
fn test_undecodable_preview_drops_waiter() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();
    let row = Row::new(Resource::file("f.png").with_preview("junk/f"));

    provider.preview(&as_list_item(&row));
    assert!(pump_until(&provider, || provider.pending_previews() == 0));

    assert_eq!(row.received(), 1);
    assert_eq!(provider.cached_previews(), 0);
}

#[test]
fn test_fetch_error_drops_waiter() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone()).build().unwrap();
    let row = Row::new(Resource::file("g.png").with_preview("gone/g"));

    provider.preview(&as_list_item(&row));
    assert!(pump_until(&provider, || provider.pending_previews() == 0));

    assert_eq!(row.received(), 1);
    assert_eq!(provider.cached_previews(), 0);

    // Errors are not cached; asking again fetches again.
    provider.preview(&as_list_item(&row));
    assert!(pump_until(&provider, || provider.pending_previews() == 0));
    assert_eq!(fetcher.calls(), 2);
}

#[test]
fn test_bounded_cache_refetches_evicted_previews() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let mut settings = Settings::default();
    settings.previews.cache_capacity = 1;
    let provider = builder(fetcher.clone()).settings(settings).build().unwrap();

    for id in ["ok/1", "ok/2"] {
        let row = Row::new(Resource::file("h.png").with_preview(id));
        provider.preview(&as_list_item(&row));
        assert!(pump_until(&provider, || row.received() == 2));
    }
    assert_eq!(provider.cached_previews(), 1);

    let row = Row::new(Resource::file("h.png").with_preview("ok/1"));
    assert!(!provider.preview(&as_list_item(&row)));
    assert!(pump_until(&provider, || row.received() == 2));
    assert_eq!(fetcher.calls(), 3);
}

#[test]
fn test_waker_runs_after_each_fetch() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let (wakes, waker) = counting_waker();
    let provider = builder(fetcher).on_event(waker).build().unwrap();

    let rows: Vec<_> = ["ok/w1", "junk/w2", "gone/w3"]
        .into_iter()
        .map(|id| Row::new(Resource::file("w.png").with_preview(id)))
        .collect();
    for row in &rows {
        provider.preview(&as_list_item(row));
    }

    assert!(pump_until(&provider, || wakes.load(Ordering::SeqCst) == 3));
    assert!(pump_until(&provider, || provider.pending_previews() == 0));
    assert_eq!(rows[0].received(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_runs_on_an_existing_runtime() {
    let fetcher = Arc::new(FixtureFetcher::default());
    let provider = builder(fetcher.clone())
        .runtime_handle(tokio::runtime::Handle::current())
        .build()
        .unwrap();
    let row = Row::new(Resource::file("i.png").with_preview("ok/i"));

    provider.preview(&as_list_item(&row));
    for _ in 0..200 {
        provider.process_events();
        if row.received() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(row.received(), 2);
    assert_eq!(fetcher.calls(), 1);
}
