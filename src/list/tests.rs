//! Tests for list module

use super::*;
use crate::config::{ListConfig, PlaceholderConfig};
use crate::error::{Error, Result};
use crate::pagination::{fetcher_fn, LoadOutcome, PageFetcher, SkipReason};
use crate::scroll::ScrollPosition;
use crate::types::PageNumber;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Helpers
// ============================================================================

/// Two items per page; fails pages listed in `failing` every time
#[derive(Default)]
struct PagesFetcher {
    failing: Mutex<Vec<PageNumber>>,
    calls: AtomicUsize,
}

impl PagesFetcher {
    fn failing(pages: &[PageNumber]) -> Self {
        Self {
            failing: Mutex::new(pages.to_vec()),
            calls: AtomicUsize::new(0),
        }
    }

    fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }
}

#[async_trait]
impl PageFetcher<String> for PagesFetcher {
    async fn fetch_page(&self, page: PageNumber) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(&page) {
            return Err(Error::fetch("network down"));
        }
        Ok(vec![format!("p{page}-a"), format!("p{page}-b")])
    }
}

fn near_bottom() -> ScrollPosition {
    ScrollPosition::new(850.0, 1000.0)
}

fn far_from_bottom() -> ScrollPosition {
    ScrollPosition::new(0.0, 1000.0)
}

// ============================================================================
// Slot Selection Tests
// ============================================================================

#[test]
fn test_slot_items_with_footers() {
    let placeholders = PlaceholderConfig::default();

    assert_eq!(
        select_slot(3, false, None, &placeholders),
        ListSlot::Items {
            count: 3,
            footer: None
        }
    );
    assert_eq!(
        select_slot(3, true, None, &placeholders),
        ListSlot::Items {
            count: 3,
            footer: Some(Footer::Loading)
        }
    );
    assert_eq!(
        select_slot(3, false, Some("boom"), &placeholders),
        ListSlot::Items {
            count: 3,
            footer: Some(Footer::Error("boom".to_string()))
        }
    );
}

#[test]
fn test_slot_empty_list() {
    let placeholders = PlaceholderConfig::default();

    assert_eq!(select_slot(0, true, None, &placeholders), ListSlot::Loading);
    assert_eq!(select_slot(0, false, None, &placeholders), ListSlot::Empty);
}

#[test]
fn test_error_slot_priority_over_empty() {
    let both = PlaceholderConfig::default().error("oops").empty("nothing");
    let only_empty = PlaceholderConfig::default().empty("nothing");
    let none = PlaceholderConfig::default();

    assert_eq!(
        select_slot(0, false, Some("boom"), &both),
        ListSlot::Error("boom".to_string())
    );
    assert_eq!(select_slot(0, false, Some("boom"), &only_empty), ListSlot::Empty);
    assert_eq!(
        select_slot(0, false, Some("boom"), &none),
        ListSlot::Error("boom".to_string())
    );
}

// ============================================================================
// InfiniteList Tests
// ============================================================================

#[tokio::test]
async fn test_new_applies_config() {
    let config = ListConfig::new().with_initial_page(3).with_total_pages(8);
    let list = InfiniteList::new(config, PagesFetcher::default());

    assert_eq!(list.state().current_page(), 3);
    assert_eq!(list.state().total_pages(), 8);
    assert!(list.state().is_empty());
}

#[tokio::test]
async fn test_attach_defers_initial_load() {
    let list = InfiniteList::new(ListConfig::new().with_total_pages(3), PagesFetcher::default());

    let handle = list.attach();
    assert_eq!(list.slot(), ListSlot::Empty);
    assert!(!list.state().is_loading());

    assert_eq!(handle.await.unwrap(), LoadOutcome::Loaded { page: 1, count: 2 });
    assert_eq!(list.state().current_page(), 2);
    assert_eq!(
        list.slot(),
        ListSlot::Items {
            count: 2,
            footer: None
        }
    );
}

#[tokio::test]
async fn test_scroll_far_from_bottom_does_nothing() {
    let list = InfiniteList::new(ListConfig::new().with_total_pages(3), PagesFetcher::default());

    assert_eq!(list.on_scroll(far_from_bottom()).await, None);
    assert!(list.state().is_empty());
}

#[tokio::test]
async fn test_scroll_near_bottom_loads_until_exhausted() {
    let list = InfiniteList::new(ListConfig::new().with_total_pages(2), PagesFetcher::default());

    assert!(list.on_scroll(near_bottom()).await.unwrap().is_loaded());
    assert!(list.on_scroll(near_bottom()).await.unwrap().is_loaded());
    assert_eq!(list.on_scroll(near_bottom()).await, None);

    assert_eq!(list.state().items(), vec!["p1-a", "p1-b", "p2-a", "p2-b"]);
    assert!(!list.state().has_more_pages());
}

#[tokio::test]
async fn test_custom_trigger_distance() {
    let config = ListConfig::new()
        .with_total_pages(2)
        .with_trigger_distance(100.0);
    let list = InfiniteList::new(config, PagesFetcher::default());

    assert_eq!(list.on_scroll(near_bottom()).await, None);
    assert!(list
        .on_scroll(ScrollPosition::new(950.0, 1000.0))
        .await
        .is_some());
}

#[tokio::test]
async fn test_update_total_pages_does_not_load() {
    let fetcher = Arc::new(PagesFetcher::default());
    let mut list = InfiniteList::with_shared_fetcher(
        ListConfig::new().with_total_pages(1),
        Arc::clone(&fetcher) as Arc<dyn PageFetcher<String>>,
    );

    list.load_more().await;
    assert!(!list.state().has_more_pages());

    assert!(list.update_total_pages(Some(3)));
    assert!(!list.update_total_pages(Some(3)));
    assert!(!list.update_total_pages(None));

    assert_eq!(list.state().total_pages(), 3);
    assert!(list.state().has_more_pages());
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_update_total_pages_notifies_once_per_change() {
    let mut list = InfiniteList::new(ListConfig::new(), PagesFetcher::default());
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    list.state().subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    list.update_total_pages(Some(4));
    list.update_total_pages(Some(4));
    list.update_total_pages(Some(5));

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_error_keeps_items_and_retries_same_page() {
    let fetcher = Arc::new(PagesFetcher::failing(&[2]));
    let list = InfiniteList::with_shared_fetcher(
        ListConfig::new().with_total_pages(3),
        Arc::clone(&fetcher) as Arc<dyn PageFetcher<String>>,
    );

    list.load_more().await;
    let outcome = list.on_scroll(near_bottom()).await.unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Failed {
            page: 2,
            error: "network down".to_string()
        }
    );
    assert_eq!(
        list.slot(),
        ListSlot::Items {
            count: 2,
            footer: Some(Footer::Error("network down".to_string()))
        }
    );

    fetcher.heal();
    assert_eq!(
        list.on_scroll(near_bottom()).await,
        Some(LoadOutcome::Loaded { page: 2, count: 2 })
    );
    assert_eq!(list.state().len(), 4);
    assert!(list.state().error().is_none());
}

#[tokio::test]
async fn test_first_page_failure_uses_configured_placeholders() {
    let config = ListConfig::new()
        .with_total_pages(1)
        .with_placeholders(PlaceholderConfig::default().empty("No articles"));
    let list = InfiniteList::new(config, PagesFetcher::failing(&[1]));

    list.load_more().await;

    assert_eq!(list.slot(), ListSlot::Empty);
    assert_eq!(
        list.render(&|item: &String| item.clone()),
        ListView::Empty {
            placeholder: Some("No articles".to_string())
        }
    );
}

#[tokio::test]
async fn test_render_invokes_renderer_in_order() {
    let list = InfiniteList::new(ListConfig::new().with_total_pages(2), PagesFetcher::default());
    list.load_more().await;
    list.load_more().await;

    let rendered = Mutex::new(Vec::new());
    let view = list.render(&|item: &String| {
        rendered.lock().unwrap().push(item.clone());
        item.to_uppercase()
    });

    assert_eq!(view.rows(), ["P1-A", "P1-B", "P2-A", "P2-B"]);
    assert_eq!(
        *rendered.lock().unwrap(),
        vec!["p1-a", "p1-b", "p2-a", "p2-b"]
    );
}

#[tokio::test]
async fn test_render_placeholder_views() {
    let config = ListConfig::new()
        .with_total_pages(1)
        .with_placeholders(PlaceholderConfig::default().error("Try again"));
    let list = InfiniteList::new(config, PagesFetcher::failing(&[1]));

    assert_eq!(
        list.render(&|item: &String| item.len()),
        ListView::Empty { placeholder: None }
    );

    list.load_more().await;
    assert_eq!(
        list.render(&|item: &String| item.len()),
        ListView::Error {
            message: "network down".to_string(),
            placeholder: Some("Try again".to_string())
        }
    );
}

#[tokio::test]
async fn test_refresh_reapplies_config() {
    let config = ListConfig::new().with_initial_page(2).with_total_pages(3);
    let mut list = InfiniteList::new(config, PagesFetcher::default());

    list.load_more().await;
    list.load_more().await;
    assert!(!list.state().has_more_pages());

    list.update_total_pages(Some(5));
    let outcome = list.refresh().await;

    assert_eq!(outcome, LoadOutcome::Loaded { page: 2, count: 2 });
    assert_eq!(list.state().items(), vec!["p2-a", "p2-b"]);
    assert_eq!(list.state().total_pages(), 5);
}

#[tokio::test]
async fn test_fetch_timeout_from_config() {
    let config = ListConfig::new()
        .with_total_pages(1)
        .with_fetch_timeout(Duration::from_millis(10));
    let list = InfiniteList::new(
        config,
        fetcher_fn(|page: PageNumber| async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, Error>(vec![page])
        }),
    );

    assert!(list.load_more().await.is_failed());
    assert_eq!(
        list.slot(),
        ListSlot::Error("Request timeout after 10ms".to_string())
    );
}

#[tokio::test]
async fn test_scroll_suppressed_while_loading() {
    let gate = Arc::new(tokio::sync::Notify::new());
    let fetch_gate = Arc::clone(&gate);
    let list = InfiniteList::new(
        ListConfig::new().with_total_pages(3),
        fetcher_fn(move |page: PageNumber| {
            let gate = Arc::clone(&fetch_gate);
            async move {
                gate.notified().await;
                Ok::<_, Error>(vec![page])
            }
        }),
    );

    let handle = list.attach();
    for _ in 0..100 {
        if list.state().is_loading() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(list.slot(), ListSlot::Loading);
    assert_eq!(list.on_scroll(near_bottom()).await, None);
    assert_eq!(
        list.load_more().await,
        LoadOutcome::Skipped(SkipReason::AlreadyLoading)
    );

    gate.notify_one();
    assert!(handle.await.unwrap().is_loaded());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slot_and_render_consistent_during_concurrent_retry() {
    for _ in 0..20 {
        let failed = Arc::new(AtomicBool::new(false));
        let list = Arc::new(InfiniteList::new(
            ListConfig::new().with_total_pages(1),
            fetcher_fn(move |page: PageNumber| {
                let failed = Arc::clone(&failed);
                async move {
                    if !failed.swap(true, Ordering::SeqCst) {
                        return Err(Error::fetch("network down"));
                    }
                    tokio::time::sleep(Duration::from_micros(200)).await;
                    Ok(vec![format!("p{page}-a"), format!("p{page}-b")])
                }
            }),
        ));

        assert!(list.load_more().await.is_failed());
        assert_eq!(list.slot(), ListSlot::Error("network down".to_string()));

        let retry = tokio::spawn({
            let list = Arc::clone(&list);
            async move { list.load_more().await }
        });

        // Error -> Loading -> Items; an empty, idle, error-free state never exists
        for _ in 0..500 {
            let slot = list.slot();
            assert_ne!(slot, ListSlot::Empty);

            let view = list.render(&|item: &String| item.clone());
            assert!(!matches!(view, ListView::Empty { .. }));
            if let ListView::Items { rows, .. } = &view {
                assert_eq!(rows.len(), 2);
            }
            if retry.is_finished() {
                break;
            }
            std::hint::spin_loop();
        }

        assert!(retry.await.unwrap().is_loaded());
        assert!(list.slot().has_items());
        assert_eq!(list.render(&|item: &String| item.len()).rows(), [4, 4]);
    }
}

#[test]
fn test_placeholder_slots_have_no_items() {
    let placeholders = PlaceholderConfig::default();
    assert!(!select_slot(0, true, None, &placeholders).has_items());
    assert!(!select_slot(0, false, Some("boom"), &placeholders).has_items());
    assert!(select_slot(1, false, None, &placeholders).has_items());

    let view: ListView<String> = ListView::Empty { placeholder: None };
    assert!(view.rows().is_empty());
}
