//! Prefetching a previously uploaded image, including failure and
//! cancellation when the user moves on first.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cropdrop::app::{Container, Part, RemoteImageFetcher, WidgetEvent};
use cropdrop::{SelectedFile, WidgetConfig};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestCtx, png_bytes, png_file};

fn remote_config(url: String) -> WidgetConfig {
    WidgetConfig::new("avatar", "user:42").with_uploaded_image(url)
}

#[tokio::test]
async fn prefetched_image_starts_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/u/42/avatar.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(120, 90)))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestCtx::new();
    let mut widget = ctx.attach(&remote_config(format!("{}/u/42/avatar.png", server.uri())));
    assert!(!widget.container().is_hidden(Part::DeleteButton));
    assert!(!widget.has_session());

    let event = tokio::time::timeout(Duration::from_secs(5), widget.next_event())
        .await
        .expect("prefetch timed out")
        .expect("inbox closed");
    assert!(matches!(event, WidgetEvent::RemoteImageFetched(Ok(_))));
    widget.handle(event).unwrap();

    let image = widget.active_image().unwrap();
    assert_eq!(image.source, "avatar.png");
    assert_eq!((image.width, image.height), (120, 90));
    assert!(widget.container().is_hidden(Part::ClickableArea));
    assert_eq!(ctx.upload.count(), 1);
}

#[tokio::test]
async fn failed_prefetch_leaves_widget_usable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ctx = TestCtx::new();
    let mut widget = ctx.attach(&remote_config(format!("{}/gone.png", server.uri())));

    let event = widget.next_event().await.unwrap();
    assert!(matches!(event, WidgetEvent::RemoteImageFetched(Err(_))));
    widget.handle(event).unwrap();

    assert!(!widget.has_session());
    assert!(!widget.container().is_hidden(Part::ClickableArea));
    assert_eq!(ctx.upload.count(), 0);
}

#[tokio::test]
async fn detach_cancels_a_slow_prefetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(50, 50))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let ctx = TestCtx::new();
    let mut widget = ctx.attach(&remote_config(format!("{}/slow.png", server.uri())));
    widget.detach();

    let waited = tokio::time::timeout(Duration::from_millis(800), widget.next_event()).await;
    assert!(waited.is_err(), "cancelled prefetch still delivered");
    assert!(!widget.has_session());
}

/// Fetcher whose future never resolves and records when it is dropped.
struct PendingFetcher {
    dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl RemoteImageFetcher for PendingFetcher {
    fn fetch(&self, _url: &str) -> BoxFuture<'static, anyhow::Result<SelectedFile>> {
        let flag = DropFlag(self.dropped.clone());
        async move {
            let _flag = flag;
            std::future::pending::<()>().await;
            unreachable!()
        }
        .boxed()
    }
}

#[tokio::test]
async fn detach_drops_the_pending_fetch() {
    let dropped = Arc::new(AtomicBool::new(false));
    let ctx = TestCtx::new();
    let deps = ctx.deps().with_fetcher(Arc::new(PendingFetcher {
        dropped: dropped.clone(),
    }));
    let mut widget = ctx.attach_with(&remote_config("https://cdn.invalid/a.png".into()), deps);

    // Let the prefetch task start polling.
    tokio::task::yield_now().await;
    assert!(!dropped.load(Ordering::SeqCst));

    widget.detach();
    for _ in 0..10 {
        if dropped.load(Ordering::SeqCst) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(dropped.load(Ordering::SeqCst));
}

fn slow_image(width: u32, height: u32) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(png_bytes(width, height))
        .set_delay(Duration::from_millis(200))
}

#[tokio::test]
async fn delete_during_prefetch_stays_deleted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(slow_image(120, 120))
        .mount(&server)
        .await;

    let ctx = TestCtx::new();
    let mut widget = ctx.attach(&remote_config(format!("{}/old.png", server.uri())));
    widget.handle(WidgetEvent::DeleteClicked).unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(600), widget.next_event()).await;
    assert!(waited.is_err(), "deleted image came back");

    assert!(!widget.has_session());
    assert!(widget.container().images().is_empty());
    assert!(!widget.container().is_hidden(Part::ClickableArea));
    assert!(widget.container().is_hidden(Part::DeleteButton));
    assert_eq!(ctx.upload.count(), 0);
    assert_eq!(ctx.host.events().len(), 1);
}

#[tokio::test]
async fn selection_during_prefetch_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(slow_image(120, 120))
        .mount(&server)
        .await;

    let ctx = TestCtx::new();
    let mut widget = ctx.attach(&remote_config(format!("{}/old.png", server.uri())));
    widget
        .handle(WidgetEvent::Drop(vec![png_file("new.png", 300, 200)]))
        .unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(600), widget.next_event()).await;
    assert!(waited.is_err(), "stale prefetch delivered");

    assert_eq!(widget.active_image().unwrap().source, "new.png");
    assert_eq!(widget.container().images().len(), 1);
    let (_, blob) = ctx.upload.last().unwrap();
    assert_eq!((blob.width, blob.height), (200, 200));
    assert_eq!(ctx.upload.count(), 1);
}

#[tokio::test]
async fn late_prefetch_result_is_dropped_after_delete() {
    let ctx = TestCtx::new();
    let deps = ctx.deps().with_fetcher(Arc::new(PendingFetcher {
        dropped: Arc::new(AtomicBool::new(false)),
    }));
    let mut widget = ctx.attach_with(&remote_config("https://cdn.invalid/a.png".into()), deps);

    widget.handle(WidgetEvent::DeleteClicked).unwrap();
    // A result that was already queued when the delete happened.
    widget
        .handle(WidgetEvent::RemoteImageFetched(Ok(png_file("a.png", 120, 120))))
        .unwrap();

    assert!(!widget.has_session());
    assert!(!widget.container().is_hidden(Part::ClickableArea));
    assert_eq!(ctx.upload.count(), 0);
}

#[tokio::test]
async fn matching_broadcast_abandons_the_prefetch() {
    let ctx = TestCtx::new();
    let deps = ctx.deps().with_fetcher(Arc::new(PendingFetcher {
        dropped: Arc::new(AtomicBool::new(false)),
    }));
    let mut widget = ctx.attach_with(&remote_config("https://cdn.invalid/a.png".into()), deps);

    widget
        .handle(WidgetEvent::CleanSlot {
            name: "avatar".into(),
        })
        .unwrap();
    widget
        .handle(WidgetEvent::RemoteImageFetched(Ok(png_file("a.png", 120, 120))))
        .unwrap();

    assert!(!widget.has_session());
    assert!(ctx.host.events().is_empty());
}

#[test]
fn prefetch_without_runtime_is_an_error() {
    let ctx = TestCtx::new();
    let result = cropdrop::CropUploadWidget::attach(
        cropdrop::app::MemoryContainer::for_config(&remote_config("https://x/a.png".into())),
        ctx.deps(),
        cropdrop::WidgetOptions::default(),
    );
    assert!(result.is_err());
}
