//! Exported blobs reaching real upload channels, and slot broadcasts
//! shared between widgets.

mod common;

use std::sync::Arc;

use cropdrop::app::{
    Collaborators, CropUploadWidget, DirUploadChannel, HttpUploadChannel, LogHostSink,
    MemoryContainer, SlotBus, WidgetEvent,
};
use cropdrop::{WidgetConfig, WidgetOptions};
use image::GenericImageView;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TestCtx, png_file};

fn attach(config: &WidgetConfig, deps: Collaborators) -> CropUploadWidget<MemoryContainer> {
    CropUploadWidget::attach(
        MemoryContainer::for_config(config),
        deps,
        WidgetOptions::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn http_channel_puts_each_export() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/uploads/avatar"))
        .and(header("content-type", "image/jpeg"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let channel = HttpUploadChannel::new(format!("{}/uploads", server.uri()));
    let deps = Collaborators::new(Arc::new(channel.clone()), Arc::new(LogHostSink));
    let mut widget = attach(&WidgetConfig::new("avatar", "u1"), deps);

    widget
        .handle(WidgetEvent::FileChosen(Some(png_file("a.png", 400, 300))))
        .unwrap();
    widget
        .handle(WidgetEvent::PointerDown { x: 200.0, y: 150.0 })
        .unwrap();
    widget
        .handle(WidgetEvent::PointerMove { x: 250.0, y: 150.0 })
        .unwrap();
    widget.handle(WidgetEvent::PointerUp).unwrap();

    channel.wait_idle().await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let last = image::load_from_memory(&requests[1].body).unwrap();
    assert_eq!(last.dimensions(), (300, 300));
}

#[tokio::test]
async fn http_channel_survives_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let channel = HttpUploadChannel::new(server.uri());
    let deps = Collaborators::new(Arc::new(channel.clone()), Arc::new(LogHostSink));
    let mut widget = attach(&WidgetConfig::new("avatar", "u1"), deps);

    widget
        .handle(WidgetEvent::FileChosen(Some(png_file("a.png", 200, 200))))
        .unwrap();
    channel.wait_idle().await;

    assert!(widget.has_session());
    assert_eq!(widget.exports(), 1);
}

#[test]
fn dir_channel_keeps_latest_export_per_slot() {
    let dir = tempfile::tempdir().unwrap();
    let channel = DirUploadChannel::new(dir.path());
    let deps = Collaborators::new(Arc::new(channel.clone()), Arc::new(LogHostSink));
    let mut widget = attach(&WidgetConfig::new("cover", ""), deps);

    widget
        .handle(WidgetEvent::FileChosen(Some(png_file("a.png", 640, 480))))
        .unwrap();
    widget
        .handle(WidgetEvent::PointerDown { x: 560.0, y: 480.0 })
        .unwrap();
    widget
        .handle(WidgetEvent::PointerMove { x: 400.0, y: 320.0 })
        .unwrap();
    widget.handle(WidgetEvent::PointerUp).unwrap();

    let written = image::open(channel.path_for("cover")).unwrap();
    assert_eq!(written.dimensions(), (320, 320));
}

#[test]
fn slot_bus_cleans_only_the_named_widget() {
    let bus = SlotBus::new();
    let ctx = TestCtx::new();

    let mut avatar = ctx.attach_with(
        &WidgetConfig::new("avatar", "a"),
        ctx.deps().with_slot_bus(bus.clone()),
    );
    let mut cover = ctx.attach_with(
        &WidgetConfig::new("cover", "c"),
        ctx.deps().with_slot_bus(bus.clone()),
    );
    for widget in [&mut avatar, &mut cover] {
        widget
            .handle(WidgetEvent::FileChosen(Some(png_file("x.png", 300, 300))))
            .unwrap();
    }

    assert_eq!(bus.clean("avatar"), 2);
    assert_eq!(avatar.pump(), 1);
    assert_eq!(cover.pump(), 1);

    assert!(!avatar.has_session());
    assert!(cover.has_session());
    assert!(ctx.host.events().is_empty());
}

#[tokio::test]
async fn slot_bus_wakes_a_waiting_widget() {
    let bus = SlotBus::new();
    let ctx = TestCtx::new();
    let mut widget = ctx.attach_with(
        &WidgetConfig::new("avatar", "a"),
        ctx.deps().with_slot_bus(bus.clone()),
    );
    widget
        .handle(WidgetEvent::FileChosen(Some(png_file("x.png", 300, 300))))
        .unwrap();

    bus.clean("avatar");
    let event = widget.next_event().await.unwrap();
    assert!(matches!(&event, WidgetEvent::CleanSlot { name } if name == "avatar"));
    widget.handle(event).unwrap();
    assert!(!widget.has_session());
}

#[test]
fn detached_widget_stops_listening() {
    let bus = SlotBus::new();
    let ctx = TestCtx::new();
    let mut widget = ctx.attach_with(
        &WidgetConfig::new("avatar", "a"),
        ctx.deps().with_slot_bus(bus.clone()),
    );
    widget.detach();

    assert_eq!(bus.clean("avatar"), 0);
    assert_eq!(widget.pump(), 0);
}
